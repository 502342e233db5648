#![forbid(unsafe_code)]

//! Render kernel: cells, the surface contract, and a reference cell buffer.

pub mod buffer;
pub mod cell;
pub mod surface;

pub use buffer::Buffer;
pub use cell::{Cell, PackedRgba, StyleFlags};
pub use surface::{DrawError, RasterImage, Surface};
