#![forbid(unsafe_code)]

//! Core: geometry, host entry capabilities, and placeholder oracles.

pub mod entry;
pub mod geometry;
pub mod logging;
pub mod oracle;

pub use entry::{FileEntry, HostEntry, PathKey, has_extension};
pub use geometry::{Corner, DisplayScale, Rect, Size};
pub use oracle::{ContentMarkerOracle, OracleError, PlaceholderOracle, SharedOracle};
