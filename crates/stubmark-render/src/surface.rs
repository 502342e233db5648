#![forbid(unsafe_code)]

//! The surface contract overlays draw through.
//!
//! A host hands its own drawing target to the interception layer as a
//! `&mut dyn Surface`. Every operation can refuse; refusals are reported
//! as [`DrawError`] and never panic on the overlay's behalf.

use std::fmt;

use stubmark_core::geometry::{DisplayScale, Rect};

use crate::cell::{Cell, PackedRgba};

/// A host drawing target.
pub trait Surface {
    /// Drawable area in surface units.
    fn bounds(&self) -> Rect;

    /// Surface units per logical unit.
    fn scale(&self) -> DisplayScale {
        DisplayScale::UNIT
    }

    /// Fill `rect` with `cell`.
    fn fill(&mut self, rect: Rect, cell: Cell) -> Result<(), DrawError>;

    /// Write a single cell.
    fn put(&mut self, x: u16, y: u16, cell: Cell) -> Result<(), DrawError>;

    /// Draw `image` scaled into `rect`.
    ///
    /// Surfaces without image support keep the default, which refuses.
    fn blit(&mut self, rect: Rect, image: &RasterImage) -> Result<(), DrawError> {
        let _ = (rect, image);
        Err(DrawError::Unsupported("image blit"))
    }
}

/// Why a surface refused a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// The target lies (partly) outside the surface.
    OutOfBounds { rect: Rect },
    /// The surface does not support the operation.
    Unsupported(&'static str),
    /// The surface rejected the draw for another reason.
    Rejected(String),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { rect } => write!(
                f,
                "draw target {}x{} at ({}, {}) is outside the surface",
                rect.width, rect.height, rect.x, rect.y
            ),
            Self::Unsupported(what) => write!(f, "surface does not support {what}"),
            Self::Rejected(msg) => write!(f, "surface rejected draw: {msg}"),
        }
    }
}

impl std::error::Error for DrawError {}

/// Decoded RGBA pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
}

impl RasterImage {
    /// Build an image from row-major pixels.
    ///
    /// Returns `None` when `pixels.len() != width * height` or either
    /// dimension is zero.
    pub fn new(width: u32, height: u32, pixels: Vec<PackedRgba>) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?;
        if expected == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// An image filled with one color.
    pub fn solid(width: u32, height: u32, color: PackedRgba) -> Option<Self> {
        let len = (width as usize).checked_mul(height as usize)?;
        Self::new(width, height, vec![color; len])
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, or `None` when out of range.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<PackedRgba> {
        if x < self.width && y < self.height {
            self.pixels
                .get(y as usize * self.width as usize + x as usize)
                .copied()
        } else {
            None
        }
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }
}
