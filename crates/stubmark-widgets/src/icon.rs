#![forbid(unsafe_code)]

//! Badge assets.
//!
//! The preferred badge is a small image. Decoding it can fail (missing file,
//! corrupt bytes) and a surface may not draw images at all, so every asset
//! path has a glyph fallback that needs nothing from the image pipeline.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use image::DynamicImage;
use image::imageops::FilterType;
use stubmark_core::geometry::Size;
use stubmark_render::cell::PackedRgba;
use stubmark_render::surface::RasterImage;

/// A decoded badge image.
#[derive(Debug)]
pub struct BadgeIcon {
    image: DynamicImage,
    /// Last resize, reused while the requested size stays the same.
    raster: Mutex<Option<RasterImage>>,
}

impl BadgeIcon {
    /// Decode PNG, GIF or JPEG bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IconError> {
        if bytes.is_empty() {
            return Err(IconError::Empty);
        }
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_image(image))
    }

    /// Read and decode an image file.
    pub fn load(path: &Path) -> Result<Self, IconError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already-decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            raster: Mutex::new(None),
        }
    }

    /// Source dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// The icon resized to exactly `size`, or `None` for an empty size.
    pub fn raster(&self, size: Size) -> Option<RasterImage> {
        if size.is_empty() {
            return None;
        }
        let (w, h) = (u32::from(size.width), u32::from(size.height));
        let mut memo = self.raster.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = memo.as_ref()
            && cached.width() == w
            && cached.height() == h
        {
            return Some(cached.clone());
        }

        let rgba = self.image.resize_exact(w, h, FilterType::Triangle).to_rgba8();
        let pixels = rgba
            .pixels()
            .map(|p| PackedRgba::rgba(p[0], p[1], p[2], p[3]))
            .collect();
        let raster = RasterImage::new(w, h, pixels)?;
        *memo = Some(raster.clone());
        Some(raster)
    }
}

/// What a badge draws.
#[derive(Debug, Clone, Default)]
pub enum BadgeAsset {
    /// A decoded image, drawn when the surface supports images.
    Icon(Arc<BadgeIcon>),
    /// The vector glyph frame.
    #[default]
    Glyph,
}

impl BadgeAsset {
    /// Load the image at `path`, falling back to the glyph.
    ///
    /// `None` selects the glyph directly. A failed load is logged and also
    /// selects the glyph.
    pub fn load_or_glyph(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::Glyph;
        };
        match BadgeIcon::load(path) {
            Ok(icon) => {
                tracing::debug!(path = %path.display(), "badge icon loaded");
                Self::Icon(Arc::new(icon))
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "badge icon unavailable, using glyph"
                );
                Self::Glyph
            }
        }
    }

    /// Whether an image is available.
    pub fn has_icon(&self) -> bool {
        matches!(self, Self::Icon(_))
    }
}

/// Failure to load a badge icon.
#[derive(Debug)]
pub enum IconError {
    /// The file could not be read.
    Io(io::Error),
    /// The bytes are not a supported image.
    Decode(image::ImageError),
    /// No bytes at all.
    Empty,
}

impl fmt::Display for IconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read badge icon: {err}"),
            Self::Decode(err) => write!(f, "cannot decode badge icon: {err}"),
            Self::Empty => f.write_str("badge icon is empty"),
        }
    }
}

impl std::error::Error for IconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Empty => None,
        }
    }
}

impl From<io::Error> for IconError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for IconError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err)
    }
}
