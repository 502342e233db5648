#![forbid(unsafe_code)]

//! Placeholder badge.
//!
//! A small overlay pinned near a corner of an entry's content rectangle.
//! Size and inset are logical units, converted through the surface's
//! [`DisplayScale`] so the badge keeps its proportions on dense surfaces.
//!
//! The renderer holds no per-draw state. It reports refusals from the
//! surface as errors and leaves catching them to the caller.

use stubmark_core::geometry::{Corner, DisplayScale, Rect, Size};
use stubmark_render::cell::{Cell, PackedRgba, StyleFlags};
use stubmark_render::surface::{DrawError, Surface};

use crate::icon::BadgeAsset;

/// Visual parameters of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BadgeStyle {
    /// Badge size in logical units.
    pub size: Size,
    /// Distance from the pinned corner in logical units.
    pub inset: u16,
    /// Corner of the anchor the badge is pinned to.
    pub corner: Corner,
    /// Glyph and frame color.
    pub fg: PackedRgba,
    /// Badge background.
    pub bg: PackedRgba,
    /// Glyph drawn when no image is used.
    pub glyph: char,
}

impl BadgeStyle {
    /// Glyph used by the presets.
    pub const DEFAULT_GLYPH: char = '↓';

    /// Framed 3x3 badge inset one unit from the top-right of a cover.
    pub const fn grid() -> Self {
        Self {
            size: Size::new(3, 3),
            inset: 1,
            corner: Corner::TopRight,
            fg: PackedRgba::WHITE,
            bg: PackedRgba::rgb(48, 48, 48),
            glyph: Self::DEFAULT_GLYPH,
        }
    }

    /// Single-row 3x1 badge flush with the right end of a list row.
    pub const fn list() -> Self {
        Self {
            size: Size::new(3, 1),
            inset: 0,
            corner: Corner::TopRight,
            fg: PackedRgba::WHITE,
            bg: PackedRgba::rgb(48, 48, 48),
            glyph: Self::DEFAULT_GLYPH,
        }
    }

    #[must_use]
    pub const fn with_size(mut self, width: u16, height: u16) -> Self {
        self.size = Size::new(width, height);
        self
    }

    #[must_use]
    pub const fn with_inset(mut self, inset: u16) -> Self {
        self.inset = inset;
        self
    }

    #[must_use]
    pub const fn with_corner(mut self, corner: Corner) -> Self {
        self.corner = corner;
        self
    }

    #[must_use]
    pub const fn with_colors(mut self, fg: PackedRgba, bg: PackedRgba) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }

    #[must_use]
    pub const fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self::grid()
    }
}

/// Draws the placeholder badge.
#[derive(Debug, Clone, Default)]
pub struct BadgeRenderer {
    style: BadgeStyle,
    asset: BadgeAsset,
}

impl BadgeRenderer {
    /// Create a glyph-only renderer.
    pub fn new(style: BadgeStyle) -> Self {
        Self {
            style,
            asset: BadgeAsset::Glyph,
        }
    }

    /// Prefer `asset` over the glyph.
    #[must_use]
    pub fn with_asset(mut self, asset: BadgeAsset) -> Self {
        self.asset = asset;
        self
    }

    pub fn style(&self) -> &BadgeStyle {
        &self.style
    }

    pub fn asset(&self) -> &BadgeAsset {
        &self.asset
    }

    /// Where the badge lands for `anchor` at `scale`.
    ///
    /// Empty when the anchor is too small to hold any of it.
    pub fn placement(&self, anchor: Rect, scale: DisplayScale) -> Rect {
        let size = scale.size_to_surface(self.style.size);
        let inset = scale.to_surface(self.style.inset);
        anchor.anchored(self.style.corner, size, inset)
    }

    /// Paint the badge for `anchor` and return the rectangle painted.
    ///
    /// An anchor too small for the badge paints nothing and is not an error.
    /// A surface that cannot draw images gets the glyph instead.
    pub fn render(&self, surface: &mut dyn Surface, anchor: Rect) -> Result<Rect, DrawError> {
        let area = self.placement(anchor, surface.scale());
        if area.is_empty() {
            return Ok(area);
        }

        if let BadgeAsset::Icon(icon) = &self.asset
            && let Some(raster) = icon.raster(area.size())
        {
            match surface.blit(area, &raster) {
                Ok(()) => return Ok(area),
                Err(DrawError::Unsupported(what)) => {
                    tracing::trace!(what, "surface cannot draw badge image, using glyph");
                }
                Err(err) => return Err(err),
            }
        }

        self.render_glyph(surface, area)?;
        Ok(area)
    }

    fn render_glyph(&self, surface: &mut dyn Surface, area: Rect) -> Result<(), DrawError> {
        let base = Cell::BLANK.with_fg(self.style.fg).with_bg(self.style.bg);
        let glyph = Cell {
            ch: self.style.glyph,
            ..base
        }
        .with_flags(StyleFlags::BOLD);
        let frame = |ch: char| Cell { ch, ..base };

        surface.fill(area, base)?;

        let (left, top) = (area.x, area.y);
        let (right, bottom) = (area.right() - 1, area.bottom() - 1);
        let mid_x = left + area.width / 2;
        let mid_y = top + area.height / 2;

        if area.width >= 3 && area.height >= 3 {
            surface.put(left, top, frame('┌'))?;
            surface.put(right, top, frame('┐'))?;
            surface.put(left, bottom, frame('└'))?;
            surface.put(right, bottom, frame('┘'))?;
            for x in left + 1..right {
                surface.put(x, top, frame('─'))?;
                surface.put(x, bottom, frame('─'))?;
            }
            for y in top + 1..bottom {
                surface.put(left, y, frame('│'))?;
                surface.put(right, y, frame('│'))?;
            }
        } else if area.width >= 3 {
            surface.put(left, mid_y, frame('['))?;
            surface.put(right, mid_y, frame(']'))?;
        }
        surface.put(mid_x, mid_y, glyph)
    }
}
