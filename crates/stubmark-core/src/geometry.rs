#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle in surface coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in surface units.
    pub width: u16,
    /// Height in surface units.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Dimensions of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    ///
    /// An empty `other` is contained by anything.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Intersection with another rectangle, or `None` when they do not overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Intersection with another rectangle; empty when they do not overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Place a box of `size` at `corner`, `inset` units in from both edges
    /// that meet there, clipped to `self`.
    ///
    /// Returns an empty rectangle when the inset alone consumes the anchor.
    pub fn anchored(&self, corner: Corner, size: Size, inset: u16) -> Rect {
        if self.is_empty() || size.is_empty() {
            return Rect::default();
        }
        let inset_x = inset.min(self.width);
        let inset_y = inset.min(self.height);
        let room_w = self.width - inset_x;
        let room_h = self.height - inset_y;
        let width = size.width.min(room_w);
        let height = size.height.min(room_h);
        if width == 0 || height == 0 {
            return Rect::default();
        }

        let x = match corner {
            Corner::TopLeft | Corner::BottomLeft => self.x + inset_x,
            Corner::TopRight | Corner::BottomRight => self.right() - inset_x - width,
        };
        let y = match corner {
            Corner::TopLeft | Corner::TopRight => self.y + inset_y,
            Corner::BottomLeft | Corner::BottomRight => self.bottom() - inset_y - height,
        };
        Rect::new(x, y, width, height)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Corner of a rectangle an overlay is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Corner {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Surface units per logical unit.
///
/// Overlay sizes are expressed in logical units so a badge keeps its
/// proportions on dense surfaces. A cell grid reports `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale(f32);

impl DisplayScale {
    /// One surface unit per logical unit.
    pub const UNIT: Self = Self(1.0);

    /// Create a scale; non-finite or non-positive factors fall back to `1.0`.
    #[must_use]
    pub fn new(factor: f32) -> Self {
        if factor.is_finite() && factor > 0.0 {
            Self(factor)
        } else {
            Self::UNIT
        }
    }

    /// The raw factor.
    #[inline]
    pub const fn factor(self) -> f32 {
        self.0
    }

    /// Convert a logical length to surface units.
    ///
    /// A non-zero logical length never collapses to zero.
    pub fn to_surface(self, units: u16) -> u16 {
        if units == 0 {
            return 0;
        }
        let scaled = (f32::from(units) * self.0).round();
        if scaled >= f32::from(u16::MAX) {
            u16::MAX
        } else {
            (scaled as u16).max(1)
        }
    }

    /// Convert a logical size to surface units.
    pub fn size_to_surface(self, size: Size) -> Size {
        Size::new(self.to_surface(size.width), self.to_surface(size.height))
    }
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self::UNIT
    }
}
