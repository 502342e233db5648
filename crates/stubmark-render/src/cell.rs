#![forbid(unsafe_code)]

//! Cell and color types for the reference surface.

use unicode_width::UnicodeWidthChar;

/// A compact RGBA color.
///
/// Layout is `0xRRGGBBAA` with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Source-over compositing of `self` onto `dst`.
    pub fn over(self, dst: Self) -> Self {
        let sa = u32::from(self.a());
        if sa == 255 {
            return self;
        }
        if sa == 0 {
            return dst;
        }
        let da = u32::from(dst.a());
        let inv = 255 - sa;
        // Scaled by 255: out_a = sa + da * (1 - sa)
        let out_a = sa * 255 + da * inv;
        if out_a == 0 {
            return Self::TRANSPARENT;
        }
        let channel = |s: u8, d: u8| -> u8 {
            let numer = u32::from(s) * sa * 255 + u32::from(d) * da * inv;
            ((numer + out_a / 2) / out_a).min(255) as u8
        };
        Self::rgba(
            channel(self.r(), dst.r()),
            channel(self.g(), dst.g()),
            channel(self.b(), dst.b()),
            ((out_a + 127) / 255).min(255) as u8,
        )
    }

    /// Mean of a set of colors, channel by channel. Empty input is transparent.
    pub fn average(colors: impl IntoIterator<Item = Self>) -> Self {
        let mut sum = [0u64; 4];
        let mut n = 0u64;
        for c in colors {
            sum[0] += u64::from(c.r());
            sum[1] += u64::from(c.g());
            sum[2] += u64::from(c.b());
            sum[3] += u64::from(c.a());
            n += 1;
        }
        if n == 0 {
            return Self::TRANSPARENT;
        }
        let avg = |s: u64| ((s + n / 2) / n) as u8;
        Self::rgba(avg(sum[0]), avg(sum[1]), avg(sum[2]), avg(sum[3]))
    }
}

bitflags::bitflags! {
    /// Cell style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD    = 0b0000_0001;
        const DIM     = 0b0000_0010;
        const ITALIC  = 0b0000_0100;
        const REVERSE = 0b0000_1000;
    }
}

/// One cell of the reference surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Displayed character.
    pub ch: char,
    /// Foreground color.
    pub fg: PackedRgba,
    /// Background color.
    pub bg: PackedRgba,
    /// Style flags.
    pub flags: StyleFlags,
}

impl Cell {
    /// The blank cell: a space on a transparent background.
    pub const BLANK: Self = Self {
        ch: ' ',
        fg: PackedRgba::WHITE,
        bg: PackedRgba::TRANSPARENT,
        flags: StyleFlags::empty(),
    };

    /// Create a cell showing `ch` with default colors.
    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self { ch, ..Self::BLANK }
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: PackedRgba) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Display width of the cell's character (0, 1 or 2).
    #[inline]
    pub fn width(&self) -> usize {
        self.ch.width().unwrap_or(0)
    }

    /// Whether the cell is blank.
    #[inline]
    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}
