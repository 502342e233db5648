#![forbid(unsafe_code)]

//! Reference cell-grid surface.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s stored row-major
//! (`index = y * width + x`). It is the surface the test host and the demo
//! render into.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. A refused draw leaves every cell untouched

use stubmark_core::geometry::{DisplayScale, Rect};

use crate::cell::{Cell, PackedRgba};
use crate::surface::{DrawError, RasterImage, Surface};

/// A 2D grid of cells.
///
/// ```
/// use stubmark_render::buffer::Buffer;
/// use stubmark_render::cell::Cell;
/// use stubmark_render::surface::Surface;
///
/// let mut buf = Buffer::new(8, 2);
/// buf.put(0, 0, Cell::from_char('H')).unwrap();
/// assert_eq!(buf.row_text(0), "H       ");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    scale: DisplayScale,
}

impl Buffer {
    /// Create a blank buffer.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
            scale: DisplayScale::UNIT,
        }
    }

    /// Report a different display scale to overlays.
    #[must_use]
    pub fn with_scale(mut self, scale: DisplayScale) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Cell at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Mutable cell at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write text starting at `(x, y)`, clipped at the right edge.
    ///
    /// Returns the x position after the last written character. Characters
    /// that are not exactly one cell wide are skipped.
    pub fn write_str(&mut self, mut x: u16, y: u16, text: &str, template: Cell) -> u16 {
        for ch in text.chars() {
            let cell = Cell { ch, ..template };
            if cell.width() != 1 {
                continue;
            }
            let Some(idx) = self.index(x, y) else {
                break;
            };
            self.cells[idx] = cell;
            x = x.saturating_add(1);
        }
        x
    }

    /// Characters of row `y` as a string (empty when out of bounds).
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn check(&self, rect: Rect) -> Result<(), DrawError> {
        if Surface::bounds(self).contains_rect(&rect) {
            Ok(())
        } else {
            Err(DrawError::OutOfBounds { rect })
        }
    }

    fn composite(&mut self, idx: usize, cell: Cell) {
        let bg = cell.bg.over(self.cells[idx].bg);
        self.cells[idx] = Cell { bg, ..cell };
    }
}

impl Surface for Buffer {
    fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    fn scale(&self) -> DisplayScale {
        self.scale
    }

    fn fill(&mut self, rect: Rect, cell: Cell) -> Result<(), DrawError> {
        self.check(rect)?;
        if cell.width() != 1 {
            return Err(DrawError::Unsupported("multi-cell glyph"));
        }
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let idx = y as usize * self.width as usize + x as usize;
                self.composite(idx, cell);
            }
        }
        Ok(())
    }

    fn put(&mut self, x: u16, y: u16, cell: Cell) -> Result<(), DrawError> {
        if cell.width() != 1 {
            return Err(DrawError::Unsupported("multi-cell glyph"));
        }
        let idx = self.index(x, y).ok_or(DrawError::OutOfBounds {
            rect: Rect::new(x, y, 1, 1),
        })?;
        self.composite(idx, cell);
        Ok(())
    }

    /// Each cell takes the mean color of the image pixels that map onto it,
    /// as its background. Cell characters are left as they are.
    fn blit(&mut self, rect: Rect, image: &RasterImage) -> Result<(), DrawError> {
        self.check(rect)?;
        if rect.is_empty() {
            return Ok(());
        }
        let (iw, ih) = (image.width() as u64, image.height() as u64);
        let (rw, rh) = (u64::from(rect.width), u64::from(rect.height));
        for cy in 0..rect.height {
            let py0 = u64::from(cy) * ih / rh;
            let py1 = ((u64::from(cy) + 1) * ih / rh).max(py0 + 1);
            for cx in 0..rect.width {
                let px0 = u64::from(cx) * iw / rw;
                let px1 = ((u64::from(cx) + 1) * iw / rw).max(px0 + 1);
                let color = PackedRgba::average(
                    (py0..py1.min(ih))
                        .flat_map(|py| (px0..px1.min(iw)).map(move |px| (px, py)))
                        .filter_map(|(px, py)| image.pixel(px as u32, py as u32)),
                );
                let (x, y) = (rect.x + cx, rect.y + cy);
                let idx = y as usize * self.width as usize + x as usize;
                let existing = self.cells[idx];
                self.composite(idx, existing.with_bg(color));
            }
        }
        Ok(())
    }
}
