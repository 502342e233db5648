#![forbid(unsafe_code)]

//! A simulated host framework.
//!
//! The list view exposes its row renderer as a replaceable slot. The grid
//! view lives in a subsystem that loads on demand and runs registered setup
//! callbacks when it does. Each piece can be switched off to play an older
//! or stripped-down host.

use std::sync::Arc;

use stubmark_core::entry::{FileEntry, HostEntry};
use stubmark_core::geometry::{Rect, Size};
use stubmark_render::buffer::Buffer;
use stubmark_render::cell::Cell;
use stubmark_render::surface::Surface;
use stubmark_runtime::host::{
    GRID_EXTENSION_VERSION, GRID_SUBSYSTEM, GridExtension, GridSetup, HostFramework, MethodSlot,
    RenderFn,
};

/// Name of the list row slot.
pub const LIST_SLOT: &str = "render_row";
/// Name of the grid tile slot.
pub const GRID_SLOT: &str = "render_tile";

/// Row renderer: the entry name at the left of its content rect.
///
/// Returns the column after the last character written.
pub fn list_row_renderer() -> RenderFn<FileEntry, u16> {
    Arc::new(|entry: &FileEntry, surface: &mut dyn Surface| {
        let Some(rect) = entry.primary_content_rect() else {
            return 0;
        };
        write_clipped(surface, rect.x, rect.y, &entry.name, rect.width)
    })
}

/// Tile renderer: a `#` cover filling the tile but its last row, and the
/// name on the last row.
pub fn grid_tile_renderer() -> RenderFn<FileEntry, u16> {
    Arc::new(|entry: &FileEntry, surface: &mut dyn Surface| {
        let Some(rect) = entry.primary_content_rect() else {
            return 0;
        };
        if rect.height > 1 {
            let cover = Rect::new(rect.x, rect.y, rect.width, rect.height - 1);
            let _ = surface.fill(cover, Cell::from_char(if entry.is_dir { '+' } else { '#' }));
        }
        write_clipped(surface, rect.x, rect.bottom() - 1, &entry.name, rect.width)
    })
}

fn write_clipped(surface: &mut dyn Surface, x: u16, y: u16, text: &str, width: u16) -> u16 {
    let mut col = x;
    for ch in text.chars().take(width as usize) {
        if surface.put(col, y, Cell::from_char(ch)).is_err() {
            break;
        }
        col += 1;
    }
    col
}

/// Configurable in-process host.
pub struct MockHost {
    list: Option<MethodSlot<FileEntry, u16>>,
    grid: Option<GridExtension<FileEntry, u16>>,
    grid_version: u32,
    hooks: bool,
    pending: Vec<GridSetup<FileEntry, u16>>,
    registrations: usize,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    /// A host with a list slot, load hooks, and an unloaded grid subsystem.
    pub fn new() -> Self {
        Self {
            list: Some(MethodSlot::new(LIST_SLOT, list_row_renderer())),
            grid: None,
            grid_version: GRID_EXTENSION_VERSION,
            hooks: true,
            pending: Vec::new(),
            registrations: 0,
        }
    }

    /// Drop the list slot.
    #[must_use]
    pub fn without_list_slot(mut self) -> Self {
        self.list = None;
        self
    }

    /// Drop support for load callbacks.
    #[must_use]
    pub fn without_hooks(mut self) -> Self {
        self.hooks = false;
        self
    }

    /// Report `version` from the grid extension once loaded.
    #[must_use]
    pub fn with_grid_version(mut self, version: u32) -> Self {
        self.grid_version = version;
        self
    }

    /// Load the grid subsystem and run pending setups. Loading twice is a
    /// no-op.
    pub fn load_grid(&mut self) {
        if self.grid.is_some() {
            return;
        }
        let slot = MethodSlot::new(GRID_SLOT, grid_tile_renderer());
        let mut ext = GridExtension::with_version(self.grid_version, slot);
        for setup in self.pending.drain(..) {
            setup(&mut ext);
        }
        self.grid = Some(ext);
    }

    pub fn is_grid_loaded(&self) -> bool {
        self.grid.is_some()
    }

    /// Setups waiting for the grid subsystem.
    pub fn pending_setups(&self) -> usize {
        self.pending.len()
    }

    /// Accepted `register_on_load` calls.
    pub fn registrations(&self) -> usize {
        self.registrations
    }

    pub fn list(&self) -> Option<&MethodSlot<FileEntry, u16>> {
        self.list.as_ref()
    }

    pub fn grid(&self) -> Option<&GridExtension<FileEntry, u16>> {
        self.grid.as_ref()
    }

    /// Lay `entries` out one per row across the buffer and render each with
    /// the list slot. Empty when there is no list slot.
    pub fn render_list(&self, entries: &[FileEntry], buf: &mut Buffer) -> Vec<u16> {
        let Some(slot) = &self.list else {
            return Vec::new();
        };
        entries
            .iter()
            .zip(0..buf.height())
            .map(|(entry, row)| {
                let placed = entry.clone().with_content(Rect::new(0, row, buf.width(), 1));
                slot.call(&placed, buf)
            })
            .collect()
    }

    /// Lay `entries` out as `tile`-sized tiles, left to right and top to
    /// bottom, and render each with the grid slot. Empty until the grid
    /// subsystem is loaded.
    pub fn render_grid(&self, entries: &[FileEntry], tile: Size, buf: &mut Buffer) -> Vec<u16> {
        let Some(ext) = &self.grid else {
            return Vec::new();
        };
        if tile.is_empty() {
            return Vec::new();
        }
        let per_row = (buf.width() / tile.width).max(1);
        let mut out = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let i = i as u16;
            let x = (i % per_row) * tile.width;
            let y = (i / per_row) * tile.height;
            if y + tile.height > buf.height() {
                break;
            }
            let placed = entry
                .clone()
                .with_content(Rect::new(x, y, tile.width, tile.height));
            out.push(ext.item_render().call(&placed, buf));
        }
        out
    }
}

impl HostFramework for MockHost {
    type Entry = FileEntry;
    type Output = u16;

    fn list_slot(&mut self) -> Option<&mut MethodSlot<FileEntry, u16>> {
        self.list.as_mut()
    }

    fn register_on_load(&mut self, subsystem: &str, setup: GridSetup<FileEntry, u16>) -> bool {
        if !self.hooks || subsystem != GRID_SUBSYSTEM {
            return false;
        }
        self.registrations += 1;
        match self.grid.as_mut() {
            Some(ext) => setup(ext),
            None => self.pending.push(setup),
        }
        true
    }
}
