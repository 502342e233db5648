#![forbid(unsafe_code)]

//! A minimal in-process file browser.
//!
//! Renders a directory as a list (one row per entry) or a grid of tiles. The
//! grid view is a subsystem loaded on first use, which is when setup
//! callbacks registered for it run.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use stubmark_core::entry::{FileEntry, HostEntry};
use stubmark_core::geometry::{Rect, Size};
use stubmark_render::buffer::Buffer;
use stubmark_render::cell::{Cell, PackedRgba};
use stubmark_render::surface::Surface;
use stubmark_runtime::host::{
    GRID_SUBSYSTEM, GridExtension, GridSetup, HostFramework, MethodSlot, RenderFn,
};
use stubmark_runtime::ViewVariant;

/// Grid tile size in cells.
pub const TILE: Size = Size::new(14, 5);

const DIR_COLOR: PackedRgba = PackedRgba::rgb(110, 160, 255);

/// Directory entries: directories first, then files, each alphabetical.
pub fn read_entries(dir: &Path) -> io::Result<Vec<FileEntry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for item in fs::read_dir(dir)? {
        let item = item?;
        let name = item.file_name().to_string_lossy().into_owned();
        if item.file_type()?.is_dir() {
            dirs.push(FileEntry::dir(name, item.path()));
        } else {
            files.push(FileEntry::file(name, item.path()));
        }
    }
    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));
    dirs.extend(files);
    Ok(dirs)
}

fn label_cell(entry: &FileEntry, ch: char) -> Cell {
    let cell = Cell::from_char(ch);
    if entry.is_directory() {
        cell.with_fg(DIR_COLOR)
    } else {
        cell
    }
}

fn write_label(surface: &mut dyn Surface, entry: &FileEntry, x: u16, y: u16, width: u16) -> u16 {
    let label = if entry.is_directory() {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    };
    let mut col = x;
    for ch in label.chars().take(usize::from(width)) {
        if surface.put(col, y, label_cell(entry, ch)).is_err() {
            break;
        }
        col += 1;
    }
    col - x
}

/// Row renderer; returns the number of label cells written.
fn list_row() -> RenderFn<FileEntry, u16> {
    Arc::new(|entry: &FileEntry, surface: &mut dyn Surface| {
        entry
            .primary_content_rect()
            .map_or(0, |rect| write_label(surface, entry, rect.x, rect.y, rect.width))
    })
}

/// Tile renderer: a framed cover with the label underneath.
fn grid_tile() -> RenderFn<FileEntry, u16> {
    Arc::new(|entry: &FileEntry, surface: &mut dyn Surface| {
        let Some(rect) = entry.primary_content_rect() else {
            return 0;
        };
        if rect.height > 1 {
            let cover = Rect::new(rect.x, rect.y, rect.width.saturating_sub(1), rect.height - 1);
            let shade = if entry.is_directory() { '▒' } else { '░' };
            let _ = surface.fill(cover, Cell::from_char(shade));
        }
        write_label(surface, entry, rect.x, rect.bottom() - 1, rect.width.saturating_sub(1))
    })
}

/// The demo host.
pub struct Browser {
    list: MethodSlot<FileEntry, u16>,
    grid: Option<GridExtension<FileEntry, u16>>,
    pending: Vec<GridSetup<FileEntry, u16>>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

impl Browser {
    pub fn new() -> Self {
        Self {
            list: MethodSlot::new("list_row", list_row()),
            grid: None,
            pending: Vec::new(),
        }
    }

    fn load_grid(&mut self) -> &GridExtension<FileEntry, u16> {
        let pending = &mut self.pending;
        self.grid.get_or_insert_with(|| {
            let mut ext = GridExtension::new(MethodSlot::new("grid_tile", grid_tile()));
            for setup in pending.drain(..) {
                setup(&mut ext);
            }
            tracing::debug!("grid view loaded");
            ext
        })
    }

    /// Render `entries` in `view`, returning how many were drawn.
    pub fn render(&mut self, view: ViewVariant, entries: &[FileEntry], buf: &mut Buffer) -> usize {
        match view {
            ViewVariant::List => {
                let width = buf.width();
                let mut drawn = 0;
                for (entry, row) in entries.iter().zip(0..buf.height()) {
                    let placed = entry.clone().with_content(Rect::new(0, row, width, 1));
                    self.list.call(&placed, buf);
                    drawn += 1;
                }
                drawn
            }
            ViewVariant::Grid => {
                let (width, height) = (buf.width(), buf.height());
                let ext = self.load_grid();
                let per_row = (width / TILE.width).max(1);
                let mut drawn = 0;
                for (i, entry) in entries.iter().enumerate() {
                    let Ok(i) = u16::try_from(i) else { break };
                    let x = (i % per_row) * TILE.width;
                    let y = (i / per_row).saturating_mul(TILE.height);
                    if u32::from(y) + u32::from(TILE.height) > u32::from(height) {
                        break;
                    }
                    let placed = entry
                        .clone()
                        .with_content(Rect::new(x, y, TILE.width.min(width), TILE.height));
                    ext.item_render().call(&placed, buf);
                    drawn += 1;
                }
                drawn
            }
        }
    }
}

impl HostFramework for Browser {
    type Entry = FileEntry;
    type Output = u16;

    fn list_slot(&mut self) -> Option<&mut MethodSlot<FileEntry, u16>> {
        Some(&mut self.list)
    }

    fn register_on_load(&mut self, subsystem: &str, setup: GridSetup<FileEntry, u16>) -> bool {
        if subsystem != GRID_SUBSYSTEM {
            return false;
        }
        match self.grid.as_mut() {
            Some(ext) => setup(ext),
            None => self.pending.push(setup),
        }
        true
    }
}

/// Buffer rows as text with trailing blanks removed.
pub fn to_text(buf: &Buffer) -> String {
    (0..buf.height())
        .map(|y| buf.row_text(y).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stubmark_core::oracle::ContentMarkerOracle;
    use stubmark_harness::assert_buffer_text;
    use stubmark_runtime::{BadgeConfig, IntegrationRegistry};

    fn library() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("real.epub"), b"PK\x03\x04 actual book").unwrap();
        fs::write(dir.path().join("stub.epub"), b"stubmark-placeholder v1").unwrap();
        fs::write(dir.path().join("notes.txt"), b"stubmark-placeholder").unwrap();
        fs::create_dir(dir.path().join("series")).unwrap();
        dir
    }

    #[test]
    fn entries_are_sorted_dirs_first() {
        let dir = library();
        let names: Vec<_> = read_entries(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["series", "notes.txt", "real.epub", "stub.epub"]);
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_entries(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn list_view_badges_only_the_stub() {
        let dir = library();
        let entries = read_entries(dir.path()).unwrap();
        let mut browser = Browser::new();
        let mut registry = IntegrationRegistry::new(BadgeConfig::default());
        assert!(registry.install(
            &mut browser,
            ViewVariant::List,
            Arc::new(ContentMarkerOracle::default()),
        ));

        let mut buf = Buffer::new(16, 4);
        assert_eq!(browser.render(ViewVariant::List, &entries, &mut buf), 4);
        assert_buffer_text!(&buf, ["series/", "notes.txt", "real.epub", "stub.epub    [↓]"]);
        assert_eq!(registry.stats(ViewVariant::List).badges_rendered, 1);
    }

    #[test]
    fn grid_view_runs_setup_on_first_use() {
        let dir = library();
        let entries = read_entries(dir.path()).unwrap();
        let mut browser = Browser::new();
        let mut registry = IntegrationRegistry::new(BadgeConfig::default());
        assert!(registry.install(
            &mut browser,
            ViewVariant::Grid,
            Arc::new(ContentMarkerOracle::default()),
        ));
        assert!(browser.grid.is_none());

        let mut buf = Buffer::new(56, 5);
        assert_eq!(browser.render(ViewVariant::Grid, &entries, &mut buf), 4);
        assert_eq!(registry.stats(ViewVariant::Grid).badges_rendered, 1);
        assert!(to_text(&buf).contains('↓'));
    }
}
