#![forbid(unsafe_code)]

//! Test support for stubmark.
//!
//! - [`MockHost`]: a host framework with a list slot and a loadable grid
//!   subsystem, each of which can be left out to simulate older hosts.
//! - [`ScriptedOracle`]: an oracle answering from a fixed table and counting
//!   calls.
//! - Buffer → text helpers and [`assert_buffer_text!`] for comparing rendered
//!   output.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use stubmark_harness::{MockHost, ScriptedOracle, buffer_to_text};
//! use stubmark_render::buffer::Buffer;
//! use stubmark_runtime::{BadgeConfig, IntegrationRegistry, ViewVariant};
//! use stubmark_core::entry::FileEntry;
//!
//! let mut host = MockHost::new();
//! let oracle = Arc::new(ScriptedOracle::new().placeholder("/lib/book.epub"));
//! let mut registry = IntegrationRegistry::new(BadgeConfig::default());
//! assert!(registry.install(&mut host, ViewVariant::List, oracle));
//!
//! let mut buf = Buffer::new(12, 1);
//! host.render_list(&[FileEntry::file("book.epub", "/lib/book.epub")], &mut buf);
//! assert_eq!(buffer_to_text(&buf), "book.epub[↓]");
//! ```

pub mod host;
pub mod oracle;

use std::fmt::Write as FmtWrite;

use stubmark_render::buffer::Buffer;

pub use host::{MockHost, grid_tile_renderer, list_row_renderer};
pub use oracle::ScriptedOracle;
pub use stubmark_core::geometry::Rect;
pub use stubmark_render::{buffer, cell};

// ============================================================================
// Buffer → Text Conversion
// ============================================================================

/// Convert a `Buffer` to plain text, one line per row.
pub fn buffer_to_text(buf: &Buffer) -> String {
    let capacity = (buf.width() as usize + 1) * buf.height() as usize;
    let mut out = String::with_capacity(capacity);
    for y in 0..buf.height() {
        if y > 0 {
            out.push('\n');
        }
        out.push_str(&buf.row_text(y));
    }
    out
}

/// Line-by-line diff: ` ` same, `-` only in `expected`, `+` only in
/// `actual`. Empty when the inputs match.
pub fn diff_text(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    let max_lines = expected_lines.len().max(actual_lines.len());
    let mut out = String::new();
    let mut has_diff = false;

    for i in 0..max_lines {
        let exp = expected_lines.get(i).copied();
        let act = actual_lines.get(i).copied();
        let _ = match (exp, act) {
            (Some(e), Some(a)) if e == a => writeln!(out, " {e}"),
            (Some(e), Some(a)) => {
                has_diff = true;
                writeln!(out, "-{e}\n+{a}")
            }
            (Some(e), None) => {
                has_diff = true;
                writeln!(out, "-{e}")
            }
            (None, Some(a)) => {
                has_diff = true;
                writeln!(out, "+{a}")
            }
            (None, None) => Ok(()),
        };
    }

    if has_diff { out } else { String::new() }
}

/// Panic with a diff unless `buf` renders as `expected` rows.
///
/// Trailing spaces are ignored on both sides.
pub fn assert_buffer_rows(buf: &Buffer, expected: &[&str]) {
    let trim = |s: &str| s.trim_end().to_string();
    let actual: Vec<String> = buffer_to_text(buf).lines().map(trim).collect();
    let expected: Vec<String> = expected.iter().map(|s| trim(s)).collect();
    if actual != expected {
        let diff = diff_text(&expected.join("\n"), &actual.join("\n"));
        panic!("\n=== Buffer mismatch ===\nDiff (- expected, + actual):\n{diff}");
    }
}

/// Assert that a buffer renders as the given rows.
///
/// ```
/// use stubmark_harness::assert_buffer_text;
/// use stubmark_render::buffer::Buffer;
///
/// let mut buf = Buffer::new(4, 2);
/// buf.write_str(0, 1, "ok", Default::default());
/// assert_buffer_text!(&buf, ["", "ok"]);
/// ```
#[macro_export]
macro_rules! assert_buffer_text {
    ($buf:expr, [$($row:expr),* $(,)?]) => {
        $crate::assert_buffer_rows($buf, &[$($row),*])
    };
}
