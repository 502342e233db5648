//! Property-based invariants for the reference cell buffer.
//!
//! 1. A fill inside the bounds touches exactly the cells of its rect.
//! 2. A fill that reaches outside the bounds is refused and changes nothing.
//! 3. `put` outside the bounds is refused and changes nothing.

use stubmark_core::geometry::Rect;
use stubmark_render::buffer::Buffer;
use stubmark_render::cell::Cell;
use stubmark_render::surface::{DrawError, Surface};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn buffer_strategy() -> impl Strategy<Value = (u16, u16)> {
    (1u16..=40, 1u16..=20)
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0u16..=60, 0u16..=30, 0u16..=30, 0u16..=30)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

/// A buffer size together with a rect that fits inside it.
fn fitting_strategy() -> impl Strategy<Value = ((u16, u16), Rect)> {
    buffer_strategy().prop_flat_map(|(w, h)| {
        (0..=w, 0..=h).prop_flat_map(move |(x, y)| {
            (0..=w - x, 0..=h - y).prop_map(move |(rw, rh)| ((w, h), Rect::new(x, y, rw, rh)))
        })
    })
}

fn seeded(width: u16, height: u16) -> Buffer {
    let mut buf = Buffer::new(width, height);
    for y in 0..height {
        buf.write_str(0, y, &"abcdefghij".repeat(4), Cell::BLANK);
    }
    buf
}

// ═════════════════════════════════════════════════════════════════════════
// 1. In-bounds fills
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fill_touches_only_its_rect(((w, h), rect) in fitting_strategy()) {
        let mut buf = seeded(w, h);
        let before = buf.clone();

        prop_assert!(buf.fill(rect, Cell::from_char('#')).is_ok());
        for y in 0..h {
            for x in 0..w {
                let cell = buf.get(x, y).unwrap();
                if rect.contains(x, y) {
                    prop_assert_eq!(cell.ch, '#');
                } else {
                    prop_assert_eq!(cell, before.get(x, y).unwrap());
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Out-of-bounds fills
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn out_of_bounds_fill_changes_nothing((w, h) in buffer_strategy(), rect in rect_strategy()) {
        let mut buf = seeded(w, h);
        prop_assume!(!buf.bounds().contains_rect(&rect));
        let before = buf.clone();

        prop_assert_eq!(
            buf.fill(rect, Cell::from_char('#')),
            Err(DrawError::OutOfBounds { rect })
        );
        prop_assert_eq!(buf, before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Out-of-bounds puts
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn out_of_bounds_put_changes_nothing((w, h) in buffer_strategy(), x in 0u16..=60, y in 0u16..=30) {
        let mut buf = seeded(w, h);
        prop_assume!(x >= w || y >= h);
        let before = buf.clone();

        prop_assert!(buf.put(x, y, Cell::from_char('#')).is_err());
        prop_assert_eq!(buf, before);
    }
}
