#![forbid(unsafe_code)]

//! Property-based invariants for the list overlay on the simulated host.
//!
//! 1. The wrapped row renderer returns exactly what the host's own returns.
//! 2. Exactly the placeholder `.epub` files get a badge.
//! 3. The oracle is asked once per candidate file, and never about
//!    directories or other file types.

use std::sync::Arc;

use stubmark_core::entry::FileEntry;
use stubmark_harness::{MockHost, ScriptedOracle};
use stubmark_render::buffer::Buffer;
use stubmark_runtime::{BadgeConfig, IntegrationRegistry, ViewVariant};
use proptest::prelude::*;

const WIDTH: u16 = 20;

#[derive(Debug, Clone, Copy)]
struct Spec {
    epub: bool,
    dir: bool,
    placeholder: bool,
}

impl Spec {
    fn is_candidate(self) -> bool {
        self.epub && !self.dir
    }
}

fn row_strategy() -> impl Strategy<Value = Vec<Spec>> {
    prop::collection::vec(
        (any::<bool>(), prop::bool::weighted(0.2), any::<bool>())
            .prop_map(|(epub, dir, placeholder)| Spec { epub, dir, placeholder }),
        1..24,
    )
}

fn build(rows: &[Spec]) -> (Vec<FileEntry>, ScriptedOracle) {
    let mut oracle = ScriptedOracle::new();
    let entries = rows
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let name = format!("f{i}.{}", if spec.epub { "epub" } else { "txt" });
            let path = format!("/lib/{name}");
            if spec.placeholder {
                oracle = std::mem::take(&mut oracle).placeholder(path.clone());
            }
            if spec.dir {
                FileEntry::dir(name, path)
            } else {
                FileEntry::file(name, path)
            }
        })
        .collect();
    (entries, oracle)
}

fn height(rows: &[Spec]) -> u16 {
    u16::try_from(rows.len()).unwrap_or(u16::MAX)
}

proptest! {
    #[test]
    fn overlay_keeps_output_and_badges_only_placeholders(rows in row_strategy()) {
        let (entries, oracle) = build(&rows);
        let oracle = Arc::new(oracle);

        let baseline_host = MockHost::new();
        let mut baseline = Buffer::new(WIDTH, height(&rows));
        let expected = baseline_host.render_list(&entries, &mut baseline);

        let mut host = MockHost::new();
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        prop_assert!(reg.install(&mut host, ViewVariant::List, oracle.clone()));
        let mut buf = Buffer::new(WIDTH, height(&rows));
        let outputs = host.render_list(&entries, &mut buf);
        prop_assert_eq!(outputs, expected);

        let badged = rows.iter().filter(|s| s.is_candidate() && s.placeholder).count() as u64;
        let stats = reg.stats(ViewVariant::List);
        prop_assert_eq!(stats.calls, rows.len() as u64);
        prop_assert_eq!(stats.placeholders_found, badged);
        prop_assert_eq!(stats.badges_rendered, badged);
        prop_assert_eq!(stats.render_failures, 0);

        for (row, spec) in rows.iter().enumerate() {
            let row = row as u16;
            let has_badge = buf.row_text(row).ends_with("[↓]");
            prop_assert_eq!(has_badge, spec.is_candidate() && spec.placeholder);
            if !has_badge {
                prop_assert_eq!(buf.row_text(row), baseline.row_text(row));
            }
        }

        let candidates = rows.iter().filter(|s| s.is_candidate()).count();
        prop_assert_eq!(oracle.calls(), candidates);
    }
}
