#![forbid(unsafe_code)]

//! stubmark demo binary entry point.

use std::process;
use std::sync::Arc;

use stubmark_core::logging;
use stubmark_core::oracle::ContentMarkerOracle;
use stubmark_demo::browser::{self, Browser};
use stubmark_demo::cli;
use stubmark_render::buffer::Buffer;
use stubmark_runtime::{BadgeConfig, IntegrationRegistry};

fn main() {
    logging::init();
    let opts = cli::Opts::parse();

    let entries = match browser::read_entries(&opts.dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Cannot read {}: {e}", opts.dir.display());
            process::exit(1);
        }
    };

    let oracle = Arc::new(ContentMarkerOracle::new(opts.marker.as_bytes()));
    let mut host = Browser::new();
    let mut registry = IntegrationRegistry::new(BadgeConfig::from_env());
    if !registry.install(&mut host, opts.view, oracle) {
        let reason = registry
            .last_failure(opts.view)
            .map_or_else(|| "unknown reason".to_string(), |r| r.to_string());
        eprintln!("Badges unavailable ({reason}); showing plain listing.");
    }

    let mut buf = Buffer::new(opts.width, opts.height);
    let drawn = host.render(opts.view, &entries, &mut buf);
    println!("{}", browser::to_text(&buf));
    println!();

    let stats = registry.stats(opts.view);
    let cache = registry.cache_stats();
    println!(
        "{} view: {drawn} of {} entries shown, {} placeholders, {} badges, {} failures",
        opts.view,
        entries.len(),
        stats.placeholders_found,
        stats.badges_rendered,
        stats.render_failures,
    );
    println!(
        "cache: {} entries (capacity {}), {} hits, {} misses, {} oracle errors",
        cache.size, cache.capacity, cache.hits, cache.misses, cache.oracle_errors,
    );

    registry.cleanup(&mut host);
}
