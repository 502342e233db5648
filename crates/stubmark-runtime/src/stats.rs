#![forbid(unsafe_code)]

//! Per-variant interceptor counters.
//!
//! Diagnostics only: nothing reads them to decide what to draw.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one installed interceptor.
#[derive(Debug, Default)]
pub struct InterceptorStats {
    calls: AtomicU64,
    placeholders_found: AtomicU64,
    badges_rendered: AtomicU64,
    render_failures: AtomicU64,
}

/// A point-in-time copy of [`InterceptorStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Wrapped render calls seen while attached.
    pub calls: u64,
    /// Entries the oracle confirmed as placeholders.
    pub placeholders_found: u64,
    /// Badges painted.
    pub badges_rendered: u64,
    /// Placeholders left unbadged: missing geometry or a failed draw.
    pub render_failures: u64,
}

impl InterceptorStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_placeholder(&self) {
        self.placeholders_found.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_badge(&self) {
        self.badges_rendered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_failure(&self) {
        self.render_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            placeholders_found: self.placeholders_found.load(Ordering::Relaxed),
            badges_rendered: self.badges_rendered.load(Ordering::Relaxed),
            render_failures: self.render_failures.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.placeholders_found.store(0, Ordering::Relaxed);
        self.badges_rendered.store(0, Ordering::Relaxed);
        self.render_failures.store(0, Ordering::Relaxed);
    }
}
