#![forbid(unsafe_code)]

//! Bounded placeholder verdict cache.
//!
//! Rendering asks about the same handful of paths every frame while the
//! oracle may have to open the file to answer. The cache remembers definite
//! verdicts per normalized path until they are invalidated.
//!
//! # Eviction
//!
//! The cache holds at most `capacity` entries. Inserting a new key into a
//! full cache discards every entry and keeps only the new one
//! (flush-on-overflow). Paths seen before the flush are asked again on their
//! next query.
//!
//! # Oracle failures
//!
//! A failed oracle call answers `false` for that query and is not stored, so
//! the next query asks again. An oracle that panics counts as failed; the
//! panic stops here and never reaches the render call.
//!
//! # Example
//! ```
//! use std::path::Path;
//! use stubmark_core::oracle::OracleError;
//! use stubmark_runtime::cache::PlaceholderCache;
//!
//! let oracle = |path: &Path| -> Result<bool, OracleError> {
//!     Ok(path.ends_with("book.epub"))
//! };
//! let mut cache = PlaceholderCache::new(100);
//!
//! assert_eq!(cache.lookup(Path::new("/lib/book.epub")), None);
//! assert!(cache.query(Path::new("/lib/book.epub"), &oracle));
//! assert_eq!(cache.lookup(Path::new("/lib/book.epub")), Some(true));
//!
//! let stats = cache.stats();
//! assert_eq!((stats.hits, stats.misses), (0, 1));
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use stubmark_core::entry::PathKey;
use stubmark_core::oracle::{OracleError, PlaceholderOracle};

use crate::interceptor::panic_message;

/// Default bound on cached verdicts.
pub const MAX_CACHE_SIZE: usize = 100;

/// Counters describing cache behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Queries answered from the cache.
    pub hits: u64,
    /// Queries that asked the oracle.
    pub misses: u64,
    /// Times the cache was discarded on overflow.
    pub flushes: u64,
    /// Oracle calls that failed.
    pub oracle_errors: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum number of entries.
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of queries answered from the cache (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Path to placeholder verdict map with flush-on-overflow eviction.
///
/// Not thread-safe on its own; share it through [`SharedCache`].
#[derive(Debug)]
pub struct PlaceholderCache {
    entries: FxHashMap<PathKey, bool>,
    capacity: usize,
    hits: u64,
    misses: u64,
    flushes: u64,
    oracle_errors: u64,
}

impl PlaceholderCache {
    /// Create a cache bounded to `capacity` entries (at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: FxHashMap::default(),
            capacity,
            hits: 0,
            misses: 0,
            flushes: 0,
            oracle_errors: 0,
        }
    }

    /// Cached verdict for `path`, if any. Does not touch the counters.
    #[must_use]
    pub fn lookup(&self, path: &Path) -> Option<bool> {
        self.entries.get(&PathKey::new(path)).copied()
    }

    /// Cached verdict for `path`, asking `oracle` on a miss.
    pub fn query<O>(&mut self, path: &Path, oracle: &O) -> bool
    where
        O: PlaceholderOracle + ?Sized,
    {
        let key = PathKey::new(path);
        if let Some(&verdict) = self.entries.get(&key) {
            self.hits += 1;
            return verdict;
        }

        self.misses += 1;
        let verdict = catch_unwind(AssertUnwindSafe(|| oracle.is_placeholder(path)))
            .unwrap_or_else(|payload| {
                Err(OracleError::Undecidable(format!(
                    "oracle panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });
        match verdict {
            Ok(verdict) => {
                self.insert(key, verdict);
                verdict
            }
            Err(err) => {
                self.oracle_errors += 1;
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "placeholder oracle failed, treating as regular file"
                );
                false
            }
        }
    }

    fn insert(&mut self, key: PathKey, verdict: bool) {
        if self.entries.len() >= self.capacity {
            tracing::debug!(
                capacity = self.capacity,
                "placeholder cache full, flushing"
            );
            self.entries.clear();
            self.flushes += 1;
        }
        self.entries.insert(key, verdict);
    }

    /// Forget the verdict for `path`. Absent keys are ignored.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&PathKey::new(path)).is_some()
    }

    /// Forget every verdict.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            flushes: self.flushes,
            oracle_errors: self.oracle_errors,
            size: self.entries.len(),
            capacity: self.capacity,
        }
    }

    /// Zero the counters, keeping the entries.
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.flushes = 0;
        self.oracle_errors = 0;
    }
}

impl Default for PlaceholderCache {
    fn default() -> Self {
        Self::new(MAX_CACHE_SIZE)
    }
}

/// A [`PlaceholderCache`] shared by every interceptor of one registry.
///
/// [`query`](Self::query) holds the lock across lookup, oracle call and
/// insert, so concurrent renders never ask the oracle twice for one path.
/// An oracle must not query the same cache from inside `is_placeholder`.
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    inner: Arc<Mutex<PlaceholderCache>>,
}

impl SharedCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::from_cache(PlaceholderCache::new(capacity))
    }

    #[must_use]
    pub fn from_cache(cache: PlaceholderCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PlaceholderCache> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn lookup(&self, path: &Path) -> Option<bool> {
        self.lock().lookup(path)
    }

    pub fn query<O>(&self, path: &Path, oracle: &O) -> bool
    where
        O: PlaceholderOracle + ?Sized,
    {
        self.lock().query(path, oracle)
    }

    pub fn invalidate(&self, path: &Path) -> bool {
        self.lock().invalidate(path)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn reset_stats(&self) {
        self.lock().reset_stats();
    }
}
