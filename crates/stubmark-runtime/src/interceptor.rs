#![forbid(unsafe_code)]

//! Render interception.
//!
//! An [`InterceptorBinding`] carries everything one view variant needs to
//! badge an entry: the shared cache, the oracle, the renderer and counters.
//! [`RenderInterceptor::wrap`] turns a host render function into one that
//! runs the original first and then asks the binding to decorate.
//!
//! Decoration never fails from the host's point of view. Every reason a
//! badge is not drawn is reported as a [`BadgeOutcome`] and the failures
//! among them are counted.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, PoisonError, RwLock};

use stubmark_core::entry::{HostEntry, has_extension};
use stubmark_core::geometry::Rect;
use stubmark_core::oracle::SharedOracle;
use stubmark_render::surface::Surface;
use stubmark_widgets::badge::BadgeRenderer;

use crate::cache::SharedCache;
use crate::host::RenderFn;
use crate::stats::{InterceptorStats, StatsSnapshot};

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One of the two host rendering pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewVariant {
    /// Cover grid ("mosaic") view.
    Grid,
    /// Flat list view.
    List,
}

impl ViewVariant {
    pub const ALL: [ViewVariant; 2] = [ViewVariant::Grid, ViewVariant::List];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Grid => 0,
            Self::List => 1,
        }
    }
}

impl fmt::Display for ViewVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one entry on its way through the interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeOutcome {
    /// The binding has no oracle; the wrapper is a passthrough.
    Disabled,
    /// A directory, or an entry without a file path.
    NotAFile,
    /// A file of some other type.
    OtherType,
    /// The oracle says the file is real content (or could not tell).
    NotPlaceholder,
    /// A placeholder with no content rectangle to pin the badge to.
    GeometryUnavailable,
    /// A placeholder whose badge draw failed.
    DrawFailed,
    /// The badge was painted into this rectangle.
    Drawn(Rect),
}

impl BadgeOutcome {
    #[must_use]
    pub const fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn(_))
    }
}

/// Shared state behind one variant's wrapper.
pub struct InterceptorBinding {
    variant: ViewVariant,
    extension: String,
    cache: SharedCache,
    renderer: BadgeRenderer,
    oracle: RwLock<Option<SharedOracle>>,
    stats: InterceptorStats,
}

impl InterceptorBinding {
    /// A detached binding. Call [`attach`](Self::attach) to enable it.
    pub fn new(
        variant: ViewVariant,
        extension: impl Into<String>,
        cache: SharedCache,
        renderer: BadgeRenderer,
    ) -> Self {
        Self {
            variant,
            extension: extension.into(),
            cache,
            renderer,
            oracle: RwLock::new(None),
            stats: InterceptorStats::new(),
        }
    }

    pub fn variant(&self) -> ViewVariant {
        self.variant
    }

    /// File extension this binding badges.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn renderer(&self) -> &BadgeRenderer {
        &self.renderer
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Start decorating with `oracle`.
    pub fn attach(&self, oracle: SharedOracle) {
        *self.oracle.write().unwrap_or_else(PoisonError::into_inner) = Some(oracle);
    }

    /// Stop decorating and zero the counters. The wrapper keeps calling
    /// through to the original render function.
    pub fn detach(&self) {
        *self.oracle.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.stats.reset();
    }

    pub fn is_attached(&self) -> bool {
        self.oracle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn oracle(&self) -> Option<SharedOracle> {
        self.oracle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Badge `entry` on `surface` if it is a placeholder.
    ///
    /// Runs after the host has drawn the entry.
    pub fn decorate<E>(&self, entry: &E, surface: &mut dyn Surface) -> BadgeOutcome
    where
        E: HostEntry + ?Sized,
    {
        let Some(oracle) = self.oracle() else {
            return BadgeOutcome::Disabled;
        };
        let span = tracing::trace_span!("placeholder_badge", variant = self.variant.as_str());
        let _guard = span.enter();
        self.stats.record_call();

        if entry.is_directory() {
            return BadgeOutcome::NotAFile;
        }
        let Some(path) = entry.path() else {
            return BadgeOutcome::NotAFile;
        };
        if !has_extension(path, &self.extension) {
            return BadgeOutcome::OtherType;
        }
        if !self.cache.query(path, oracle.as_ref()) {
            return BadgeOutcome::NotPlaceholder;
        }
        self.stats.record_placeholder();

        let Some(anchor) = entry.primary_content_rect() else {
            self.stats.record_failure();
            tracing::debug!(path = %path.display(), "placeholder has no content rect, badge skipped");
            return BadgeOutcome::GeometryUnavailable;
        };

        match catch_unwind(AssertUnwindSafe(|| self.renderer.render(surface, anchor))) {
            Ok(Ok(painted)) => {
                self.stats.record_badge();
                tracing::trace!(path = %path.display(), ?painted, "badge drawn");
                BadgeOutcome::Drawn(painted)
            }
            Ok(Err(err)) => {
                self.stats.record_failure();
                tracing::debug!(path = %path.display(), error = %err, "badge draw failed");
                BadgeOutcome::DrawFailed
            }
            Err(payload) => {
                self.stats.record_failure();
                let message = panic_message(payload.as_ref());
                tracing::debug!(path = %path.display(), panic = %message, "badge draw panicked");
                BadgeOutcome::DrawFailed
            }
        }
    }
}

impl fmt::Debug for InterceptorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorBinding")
            .field("variant", &self.variant)
            .field("extension", &self.extension)
            .field("attached", &self.is_attached())
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

/// Decorator that adds the badge step to a host render function.
#[derive(Debug, Clone)]
pub struct RenderInterceptor {
    binding: Arc<InterceptorBinding>,
}

impl RenderInterceptor {
    pub fn new(binding: Arc<InterceptorBinding>) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &Arc<InterceptorBinding> {
        &self.binding
    }

    /// Wrap `original`: call it, keep its result, then decorate.
    pub fn wrap<E, R>(&self, original: RenderFn<E, R>) -> RenderFn<E, R>
    where
        E: HostEntry + 'static,
        R: 'static,
    {
        let binding = Arc::clone(&self.binding);
        Arc::new(move |entry: &E, surface: &mut dyn Surface| {
            let output = original(entry, &mut *surface);
            binding.decorate(entry, surface);
            output
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stubmark_core::entry::FileEntry;
    use stubmark_core::oracle::{OracleError, PlaceholderOracle};
    use stubmark_render::buffer::Buffer;
    use stubmark_render::cell::Cell;
    use stubmark_render::surface::DrawError;
    use stubmark_widgets::badge::BadgeStyle;
    use tracing_test::traced_test;

    struct Fixed {
        verdict: Result<bool, &'static str>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(verdict: Result<bool, &'static str>) -> Arc<Self> {
            Arc::new(Self {
                verdict,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl PlaceholderOracle for Fixed {
        fn is_placeholder(&self, _path: &Path) -> Result<bool, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict
                .map_err(|msg| OracleError::Undecidable(msg.to_string()))
        }
    }

    fn binding(variant: ViewVariant, oracle: Option<Arc<Fixed>>) -> Arc<InterceptorBinding> {
        let style = match variant {
            ViewVariant::Grid => BadgeStyle::grid(),
            ViewVariant::List => BadgeStyle::list(),
        };
        let binding = InterceptorBinding::new(
            variant,
            "epub",
            SharedCache::default(),
            BadgeRenderer::new(style),
        );
        if let Some(oracle) = oracle {
            binding.attach(oracle);
        }
        Arc::new(binding)
    }

    fn book() -> FileEntry {
        FileEntry::file("book.epub", "/lib/book.epub").with_content(Rect::new(0, 0, 10, 6))
    }

    #[test]
    fn placeholder_with_geometry_is_drawn() {
        let b = binding(ViewVariant::Grid, Some(Fixed::new(Ok(true))));
        let mut buf = Buffer::new(10, 6);
        let outcome = b.decorate(&book(), &mut buf);
        assert_eq!(outcome, BadgeOutcome::Drawn(Rect::new(6, 1, 3, 3)));
        assert_eq!(buf.get(7, 2).unwrap().ch, '↓');
        assert_eq!(b.stats(), StatsSnapshot {
            calls: 1,
            placeholders_found: 1,
            badges_rendered: 1,
            render_failures: 0,
        });
    }

    #[test]
    fn directories_and_virtual_items_are_skipped() {
        let oracle = Fixed::new(Ok(true));
        let b = binding(ViewVariant::List, Some(Arc::clone(&oracle)));
        let mut buf = Buffer::new(10, 1);
        let dir = FileEntry::dir("shelf.epub", "/lib/shelf.epub").with_content(Rect::new(0, 0, 10, 1));
        let virt = FileEntry::virtual_item("Recent").with_content(Rect::new(0, 0, 10, 1));
        assert_eq!(b.decorate(&dir, &mut buf), BadgeOutcome::NotAFile);
        assert_eq!(b.decorate(&virt, &mut buf), BadgeOutcome::NotAFile);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
        assert!(buf.cells().iter().all(Cell::is_blank));
    }

    #[test]
    fn other_extensions_pass_through() {
        let oracle = Fixed::new(Ok(true));
        let b = binding(ViewVariant::List, Some(Arc::clone(&oracle)));
        let mut buf = Buffer::new(10, 1);
        let txt = FileEntry::file("a.txt", "/lib/a.txt").with_content(Rect::new(0, 0, 10, 1));
        assert_eq!(b.decorate(&txt, &mut buf), BadgeOutcome::OtherType);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
        assert_eq!(b.stats().placeholders_found, 0);
    }

    #[test]
    fn extension_match_ignores_case() {
        let b = binding(ViewVariant::List, Some(Fixed::new(Ok(true))));
        let mut buf = Buffer::new(10, 1);
        let upper = FileEntry::file("B.EPUB", "/lib/B.EPUB").with_content(Rect::new(0, 0, 10, 1));
        assert!(b.decorate(&upper, &mut buf).is_drawn());
    }

    #[test]
    fn real_files_are_not_badged() {
        let b = binding(ViewVariant::Grid, Some(Fixed::new(Ok(false))));
        let mut buf = Buffer::new(10, 6);
        assert_eq!(b.decorate(&book(), &mut buf), BadgeOutcome::NotPlaceholder);
        assert!(buf.cells().iter().all(Cell::is_blank));
    }

    #[test]
    fn missing_geometry_counts_one_failure() {
        let b = binding(ViewVariant::Grid, Some(Fixed::new(Ok(true))));
        let mut buf = Buffer::new(10, 6);
        let bare = FileEntry::file("book.epub", "/lib/book.epub");
        assert_eq!(b.decorate(&bare, &mut buf), BadgeOutcome::GeometryUnavailable);
        assert_eq!(b.stats().render_failures, 1);
        assert_eq!(b.stats().badges_rendered, 0);
    }

    #[traced_test]
    #[test]
    fn oracle_error_is_a_negative_verdict() {
        let oracle = Fixed::new(Err("share unreachable"));
        let b = binding(ViewVariant::Grid, Some(Arc::clone(&oracle)));
        let mut buf = Buffer::new(10, 6);
        assert_eq!(b.decorate(&book(), &mut buf), BadgeOutcome::NotPlaceholder);
        assert_eq!(b.decorate(&book(), &mut buf), BadgeOutcome::NotPlaceholder);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
        assert_eq!(b.cache().lookup(Path::new("/lib/book.epub")), None);
        assert!(logs_contain("share unreachable"));
    }

    #[test]
    fn detached_binding_is_a_passthrough() {
        let oracle = Fixed::new(Ok(true));
        let b = binding(ViewVariant::Grid, Some(Arc::clone(&oracle)));
        let mut buf = Buffer::new(10, 6);
        b.decorate(&book(), &mut buf);
        b.detach();
        assert!(!b.is_attached());
        assert_eq!(b.stats(), StatsSnapshot::default());

        let mut fresh = Buffer::new(10, 6);
        assert_eq!(b.decorate(&book(), &mut fresh), BadgeOutcome::Disabled);
        assert!(fresh.cells().iter().all(Cell::is_blank));
        assert_eq!(b.stats().calls, 0);
    }

    /// Surface whose every draw fails.
    struct Refusing;

    impl Surface for Refusing {
        fn bounds(&self) -> Rect {
            Rect::from_size(10, 6)
        }

        fn fill(&mut self, _: Rect, _: Cell) -> Result<(), DrawError> {
            Err(DrawError::Rejected("read-only".into()))
        }

        fn put(&mut self, _: u16, _: u16, _: Cell) -> Result<(), DrawError> {
            Err(DrawError::Rejected("read-only".into()))
        }
    }

    /// Surface that panics when drawn on.
    struct Exploding;

    impl Surface for Exploding {
        fn bounds(&self) -> Rect {
            Rect::from_size(10, 6)
        }

        fn fill(&mut self, _: Rect, _: Cell) -> Result<(), DrawError> {
            panic!("surface lost");
        }

        fn put(&mut self, _: u16, _: u16, _: Cell) -> Result<(), DrawError> {
            panic!("surface lost");
        }
    }

    #[test]
    fn draw_errors_are_counted() {
        let b = binding(ViewVariant::Grid, Some(Fixed::new(Ok(true))));
        assert_eq!(b.decorate(&book(), &mut Refusing), BadgeOutcome::DrawFailed);
        assert_eq!(b.stats().render_failures, 1);
    }

    #[traced_test]
    #[test]
    fn draw_panics_are_contained() {
        let b = binding(ViewVariant::Grid, Some(Fixed::new(Ok(true))));
        assert_eq!(b.decorate(&book(), &mut Exploding), BadgeOutcome::DrawFailed);
        assert_eq!(b.stats().render_failures, 1);
        assert!(logs_contain("surface lost"));
    }

    #[traced_test]
    #[test]
    fn oracle_panics_do_not_reach_the_host() {
        let b = binding(ViewVariant::Grid, None);
        b.attach(Arc::new(|_: &Path| -> Result<bool, OracleError> {
            panic!("oracle blew up")
        }));
        let original: RenderFn<FileEntry, usize> =
            Arc::new(|_: &FileEntry, _: &mut dyn Surface| 7);
        let wrapped = RenderInterceptor::new(Arc::clone(&b)).wrap(original);

        let mut buf = Buffer::new(10, 6);
        assert_eq!(wrapped(&book(), &mut buf), 7);
        assert_eq!(b.decorate(&book(), &mut buf), BadgeOutcome::NotPlaceholder);
        assert!(buf.cells().iter().all(Cell::is_blank));
        assert_eq!(b.cache().stats().oracle_errors, 2);
        assert_eq!(b.cache().lookup(Path::new("/lib/book.epub")), None);
        assert!(logs_contain("oracle blew up"));
    }

    #[test]
    fn wrapper_keeps_original_output() {
        let b = binding(ViewVariant::Grid, Some(Fixed::new(Ok(true))));
        let original: RenderFn<FileEntry, usize> = Arc::new(|entry: &FileEntry, surface: &mut dyn Surface| {
            let _ = surface.put(0, 0, Cell::from_char('#'));
            entry.name.len()
        });
        let wrapped = RenderInterceptor::new(Arc::clone(&b)).wrap(Arc::clone(&original));

        let mut baseline = Buffer::new(10, 6);
        let mut decorated = Buffer::new(10, 6);
        let expected = original(&book(), &mut baseline);
        assert_eq!(wrapped(&book(), &mut decorated), expected);
        assert_eq!(decorated.get(0, 0).unwrap().ch, '#');
        assert_eq!(decorated.get(7, 2).unwrap().ch, '↓');
        assert_eq!(b.stats().badges_rendered, 1);
    }

    #[test]
    fn repaint_is_idempotent() {
        let oracle = Fixed::new(Ok(true));
        let b = binding(ViewVariant::Grid, Some(Arc::clone(&oracle)));
        let mut first = Buffer::new(10, 6);
        let mut second = Buffer::new(10, 6);
        let a = b.decorate(&book(), &mut first);
        let c = b.decorate(&book(), &mut second);
        assert_eq!(a, c);
        assert_eq!(first, second);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn variant_names() {
        assert_eq!(ViewVariant::Grid.to_string(), "grid");
        assert_eq!(ViewVariant::List.as_str(), "list");
        assert_ne!(ViewVariant::Grid.index(), ViewVariant::List.index());
    }
}
