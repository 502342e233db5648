#![forbid(unsafe_code)]

//! Integration registry.
//!
//! Owns the placeholder cache and wires one interceptor per view variant
//! into a [`HostFramework`]:
//!
//! - **List**: replace-in-place on the host's list slot. Uninstalling puts
//!   the saved original back.
//! - **Grid**: a setup callback registered with the host, run once the grid
//!   subsystem has loaded. Uninstalling detaches the binding, which turns the
//!   wrapper into a passthrough; the host offers no way to unhook it.
//!
//! A host without the needed extension point is not an error. `install`
//! returns `false`, the reason is logged and kept for
//! [`last_failure`](IntegrationRegistry::last_failure), and the browser keeps
//! working without badges.
//!
//! Installing a variant that is already installed does not wrap again: the
//! registry holds an [`Installed`] token per variant and every wrapped slot
//! carries [`WRAP_MARKER`].

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stubmark_core::entry::HostEntry;
use stubmark_core::oracle::SharedOracle;
use stubmark_widgets::badge::BadgeRenderer;
use stubmark_widgets::icon::BadgeAsset;

use crate::cache::{CacheStats, SharedCache};
use crate::config::BadgeConfig;
use crate::host::{
    GRID_EXTENSION_VERSION, GRID_SUBSYSTEM, GridExtension, GridSetup, HostFramework, MethodSlot,
    RenderFn,
};
use crate::interceptor::{InterceptorBinding, RenderInterceptor, ViewVariant};
use crate::stats::StatsSnapshot;

/// Marker left on every slot this crate wraps.
pub const WRAP_MARKER: &str = "stubmark.placeholder_badge";

/// Why a variant could not be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationUnavailable {
    /// The variant is switched off in [`BadgeConfig`].
    Disabled { variant: ViewVariant },
    /// The host does not expose the variant's extension point.
    ExtensionPointMissing { variant: ViewVariant },
    /// The host's grid extension speaks a different contract version.
    IncompatibleVersion { found: u32, required: u32 },
    /// Someone else already wrapped the slot.
    AlreadyWrapped { slot: String },
    /// The host cannot run load callbacks.
    HooksUnsupported,
}

impl fmt::Display for IntegrationUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled { variant } => write!(f, "{variant} badges are disabled"),
            Self::ExtensionPointMissing { variant } => {
                write!(f, "host has no {variant} render extension point")
            }
            Self::IncompatibleVersion { found, required } => write!(
                f,
                "host grid extension is version {found}, version {required} is required"
            ),
            Self::AlreadyWrapped { slot } => write!(f, "render slot `{slot}` is already wrapped"),
            Self::HooksUnsupported => f.write_str("host does not support load callbacks"),
        }
    }
}

impl std::error::Error for IntegrationUnavailable {}

mod sealed {
    pub trait Sealed {}
}

/// Type-level name of a view variant.
pub trait VariantMarker: sealed::Sealed {
    const VARIANT: ViewVariant;
}

/// The list variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListView;

/// The grid variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridView;

impl sealed::Sealed for ListView {}
impl sealed::Sealed for GridView {}

impl VariantMarker for ListView {
    const VARIANT: ViewVariant = ViewVariant::List;
}

impl VariantMarker for GridView {
    const VARIANT: ViewVariant = ViewVariant::Grid;
}

/// Proof that variant `V` has been wrapped.
///
/// Only the registry creates these, and it keeps at most one per variant.
pub struct Installed<V, E, R> {
    binding: Arc<InterceptorBinding>,
    original: Option<RenderFn<E, R>>,
    _variant: PhantomData<fn() -> V>,
}

impl<V: VariantMarker, E, R> Installed<V, E, R> {
    fn new(binding: Arc<InterceptorBinding>, original: Option<RenderFn<E, R>>) -> Self {
        Self {
            binding,
            original,
            _variant: PhantomData,
        }
    }

    pub fn variant(&self) -> ViewVariant {
        V::VARIANT
    }

    pub fn binding(&self) -> &Arc<InterceptorBinding> {
        &self.binding
    }

    /// Whether the host method replaced at install time was saved.
    pub fn saved_original(&self) -> bool {
        self.original.is_some()
    }
}

impl<V: VariantMarker, E, R> fmt::Debug for Installed<V, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installed")
            .field("variant", &V::VARIANT)
            .field("binding", &self.binding)
            .field("saved_original", &self.original.is_some())
            .finish()
    }
}

type FailureLog = Arc<Mutex<[Option<IntegrationUnavailable>; 2]>>;

fn failures(log: &FailureLog) -> MutexGuard<'_, [Option<IntegrationUnavailable>; 2]> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

fn report(log: &FailureLog, variant: ViewVariant, reason: IntegrationUnavailable) {
    tracing::warn!(
        variant = variant.as_str(),
        reason = %reason,
        "placeholder badges unavailable"
    );
    failures(log)[variant.index()] = Some(reason);
}

/// Swap `slot`'s method for a badging wrapper and return the original.
fn wrap_slot<E, R>(
    slot: &mut MethodSlot<E, R>,
    binding: &Arc<InterceptorBinding>,
) -> Result<RenderFn<E, R>, IntegrationUnavailable>
where
    E: HostEntry + 'static,
    R: 'static,
{
    if slot.marker().is_some() {
        return Err(IntegrationUnavailable::AlreadyWrapped {
            slot: slot.name().to_string(),
        });
    }
    let original = slot.current();
    let wrapped = RenderInterceptor::new(Arc::clone(binding)).wrap(Arc::clone(&original));
    slot.replace(wrapped, Some(WRAP_MARKER));
    Ok(original)
}

fn wrap_grid<E, R>(
    ext: &mut GridExtension<E, R>,
    binding: &Arc<InterceptorBinding>,
) -> Result<(), IntegrationUnavailable>
where
    E: HostEntry + 'static,
    R: 'static,
{
    if ext.version() != GRID_EXTENSION_VERSION {
        return Err(IntegrationUnavailable::IncompatibleVersion {
            found: ext.version(),
            required: GRID_EXTENSION_VERSION,
        });
    }
    wrap_slot(ext.item_render_mut(), binding).map(|_| ())
}

/// Installs and removes placeholder badging on a host.
pub struct IntegrationRegistry<H: HostFramework> {
    config: BadgeConfig,
    cache: SharedCache,
    asset: BadgeAsset,
    oracle: Option<SharedOracle>,
    list: Option<Installed<ListView, H::Entry, H::Output>>,
    grid: Option<Installed<GridView, H::Entry, H::Output>>,
    failures: FailureLog,
}

impl<H: HostFramework> IntegrationRegistry<H> {
    /// Create a registry with its own empty cache.
    ///
    /// Loads the badge icon named by the config, falling back to the glyph.
    pub fn new(config: BadgeConfig) -> Self {
        let asset = BadgeAsset::load_or_glyph(config.icon_path.as_deref());
        let cache = SharedCache::new(config.cache_capacity);
        Self {
            config,
            cache,
            asset,
            oracle: None,
            list: None,
            grid: None,
            failures: FailureLog::default(),
        }
    }

    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    /// The cache every installed interceptor shares.
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    fn new_binding(&self, variant: ViewVariant, oracle: &SharedOracle) -> Arc<InterceptorBinding> {
        let renderer =
            BadgeRenderer::new(*self.config.style(variant)).with_asset(self.asset.clone());
        let binding = InterceptorBinding::new(
            variant,
            self.config.extension.clone(),
            self.cache.clone(),
            renderer,
        );
        binding.attach(Arc::clone(oracle));
        Arc::new(binding)
    }

    /// Badge `variant` on `host`, asking `oracle` about candidate files.
    ///
    /// Returns `false`, without touching the host, when the variant is
    /// disabled or the host lacks the extension point. Installing an
    /// installed variant keeps the existing wrapper and switches it to
    /// `oracle`.
    ///
    /// An `oracle` other than the one last installed empties the shared
    /// cache, so no verdict from the previous oracle outlives it.
    pub fn install(&mut self, host: &mut H, variant: ViewVariant, oracle: SharedOracle) -> bool {
        if !self.config.is_enabled(variant) {
            report(
                &self.failures,
                variant,
                IntegrationUnavailable::Disabled { variant },
            );
            return false;
        }

        let result = match variant {
            ViewVariant::List => self.install_list(host, &oracle),
            ViewVariant::Grid => self.install_grid(host, &oracle),
        };
        match result {
            Ok(true) => {
                if self
                    .oracle
                    .as_ref()
                    .is_some_and(|previous| !Arc::ptr_eq(previous, &oracle))
                {
                    tracing::debug!(variant = variant.as_str(), "oracle changed, cache cleared");
                    self.cache.clear();
                }
                self.oracle = Some(oracle);
                true
            }
            Ok(false) => false,
            Err(reason) => {
                report(&self.failures, variant, reason);
                false
            }
        }
    }

    fn install_list(
        &mut self,
        host: &mut H,
        oracle: &SharedOracle,
    ) -> Result<bool, IntegrationUnavailable> {
        if let Some(installed) = &self.list {
            installed.binding.attach(Arc::clone(oracle));
            tracing::debug!(variant = "list", "already installed, oracle replaced");
            return Ok(true);
        }

        let Some(slot) = host.list_slot() else {
            return Err(IntegrationUnavailable::ExtensionPointMissing {
                variant: ViewVariant::List,
            });
        };
        let binding = self.new_binding(ViewVariant::List, oracle);
        let original = wrap_slot(slot, &binding)?;
        tracing::info!(variant = "list", slot = slot.name(), "placeholder badges installed");

        failures(&self.failures)[ViewVariant::List.index()] = None;
        self.list = Some(Installed::new(binding, Some(original)));
        Ok(true)
    }

    fn install_grid(
        &mut self,
        host: &mut H,
        oracle: &SharedOracle,
    ) -> Result<bool, IntegrationUnavailable> {
        let idx = ViewVariant::Grid.index();
        if let Some(installed) = &self.grid {
            if failures(&self.failures)[idx].is_none() {
                installed.binding.attach(Arc::clone(oracle));
                tracing::debug!(variant = "grid", "already installed, oracle replaced");
                return Ok(true);
            }
            // The earlier setup failed inside the host; register afresh.
            self.grid = None;
        }
        failures(&self.failures)[idx] = None;

        let binding = self.new_binding(ViewVariant::Grid, oracle);
        let setup_binding = Arc::clone(&binding);
        let log = Arc::clone(&self.failures);
        let setup: GridSetup<H::Entry, H::Output> =
            Box::new(move |ext: &mut GridExtension<H::Entry, H::Output>| {
                match wrap_grid(ext, &setup_binding) {
                    Ok(()) => tracing::info!(
                        variant = "grid",
                        slot = ext.item_render().name(),
                        "placeholder badges installed"
                    ),
                    Err(reason) => {
                        setup_binding.detach();
                        report(&log, ViewVariant::Grid, reason);
                    }
                }
            });

        if !host.register_on_load(GRID_SUBSYSTEM, setup) {
            return Err(IntegrationUnavailable::HooksUnsupported);
        }
        // A loaded subsystem runs the setup right away; it has already
        // reported any failure.
        if failures(&self.failures)[idx].is_some() {
            return Ok(false);
        }
        tracing::debug!(variant = "grid", "grid setup registered");
        self.grid = Some(Installed::new(binding, None));
        Ok(true)
    }

    /// Stop badging `variant`. Returns whether it was installed.
    ///
    /// The list slot gets its original method back. The grid wrapper stays
    /// in the host but passes straight through until the next install.
    pub fn uninstall(&mut self, host: &mut H, variant: ViewVariant) -> bool {
        let removed = match variant {
            ViewVariant::List => match self.list.take() {
                Some(installed) => {
                    if let Some(slot) = host.list_slot() {
                        match (slot.marker(), installed.original) {
                            (Some(WRAP_MARKER), Some(original)) => slot.replace(original, None),
                            _ => tracing::debug!(
                                variant = "list",
                                slot = slot.name(),
                                "slot no longer holds our wrapper, left as is"
                            ),
                        }
                    }
                    installed.binding.detach();
                    true
                }
                None => false,
            },
            ViewVariant::Grid => match &self.grid {
                Some(installed) if installed.binding.is_attached() => {
                    installed.binding.detach();
                    true
                }
                _ => false,
            },
        };
        if removed {
            tracing::info!(variant = variant.as_str(), "placeholder badges uninstalled");
        }
        removed
    }

    /// Uninstall both variants and empty the cache.
    pub fn cleanup(&mut self, host: &mut H) {
        for variant in ViewVariant::ALL {
            self.uninstall(host, variant);
        }
        self.oracle = None;
        self.cache.clear();
        self.cache.reset_stats();
    }

    /// Placeholder verdict for `path` through the shared cache.
    ///
    /// Asks the most recently installed oracle on a miss. Before any install
    /// only cached verdicts are reported.
    pub fn is_placeholder_cached(&self, path: &Path) -> bool {
        match &self.oracle {
            Some(oracle) => self.cache.query(path, oracle.as_ref()),
            None => self.cache.lookup(path).unwrap_or(false),
        }
    }

    /// Forget the verdict for `path`, e.g. once its content has arrived.
    pub fn invalidate(&self, path: &Path) -> bool {
        self.cache.invalidate(path)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn binding(&self, variant: ViewVariant) -> Option<&Arc<InterceptorBinding>> {
        match variant {
            ViewVariant::List => self.list.as_ref().map(Installed::binding),
            ViewVariant::Grid => self.grid.as_ref().map(Installed::binding),
        }
    }

    /// Counters for `variant`; zero when not installed.
    pub fn stats(&self, variant: ViewVariant) -> StatsSnapshot {
        self.binding(variant)
            .map(|binding| binding.stats())
            .unwrap_or_default()
    }

    /// Whether `variant` is currently badging (or set up to once the host
    /// loads it).
    pub fn is_installed(&self, variant: ViewVariant) -> bool {
        self.binding(variant)
            .is_some_and(|binding| binding.is_attached())
    }

    /// Why the last install of `variant` failed, if it did.
    pub fn last_failure(&self, variant: ViewVariant) -> Option<IntegrationUnavailable> {
        failures(&self.failures)[variant.index()].clone()
    }

    pub fn list_installation(&self) -> Option<&Installed<ListView, H::Entry, H::Output>> {
        self.list.as_ref()
    }

    pub fn grid_installation(&self) -> Option<&Installed<GridView, H::Entry, H::Output>> {
        self.grid.as_ref()
    }
}

impl<H: HostFramework> fmt::Debug for IntegrationRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationRegistry")
            .field("config", &self.config)
            .field("cache", &self.cache.stats())
            .field("list", &self.list)
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stubmark_core::entry::FileEntry;
    use stubmark_core::geometry::Rect;
    use stubmark_core::oracle::OracleError;
    use stubmark_render::buffer::Buffer;
    use stubmark_render::surface::Surface;

    /// Host with a list slot, and a grid extension that is either loaded or
    /// still pending.
    struct TinyHost {
        list: Option<MethodSlot<FileEntry, &'static str>>,
        grid: Option<GridExtension<FileEntry, &'static str>>,
        pending: Vec<GridSetup<FileEntry, &'static str>>,
        hooks: bool,
    }

    fn plain() -> RenderFn<FileEntry, &'static str> {
        Arc::new(|_: &FileEntry, _: &mut dyn Surface| "plain")
    }

    impl TinyHost {
        fn new() -> Self {
            Self {
                list: Some(MethodSlot::new("render_row", plain())),
                grid: None,
                pending: Vec::new(),
                hooks: true,
            }
        }

        fn load_grid(&mut self, version: u32) {
            let mut ext = GridExtension::with_version(version, MethodSlot::new("render_tile", plain()));
            for setup in self.pending.drain(..) {
                setup(&mut ext);
            }
            self.grid = Some(ext);
        }
    }

    impl HostFramework for TinyHost {
        type Entry = FileEntry;
        type Output = &'static str;

        fn list_slot(&mut self) -> Option<&mut MethodSlot<FileEntry, &'static str>> {
            self.list.as_mut()
        }

        fn register_on_load(
            &mut self,
            subsystem: &str,
            setup: GridSetup<FileEntry, &'static str>,
        ) -> bool {
            if !self.hooks || subsystem != GRID_SUBSYSTEM {
                return false;
            }
            match self.grid.as_mut() {
                Some(ext) => setup(ext),
                None => self.pending.push(setup),
            }
            true
        }
    }

    fn oracle(calls: Arc<AtomicUsize>) -> SharedOracle {
        Arc::new(move |_: &Path| -> Result<bool, OracleError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        })
    }

    fn yes() -> SharedOracle {
        oracle(Arc::new(AtomicUsize::new(0)))
    }

    fn book() -> FileEntry {
        FileEntry::file("book.epub", "/lib/book.epub").with_content(Rect::new(0, 0, 10, 1))
    }

    #[test]
    fn list_install_wraps_once() {
        let mut host = TinyHost::new();
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        assert!(reg.install(&mut host, ViewVariant::List, yes()));
        assert!(reg.install(&mut host, ViewVariant::List, yes()));
        assert!(reg.is_installed(ViewVariant::List));
        assert!(reg.list_installation().is_some_and(Installed::saved_original));

        let mut buf = Buffer::new(10, 1);
        let slot = host.list.as_ref().unwrap();
        assert_eq!(slot.marker(), Some(WRAP_MARKER));
        assert_eq!(slot.call(&book(), &mut buf), "plain");
        assert_eq!(reg.stats(ViewVariant::List).badges_rendered, 1);
        assert_eq!(buf.row_text(0), "       [↓]");
    }

    #[test]
    fn list_uninstall_restores_original() {
        let mut host = TinyHost::new();
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        reg.install(&mut host, ViewVariant::List, yes());
        assert!(reg.uninstall(&mut host, ViewVariant::List));
        assert!(!reg.uninstall(&mut host, ViewVariant::List));

        let slot = host.list.as_ref().unwrap();
        assert_eq!(slot.marker(), None);
        let mut buf = Buffer::new(10, 1);
        slot.call(&book(), &mut buf);
        assert_eq!(buf.row_text(0), "          ");
        assert_eq!(reg.stats(ViewVariant::List), StatsSnapshot::default());
    }

    #[test]
    fn missing_list_slot_is_reported() {
        let mut host = TinyHost::new();
        host.list = None;
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        assert!(!reg.install(&mut host, ViewVariant::List, yes()));
        assert!(!reg.is_installed(ViewVariant::List));
        assert_eq!(
            reg.last_failure(ViewVariant::List),
            Some(IntegrationUnavailable::ExtensionPointMissing {
                variant: ViewVariant::List
            })
        );
    }

    #[test]
    fn foreign_wrap_is_not_stacked() {
        let mut host = TinyHost::new();
        let mut first = IntegrationRegistry::new(BadgeConfig::default());
        let mut second = IntegrationRegistry::new(BadgeConfig::default());
        assert!(first.install(&mut host, ViewVariant::List, yes()));
        assert!(!second.install(&mut host, ViewVariant::List, yes()));
        assert_eq!(
            second.last_failure(ViewVariant::List),
            Some(IntegrationUnavailable::AlreadyWrapped {
                slot: "render_row".into()
            })
        );
    }

    #[test]
    fn grid_setup_runs_when_subsystem_loads() {
        let mut host = TinyHost::new();
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        assert!(reg.install(&mut host, ViewVariant::Grid, yes()));
        assert_eq!(host.pending.len(), 1);
        assert!(reg.install(&mut host, ViewVariant::Grid, yes()));
        assert_eq!(host.pending.len(), 1);

        host.load_grid(GRID_EXTENSION_VERSION);
        let ext = host.grid.as_ref().unwrap();
        assert_eq!(ext.item_render().marker(), Some(WRAP_MARKER));
    }

    #[test]
    fn grid_version_mismatch_is_reported_later() {
        let mut host = TinyHost::new();
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        assert!(reg.install(&mut host, ViewVariant::Grid, yes()));
        host.load_grid(GRID_EXTENSION_VERSION + 1);

        assert!(!reg.is_installed(ViewVariant::Grid));
        assert_eq!(
            reg.last_failure(ViewVariant::Grid),
            Some(IntegrationUnavailable::IncompatibleVersion {
                found: GRID_EXTENSION_VERSION + 1,
                required: GRID_EXTENSION_VERSION,
            })
        );
        assert_eq!(host.grid.as_ref().unwrap().item_render().marker(), None);
    }

    #[test]
    fn grid_version_mismatch_on_loaded_host_fails_install() {
        let mut host = TinyHost::new();
        host.load_grid(0);
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        assert!(!reg.install(&mut host, ViewVariant::Grid, yes()));
        assert!(reg.grid_installation().is_none());
    }

    #[test]
    fn hookless_host_is_reported() {
        let mut host = TinyHost::new();
        host.hooks = false;
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        assert!(!reg.install(&mut host, ViewVariant::Grid, yes()));
        assert_eq!(
            reg.last_failure(ViewVariant::Grid),
            Some(IntegrationUnavailable::HooksUnsupported)
        );
    }

    #[test]
    fn disabled_variant_leaves_host_alone() {
        let mut host = TinyHost::new();
        let config = BadgeConfig::default().with_variant_enabled(ViewVariant::List, false);
        let mut reg = IntegrationRegistry::new(config);
        assert!(!reg.install(&mut host, ViewVariant::List, yes()));
        assert_eq!(host.list.as_ref().unwrap().marker(), None);
        assert_eq!(
            reg.last_failure(ViewVariant::List),
            Some(IntegrationUnavailable::Disabled {
                variant: ViewVariant::List
            })
        );
    }

    #[test]
    fn grid_reinstall_after_uninstall_reuses_wrapper() {
        let mut host = TinyHost::new();
        host.load_grid(GRID_EXTENSION_VERSION);
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        assert!(reg.install(&mut host, ViewVariant::Grid, yes()));
        assert!(reg.uninstall(&mut host, ViewVariant::Grid));
        assert!(!reg.is_installed(ViewVariant::Grid));

        assert!(reg.install(&mut host, ViewVariant::Grid, yes()));
        assert!(reg.is_installed(ViewVariant::Grid));
        assert_eq!(reg.last_failure(ViewVariant::Grid), None);
    }

    #[test]
    fn cached_query_uses_installed_oracle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut host = TinyHost::new();
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        assert!(!reg.is_placeholder_cached(Path::new("/lib/book.epub")));

        reg.install(&mut host, ViewVariant::List, oracle(Arc::clone(&calls)));
        assert!(reg.is_placeholder_cached(Path::new("/lib/book.epub")));
        assert!(reg.is_placeholder_cached(Path::new("/lib/book.epub")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(reg.invalidate(Path::new("/lib/book.epub")));
        assert!(reg.is_placeholder_cached(Path::new("/lib/book.epub")));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        reg.cleanup(&mut host);
        assert_eq!(reg.cache_stats().size, 0);
        assert!(!reg.is_installed(ViewVariant::List));
        assert!(!reg.is_placeholder_cached(Path::new("/lib/book.epub")));
    }

    #[test]
    fn new_oracle_drops_old_verdicts() {
        let book = Path::new("/lib/book.epub");
        let mut host = TinyHost::new();
        let mut reg = IntegrationRegistry::new(BadgeConfig::default());
        let first = yes();
        assert!(reg.install(&mut host, ViewVariant::List, Arc::clone(&first)));
        assert!(reg.is_placeholder_cached(book));

        assert!(reg.install(&mut host, ViewVariant::List, first));
        assert_eq!(reg.cache_stats().size, 1);

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let downloaded: SharedOracle = Arc::new(move |_: &Path| -> Result<bool, OracleError> {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        });
        assert!(reg.install(&mut host, ViewVariant::Grid, downloaded));
        assert_eq!(reg.cache_stats().size, 0);
        assert!(!reg.is_placeholder_cached(book));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            IntegrationUnavailable::ExtensionPointMissing {
                variant: ViewVariant::Grid
            }
            .to_string(),
            "host has no grid render extension point"
        );
        assert_eq!(
            IntegrationUnavailable::IncompatibleVersion { found: 2, required: 1 }.to_string(),
            "host grid extension is version 2, version 1 is required"
        );
    }
}
