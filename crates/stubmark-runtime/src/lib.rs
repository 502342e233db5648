#![forbid(unsafe_code)]

//! Runtime: the placeholder cache, render interceptors, and the registry that
//! installs them into a host framework.
//!
//! # Role in stubmark
//! The host draws its entries; this crate adds the badge afterwards. Nothing
//! here owns the host's render pipeline, and no failure in here reaches it.
//!
//! # How it fits in the system
//! `stubmark-core` supplies entries and oracles, `stubmark-widgets` draws the
//! badge, and the host implements [`HostFramework`] to expose its extension
//! points.

pub mod cache;
pub mod config;
pub mod host;
pub mod interceptor;
pub mod registry;
pub mod stats;

pub use cache::{CacheStats, MAX_CACHE_SIZE, PlaceholderCache, SharedCache};
pub use config::BadgeConfig;
pub use host::{
    GRID_EXTENSION_VERSION, GRID_SUBSYSTEM, GridExtension, GridSetup, HostFramework, MethodSlot,
    RenderFn,
};
pub use interceptor::{BadgeOutcome, InterceptorBinding, RenderInterceptor, ViewVariant};
pub use registry::{
    GridView, Installed, IntegrationRegistry, IntegrationUnavailable, ListView, VariantMarker,
    WRAP_MARKER,
};
pub use stats::{InterceptorStats, StatsSnapshot};
