#![forbid(unsafe_code)]

//! Host extension points.
//!
//! A host exposes per-entry rendering in one of two shapes:
//!
//! - **Replace-in-place** ([`MethodSlot`]): a named render method that can be
//!   swapped for a wrapper. The host has no unhook API, so whoever replaces
//!   the method keeps the original to put it back.
//! - **Registration callback** ([`HostFramework::register_on_load`]): the host
//!   runs a setup callback once its grid subsystem has loaded, handing it a
//!   versioned [`GridExtension`] whose item renderer can be replaced the same
//!   way.
//!
//! Hosts opt in by implementing [`HostFramework`]. A host that has neither
//! shape simply returns `None`/`false` and integration is skipped.

use std::fmt;
use std::sync::Arc;

use stubmark_core::entry::HostEntry;
use stubmark_render::surface::Surface;

/// Version of the [`GridExtension`] contract this crate understands.
pub const GRID_EXTENSION_VERSION: u32 = 1;

/// Name of the host subsystem that owns grid item rendering.
pub const GRID_SUBSYSTEM: &str = "grid";

/// A per-entry render function.
///
/// Takes the entry and the surface it is drawn on and returns whatever the
/// host's renderer returns.
pub type RenderFn<E, R> = Arc<dyn Fn(&E, &mut dyn Surface) -> R + Send + Sync>;

/// A replaceable, named render method.
///
/// The marker records who replaced the method, so a second installer can
/// tell the slot is already wrapped.
pub struct MethodSlot<E, R> {
    name: String,
    current: RenderFn<E, R>,
    marker: Option<&'static str>,
}

impl<E, R> MethodSlot<E, R> {
    /// A slot holding the host's own, unwrapped method.
    pub fn new(name: impl Into<String>, method: RenderFn<E, R>) -> Self {
        Self {
            name: name.into(),
            current: method,
            marker: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke whatever method the slot currently holds.
    pub fn call(&self, entry: &E, surface: &mut dyn Surface) -> R {
        (self.current)(entry, surface)
    }

    /// The method currently installed.
    pub fn current(&self) -> RenderFn<E, R> {
        Arc::clone(&self.current)
    }

    /// Install `method`, tagged with `marker` (`None` for an unwrapped one).
    pub fn replace(&mut self, method: RenderFn<E, R>, marker: Option<&'static str>) {
        self.current = method;
        self.marker = marker;
    }

    /// Who wrapped the current method, if anyone.
    pub fn marker(&self) -> Option<&'static str> {
        self.marker
    }
}

impl<E, R> fmt::Debug for MethodSlot<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSlot")
            .field("name", &self.name)
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

/// Versioned grid extension API handed to setup callbacks.
#[derive(Debug)]
pub struct GridExtension<E, R> {
    version: u32,
    item_render: MethodSlot<E, R>,
}

impl<E, R> GridExtension<E, R> {
    /// An extension at the current contract version.
    pub fn new(item_render: MethodSlot<E, R>) -> Self {
        Self::with_version(GRID_EXTENSION_VERSION, item_render)
    }

    /// An extension reporting an explicit contract version.
    pub fn with_version(version: u32, item_render: MethodSlot<E, R>) -> Self {
        Self {
            version,
            item_render,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// The per-item render method.
    pub fn item_render(&self) -> &MethodSlot<E, R> {
        &self.item_render
    }

    pub fn item_render_mut(&mut self) -> &mut MethodSlot<E, R> {
        &mut self.item_render
    }
}

/// Setup callback run by the host once the grid subsystem is loaded.
pub type GridSetup<E, R> = Box<dyn FnOnce(&mut GridExtension<E, R>) + Send>;

/// What a host framework exposes for render augmentation.
pub trait HostFramework {
    /// The host's entry type.
    type Entry: HostEntry + 'static;
    /// What the host's per-entry renderer returns.
    type Output: 'static;

    /// The list view's replaceable render method, if the host has one.
    fn list_slot(&mut self) -> Option<&mut MethodSlot<Self::Entry, Self::Output>>;

    /// Ask the host to run `setup` once `subsystem` has loaded.
    ///
    /// Hosts run the callback immediately when the subsystem is already
    /// loaded. Returns `false` when the host has no hook mechanism or does not
    /// know `subsystem`.
    fn register_on_load(
        &mut self,
        subsystem: &str,
        setup: GridSetup<Self::Entry, Self::Output>,
    ) -> bool;
}
