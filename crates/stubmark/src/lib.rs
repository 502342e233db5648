#![forbid(unsafe_code)]

//! stubmark public facade crate.
//!
//! Re-exports the types a host integration needs from the internal crates,
//! plus a prelude and a crate-wide error type.
//!
//! ```
//! use stubmark::prelude::*;
//!
//! let cache = SharedCache::new(8);
//! let oracle = |_: &std::path::Path| Ok::<_, OracleError>(true);
//! let path = std::path::Path::new("/books/a.epub");
//! assert!(cache.query(path, &oracle));
//! assert_eq!(cache.lookup(path), Some(true));
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use stubmark_core::entry::{FileEntry, HostEntry, PathKey, has_extension};
pub use stubmark_core::geometry::{Corner, DisplayScale, Rect, Size};
pub use stubmark_core::oracle::{
    ContentMarkerOracle, DEFAULT_MARKER, OracleError, PlaceholderOracle, SharedOracle,
};

// --- Render re-exports -----------------------------------------------------

pub use stubmark_render::buffer::Buffer;
pub use stubmark_render::cell::{Cell, PackedRgba, StyleFlags};
pub use stubmark_render::surface::{DrawError, RasterImage, Surface};

// --- Widget re-exports -----------------------------------------------------

pub use stubmark_widgets::badge::{BadgeRenderer, BadgeStyle};
pub use stubmark_widgets::icon::{BadgeAsset, BadgeIcon, IconError};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use stubmark_runtime::{
    BadgeConfig, BadgeOutcome, CacheStats, GridExtension, GridSetup, HostFramework,
    IntegrationRegistry, IntegrationUnavailable, MethodSlot, PlaceholderCache, RenderFn,
    RenderInterceptor, SharedCache, StatsSnapshot, ViewVariant,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for stubmark integrations.
#[derive(Debug)]
pub enum Error {
    /// I/O failure outside the oracle (e.g. listing a directory).
    Io(std::io::Error),
    /// The placeholder oracle could not decide.
    Oracle(OracleError),
    /// A surface refused a draw.
    Draw(DrawError),
    /// The badge image could not be loaded.
    Icon(IconError),
    /// A host integration could not be installed.
    #[cfg(feature = "runtime")]
    Integration(IntegrationUnavailable),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Oracle(err) => write!(f, "{err}"),
            Self::Draw(err) => write!(f, "{err}"),
            Self::Icon(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Integration(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Oracle(err) => Some(err),
            Self::Draw(err) => Some(err),
            Self::Icon(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Integration(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<OracleError> for Error {
    fn from(err: OracleError) -> Self {
        Self::Oracle(err)
    }
}

impl From<DrawError> for Error {
    fn from(err: DrawError) -> Self {
        Self::Draw(err)
    }
}

impl From<IconError> for Error {
    fn from(err: IconError) -> Self {
        Self::Icon(err)
    }
}

#[cfg(feature = "runtime")]
impl From<IntegrationUnavailable> for Error {
    fn from(err: IntegrationUnavailable) -> Self {
        Self::Integration(err)
    }
}

/// Standard result type for stubmark APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BadgeRenderer, BadgeStyle, Buffer, ContentMarkerOracle, Error, FileEntry, HostEntry,
        OracleError, PlaceholderOracle, Rect, Result, Surface,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{
        BadgeConfig, HostFramework, IntegrationRegistry, SharedCache, ViewVariant,
    };

    pub use crate::{core, render, widgets};
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use stubmark_core as core;
pub use stubmark_render as render;
#[cfg(feature = "runtime")]
pub use stubmark_runtime as runtime;
pub use stubmark_widgets as widgets;
