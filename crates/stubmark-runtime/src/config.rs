#![forbid(unsafe_code)]

//! Badge configuration.
//!
//! Defaults cover the common case. A handful of environment variables can
//! override them at startup:
//!
//! | Variable | Effect |
//! |---|---|
//! | `STUBMARK_EXTENSION` | File extension to badge (default `epub`) |
//! | `STUBMARK_CACHE_CAPACITY` | Cache bound (default 100) |
//! | `STUBMARK_ICON` | Badge image path |
//! | `STUBMARK_DISABLE` | Comma list of variants to skip (`grid`, `list`) |
//!
//! Values that do not parse are ignored with a warning.

use std::env;
use std::path::PathBuf;

use stubmark_widgets::badge::BadgeStyle;

use crate::cache::MAX_CACHE_SIZE;
use crate::interceptor::ViewVariant;

pub const ENV_EXTENSION: &str = "STUBMARK_EXTENSION";
pub const ENV_CACHE_CAPACITY: &str = "STUBMARK_CACHE_CAPACITY";
pub const ENV_ICON: &str = "STUBMARK_ICON";
pub const ENV_DISABLE: &str = "STUBMARK_DISABLE";

/// Extension badged by default.
pub const DEFAULT_EXTENSION: &str = "epub";

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeConfig {
    /// File extension of placeholder-capable files, without the dot.
    pub extension: String,
    /// Upper bound on cached verdicts.
    pub cache_capacity: usize,
    pub grid_style: BadgeStyle,
    pub list_style: BadgeStyle,
    /// Badge image. `None` draws the glyph.
    pub icon_path: Option<PathBuf>,
    pub grid_enabled: bool,
    pub list_enabled: bool,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            cache_capacity: MAX_CACHE_SIZE,
            grid_style: BadgeStyle::grid(),
            list_style: BadgeStyle::list(),
            icon_path: None,
            grid_enabled: true,
            list_enabled: true,
        }
    }
}

impl BadgeConfig {
    /// Defaults with the `STUBMARK_*` environment applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_vars(|name| env::var(name).ok())
    }

    /// Apply overrides read through `var`.
    #[must_use]
    pub fn with_vars<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ext) = var(ENV_EXTENSION) {
            let ext = ext.trim().trim_start_matches('.');
            if ext.is_empty() {
                tracing::warn!(var = ENV_EXTENSION, "empty extension ignored");
            } else {
                self.extension = ext.to_string();
            }
        }

        if let Some(raw) = var(ENV_CACHE_CAPACITY) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) => self = self.with_cache_capacity(capacity),
                Err(err) => tracing::warn!(
                    var = ENV_CACHE_CAPACITY,
                    value = %raw,
                    error = %err,
                    "invalid cache capacity ignored"
                ),
            }
        }

        if let Some(icon) = var(ENV_ICON) {
            let icon = icon.trim();
            self.icon_path = (!icon.is_empty()).then(|| PathBuf::from(icon));
        }

        if let Some(list) = var(ENV_DISABLE) {
            for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                match name.to_ascii_lowercase().as_str() {
                    "grid" => self.grid_enabled = false,
                    "list" => self.list_enabled = false,
                    _ => tracing::warn!(var = ENV_DISABLE, value = name, "unknown view variant ignored"),
                }
            }
        }
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the cache bound; 0 is raised to 1.
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_grid_style(mut self, style: BadgeStyle) -> Self {
        self.grid_style = style;
        self
    }

    #[must_use]
    pub fn with_list_style(mut self, style: BadgeStyle) -> Self {
        self.list_style = style;
        self
    }

    #[must_use]
    pub fn with_icon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.icon_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_variant_enabled(mut self, variant: ViewVariant, enabled: bool) -> Self {
        match variant {
            ViewVariant::Grid => self.grid_enabled = enabled,
            ViewVariant::List => self.list_enabled = enabled,
        }
        self
    }

    pub fn is_enabled(&self, variant: ViewVariant) -> bool {
        match variant {
            ViewVariant::Grid => self.grid_enabled,
            ViewVariant::List => self.list_enabled,
        }
    }

    pub fn style(&self, variant: ViewVariant) -> &BadgeStyle {
        match variant {
            ViewVariant::Grid => &self.grid_style,
            ViewVariant::List => &self.list_style,
        }
    }
}
