#![forbid(unsafe_code)]

//! Logging setup.
//!
//! Crates in this workspace log through `tracing`. A host that does not
//! install its own subscriber can call [`init`] to get one filtered by the
//! `STUBMARK_LOG` environment variable (standard `EnvFilter` directives).
//!
//! ```bash
//! STUBMARK_LOG=stubmark_runtime=debug stubmark-demo ~/books
//! ```

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "STUBMARK_LOG";

/// Directives used when `STUBMARK_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "warn";

/// Build the filter from an optional directive string.
///
/// Unparsable directives fall back to [`DEFAULT_DIRECTIVES`].
pub fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a global subscriber writing to stderr.
///
/// Returns `false` if a global subscriber was already set, in which case
/// nothing changes.
pub fn init() -> bool {
    let directives = std::env::var(LOG_ENV).ok();
    let filter = filter_from(directives.as_deref());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    #[cfg(feature = "tracing-json")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "tracing-json"))]
    let result = builder.try_init();

    result.is_ok()
}
