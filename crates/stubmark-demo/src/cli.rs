#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args by hand. `STUBMARK_DEMO_*` environment variables set the
//! defaults and explicit flags override them.

use std::env;
use std::path::PathBuf;
use std::process;

use stubmark_core::oracle::DEFAULT_MARKER;
use stubmark_runtime::ViewVariant;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
stubmark demo: badge placeholder files in a directory listing

USAGE:
    stubmark-demo [OPTIONS] DIR

OPTIONS:
    --view=VIEW      View to render: 'list' (default) or 'grid'
    --width=N        Surface width in cells (default: 60)
    --height=N       Surface height in cells (default: 20)
    --marker=STR     Byte string that marks a placeholder file
                     (default: stubmark-placeholder)
    --help, -h       Show this help message
    --version, -V    Show version

ENVIRONMENT VARIABLES:
    STUBMARK_DEMO_VIEW       Override --view default
    STUBMARK_DEMO_WIDTH      Override --width default
    STUBMARK_DEMO_HEIGHT     Override --height default
    STUBMARK_DEMO_MARKER     Override --marker default
    STUBMARK_LOG             Log filter (default: warn)
    STUBMARK_EXTENSION       File extension to badge (default: epub)
    STUBMARK_ICON            Badge image path";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub view: ViewVariant,
    pub width: u16,
    pub height: u16,
    pub marker: String,
    pub dir: PathBuf,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            view: ViewVariant::List,
            width: 60,
            height: 20,
            marker: String::from_utf8_lossy(DEFAULT_MARKER).into_owned(),
            dir: PathBuf::from("."),
        }
    }
}

/// Why parsing stopped without options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// Print this and exit successfully.
    Info(String),
    /// Print this and exit with status 1.
    Usage(String),
}

fn parse_view(val: &str) -> Option<ViewVariant> {
    match val.to_ascii_lowercase().as_str() {
        "list" => Some(ViewVariant::List),
        "grid" | "mosaic" => Some(ViewVariant::Grid),
        _ => None,
    }
}

fn parse_dimension(flag: &str, val: &str) -> Result<u16, Exit> {
    match val.parse::<u16>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Exit::Usage(format!("Invalid {flag} value: {val}"))),
    }
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version` or a usage error.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::from_args(&args, |name| env::var(name).ok()) {
            Ok(opts) => opts,
            Err(Exit::Info(text)) => {
                println!("{text}");
                process::exit(0);
            }
            Err(Exit::Usage(text)) => {
                eprintln!("{text}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with environment lookups through `var`.
    pub fn from_args<F>(args: &[String], var: F) -> Result<Self, Exit>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first; unparsable values keep the default.
        if let Some(val) = var("STUBMARK_DEMO_VIEW")
            && let Some(view) = parse_view(&val)
        {
            opts.view = view;
        }
        if let Some(val) = var("STUBMARK_DEMO_WIDTH")
            && let Ok(n) = parse_dimension("width", &val)
        {
            opts.width = n;
        }
        if let Some(val) = var("STUBMARK_DEMO_HEIGHT")
            && let Ok(n) = parse_dimension("height", &val)
        {
            opts.height = n;
        }
        if let Some(val) = var("STUBMARK_DEMO_MARKER")
            && !val.is_empty()
        {
            opts.marker = val;
        }

        let mut dir = None;
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Err(Exit::Info(HELP_TEXT.to_string())),
                "--version" | "-V" => return Err(Exit::Info(format!("stubmark-demo {VERSION}"))),
                other => {
                    if let Some(val) = other.strip_prefix("--view=") {
                        opts.view = parse_view(val)
                            .ok_or_else(|| Exit::Usage(format!("Invalid --view value: {val}")))?;
                    } else if let Some(val) = other.strip_prefix("--width=") {
                        opts.width = parse_dimension("--width", val)?;
                    } else if let Some(val) = other.strip_prefix("--height=") {
                        opts.height = parse_dimension("--height", val)?;
                    } else if let Some(val) = other.strip_prefix("--marker=") {
                        if val.is_empty() {
                            return Err(Exit::Usage("--marker must not be empty".into()));
                        }
                        opts.marker = val.to_string();
                    } else if other.starts_with('-') {
                        return Err(Exit::Usage(format!("Unknown argument: {other}")));
                    } else if dir.is_some() {
                        return Err(Exit::Usage(format!("Unexpected argument: {other}")));
                    } else {
                        dir = Some(PathBuf::from(other));
                    }
                }
            }
        }

        opts.dir = dir.ok_or_else(|| Exit::Usage("Missing DIR argument".into()))?;
        Ok(opts)
    }
}
