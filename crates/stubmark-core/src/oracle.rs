#![forbid(unsafe_code)]

//! Placeholder oracles.
//!
//! An oracle is the authority on whether a path is a placeholder standing in
//! for remote content. It may be expensive (reading file contents), so the
//! runtime caches its verdicts; oracles themselves stay stateless.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use memchr::memmem;

/// Default number of bytes [`ContentMarkerOracle`] inspects.
pub const DEFAULT_PROBE_LEN: usize = 4096;

/// Default marker written into placeholder files.
pub const DEFAULT_MARKER: &[u8] = b"stubmark-placeholder";

/// Decides whether a path is a placeholder.
pub trait PlaceholderOracle: Send + Sync {
    /// Return the verdict for `path`.
    ///
    /// An `Err` means no verdict could be reached; callers treat it as "not a
    /// placeholder" for that call only.
    fn is_placeholder(&self, path: &Path) -> Result<bool, OracleError>;
}

impl<F> PlaceholderOracle for F
where
    F: Fn(&Path) -> Result<bool, OracleError> + Send + Sync,
{
    fn is_placeholder(&self, path: &Path) -> Result<bool, OracleError> {
        self(path)
    }
}

/// Shared handle to an oracle.
pub type SharedOracle = Arc<dyn PlaceholderOracle>;

/// Failure to reach a verdict.
#[derive(Debug)]
pub enum OracleError {
    /// The file could not be read.
    Io(io::Error),
    /// The oracle could not decide for another reason.
    Undecidable(String),
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "placeholder probe failed: {err}"),
            Self::Undecidable(msg) => write!(f, "placeholder verdict unavailable: {msg}"),
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Undecidable(_) => None,
        }
    }
}

impl From<io::Error> for OracleError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Reports a file as a placeholder when a marker appears in its head.
///
/// Reads at most `probe_len` bytes, so the cost per query is bounded no
/// matter how large the file is.
#[derive(Debug, Clone)]
pub struct ContentMarkerOracle {
    marker: Vec<u8>,
    probe_len: usize,
}

impl ContentMarkerOracle {
    /// Create an oracle looking for `marker`.
    pub fn new(marker: impl Into<Vec<u8>>) -> Self {
        Self {
            marker: marker.into(),
            probe_len: DEFAULT_PROBE_LEN,
        }
    }

    /// Set how many leading bytes are inspected.
    #[must_use]
    pub fn with_probe_len(mut self, probe_len: usize) -> Self {
        self.probe_len = probe_len;
        self
    }

    /// The marker being searched for.
    pub fn marker(&self) -> &[u8] {
        &self.marker
    }

    fn probe(&self, path: &Path) -> io::Result<bool> {
        if self.marker.is_empty() {
            return Ok(false);
        }
        let mut head = Vec::with_capacity(self.probe_len.min(DEFAULT_PROBE_LEN));
        File::open(path)?
            .take(self.probe_len as u64)
            .read_to_end(&mut head)?;
        Ok(memmem::find(&head, &self.marker).is_some())
    }
}

impl Default for ContentMarkerOracle {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl PlaceholderOracle for ContentMarkerOracle {
    fn is_placeholder(&self, path: &Path) -> Result<bool, OracleError> {
        Ok(self.probe(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body).unwrap();
        path
    }

    #[test]
    fn closure_is_an_oracle() {
        let oracle = |path: &Path| -> Result<bool, OracleError> { Ok(path.ends_with("yes.epub")) };
        assert!(oracle.is_placeholder(Path::new("/x/yes.epub")).unwrap());
        assert!(!oracle.is_placeholder(Path::new("/x/no.epub")).unwrap());
    }

    #[test]
    fn marker_in_head_is_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "stub.epub", b"PK\x03\x04 stubmark-placeholder v1");
        let oracle = ContentMarkerOracle::default();
        assert!(oracle.is_placeholder(&path).unwrap());
    }

    #[test]
    fn marker_beyond_probe_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = vec![b'x'; 64];
        body.extend_from_slice(DEFAULT_MARKER);
        let path = write_file(&dir, "real.epub", &body);

        let short = ContentMarkerOracle::default().with_probe_len(32);
        assert!(!short.is_placeholder(&path).unwrap());
        let long = ContentMarkerOracle::default().with_probe_len(128);
        assert!(long.is_placeholder(&path).unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentMarkerOracle::default()
            .is_placeholder(&dir.path().join("gone.epub"))
            .unwrap_err();
        assert!(matches!(err, OracleError::Io(_)));
        assert!(err.to_string().contains("probe failed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn empty_marker_never_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.epub", b"anything");
        assert!(!ContentMarkerOracle::new(Vec::new()).is_placeholder(&path).unwrap());
    }

    #[test]
    fn undecidable_display() {
        let err = OracleError::Undecidable("remote index offline".into());
        assert_eq!(
            err.to_string(),
            "placeholder verdict unavailable: remote index offline"
        );
    }
}
