#![forbid(unsafe_code)]

//! Scripted oracle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use stubmark_core::oracle::{OracleError, PlaceholderOracle};

#[derive(Debug, Clone)]
enum Answer {
    Verdict(bool),
    Fail(String),
}

/// Oracle answering from a table. Unlisted paths are not placeholders.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    answers: HashMap<PathBuf, Answer>,
    calls: AtomicUsize,
    asked: Mutex<Vec<PathBuf>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `path` as a placeholder.
    #[must_use]
    pub fn placeholder(mut self, path: impl Into<PathBuf>) -> Self {
        self.answers.insert(path.into(), Answer::Verdict(true));
        self
    }

    /// Report `path` as real content.
    #[must_use]
    pub fn downloaded(mut self, path: impl Into<PathBuf>) -> Self {
        self.answers.insert(path.into(), Answer::Verdict(false));
        self
    }

    /// Fail for `path` with `message`.
    #[must_use]
    pub fn failing(mut self, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        self.answers.insert(path.into(), Answer::Fail(message.into()));
        self
    }

    /// Total calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls for `path` so far.
    pub fn calls_for(&self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        self.asked
            .lock()
            .map(|asked| asked.iter().filter(|p| p.as_path() == path).count())
            .unwrap_or(0)
    }
}

impl PlaceholderOracle for ScriptedOracle {
    fn is_placeholder(&self, path: &Path) -> Result<bool, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(path.to_path_buf());
        }
        match self.answers.get(path) {
            Some(Answer::Verdict(verdict)) => Ok(*verdict),
            Some(Answer::Fail(message)) => Err(OracleError::Undecidable(message.clone())),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_from_table() {
        let oracle = ScriptedOracle::new()
            .placeholder("/a.epub")
            .downloaded("/b.epub")
            .failing("/c.epub", "boom");
        assert!(oracle.is_placeholder(Path::new("/a.epub")).unwrap());
        assert!(!oracle.is_placeholder(Path::new("/b.epub")).unwrap());
        assert!(oracle.is_placeholder(Path::new("/c.epub")).is_err());
        assert!(!oracle.is_placeholder(Path::new("/d.epub")).unwrap());
        assert_eq!(oracle.calls(), 4);
        assert_eq!(oracle.calls_for("/a.epub"), 1);
    }
}
