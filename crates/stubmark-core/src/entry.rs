#![forbid(unsafe_code)]

//! Host entry capabilities.
//!
//! A host's per-item objects come in whatever shape its views use. The
//! interception layer only needs three answers from them, captured by
//! [`HostEntry`]; each concrete host representation is adapted to it at the
//! integration boundary.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::geometry::Rect;

/// Minimal capability interface a host item must satisfy.
pub trait HostEntry {
    /// Filesystem path of the entry, if it has one.
    fn path(&self) -> Option<&Path>;

    /// Whether the entry is a directory.
    fn is_directory(&self) -> bool;

    /// Rectangle of the entry's primary visual content, in surface
    /// coordinates. `None` when the host did not lay one out.
    fn primary_content_rect(&self) -> Option<Rect>;
}

impl<T: HostEntry + ?Sized> HostEntry for &T {
    fn path(&self) -> Option<&Path> {
        (**self).path()
    }

    fn is_directory(&self) -> bool {
        (**self).is_directory()
    }

    fn primary_content_rect(&self) -> Option<Rect> {
        (**self).primary_content_rect()
    }
}

/// A plain entry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Display name.
    pub name: String,
    /// Full path, when the entry is backed by the filesystem.
    pub path: Option<PathBuf>,
    /// Whether this is a directory.
    pub is_dir: bool,
    /// Laid-out content rectangle.
    pub content: Option<Rect>,
}

impl FileEntry {
    /// Create a file entry.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            is_dir: false,
            content: None,
        }
    }

    /// Create a directory entry.
    pub fn dir(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            is_dir: true,
            content: None,
        }
    }

    /// Create an entry with no backing path (e.g. a "go up" row).
    pub fn virtual_item(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            is_dir: false,
            content: None,
        }
    }

    /// Set the laid-out content rectangle.
    #[must_use]
    pub fn with_content(mut self, rect: Rect) -> Self {
        self.content = Some(rect);
        self
    }
}

impl HostEntry for FileEntry {
    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn is_directory(&self) -> bool {
        self.is_dir
    }

    fn primary_content_rect(&self) -> Option<Rect> {
        self.content
    }
}

/// Normalized path identity used as a cache key.
///
/// Normalization is lexical: `.` components and trailing separators are
/// dropped and `..` folds into its parent where one exists. The filesystem
/// is never consulted. The key keeps the raw OS path, so names that are not
/// valid UTF-8 stay distinct. On Windows the key is ASCII-case-folded to
/// match the filesystem's case-insensitivity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(PathBuf);

impl PathKey {
    /// Normalize `path` into a key.
    pub fn new(path: &Path) -> Self {
        let mut parts: Vec<Component<'_>> = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => match parts.last() {
                    Some(Component::Normal(_)) => {
                        parts.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => parts.push(component),
                },
                other => parts.push(other),
            }
        }

        let normalized: PathBuf = if parts.is_empty() {
            PathBuf::from(".")
        } else {
            parts.iter().collect()
        };
        Self(fold_case(normalized))
    }

    /// The normalized path.
    #[inline]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&Path> for PathKey {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

#[cfg(windows)]
fn fold_case(key: PathBuf) -> PathBuf {
    PathBuf::from(key.into_os_string().to_ascii_lowercase())
}

#[cfg(not(windows))]
fn fold_case(key: PathBuf) -> PathBuf {
    key
}

/// Check whether `path` ends in the extension `ext`.
///
/// Comparison is ASCII-case-insensitive and a leading `.` on `ext` is
/// ignored. Paths without an extension never match.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    let want = ext.trim_start_matches('.');
    if want.is_empty() {
        return false;
    }
    path.extension()
        .and_then(|found| found.to_str())
        .is_some_and(|found| found.eq_ignore_ascii_case(want))
}
