//! Path normalization
//!
//! Turns the path-like values callers hand us (strings, `Path`s, `file:`
//! URLs) into absolute, lexically normalized paths. Nothing here touches the
//! filesystem except `std::env::current_dir` when resolving a relative path.

use crate::error::{FsError, IoResultExt, Result};
use std::path::{Component, Path, PathBuf};
use url::Url;

/// A value that names a location on the local filesystem
#[derive(Debug, Clone)]
pub enum PathLike {
    Path(PathBuf),
    Url(Url),
}

impl From<&str> for PathLike {
    fn from(value: &str) -> Self {
        // Only a well-formed file:// URL is treated as a URL; everything else,
        // including names like "file:notes" and drive paths like "C:\x",
        // stays a plain path.
        if value.starts_with("file://") {
            if let Ok(url) = Url::parse(value) {
                return Self::Url(url);
            }
        }
        Self::Path(PathBuf::from(value))
    }
}

impl From<String> for PathLike {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&Path> for PathLike {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for PathLike {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&PathBuf> for PathLike {
    fn from(value: &PathBuf) -> Self {
        Self::Path(value.clone())
    }
}

impl From<Url> for PathLike {
    fn from(value: Url) -> Self {
        Self::Url(value)
    }
}

impl From<&Url> for PathLike {
    fn from(value: &Url) -> Self {
        Self::Url(value.clone())
    }
}

/// Convert a path-like value to a `PathBuf` without resolving it
///
/// # Errors
///
/// Returns `FsError::InvalidPath` for URLs that are not `file:` URLs or that
/// cannot be expressed as a local path.
pub fn to_path(value: impl Into<PathLike>) -> Result<PathBuf> {
    match value.into() {
        PathLike::Path(path) => Ok(path),
        PathLike::Url(url) => from_file_url(&url),
    }
}

/// Convert a `file:` URL to a local path
///
/// # Errors
///
/// Returns `FsError::InvalidPath` if the scheme is not `file` or the URL has
/// a host the local platform cannot represent.
pub fn from_file_url(url: &Url) -> Result<PathBuf> {
    if url.scheme() != "file" {
        return Err(FsError::InvalidPath {
            input: url.to_string(),
            reason: "must be a file URL".to_string(),
        });
    }
    url.to_file_path().map_err(|()| FsError::InvalidPath {
        input: url.to_string(),
        reason: "not representable as a local path".to_string(),
    })
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent
///
/// A `..` that would climb above the root is discarded; leading `..` of a
/// relative path are kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                out.push(component.as_os_str());
                depth = 0;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(name) => {
                out.push(name);
                depth += 1;
            }
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolve a path-like value to an absolute, normalized path
///
/// # Errors
///
/// Returns an error if the value is an unusable URL or the current
/// directory cannot be determined for a relative path.
pub fn resolve(value: impl Into<PathLike>) -> Result<PathBuf> {
    let path = to_path(value)?;
    if path.is_absolute() {
        return Ok(normalize(&path));
    }
    let cwd = std::env::current_dir().at("getcwd", &path)?;
    Ok(normalize(&cwd.join(path)))
}

/// Whether `dest` lies strictly below `src`
///
/// Compares whole components, so `/foo` is not a parent of `/foobar`. Both
/// paths are expected to be resolved already; equal paths return `false`.
#[must_use]
pub fn is_subdir(src: &Path, dest: &Path) -> bool {
    let src = normalize(src);
    let dest = normalize(dest);
    if src == dest {
        return false;
    }
    let mut dest_components = dest.components();
    src.components()
        .all(|component| dest_components.next() == Some(component))
}

/// Final component of a path as a `String`, or the whole path for roots
#[must_use]
pub fn base_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}
