//! Recursive directory traversal
//!
//! Pre-order walk with depth limits, type filters, suffix/pattern filters
//! and optional symlink following with cycle avoidance.
//!
//! # Module Organization
//!
//! - `options`: [`WalkOptions`] and the path matchers
//! - `plan`: decisions shared by both walkers (what to yield, enter, skip)
//! - `walker`: blocking [`Walker`] iterator over any [`FileSystem`]
//! - `stream`: [`walk_async`] stream over any [`AsyncFileSystem`]
//!
//! [`FileSystem`]: crate::traits::FileSystem
//! [`AsyncFileSystem`]: crate::traits::AsyncFileSystem

mod options;
mod plan;
mod stream;
mod walker;

pub use options::{normalize_exts, FnMatcher, PathMatcher, WalkOptions};
pub use stream::walk_async;
pub use walker::Walker;

use crate::backends::LocalFs;
use crate::metadata::DirEntry;
use crate::path::PathLike;
use serde::Serialize;
use std::path::PathBuf;

/// One node produced by a walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct WalkEntry {
    /// Absolute path as reported by the walk
    pub path: PathBuf,
    /// Base name of `path`
    pub name: String,
    pub is_file: bool,
    pub is_directory: bool,
    pub is_symlink: bool,
    /// True only for the walk root
    pub is_main_dir: bool,
    /// Root is 0
    pub depth: usize,
}

impl WalkEntry {
    pub(crate) fn from_dir_entry(path: PathBuf, entry: DirEntry, depth: usize) -> Self {
        Self {
            path,
            name: entry.name,
            is_file: entry.is_file,
            is_directory: entry.is_directory,
            is_symlink: entry.is_symlink,
            is_main_dir: false,
            depth,
        }
    }
}

/// Walk a tree on the local host
///
/// Returns a lazy iterator. A root that cannot be resolved or stat'ed is
/// reported as the first (and only) item.
///
/// # Examples
///
/// ```rust,ignore
/// for entry in walk("src", WalkOptions::default().with_exts(["rs"])) {
///     println!("{}", entry?.path.display());
/// }
/// ```
pub fn walk(root: impl Into<PathLike>, options: WalkOptions) -> Walker<LocalFs> {
    Walker::new(LocalFs::new(), root, options)
}
