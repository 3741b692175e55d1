//! Directory-level operations
//!
//! This module provides the directory reader plus the small idempotent
//! helpers built on it.
//!
//! # Module Organization
//!
//! - `empty`: `empty_dir` (exists and has no children)
//! - `ensure`: `ensure_dir`, `ensure_file`, `exists`
//! - `mod`: directory reader (this file)
//!
//! Each operation comes in three shapes: a blocking function on the local
//! host, a `*_with` function over any [`FileSystem`], and an `*_async`
//! function over any [`AsyncFileSystem`].

mod empty;
mod ensure;

pub use empty::{empty_dir, empty_dir_async, empty_dir_with};
pub use ensure::{
    ensure_dir, ensure_dir_async, ensure_dir_with, ensure_file, ensure_file_async,
    ensure_file_with, exists, exists_async, exists_with,
};

use crate::backends::local::LocalReadDir;
use crate::backends::LocalFs;
use crate::error::Result;
use crate::path::{resolve, PathLike};
use crate::traits::{AsyncFileSystem, FileSystem};

/// List the immediate children of a directory on the local host
///
/// The returned iterator reads lazily: stopping early leaves the rest of
/// the directory unread. No ordering is imposed.
///
/// # Errors
///
/// Returns `NotFound` if `path` doesn't exist, or a classified error if it
/// is not a directory.
pub fn read_dir(path: impl Into<PathLike>) -> Result<LocalReadDir> {
    let path = resolve(path)?;
    LocalFs::new().read_dir(&path)
}

/// List the immediate children of a directory through `fs`
///
/// # Errors
///
/// See [`read_dir`].
pub async fn read_dir_async<F: AsyncFileSystem>(
    fs: &F,
    path: impl Into<PathLike>,
) -> Result<F::ReadDir> {
    let path = resolve(path)?;
    fs.read_dir(&path).await
}
