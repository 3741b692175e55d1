//! Blocking and async filesystem traits
//!
//! Both traits expose the same set of primitives. The async variant suspends
//! at each call instead of blocking the thread, which lets the walker and
//! copy engine be written once per execution model without ever branching on
//! the host inline.

use crate::error::Result;
use crate::metadata::{DirEntry, FileInfo};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::AsyncReadDir;

/// Blocking native primitives
///
/// # Examples
///
/// ```rust,ignore
/// use portafs::backends::LocalFs;
/// use portafs::traits::FileSystem;
///
/// let fs = LocalFs::new();
/// let info = fs.stat(Path::new("Cargo.toml"))?;
/// assert!(info.is_file);
/// ```
pub trait FileSystem {
    /// Lazy directory listing produced by [`FileSystem::read_dir`]
    type ReadDir: Iterator<Item = Result<DirEntry>>;

    /// Metadata of `path`, following symlinks
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path (or a link's target) doesn't exist.
    fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// Metadata of `path` itself, not following a final symlink
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path doesn't exist.
    fn lstat(&self, path: &Path) -> Result<FileInfo>;

    /// Open `path` for listing
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path doesn't exist, or a classified error
    /// if it is not a directory.
    fn read_dir(&self, path: &Path) -> Result<Self::ReadDir>;

    /// Canonical, symlink-free absolute path of `path`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for missing paths and dangling links.
    fn real_path(&self, path: &Path) -> Result<PathBuf>;

    /// Create a directory and any missing parents
    ///
    /// # Errors
    ///
    /// Returns a classified error if creation fails (e.g. permission denied
    /// or a parent is a file).
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file or symlink
    ///
    /// # Errors
    ///
    /// Returns a classified error if removal fails.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove a directory and everything below it
    ///
    /// # Errors
    ///
    /// Returns a classified error if any removal fails.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Copy the bytes of `src` to `dest`, replacing `dest` if it exists
    ///
    /// # Errors
    ///
    /// Returns a classified error if reading or writing fails.
    fn copy_file(&self, src: &Path, dest: &Path) -> Result<u64>;

    /// Target of the symlink at `path`
    ///
    /// # Errors
    ///
    /// Returns a classified error if `path` is not a symlink.
    fn read_link(&self, path: &Path) -> Result<PathBuf>;

    /// Create a symlink at `link` pointing to `target`
    ///
    /// `target_is_dir` picks the link flavor on hosts that distinguish them.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if `link` exists.
    fn symlink(&self, target: &Path, link: &Path, target_is_dir: bool) -> Result<()>;

    /// Set access and modification times
    ///
    /// With `follow == false` a symlink's own times are changed.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the times cannot be set.
    fn set_times(&self, path: &Path, atime: SystemTime, mtime: SystemTime, follow: bool)
        -> Result<()>;

    /// Create or truncate `path` with `contents`
    ///
    /// # Errors
    ///
    /// Returns a classified error if the file cannot be written.
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Name of the backend for logging
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// Suspending native primitives
///
/// Same contract as [`FileSystem`]; each method suspends at its native call.
/// Futures are not required to be `Send` since compio runs a
/// thread-per-core executor.
#[allow(async_fn_in_trait)]
pub trait AsyncFileSystem {
    /// Lazy directory listing produced by [`AsyncFileSystem::read_dir`]
    type ReadDir: AsyncReadDir;

    /// # Errors
    ///
    /// See [`FileSystem::stat`].
    async fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// # Errors
    ///
    /// See [`FileSystem::lstat`].
    async fn lstat(&self, path: &Path) -> Result<FileInfo>;

    /// # Errors
    ///
    /// See [`FileSystem::read_dir`].
    async fn read_dir(&self, path: &Path) -> Result<Self::ReadDir>;

    /// # Errors
    ///
    /// See [`FileSystem::real_path`].
    async fn real_path(&self, path: &Path) -> Result<PathBuf>;

    /// # Errors
    ///
    /// See [`FileSystem::create_dir_all`].
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// See [`FileSystem::remove_file`].
    async fn remove_file(&self, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// See [`FileSystem::remove_dir_all`].
    async fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// See [`FileSystem::copy_file`].
    async fn copy_file(&self, src: &Path, dest: &Path) -> Result<u64>;

    /// # Errors
    ///
    /// See [`FileSystem::read_link`].
    async fn read_link(&self, path: &Path) -> Result<PathBuf>;

    /// # Errors
    ///
    /// See [`FileSystem::symlink`].
    async fn symlink(&self, target: &Path, link: &Path, target_is_dir: bool) -> Result<()>;

    /// # Errors
    ///
    /// See [`FileSystem::set_times`].
    async fn set_times(
        &self,
        path: &Path,
        atime: SystemTime,
        mtime: SystemTime,
        follow: bool,
    ) -> Result<()>;

    /// # Errors
    ///
    /// See [`FileSystem::write_file`].
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn name(&self) -> &'static str {
        "unknown"
    }
}
