//! Make sure a directory exists and has no children

use crate::backends::LocalFs;
use crate::error::Result;
use crate::metadata::DirEntry;
use crate::path::{resolve, PathLike};
use crate::traits::{AsyncFileSystem, AsyncReadDir, FileSystem};
use std::path::Path;
use tracing::debug;

/// Empty a directory on the local host, creating it if missing
///
/// Children are deleted one by one (directories recursively); the
/// directory itself is kept. Calling it again is a no-op. A failure partway
/// leaves the children removed so far removed.
///
/// # Errors
///
/// Returns a classified error if `path` exists but cannot be listed (for
/// example because it is a file) or a child cannot be removed.
pub fn empty_dir(path: impl Into<PathLike>) -> Result<()> {
    let path = resolve(path)?;
    empty_dir_with(&LocalFs::new(), &path)
}

/// [`empty_dir`] through any blocking backend
///
/// # Errors
///
/// See [`empty_dir`].
pub fn empty_dir_with<F: FileSystem>(fs: &F, path: &Path) -> Result<()> {
    let listing = match fs.read_dir(path) {
        Ok(listing) => listing,
        Err(e) if e.is_not_found() => {
            debug!("empty_dir: creating missing {}", path.display());
            return fs.create_dir_all(path);
        }
        Err(e) => return Err(e),
    };

    // Snapshot first; removing while the listing is open is unspecified
    let children = listing.collect::<Result<Vec<DirEntry>>>()?;
    for child in children {
        let child_path = path.join(&child.name);
        debug!("empty_dir: removing {}", child_path.display());
        if child.is_directory {
            fs.remove_dir_all(&child_path)?;
        } else {
            fs.remove_file(&child_path)?;
        }
    }
    Ok(())
}

/// [`empty_dir`] through any async backend
///
/// # Errors
///
/// See [`empty_dir`].
pub async fn empty_dir_async<F: AsyncFileSystem>(fs: &F, path: impl Into<PathLike>) -> Result<()> {
    let path = resolve(path)?;
    let mut listing = match fs.read_dir(&path).await {
        Ok(listing) => listing,
        Err(e) if e.is_not_found() => {
            debug!("empty_dir: creating missing {}", path.display());
            return fs.create_dir_all(&path).await;
        }
        Err(e) => return Err(e),
    };

    let children = listing.collect_entries().await?;
    for child in children {
        let child_path = path.join(&child.name);
        debug!("empty_dir: removing {}", child_path.display());
        if child.is_directory {
            fs.remove_dir_all(&child_path).await?;
        } else {
            fs.remove_file(&child_path).await?;
        }
    }
    Ok(())
}
