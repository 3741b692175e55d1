//! Idempotent existence helpers

use crate::backends::LocalFs;
use crate::error::{PolicyViolation, Result};
use crate::metadata::FileInfo;
use crate::path::{resolve, PathLike};
use crate::traits::{AsyncFileSystem, FileSystem};
use std::path::Path;
use tracing::debug;

fn expect_type(path: &Path, info: &FileInfo, expected: &'static str) -> Result<()> {
    let actual = info.type_name();
    if actual == expected {
        Ok(())
    } else {
        Err(PolicyViolation::UnexpectedType {
            path: path.to_path_buf(),
            expected,
            actual,
        }
        .into())
    }
}

/// Make sure `path` is a directory, creating it (and parents) if missing
///
/// # Errors
///
/// Returns `PolicyViolation::UnexpectedType` if something other than a
/// directory is there, or a classified error if creation fails.
pub fn ensure_dir(path: impl Into<PathLike>) -> Result<()> {
    let path = resolve(path)?;
    ensure_dir_with(&LocalFs::new(), &path)
}

/// [`ensure_dir`] through any blocking backend
///
/// # Errors
///
/// See [`ensure_dir`].
pub fn ensure_dir_with<F: FileSystem>(fs: &F, path: &Path) -> Result<()> {
    match fs.stat(path) {
        Ok(info) => return expect_type(path, &info, "dir"),
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }
    debug!("ensure_dir: creating {}", path.display());
    match fs.create_dir_all(path) {
        Ok(()) => Ok(()),
        // Lost a race against another creator; accept it if it's a directory
        Err(e) if e.is_already_exists() => expect_type(path, &fs.stat(path)?, "dir"),
        Err(e) => Err(e),
    }
}

/// [`ensure_dir`] through any async backend
///
/// # Errors
///
/// See [`ensure_dir`].
pub async fn ensure_dir_async<F: AsyncFileSystem>(fs: &F, path: impl Into<PathLike>) -> Result<()> {
    let path = resolve(path)?;
    match fs.stat(&path).await {
        Ok(info) => return expect_type(&path, &info, "dir"),
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }
    debug!("ensure_dir: creating {}", path.display());
    match fs.create_dir_all(&path).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_already_exists() => expect_type(&path, &fs.stat(&path).await?, "dir"),
        Err(e) => Err(e),
    }
}

/// Make sure `path` is a regular file, creating an empty one if missing
///
/// Missing parent directories are created. A symlink is not accepted, even
/// one pointing at a file.
///
/// # Errors
///
/// Returns `PolicyViolation::UnexpectedType` if something other than a
/// file is there, or a classified error if creation fails.
pub fn ensure_file(path: impl Into<PathLike>) -> Result<()> {
    let path = resolve(path)?;
    ensure_file_with(&LocalFs::new(), &path)
}

/// [`ensure_file`] through any blocking backend
///
/// # Errors
///
/// See [`ensure_file`].
pub fn ensure_file_with<F: FileSystem>(fs: &F, path: &Path) -> Result<()> {
    match fs.lstat(path) {
        Ok(info) => return expect_type(path, &info, "file"),
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }
    if let Some(parent) = path.parent() {
        ensure_dir_with(fs, parent)?;
    }
    debug!("ensure_file: creating {}", path.display());
    fs.write_file(path, &[])
}

/// [`ensure_file`] through any async backend
///
/// # Errors
///
/// See [`ensure_file`].
pub async fn ensure_file_async<F: AsyncFileSystem>(
    fs: &F,
    path: impl Into<PathLike>,
) -> Result<()> {
    let path = resolve(path)?;
    match fs.lstat(&path).await {
        Ok(info) => return expect_type(&path, &info, "file"),
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }
    if let Some(parent) = path.parent() {
        ensure_dir_async(fs, parent).await?;
    }
    debug!("ensure_file: creating {}", path.display());
    fs.write_file(&path, &[]).await
}

/// Whether `path` exists (following symlinks)
///
/// # Errors
///
/// Only `NotFound` maps to `false`; any other failure is returned.
pub fn exists(path: impl Into<PathLike>) -> Result<bool> {
    let path = resolve(path)?;
    exists_with(&LocalFs::new(), &path)
}

/// [`exists`] through any blocking backend
///
/// # Errors
///
/// See [`exists`].
pub fn exists_with<F: FileSystem>(fs: &F, path: &Path) -> Result<bool> {
    match fs.stat(path) {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// [`exists`] through any async backend
///
/// # Errors
///
/// See [`exists`].
pub async fn exists_async<F: AsyncFileSystem>(fs: &F, path: impl Into<PathLike>) -> Result<bool> {
    let path = resolve(path)?;
    match fs.stat(&path).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_and_is_idempotent() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let dir = temp_dir.path().join("x/y");

        ensure_dir(&dir)?;
        ensure_dir(&dir)?;
        assert!(dir.is_dir());
        Ok(())
    }

    #[test]
    fn test_ensure_dir_rejects_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("f");
        fs::write(&file, b"x")?;

        let err = ensure_dir(&file).unwrap_err();
        assert!(matches!(
            err,
            FsError::Policy(PolicyViolation::UnexpectedType {
                expected: "dir",
                actual: "file",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_ensure_file_creates_parents() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("a/b/c.txt");

        ensure_file(&file)?;
        assert!(file.is_file());
        assert_eq!(fs::read(&file)?.len(), 0);

        // Existing content is left alone
        fs::write(&file, b"keep")?;
        ensure_file(&file)?;
        assert_eq!(fs::read(&file)?, b"keep");
        Ok(())
    }

    #[test]
    fn test_ensure_file_rejects_dir() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        assert!(ensure_file(temp_dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_exists() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        assert!(exists(temp_dir.path())?);
        assert!(!exists(temp_dir.path().join("nope"))?);
        Ok(())
    }
}
