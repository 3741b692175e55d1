//! Blocking copy engine

use super::{check_dest, check_distinct, check_roots, times_of, CopyOptions, NodeKind};
use crate::backends::LocalFs;
use crate::error::Result;
use crate::metadata::FileInfo;
use crate::path::{resolve, PathLike};
use crate::stats::CopyStats;
use crate::traits::FileSystem;
use std::path::Path;
use tracing::{debug, info, warn};

/// Copy a file, symlink or directory tree on the local host
///
/// Directories are merged into an existing destination; existing entries
/// are only replaced with `overwrite`.
///
/// # Errors
///
/// - `PolicyViolation::SameSourceAndDestination` if both resolve to the
///   same path
/// - `PolicyViolation::CopyIntoItself` if `dest` lies inside directory `src`
/// - `PolicyViolation::OverwriteNonDirectory` if a directory would replace
///   a non-directory
/// - `PolicyViolation::OverwriteDirectory` if a file or symlink would
///   replace a directory, even with `overwrite`
/// - `FsError::AlreadyExists` if `dest` exists and `overwrite` is off
/// - a classified error from the first failing native call
///
/// # Examples
///
/// ```rust,ignore
/// let stats = copy("assets", "dist/assets", &CopyOptions::default().overwrite(true))?;
/// println!("copied {stats}");
/// ```
pub fn copy(
    src: impl Into<PathLike>,
    dest: impl Into<PathLike>,
    options: &CopyOptions,
) -> Result<CopyStats> {
    let src = resolve(src)?;
    let dest = resolve(dest)?;
    copy_with(&LocalFs::new(), &src, &dest, options)
}

/// [`copy`] through any blocking backend
///
/// `src` and `dest` are used as given; resolve them first if they may be
/// relative.
///
/// # Errors
///
/// See [`copy`].
pub fn copy_with<F: FileSystem>(
    fs: &F,
    src: &Path,
    dest: &Path,
    options: &CopyOptions,
) -> Result<CopyStats> {
    check_distinct(src, dest)?;
    let src_info = fs.lstat(src)?;
    let kind = NodeKind::of_info(&src_info);
    check_roots(src, dest, kind)?;

    info!("copy: {} -> {} ({})", src.display(), dest.display(), fs.name());
    let mut copier = Copier {
        fs,
        options,
        stats: CopyStats::new(),
    };
    copier.node(kind, src, dest)?;
    info!("copy: done, {}", copier.stats);
    Ok(copier.stats)
}

struct Copier<'a, F> {
    fs: &'a F,
    options: &'a CopyOptions,
    stats: CopyStats,
}

impl<F: FileSystem> Copier<'_, F> {
    fn node(&mut self, kind: NodeKind, src: &Path, dest: &Path) -> Result<()> {
        match kind {
            NodeKind::Symlink => self.symlink(src, dest),
            NodeKind::Directory => self.directory(src, dest),
            NodeKind::File => self.file(src, dest),
            NodeKind::Special => {
                warn!("copy: skipping special file {}", src.display());
                self.stats.increment_special_files_skipped();
                Ok(())
            }
        }
    }

    /// Destination metadata, `None` if nothing is there
    fn probe(&self, dest: &Path) -> Result<Option<FileInfo>> {
        match self.fs.lstat(dest) {
            Ok(info) => Ok(Some(info)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn file(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let existing = self.probe(dest)?;
        check_dest(src, dest, NodeKind::File, existing.as_ref(), self.options)?;

        // Captured before reading so the copy itself can't bump atime
        let times = if self.options.preserve_timestamps {
            times_of(&self.fs.stat(src)?)
        } else {
            None
        };
        let bytes = self.fs.copy_file(src, dest)?;
        if let Some((atime, mtime)) = times {
            self.fs.set_times(dest, atime, mtime, true)?;
        }
        debug!("copy: file {} ({bytes} bytes)", dest.display());
        self.stats.increment_files_copied(bytes);
        Ok(())
    }

    fn symlink(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let existing = self.probe(dest)?;
        check_dest(src, dest, NodeKind::Symlink, existing.as_ref(), self.options)?;

        let target = self.fs.read_link(src)?;
        let target_is_dir = self.fs.stat(src).is_ok_and(|info| info.is_directory);
        // Directories were rejected above; only a file or link can be here
        if existing.is_some() {
            self.fs.remove_file(dest)?;
        }
        self.fs.symlink(&target, dest, target_is_dir)?;

        if self.options.preserve_timestamps {
            if let Some((atime, mtime)) = times_of(&self.fs.lstat(src)?) {
                self.fs.set_times(dest, atime, mtime, false)?;
            }
        }
        debug!("copy: symlink {} -> {}", dest.display(), target.display());
        self.stats.increment_symlinks_copied();
        Ok(())
    }

    fn directory(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let existing = self.probe(dest)?;
        check_dest(src, dest, NodeKind::Directory, existing.as_ref(), self.options)?;

        if existing.is_none() {
            self.fs.create_dir_all(dest)?;
            self.stats.increment_directories_created();
        }
        debug!("copy: directory {}", dest.display());

        for entry in self.fs.read_dir(src)? {
            let entry = entry?;
            let kind = NodeKind::of_entry(&entry);
            self.node(kind, &src.join(&entry.name), &dest.join(&entry.name))?;
        }

        // Last, so writing the children doesn't move the directory's mtime
        if self.options.preserve_timestamps {
            if let Some((atime, mtime)) = times_of(&self.fs.stat(src)?) {
                self.fs.set_times(dest, atime, mtime, true)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, FsError, PolicyViolation};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_copy_file_and_stats() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let src = temp_dir.path().join("a.txt");
        let dest = temp_dir.path().join("b.txt");
        fs::write(&src, b"hello")?;

        let stats = copy(&src, &dest, &CopyOptions::default())?;

        assert_eq!(fs::read(&dest)?, b"hello");
        assert_eq!(stats.files_copied, 1);
        assert_eq!(stats.bytes_copied, 5);
        Ok(())
    }

    #[test]
    fn test_same_path_fails_even_with_overwrite() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let src = temp_dir.path().join("a.txt");
        fs::write(&src, b"x")?;

        let err = copy(&src, &src, &CopyOptions::default().overwrite(true)).unwrap_err();
        assert!(matches!(
            err,
            FsError::Policy(PolicyViolation::SameSourceAndDestination { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_source_is_not_found() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let err = copy(
            temp_dir.path().join("nope"),
            temp_dir.path().join("dest"),
            &CopyOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        Ok(())
    }

    #[test]
    fn test_directory_merge_keeps_extra_children() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let src = temp_dir.path().join("src");
        let dest = temp_dir.path().join("dest");
        fs::create_dir_all(&src)?;
        fs::write(src.join("new.txt"), b"new")?;
        fs::create_dir_all(&dest)?;
        fs::write(dest.join("extra.txt"), b"extra")?;

        let stats = copy(&src, &dest, &CopyOptions::default().overwrite(true))?;

        assert_eq!(fs::read(dest.join("new.txt"))?, b"new");
        assert_eq!(fs::read(dest.join("extra.txt"))?, b"extra");
        assert_eq!(stats.directories_created, 0);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_fifo_is_skipped() -> anyhow::Result<()> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new()?;
        let src = temp_dir.path().join("src");
        fs::create_dir_all(&src)?;
        fs::write(src.join("plain"), b"p")?;
        let fifo = CString::new(src.join("pipe").as_os_str().as_bytes())?;
        // SAFETY: fifo is a valid NUL-terminated path
        let rc = unsafe { libc::mkfifo(fifo.as_ptr(), 0o600) };
        assert_eq!(rc, 0);

        let dest = temp_dir.path().join("dest");
        let stats = copy(&src, &dest, &CopyOptions::default())?;

        assert_eq!(stats.special_files_skipped, 1);
        assert!(dest.join("plain").exists());
        assert!(fs::symlink_metadata(dest.join("pipe")).is_err());
        Ok(())
    }
}
