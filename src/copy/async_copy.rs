//! Async copy engine

use super::{check_dest, check_distinct, check_roots, times_of, CopyOptions, NodeKind};
use crate::error::Result;
use crate::metadata::FileInfo;
use crate::path::{resolve, PathLike};
use crate::stats::CopyStats;
use crate::traits::{AsyncFileSystem, AsyncReadDir};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Copy a file, symlink or directory tree through an async backend
///
/// Same rules as [`super::copy`]; each native call suspends instead of
/// blocking. With a cancelled `CompioFs` the copy stops with
/// `FsError::Cancelled` before its next call.
///
/// # Errors
///
/// See [`super::copy`].
#[allow(clippy::future_not_send)]
pub async fn copy_async<F: AsyncFileSystem>(
    fs: &F,
    src: impl Into<PathLike>,
    dest: impl Into<PathLike>,
    options: &CopyOptions,
) -> Result<CopyStats> {
    let src = resolve(src)?;
    let dest = resolve(dest)?;
    check_distinct(&src, &dest)?;
    let src_info = fs.lstat(&src).await?;
    let kind = NodeKind::of_info(&src_info);
    check_roots(&src, &dest, kind)?;

    info!("copy: {} -> {} ({})", src.display(), dest.display(), fs.name());
    let mut copier = AsyncCopier {
        fs,
        options,
        stats: CopyStats::new(),
    };
    copier.node(kind, src, dest).await?;
    info!("copy: done, {}", copier.stats);
    Ok(copier.stats)
}

struct AsyncCopier<'a, F> {
    fs: &'a F,
    options: &'a CopyOptions,
    stats: CopyStats,
}

impl<F: AsyncFileSystem> AsyncCopier<'_, F> {
    async fn node(&mut self, kind: NodeKind, src: PathBuf, dest: PathBuf) -> Result<()> {
        match kind {
            NodeKind::Symlink => self.symlink(&src, &dest).await,
            // Recursion through directories needs an indirection
            NodeKind::Directory => Box::pin(self.directory(&src, &dest)).await,
            NodeKind::File => self.file(&src, &dest).await,
            NodeKind::Special => {
                warn!("copy: skipping special file {}", src.display());
                self.stats.increment_special_files_skipped();
                Ok(())
            }
        }
    }

    async fn probe(&self, dest: &Path) -> Result<Option<FileInfo>> {
        match self.fs.lstat(dest).await {
            Ok(info) => Ok(Some(info)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn file(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let existing = self.probe(dest).await?;
        check_dest(src, dest, NodeKind::File, existing.as_ref(), self.options)?;

        // Captured before reading so the copy itself can't bump atime
        let times = if self.options.preserve_timestamps {
            times_of(&self.fs.stat(src).await?)
        } else {
            None
        };
        let bytes = self.fs.copy_file(src, dest).await?;
        if let Some((atime, mtime)) = times {
            self.fs.set_times(dest, atime, mtime, true).await?;
        }
        debug!("copy: file {} ({bytes} bytes)", dest.display());
        self.stats.increment_files_copied(bytes);
        Ok(())
    }

    async fn symlink(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let existing = self.probe(dest).await?;
        check_dest(src, dest, NodeKind::Symlink, existing.as_ref(), self.options)?;

        let target = self.fs.read_link(src).await?;
        let target_is_dir = self
            .fs
            .stat(src)
            .await
            .is_ok_and(|info| info.is_directory);
        // Directories were rejected above; only a file or link can be here
        if existing.is_some() {
            self.fs.remove_file(dest).await?;
        }
        self.fs.symlink(&target, dest, target_is_dir).await?;

        if self.options.preserve_timestamps {
            if let Some((atime, mtime)) = times_of(&self.fs.lstat(src).await?) {
                self.fs.set_times(dest, atime, mtime, false).await?;
            }
        }
        debug!("copy: symlink {} -> {}", dest.display(), target.display());
        self.stats.increment_symlinks_copied();
        Ok(())
    }

    async fn directory(&mut self, src: &Path, dest: &Path) -> Result<()> {
        let existing = self.probe(dest).await?;
        check_dest(src, dest, NodeKind::Directory, existing.as_ref(), self.options)?;

        if existing.is_none() {
            self.fs.create_dir_all(dest).await?;
            self.stats.increment_directories_created();
        }
        debug!("copy: directory {}", dest.display());

        let mut entries = self.fs.read_dir(src).await?;
        while let Some(entry) = entries.next_entry().await {
            let entry = entry?;
            let kind = NodeKind::of_entry(&entry);
            self.node(kind, src.join(&entry.name), dest.join(&entry.name))
                .await?;
        }

        // Last, so writing the children doesn't move the directory's mtime
        if self.options.preserve_timestamps {
            if let Some((atime, mtime)) = times_of(&self.fs.stat(src).await?) {
                self.fs.set_times(dest, atime, mtime, true).await?;
            }
        }
        Ok(())
    }
}
