//! Recursive copy of files, directories and symlinks
//!
//! # Module Organization
//!
//! - `mod`: options, node classification and the pre-copy checks (this file)
//! - `blocking`: [`copy`] / [`copy_with`] over any [`FileSystem`]
//! - `async_copy`: [`copy_async`] over any [`AsyncFileSystem`]
//!
//! Both engines visit one node at a time and merge into an existing
//! destination tree. A failure stops the copy; whatever was already copied
//! stays.
//!
//! [`FileSystem`]: crate::traits::FileSystem
//! [`AsyncFileSystem`]: crate::traits::AsyncFileSystem

mod async_copy;
mod blocking;

pub use async_copy::copy_async;
pub use blocking::{copy, copy_with};

use crate::error::{FsError, PolicyViolation, Result};
use crate::metadata::{DirEntry, FileInfo};
use crate::path::is_subdir;
use std::path::Path;
use std::time::SystemTime;

/// Copy behavior switches
///
/// Derives `clap::Args` so the command line can flatten it directly.
#[derive(clap::Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Replace existing destination entries
    #[arg(long)]
    pub overwrite: bool,

    /// Carry access and modification times over to the destination
    #[arg(long)]
    pub preserve_timestamps: bool,
}

impl CopyOptions {
    #[must_use]
    pub const fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub const fn preserve_timestamps(mut self, preserve: bool) -> Self {
        self.preserve_timestamps = preserve;
        self
    }
}

/// What a source node is, for dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    File,
    Directory,
    Symlink,
    /// FIFO, socket or device
    Special,
}

impl NodeKind {
    const fn from_flags(is_file: bool, is_directory: bool, is_symlink: bool) -> Self {
        if is_symlink {
            Self::Symlink
        } else if is_directory {
            Self::Directory
        } else if is_file {
            Self::File
        } else {
            Self::Special
        }
    }

    pub(crate) const fn of_info(info: &FileInfo) -> Self {
        Self::from_flags(info.is_file, info.is_directory, info.is_symlink)
    }

    pub(crate) const fn of_entry(entry: &DirEntry) -> Self {
        Self::from_flags(entry.is_file, entry.is_directory, entry.is_symlink)
    }
}

/// Checks on the top-level pair that need no destination metadata
pub(crate) fn check_roots(src: &Path, dest: &Path, src_kind: NodeKind) -> Result<()> {
    if src_kind == NodeKind::Directory && is_subdir(src, dest) {
        return Err(PolicyViolation::CopyIntoItself {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Fail fast when source and destination are the same path
pub(crate) fn check_distinct(src: &Path, dest: &Path) -> Result<()> {
    if src == dest {
        return Err(PolicyViolation::SameSourceAndDestination {
            path: src.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Validate copying a node of `src_kind` onto whatever is at `dest`
pub(crate) fn check_dest(
    src: &Path,
    dest: &Path,
    src_kind: NodeKind,
    dest_info: Option<&FileInfo>,
    options: &CopyOptions,
) -> Result<()> {
    let Some(dest_info) = dest_info else {
        return Ok(());
    };
    if src_kind == NodeKind::Directory && !dest_info.is_directory {
        return Err(PolicyViolation::OverwriteNonDirectory {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
        }
        .into());
    }
    if src_kind != NodeKind::Directory && dest_info.is_directory {
        return Err(PolicyViolation::OverwriteDirectory {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
        }
        .into());
    }
    if !options.overwrite {
        return Err(FsError::AlreadyExists {
            path: dest.to_path_buf(),
        });
    }
    Ok(())
}

/// Access and modification times of `info`, if the host reported both
pub(crate) fn times_of(info: &FileInfo) -> Option<(SystemTime, SystemTime)> {
    match (info.atime, info.mtime) {
        (Some(atime), Some(mtime)) => Some((atime, mtime)),
        _ => None,
    }
}
