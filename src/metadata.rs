//! Uniform file metadata
//!
//! This module turns native `std::fs::Metadata` / `std::fs::FileType` values
//! into the host-independent [`FileInfo`] and [`DirEntry`] records used by
//! the rest of the crate.
//!
//! # Architecture
//!
//! - `HostCapabilities`: what the host can report, detected once
//! - `MetadataMapper`: pure conversion, parameterized by the capabilities
//! - `FileInfo` / `DirEntry`: immutable values handed to callers
//!
//! Fields a host cannot report are `None`, never zero. `FileInfo` serializes
//! every field, so a missing POSIX field shows up as `null` in JSON.

use serde::Serialize;
use std::fs;
use std::time::SystemTime;

// ============================================================================
// CAPABILITIES
// ============================================================================

/// What the current host can report about a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// mode/uid/gid/dev/ino/nlink/rdev/blksize/blocks and special-file flags
    pub posix_fields: bool,
    /// Creation time
    pub birthtime: bool,
}

impl HostCapabilities {
    /// Capabilities of the platform this binary was built for
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            posix_fields: cfg!(unix),
            birthtime: cfg!(any(target_os = "macos", target_os = "ios", windows, target_os = "linux")),
        }
    }

    /// A host that reports nothing beyond type, size and modification times
    #[must_use]
    pub const fn minimal() -> Self {
        Self {
            posix_fields: false,
            birthtime: false,
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}

// ============================================================================
// VALUES
// ============================================================================

/// Metadata of one filesystem node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)] // Mirrors the native record
pub struct FileInfo {
    pub is_file: bool,
    pub is_directory: bool,
    pub is_symlink: bool,
    pub size: u64,
    pub mtime: Option<SystemTime>,
    pub atime: Option<SystemTime>,
    pub birthtime: Option<SystemTime>,
    pub dev: Option<u64>,
    pub ino: Option<u64>,
    pub mode: Option<u32>,
    pub nlink: Option<u64>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub rdev: Option<u64>,
    pub blksize: Option<u64>,
    pub blocks: Option<u64>,
    pub is_block_device: Option<bool>,
    pub is_char_device: Option<bool>,
    pub is_fifo: Option<bool>,
    pub is_socket: Option<bool>,
}

impl FileInfo {
    /// Short name of the node type, used in error messages
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        if self.is_symlink {
            "symlink"
        } else if self.is_directory {
            "dir"
        } else if self.is_file {
            "file"
        } else {
            "other"
        }
    }
}

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
    /// Base name only
    pub name: String,
    pub is_file: bool,
    pub is_directory: bool,
    pub is_symlink: bool,
}

// ============================================================================
// MAPPER
// ============================================================================

/// Converts native metadata into [`FileInfo`] / [`DirEntry`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataMapper {
    capabilities: HostCapabilities,
}

impl MetadataMapper {
    #[must_use]
    pub const fn new(capabilities: HostCapabilities) -> Self {
        Self { capabilities }
    }

    #[must_use]
    pub const fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    /// Map a native stat result
    #[must_use]
    pub fn to_file_info(&self, meta: &fs::Metadata) -> FileInfo {
        let file_type = meta.file_type();
        let posix = PosixFields::read(meta, self.capabilities.posix_fields);

        FileInfo {
            is_file: file_type.is_file(),
            is_directory: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
            size: meta.len(),
            mtime: meta.modified().ok(),
            atime: meta.accessed().ok(),
            birthtime: if self.capabilities.birthtime {
                meta.created().ok()
            } else {
                None
            },
            dev: posix.dev,
            ino: posix.ino,
            mode: posix.mode,
            nlink: posix.nlink,
            uid: posix.uid,
            gid: posix.gid,
            rdev: posix.rdev,
            blksize: posix.blksize,
            blocks: posix.blocks,
            is_block_device: posix.is_block_device,
            is_char_device: posix.is_char_device,
            is_fifo: posix.is_fifo,
            is_socket: posix.is_socket,
        }
    }

    /// Map a native directory entry
    #[must_use]
    pub fn to_dir_entry(&self, name: String, file_type: &fs::FileType) -> DirEntry {
        DirEntry {
            name,
            is_file: file_type.is_file(),
            is_directory: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
        }
    }
}

#[derive(Default)]
#[allow(clippy::struct_excessive_bools)]
struct PosixFields {
    dev: Option<u64>,
    ino: Option<u64>,
    mode: Option<u32>,
    nlink: Option<u64>,
    uid: Option<u32>,
    gid: Option<u32>,
    rdev: Option<u64>,
    blksize: Option<u64>,
    blocks: Option<u64>,
    is_block_device: Option<bool>,
    is_char_device: Option<bool>,
    is_fifo: Option<bool>,
    is_socket: Option<bool>,
}

impl PosixFields {
    #[cfg(unix)]
    fn read(meta: &fs::Metadata, enabled: bool) -> Self {
        use std::os::unix::fs::{FileTypeExt, MetadataExt};

        if !enabled {
            return Self::default();
        }
        let file_type = meta.file_type();
        Self {
            dev: Some(meta.dev()),
            ino: Some(meta.ino()),
            mode: Some(meta.mode()),
            nlink: Some(meta.nlink()),
            uid: Some(meta.uid()),
            gid: Some(meta.gid()),
            rdev: Some(meta.rdev()),
            blksize: Some(meta.blksize()),
            blocks: Some(meta.blocks()),
            is_block_device: Some(file_type.is_block_device()),
            is_char_device: Some(file_type.is_char_device()),
            is_fifo: Some(file_type.is_fifo()),
            is_socket: Some(file_type.is_socket()),
        }
    }

    #[cfg(not(unix))]
    fn read(_meta: &fs::Metadata, _enabled: bool) -> Self {
        Self::default()
    }
}
