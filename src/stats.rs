//! Statistics tracking for copy operations
//!
//! Copies run one node at a time, so the counters are plain integers owned
//! by the engine and handed back when the copy succeeds.

use serde::Serialize;
use std::fmt;

/// Counts returned by a successful copy
///
/// # Usage
///
/// ```rust,ignore
/// let stats = copy("src", "dst", &CopyOptions::default())?;
/// println!("{stats}");
/// assert_eq!(stats.files_copied, 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyStats {
    /// Regular files copied
    pub files_copied: u64,
    /// Directories created at the destination (existing ones are merged)
    pub directories_created: u64,
    /// Symlinks recreated
    pub symlinks_copied: u64,
    /// Bytes written across all files
    pub bytes_copied: u64,
    /// FIFOs, sockets and devices left out
    pub special_files_skipped: u64,
}

impl CopyStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            files_copied: 0,
            directories_created: 0,
            symlinks_copied: 0,
            bytes_copied: 0,
            special_files_skipped: 0,
        }
    }

    /// Record one copied file of `bytes` bytes
    pub const fn increment_files_copied(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied += bytes;
    }

    pub const fn increment_directories_created(&mut self) {
        self.directories_created += 1;
    }

    pub const fn increment_symlinks_copied(&mut self) {
        self.symlinks_copied += 1;
    }

    pub const fn increment_special_files_skipped(&mut self) {
        self.special_files_skipped += 1;
    }

    /// Total nodes written to the destination
    #[must_use]
    pub const fn total_entries(&self) -> u64 {
        self.files_copied + self.directories_created + self.symlinks_copied
    }
}

impl fmt::Display for CopyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files ({} bytes), {} directories, {} symlinks",
            self.files_copied, self.bytes_copied, self.directories_created, self.symlinks_copied
        )?;
        if self.special_files_skipped > 0 {
            write!(f, ", {} special files skipped", self.special_files_skipped)?;
        }
        Ok(())
    }
}
