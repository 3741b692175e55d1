//! Blocking local filesystem backend
//!
//! Thin adapter from [`FileSystem`] to `std::fs`. Each method is exactly one
//! native call, with its error classified on the way out.

use crate::error::{FsError, IoResultExt, Result};
use crate::metadata::{DirEntry, FileInfo, HostCapabilities, MetadataMapper};
use crate::traits::FileSystem;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Local filesystem backend using `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs {
    mapper: MetadataMapper,
}

impl LocalFs {
    /// Create a backend for the current host
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::detect())
    }

    /// Create a backend reporting only what `capabilities` allows
    #[must_use]
    pub const fn with_capabilities(capabilities: HostCapabilities) -> Self {
        Self {
            mapper: MetadataMapper::new(capabilities),
        }
    }

    #[must_use]
    pub const fn mapper(&self) -> &MetadataMapper {
        &self.mapper
    }
}

/// Lazy listing over `std::fs::ReadDir`
#[derive(Debug)]
pub struct LocalReadDir {
    inner: fs::ReadDir,
    path: PathBuf,
    mapper: MetadataMapper,
}

impl Iterator for LocalReadDir {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(FsError::io("readdir", &self.path, e))),
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        Some(
            entry
                .file_type()
                .at("readdir", &entry.path())
                .map(|file_type| self.mapper.to_dir_entry(name, &file_type)),
        )
    }
}

impl FileSystem for LocalFs {
    type ReadDir = LocalReadDir;

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        let meta = fs::metadata(path).at("stat", path)?;
        Ok(self.mapper.to_file_info(&meta))
    }

    fn lstat(&self, path: &Path) -> Result<FileInfo> {
        let meta = fs::symlink_metadata(path).at("lstat", path)?;
        Ok(self.mapper.to_file_info(&meta))
    }

    fn read_dir(&self, path: &Path) -> Result<Self::ReadDir> {
        let inner = fs::read_dir(path).at("readdir", path)?;
        Ok(LocalReadDir {
            inner,
            path: path.to_path_buf(),
            mapper: self.mapper,
        })
    }

    fn real_path(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).at("realpath", path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).at("mkdir", path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).at("remove", path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).at("remove", path)
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> Result<u64> {
        fs::copy(src, dest).at("copy", src)
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).at("readlink", path)
    }

    fn symlink(&self, target: &Path, link: &Path, target_is_dir: bool) -> Result<()> {
        super::create_symlink(target, link, target_is_dir).at("symlink", link)
    }

    fn set_times(
        &self,
        path: &Path,
        atime: SystemTime,
        mtime: SystemTime,
        follow: bool,
    ) -> Result<()> {
        let atime = FileTime::from_system_time(atime);
        let mtime = FileTime::from_system_time(mtime);
        if follow {
            filetime::set_file_times(path, atime, mtime).at("utime", path)
        } else {
            filetime::set_symlink_file_times(path, atime, mtime).at("utime", path)
        }
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).at("write", path)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
