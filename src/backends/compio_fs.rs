//! Async local filesystem backend on the compio runtime
//!
//! File bytes are moved with compio's positional `read_at`/`write_at`.
//! Calls compio has no native op for (stat, readdir, realpath, utime, ...)
//! run through `compio::runtime::spawn_blocking` so they never block the
//! executor thread.
//!
//! A [`CancelToken`] is checked before every native call.

use crate::cancel::CancelToken;
use crate::error::{FsError, IoResultExt, Result};
use crate::metadata::{DirEntry, FileInfo, HostCapabilities, MetadataMapper};
use crate::traits::{AsyncFileSystem, AsyncReadDir};
use compio::fs::File;
use compio::io::{AsyncReadAt, AsyncWriteAt};
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// I/O buffer size (in bytes) for chunked file copies
const BUFFER_SIZE: usize = 64 * 1024;

/// Async local filesystem backend
#[derive(Debug, Clone, Default)]
pub struct CompioFs {
    mapper: MetadataMapper,
    cancel: CancelToken,
}

impl CompioFs {
    /// Create a backend for the current host
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::detect())
    }

    /// Create a backend reporting only what `capabilities` allows
    #[must_use]
    pub fn with_capabilities(capabilities: HostCapabilities) -> Self {
        Self {
            mapper: MetadataMapper::new(capabilities),
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Run one blocking native call off the executor thread
    async fn blocking<T, F>(&self, op: &'static str, path: &Path, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> io::Result<T> + Send + 'static,
    {
        self.cancel.check()?;
        let owned = path.to_path_buf();
        compio::runtime::spawn_blocking(move || f(&owned))
            .await
            .map_err(|e| FsError::Runtime(format!("spawn_blocking failed: {e:?}")))?
            .at(op, path)
    }
}

/// Lazy async listing; each entry is read on a blocking thread
#[derive(Debug)]
pub struct CompioReadDir {
    inner: Option<fs::ReadDir>,
    path: PathBuf,
    mapper: MetadataMapper,
    cancel: CancelToken,
}

impl AsyncReadDir for CompioReadDir {
    async fn next_entry(&mut self) -> Option<Result<DirEntry>> {
        if let Err(e) = self.cancel.check() {
            self.inner = None;
            return Some(Err(e));
        }
        let mut inner = self.inner.take()?;

        let joined = compio::runtime::spawn_blocking(move || {
            let next = inner.next().map(|entry| {
                entry.and_then(|entry| {
                    let file_type = entry.file_type()?;
                    Ok((entry.file_name(), file_type))
                })
            });
            (inner, next)
        })
        .await;

        let (inner, next) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                return Some(Err(FsError::Runtime(format!(
                    "spawn_blocking failed: {e:?}"
                ))))
            }
        };

        match next? {
            Ok((name, file_type)) => {
                self.inner = Some(inner);
                let name = name.to_string_lossy().into_owned();
                Some(Ok(self.mapper.to_dir_entry(name, &file_type)))
            }
            Err(e) => Some(Err(FsError::io("readdir", &self.path, e))),
        }
    }
}

impl AsyncFileSystem for CompioFs {
    type ReadDir = CompioReadDir;

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        let meta = self.blocking("stat", path, |p| fs::metadata(p)).await?;
        Ok(self.mapper.to_file_info(&meta))
    }

    async fn lstat(&self, path: &Path) -> Result<FileInfo> {
        let meta = self
            .blocking("lstat", path, |p| fs::symlink_metadata(p))
            .await?;
        Ok(self.mapper.to_file_info(&meta))
    }

    async fn read_dir(&self, path: &Path) -> Result<Self::ReadDir> {
        let inner = self.blocking("readdir", path, |p| fs::read_dir(p)).await?;
        Ok(CompioReadDir {
            inner: Some(inner),
            path: path.to_path_buf(),
            mapper: self.mapper,
            cancel: self.cancel.clone(),
        })
    }

    async fn real_path(&self, path: &Path) -> Result<PathBuf> {
        self.blocking("realpath", path, |p| fs::canonicalize(p)).await
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.blocking("mkdir", path, |p| fs::create_dir_all(p)).await
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        self.cancel.check()?;
        compio::fs::remove_file(path).await.at("remove", path)
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.blocking("remove", path, |p| fs::remove_dir_all(p)).await
    }

    async fn copy_file(&self, src: &Path, dest: &Path) -> Result<u64> {
        self.cancel.check()?;
        let src_file = File::open(src).await.at("open", src)?;
        self.cancel.check()?;
        let mut dst_file = File::create(dest).await.at("create", dest)?;

        // One buffer for the whole copy; read_at/write_at hand it back
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut offset = 0u64;

        loop {
            self.cancel.check()?;
            let read_result = src_file.read_at(buffer, offset).await;
            let bytes_read = read_result.0.at("read", src)?;
            buffer = read_result.1;

            if bytes_read == 0 {
                break;
            }
            buffer.truncate(bytes_read);

            self.cancel.check()?;
            let write_result = dst_file.write_at(buffer, offset).await;
            let bytes_written = write_result.0.at("write", dest)?;
            buffer = write_result.1;
            buffer.resize(BUFFER_SIZE, 0);

            if bytes_written != bytes_read {
                return Err(FsError::io(
                    "write",
                    dest,
                    io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("short write: expected {bytes_read}, wrote {bytes_written}"),
                    ),
                ));
            }
            offset += bytes_written as u64;
        }

        // Match std::fs::copy, which carries the permission bits over
        let permissions = self
            .blocking("stat", src, |p| fs::metadata(p).map(|m| m.permissions()))
            .await?;
        self.blocking("chmod", dest, move |p| fs::set_permissions(p, permissions))
            .await?;

        tracing::debug!("copied {} bytes {} -> {}", offset, src.display(), dest.display());
        Ok(offset)
    }

    async fn read_link(&self, path: &Path) -> Result<PathBuf> {
        self.blocking("readlink", path, |p| fs::read_link(p)).await
    }

    async fn symlink(&self, target: &Path, link: &Path, target_is_dir: bool) -> Result<()> {
        let target = target.to_path_buf();
        self.blocking("symlink", link, move |p| {
            super::create_symlink(&target, p, target_is_dir)
        })
        .await
    }

    async fn set_times(
        &self,
        path: &Path,
        atime: SystemTime,
        mtime: SystemTime,
        follow: bool,
    ) -> Result<()> {
        let atime = FileTime::from_system_time(atime);
        let mtime = FileTime::from_system_time(mtime);
        self.blocking("utime", path, move |p| {
            if follow {
                filetime::set_file_times(p, atime, mtime)
            } else {
                filetime::set_symlink_file_times(p, atime, mtime)
            }
        })
        .await
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let contents = contents.to_vec();
        self.blocking("write", path, move |p| fs::write(p, contents))
            .await
    }

    fn name(&self) -> &'static str {
        "compio"
    }
}
