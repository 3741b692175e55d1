//! Error taxonomy for filesystem operations
//!
//! Every native failure is classified exactly once, at the call site that
//! talked to the host, into an [`ErrorKind`]. The classified error then
//! travels unchanged through the walker and copy engine.
//!
//! Engine-level policy failures (copying a directory into itself, overwriting
//! a file with a directory, ...) are not OS conditions and live in
//! [`PolicyViolation`] instead.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Result type used throughout portafs
pub type Result<T> = std::result::Result<T, FsError>;

/// Platform-independent classification of a native failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    Busy,
    Interrupted,
    InvalidData,
    BrokenPipe,
    BadResource,
    TimedOut,
    UnexpectedEof,
    WriteZero,
    Other,
}

impl ErrorKind {
    /// Stable name of the kind, as printed in error messages
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::PermissionDenied => "PermissionDenied",
            Self::Busy => "Busy",
            Self::Interrupted => "Interrupted",
            Self::InvalidData => "InvalidData",
            Self::BrokenPipe => "BrokenPipe",
            Self::BadResource => "BadResource",
            Self::TimedOut => "TimedOut",
            Self::UnexpectedEof => "UnexpectedEof",
            Self::WriteZero => "WriteZero",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine-raised invariant violations
///
/// These describe a request the engine refuses to carry out. They never
/// originate from the host and therefore carry no [`ErrorKind`].
#[derive(Debug, thiserror::Error)]
pub enum PolicyViolation {
    #[error("source and destination cannot be the same: '{}'", path.display())]
    SameSourceAndDestination { path: PathBuf },

    #[error("cannot copy '{}' to a subdirectory of itself: '{}'", src.display(), dest.display())]
    CopyIntoItself { src: PathBuf, dest: PathBuf },

    #[error("cannot overwrite non-directory '{}' with directory '{}'", dest.display(), src.display())]
    OverwriteNonDirectory { src: PathBuf, dest: PathBuf },

    #[error("cannot overwrite directory '{}' with non-directory '{}'", dest.display(), src.display())]
    OverwriteDirectory { src: PathBuf, dest: PathBuf },

    #[error("ensure path exists, expected '{expected}', got '{actual}': '{}'", path.display())]
    UnexpectedType {
        path: PathBuf,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Error type for all portafs operations
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// A native call failed; `kind` is its classification
    #[error("{kind}: {op} '{}': {source}", path.display())]
    Io {
        kind: ErrorKind,
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination exists and overwriting was not requested
    #[error("AlreadyExists: '{}' already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("invalid path '{input}': {reason}")]
    InvalidPath { input: String, reason: String },

    /// The operation was cancelled before its next native call
    #[error("operation cancelled")]
    Cancelled,

    /// The async runtime could not run a blocking task
    #[error("runtime failure: {0}")]
    Runtime(String),
}

impl FsError {
    /// Wrap a native error, classifying it
    #[must_use]
    pub fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            kind: classify(&source),
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Classification of this error, if it reflects an OS condition
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Io { kind, .. } => Some(*kind),
            Self::AlreadyExists { .. } => Some(ErrorKind::AlreadyExists),
            Self::Runtime(_) => Some(ErrorKind::Other),
            Self::Policy(_) | Self::InvalidPath { .. } | Self::Cancelled => None,
        }
    }

    /// Shorthand for `kind() == Some(ErrorKind::NotFound)`
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }

    /// Shorthand for `kind() == Some(ErrorKind::AlreadyExists)`
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        self.kind() == Some(ErrorKind::AlreadyExists)
    }
}

/// Attach the operation name and path to a native `io::Result`
pub trait IoResultExt<T> {
    /// Classify the error (if any) and record where it happened
    ///
    /// # Errors
    ///
    /// Returns `FsError::Io` when `self` is an error.
    fn at(self, op: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, op: &'static str, path: &Path) -> Result<T> {
        self.map_err(|e| FsError::io(op, path, e))
    }
}

#[cfg(windows)]
mod os_codes {
    pub const BUSY: i32 = 170; // ERROR_BUSY
    pub const SHARING_VIOLATION: i32 = 32; // ERROR_SHARING_VIOLATION
    pub const INVALID_HANDLE: i32 = 6; // ERROR_INVALID_HANDLE
}

/// Map a native error to its [`ErrorKind`]
///
/// Never fails: anything unrecognized becomes `ErrorKind::Other`.
#[must_use]
pub fn classify(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::NotFound => return ErrorKind::NotFound,
        io::ErrorKind::AlreadyExists => return ErrorKind::AlreadyExists,
        io::ErrorKind::PermissionDenied => return ErrorKind::PermissionDenied,
        io::ErrorKind::Interrupted => return ErrorKind::Interrupted,
        io::ErrorKind::InvalidData => return ErrorKind::InvalidData,
        io::ErrorKind::BrokenPipe => return ErrorKind::BrokenPipe,
        io::ErrorKind::TimedOut => return ErrorKind::TimedOut,
        io::ErrorKind::UnexpectedEof => return ErrorKind::UnexpectedEof,
        io::ErrorKind::WriteZero => return ErrorKind::WriteZero,
        _ => {}
    }

    match err.raw_os_error() {
        Some(code) => classify_os_code(code),
        None => ErrorKind::Other,
    }
}

#[cfg(unix)]
fn classify_os_code(code: i32) -> ErrorKind {
    match code {
        libc::EBUSY | libc::ETXTBSY => ErrorKind::Busy,
        libc::EBADF => ErrorKind::BadResource,
        libc::ENOENT => ErrorKind::NotFound,
        libc::EEXIST => ErrorKind::AlreadyExists,
        libc::EACCES | libc::EPERM => ErrorKind::PermissionDenied,
        libc::EINTR => ErrorKind::Interrupted,
        libc::EPIPE => ErrorKind::BrokenPipe,
        libc::ETIMEDOUT => ErrorKind::TimedOut,
        _ => ErrorKind::Other,
    }
}

#[cfg(windows)]
fn classify_os_code(code: i32) -> ErrorKind {
    match code {
        os_codes::BUSY | os_codes::SHARING_VIOLATION => ErrorKind::Busy,
        os_codes::INVALID_HANDLE => ErrorKind::BadResource,
        _ => ErrorKind::Other,
    }
}

#[cfg(not(any(unix, windows)))]
fn classify_os_code(_code: i32) -> ErrorKind {
    ErrorKind::Other
}
