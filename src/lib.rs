//! portafs - portable filesystem traversal and copy engine
//!
//! Walks, copies and tidies directory trees through a small set of native
//! primitives. Every operation comes in a blocking form over
//! [`traits::FileSystem`] and a suspending form over
//! [`traits::AsyncFileSystem`], the latter running on the compio runtime.
//!
//! # Modules
//!
//! - [`backends`]: `LocalFs` (std) and `CompioFs` (compio) adapters
//! - [`walk`]: recursive traversal with filters and symlink handling
//! - [`copy`]: recursive copy with overwrite and timestamp options
//! - [`directory`]: directory reader, `empty_dir`, `ensure_*`, `exists`
//! - [`metadata`]: host-independent `FileInfo` / `DirEntry`
//! - [`error`]: `FsError` and the `ErrorKind` classification
//! - [`path`]: path-like inputs, `file:` URLs and lexical helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use portafs::{copy, walk, CopyOptions, WalkOptions};
//!
//! for entry in walk("src", WalkOptions::default().with_exts(["rs"])) {
//!     println!("{}", entry?.path.display());
//! }
//! let stats = copy("src", "backup/src", &CopyOptions::default())?;
//! ```

pub mod backends;
pub mod cancel;
pub mod cli;
pub mod copy;
pub mod directory;
pub mod error;
pub mod metadata;
pub mod path;
pub mod stats;
pub mod traits;
pub mod walk;

pub use backends::{CompioFs, LocalFs};
pub use cancel::CancelToken;
pub use copy::{copy, copy_async, copy_with, CopyOptions};
pub use directory::{
    empty_dir, empty_dir_async, ensure_dir, ensure_dir_async, ensure_file, ensure_file_async,
    exists, exists_async, read_dir, read_dir_async,
};
pub use error::{ErrorKind, FsError, PolicyViolation, Result};
pub use metadata::{DirEntry, FileInfo, HostCapabilities};
pub use stats::CopyStats;
pub use walk::{walk, walk_async, WalkEntry, WalkOptions, Walker};
