//! Native filesystem primitives
//!
//! The walker, copy engine and directory helpers never call `std::fs` or
//! `compio::fs` themselves. They go through these traits, with one adapter
//! per host runtime in [`crate::backends`]:
//!
//! - [`FileSystem`]: blocking primitives (`LocalFs`)
//! - [`AsyncFileSystem`]: suspending primitives (`CompioFs`)
//!
//! Every primitive performs one native call and returns an already
//! classified [`crate::error::FsError`].

pub mod directory;
pub mod filesystem;

// Re-export main traits for convenience
pub use directory::AsyncReadDir;
pub use filesystem::{AsyncFileSystem, FileSystem};
