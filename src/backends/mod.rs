//! Host adapters for the native primitive traits
//!
//! - `LocalFs`: blocking, `std::fs`
//! - `CompioFs`: async, compio runtime

pub mod compio_fs;
pub mod local;

pub use compio_fs::CompioFs;
pub use local::LocalFs;

use std::io;
use std::path::Path;

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path, _target_is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path, target_is_dir: bool) -> io::Result<()> {
    if target_is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, _link: &Path, _target_is_dir: bool) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this host",
    ))
}
