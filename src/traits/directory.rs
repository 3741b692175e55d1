//! Async directory listing
//!
//! The blocking listing is a plain `Iterator`; the async one can't be, so it
//! gets its own small trait.

use crate::error::Result;
use crate::metadata::DirEntry;

/// Lazily yields the entries of one directory
///
/// Each call performs at most one native read. Order is whatever the host
/// returns.
///
/// # Examples
///
/// ```rust,ignore
/// let mut entries = fs.read_dir(path).await?;
/// while let Some(entry) = entries.next_entry().await {
///     println!("{}", entry?.name);
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait AsyncReadDir {
    /// Next entry, `None` once the directory is exhausted
    async fn next_entry(&mut self) -> Option<Result<DirEntry>>;

    /// Drain the remaining entries into a `Vec`
    ///
    /// # Errors
    ///
    /// Returns the first read error.
    async fn collect_entries(&mut self) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry().await {
            entries.push(entry?);
        }
        Ok(entries)
    }
}
