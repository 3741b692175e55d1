//! Async walker
//!
//! Same traversal as [`super::Walker`], suspending at each native call
//! instead of blocking.

use super::plan::{on_stack, Frame, Resolved, Visit, WalkPlan};
use super::{WalkEntry, WalkOptions};
use crate::error::Result;
use crate::path::{resolve, PathLike};
use crate::traits::{AsyncFileSystem, AsyncReadDir};
use futures::Stream;
use std::path::{Path, PathBuf};
use tracing::debug;

struct AsyncWalker<'a, F: AsyncFileSystem> {
    fs: &'a F,
    plan: WalkPlan,
    root: Option<Result<PathBuf>>,
    stack: Vec<Frame<F::ReadDir>>,
    done: bool,
}

impl<F: AsyncFileSystem> AsyncWalker<'_, F> {
    fn apply(&mut self, visit: Visit) -> Option<WalkEntry> {
        match visit {
            Visit::Skip => None,
            Visit::Yield(entry) => Some(entry),
            Visit::Descend { entry, dir } => {
                self.stack.push(Frame::new(dir));
                entry
            }
        }
    }

    async fn visit_root(&mut self, root: PathBuf) -> Result<Option<WalkEntry>> {
        debug!("walk: starting at {} ({})", root.display(), self.fs.name());
        let (info, real) = if self.plan.follows_symlinks() {
            let info = self.fs.stat(&root).await?;
            (info, Some(self.fs.real_path(&root).await?))
        } else {
            (self.fs.lstat(&root).await?, None)
        };
        let visit = self.plan.root(root, &info, real);
        Ok(self.apply(visit))
    }

    async fn resolve_link(&self, path: &Path) -> Result<Resolved> {
        let real = match self.fs.real_path(path).await {
            Ok(real) => real,
            Err(e) if e.is_not_found() => {
                debug!("walk: dangling symlink {}", path.display());
                return Ok(Resolved::Dangling);
            }
            Err(e) => return Err(e),
        };
        let info = self.fs.stat(&real).await?;
        Ok(Resolved::Target { real, info })
    }

    async fn step(&mut self) -> Result<Option<WalkEntry>> {
        if let Some(root) = self.root.take() {
            if let Some(entry) = self.visit_root(root?).await? {
                return Ok(Some(entry));
            }
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };
            if frame.listing.is_none() {
                frame.listing = Some(self.fs.read_dir(&frame.dir.path).await?);
            }
            let next = match frame.listing.as_mut() {
                Some(listing) => listing.next_entry().await,
                None => None,
            };
            let Some(dirent) = next else {
                self.stack.pop();
                continue;
            };
            let dirent = dirent?;

            let Some(parent) = self.stack.last().map(|frame| frame.dir.clone()) else {
                return Ok(None);
            };
            let resolved = if self.plan.needs_resolve(&dirent) {
                Some(self.resolve_link(&parent.path.join(&dirent.name)).await?)
            } else {
                None
            };
            let visit = self
                .plan
                .child(&parent, dirent, resolved, |c| on_stack(&self.stack, c));
            if let Some(entry) = self.apply(visit) {
                return Ok(Some(entry));
            }
        }
    }

    async fn next_entry(&mut self) -> Option<Result<WalkEntry>> {
        if self.done {
            return None;
        }
        match self.step().await {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                self.stack.clear();
                Some(Err(e))
            }
        }
    }
}

/// Walk a tree through an async backend
///
/// The stream is lazy and borrows `fs` for its lifetime. A root that
/// cannot be resolved or stat'ed is reported as the first item; after any
/// error the stream ends.
///
/// # Examples
///
/// ```rust,ignore
/// let fs = CompioFs::new();
/// let mut entries = std::pin::pin!(walk_async(&fs, "src", WalkOptions::default()));
/// while let Some(entry) = entries.next().await {
///     println!("{}", entry?.path.display());
/// }
/// ```
pub fn walk_async<'a, F: AsyncFileSystem>(
    fs: &'a F,
    root: impl Into<PathLike>,
    options: WalkOptions,
) -> impl Stream<Item = Result<WalkEntry>> + 'a {
    walk_resolved(fs, resolve(root), options)
}

fn walk_resolved<F: AsyncFileSystem>(
    fs: &F,
    root: Result<PathBuf>,
    options: WalkOptions,
) -> impl Stream<Item = Result<WalkEntry>> + '_ {
    let walker = AsyncWalker {
        fs,
        plan: WalkPlan::new(options),
        root: Some(root),
        stack: Vec::new(),
        done: false,
    };
    futures::stream::unfold(walker, |mut walker| async move {
        walker.next_entry().await.map(|item| (item, walker))
    })
}
