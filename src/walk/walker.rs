//! Blocking walker

use super::plan::{on_stack, Frame, Resolved, Visit, WalkPlan};
use super::{WalkEntry, WalkOptions};
use crate::backends::LocalFs;
use crate::error::Result;
use crate::path::{resolve, PathLike};
use crate::traits::FileSystem;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lazy pre-order traversal over a [`FileSystem`]
///
/// Each call to `next` performs at most one directory read plus the
/// `realpath`/`stat` a followed symlink needs. After the first error the
/// iterator is exhausted.
pub struct Walker<F: FileSystem = LocalFs> {
    fs: F,
    plan: WalkPlan,
    /// Resolved root, taken on the first call
    root: Option<Result<PathBuf>>,
    stack: Vec<Frame<F::ReadDir>>,
    done: bool,
}

impl<F: FileSystem> Walker<F> {
    /// Walk `root` through `fs`
    pub fn new(fs: F, root: impl Into<PathLike>, options: WalkOptions) -> Self {
        Self {
            fs,
            plan: WalkPlan::new(options),
            root: Some(resolve(root)),
            stack: Vec::new(),
            done: false,
        }
    }

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

    fn visit_root(&mut self, root: PathBuf) -> Result<Option<WalkEntry>> {
        debug!("walk: starting at {} ({})", root.display(), self.fs.name());
        let (info, real) = if self.plan.follows_symlinks() {
            (self.fs.stat(&root)?, Some(self.fs.real_path(&root)?))
        } else {
            (self.fs.lstat(&root)?, None)
        };
        let visit = self.plan.root(root, &info, real);
        Ok(self.apply(visit))
    }

    fn resolve_link(&self, path: &Path) -> Result<Resolved> {
        let real = match self.fs.real_path(path) {
            Ok(real) => real,
            Err(e) if e.is_not_found() => {
                debug!("walk: dangling symlink {}", path.display());
                return Ok(Resolved::Dangling);
            }
            Err(e) => return Err(e),
        };
        let info = self.fs.stat(&real)?;
        Ok(Resolved::Target { real, info })
    }

    fn step(&mut self) -> Result<Option<WalkEntry>> {
        if let Some(root) = self.root.take() {
            if let Some(entry) = self.visit_root(root?)? {
                return Ok(Some(entry));
            }
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };
            if frame.listing.is_none() {
                frame.listing = Some(self.fs.read_dir(&frame.dir.path)?);
            }
            let Some(dirent) = frame.listing.as_mut().and_then(Iterator::next) else {
                self.stack.pop();
                continue;
            };
            let dirent = dirent?;

            let Some(parent) = self.stack.last().map(|frame| &frame.dir) else {
                return Ok(None);
            };
            let resolved = if self.plan.needs_resolve(&dirent) {
                Some(self.resolve_link(&parent.path.join(&dirent.name))?)
            } else {
                None
            };
            let visit = self
                .plan
                .child(parent, dirent, resolved, |c| on_stack(&self.stack, c));
            if let Some(entry) = self.apply(visit) {
                return Ok(Some(entry));
            }
        }
    }
}

impl<F: FileSystem> Iterator for Walker<F> {
    type Item = Result<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
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
