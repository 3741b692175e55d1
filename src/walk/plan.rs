//! Traversal decisions shared by the blocking and async walkers
//!
//! The walkers only perform I/O; everything that decides what to yield,
//! what to enter and where a cycle closes lives here so both execution
//! models behave identically.

use super::options::{PathFilter, WalkOptions};
use super::WalkEntry;
use crate::metadata::{DirEntry, FileInfo};
use crate::path::base_name;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A directory scheduled for listing
#[derive(Debug, Clone)]
pub(crate) struct PendingDir {
    /// Reported path; children are joined onto it
    pub path: PathBuf,
    /// Real location, tracked only while following symlinks
    pub canonical: Option<PathBuf>,
    pub depth: usize,
}

/// One stack level of an active traversal
pub(crate) struct Frame<R> {
    pub dir: PendingDir,
    /// Opened on first use so each step does one native call
    pub listing: Option<R>,
}

impl<R> Frame<R> {
    pub(crate) const fn new(dir: PendingDir) -> Self {
        Self { dir, listing: None }
    }
}

/// Outcome of looking at one node
pub(crate) enum Visit {
    Skip,
    Yield(WalkEntry),
    Descend {
        entry: Option<WalkEntry>,
        dir: PendingDir,
    },
}

/// What a followed symlink resolved to
pub(crate) enum Resolved {
    Target { real: PathBuf, info: FileInfo },
    Dangling,
}

#[derive(Debug, Clone)]
pub(crate) struct WalkPlan {
    options: WalkOptions,
    filter: PathFilter,
}

impl WalkPlan {
    pub(crate) fn new(options: WalkOptions) -> Self {
        let filter = PathFilter::new(&options);
        Self { options, filter }
    }

    pub(crate) const fn follows_symlinks(&self) -> bool {
        self.options.follow_symlinks
    }

    /// Decide about the walk root
    ///
    /// `real` is the root's real path when following symlinks.
    pub(crate) fn root(&self, root: PathBuf, info: &FileInfo, real: Option<PathBuf>) -> Visit {
        let path = match (&real, self.options.canonicalize) {
            (Some(real), true) => real.clone(),
            _ => root,
        };
        let included = self.type_included(info) && self.filter.includes(&path);
        let entry = included.then(|| WalkEntry {
            name: base_name(&path),
            path: path.clone(),
            is_file: info.is_file,
            is_directory: info.is_directory,
            is_symlink: info.is_symlink,
            is_main_dir: true,
            depth: 0,
        });

        if info.is_directory && self.options.allows_depth(0) && !self.filter.skips(&path) {
            Visit::Descend {
                entry,
                dir: PendingDir {
                    path,
                    canonical: real,
                    depth: 0,
                },
            }
        } else {
            entry.map_or(Visit::Skip, Visit::Yield)
        }
    }

    /// Whether `dirent` needs resolving before [`Self::child`] can decide
    pub(crate) fn needs_resolve(&self, dirent: &DirEntry) -> bool {
        dirent.is_symlink && self.options.follow_symlinks
    }

    /// Decide about an entry of `parent`
    ///
    /// `resolved` must be `Some` exactly when [`Self::needs_resolve`] said
    /// so. `is_ancestor` reports whether a canonical path is already on the
    /// active branch.
    pub(crate) fn child(
        &self,
        parent: &PendingDir,
        dirent: DirEntry,
        resolved: Option<Resolved>,
        is_ancestor: impl Fn(&Path) -> bool,
    ) -> Visit {
        let literal = parent.path.join(&dirent.name);
        let depth = parent.depth + 1;

        match resolved {
            None | Some(Resolved::Dangling) => {
                if dirent.is_directory {
                    let canonical = parent.canonical.as_ref().map(|c| c.join(&dirent.name));
                    return self.directory(literal, canonical, depth, is_ancestor);
                }
                let included = if dirent.is_symlink {
                    self.options.include_symlinks
                } else {
                    self.options.include_files
                };
                if included && self.filter.includes(&literal) {
                    Visit::Yield(WalkEntry::from_dir_entry(literal, dirent, depth))
                } else {
                    Visit::Skip
                }
            }
            Some(Resolved::Target { real, info }) => {
                let path = if self.options.canonicalize {
                    real.clone()
                } else {
                    literal
                };
                if info.is_directory {
                    return self.directory(path, Some(real), depth, is_ancestor);
                }
                if self.options.include_files && self.filter.includes(&path) {
                    Visit::Yield(WalkEntry {
                        name: base_name(&path),
                        path,
                        is_file: info.is_file,
                        is_directory: false,
                        is_symlink: false,
                        is_main_dir: false,
                        depth,
                    })
                } else {
                    Visit::Skip
                }
            }
        }
    }

    fn directory(
        &self,
        path: PathBuf,
        canonical: Option<PathBuf>,
        depth: usize,
        is_ancestor: impl Fn(&Path) -> bool,
    ) -> Visit {
        if self.filter.skips(&path) {
            return Visit::Skip;
        }
        let entry = (self.options.include_dirs && self.filter.includes(&path)).then(|| WalkEntry {
            name: base_name(&path),
            path: path.clone(),
            is_file: false,
            is_directory: true,
            is_symlink: false,
            is_main_dir: false,
            depth,
        });

        let cycle = canonical.as_deref().is_some_and(&is_ancestor);
        if cycle {
            warn!("walk: not entering {}, it loops back to an ancestor", path.display());
        }
        if cycle || !self.options.allows_depth(depth) {
            return entry.map_or(Visit::Skip, Visit::Yield);
        }
        Visit::Descend {
            entry,
            dir: PendingDir {
                path,
                canonical,
                depth,
            },
        }
    }

    const fn type_included(&self, info: &FileInfo) -> bool {
        if info.is_directory {
            self.options.include_dirs
        } else if info.is_symlink {
            self.options.include_symlinks
        } else {
            // Regular files and other node types
            self.options.include_files
        }
    }
}

/// True if `canonical` equals the canonical path of a frame on the stack
pub(crate) fn on_stack<R>(stack: &[Frame<R>], canonical: &Path) -> bool {
    stack
        .iter()
        .any(|frame| frame.dir.canonical.as_deref() == Some(canonical))
}
