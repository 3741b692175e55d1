//! Walk configuration and path filters

use globset::{GlobMatcher, GlobSet};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A predicate over a full path string
///
/// Used for `match` and `skip` filters. Implemented for `regex::Regex`,
/// `globset::GlobMatcher`, `globset::GlobSet` and [`FnMatcher`].
pub trait PathMatcher: fmt::Debug + Send + Sync {
    fn is_match(&self, path: &str) -> bool;
}

impl PathMatcher for Regex {
    fn is_match(&self, path: &str) -> bool {
        Regex::is_match(self, path)
    }
}

impl PathMatcher for GlobMatcher {
    fn is_match(&self, path: &str) -> bool {
        GlobMatcher::is_match(self, path)
    }
}

impl PathMatcher for GlobSet {
    fn is_match(&self, path: &str) -> bool {
        GlobSet::is_match(self, path)
    }
}

/// Adapter turning a closure into a [`PathMatcher`]
pub struct FnMatcher<F>(pub F);

impl<F> fmt::Debug for FnMatcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnMatcher(..)")
    }
}

impl<F> PathMatcher for FnMatcher<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_match(&self, path: &str) -> bool {
        (self.0)(path)
    }
}

/// Options controlling a walk
///
/// # Examples
///
/// ```rust,ignore
/// let options = WalkOptions::default()
///     .with_max_depth(2)
///     .with_exts(["rs", ".toml"])
///     .skipping(Regex::new("target")?);
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)] // Independent include/follow switches
pub struct WalkOptions {
    /// Deepest level yielded, root being 0; `None` is unbounded
    pub max_depth: Option<usize>,
    pub include_files: bool,
    pub include_dirs: bool,
    /// Yield symlinks that are not followed
    pub include_symlinks: bool,
    pub follow_symlinks: bool,
    /// Report followed links by their real path instead of the path
    /// through the link
    pub canonicalize: bool,
    /// Suffix allow-list; see [`normalize_exts`]
    pub exts: Vec<String>,
    /// When non-empty, only paths matching one of these are yielded
    pub match_patterns: Vec<Arc<dyn PathMatcher>>,
    /// Paths matching any of these are neither yielded nor entered
    pub skip_patterns: Vec<Arc<dyn PathMatcher>>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_files: true,
            include_dirs: true,
            include_symlinks: true,
            follow_symlinks: false,
            canonicalize: true,
            exts: Vec::new(),
            match_patterns: Vec::new(),
            skip_patterns: Vec::new(),
        }
    }
}

impl WalkOptions {
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub const fn with_files(mut self, include: bool) -> Self {
        self.include_files = include;
        self
    }

    #[must_use]
    pub const fn with_dirs(mut self, include: bool) -> Self {
        self.include_dirs = include;
        self
    }

    #[must_use]
    pub const fn with_symlinks(mut self, include: bool) -> Self {
        self.include_symlinks = include;
        self
    }

    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    #[must_use]
    pub const fn canonicalize(mut self, canonicalize: bool) -> Self {
        self.canonicalize = canonicalize;
        self
    }

    #[must_use]
    pub fn with_exts<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exts.extend(exts.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn matching(mut self, matcher: impl PathMatcher + 'static) -> Self {
        self.match_patterns.push(Arc::new(matcher));
        self
    }

    #[must_use]
    pub fn skipping(mut self, matcher: impl PathMatcher + 'static) -> Self {
        self.skip_patterns.push(Arc::new(matcher));
        self
    }

    pub(crate) fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

/// Give every extension a leading dot
///
/// Idempotent: `["rs", ".ts"]` and `[".rs", ".ts"]` both become
/// `[".rs", ".ts"]`.
#[must_use]
pub fn normalize_exts<S: AsRef<str>>(exts: &[S]) -> Vec<String> {
    exts.iter()
        .map(|ext| {
            let ext = ext.as_ref();
            if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{ext}")
            }
        })
        .collect()
}

/// Compiled `exts` / `match` / `skip` filter
#[derive(Debug, Clone)]
pub(crate) struct PathFilter {
    exts: Vec<String>,
    match_patterns: Vec<Arc<dyn PathMatcher>>,
    skip_patterns: Vec<Arc<dyn PathMatcher>>,
}

impl PathFilter {
    pub(crate) fn new(options: &WalkOptions) -> Self {
        Self {
            exts: normalize_exts(&options.exts),
            match_patterns: options.match_patterns.clone(),
            skip_patterns: options.skip_patterns.clone(),
        }
    }

    /// Whether an entry at `path` should be yielded
    pub(crate) fn includes(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        if !self.exts.is_empty() && !self.exts.iter().any(|ext| path.ends_with(ext.as_str())) {
            return false;
        }
        if !self.match_patterns.is_empty()
            && !self.match_patterns.iter().any(|m| m.is_match(&path))
        {
            return false;
        }
        !self.skip_patterns.iter().any(|m| m.is_match(&path))
    }

    /// Whether `path` is excluded outright (not yielded, not entered)
    pub(crate) fn skips(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.skip_patterns.iter().any(|m| m.is_match(&path))
    }
}
