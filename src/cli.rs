//! Command-line argument parsing and validation

use crate::copy::CopyOptions;
use crate::walk::WalkOptions;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use regex::Regex;
use std::path::PathBuf;
use tracing::Level;

/// Portable filesystem walk, copy and housekeeping tool
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output and logging configuration
    #[command(flatten)]
    pub output: OutputConfig,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print every path under ROOT, one per line
    Walk {
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        #[command(flatten)]
        walk: WalkConfig,
    },

    /// Copy a file, symlink or directory tree
    Copy {
        /// Source file or directory
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Destination path
        #[arg(value_name = "DESTINATION")]
        destination: PathBuf,

        #[command(flatten)]
        options: CopyOptions,
    },

    /// Delete every child of PATH, creating it if missing
    EmptyDir {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Make sure PATH is a directory
    EnsureDir {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Make sure PATH is a file, creating an empty one if missing
    EnsureFile {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Print the metadata of PATH as JSON
    Stat {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Describe a symlink itself instead of its target
        #[arg(long)]
        no_follow: bool,
    },
}

// ============================================================================
// FUNCTIONAL GROUPS: Organized by what component consumes them
// ============================================================================

/// Walk filters
///
/// Used by: `walk` subcommand, converted with [`WalkConfig::to_options`]
#[derive(clap::Args, Debug, Clone, Default)]
#[command(next_help_heading = "Walk Options")]
#[allow(clippy::struct_excessive_bools)]
pub struct WalkConfig {
    /// Deepest level to report (root is 0)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Don't report regular files
    #[arg(long)]
    pub no_files: bool,

    /// Don't report directories
    #[arg(long)]
    pub no_dirs: bool,

    /// Don't report symlinks that aren't followed
    #[arg(long)]
    pub no_symlinks: bool,

    /// Descend into symlinked directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Report followed links by the path through the link
    #[arg(long)]
    pub no_canonicalize: bool,

    /// Only report paths with this suffix (repeatable, leading dot optional)
    #[arg(long = "ext", value_name = "EXT")]
    pub exts: Vec<String>,

    /// Only report paths matching this regex (repeatable)
    #[arg(long = "match", value_name = "REGEX")]
    pub match_patterns: Vec<String>,

    /// Neither report nor enter paths matching this regex (repeatable)
    #[arg(long = "skip", value_name = "REGEX")]
    pub skip_patterns: Vec<String>,

    /// Only report paths matching this glob (repeatable)
    #[arg(long = "glob", value_name = "GLOB")]
    pub globs: Vec<String>,
}

impl WalkConfig {
    /// Compile the flags into [`WalkOptions`]
    ///
    /// # Errors
    ///
    /// Returns an error if a regex or glob doesn't compile.
    pub fn to_options(&self) -> Result<WalkOptions> {
        let mut options = WalkOptions::default()
            .with_files(!self.no_files)
            .with_dirs(!self.no_dirs)
            .with_symlinks(!self.no_symlinks)
            .follow_symlinks(self.follow_symlinks)
            .canonicalize(!self.no_canonicalize)
            .with_exts(self.exts.iter().cloned());
        options.max_depth = self.max_depth;

        for pattern in &self.match_patterns {
            let regex = Regex::new(pattern).with_context(|| format!("invalid --match '{pattern}'"))?;
            options = options.matching(regex);
        }
        for pattern in &self.skip_patterns {
            let regex = Regex::new(pattern).with_context(|| format!("invalid --skip '{pattern}'"))?;
            options = options.skipping(regex);
        }
        if !self.globs.is_empty() {
            let mut builder = GlobSetBuilder::new();
            for glob in &self.globs {
                builder.add(Glob::new(glob).with_context(|| format!("invalid --glob '{glob}'"))?);
            }
            options = options.matching(builder.build().context("failed to build glob set")?);
        }
        Ok(options)
    }
}

/// Output and logging configuration
///
/// Used by: `main()` to install the tracing subscriber
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputConfig {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress all logging except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl OutputConfig {
    /// Maximum tracing level for the flags given
    #[must_use]
    pub const fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

impl Cli {
    /// Reject flag combinations clap can't express
    ///
    /// # Errors
    ///
    /// Returns an error if `--quiet` is combined with `--verbose`.
    pub fn validate(&self) -> Result<()> {
        if self.output.quiet && self.output.verbose > 0 {
            anyhow::bail!("--quiet and --verbose cannot be used together");
        }
        Ok(())
    }
}
