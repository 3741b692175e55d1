//! portafs command line front end
//!
//! Runs every command through the async engine on the compio runtime.

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use portafs::backends::CompioFs;
use portafs::cli::{Cli, Command};
use portafs::traits::AsyncFileSystem;
use portafs::{copy_async, empty_dir_async, ensure_dir_async, ensure_file_async, walk_async};
use std::io::Write;
use std::path::Path;

#[compio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;

    tracing_subscriber::fmt()
        .with_max_level(cli.output.log_level())
        .with_writer(std::io::stderr)
        .init();

    let fs = CompioFs::new();
    run(&fs, cli.command).await
}

async fn run(fs: &CompioFs, command: Command) -> Result<()> {
    match command {
        Command::Walk { root, walk } => {
            let options = walk.to_options()?;
            let mut entries = std::pin::pin!(walk_async(fs, &root, options));
            let mut out = std::io::stdout().lock();
            while let Some(entry) = entries.next().await {
                let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
                writeln!(out, "{}", entry.path.display())?;
            }
        }
        Command::Copy {
            source,
            destination,
            options,
        } => {
            let stats = copy_async(fs, &source, &destination, &options)
                .await
                .with_context(|| {
                    format!(
                        "failed to copy {} to {}",
                        source.display(),
                        destination.display()
                    )
                })?;
            println!("Copied {stats}");
        }
        Command::EmptyDir { path } => {
            empty_dir_async(fs, &path)
                .await
                .with_context(|| format!("failed to empty {}", path.display()))?;
        }
        Command::EnsureDir { path } => {
            ensure_dir_async(fs, &path)
                .await
                .with_context(|| format!("failed to ensure directory {}", path.display()))?;
        }
        Command::EnsureFile { path } => {
            ensure_file_async(fs, &path)
                .await
                .with_context(|| format!("failed to ensure file {}", path.display()))?;
        }
        Command::Stat { path, no_follow } => stat(fs, &path, no_follow).await?,
    }
    Ok(())
}

async fn stat(fs: &CompioFs, path: &Path, no_follow: bool) -> Result<()> {
    let resolved = portafs::path::resolve(path)?;
    let info = if no_follow {
        fs.lstat(&resolved).await
    } else {
        fs.stat(&resolved).await
    }
    .with_context(|| format!("failed to stat {}", path.display()))?;

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
