//! Walk behavior on real directory trees

use portafs::walk::normalize_exts;
use portafs::{walk, ErrorKind, WalkEntry, WalkOptions};
use rstest::rstest;
use std::path::Path;
use tempfile::TempDir;

mod common;
use common::create_tree;

fn sample_tree() -> anyhow::Result<TempDir> {
    let temp_dir = TempDir::new()?;
    create_tree(
        temp_dir.path(),
        &[
            ("a.rs", ""),
            ("b.ts", ""),
            ("readme.md", ""),
            ("src/lib.rs", ""),
            ("src/deep/mod.rs", ""),
            ("src/deep/deeper/x.txt", ""),
        ],
    )?;
    Ok(temp_dir)
}

fn collect(root: &Path, options: WalkOptions) -> anyhow::Result<Vec<WalkEntry>> {
    Ok(walk(root, options).collect::<portafs::Result<Vec<_>>>()?)
}

#[rstest]
#[case(&[".rs", "ts"], &[".rs", ".ts"])]
#[case(&["rs", ".ts"], &[".rs", ".ts"])]
#[case(&[".rs"], &[".rs"])]
fn test_exts_normalization(#[case] input: &[&str], #[case] expected: &[&str]) {
    let once = normalize_exts(input);
    assert_eq!(once, expected);
    assert_eq!(normalize_exts(&once), once);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
fn test_max_depth_bounds_entries(#[case] max_depth: usize) -> anyhow::Result<()> {
    let temp_dir = sample_tree()?;
    let entries = collect(
        temp_dir.path(),
        WalkOptions::default().with_max_depth(max_depth),
    )?;

    assert!(entries.iter().all(|e| e.depth <= max_depth));
    assert!(entries.iter().any(|e| e.depth == max_depth));
    Ok(())
}

#[test]
fn test_include_flags() -> anyhow::Result<()> {
    let temp_dir = sample_tree()?;

    let files = collect(temp_dir.path(), WalkOptions::default().with_dirs(false))?;
    assert_eq!(files.len(), 6);
    assert!(files.iter().all(|e| e.is_file));

    let dirs = collect(temp_dir.path(), WalkOptions::default().with_files(false))?;
    assert_eq!(dirs.len(), 4);
    assert!(dirs.iter().all(|e| e.is_directory));
    Ok(())
}

#[test]
fn test_exts_filter_matches_suffixes() -> anyhow::Result<()> {
    let temp_dir = sample_tree()?;
    let mut names: Vec<String> = collect(
        temp_dir.path(),
        WalkOptions::default().with_exts([".rs", "ts"]),
    )?
    .into_iter()
    .map(|e| e.name)
    .collect();
    names.sort();

    assert_eq!(names, vec!["a.rs", "b.ts", "lib.rs", "mod.rs"]);
    Ok(())
}

#[test]
fn test_match_keeps_traversing_directories() -> anyhow::Result<()> {
    let temp_dir = sample_tree()?;
    let entries = collect(
        temp_dir.path(),
        WalkOptions::default().matching(regex::Regex::new(r"x\.txt$")?),
    )?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].depth, 4);
    Ok(())
}

#[test]
fn test_root_entry_shape() -> anyhow::Result<()> {
    let temp_dir = sample_tree()?;
    let entries = collect(temp_dir.path(), WalkOptions::default())?;

    let roots: Vec<&WalkEntry> = entries.iter().filter(|e| e.is_main_dir).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].path, temp_dir.path());
    assert!(std::ptr::eq(roots[0], &entries[0]));
    // Every child path is absolute and below the root
    assert!(entries
        .iter()
        .all(|e| e.path.is_absolute() && e.path.starts_with(temp_dir.path())));
    Ok(())
}

#[test]
fn test_pre_order_parents_first() -> anyhow::Result<()> {
    let temp_dir = sample_tree()?;
    let entries = collect(temp_dir.path(), WalkOptions::default())?;

    for (i, entry) in entries.iter().enumerate() {
        if let Some(parent) = entry.path.parent() {
            if entry.is_main_dir {
                continue;
            }
            let parent_index = entries.iter().position(|e| e.path == parent);
            assert!(parent_index.is_some_and(|p| p < i), "{:?} before parent", entry.path);
        }
    }
    Ok(())
}

#[test]
fn test_missing_root_not_found() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let result = collect(&temp_dir.path().join("missing"), WalkOptions::default());

    let err = result.unwrap_err().downcast::<portafs::FsError>()?;
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    Ok(())
}

#[test]
fn test_walk_accepts_file_url() -> anyhow::Result<()> {
    let temp_dir = sample_tree()?;
    let url = url::Url::from_directory_path(temp_dir.path())
        .map_err(|()| anyhow::anyhow!("not an absolute path"))?;

    let entries = collect_url(&url)?;
    assert_eq!(entries.len(), 10);
    Ok(())
}

fn collect_url(url: &url::Url) -> anyhow::Result<Vec<WalkEntry>> {
    Ok(walk(url, WalkOptions::default()).collect::<portafs::Result<Vec<_>>>()?)
}

#[test]
fn test_directory_removed_mid_walk_is_not_found() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    create_tree(temp_dir.path(), &[("sub/inner.txt", "i")])?;
    let sub = temp_dir.path().join("sub");

    let mut walker = walk(temp_dir.path(), WalkOptions::default());
    assert!(walker.next().transpose()?.is_some_and(|e| e.is_main_dir));
    assert_eq!(walker.next().transpose()?.map(|e| e.path), Some(sub.clone()));

    std::fs::remove_dir_all(&sub)?;

    match walker.next() {
        Some(Err(e)) => assert_eq!(e.kind(), Some(ErrorKind::NotFound)),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(walker.next().is_none());
    Ok(())
}
