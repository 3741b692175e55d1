//! Copy engine behavior on real trees

use portafs::{copy, CopyOptions, ErrorKind, FsError, PolicyViolation};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{assert_trees_equal, create_tree};

#[test]
fn test_copy_tree_scenario() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let t = temp_dir.path().join("t");
    let t2 = temp_dir.path().join("t2");
    create_tree(&t, &[("0.txt", "txt"), ("nest/0.txt", "nest")])?;

    let stats = copy(&t, &t2, &CopyOptions::default())?;
    assert_eq!(fs::read_to_string(t2.join("0.txt"))?, "txt");
    assert_eq!(fs::read_to_string(t2.join("nest/0.txt"))?, "nest");
    assert_eq!(stats.files_copied, 2);
    assert_eq!(stats.directories_created, 2);

    // Same copy again without overwrite
    let err = copy(&t, &t2, &CopyOptions::default()).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::AlreadyExists));

    fs::write(t.join("nest/0.txt"), "changed")?;
    copy(&t, &t2, &CopyOptions::default().overwrite(true))?;
    assert_eq!(fs::read_to_string(t2.join("nest/0.txt"))?, "changed");
    assert_trees_equal(&t, &t2);
    Ok(())
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_copy_onto_itself_always_fails(#[case] overwrite: bool) -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join("d");
    create_tree(&dir, &[("f", "x")])?;

    let err = copy(&dir, &dir, &CopyOptions::default().overwrite(overwrite)).unwrap_err();
    assert!(matches!(
        err,
        FsError::Policy(PolicyViolation::SameSourceAndDestination { .. })
    ));

    // Spelled differently, same place
    let err = copy(&dir, dir.join("."), &CopyOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        FsError::Policy(PolicyViolation::SameSourceAndDestination { .. })
    ));
    Ok(())
}

#[rstest]
#[case("child")]
#[case("child/grandchild")]
fn test_copy_into_own_subdirectory_fails(#[case] rel: &str) -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let parent = temp_dir.path().join("parent");
    create_tree(&parent, &[("f", "x")])?;

    let err = copy(&parent, parent.join(rel), &CopyOptions::default().overwrite(true))
        .unwrap_err();
    assert!(matches!(
        err,
        FsError::Policy(PolicyViolation::CopyIntoItself { .. })
    ));
    // Nothing was created
    assert!(!parent.join("child").exists());
    Ok(())
}

#[test]
fn test_sibling_with_common_prefix_is_allowed() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let foo = temp_dir.path().join("foo");
    let foobar = temp_dir.path().join("foobar");
    create_tree(&foo, &[("f", "x")])?;

    copy(&foo, &foobar, &CopyOptions::default())?;
    assert_trees_equal(&foo, &foobar);
    Ok(())
}

#[test]
fn test_directory_over_file_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src");
    let dest = temp_dir.path().join("dest");
    create_tree(&src, &[("f", "x")])?;
    fs::write(&dest, "file")?;

    let err = copy(&src, &dest, &CopyOptions::default().overwrite(true)).unwrap_err();
    assert!(matches!(
        err,
        FsError::Policy(PolicyViolation::OverwriteNonDirectory { .. })
    ));
    assert_eq!(fs::read_to_string(&dest)?, "file");
    Ok(())
}

#[test]
fn test_file_overwrite() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src.txt");
    let dest = temp_dir.path().join("dest.txt");
    fs::write(&src, "new")?;
    fs::write(&dest, "old content that is longer")?;

    let err = copy(&src, &dest, &CopyOptions::default()).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::AlreadyExists));
    assert_eq!(fs::read_to_string(&dest)?, "old content that is longer");

    copy(&src, &dest, &CopyOptions::default().overwrite(true))?;
    assert_eq!(fs::read_to_string(&dest)?, "new");
    Ok(())
}

#[test]
fn test_round_trip_larger_tree() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src");
    let dest = temp_dir.path().join("out/copy");
    let big = "0123456789abcdef".repeat(20_000);
    create_tree(
        &src,
        &[
            ("a/b/c/d.txt", "deep"),
            ("a/e.txt", "e"),
            ("empty.txt", ""),
            ("big.bin", &big),
        ],
    )?;
    fs::create_dir_all(src.join("a/empty_dir"))?;

    let stats = copy(&src, &dest, &CopyOptions::default())?;

    assert_trees_equal(&src, &dest);
    assert_eq!(stats.files_copied, 4);
    assert_eq!(stats.bytes_copied, (big.len() + 5) as u64);
    Ok(())
}

#[test]
fn test_preserve_timestamps() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src.txt");
    let dest = temp_dir.path().join("dest.txt");
    fs::write(&src, "x")?;
    let past = filetime::FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_times(&src, past, past)?;

    copy(&src, &dest, &CopyOptions::default().preserve_timestamps(true))?;

    let meta = fs::metadata(&dest)?;
    assert_eq!(filetime::FileTime::from_last_modification_time(&meta), past);
    assert_eq!(filetime::FileTime::from_last_access_time(&meta), past);
    Ok(())
}

#[test]
fn test_without_preserve_timestamps_mtime_is_fresh() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src.txt");
    let dest = temp_dir.path().join("dest.txt");
    fs::write(&src, "x")?;
    let past = filetime::FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_times(&src, past, past)?;

    copy(&src, &dest, &CopyOptions::default())?;

    let meta = fs::metadata(&dest)?;
    assert_ne!(filetime::FileTime::from_last_modification_time(&meta), past);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_symlinks_copied_as_links() -> anyhow::Result<()> {
    use std::os::unix::fs::symlink;

    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src");
    create_tree(&src, &[("target.txt", "t")])?;
    symlink("target.txt", src.join("rel_link"))?;
    symlink("/nonexistent/elsewhere", src.join("dangling"))?;

    let dest = temp_dir.path().join("dest");
    let stats = copy(&src, &dest, &CopyOptions::default())?;

    assert_eq!(stats.symlinks_copied, 2);
    assert_eq!(fs::read_link(dest.join("rel_link"))?, std::path::Path::new("target.txt"));
    assert_eq!(fs::read_to_string(dest.join("rel_link"))?, "t");
    assert!(fs::symlink_metadata(dest.join("dangling"))?.file_type().is_symlink());
    assert_trees_equal(&src, &dest);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_symlink_overwrite_replaces_existing() -> anyhow::Result<()> {
    use std::os::unix::fs::symlink;

    let temp_dir = TempDir::new()?;
    let link = temp_dir.path().join("link");
    let dest = temp_dir.path().join("dest");
    symlink("somewhere", &link)?;
    fs::write(&dest, "plain file")?;

    let err = copy(&link, &dest, &CopyOptions::default()).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::AlreadyExists));

    copy(&link, &dest, &CopyOptions::default().overwrite(true))?;
    assert_eq!(fs::read_link(&dest)?, std::path::Path::new("somewhere"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_symlink_never_replaces_directory() -> anyhow::Result<()> {
    use std::os::unix::fs::symlink;

    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src");
    fs::create_dir(&src)?;
    symlink("elsewhere", src.join("data"))?;
    let dest = temp_dir.path().join("dest");
    create_tree(&dest, &[("data/precious/keep.txt", "keep")])?;

    let err = copy(&src, &dest, &CopyOptions::default().overwrite(true)).unwrap_err();

    assert!(matches!(
        err,
        FsError::Policy(PolicyViolation::OverwriteDirectory { .. })
    ));
    assert!(fs::symlink_metadata(dest.join("data"))?.is_dir());
    assert_eq!(fs::read_to_string(dest.join("data/precious/keep.txt"))?, "keep");
    Ok(())
}

#[test]
fn test_file_never_replaces_directory() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src");
    create_tree(&src, &[("plain", "p")])?;
    let dest = temp_dir.path().join("dest");
    create_tree(&dest, &[("plain/keep.txt", "keep")])?;

    let err = copy(&src, &dest, &CopyOptions::default().overwrite(true)).unwrap_err();

    assert!(matches!(
        err,
        FsError::Policy(PolicyViolation::OverwriteDirectory { .. })
    ));
    assert_eq!(fs::read_to_string(dest.join("plain/keep.txt"))?, "keep");
    Ok(())
}

#[test]
fn test_preserve_timestamps_on_directories() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src");
    create_tree(&src, &[("nested/a.txt", "a"), ("b.txt", "b")])?;
    let past = filetime::FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_times(src.join("nested"), past, past)?;
    filetime::set_file_times(&src, past, past)?;
    let dest = temp_dir.path().join("dest");

    copy(&src, &dest, &CopyOptions::default().preserve_timestamps(true))?;

    for dir in [dest.clone(), dest.join("nested")] {
        let meta = fs::metadata(&dir)?;
        assert_eq!(filetime::FileTime::from_last_modification_time(&meta), past);
    }
    Ok(())
}
