//! Shared fixtures for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use walkdir::WalkDir;

/// Write `files` (relative path, contents) under `root`, creating parents
#[allow(dead_code)]
pub fn create_tree(root: &Path, files: &[(&str, &str)]) -> std::io::Result<()> {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
    }
    Ok(())
}

/// Relative paths of every node under `root`, sorted, via `walkdir`
#[allow(dead_code)]
pub fn relative_paths(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    paths.sort();
    paths
}

/// Assert both trees hold the same nodes and the same file bytes
#[allow(dead_code)]
pub fn assert_trees_equal(src: &Path, dst: &Path) {
    let src_paths = relative_paths(src);
    assert_eq!(src_paths, relative_paths(dst), "tree shapes differ");
    for rel in src_paths {
        let (a, b) = (src.join(&rel), dst.join(&rel));
        let meta = fs::symlink_metadata(&a).expect("source metadata");
        if meta.is_file() {
            assert_eq!(
                fs::read(&a).expect("read source"),
                fs::read(&b).expect("read destination"),
                "contents differ for {}",
                rel.display()
            );
        } else if meta.is_symlink() {
            assert_eq!(
                fs::read_link(&a).expect("source link"),
                fs::read_link(&b).expect("destination link"),
                "link targets differ for {}",
                rel.display()
            );
        }
    }
}

#[allow(dead_code)]
pub struct TestTimeoutGuard {
    cancelled: Arc<AtomicBool>,
}

impl Drop for TestTimeoutGuard {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Abort the test process if the guard is still alive after `duration`
///
/// Used by traversal tests that would otherwise hang on a cycle.
#[allow(dead_code)]
pub fn test_timeout_guard(duration: Duration) -> TestTimeoutGuard {
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = Arc::clone(&cancelled);
    std::thread::spawn(move || {
        std::thread::sleep(duration);
        if !cancelled_clone.load(Ordering::SeqCst) {
            eprintln!("Test timeout exceeded ({}s). Aborting.", duration.as_secs());
            std::process::abort();
        }
    });
    TestTimeoutGuard { cancelled }
}
