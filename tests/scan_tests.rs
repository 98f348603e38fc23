//! End-to-end scans against real temporary trees.

use dirtally::engine::accumulate;
use dirtally::engine::progress::ProgressCounter;
use dirtally::engine::{build_scan_pool, running_as_root};
use dirtally::pipeline::{PipelineContext, ResultSet, ScanError, collect, count_entries, dispatch};
use dirtally::report::{format_mb, sorted_top};
use dirtally::{Entry, Opts, ScanOpts, largest_entries, scan_dir};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_bytes(path: &Path, n: usize) {
    fs::write(path, vec![0u8; n]).unwrap();
}

/// ```text
/// root/
///   fileA.txt   (1 MiB)
///   fileB.txt   (2 MiB)
///   sub/
///     fileC.txt (3 MiB)
/// ```
fn build_example_tree(root: &Path) {
    write_bytes(&root.join("fileA.txt"), 1_048_576);
    write_bytes(&root.join("fileB.txt"), 2_097_152);
    fs::create_dir(root.join("sub")).unwrap();
    write_bytes(&root.join("sub/fileC.txt"), 3_145_728);
}

/// A deeper tree; returns the total number of file bytes written.
fn build_nested_tree(root: &Path) -> u64 {
    fs::create_dir_all(root.join("a/b/c")).unwrap();
    fs::create_dir_all(root.join("d/e")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    let files: [(&str, usize); 7] = [
        ("top.bin", 100),
        ("a/a1.bin", 200),
        ("a/b/b1.bin", 300),
        ("a/b/c/c1.bin", 400),
        ("a/b/c/c2.bin", 500),
        ("d/d1.bin", 600),
        ("d/e/e1.bin", 700),
    ];
    for (rel, n) in files {
        write_bytes(&root.join(rel), n);
    }
    files.iter().map(|(_, n)| *n as u64).sum()
}

fn as_map(entries: &[Entry]) -> HashMap<PathBuf, u64> {
    entries.iter().map(|e| (e.path.clone(), e.size)).collect()
}

fn serial_opts() -> ScanOpts {
    ScanOpts {
        parallel_count: false,
        ..ScanOpts::default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_scan_example_tree_records_top_level_entries() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let root = tmp.path();
    build_example_tree(root);

    let entries = scan_dir(root, &ScanOpts::default()).unwrap();
    let expected = HashMap::from([
        (root.join("fileA.txt"), 1_048_576),
        (root.join("fileB.txt"), 2_097_152),
        (root.join("sub"), 3_145_728),
    ]);
    assert_eq!(entries.len(), 3);
    assert_eq!(as_map(&entries), expected);

    let sub = entries.iter().find(|e| e.path == root.join("sub")).unwrap();
    assert!(sub.is_dir);

    let top = sorted_top(entries, 2);
    assert_eq!(top[0].path, root.join("sub"));
    assert_eq!(format_mb(top[0].size), "3.00 MB");
    assert_eq!(top[1].path, root.join("fileB.txt"));
    assert_eq!(format_mb(top[1].size), "2.00 MB");
}

#[test]
fn test_largest_entries_matches_sorted_scan() {
    let tmp = TempDir::new().unwrap();
    build_example_tree(tmp.path());
    let top = largest_entries(tmp.path(), &ScanOpts::default(), 1).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].path, tmp.path().join("sub"));
}

#[test]
fn test_scan_sum_equals_total_tree_size() {
    let tmp = TempDir::new().unwrap();
    let total = build_nested_tree(tmp.path());

    let entries = scan_dir(tmp.path(), &serial_opts()).unwrap();
    let sum: u64 = entries.iter().map(|e| e.size).sum();
    assert_eq!(sum, total);

    let map = as_map(&entries);
    assert_eq!(map.len(), 4);
    assert_eq!(map[&tmp.path().join("top.bin")], 100);
    assert_eq!(map[&tmp.path().join("a")], 200 + 300 + 400 + 500);
    assert_eq!(map[&tmp.path().join("d")], 600 + 700);
    assert_eq!(map[&tmp.path().join("empty")], 0);
}

#[test]
fn test_scan_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    build_nested_tree(tmp.path());
    let first = as_map(&scan_dir(tmp.path(), &ScanOpts::default()).unwrap());
    let second = as_map(&scan_dir(tmp.path(), &ScanOpts::default()).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_scan_empty_directory() {
    let tmp = TempDir::new().unwrap();
    let entries = scan_dir(tmp.path(), &ScanOpts::default()).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn test_scan_missing_root_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist");
    let err = scan_dir(&missing, &ScanOpts::default()).unwrap_err();
    match err.downcast_ref::<ScanError>() {
        Some(ScanError::RootUnreachable { path, .. }) => assert_eq!(path, &missing),
        other => panic!("expected RootUnreachable, got {other:?}"),
    }
}

#[test]
fn test_scan_file_as_root_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("plain.txt");
    write_bytes(&file, 10);
    let err = scan_dir(&file, &ScanOpts::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::RootUnreachable { .. })
    ));
}

#[test]
fn test_scan_exclude_drops_matches_everywhere() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir(root.join("logs")).unwrap();
    write_bytes(&root.join("keep.txt"), 10);
    write_bytes(&root.join("skip.log"), 1_000);
    write_bytes(&root.join("logs/inner.log"), 1_000);
    write_bytes(&root.join("logs/inner.txt"), 5);

    let opts = ScanOpts {
        exclude: vec!["*.log".to_string()],
        ..serial_opts()
    };
    let map = as_map(&scan_dir(root, &opts).unwrap());
    assert_eq!(map.len(), 2);
    assert_eq!(map[&root.join("keep.txt")], 10);
    assert_eq!(map[&root.join("logs")], 5);
}

#[test]
fn test_accumulate_sums_whole_subtree() {
    let tmp = TempDir::new().unwrap();
    let total = build_nested_tree(tmp.path());
    let ctx = PipelineContext::new(tmp.path(), &Opts::default());
    assert_eq!(accumulate(tmp.path(), &ctx), total);
    assert_eq!(accumulate(&tmp.path().join("a/b"), &ctx), 300 + 400 + 500);
    assert_eq!(ctx.skipped_count(), 0);
}

#[test]
fn test_accumulate_missing_path_is_zero_and_logged() {
    let tmp = TempDir::new().unwrap();
    let ctx = PipelineContext::new(tmp.path(), &Opts::default());
    assert_eq!(accumulate(&tmp.path().join("gone"), &ctx), 0);
    assert_eq!(ctx.skipped_count(), 1);
}

#[test]
fn test_collect_records_children_not_grandchildren() {
    let tmp = TempDir::new().unwrap();
    build_nested_tree(tmp.path());
    let ctx = PipelineContext::new(tmp.path(), &Opts::default());
    let results = ResultSet::new();
    let progress = ProgressCounter::hidden(0);

    collect(&tmp.path().join("a"), &results, &progress, &ctx);

    let map = as_map(&results.into_vec());
    assert_eq!(
        map,
        HashMap::from([
            (tmp.path().join("a/a1.bin"), 200),
            (tmp.path().join("a/b"), 300 + 400 + 500),
        ])
    );
    assert_eq!(progress.done(), 2);
}

#[test]
fn test_collect_unlistable_dir_records_nothing() {
    let tmp = TempDir::new().unwrap();
    let ctx = PipelineContext::new(tmp.path(), &Opts::default());
    let results = ResultSet::new();
    let progress = ProgressCounter::hidden(0);
    collect(&tmp.path().join("gone"), &results, &progress, &ctx);
    assert!(results.is_empty());
    assert_eq!(progress.done(), 0);
    assert_eq!(ctx.skipped_count(), 1);
}

#[test]
fn test_count_entries_serial_and_parallel_agree() {
    let tmp = TempDir::new().unwrap();
    build_example_tree(tmp.path());
    fs::create_dir(tmp.path().join(".hidden")).unwrap();
    let ctx = PipelineContext::new(tmp.path(), &Opts::default());
    // fileA, fileB, sub, sub/fileC, .hidden
    assert_eq!(count_entries(&ctx, false), 5);
    assert_eq!(count_entries(&ctx, true), 5);
}

#[test]
fn test_dispatch_ticks_top_level_and_collected_children() {
    let tmp = TempDir::new().unwrap();
    build_example_tree(tmp.path());
    let ctx = PipelineContext::new(tmp.path(), &Opts::default());
    let pool = build_scan_pool().unwrap();
    let progress = ProgressCounter::hidden(count_entries(&ctx, false));

    let results = dispatch(&ctx, &pool, &progress).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results.total_size(), 1_048_576 + 2_097_152 + 3_145_728);
    // fileA + fileB inline, fileC from the task for sub/
    assert_eq!(progress.done(), 3);
    assert_eq!(progress.total(), 4);
}

#[test]
fn test_deep_tree_does_not_exhaust_worker_stack() {
    const DEPTH: usize = 1_000;
    let tmp = TempDir::new().unwrap();
    let mut deep = tmp.path().join("top");
    for _ in 1..DEPTH {
        deep.push("d");
    }
    fs::create_dir_all(&deep).unwrap();
    write_bytes(&deep.join("leaf.bin"), 321);

    let map = as_map(&scan_dir(tmp.path(), &serial_opts()).unwrap());
    assert_eq!(map, HashMap::from([(tmp.path().join("top"), 321)]));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::{PermissionsExt, symlink};

    /// Restores permissions on drop so TempDir can clean up even if an assert fails.
    struct Unlock(PathBuf);

    impl Drop for Unlock {
        fn drop(&mut self) {
            let _ = fs::set_permissions(&self.0, fs::Permissions::from_mode(0o755));
        }
    }

    fn lock(path: &Path) -> Unlock {
        fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
        Unlock(path.to_path_buf())
    }

    #[test]
    fn test_scan_locked_top_level_dir_records_zero() {
        if running_as_root() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        build_example_tree(root);
        fs::create_dir(root.join("locked")).unwrap();
        write_bytes(&root.join("locked/secret.bin"), 4_096);
        let _unlock = lock(&root.join("locked"));

        let opts = Opts::default();
        let ctx = PipelineContext::new(root, &opts);
        let pool = build_scan_pool().unwrap();
        let results = dispatch(&ctx, &pool, &ProgressCounter::hidden(0)).unwrap();

        let map = as_map(&results.into_vec());
        assert_eq!(map.len(), 4);
        assert_eq!(map[&root.join("locked")], 0);
        assert_eq!(map[&root.join("sub")], 3_145_728);
        assert_eq!(map[&root.join("fileA.txt")], 1_048_576);

        let skipped = ctx.skipped_paths.lock().unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, root.join("locked"));
        assert!(skipped[0].1.starts_with("Permission denied: "));
    }

    #[test]
    fn test_scan_inaccessible_child_contributes_zero() {
        if running_as_root() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let parent = root.join("parent");
        fs::create_dir_all(parent.join("ok1")).unwrap();
        fs::create_dir_all(parent.join("ok2")).unwrap();
        fs::create_dir_all(parent.join("denied")).unwrap();
        write_bytes(&parent.join("ok1/x.bin"), 111);
        write_bytes(&parent.join("ok2/y.bin"), 222);
        write_bytes(&parent.join("z.bin"), 333);
        write_bytes(&parent.join("denied/hidden.bin"), 10_000);
        let _unlock = lock(&parent.join("denied"));

        let map = as_map(&scan_dir(root, &serial_opts()).unwrap());
        assert_eq!(map[&parent], 111 + 222 + 333);
    }

    #[test]
    fn test_default_scan_sizes_links_as_targets() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        let outside = tmp.path().join("outside");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&outside).unwrap();
        write_bytes(&outside.join("big.bin"), 5_000);
        symlink(outside.join("big.bin"), root.join("link.bin")).unwrap();
        symlink(&outside, root.join("linkdir")).unwrap();

        let entries = scan_dir(&root, &ScanOpts::default()).unwrap();
        let map = as_map(&entries);
        assert_eq!(
            map,
            HashMap::from([(root.join("link.bin"), 5_000), (root.join("linkdir"), 5_000)])
        );
        let linkdir = entries.iter().find(|e| e.path == root.join("linkdir")).unwrap();
        assert!(linkdir.is_dir);
    }

    #[test]
    fn test_dangling_link_is_logged_and_zero() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_bytes(&root.join("real.bin"), 10);
        symlink(root.join("missing.bin"), root.join("dangling")).unwrap();

        let ctx = PipelineContext::new(root, &Opts::default());
        let pool = build_scan_pool().unwrap();
        let results = dispatch(&ctx, &pool, &ProgressCounter::hidden(0)).unwrap();

        assert_eq!(as_map(&results.into_vec()), HashMap::from([(root.join("real.bin"), 10)]));
        assert_eq!(ctx.skipped_count(), 1);
    }

    #[test]
    fn test_symlinks_ignored_when_not_followed() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        let outside = tmp.path().join("outside");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&outside).unwrap();
        write_bytes(&outside.join("big.bin"), 5_000);
        write_bytes(&root.join("real.bin"), 10);
        symlink(outside.join("big.bin"), root.join("link.bin")).unwrap();
        symlink(&outside, root.join("linkdir")).unwrap();

        let no_follow = ScanOpts {
            follow_links: false,
            ..serial_opts()
        };
        let plain = as_map(&scan_dir(&root, &no_follow).unwrap());
        assert_eq!(plain, HashMap::from([(root.join("real.bin"), 10)]));

        let followed = as_map(&scan_dir(&root, &serial_opts()).unwrap());
        assert_eq!(followed[&root.join("link.bin")], 5_000);
        assert_eq!(followed[&root.join("linkdir")], 5_000);
    }

    #[test]
    fn test_followed_link_back_to_ancestor_is_cut() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("sub")).unwrap();
        write_bytes(&root.join("sub/data.bin"), 64);
        symlink(root, root.join("sub/back")).unwrap();
        symlink(root.join("sub"), root.join("sub/self")).unwrap();

        let ctx = PipelineContext::new(root, &Opts::default());
        let pool = build_scan_pool().unwrap();
        let results = dispatch(&ctx, &pool, &ProgressCounter::hidden(0)).unwrap();

        let map = as_map(&results.into_vec());
        assert_eq!(map, HashMap::from([(root.join("sub"), 64)]));
        assert_eq!(ctx.skipped_count(), 2);
    }
}
