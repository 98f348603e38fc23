//! Scan orchestration: count, dispatch one task per top-level directory, join.

use anyhow::Result;
use log::{debug, error};
use rayon::ThreadPool;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::engine::parallel::build_scan_pool;
use crate::engine::progress::ProgressCounter;
use crate::engine::sizer::Ancestry;
use crate::engine::tools::{EntryKind, classify, read_children};
use crate::utils::config::ProgressConsts;
use crate::{Entry, Opts};

use super::collect::collect_in;
use super::context::PipelineContext;
use super::error_handler::{AccessError, ScanError};
use super::results::ResultSet;
use super::walk::count_entries;

/// Run the whole scan of `ctx.root` and return the filled result set.
///
/// 1. Count every entry (progress bound only).
/// 2. Record top-level files inline, dispatch one task per top-level directory.
/// 3. Block until every task is done.
///
/// Fails only when the root itself cannot be listed ([`ScanError::RootUnreachable`]).
pub fn run(ctx: &PipelineContext, opts: &Opts) -> Result<ResultSet> {
    check_root(&ctx.root)?;

    let start = Instant::now();
    let total = count_entries(ctx, opts.parallel_count);
    debug!("Counted {} entries in {:?}", total, start.elapsed());

    let progress = ProgressCounter::with_bar(total, ProgressConsts::DESC, opts.show_progress);
    let pool = build_scan_pool()?;
    let results = dispatch(ctx, &pool, &progress)?;
    progress.finish();
    debug!(
        "Scan done: {} records, {} of ~{} entries ticked, {:?}",
        results.len(),
        progress.done(),
        progress.total(),
        start.elapsed()
    );
    Ok(results)
}

/// The root must be listable before anything else happens.
pub fn check_root(root: &Path) -> Result<(), ScanError> {
    std::fs::read_dir(root)
        .map(drop)
        .map_err(|source| ScanError::RootUnreachable {
            path: root.to_path_buf(),
            source,
        })
}

/// Dispatch and join. Runs on the calling thread; tasks run on `pool`.
///
/// Every top-level directory becomes one task that records `(dir, subtree size)`; top-level
/// files are recorded here without a task. Returns once the last task has finished.
pub fn dispatch(
    ctx: &PipelineContext,
    pool: &ThreadPool,
    progress: &ProgressCounter,
) -> Result<ResultSet, ScanError> {
    let children = read_children(&ctx.root, ctx).map_err(|source| ScanError::RootUnreachable {
        path: ctx.root.clone(),
        source,
    })?;
    let results = ResultSet::new();
    let root_ancestry = ctx.root_ancestry();

    pool.in_place_scope(|scope| {
        for child in children {
            match classify(&child, ctx.follow_links) {
                Ok(EntryKind::Dir) => {
                    let results = &results;
                    let parent = root_ancestry.as_ref();
                    scope.spawn(move |_| run_scan_task(child.path, ctx, results, progress, parent));
                }
                Ok(EntryKind::File(size)) => {
                    results.push(Entry::file(child.path, size));
                    progress.inc();
                }
                Ok(EntryKind::Other) => progress.inc(),
                Err(err) => ctx.record_error(AccessError::from_io(&child.path, err)),
            }
        }
    });

    Ok(results)
}

/// One task: size `dir` through its children and record it once. A panic is contained here so
/// sibling tasks and the join are unaffected.
fn run_scan_task(
    dir: PathBuf,
    ctx: &PipelineContext,
    results: &ResultSet,
    progress: &ProgressCounter,
    parent: Option<&Ancestry<'_>>,
) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| scan_task_size(&dir, ctx, progress, parent)));
    match outcome {
        Ok(size) => results.push(Entry::dir(dir, size)),
        Err(_) => error!("scan task for {} panicked; its size is not recorded", dir.display()),
    }
}

fn scan_task_size(
    dir: &Path,
    ctx: &PipelineContext,
    progress: &ProgressCounter,
    parent: Option<&Ancestry<'_>>,
) -> u64 {
    let ancestry = match parent.map(|p| p.enter(dir)).transpose() {
        Ok(a) => a,
        Err(err) => {
            ctx.record_error(err);
            return 0;
        }
    };
    let local = ResultSet::new();
    collect_in(dir, &local, progress, ctx, ancestry.as_ref());
    local.total_size()
}
