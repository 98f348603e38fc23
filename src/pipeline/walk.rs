//! Counting pass: one full walk that sizes the progress bar before any work is dispatched.

use log::debug;
use std::path::PathBuf;

use crate::engine::tools::is_excluded;

use super::context::PipelineContext;

/// One result from a directory walk: either a path to count or an error with optional path.
pub enum WalkOutcome {
    Ok(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a jwalk result into [`WalkOutcome`].
pub fn to_outcome_jwalk(r: Result<jwalk::DirEntry<((), ())>, jwalk::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => WalkOutcome::Ok(entry.path()),
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => WalkOutcome::Ok(entry.into_path()),
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

fn jwalk_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use jwalk::Parallelism;
    use std::time::Duration;
    let root = ctx.root.clone();
    let exclude = ctx.exclude.clone();
    Box::new(
        jwalk::WalkDir::new(&ctx.root)
            .skip_hidden(false)
            .follow_links(ctx.follow_links)
            .parallelism(Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_secs(60),
            })
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|child| {
                    child
                        .as_ref()
                        .map(|e| !is_excluded(&e.path(), &root, &exclude))
                        .unwrap_or(true)
                });
            })
            .into_iter()
            .map(to_outcome_jwalk),
    )
}

fn walkdir_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use walkdir::WalkDir;
    let root = ctx.root.clone();
    let exclude = ctx.exclude.clone();
    Box::new(
        WalkDir::new(&ctx.root)
            .follow_links(ctx.follow_links)
            .into_iter()
            .filter_entry(move |e| !is_excluded(e.path(), &root, &exclude))
            .map(to_outcome_walkdir),
    )
}

/// Count every file and directory under the root (the root itself excluded).
///
/// Errors are only debug-logged: the dispatch pass hits the same paths and reports them there.
pub fn count_entries(ctx: &PipelineContext, parallel_walk: bool) -> usize {
    let iter = match parallel_walk {
        true => jwalk_iter(ctx),
        false => walkdir_iter(ctx),
    };
    run_count_loop(ctx, iter)
}

/// Consume `iter`, counting every path other than the root.
pub fn run_count_loop<I>(ctx: &PipelineContext, iter: I) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        match outcome {
            WalkOutcome::Ok(path) => {
                if path != ctx.root {
                    count += 1;
                }
            }
            WalkOutcome::Err { msg, path } => {
                debug!(
                    "count pass: {} ({})",
                    msg,
                    path.map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<no path>".to_string())
                );
            }
        }
    }
    count
}
