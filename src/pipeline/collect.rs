//! One directory's immediate children: files recorded as they are, subdirectories as one aggregate each.

use std::path::Path;

use crate::Entry;
use crate::engine::progress::ProgressCounter;
use crate::engine::sizer::{Ancestry, size_dir};
use crate::engine::tools::{EntryKind, classify, read_children};

use super::context::PipelineContext;
use super::error_handler::AccessError;
use super::results::ResultSet;

/// Record every immediate child of `dir` into `results` and tick `progress` once per child.
///
/// Nested entries never show up on their own: a subdirectory is recorded once, with its whole
/// subtree summed by the sizer. If `dir` cannot be listed, the failure is logged and nothing is
/// recorded.
pub fn collect(dir: &Path, results: &ResultSet, progress: &ProgressCounter, ctx: &PipelineContext) {
    match Ancestry::start(dir, ctx) {
        Ok(ancestry) => collect_in(dir, results, progress, ctx, ancestry.as_ref()),
        Err(err) => ctx.record_error(err),
    }
}

pub(crate) fn collect_in(
    dir: &Path,
    results: &ResultSet,
    progress: &ProgressCounter,
    ctx: &PipelineContext,
    ancestry: Option<&Ancestry<'_>>,
) {
    let children = match read_children(dir, ctx) {
        Ok(c) => c,
        Err(err) => {
            ctx.record_error(AccessError::from_io(dir, err));
            return;
        }
    };
    for child in children {
        match classify(&child, ctx.follow_links) {
            Ok(EntryKind::File(size)) => results.push(Entry::file(child.path, size)),
            Ok(EntryKind::Dir) => {
                let size = size_dir(&child.path, ctx, ancestry);
                results.push(Entry::dir(child.path, size));
            }
            Ok(EntryKind::Other) => {}
            Err(err) => ctx.record_error(AccessError::from_io(&child.path, err)),
        }
        progress.inc();
    }
}
