//! Subtree sizing: total bytes under a directory, best effort, never failing.
//!
//! Siblings are summed with rayon, so a deep or wide subtree fans out over the scan pool one
//! directory level at a time while [`accumulate`] itself still blocks until the total is known.

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::pipeline::context::PipelineContext;
use crate::pipeline::error_handler::AccessError;

use super::tools::{EntryKind, classify, read_children};

/// Canonical directories on the current branch, innermost first. Only built when links are
/// followed; it is what stops a link back to an ancestor from recursing forever.
#[derive(Debug)]
pub struct Ancestry<'a> {
    dir: PathBuf,
    parent: Option<&'a Ancestry<'a>>,
}

impl<'a> Ancestry<'a> {
    pub fn root(dir: PathBuf) -> Self {
        Self { dir, parent: None }
    }

    /// Branch state for sizing `path` on its own: `Ok(None)` when links are not followed.
    pub fn start(path: &Path, ctx: &PipelineContext) -> Result<Option<Ancestry<'static>>, AccessError> {
        if !ctx.follow_links {
            return Ok(None);
        }
        let canonical = path
            .canonicalize()
            .map_err(|err| AccessError::from_io(path, err))?;
        Ok(Some(Ancestry::root(canonical)))
    }

    pub fn contains(&self, dir: &Path) -> bool {
        let mut cur = Some(self);
        while let Some(a) = cur {
            if a.dir == dir {
                return true;
            }
            cur = a.parent;
        }
        false
    }

    /// Step into `path`, refusing if it resolves to a directory already on this branch.
    pub fn enter(&'a self, path: &Path) -> Result<Ancestry<'a>, AccessError> {
        let canonical = path
            .canonicalize()
            .map_err(|err| AccessError::from_io(path, err))?;
        if self.contains(&canonical) {
            return Err(AccessError::FilesystemLoop {
                path: path.to_path_buf(),
                ancestor: canonical,
            });
        }
        Ok(Ancestry {
            dir: canonical,
            parent: Some(self),
        })
    }
}

/// Total size in bytes of everything under `path` that could be read.
///
/// An unlistable directory or an unstattable file is logged through `ctx` and counts as 0;
/// nothing propagates.
pub fn accumulate(path: &Path, ctx: &PipelineContext) -> u64 {
    match Ancestry::start(path, ctx) {
        Ok(ancestry) => accumulate_in(path, ctx, ancestry.as_ref()),
        Err(err) => {
            ctx.record_error(err);
            0
        }
    }
}

/// Size the child directory `path` of a branch described by `parent`.
pub(crate) fn size_dir(path: &Path, ctx: &PipelineContext, parent: Option<&Ancestry<'_>>) -> u64 {
    let ancestry = match parent.map(|p| p.enter(path)).transpose() {
        Ok(a) => a,
        Err(err) => {
            ctx.record_error(err);
            return 0;
        }
    };
    accumulate_in(path, ctx, ancestry.as_ref())
}

fn accumulate_in(path: &Path, ctx: &PipelineContext, ancestry: Option<&Ancestry<'_>>) -> u64 {
    let children = match read_children(path, ctx) {
        Ok(c) => c,
        Err(err) => {
            ctx.record_error(AccessError::from_io(path, err));
            return 0;
        }
    };
    children
        .par_iter()
        .map(|child| match classify(child, ctx.follow_links) {
            Ok(EntryKind::File(len)) => len,
            Ok(EntryKind::Dir) => size_dir(&child.path, ctx, ancestry),
            Ok(EntryKind::Other) => 0,
            Err(err) => {
                ctx.record_error(AccessError::from_io(&child.path, err));
                0
            }
        })
        .sum()
}
