//! Shared scan context: root, filters, link policy and the skipped-path log every worker writes to.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::Opts;
use crate::engine::sizer::Ancestry;
use crate::engine::tools::is_excluded;

use super::error_handler::AccessError;

/// Read-only settings plus the one piece of shared error state. Built once per scan and
/// borrowed by every task; workers never need their own copy.
pub struct PipelineContext {
    pub root: PathBuf,
    pub exclude: Vec<String>,
    pub follow_links: bool,
    /// Canonical root, only resolved when following links (anchor of the loop guard).
    pub canonical_root: Option<PathBuf>,
    pub skipped_paths: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

impl PipelineContext {
    pub fn new(root: &Path, opts: &Opts) -> Self {
        let canonical_root = if opts.follow_links {
            Some(root.canonicalize().unwrap_or_else(|_| root.to_path_buf()))
        } else {
            None
        };
        Self {
            root: root.to_path_buf(),
            exclude: opts.exclude.clone(),
            follow_links: opts.follow_links,
            canonical_root,
            skipped_paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Error isolation boundary: log the failure and remember it. The caller substitutes 0 bytes.
    pub fn record_error(&self, err: AccessError) {
        log::warn!("{}", err);
        let path = err.path().to_path_buf();
        self.skipped_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path, err.to_string()));
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        is_excluded(path, &self.root, &self.exclude)
    }

    /// Start of the loop guard for tasks dispatched from the root. `None` when links are not followed.
    pub fn root_ancestry(&self) -> Option<Ancestry<'static>> {
        self.canonical_root.clone().map(Ancestry::root)
    }
}
