//! Public and internal types for the dirtally API and pipeline.

use serde::Serialize;
use std::path::PathBuf;

use crate::utils::config::ReportConsts;

/// One recorded size: a top-level file, or a directory with its whole subtree folded in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub path: PathBuf,
    /// Size in bytes. For directories, the sum of every descendant that could be read.
    pub size: u64,
    pub is_dir: bool,
}

impl Entry {
    pub fn file(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            is_dir: false,
        }
    }

    pub fn dir(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            is_dir: true,
        }
    }
}

/// Lib-only options for [`scan_dir`](crate::scan_dir). No report or terminal settings.
#[derive(Clone, Debug)]
pub struct ScanOpts {
    /// Size symbolic links as their targets (default). Loops back to an ancestor are detected
    /// and skipped; with `false`, links contribute 0.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax, e.g. `node_modules`, `*.log`).
    pub exclude: Vec<String>,
    /// Count the tree with jwalk (parallel) instead of walkdir before dispatching.
    pub parallel_count: bool,
}

impl Default for ScanOpts {
    fn default() -> Self {
        Self {
            follow_links: true,
            exclude: Vec::new(),
            parallel_count: true,
        }
    }
}

impl From<&ScanOpts> for Opts {
    fn from(o: &ScanOpts) -> Self {
        Opts {
            follow_links: o.follow_links,
            exclude: o.exclude.clone(),
            parallel_count: o.parallel_count,
            ..Opts::default()
        }
    }
}

/// Full options (CLI). Use [`ScanOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Number of entries in the report.
    pub top: usize,
    pub follow_links: bool,
    pub exclude: Vec<String>,
    /// Debug logging and a per-path listing of skipped entries.
    pub verbose: bool,
    /// Draw the progress bar on stderr.
    pub show_progress: bool,
    pub parallel_count: bool,
    /// Print the report as JSON instead of text.
    pub json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            top: ReportConsts::DEFAULT_TOP_N,
            follow_links: true,
            exclude: Vec::new(),
            verbose: false,
            show_progress: false,
            parallel_count: true,
            json: false,
        }
    }
}
