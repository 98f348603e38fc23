//! Access error taxonomy and the end-of-scan summary of skipped paths.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::Opts;

/// A failure below the scan root. Logged once, counted as 0 bytes, never propagated.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Permission denied: {}", path.display())]
    AccessDenied { path: PathBuf },

    /// Anything else while listing or statting: I/O error, entry vanished mid-scan, ...
    #[error("Error accessing {}: {source}", path.display())]
    Transient {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A followed link resolves to a directory already on the current branch.
    #[error(
        "Error accessing {}: filesystem loop back to {}",
        path.display(),
        ancestor.display()
    )]
    FilesystemLoop { path: PathBuf, ancestor: PathBuf },
}

impl AccessError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => AccessError::AccessDenied {
                path: path.to_path_buf(),
            },
            _ => AccessError::Transient {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            AccessError::AccessDenied { path }
            | AccessError::Transient { path, .. }
            | AccessError::FilesystemLoop { path, .. } => path,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, AccessError::AccessDenied { .. })
    }
}

/// The only fatal failures: the scan cannot start at all.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot scan {}: {source}", path.display())]
    RootUnreachable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start the scan thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Warn once with the number of skipped entries; with verbose, list each one and why.
/// Call after the join, when no worker can still be recording.
pub fn report_skipped_paths(opts: &Opts, skipped_paths: &Mutex<Vec<(PathBuf, String)>>) {
    let skipped = skipped_paths
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if skipped.is_empty() {
        return;
    }
    log::warn!(
        "Skipped {} entries due to permission errors or access issues; sizes are undercounted",
        skipped.len()
    );
    if opts.verbose {
        for (path, msg) in skipped.iter() {
            eprintln!("  skipped: {} ({})", path.display(), msg);
        }
    }
}
