//! Dirtally: concurrent disk-usage scanner that reports the largest files and directories

pub mod engine;
pub mod pipeline;
pub mod report;
pub mod scan;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use pipeline::{AccessError, ResultSet, ScanError};

use log::debug;
use std::path::Path;

/// Result alias used by public dirtally API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Scan `root` and return one [`Entry`] per top-level file and directory, in no particular order.
///
/// Directories carry the size of their whole subtree. Unreadable entries below the root are
/// logged (via `log`) and count as 0 bytes. Errors only when `root` itself cannot be listed;
/// the error then downcasts to [`ScanError::RootUnreachable`].
///
/// ```ignore
/// let entries = dirtally::scan_dir(Path::new("/var"), &ScanOpts::default())?;
/// let top = dirtally::report::sorted_top(entries, 10);
/// ```
pub fn scan_dir(root: &Path, opts: &ScanOpts) -> Result<Vec<Entry>> {
    let opts = Opts::from(opts);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    scan::scan_dir_with_opts(root, &opts)
}

/// [`scan_dir`] followed by [`report::sorted_top`]: the `n` largest entries, descending.
pub fn largest_entries(root: &Path, opts: &ScanOpts, n: usize) -> Result<Vec<Entry>> {
    Ok(report::sorted_top(scan_dir(root, opts)?, n))
}
