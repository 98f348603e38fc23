//! Directory scan operation

use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::pipeline::{PipelineContext, report_skipped_paths, run};
use crate::{Entry, Opts};

/// Scan `root` and return one record per top-level entry. Access failures below the root are
/// logged as they happen and summarized at the end; only an unreachable root is an error.
pub fn scan_dir_with_opts(root: &Path, opts: &Opts) -> Result<Vec<Entry>> {
    let ctx = PipelineContext::new(root, opts);
    let results = run(&ctx, opts)?;
    report_skipped_paths(opts, &ctx.skipped_paths);
    debug!(
        "{} records, {} bytes total, {} skipped",
        results.len(),
        results.total_size(),
        ctx.skipped_count()
    );
    Ok(results.into_vec())
}
