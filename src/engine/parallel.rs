//! Scan thread pool: rayon's default size, capped by the FD limit.

use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::pipeline::error_handler::ScanError;
use crate::utils::config::{PackagePaths, WorkerThreadLimits};
use crate::utils::fd_limit::max_workers_by_fd_limit;

/// Worker count for the scan pool. Not user-configurable.
pub fn scan_pool_size() -> usize {
    let limits = WorkerThreadLimits::current();
    let num_threads = match max_workers_by_fd_limit() {
        Some(fd_cap) if fd_cap < limits.all_threads => {
            debug!(
                "Capping threads {} -> {} (FD limit ~80%)",
                limits.all_threads, fd_cap
            );
            fd_cap
        }
        _ => limits.all_threads,
    };
    num_threads.max(limits.floor)
}

pub fn build_scan_pool() -> Result<ThreadPool, ScanError> {
    let num_threads = scan_pool_size();
    debug!("Scan pool: {} threads", num_threads);
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .stack_size(WorkerThreadLimits::STACK_SIZE)
        .thread_name(|i| PackagePaths::get().worker_thread_name(i))
        .build()?;
    Ok(pool)
}
