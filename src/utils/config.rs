//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Optional settings file looked up in the working directory (e.g. `.dirtally.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    pub fn worker_thread_name(&self, index: usize) -> String {
        format!("{}-worker-{index}", self.pkg_name)
    }
}

// ---- Worker threads ----

/// Thread limits for the scan pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Never go below this, whatever the FD limit says.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;
    /// Worker stack size. Sizing recurses once per directory level (through rayon jobs), so
    /// this bounds the deepest tree a scan can descend into, debug builds included.
    pub const STACK_SIZE: usize = 64 * 1024 * 1024;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }
}

// ---- Progress ----

pub struct ProgressConsts;

impl ProgressConsts {
    /// Label shown left of the bar.
    pub const DESC: &'static str = "Scanning files and directories";
}

// ---- Report ----

pub struct ReportConsts;

impl ReportConsts {
    /// Entries listed when no `--top` is given.
    pub const DEFAULT_TOP_N: usize = 10;
    /// Binary megabyte used by the report (1024 * 1024).
    pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
}
