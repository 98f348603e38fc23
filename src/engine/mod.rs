//! Engine module: CLI surface, sizing, progress, pool and path tools

pub mod arg_parser;
pub mod cli;
pub mod parallel;
pub mod progress;
pub mod sizer;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{apply_cli_to_opts, handle_run};
pub use parallel::{build_scan_pool, scan_pool_size};
pub use progress::ProgressCounter;
pub use sizer::accumulate;
pub use tools::{glob_match, is_excluded, running_as_root};
