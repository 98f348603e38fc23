//! Pipeline components: context, counting walk, per-directory collection, dispatch, results.

pub mod collect;
pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod results;
pub mod walk;

pub use collect::collect;
pub use context::PipelineContext;
pub use error_handler::{AccessError, ScanError, report_skipped_paths};
pub use orchestrator::{check_root, dispatch, run};
pub use results::ResultSet;
pub use walk::{WalkOutcome, count_entries, run_count_loop, to_outcome_jwalk, to_outcome_walkdir};
