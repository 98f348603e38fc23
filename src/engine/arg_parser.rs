use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Concurrent disk-usage scanner: the largest files and directories under DIR.
#[derive(Clone, Parser)]
#[command(name = "dirtally")]
#[command(about = "Scan a directory and report its largest files and directories.")]
pub struct Cli {
    /// Directory to scan. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Number of entries in the report. Default: 10.
    #[arg(long, short = 'n', value_parser = clap::value_parser!(usize))]
    pub top: Option<usize>,

    /// Verbose output (debug logging, list every skipped path).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// No progress bar.
    #[arg(long, short = 'q', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub quiet: Option<bool>,

    /// Follow symbolic links (default). Links back to an ancestor directory are skipped.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Do not resolve symbolic links; they count as 0 bytes.
    #[arg(long, conflicts_with = "follow_links")]
    pub no_follow_links: bool,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Print the report as JSON.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,

    /// Count entries with a serial walk instead of a parallel one (gentler on slow disks).
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub serial_count: Option<bool>,
}
