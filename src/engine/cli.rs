//! CLI command handler: scan DIR, print the top-N report.

use anyhow::Result;
use log::{debug, warn};
use std::io::IsTerminal;
use std::path::Path;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::running_as_root;
use crate::report::{print_report, print_report_json, sorted_top};
use crate::scan::scan_dir_with_opts;
use crate::utils::{apply_file_to_opts, load_dirtally_toml, setup_logging};

/// Overwrite opts with every flag given on the command line.
pub fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) {
    if let Some(top) = cli.top {
        opts.top = top;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(q) = cli.quiet {
        opts.show_progress = !q;
    }
    if let Some(f) = cli.follow_links {
        opts.follow_links = f;
    }
    if cli.no_follow_links {
        opts.follow_links = false;
    }
    if !cli.exclude.is_empty() {
        opts.exclude = cli.exclude.clone();
    }
    if let Some(j) = cli.json {
        opts.json = j;
    }
    if let Some(s) = cli.serial_count {
        opts.parallel_count = !s;
    }
}

/// Defaults, then `.dirtally.toml` from the working directory, then CLI flags.
fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts {
        show_progress: true,
        ..Opts::default()
    };
    let file = load_dirtally_toml(Path::new("."));
    if let Ok(Some(ref file)) = file {
        apply_file_to_opts(file, &mut opts);
    }
    apply_cli_to_opts(cli, &mut opts);
    opts.show_progress &= std::io::stderr().is_terminal();

    setup_logging(opts.verbose);
    if let Err(e) = file {
        warn!("{:#}", e);
    }
    opts
}

/// Scan `cli.dir` and print the report.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    if running_as_root() {
        debug!("Running as root; permission errors are unlikely to show up.");
    }
    let entries = scan_dir_with_opts(&cli.dir, &opts)?;
    let top = sorted_top(entries, opts.top);
    if opts.json {
        print_report_json(&top)?;
    } else {
        print_report(&top, opts.top);
    }
    Ok(())
}
