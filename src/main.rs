//! Dirtally CLI: scan a directory and print its largest files and directories.

use anyhow::Result;
use clap::Parser;
use dirtally::engine::{Cli, handle_run};
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
