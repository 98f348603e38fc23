//! Top-N report: sort the finished records and print them.

use anyhow::Result;
use std::fmt::Write as _;

use crate::Entry;
use crate::utils::config::ReportConsts;

/// The `n` largest records, descending by size. Equal sizes come out in no particular order.
pub fn sorted_top(mut records: Vec<Entry>, n: usize) -> Vec<Entry> {
    records.sort_unstable_by(|a, b| b.size.cmp(&a.size));
    records.truncate(n);
    records
}

/// `3145728` -> `"3.00 MB"` (binary megabytes, two decimals).
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / ReportConsts::BYTES_PER_MB)
}

/// Text report: a header line, then `<path>: <size> MB` per entry.
pub fn render_report(top: &[Entry], n: usize) -> String {
    let mut out = format!("Top {} largest files and directories:\n", n);
    for entry in top {
        let _ = writeln!(out, "{}: {}", entry.path.display(), format_mb(entry.size));
    }
    out
}

pub fn print_report(top: &[Entry], n: usize) {
    print!("{}", render_report(top, n));
}

pub fn render_report_json(top: &[Entry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(top)?)
}

pub fn print_report_json(top: &[Entry]) -> Result<()> {
    println!("{}", render_report_json(top)?);
    Ok(())
}
