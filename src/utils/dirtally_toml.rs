//! Load `.dirtally.toml` from the working directory (CLI only). Lib callers pass [`ScanOpts`](crate::ScanOpts).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct DirtallyToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    top: Option<usize>,
    verbose: Option<bool>,
    quiet: Option<bool>,
    follow_links: Option<bool>,
    exclude: Option<Vec<String>>,
    json: Option<bool>,
    parallel_count: Option<bool>,
}

/// Read the settings file from `dir`. `Ok(None)` when there is no file; `Err` when it exists
/// but cannot be read or parsed (the caller logs it once logging is up).
pub fn load_dirtally_toml(dir: &Path) -> Result<Option<DirtallyToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    parse_dirtally_toml(&s)
        .with_context(|| format!("parse {}", path.display()))
        .map(Some)
}

pub fn parse_dirtally_toml(s: &str) -> Result<DirtallyToml> {
    Ok(toml::from_str(s)?)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &DirtallyToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, top => top);
    apply_file_opt!(s, opts, verbose => verbose);
    apply_file_opt!(s, opts, follow_links => follow_links);
    apply_file_opt!(s, opts, json => json);
    apply_file_opt!(s, opts, parallel_count => parallel_count);
    if let Some(quiet) = s.quiet {
        opts.show_progress = !quiet;
    }
    if let Some(ref v) = s.exclude {
        opts.exclude = v.clone();
    }
}
