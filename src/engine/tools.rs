//! Directory listing, entry classification and exclude filters

use std::fs::{self, FileType, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use crate::pipeline::context::PipelineContext;
use crate::pipeline::error_handler::AccessError;

/// One listed child of a directory. The file type comes from the listing and does not follow links.
#[derive(Clone, Debug)]
pub struct Child {
    pub path: PathBuf,
    pub file_type: FileType,
}

/// What a child turned out to be once the link policy is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File(u64),
    Dir,
    /// Unfollowed symlink, socket, fifo, device: listed but never sized.
    Other,
}

impl EntryKind {
    fn from_metadata(meta: &Metadata) -> Self {
        if meta.is_dir() {
            EntryKind::Dir
        } else if meta.is_file() {
            EntryKind::File(meta.len())
        } else {
            EntryKind::Other
        }
    }
}

/// List `dir`, dropping excluded children. Failing to open `dir` is returned; a child that
/// errors mid-listing is recorded on `ctx` and skipped so its siblings still come through.
pub fn read_children(dir: &Path, ctx: &PipelineContext) -> io::Result<Vec<Child>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                ctx.record_error(AccessError::from_io(dir, err));
                continue;
            }
        };
        let path = entry.path();
        if ctx.is_excluded(&path) {
            continue;
        }
        match entry.file_type() {
            Ok(file_type) => children.push(Child { path, file_type }),
            Err(err) => ctx.record_error(AccessError::from_io(&path, err)),
        }
    }
    Ok(children)
}

/// Resolve a child to file (with its byte length), directory, or other. Only a symlink
/// with `follow_links` set is resolved through to its target.
pub fn classify(child: &Child, follow_links: bool) -> io::Result<EntryKind> {
    let ft = child.file_type;
    if ft.is_symlink() {
        if !follow_links {
            return Ok(EntryKind::Other);
        }
        return fs::metadata(&child.path).map(|m| EntryKind::from_metadata(&m));
    }
    if ft.is_dir() {
        return Ok(EntryKind::Dir);
    }
    if ft.is_file() {
        return fs::symlink_metadata(&child.path).map(|m| EntryKind::File(m.len()));
    }
    Ok(EntryKind::Other)
}

/// True if `path` matches an exclude pattern, by file name or by full path. The root never matches.
/// Names that are not valid UTF-8 are matched with U+FFFD in place of the bad bytes.
pub fn is_excluded(path: &Path, root: &Path, exclude_patterns: &[String]) -> bool {
    if path == root || exclude_patterns.is_empty() {
        return false;
    }
    let name = match path.file_name() {
        Some(n) => n.to_string_lossy(),
        None => return false,
    };
    let path_str = path.to_string_lossy();
    exclude_patterns
        .iter()
        .any(|pattern| glob_match(pattern, &name) || glob_match(pattern, &path_str))
}

/// Simple glob pattern matching (supports `*` and `?`). A leading `!` is ignored.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.strip_prefix('!').unwrap_or(pattern);
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    glob_match_chars(&p, &t)
}

fn glob_match_chars(p: &[char], t: &[char]) -> bool {
    match p.split_first() {
        None => t.is_empty(),
        Some(('*', rest)) => {
            if rest.is_empty() {
                return true; // trailing * matches everything
            }
            (0..=t.len()).any(|skip| glob_match_chars(rest, &t[skip..]))
        }
        Some(('?', rest)) => !t.is_empty() && glob_match_chars(rest, &t[1..]),
        Some((c, rest)) => t.first() == Some(c) && glob_match_chars(rest, &t[1..]),
    }
}

/// True if the process is running with effective uid 0 (e.g. via sudo).
/// Root reads through permission bits, so nothing is ever denied.
#[cfg(unix)]
pub fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn running_as_root() -> bool {
    false
}
