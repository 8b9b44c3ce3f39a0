//! Tree Scanner
//!
//! Recursively lists all regular files under a directory. Entries whose name
//! starts with `.` are skipped entirely, so a hidden directory hides
//! everything below it.

use std::path::{Path, PathBuf};

use crate::error::DistminResult;
use crate::fs::FileSystem;

/// A regular file found under a scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path of the file
    pub path: PathBuf,
    /// Path relative to the scan root
    pub relative: PathBuf,
}

/// List all non-hidden regular files under `root`, depth-first in the
/// order the underlying listing returns entries. An unreadable `root` is
/// an error; the caller treats it as fatal.
pub fn scan<F: FileSystem>(fs: &F, root: &Path) -> DistminResult<Vec<FileEntry>> {
    let mut entries = Vec::new();
    walk(fs, root, root, &mut entries)?;
    Ok(entries)
}

fn walk<F: FileSystem>(
    fs: &F,
    root: &Path,
    dir: &Path,
    out: &mut Vec<FileEntry>,
) -> DistminResult<()> {
    for entry in fs.list_dir(dir)? {
        if entry.name.starts_with('.') {
            continue;
        }

        let path = dir.join(&entry.name);
        if entry.is_dir {
            walk(fs, root, &path, out)?;
        } else {
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            out.push(FileEntry { path, relative });
        }
    }
    Ok(())
}
