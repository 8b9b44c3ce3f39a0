//! Merge & Debug-Toggle Stage
//!
//! Concatenates the tag-listed scripts into the merged artifact and flips
//! the debug constant. The toggle fires at most once per run: either on the
//! configured debug file, or on the first occurrence seen while merging,
//! never both.

use std::path::Path;

use crate::error::DistminResult;
use crate::fs::FileSystem;

/// The only recognized debug declaration.
pub const DEBUG_TRUE: &str = "const is_debug = true";
/// Its replacement.
pub const DEBUG_FALSE: &str = "const is_debug = false";

/// Flip the first debug-true declaration in `rel` under the output tree.
/// A file without the declaration is left untouched; that is not an error.
pub fn toggle_debug_file<F: FileSystem>(fs: &F, out_root: &Path, rel: &str) -> DistminResult<()> {
    let path = out_root.join(rel);
    let contents = fs.read_to_string(&path)?;
    if contents.contains(DEBUG_TRUE) {
        fs.write(&path, &contents.replacen(DEBUG_TRUE, DEBUG_FALSE, 1))?;
    }
    Ok(())
}

/// Concatenate `sources` (in order, no separator) into `target`, deleting
/// each source from the output tree after it is read.
///
/// When no debug file is configured, the first debug-true declaration seen
/// across the concatenation is flipped; once flipped, later sources are not
/// checked again.
pub fn merge_sources<F: FileSystem>(
    fs: &F,
    out_root: &Path,
    target: &str,
    sources: &[String],
    debug_file_configured: bool,
) -> DistminResult<()> {
    let mut merged = String::new();
    let mut toggled = false;

    for source in sources {
        let path = out_root.join(source);
        let mut contents = fs.read_to_string(&path)?;
        if !debug_file_configured && !toggled && contents.contains(DEBUG_TRUE) {
            toggled = true;
            contents = contents.replacen(DEBUG_TRUE, DEBUG_FALSE, 1);
        }
        merged.push_str(&contents);
        fs.remove_file(&path)?;
        println!("remove {source}");
    }

    fs.write(&out_root.join(target), &merged)?;
    println!("write {target}");
    Ok(())
}
