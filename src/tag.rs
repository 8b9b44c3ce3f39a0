//! Tag File Parser/Rewriter
//!
//! A tag file (typically the HTML page loading the scripts) lists the files
//! to merge between two lines carrying the literal marker ` @all.js `.
//! Inside a region, the first quoted string on each line that ends in `.js`
//! joins the merge list. The parser rewrites the file so the whole region
//! collapses to a single reference to the merged `all.js`, and reports the
//! ordered source list plus the synthesized target path.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::DistminResult;
use crate::fs::FileSystem;

/// Marker substring delimiting a merge region, used for begin and end alike.
pub const MERGE_MARKER: &str = " @all.js ";

/// Name of the merged artifact, written next to the first listed script.
pub const MERGED_FILE_NAME: &str = "all.js";

/// Suffix a quoted reference must carry to join the merge list.
pub const SCRIPT_SUFFIX: &str = ".js";

/// Outcome of parsing one tag file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagParseResult {
    /// The tag file with each marker region collapsed to one rewritten line
    pub rewritten_text: String,
    /// Path of the merged artifact; set iff any qualifying file was found
    pub merge_target: Option<String>,
    /// Qualifying files across all regions, first-seen order, no de-duplication
    pub merge_sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Inside,
}

/// First single- or double-quoted substring on a line.
fn quoted_path(line: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("quoted path pattern")
    });
    let caps = re.captures(line)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Directory part of a forward-slash path, Node-style:
/// `js/a.js` -> `js`, `a.js` -> `.`.
fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Parse tag-file text.
///
/// Explicit two-state machine over lines: `Outside` copies verbatim until a
/// marker line (which is dropped); `Inside` collects quoted `.js` references
/// until the closing marker (also dropped), then emits at most one line, the
/// first collected reference rewritten to point at the merged artifact.
/// A file ending while `Inside` closes the region implicitly with the same
/// emission rule.
pub fn parse_tag_source(text: &str) -> TagParseResult {
    let mut output: Vec<String> = Vec::new();
    let mut merge_sources: Vec<String> = Vec::new();
    let mut merge_target: Option<String> = None;
    let mut pending_rewrite: Option<String> = None;

    let mut state = State::Outside;
    let mut region_found = false;

    for line in text.split('\n') {
        match state {
            State::Outside => {
                if line.contains(MERGE_MARKER) {
                    state = State::Inside;
                    region_found = false;
                } else {
                    output.push(line.to_string());
                }
            }
            State::Inside => {
                if line.contains(MERGE_MARKER) {
                    if region_found {
                        if let Some(rewritten) = pending_rewrite.take() {
                            output.push(rewritten);
                        }
                    }
                    state = State::Outside;
                    continue;
                }

                let Some(file) = quoted_path(line) else {
                    continue;
                };
                if !file.ends_with(SCRIPT_SUFFIX) {
                    continue;
                }

                if merge_target.is_none() {
                    let target = format!("{}/{}", dirname(file), MERGED_FILE_NAME);
                    pending_rewrite = Some(line.replacen(file, &target, 1));
                    merge_target = Some(target);
                }
                merge_sources.push(file.to_string());
                region_found = true;
            }
        }
    }

    // EOF while inside a region closes it implicitly.
    if state == State::Inside && region_found {
        if let Some(rewritten) = pending_rewrite.take() {
            output.push(rewritten);
        }
    }

    TagParseResult {
        rewritten_text: output.join("\n"),
        merge_target,
        merge_sources,
    }
}

/// Parse the tag file at `path`. A missing file is the valid "no tag file"
/// outcome, not an error; the pipeline decides whether that is fatal.
pub fn parse_tag_file<F: FileSystem>(
    fs: &F,
    path: &Path,
) -> DistminResult<Option<TagParseResult>> {
    if !fs.exists(path) {
        return Ok(None);
    }
    let text = fs.read_to_string(path)?;
    Ok(Some(parse_tag_source(&text)))
}
