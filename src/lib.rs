//! distmin - batch JavaScript distribution pipeline
//!
//! distmin mirrors a source tree into a distribution tree: it merges
//! tag-listed scripts into a single `all.js`, flips the debug constant,
//! removes development-only files, and hands every remaining script file to
//! an external minifier.

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod merge;
pub mod minify;
pub mod pattern;
pub mod pipeline;
pub mod scanner;
pub mod tag;

// Re-exports for convenience
pub use config::{Config, CONFIG_FILE_NAME};
pub use error::{DistminError, DistminResult};
pub use fs::{FileSystem, LocalFs};
pub use minify::{CommandMinifier, Minifier, MinifyOptions, MinifyOutcome};
pub use pattern::{compile_patterns, matches_any, PathPattern};
pub use pipeline::Pipeline;
pub use scanner::{scan, FileEntry};
pub use tag::{parse_tag_file, parse_tag_source, TagParseResult};
