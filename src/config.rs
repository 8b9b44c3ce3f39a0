//! Run configuration
//!
//! A fixed-name JSON file (`distmin.json`) at the input directory root.
//! Every field is optional; an absent file yields the default (empty)
//! configuration. The config is read once per run and owned by the pipeline.

use std::path::Path;

use serde::Deserialize;

use crate::error::{DistminError, DistminResult};
use crate::fs::FileSystem;

/// Fixed name of the per-tree configuration file.
pub const CONFIG_FILE_NAME: &str = "distmin.json";

/// Optional per-run configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// File containing merge-marker regions, relative to the input dir
    #[serde(default)]
    pub tag_file: Option<String>,

    /// File whose debug-true declaration is flipped, relative to the input dir
    #[serde(default)]
    pub is_debug_file: Option<String>,

    /// Files removed from the output tree after copying
    #[serde(default)]
    pub remove_files: Vec<String>,

    /// Patterns selecting whole-program (toplevel) minification
    #[serde(default)]
    pub toplevels: Vec<String>,

    /// Patterns exempt from minification
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl Config {
    /// Load configuration from a JSON file; a missing file yields defaults.
    pub fn load<F: FileSystem>(fs: &F, path: &Path) -> DistminResult<Self> {
        if !fs.exists(path) {
            return Ok(Self::default());
        }
        let content = fs.read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| DistminError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
