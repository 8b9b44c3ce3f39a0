//! Error types for distmin
//!
//! Uses `thiserror` for library errors. Only the variants below are fatal to
//! a run; everything else (output-dir cleanup, removable-file deletion,
//! minifier failures) is printed and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for distmin operations
pub type DistminResult<T> = Result<T, DistminError>;

/// Main error type for distmin operations
#[derive(Error, Debug)]
pub enum DistminError {
    /// Input directory missing or not a directory
    #[error("dir not exists: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Configured tag file is absent from the input directory
    #[error("tag_file not exists: {path}")]
    TagFileNotFound { path: PathBuf },

    /// Configured debug file is absent from the input directory
    #[error("is_debug_file not exists: {path}")]
    DebugFileNotFound { path: PathBuf },

    /// Configuration file present but not parseable
    #[error("invalid config {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
