//! Command-line interface
//!
//! Usage: distmin [OPTIONS] [INPUT_DIR] [OUTPUT_DIR]
//!
//! With no input directory, `./src` is used when it exists; otherwise help
//! is printed. The output directory defaults to `<input_dir>.min`.

use std::path::PathBuf;

use clap::Parser;

/// distmin - batch JavaScript distribution pipeline
#[derive(Parser, Debug)]
#[command(name = "distmin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input directory (defaults to ./src when it exists)
    pub input_dir: Option<PathBuf>,

    /// Output directory (defaults to <input_dir>.min)
    pub output_dir: Option<PathBuf>,

    /// External minifier program, fed source on stdin
    #[arg(long, default_value = "terser")]
    pub minifier: String,
}
