//! distmin CLI - batch JavaScript distribution pipeline
//!
//! Usage: distmin [OPTIONS] [INPUT_DIR] [OUTPUT_DIR]

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use distmin::cli::Cli;
use distmin::fs::LocalFs;
use distmin::minify::CommandMinifier;
use distmin::pipeline::Pipeline;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let input_dir = match cli.input_dir {
        Some(dir) => dir,
        None => {
            let fallback = PathBuf::from("src");
            if fallback.is_dir() {
                fallback
            } else {
                Cli::command().print_help()?;
                return Ok(());
            }
        }
    };

    let output_dir = cli.output_dir.unwrap_or_else(|| {
        let mut name = input_dir.clone().into_os_string();
        name.push(".min");
        PathBuf::from(name)
    });

    let fs = LocalFs::new();
    let minifier = CommandMinifier::new(cli.minifier);

    Pipeline::new(input_dir, output_dir).run(&fs, &minifier)?;
    Ok(())
}
