//! Common helpers for distmin integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of running the distmin binary
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run the distmin binary with `args`, using `cwd` as the working directory.
pub fn run_distmin(cwd: &Path, args: &[&str]) -> RunResult {
    let bin = env!("CARGO_BIN_EXE_distmin");
    let output = Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run distmin");

    RunResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Write a file, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Collect every file under `root` as relative path -> content.
pub fn tree_contents(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut contents = BTreeMap::new();
    collect(root, root, &mut contents);
    contents
}

fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let relative = path.strip_prefix(root).unwrap().to_path_buf();
            out.insert(relative, std::fs::read(&path).unwrap());
        }
    }
}
