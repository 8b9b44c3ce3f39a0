//! External minifier collaborator
//!
//! Minification itself is a black box: a program (terser by default) reads
//! source on stdin and writes minified code on stdout. The trait keeps the
//! pipeline's sequencing testable without spawning anything.

use std::io::Write;
use std::process::{Command, Stdio};

/// Options forwarded to the minifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinifyOptions {
    /// Whole-program name mangling
    pub toplevel: bool,
}

/// Outcome of one minification call.
///
/// `code` and `error` are independent: a minifier may report an error and
/// still return usable output, and the pipeline writes whatever came back.
#[derive(Debug, Clone, Default)]
pub struct MinifyOutcome {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Injected minification capability.
pub trait Minifier {
    fn minify(&self, source: &str, options: &MinifyOptions) -> MinifyOutcome;
}

/// Minifier that shells out to an external program.
///
/// The source is piped to stdin and minified code read from stdout;
/// `--toplevel` is appended when whole-program mangling is requested
/// (terser's flag). Spawn failures and nonzero exits are reported as
/// outcome errors, never panics.
#[derive(Debug, Clone)]
pub struct CommandMinifier {
    program: String,
}

impl CommandMinifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Minifier for CommandMinifier {
    fn minify(&self, source: &str, options: &MinifyOptions) -> MinifyOutcome {
        let mut cmd = Command::new(&self.program);
        if options.toplevel {
            cmd.arg("--toplevel");
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return MinifyOutcome {
                    code: None,
                    error: Some(format!("failed to run {}: {e}", self.program)),
                }
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(source.as_bytes()) {
                let _ = child.wait();
                return MinifyOutcome {
                    code: None,
                    error: Some(format!("failed to feed {}: {e}", self.program)),
                };
            }
        }

        let output = match child.wait_with_output() {
            Ok(output) => output,
            Err(e) => {
                return MinifyOutcome {
                    code: None,
                    error: Some(format!("{} failed: {e}", self.program)),
                }
            }
        };

        if output.status.success() {
            MinifyOutcome {
                code: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
                error: None,
            }
        } else {
            MinifyOutcome {
                code: None,
                error: Some(format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                )),
            }
        }
    }
}
