//! Pipeline Orchestrator
//!
//! Drives one run end to end: copy -> tag rewrite -> debug toggle -> merge
//! -> delete -> minify, in a fixed order. An `Err` from `run` is fatal and
//! becomes exit status 1; non-fatal conditions (output-dir cleanup, deleting
//! removable files, minifier failures) are printed to stderr and the run
//! continues. There is no retry and no rollback; the clean-first step makes
//! a re-run recover from partial output.

use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{DistminError, DistminResult};
use crate::fs::FileSystem;
use crate::merge;
use crate::minify::{Minifier, MinifyOptions};
use crate::pattern::{compile_patterns, matches_any};
use crate::scanner::scan;
use crate::tag::{parse_tag_file, TagParseResult};

/// Suffix of files handed to the minifier.
const SCRIPT_SUFFIX: &str = ".js";
/// Already-minified artifacts are never minified again.
const MINIFIED_SUFFIX: &str = ".min.js";

/// One configured run of the distribution pipeline.
pub struct Pipeline {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run all stages in order.
    pub fn run<F: FileSystem, M: Minifier>(&self, fs: &F, minifier: &M) -> DistminResult<()> {
        if !fs.is_dir(&self.input_dir) {
            return Err(DistminError::DirectoryNotFound {
                path: self.input_dir.clone(),
            });
        }

        let config = Config::load(fs, &self.input_dir.join(CONFIG_FILE_NAME))?;

        let parse_result = self.parse_tag_stage(fs, &config)?;

        if let Some(rel) = &config.is_debug_file {
            let path = self.input_dir.join(rel);
            if !fs.exists(&path) {
                return Err(DistminError::DebugFileNotFound { path });
            }
        }

        // Clean the previous output; a failed delete is logged, not fatal.
        if let Err(e) = fs.remove_dir_all(&self.output_dir) {
            eprintln!("Error: {e}");
        }

        self.copy_stage(fs)?;

        if let (Some(result), Some(rel)) = (&parse_result, &config.tag_file) {
            fs.write(&self.output_dir.join(rel), &result.rewritten_text)?;
            println!("write {rel}");
        }

        if let Some(rel) = &config.is_debug_file {
            merge::toggle_debug_file(fs, &self.output_dir, rel)?;
        }

        if let Some(result) = &parse_result {
            if let Some(target) = &result.merge_target {
                merge::merge_sources(
                    fs,
                    &self.output_dir,
                    target,
                    &result.merge_sources,
                    config.is_debug_file.is_some(),
                )?;
            }
        }

        self.remove_stage(fs, &config);
        self.minify_stage(fs, minifier, &config)
    }

    /// Parse the configured tag file. Absence of the configuration is fine;
    /// a configured but missing file is fatal.
    fn parse_tag_stage<F: FileSystem>(
        &self,
        fs: &F,
        config: &Config,
    ) -> DistminResult<Option<TagParseResult>> {
        let Some(rel) = &config.tag_file else {
            return Ok(None);
        };
        let path = self.input_dir.join(rel);
        match parse_tag_file(fs, &path)? {
            Some(result) => Ok(Some(result)),
            None => Err(DistminError::TagFileNotFound { path }),
        }
    }

    fn copy_stage<F: FileSystem>(&self, fs: &F) -> DistminResult<()> {
        for entry in scan(fs, &self.input_dir)? {
            fs.copy(&entry.path, &self.output_dir.join(&entry.relative))?;
            println!("copy {}", entry.relative.display());
        }
        Ok(())
    }

    /// Delete the config file plus every configured removable file from the
    /// output tree. Missing files are expected; a failed delete of an
    /// existing file is logged and the run continues.
    fn remove_stage<F: FileSystem>(&self, fs: &F, config: &Config) {
        let mut removable = vec![CONFIG_FILE_NAME.to_string()];
        removable.extend(config.remove_files.iter().cloned());

        for rel in removable {
            let path = self.output_dir.join(&rel);
            if fs.exists(&path) {
                if let Err(e) = fs.remove_file(&path) {
                    eprintln!("Error: {e}");
                }
            }
            println!("remove {rel}");
        }
    }

    fn minify_stage<F: FileSystem, M: Minifier>(
        &self,
        fs: &F,
        minifier: &M,
        config: &Config,
    ) -> DistminResult<()> {
        let toplevel_patterns = compile_patterns(&config.toplevels);
        let exclude_patterns = compile_patterns(&config.excludes);

        for entry in scan(fs, &self.output_dir)? {
            let name = entry.path.to_string_lossy();
            if name.ends_with(MINIFIED_SUFFIX) || !name.ends_with(SCRIPT_SUFFIX) {
                continue;
            }

            let rel = entry.relative.to_string_lossy().into_owned();
            if matches_any(&rel, &exclude_patterns) {
                println!("exclude {rel}");
                continue;
            }

            let code = fs.read_to_string(&entry.path)?;
            let toplevel = matches_any(&rel, &toplevel_patterns);
            let outcome = minifier.minify(&code, &MinifyOptions { toplevel });

            if let Some(minified) = &outcome.code {
                fs.write(&entry.path, minified)?;
            }
            println!("minify {rel}{}", if toplevel { " (toplevel)" } else { "" });
            if let Some(error) = &outcome.error {
                eprintln!("Error: {error}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::minify::MinifyOutcome;
    use std::sync::Mutex;

    /// Records every call and wraps the source so tests can see that a file
    /// went through minification.
    #[derive(Default)]
    struct RecordingMinifier {
        calls: Mutex<Vec<(String, bool)>>,
        fail_with: Option<String>,
    }

    impl RecordingMinifier {
        fn failing(message: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            }
        }

        fn calls(&self) -> Vec<(String, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Minifier for RecordingMinifier {
        fn minify(&self, source: &str, options: &MinifyOptions) -> MinifyOutcome {
            self.calls
                .lock()
                .unwrap()
                .push((source.to_string(), options.toplevel));
            match &self.fail_with {
                Some(message) => MinifyOutcome {
                    code: None,
                    error: Some(message.clone()),
                },
                None => MinifyOutcome {
                    code: Some(format!("min({source})")),
                    error: None,
                },
            }
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(PathBuf::from("site"), PathBuf::from("site.min"))
    }

    #[test]
    fn run_copies_rewrites_merges_and_minifies() {
        let fs = MockFileSystem::new();
        fs.insert(
            "site/index.html",
            "<html>\n<!-- @all.js -->\n  \"js/a.js\",\n  \"js/b.js\",\n<!-- @all.js -->\n</html>",
        );
        fs.insert("site/js/a.js", "const is_debug = true; a()");
        fs.insert("site/js/b.js", "b()");
        fs.insert("site/distmin.json", r#"{ "tag_file": "index.html" }"#);

        let minifier = RecordingMinifier::default();
        pipeline().run(&fs, &minifier).unwrap();

        assert_eq!(
            fs.contents("site.min/index.html").unwrap(),
            "<html>\n  \"js/all.js\",\n</html>"
        );
        assert_eq!(
            fs.contents("site.min/js/all.js").unwrap(),
            "min(const is_debug = false; a()b())"
        );
        assert!(!fs.exists(Path::new("site.min/js/a.js")));
        assert!(!fs.exists(Path::new("site.min/js/b.js")));
        assert!(!fs.exists(Path::new("site.min/distmin.json")));
        // Input tree untouched.
        assert_eq!(
            fs.contents("site/js/a.js").unwrap(),
            "const is_debug = true; a()"
        );
    }

    #[test]
    fn run_fails_on_missing_input_dir() {
        let fs = MockFileSystem::new();
        let minifier = RecordingMinifier::default();

        let err = pipeline().run(&fs, &minifier).unwrap_err();
        assert!(matches!(err, DistminError::DirectoryNotFound { .. }));
    }

    #[test]
    fn run_fails_on_configured_but_missing_tag_file() {
        let fs = MockFileSystem::new();
        fs.insert("site/app.js", "a()");
        fs.insert("site/distmin.json", r#"{ "tag_file": "index.html" }"#);

        let minifier = RecordingMinifier::default();
        let err = pipeline().run(&fs, &minifier).unwrap_err();
        assert!(matches!(err, DistminError::TagFileNotFound { .. }));
    }

    #[test]
    fn run_fails_on_configured_but_missing_debug_file() {
        let fs = MockFileSystem::new();
        fs.insert("site/app.js", "a()");
        fs.insert("site/distmin.json", r#"{ "is_debug_file": "js/config.js" }"#);

        let minifier = RecordingMinifier::default();
        let err = pipeline().run(&fs, &minifier).unwrap_err();
        assert!(matches!(err, DistminError::DebugFileNotFound { .. }));
    }

    #[test]
    fn debug_file_toggle_wins_over_merge_toggle() {
        let fs = MockFileSystem::new();
        fs.insert(
            "site/index.html",
            "<!-- @all.js -->\n\"js/a.js\",\n<!-- @all.js -->",
        );
        fs.insert("site/js/config.js", "const is_debug = true\n");
        fs.insert("site/js/a.js", "const is_debug = true; a()");
        fs.insert(
            "site/distmin.json",
            r#"{ "tag_file": "index.html", "is_debug_file": "js/config.js" }"#,
        );

        let minifier = RecordingMinifier::default();
        pipeline().run(&fs, &minifier).unwrap();

        // The configured debug file was toggled...
        assert_eq!(
            fs.contents("site.min/js/config.js").unwrap(),
            "min(const is_debug = false\n)"
        );
        // ...so the merge stage left its sources alone.
        assert_eq!(
            fs.contents("site.min/js/all.js").unwrap(),
            "min(const is_debug = true; a())"
        );
    }

    #[test]
    fn excluded_files_are_not_minified() {
        let fs = MockFileSystem::new();
        fs.insert("site/js/app.js", "app()");
        fs.insert("site/js/vendor/lib.js", "lib()");
        fs.insert(
            "site/distmin.json",
            r#"{ "excludes": ["js/vendor/*"] }"#,
        );

        let minifier = RecordingMinifier::default();
        pipeline().run(&fs, &minifier).unwrap();

        assert_eq!(fs.contents("site.min/js/app.js").unwrap(), "min(app())");
        assert_eq!(fs.contents("site.min/js/vendor/lib.js").unwrap(), "lib()");
        assert_eq!(minifier.calls().len(), 1);
    }

    #[test]
    fn toplevel_patterns_select_whole_program_minification() {
        let fs = MockFileSystem::new();
        fs.insert("site/js/app.js", "app()");
        fs.insert("site/js/page.js", "page()");
        fs.insert(
            "site/distmin.json",
            r#"{ "toplevels": ["js/app.js"] }"#,
        );

        let minifier = RecordingMinifier::default();
        pipeline().run(&fs, &minifier).unwrap();

        let calls = minifier.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&("app()".to_string(), true)));
        assert!(calls.contains(&("page()".to_string(), false)));
    }

    #[test]
    fn min_js_and_non_script_files_are_skipped() {
        let fs = MockFileSystem::new();
        fs.insert("site/js/lib.min.js", "already");
        fs.insert("site/style.css", "css");
        fs.insert("site/js/app.js", "app()");

        let minifier = RecordingMinifier::default();
        pipeline().run(&fs, &minifier).unwrap();

        assert_eq!(fs.contents("site.min/js/lib.min.js").unwrap(), "already");
        assert_eq!(fs.contents("site.min/style.css").unwrap(), "css");
        assert_eq!(minifier.calls().len(), 1);
    }

    #[test]
    fn minifier_error_is_non_fatal_and_keeps_copied_content() {
        let fs = MockFileSystem::new();
        fs.insert("site/js/broken.js", "syntax error here");
        fs.insert("site/js/fine.js", "ok()");

        let minifier = RecordingMinifier::failing("parse error");
        pipeline().run(&fs, &minifier).unwrap();

        // Nothing came back from the minifier, so the copies stay as-is.
        assert_eq!(
            fs.contents("site.min/js/broken.js").unwrap(),
            "syntax error here"
        );
        assert_eq!(fs.contents("site.min/js/fine.js").unwrap(), "ok()");
        assert_eq!(minifier.calls().len(), 2);
    }

    #[test]
    fn remove_files_are_deleted_from_output_tree() {
        let fs = MockFileSystem::new();
        fs.insert("site/app.js", "a()");
        fs.insert("site/notes.txt", "dev notes");
        fs.insert(
            "site/distmin.json",
            r#"{ "remove_files": ["notes.txt", "absent.txt"] }"#,
        );

        let minifier = RecordingMinifier::default();
        pipeline().run(&fs, &minifier).unwrap();

        assert!(!fs.exists(Path::new("site.min/notes.txt")));
        assert!(!fs.exists(Path::new("site.min/distmin.json")));
        assert!(fs.exists(Path::new("site.min/app.js")));
    }

    #[test]
    fn stale_output_is_cleared_before_copying() {
        let fs = MockFileSystem::new();
        fs.insert("site/app.js", "a()");
        fs.insert("site.min/stale.js", "old artifact");

        let minifier = RecordingMinifier::default();
        pipeline().run(&fs, &minifier).unwrap();

        assert!(!fs.exists(Path::new("site.min/stale.js")));
        assert!(fs.exists(Path::new("site.min/app.js")));
    }
}
