//! Wildcard path patterns
//!
//! Configuration selects files with glob-like strings: `*` matches any run
//! of characters (separators included), `?` matches exactly one character.
//! A string without either wildcard is kept as a literal path and also
//! matches everything under it.

use std::path::MAIN_SEPARATOR;

use regex::Regex;

/// Regex metacharacters escaped during wildcard translation.
const ESCAPED: &str = r"+()^$.{}[]|\";

/// A compiled path pattern from configuration.
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Matched by equality or `literal + separator` prefix
    Literal(String),
    /// Anchored regex translated from a wildcard string
    Wildcard(Regex),
}

impl PathPattern {
    /// Compile a configuration string into a matcher.
    ///
    /// Forward slashes are normalized to the platform separator first, so
    /// config files can always use `/`.
    pub fn compile(pattern: &str) -> Self {
        let normalized = pattern.replace('/', &MAIN_SEPARATOR.to_string());
        if !normalized.contains('*') && !normalized.contains('?') {
            return Self::Literal(normalized);
        }

        let mut source = String::with_capacity(normalized.len() + 2);
        source.push('^');
        for c in normalized.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                c if ESCAPED.contains(c) => {
                    source.push('\\');
                    source.push(c);
                }
                c => source.push(c),
            }
        }
        source.push('$');

        // Every character is either a translated wildcard or escaped, so the
        // regex source is always valid.
        Self::Wildcard(Regex::new(&source).expect("translated wildcard pattern"))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Literal(literal) => {
                path == literal || path.starts_with(&format!("{literal}{MAIN_SEPARATOR}"))
            }
            Self::Wildcard(regex) => regex.is_match(path),
        }
    }
}

/// Compile a list of configuration strings.
pub fn compile_patterns(patterns: &[String]) -> Vec<PathPattern> {
    patterns.iter().map(|p| PathPattern::compile(p)).collect()
}

/// Logical OR over the pattern list; an empty list never matches.
pub fn matches_any(path: &str, patterns: &[PathPattern]) -> bool {
    patterns.iter().any(|p| p.matches(path))
}
