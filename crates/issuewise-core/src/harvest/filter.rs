// SPDX-License-Identifier: Apache-2.0

//! File filtering policy for repository harvesting.
//!
//! The filter is a pure predicate over repository-relative paths. Allow rules
//! (bare filenames, extensions) are evaluated before exclusion rules
//! (path substrings, filename globs); a bare-name match bypasses the
//! extension requirement but not the exclusion checks.

use regex::Regex;
use tracing::debug;

/// Immutable file filtering configuration.
///
/// Glob patterns use shell-style semantics (`*` and `?`, plus `[...]`
/// character classes). A pattern that fails to translate is dropped at
/// construction and never matches.
#[derive(Debug, Clone)]
pub struct FileFilter {
    allowed_extensions: Vec<String>,
    allowed_files: Vec<String>,
    excluded_paths: Vec<String>,
    excluded_globs: Vec<Regex>,
}

impl FileFilter {
    /// Creates a filter from explicit allow/deny rules.
    #[must_use]
    pub fn new(
        allowed_extensions: Vec<String>,
        allowed_files: Vec<String>,
        excluded_paths: Vec<String>,
        excluded_globs: Vec<String>,
    ) -> Self {
        let excluded_globs = excluded_globs
            .iter()
            .filter_map(|pattern| {
                let compiled = compile_glob(pattern);
                if compiled.is_none() {
                    debug!(pattern = %pattern, "Dropping unparseable glob pattern");
                }
                compiled
            })
            .collect();

        Self {
            allowed_extensions,
            allowed_files,
            excluded_paths,
            excluded_globs,
        }
    }

    /// Decides whether a repository-relative path is worth harvesting.
    ///
    /// Pure and total: the same path always yields the same answer.
    #[must_use]
    pub fn accepts(&self, path: &str) -> bool {
        let base = path.rsplit('/').next().unwrap_or(path);

        let allowed_bare_name = self.allowed_files.iter().any(|name| name == base);
        let allowed_extension = self
            .allowed_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()));
        if !allowed_bare_name && !allowed_extension {
            return false;
        }

        if self
            .excluded_paths
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
        {
            return false;
        }

        !self.excluded_globs.iter().any(|glob| glob.is_match(base))
    }
}

impl Default for FileFilter {
    /// The stock filter: common source/doc/config extensions, well-known
    /// bare filenames, and exclusions for vendored trees and test files.
    fn default() -> Self {
        Self::new(
            [
                ".go", ".js", ".ts", ".py", ".java", ".rb", ".php", ".md", ".txt", ".yaml",
                ".yml", ".json", ".rs", ".sh",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            ["Dockerfile", "Makefile", "README"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            ["vendor/", "node_modules/", "dist/", "build/"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            ["*_test.go", "*.test.js", "*.spec.ts"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        )
    }
}

/// Translates a shell-style glob into an anchored regex.
///
/// `*` and `?` map to `.*` and `.`; `[` / `]` pass through so character
/// classes keep working. Everything else is escaped literally. Returns
/// `None` when the resulting expression does not compile (e.g. an
/// unterminated class), which makes the pattern non-matching.
fn compile_glob(pattern: &str) -> Option<Regex> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            '[' | ']' => expr.push(ch),
            _ => expr.push_str(&regex::escape(&ch.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_is_deterministic() {
        let filter = FileFilter::default();
        for path in ["src/main.rs", "vendor/pkg/foo.go", "Dockerfile", "a.out"] {
            assert_eq!(filter.accepts(path), filter.accepts(path));
        }
    }

    #[test]
    fn test_accepts_source_extension() {
        let filter = FileFilter::default();
        assert!(filter.accepts("src/main.rs"));
        assert!(filter.accepts("pkg/server/handler.go"));
        assert!(filter.accepts("docs/guide.md"));
    }

    #[test]
    fn test_accepts_bare_name_without_extension() {
        let filter = FileFilter::default();
        assert!(filter.accepts("Dockerfile"));
        assert!(filter.accepts("ops/Dockerfile"));
        assert!(filter.accepts("Makefile"));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let filter = FileFilter::default();
        assert!(!filter.accepts("binary.exe"));
        assert!(!filter.accepts("image.png"));
    }

    #[test]
    fn test_rejects_excluded_path_despite_extension() {
        let filter = FileFilter::default();
        assert!(!filter.accepts("vendor/pkg/foo.go"));
        assert!(!filter.accepts("web/node_modules/lib/index.js"));
    }

    #[test]
    fn test_bare_name_does_not_bypass_exclusions() {
        let filter = FileFilter::default();
        assert!(!filter.accepts("vendor/Dockerfile"));
    }

    #[test]
    fn test_rejects_excluded_glob() {
        let filter = FileFilter::default();
        assert!(!filter.accepts("pkg/server/handler_test.go"));
        assert!(!filter.accepts("web/app.test.js"));
        assert!(!filter.accepts("web/app.spec.ts"));
    }

    #[test]
    fn test_malformed_glob_never_matches() {
        let filter = FileFilter::new(
            vec![".go".to_string()],
            vec![],
            vec![],
            vec!["[unterminated.go".to_string()],
        );
        // The pattern is dropped, not an error; matching paths stay accepted.
        assert!(filter.accepts("pkg/[unterminated.go"));
        assert!(filter.accepts("pkg/other.go"));
    }

    #[test]
    fn test_glob_question_mark() {
        let filter = FileFilter::new(
            vec![".go".to_string()],
            vec![],
            vec![],
            vec!["v?.go".to_string()],
        );
        assert!(!filter.accepts("pkg/v1.go"));
        assert!(filter.accepts("pkg/v10.go"));
    }

    #[test]
    fn test_custom_configuration_is_honored() {
        let filter = FileFilter::new(
            vec![".toml".to_string()],
            vec!["LICENSE".to_string()],
            vec!["third_party/".to_string()],
            vec![],
        );
        assert!(filter.accepts("Cargo.toml"));
        assert!(filter.accepts("LICENSE"));
        assert!(!filter.accepts("src/main.rs"));
        assert!(!filter.accepts("third_party/dep/Cargo.toml"));
    }
}
