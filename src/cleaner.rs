//! Mechanical source cleaning.
//!
//! An ordered list of regex transforms strips comments, trivial console
//! statements, import lines, and excess whitespace. The pass is purely
//! textual and language-agnostic; occasional false positives (a `//` inside
//! a string literal, say) are accepted in exchange for never parsing.
//! Ordering is the contract: later rules must not re-match what earlier
//! rules produced, which keeps the whole pass idempotent.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Built-in transforms, applied in order.
static BUILTIN_TRANSFORMS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // Single-line comments
        (r"(?m)//[^\n]*", ""),
        // Multi-line comments, non-greedy across lines
        (r"(?s)/\*.*?\*/", ""),
        // Trivial console statements
        (r"console\.(?:log|error|warn|info)\([^)]*\);?", ""),
        // Whole-line import statements
        (r"(?m)^[ \t]*import\s+.*$", ""),
        // Trailing spaces
        (r"(?m)[ \t]+$", ""),
        // Runs of blank lines collapse to a single newline
        (r"\n{2,}", "\n"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("built-in cleaning pattern compiles"),
            replacement,
        )
    })
    .collect()
});

/// Ordered regex cleaner.
#[derive(Debug, Clone)]
pub struct Cleaner {
    transforms: Vec<(Regex, String)>,
}

impl Cleaner {
    /// Creates a cleaner from the built-in transforms plus caller-supplied
    /// `(pattern, replacement)` rules appended in the order given.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending rule if a caller-supplied
    /// pattern fails to compile; this aborts the run.
    pub fn new(custom: &[(String, String)]) -> Result<Self> {
        let mut transforms: Vec<(Regex, String)> = BUILTIN_TRANSFORMS
            .iter()
            .map(|(re, repl)| (re.clone(), (*repl).to_string()))
            .collect();

        for (pattern, replacement) in custom {
            let re = Regex::new(pattern)
                .map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
            transforms.push((re, replacement.clone()));
        }

        Ok(Self { transforms })
    }

    /// Applies every transform in order and trims the result.
    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        let mut result = text.replace("\r\n", "\n");
        for (re, replacement) in &self.transforms {
            result = re.replace_all(&result, replacement.as_str()).into_owned();
        }
        result.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> Cleaner {
        Cleaner::new(&[]).unwrap()
    }

    #[test]
    fn test_removes_single_line_comments() {
        let code = "let x = 1; // counter\nlet y = 2;";
        let cleaned = cleaner().clean(code);
        assert!(!cleaned.contains("counter"));
        assert!(cleaned.contains("let x = 1;"));
        assert!(cleaned.contains("let y = 2;"));
    }

    #[test]
    fn test_removes_multi_line_comments() {
        let code = "before\n/* one\ntwo\nthree */\nafter";
        let cleaned = cleaner().clean(code);
        assert!(!cleaned.contains("two"));
        assert_eq!(cleaned, "before\nafter");
    }

    #[test]
    fn test_multi_line_comment_non_greedy() {
        let code = "/* a */ keep /* b */";
        let cleaned = cleaner().clean(code);
        assert_eq!(cleaned, "keep");
    }

    #[test]
    fn test_removes_console_statements() {
        let code = "const a = 1;\nconsole.log(\"debug\", a);\nconst b = 2;";
        let cleaned = cleaner().clean(code);
        assert!(!cleaned.contains("console.log"));
        assert!(cleaned.contains("const a = 1;"));
        assert!(cleaned.contains("const b = 2;"));
    }

    #[test]
    fn test_removes_console_without_semicolon() {
        let cleaned = cleaner().clean("console.warn(x)\nrest");
        assert!(!cleaned.contains("console.warn"));
        assert!(cleaned.contains("rest"));
    }

    #[test]
    fn test_removes_import_lines() {
        let code = "import { a } from './a';\nconst x = 1;\n  import b from 'b'\nconst y = 2;";
        let cleaned = cleaner().clean(code);
        assert!(!cleaned.contains("import"));
        assert!(cleaned.contains("const x = 1;"));
        assert!(cleaned.contains("const y = 2;"));
    }

    #[test]
    fn test_import_mid_line_untouched() {
        let code = "const importance = 5;";
        assert_eq!(cleaner().clean(code), code);
    }

    #[test]
    fn test_strips_trailing_spaces() {
        let cleaned = cleaner().clean("let x = 1;   \nlet y = 2;\t");
        assert_eq!(cleaned, "let x = 1;\nlet y = 2;");
    }

    #[test]
    fn test_collapses_blank_runs() {
        let cleaned = cleaner().clean("a\n\n\n\nb\n\nc");
        assert_eq!(cleaned, "a\nb\nc");
    }

    #[test]
    fn test_crlf_normalized() {
        let cleaned = cleaner().clean("a\r\n\r\nb\r\n");
        assert_eq!(cleaned, "a\nb");
    }

    #[test]
    fn test_idempotent() {
        let code = "import x from 'x';\n// note\nlet a = 1;  \n\n\nconsole.log(a);\n/* block */\nlet b = 2;";
        let once = cleaner().clean(code);
        let twice = cleaner().clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_pattern_applied_after_builtins() {
        let cleaner = Cleaner::new(&[(r"(?m)^\s*#pragma.*$".to_string(), String::new())]).unwrap();
        let cleaned = cleaner.clean("#pragma once\nint x;\n");
        assert_eq!(cleaned, "int x;");
    }

    #[test]
    fn test_custom_pattern_compile_failure_is_fatal() {
        let result = Cleaner::new(&[("[unclosed".to_string(), String::new())]);
        let err = result.unwrap_err();
        assert!(err.is_pattern());
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(cleaner().clean("   \n\n  "), "");
    }
}
