//! Hierarchical ignore file resolution.
//!
//! Each directory may carry a `.toak-ignore` file whose rules apply to the
//! subtree rooted at that directory. Rules are line-oriented globs; a leading
//! `!` re-admits, blank lines and `#` comments are skipped, and within a list
//! the last matching rule wins. Layers are loaded lazily the first time a
//! path descends into their directory and are cached for the rest of the run.

use crate::glob::GlobPattern;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Name of the per-directory ignore file.
pub const IGNORE_FILE_NAME: &str = ".toak-ignore";

/// Lines the root ignore file must always carry.
pub const ROOT_IGNORE_DEFAULTS: &[&str] = &["todo", "prompt.md"];

/// One parsed ignore rule.
#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: GlobPattern,
    negated: bool,
}

/// An ordered list of ignore rules sharing one scope.
#[derive(Debug, Clone, Default)]
pub struct RuleList {
    rules: Vec<IgnoreRule>,
}

impl RuleList {
    /// Parses rules from ignore-file text.
    ///
    /// Blank lines and `#` comments are skipped. Rules that fail to compile
    /// are dropped with a warning; a malformed line in an ignore file never
    /// aborts the run.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut rules = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (negated, pattern_text) = match line.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, line),
            };
            match GlobPattern::compile(pattern_text) {
                Ok(pattern) => rules.push(IgnoreRule { pattern, negated }),
                Err(e) => warn!("Skipping unparsable ignore rule '{}': {}", line, e),
            }
        }
        Self { rules }
    }

    /// Builds a rule list from raw pattern strings (no comment handling).
    ///
    /// Used for the default exclusion table and caller-supplied pattern
    /// lists, which share the same last-match-wins semantics as ignore
    /// files.
    #[must_use]
    pub fn from_patterns<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        let mut rules = Vec::new();
        for raw in patterns {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let (negated, pattern_text) = match raw.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, raw),
            };
            match GlobPattern::compile(pattern_text) {
                Ok(pattern) => rules.push(IgnoreRule { pattern, negated }),
                Err(e) => warn!("Skipping unparsable exclusion pattern '{}': {}", raw, e),
            }
        }
        Self { rules }
    }

    /// Returns the number of rules in this list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when the list holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluates the list against a path.
    ///
    /// `Some(true)` means excluded, `Some(false)` means explicitly
    /// re-admitted, `None` means no rule matched. The last matching rule's
    /// polarity wins.
    #[must_use]
    pub fn verdict(&self, path: &str) -> Option<bool> {
        let mut verdict = None;
        for rule in &self.rules {
            if rule.pattern.matches(path) {
                verdict = Some(!rule.negated);
            }
        }
        verdict
    }
}

/// The lazily-loaded tree of ignore layers under a repository root.
///
/// Layers are keyed by root-relative directory (`""` for the root itself)
/// and loaded at most once; a directory without an ignore file caches as
/// absent so repeat lookups stay cheap.
#[derive(Debug)]
pub struct IgnoreTree {
    root: PathBuf,
    layers: Mutex<HashMap<String, Option<Arc<RuleList>>>>,
}

impl IgnoreTree {
    /// Creates an empty tree for the given repository root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layers: Mutex::new(HashMap::new()),
        }
    }

    /// Evaluates every layer on the path's ancestor chain, root first.
    ///
    /// Rules in deeper directories override shallower ones, so the deepest
    /// layer with an opinion decides. Paths are matched relative to the
    /// layer's own directory.
    #[must_use]
    pub fn verdict(&self, path: &str) -> Option<bool> {
        let mut verdict = None;
        for scope in ancestor_scopes(path) {
            let relative = if scope.is_empty() {
                path
            } else {
                &path[scope.len() + 1..]
            };
            if let Some(layer) = self.layer(scope) {
                if let Some(v) = layer.verdict(relative) {
                    verdict = Some(v);
                }
            }
        }
        verdict
    }

    /// Returns the layer for a root-relative directory, loading it on first
    /// use. Concurrent loads of the same directory are idempotent.
    fn layer(&self, scope: &str) -> Option<Arc<RuleList>> {
        let mut layers = self.layers.lock().unwrap_or_else(|e| e.into_inner());
        layers
            .entry(scope.to_string())
            .or_insert_with(|| self.load(scope))
            .clone()
    }

    fn load(&self, scope: &str) -> Option<Arc<RuleList>> {
        let file = self.root.join(scope).join(IGNORE_FILE_NAME);
        match std::fs::read_to_string(&file) {
            Ok(content) => {
                let list = RuleList::parse(&content);
                debug!(
                    "Loaded {} ignore rules from {}",
                    list.len(),
                    file.display()
                );
                Some(Arc::new(list))
            }
            Err(_) => None,
        }
    }
}

/// Yields the root-relative directories on a path's ancestor chain, root
/// first: `a/b/c.txt` yields `""`, `"a"`, `"a/b"`.
fn ancestor_scopes(path: &str) -> impl Iterator<Item = &str> {
    std::iter::once("").chain(
        path.match_indices('/')
            .map(move |(idx, _)| &path[..idx]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let list = RuleList::parse("# comment\n\n*.log\n  \n!keep.log\n");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_last_match_wins() {
        let list = RuleList::parse("*.log\n!keep.log\n");
        assert_eq!(list.verdict("a.log"), Some(true));
        assert_eq!(list.verdict("keep.log"), Some(false));
        assert_eq!(list.verdict("main.rs"), None);
    }

    #[test]
    fn test_last_match_wins_reordered() {
        let list = RuleList::parse("!keep.log\n*.log\n");
        // re-admission before the exclusion loses to it
        assert_eq!(list.verdict("keep.log"), Some(true));
    }

    #[test]
    fn test_basename_rule_skips_nested_paths() {
        let list = RuleList::parse("*.log\n!keep.log\n");
        assert_eq!(list.verdict("sub/a.log"), None);
    }

    #[test]
    fn test_directory_rule() {
        let list = RuleList::parse("build/\n");
        assert_eq!(list.verdict("build"), Some(true));
        assert_eq!(list.verdict("build/out.o"), Some(true));
        assert_eq!(list.verdict("builder/x"), None);
    }

    #[test]
    fn test_tree_root_layer() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(IGNORE_FILE_NAME)
            .write_str("*.log\n!keep.log\n")
            .unwrap();

        let tree = IgnoreTree::new(temp.path());
        assert_eq!(tree.verdict("a.log"), Some(true));
        assert_eq!(tree.verdict("keep.log"), Some(false));
        assert_eq!(tree.verdict("sub/a.log"), None);
        assert_eq!(tree.verdict("main.rs"), None);
    }

    #[test]
    fn test_deeper_layer_overrides_shallower() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(IGNORE_FILE_NAME).write_str("secret.txt\n").unwrap();
        temp.child("sub")
            .child(IGNORE_FILE_NAME)
            .write_str("!secret.txt\n")
            .unwrap();

        let tree = IgnoreTree::new(temp.path());
        // root layer uses a basename rule, so it has no opinion on the
        // nested path; the deeper layer re-admits its own copy
        assert_eq!(tree.verdict("sub/secret.txt"), Some(false));
    }

    #[test]
    fn test_nested_layer_scoped_to_subtree() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("sub")
            .child(IGNORE_FILE_NAME)
            .write_str("*.tmp\n")
            .unwrap();

        let tree = IgnoreTree::new(temp.path());
        assert_eq!(tree.verdict("sub/a.tmp"), Some(true));
        // the rule does not leak above its scope
        assert_eq!(tree.verdict("a.tmp"), None);
    }

    #[test]
    fn test_deep_rule_overrides_root_glob() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(IGNORE_FILE_NAME)
            .write_str("**/*.gen.rs\n")
            .unwrap();
        temp.child("proto")
            .child(IGNORE_FILE_NAME)
            .write_str("!api.gen.rs\n")
            .unwrap();

        let tree = IgnoreTree::new(temp.path());
        assert_eq!(tree.verdict("proto/api.gen.rs"), Some(false));
        assert_eq!(tree.verdict("proto/other.gen.rs"), Some(true));
        assert_eq!(tree.verdict("src/other.gen.rs"), Some(true));
    }

    #[test]
    fn test_missing_ignore_files_are_no_opinion() {
        let temp = assert_fs::TempDir::new().unwrap();
        let tree = IgnoreTree::new(temp.path());
        assert_eq!(tree.verdict("anything.rs"), None);
    }

    #[test]
    fn test_ancestor_scopes() {
        let scopes: Vec<&str> = ancestor_scopes("a/b/c.txt").collect();
        assert_eq!(scopes, vec!["", "a", "a/b"]);

        let scopes: Vec<&str> = ancestor_scopes("top.txt").collect();
        assert_eq!(scopes, vec![""]);
    }

    #[test]
    fn test_unparsable_rule_skipped() {
        // a bare `!` compiles to an empty pattern, which is rejected
        let list = RuleList::parse("!\ngood.txt\n");
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());
    }

    #[test]
    fn test_from_patterns_supports_negation() {
        let list = RuleList::from_patterns(["**/*.md", "!**/KEEP.md"]);
        assert_eq!(list.verdict("docs/a.md"), Some(true));
        assert_eq!(list.verdict("docs/KEEP.md"), Some(false));
    }
}
