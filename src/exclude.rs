//! Layered path exclusion.
//!
//! The admit predicate composes four layers, evaluated in order: the
//! extension blocklist, the default/global glob set, the hierarchical
//! ignore-file tree, and the root ignore override. A rejection by the first
//! two layers is final; only an ignore-file negation can re-admit something
//! an ignore-file rule excluded.

use crate::config::Options;
use crate::error::Result;
use crate::ignore::{IgnoreTree, RuleList, IGNORE_FILE_NAME, ROOT_IGNORE_DEFAULTS};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Default file type exclusions (by extension).
pub const DEFAULT_FILE_TYPE_EXCLUSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".tiff", ".pdf", ".svg", ".ico", ".ttf",
    ".woff", ".woff2", ".eot", ".otf", ".lock", ".lockb", ".exe", ".dll", ".so", ".dylib", ".bin",
    ".dat", ".pyc", ".pyo", ".class", ".jar", ".zip", ".tar", ".gz", ".rar", ".7z", ".mp3", ".mp4",
    ".avi", ".mov", ".wav", ".db", ".sqlite", ".sqlite3",
];

/// Default file pattern exclusions.
pub const DEFAULT_FILE_EXCLUSIONS: &[&str] = &[
    "**/.*rc",
    "**/.*rc.{js,json,yaml,yml}",
    "**/*.config.{js,ts}",
    "**/tsconfig.json",
    "**/tsconfig*.json",
    "**/jsconfig.json",
    "**/jsconfig*.json",
    "**/package-lock.json",
    "**/.prettierignore",
    "**/.dockerignore",
    "**/.env*",
    "**/*.vars",
    "**/secrets.*",
    "**/.git*",
    "**/.hg*",
    "**/.svn*",
    "**/CVS",
    "**/.github/",
    "**/.gitlab-ci.yml",
    "**/azure-pipelines.yml",
    "**/jenkins*",
    "**/node_modules/",
    "**/target/",
    "**/__pycache__/",
    "**/venv/",
    "**/.venv/",
    "**/env/",
    "**/build/",
    "**/dist/",
    "**/out/",
    "**/bin/",
    "**/obj/",
    "**/README*",
    "**/CHANGELOG*",
    "**/CONTRIBUTING*",
    "**/LICENSE*",
    "**/docs/",
    "**/documentation/",
    "**/.idea/",
    "**/.vscode/",
    "**/.eclipse/",
    "**/.settings/",
    "**/.zed/",
    "**/.cursor/",
    "**/.project",
    "**/.classpath",
    "**/.factorypath",
    "**/test{s,}/",
    "**/spec/",
    "**/fixtures/",
    "**/testdata/",
    "**/__tests__/",
    "**/*.{test,spec}.*",
    "**/coverage/",
    "**/jest.config.*",
    "**/logs/",
    "**/tmp/",
    "**/temp/",
    "**/*.log",
];

/// The compiled admit predicate for one run.
///
/// Extension and pattern sets are built once; ignore layers load lazily as
/// paths descend into their directories. Shared immutably across workers.
#[derive(Debug)]
pub struct ExclusionSet {
    extensions: HashSet<String>,
    patterns: RuleList,
    ignores: IgnoreTree,
}

impl ExclusionSet {
    /// Builds the predicate from defaults plus caller options, ensuring the
    /// root ignore file exists with its minimum line set (the resolver's
    /// only mutation).
    ///
    /// # Errors
    ///
    /// Returns an error if the root ignore file cannot be created or
    /// updated.
    pub fn build(root: &Path, options: &Options) -> Result<Self> {
        ensure_root_ignore(root, options.verbose)?;

        let mut extensions: HashSet<String> = DEFAULT_FILE_TYPE_EXCLUSIONS
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        for ext in &options.file_type_exclusions {
            extensions.insert(normalize_extension(ext));
        }

        let patterns = RuleList::from_patterns(
            DEFAULT_FILE_EXCLUSIONS
                .iter()
                .copied()
                .chain(options.file_exclusions.iter().map(String::as_str)),
        );

        debug!(
            "Exclusion set ready: {} extensions, {} patterns",
            extensions.len(),
            patterns.len()
        );

        Ok(Self {
            extensions,
            patterns,
            ignores: IgnoreTree::new(root),
        })
    }

    /// Decides whether a path survives the exclusion pipeline.
    ///
    /// Layer order is load-bearing: an extension or pattern rejection is
    /// final and no ignore-file rule can undo it.
    #[must_use]
    pub fn admit(&self, path: &str) -> bool {
        if self.extensions.contains(&final_extension(path)) {
            return false;
        }
        if self.patterns.verdict(path) == Some(true) {
            return false;
        }
        if self.ignores.verdict(path) == Some(true) {
            return false;
        }
        true
    }
}

/// Extracts the path's final extension, lowercased and dot-prefixed.
/// Paths without an extension yield an empty string.
fn final_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Normalizes a caller-supplied extension token to `.lower` form.
fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// Ensures the root ignore file exists and carries the minimum line set.
///
/// Missing file: created with the defaults. Existing file: missing lines are
/// appended, everything else is left untouched.
fn ensure_root_ignore(root: &Path, verbose: bool) -> Result<()> {
    let ignore_path = root.join(IGNORE_FILE_NAME);

    match std::fs::read_to_string(&ignore_path) {
        Ok(content) => {
            let lines: Vec<&str> = content.lines().map(str::trim).collect();
            let missing: Vec<&str> = ROOT_IGNORE_DEFAULTS
                .iter()
                .copied()
                .filter(|required| !lines.contains(required))
                .collect();
            if missing.is_empty() {
                return Ok(());
            }

            let mut updated = content;
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            for line in missing {
                updated.push_str(line);
                updated.push('\n');
            }
            std::fs::write(&ignore_path, updated)
                .map_err(|e| crate::error::Error::io(&ignore_path, e))?;
            info!("Updated {} with required entries", ignore_path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if verbose {
                println!("File not found, creating a root '{IGNORE_FILE_NAME}' file.");
            }
            let mut content = String::new();
            for line in ROOT_IGNORE_DEFAULTS {
                content.push_str(line);
                content.push('\n');
            }
            std::fs::write(&ignore_path, content)
                .map_err(|e| crate::error::Error::io(&ignore_path, e))?;
            Ok(())
        }
        Err(e) => Err(crate::error::Error::io(&ignore_path, e)),
    }
}
