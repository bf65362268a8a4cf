//! Version-control collaborator.
//!
//! One operation: list the tracked files under a directory, repository
//! relative with forward-slash separators. A missing `git` binary or a
//! non-repository directory is a soft failure that yields an empty list;
//! tracked-only semantics already exclude untracked, ignored, and deleted
//! paths.

use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Lists tracked paths under `root`, sorted lexicographically.
///
/// Never fails: environment problems are logged and produce an empty list,
/// so the run completes with an empty document.
#[must_use]
pub(crate) fn list_tracked_files(root: &Path) -> Vec<String> {
    let output = match Command::new("git")
        .arg("ls-files")
        .current_dir(root)
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            warn!("Failed to execute git ls-files: {}", e);
            return Vec::new();
        }
    };

    if !output.status.success() {
        warn!(
            "git ls-files failed in {} (status {})",
            root.display(),
            output.status
        );
        return Vec::new();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut files: Vec<String> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    // Sorted for deterministic section ordering
    files.sort();

    debug!("git reported {} tracked files", files.len());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn git(root: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(root)
            .env("GIT_AUTHOR_NAME", "test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com")
            .status()
            .expect("git available in test environment");
        assert!(status.success(), "git {:?} failed", args);
    }

    #[test]
    fn test_non_repository_yields_empty() {
        let temp = assert_fs::TempDir::new().unwrap();
        let files = list_tracked_files(temp.path());
        assert!(files.is_empty());
    }

    #[test]
    fn test_tracked_files_sorted() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b.rs").write_str("fn b() {}").unwrap();
        temp.child("a.rs").write_str("fn a() {}").unwrap();
        temp.child("untracked.rs").write_str("fn u() {}").unwrap();

        git(temp.path(), &["init", "-q"]);
        git(temp.path(), &["add", "a.rs", "b.rs"]);

        let files = list_tracked_files(temp.path());
        assert_eq!(files, vec!["a.rs".to_string(), "b.rs".to_string()]);
    }
}
