//! Output persistence.
//!
//! Writes the rendered document atomically (temp file + rename) and keeps
//! the repository's `.gitignore` aware of the generated artifacts so they
//! are not accidentally committed.

use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Writes a file atomically.
///
/// Content goes to a sibling temp file, is synced, and is renamed over the
/// target, so an interrupted run never leaves a half-written document.
///
/// # Errors
///
/// Returns an error if any step of the write fails.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;
    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Ensures the repository `.gitignore` carries the given entries.
///
/// Creates the file when missing; otherwise appends only the entries not
/// already present, leaving existing content untouched.
///
/// # Errors
///
/// Returns an error if the ignore file cannot be read or written.
pub(crate) fn update_vcs_ignore(root: &Path, entries: &[&str]) -> Result<()> {
    let gitignore_path = root.join(".gitignore");

    let content = match fs::read_to_string(&gitignore_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::io(&gitignore_path, e)),
    };

    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    let missing: Vec<&str> = entries
        .iter()
        .copied()
        .filter(|entry| !lines.contains(entry))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    info!("Updating .gitignore with generated files");

    let mut updated = content;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    for entry in missing {
        updated.push_str(entry);
        updated.push('\n');
    }

    fs::write(&gitignore_path, updated).map_err(|e| Error::io(&gitignore_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_write_atomic_creates_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("prompt.md");

        write_atomic(target.path(), "# Project Files\n").unwrap();

        target.assert("# Project Files\n");
        assert!(!temp.child("prompt.tmp").exists());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("prompt.md");
        target.write_str("old").unwrap();

        write_atomic(target.path(), "new").unwrap();

        target.assert("new");
    }

    #[test]
    fn test_gitignore_created_with_entries() {
        let temp = assert_fs::TempDir::new().unwrap();

        update_vcs_ignore(temp.path(), &["prompt.md", "todo"]).unwrap();

        let content = std::fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert!(content.lines().any(|l| l == "prompt.md"));
        assert!(content.lines().any(|l| l == "todo"));
    }

    #[test]
    fn test_gitignore_appends_only_missing() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(".gitignore").write_str("target/\nprompt.md\n").unwrap();

        update_vcs_ignore(temp.path(), &["prompt.md", "todo"]).unwrap();

        let content = std::fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert!(content.starts_with("target/\nprompt.md\n"));
        assert_eq!(content.matches("prompt.md").count(), 1);
        assert!(content.lines().any(|l| l == "todo"));
    }

    #[test]
    fn test_gitignore_untouched_when_complete() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(".gitignore").write_str("prompt.md\ntodo\n").unwrap();

        update_vcs_ignore(temp.path(), &["prompt.md", "todo"]).unwrap();

        let content = std::fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert_eq!(content, "prompt.md\ntodo\n");
    }
}
