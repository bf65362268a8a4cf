//! File loading with lossy UTF-8 decoding.

use crate::error::{Error, Result};
use std::path::Path;

/// A file flowing through the pipeline, owned by the stage processing it.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Root-relative, forward-slash path
    pub path: String,
    /// Text after the stage that produced this record
    pub body: String,
}

impl FileRecord {
    /// Creates a record for a path/body pair.
    #[must_use]
    pub fn new(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
        }
    }

    /// Returns true when the body holds no visible content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// Reads a file's bytes and decodes them as UTF-8.
///
/// Invalid sequences are repaired with replacement characters rather than
/// raised as errors; only the read itself can fail, and the caller treats
/// that as a soft per-file error.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub(crate) fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
