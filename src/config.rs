use crate::error::{Error, Result};
use crate::token::TokenizerKind;
use regex::Regex;
use std::path::PathBuf;

/// Configuration for a markdown generation run.
///
/// Use [`Options::builder()`] to construct a validated instance.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Options {
    /// Repository root to process
    pub dir: PathBuf,

    /// Where the generated document is persisted
    pub output_file_path: PathBuf,

    /// Additional file extensions to reject, on top of the defaults
    pub file_type_exclusions: Vec<String>,

    /// Additional glob rules appended to the default pattern exclusions
    pub file_exclusions: Vec<String>,

    /// Additional cleaning rules appended after the built-ins
    pub custom_patterns: Vec<(String, String)>,

    /// Additional secret patterns appended after the built-ins
    pub custom_secret_patterns: Vec<(String, String)>,

    /// Appendix text or preset name; falls back to the root `todo` file
    pub todo_prompt: Option<String>,

    /// Toggle per-file progress emission
    pub verbose: bool,

    /// Tokenizer used for document and chunk counts
    pub tokenizer: TokenizerKind,
}

impl Options {
    /// Creates a new options builder.
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory is missing or a
    /// caller-supplied pattern fails to compile. A bad custom pattern is the
    /// only fatal configuration error; everything else in a run degrades
    /// softly.
    pub fn validate(&self) -> Result<()> {
        if !self.dir.exists() {
            return Err(Error::config(format!(
                "Directory does not exist: {}",
                self.dir.display()
            )));
        }
        if !self.dir.is_dir() {
            return Err(Error::config(format!(
                "Path is not a directory: {}",
                self.dir.display()
            )));
        }

        for (pattern, _) in self
            .custom_patterns
            .iter()
            .chain(&self.custom_secret_patterns)
        {
            Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
        }

        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            output_file_path: PathBuf::from("prompt.md"),
            file_type_exclusions: Vec::new(),
            file_exclusions: Vec::new(),
            custom_patterns: Vec::new(),
            custom_secret_patterns: Vec::new(),
            todo_prompt: None,
            verbose: true,
            tokenizer: TokenizerKind::default(),
        }
    }
}

/// Builder for creating [`Options`].
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    dir: Option<PathBuf>,
    output_file_path: Option<PathBuf>,
    file_type_exclusions: Vec<String>,
    file_exclusions: Vec<String>,
    custom_patterns: Vec<(String, String)>,
    custom_secret_patterns: Vec<(String, String)>,
    todo_prompt: Option<String>,
    verbose: Option<bool>,
    tokenizer: Option<TokenizerKind>,
}

impl OptionsBuilder {
    /// Sets the repository root to process.
    #[must_use]
    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Sets the output path for the generated document.
    #[must_use]
    pub fn output_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file_path = Some(path.into());
        self
    }

    /// Adds file extensions to reject beyond the defaults.
    #[must_use]
    pub fn file_type_exclusions(mut self, extensions: Vec<String>) -> Self {
        self.file_type_exclusions = extensions;
        self
    }

    /// Adds glob rules appended to the default pattern exclusions.
    #[must_use]
    pub fn file_exclusions(mut self, patterns: Vec<String>) -> Self {
        self.file_exclusions = patterns;
        self
    }

    /// Adds `(pattern, replacement)` cleaning rules applied after the
    /// built-ins, in the order given.
    #[must_use]
    pub fn custom_patterns(mut self, patterns: Vec<(String, String)>) -> Self {
        self.custom_patterns = patterns;
        self
    }

    /// Adds `(pattern, replacement)` secret rules applied after the
    /// built-ins, in the order given.
    #[must_use]
    pub fn custom_secret_patterns(mut self, patterns: Vec<(String, String)>) -> Self {
        self.custom_secret_patterns = patterns;
        self
    }

    /// Sets the appendix text or preset name, overriding the `todo` file.
    #[must_use]
    pub fn todo_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.todo_prompt = Some(prompt.into());
        self
    }

    /// Enables or disables progress emission.
    #[must_use]
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = Some(enabled);
        self
    }

    /// Sets the tokenizer implementation.
    #[must_use]
    pub fn tokenizer(mut self, kind: TokenizerKind) -> Self {
        self.tokenizer = Some(kind);
        self
    }

    /// Builds the options.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Options> {
        let options = Options {
            dir: self.dir.unwrap_or_else(|| PathBuf::from(".")),
            output_file_path: self
                .output_file_path
                .unwrap_or_else(|| PathBuf::from("prompt.md")),
            file_type_exclusions: self.file_type_exclusions,
            file_exclusions: self.file_exclusions,
            custom_patterns: self.custom_patterns,
            custom_secret_patterns: self.custom_secret_patterns,
            todo_prompt: self.todo_prompt,
            verbose: self.verbose.unwrap_or(true),
            tokenizer: self.tokenizer.unwrap_or_default(),
        };

        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.dir, PathBuf::from("."));
        assert_eq!(options.output_file_path, PathBuf::from("prompt.md"));
        assert!(options.verbose);
    }

    #[test]
    fn test_builder_defaults_validate() {
        let temp = assert_fs::TempDir::new().unwrap();
        let options = Options::builder().dir(temp.path()).build().unwrap();
        assert_eq!(options.dir, temp.path());
        assert!(options.todo_prompt.is_none());
    }

    #[test]
    fn test_missing_dir_rejected() {
        let result = Options::builder()
            .dir("/nonexistent/path/that/should/not/exist")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_custom_pattern_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = Options::builder()
            .dir(temp.path())
            .custom_patterns(vec![("[broken".to_string(), String::new())])
            .build();
        assert!(result.unwrap_err().is_pattern());
    }

    #[test]
    fn test_invalid_custom_secret_pattern_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = Options::builder()
            .dir(temp.path())
            .custom_secret_patterns(vec![("(".to_string(), String::new())])
            .build();
        assert!(result.unwrap_err().is_pattern());
    }

    #[test]
    fn test_quiet_mode() {
        let temp = assert_fs::TempDir::new().unwrap();
        let options = Options::builder()
            .dir(temp.path())
            .verbose(false)
            .build()
            .unwrap();
        assert!(!options.verbose);
    }
}
