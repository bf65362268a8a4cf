use crate::{
    assembler::{Document, Section},
    chunker::{self, FileChunk},
    cleaner::Cleaner,
    config::Options,
    error::{Error, Result},
    exclude::ExclusionSet,
    preset, reader,
    redactor::Redactor,
    token::TokenEstimator,
    vcs, writer,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Result object returned across the pipeline boundary.
///
/// The pipeline reports failures here instead of propagating errors to the
/// caller; only construction ([`Pipeline::new`]) can fail hard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResult {
    /// Whether the run completed and the document was written
    pub success: bool,
    /// Token count of the written document
    pub token_count: Option<usize>,
    /// Failure description when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Cooperative cancellation handle.
///
/// Cancellation is observed between files; in-flight file work is abandoned
/// at the next stage boundary and no partial document is written.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Main pipeline orchestrator: repository in, markdown document out.
pub struct Pipeline {
    options: Options,
    cleaner: Cleaner,
    redactor: Redactor,
    tokenizer: Arc<dyn TokenEstimator>,
    cancel: CancelToken,
}

impl Pipeline {
    /// Creates a pipeline, validating options and compiling all pattern
    /// sets once.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or a caller-supplied pattern
    /// does not compile.
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;

        let cleaner = Cleaner::new(&options.custom_patterns)?;
        let redactor = Redactor::new(&options.custom_secret_patterns)?;
        let tokenizer = options.tokenizer.create();

        Ok(Self {
            options,
            cleaner,
            redactor,
            tokenizer,
            cancel: CancelToken::new(),
        })
    }

    /// Returns a handle the caller can use to cancel the run.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs the full pipeline and persists the document.
    ///
    /// Failures are folded into the returned result object rather than
    /// raised.
    #[instrument(skip(self), fields(dir = %self.options.dir.display()))]
    pub fn create_markdown_document(&self) -> DocumentResult {
        match self.execute() {
            Ok(token_count) => DocumentResult {
                success: true,
                token_count: Some(token_count),
                error: None,
            },
            Err(e) => {
                warn!("Run failed: {}", e);
                DocumentResult {
                    success: false,
                    token_count: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Builds the in-memory document without writing anything besides the
    /// root ignore bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns an error on cancellation or if the root ignore file cannot
    /// be maintained.
    pub fn build_document(&self) -> Result<Document> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let exclusions = ExclusionSet::build(&self.options.dir, &self.options)?;

        let tracked = vcs::list_tracked_files(&self.options.dir);
        if self.options.verbose {
            println!("Total tracked files: {}", tracked.len());
        }

        let admitted: Vec<&str> = tracked
            .iter()
            .map(String::as_str)
            .filter(|path| exclusions.admit(path))
            .collect();
        if self.options.verbose {
            println!("Excluded files: {}", tracked.len() - admitted.len());
            println!("Files to process after exclusions: {}", admitted.len());
        }

        // Workers own one file end-to-end; ordered collection restores
        // enumeration order regardless of scheduling.
        let sections: Vec<Option<Section>> = admitted
            .par_iter()
            .map(|path| self.process_file(path))
            .collect();

        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let sections: Vec<Section> = sections.into_iter().flatten().collect();
        let appendix = self.resolve_appendix()?;

        Ok(Document::new(sections, Some(appendix)))
    }

    /// Splits the assembled document into token-bounded chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if document assembly fails.
    pub fn split_by_tokens(&self, max_tokens: usize) -> Result<Vec<FileChunk>> {
        let document = self.build_document()?;
        Ok(chunker::split_by_tokens(
            &document.sections,
            max_tokens,
            self.tokenizer.as_ref(),
        ))
    }

    fn execute(&self) -> Result<usize> {
        let start = Instant::now();

        let document = self.build_document()?;
        let markdown = document.render();
        let token_count = self.tokenizer.count(&markdown);

        let output_name = self
            .options
            .output_file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "prompt.md".to_string());
        writer::update_vcs_ignore(&self.options.dir, &[output_name.as_str(), "todo"])?;
        writer::write_atomic(&self.options.output_file_path, &markdown)?;

        if self.options.verbose {
            println!(
                "Markdown document created at {}",
                self.options.output_file_path.display()
            );
            println!(
                "{}",
                serde_json::json!({ "total_tokens": token_count })
            );
        }

        info!(
            "Generated {} sections, {} tokens in {:.2}s",
            document.sections.len(),
            token_count,
            start.elapsed().as_secs_f64()
        );

        Ok(token_count)
    }

    /// Reads, cleans, and redacts one file. Returns `None` for files that
    /// cannot be read or end up empty; both are soft.
    fn process_file(&self, path: &str) -> Option<Section> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let absolute = self.options.dir.join(path);
        let record = match reader::read_lossy(&absolute) {
            Ok(raw) => reader::FileRecord::new(path, raw),
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path, e);
                if self.options.verbose {
                    eprintln!("Error reading file {path}: {e}");
                }
                return None;
            }
        };
        if record.is_blank() {
            return None;
        }

        let cleaned = self.cleaner.clean(&record.body);
        let redacted = self.redactor.redact_and_filter(&cleaned);

        let section = Section::new(record.path, &redacted);
        if self.options.verbose {
            match &section {
                Some(section) => {
                    println!("{path}: Tokens[{}]", self.tokenizer.count(&section.body));
                }
                None => println!("Skipping {path} as it has no content after cleaning."),
            }
        }
        section
    }

    /// Resolves the appendix: explicit prompt option first, then the root
    /// `todo` file, created empty when absent.
    fn resolve_appendix(&self) -> Result<String> {
        if let Some(prompt) = &self.options.todo_prompt {
            return Ok(preset::resolve_prompt(prompt));
        }
        read_todo(&self.options.dir, self.options.verbose)
    }
}

fn read_todo(dir: &Path, verbose: bool) -> Result<String> {
    let todo_path = dir.join("todo");
    match std::fs::read_to_string(&todo_path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if verbose {
                println!("File not found, creating a new 'todo' file.");
            }
            std::fs::write(&todo_path, "").map_err(|e| Error::io(&todo_path, e))?;
            Ok(String::new())
        }
        Err(e) => Err(Error::io(&todo_path, e)),
    }
}
