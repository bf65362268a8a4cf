//! # toak
//!
//! Tokenize a git repository into a single LLM-ready markdown document.
//!
//! ## Features
//!
//! - Tracked-files enumeration via git, with layered exclusions and
//!   hierarchical `.toak-ignore` files
//! - Mechanical code cleaning (comments, console noise, imports)
//! - Secret redaction with sentinel tokens and secret-only line removal
//! - BPE token counting and token-bounded chunking for downstream consumers
//!
//! ## Quick Start
//!
//! ```no_run
//! use toak::{Options, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = Options::builder()
//!     .dir("./my-project")
//!     .output_file_path("./prompt.md")
//!     .build()?;
//!
//! let result = Pipeline::new(options)?.create_markdown_document();
//! assert!(result.success);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is a linear content pipeline:
//! 1. **Enumerator**: lists tracked paths from the version-control
//!    collaborator
//! 2. **Exclusion resolver**: composes default exclusions with hierarchical
//!    ignore files into an admit predicate
//! 3. **Cleaner / Redactor**: mechanical text transforms and secret removal
//! 4. **Assembler**: renders one fenced markdown section per admitted file
//! 5. **Chunker**: splits the output into token-bounded chunks

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic
)]
#![allow(clippy::module_name_repetitions)]

mod assembler;
mod chunker;
mod cleaner;
mod config;
mod error;
mod exclude;
mod glob;
mod ignore;
mod pipeline;
mod reader;
mod redactor;
mod token;
mod vcs;
mod writer;

pub mod preset;

pub use assembler::{Document, Section, DOCUMENT_HEADING, FENCE};
pub use chunker::{split_by_tokens, ChunkMeta, FileChunk};
pub use cleaner::Cleaner;
pub use config::{Options, OptionsBuilder};
pub use error::{Error, Result};
pub use exclude::{ExclusionSet, DEFAULT_FILE_EXCLUSIONS, DEFAULT_FILE_TYPE_EXCLUSIONS};
pub use glob::{GlobOptions, GlobPattern};
pub use ignore::{IgnoreTree, RuleList, IGNORE_FILE_NAME, ROOT_IGNORE_DEFAULTS};
pub use pipeline::{CancelToken, DocumentResult, Pipeline};
pub use reader::FileRecord;
pub use redactor::{
    strip_sentinel_lines, Redactor, REDACTED, REDACTED_BASE64, REDACTED_HASH, REDACTED_JWT,
};
pub use token::{TokenEstimator, TokenizerKind};

/// Runs the complete pipeline with the given options.
///
/// This is the main entry point for the library: it builds the document,
/// persists it, and returns the result object. Failures during the run are
/// reported in the result rather than raised.
///
/// # Errors
///
/// Returns an error only when the pipeline cannot be constructed: invalid
/// options or an uncompilable caller-supplied pattern.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// let options = toak::Options::builder().dir(".").build()?;
/// let result = toak::run(options)?;
/// println!("{:?}", result.token_count);
/// # Ok(())
/// # }
/// ```
pub fn run(options: Options) -> Result<DocumentResult> {
    let pipeline = Pipeline::new(options)?;
    Ok(pipeline.create_markdown_document())
}
