//! Token-bounded chunking.
//!
//! Splits each file's rendered section into chunks whose full content,
//! framing included, tokenizes within a budget. Packing is greedy over line
//! boundaries and re-measures the whole buffer each step: BPE counts are
//! only sub-additive up to merges at seams, so summing per-line counts would
//! drift.

use crate::assembler::Section;
use crate::token::TokenEstimator;
use tracing::{debug, warn};

/// Metadata attached to every chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMeta {
    /// Measured token count of the chunk's full content
    pub tokens: usize,
    /// 0-based ordinal within the chunk's file
    pub chunk_index: usize,
    /// Total chunks emitted for the file
    pub chunk_count: usize,
}

/// A bounded slice of one file's rendered section.
#[derive(Debug, Clone)]
pub struct FileChunk {
    /// Root-relative path of the source file
    pub file_name: String,
    /// Markdown fragment: heading, fences, and body slice
    pub content: String,
    /// Token count and position metadata
    pub meta: ChunkMeta,
    /// Set when the chunk could not be held under the budget: either the
    /// framing alone exceeds it, or a single body line does
    pub oversized: bool,
}

/// Splits sections into token-bounded chunks, in section order.
///
/// Each chunk carries the file's constant framing (`\n## <path>\n~~~\n` …
/// `\n~~~\n`) around a run of body lines packed greedily against
/// `max_tokens` minus the framing cost. A single line that exceeds the
/// budget on its own is emitted as its own flagged chunk rather than
/// dropped. Deterministic: identical inputs produce the identical
/// partition.
#[must_use]
pub fn split_by_tokens(
    sections: &[Section],
    max_tokens: usize,
    estimator: &dyn TokenEstimator,
) -> Vec<FileChunk> {
    let mut chunks = Vec::new();

    for section in sections {
        let header = format!("\n## {}\n~~~\n", section.heading);
        let footer = "\n~~~\n";
        let header_tokens = estimator.count(&header);
        let footer_tokens = estimator.count(footer);

        if header_tokens + footer_tokens >= max_tokens {
            warn!(
                "Framing for '{}' ({} tokens) exceeds the {} token budget",
                section.heading,
                header_tokens + footer_tokens,
                max_tokens
            );
            let content = format!("{header}{footer}");
            let tokens = estimator.count(&content);
            chunks.push(FileChunk {
                file_name: section.heading.clone(),
                content,
                meta: ChunkMeta {
                    tokens,
                    chunk_index: 0,
                    chunk_count: 1,
                },
                oversized: true,
            });
            continue;
        }

        let budget = max_tokens - header_tokens - footer_tokens;
        let bodies = pack_lines(&section.body, budget, estimator, &section.heading);

        let chunk_count = bodies.len();
        for (chunk_index, (body, oversized)) in bodies.into_iter().enumerate() {
            let content = format!("{header}{body}{footer}");
            let tokens = estimator.count(&content);
            chunks.push(FileChunk {
                file_name: section.heading.clone(),
                content,
                meta: ChunkMeta {
                    tokens,
                    chunk_index,
                    chunk_count,
                },
                oversized,
            });
        }
    }

    debug!("Chunked {} sections into {} chunks", sections.len(), chunks.len());
    chunks
}

/// Greedily accumulates lines into bodies that tokenize within `budget`.
///
/// Returns `(body, oversized)` pairs; concatenating the bodies with `\n`
/// reconstructs the input exactly.
fn pack_lines(
    body: &str,
    budget: usize,
    estimator: &dyn TokenEstimator,
    heading: &str,
) -> Vec<(String, bool)> {
    let mut bodies = Vec::new();
    let mut buffer = String::new();

    for line in body.lines() {
        let candidate = if buffer.is_empty() {
            line.to_string()
        } else {
            format!("{buffer}\n{line}")
        };

        if estimator.count(&candidate) <= budget {
            buffer = candidate;
            continue;
        }

        if !buffer.is_empty() {
            bodies.push((std::mem::take(&mut buffer), false));
        }

        if estimator.count(line) <= budget {
            buffer = line.to_string();
        } else {
            warn!(
                "Single line in '{}' exceeds the chunk budget of {} tokens",
                heading, budget
            );
            bodies.push((line.to_string(), true));
        }
    }

    if !buffer.is_empty() {
        bodies.push((buffer, false));
    }
    if bodies.is_empty() {
        bodies.push((String::new(), false));
    }
    bodies
}
