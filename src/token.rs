//! Token counting behind an injectable capability.
//!
//! The pipeline only ever needs a length projection (`count(text) -> usize`),
//! so the vocabulary stays an implementation detail of the estimator. Counts
//! from a BPE are sub-additive only up to merges at concatenation seams,
//! which is why callers re-measure a whole buffer instead of summing parts.

use std::sync::{Arc, OnceLock};
use tiktoken_rs::CoreBPE;

const HEURISTIC_CHARS_PER_TOKEN: usize = 4;

/// Type of tokenizer to use for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenizerKind {
    /// Large-vocabulary BPE (exact counts)
    #[default]
    Bpe,
    /// Character-based heuristic (~4 chars per token)
    CharHeuristic,
}

impl TokenizerKind {
    /// Creates a new estimator instance of this kind.
    #[must_use]
    pub fn create(self) -> Arc<dyn TokenEstimator> {
        match self {
            Self::Bpe => Arc::new(BpeTokenizer),
            Self::CharHeuristic => Arc::new(HeuristicTokenizer),
        }
    }
}

/// Trait for counting tokens in text.
///
/// Implementations must be thread-safe; the pipeline shares one estimator
/// across workers.
pub trait TokenEstimator: Send + Sync {
    /// Returns the number of tokens in the given text.
    fn count(&self, text: &str) -> usize;
}

// One process-wide BPE table; loading the merge ranks is expensive.
static BPE: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn bpe() -> Option<&'static CoreBPE> {
    BPE.get_or_init(|| tiktoken_rs::o200k_base().ok()).as_ref()
}

/// BPE-backed tokenizer with a heuristic fallback when the merge table
/// cannot be loaded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BpeTokenizer;

impl TokenEstimator for BpeTokenizer {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        match bpe() {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => HeuristicTokenizer.count(text),
        }
    }
}

/// Character-count heuristic tokenizer.
///
/// Code averages ~3.5 chars/token, prose ~4.2; 4 is the middle ground.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeuristicTokenizer;

impl TokenEstimator for HeuristicTokenizer {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let chars = text.chars().count();
        chars
            .saturating_add(HEURISTIC_CHARS_PER_TOKEN - 1)
            .saturating_div(HEURISTIC_CHARS_PER_TOKEN)
            .max(1)
    }
}
