/*!
 * Size and duration estimates for a script.
 *
 * Durations are heuristic throughput figures (tokens per second of
 * processing), not measurements.
 */

use serde::{Deserialize, Serialize};

use crate::pipeline::ProcessingMode;
use crate::providers::TranslationEngine;

/// Default token limit of the translation tokenizer
pub const DEFAULT_MAX_TOKEN_LENGTH: usize = 512;

/// Default throughput when translating, in tokens per second
pub const DEFAULT_TRANSLATE_TOKENS_PER_SECOND: f64 = 75.0;

/// Default throughput when summarizing, in tokens per second
pub const DEFAULT_SUMMARIZE_TOKENS_PER_SECOND: f64 = 100.0;

/// Counts and time estimates for one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetadata {
    pub word_count: usize,
    pub token_count: usize,
    pub est_seconds: f64,
    pub est_minutes: f64,
}

/// Computes `TextMetadata` from raw request text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetadataCalculator {
    /// Tokenizer truncation limit
    pub max_token_length: usize,
    pub translate_tokens_per_second: f64,
    pub summarize_tokens_per_second: f64,
}

impl Default for MetadataCalculator {
    fn default() -> Self {
        Self {
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
            translate_tokens_per_second: DEFAULT_TRANSLATE_TOKENS_PER_SECOND,
            summarize_tokens_per_second: DEFAULT_SUMMARIZE_TOKENS_PER_SECOND,
        }
    }
}

impl MetadataCalculator {
    /// Compute counts for `text`, tokenized by the translation engine
    pub fn compute(&self, text: &str, mode: ProcessingMode, tokenizer: &dyn TranslationEngine) -> TextMetadata {
        let word_count = text.split_whitespace().count();
        let token_count = tokenizer.count_tokens(text, self.max_token_length);

        let rate = match mode {
            ProcessingMode::Translate => self.translate_tokens_per_second,
            ProcessingMode::Summarize => self.summarize_tokens_per_second,
        };
        let est_seconds = token_count as f64 / rate;

        TextMetadata {
            word_count,
            token_count,
            est_seconds,
            est_minutes: est_seconds / 60.0,
        }
    }
}
