/*!
 * Engine implementations for translation and summarization.
 *
 * The pipeline only sees two capabilities, each behind its own trait:
 * - `TranslationEngine`: translate text between a language pair, and count
 *   tokens with the same tokenizer the engine uses
 * - `SummarizationEngine`: summarize English text
 *
 * Implementations:
 * - `ollama`: engines backed by a local Ollama server
 * - `mock`: deterministic engines for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Machine translation capability
///
/// The language pair travels with every call; implementations must not keep
/// per-request language state, so one engine can serve concurrent requests.
#[async_trait]
pub trait TranslationEngine: Send + Sync + Debug {
    /// Translate `text` from `source_language` to `target_language`
    ///
    /// # Arguments
    /// * `text` - Text to translate
    /// * `source_language` - ISO code of the input language
    /// * `target_language` - ISO code of the output language
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Number of tokens `text` occupies, truncated at `max_length`
    fn count_tokens(&self, text: &str, max_length: usize) -> usize;
}

/// Abstractive summarization capability
#[async_trait]
pub trait SummarizationEngine: Send + Sync + Debug {
    /// Summarize `text`, generating at most `max_output_tokens` tokens
    ///
    /// Input beyond the engine's own limit is truncated before generation.
    async fn summarize(&self, text: &str, max_output_tokens: u32) -> Result<String, ProviderError>;
}

/// Rough token estimate for engines without an exposed tokenizer
///
/// ~4 characters per token for English text.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Cut `text` so that its estimated token count stays within `max_tokens`
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> &str {
    let max_chars = max_tokens.saturating_mul(4);
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub mod mock;
pub mod ollama;
