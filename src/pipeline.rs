/*!
 * Request pipeline: parse, measure, translate or summarize, reconcile.
 *
 * `ScriptPipeline::run` drives one request end to end:
 * 1. the script is split into formatted lines
 * 2. word/token counts and duration estimates are computed
 * 3. in translate mode every non-blank line is idiom-substituted and
 *    translated on its own, one engine call at a time, keeping a 1:1 mapping
 *    with the input lines; in summarize mode the whole document is
 *    idiom-substituted, summarized once and the summary translated once
 * 4. the translated texts are merged back into the line structure and the
 *    audio transcript is built
 *
 * Any engine failure aborts the request; no partial result is returned.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::TranslationCache;
use crate::errors::{ProcessingError, ProviderError, RequestError};
use crate::providers::{SummarizationEngine, TranslationEngine};
use crate::script::{FormatParser, FormattedLine, IdiomMap, MetadataCalculator, ResponseAssembler};

/// Target language used when a request names none
pub const DEFAULT_TARGET_LANGUAGE: &str = "it";

/// Language scripts are written in
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

/// Generation budget for summaries, in tokens
pub const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 150;

/// What to do with a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Translate line by line, keeping formatting
    Translate,
    /// Summarize the whole script, then translate the summary
    Summarize,
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translate => write!(f, "translate"),
            Self::Summarize => write!(f, "summarize"),
        }
    }
}

impl FromStr for ProcessingMode {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "translate" => Ok(Self::Translate),
            "summarize" => Ok(Self::Summarize),
            _ => Err(RequestError::UnknownMode(s.to_string())),
        }
    }
}

/// A validated processing request
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingRequest {
    pub text: String,
    pub mode: ProcessingMode,
    /// Target language code
    pub target_lang: String,
}

impl ProcessingRequest {
    /// Request targeting the default language
    pub fn new(text: impl Into<String>, mode: ProcessingMode) -> Self {
        Self {
            text: text.into(),
            mode,
            target_lang: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }

    pub fn with_target_lang(mut self, target_lang: impl Into<String>) -> Self {
        self.target_lang = target_lang.into();
        self
    }
}

/// Output of a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Translated lines, formatting reapplied
    pub lines: Vec<FormattedLine>,
    /// Non-empty line texts joined for speech playback
    pub audio_text: String,
    pub word_count: usize,
    pub token_count: usize,
    pub est_seconds: f64,
    pub est_minutes: f64,
}

/// Tunables of a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Language scripts are written in
    pub source_language: String,
    /// Generation budget for summaries
    pub summary_max_tokens: u32,
    /// Whether repeated lines of one request are translated once
    pub cache_enabled: bool,
    pub metadata: MetadataCalculator,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            summary_max_tokens: DEFAULT_SUMMARY_MAX_TOKENS,
            cache_enabled: true,
            metadata: MetadataCalculator::default(),
        }
    }
}

/// Orchestrates one request through the engines
///
/// Holds no per-request state, so a single pipeline can be shared by many
/// concurrent requests. Language pairs are passed to the engines with each
/// call.
#[derive(Debug, Clone)]
pub struct ScriptPipeline {
    translator: Arc<dyn TranslationEngine>,
    summarizer: Arc<dyn SummarizationEngine>,
    idioms: Arc<IdiomMap>,
    settings: PipelineSettings,
}

impl ScriptPipeline {
    /// Create a pipeline with default settings
    pub fn new(
        translator: Arc<dyn TranslationEngine>,
        summarizer: Arc<dyn SummarizationEngine>,
        idioms: Arc<IdiomMap>,
    ) -> Self {
        Self {
            translator,
            summarizer,
            idioms,
            settings: PipelineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }


    /// Process one request end to end
    pub async fn run(&self, request: &ProcessingRequest) -> Result<ProcessingResult, ProcessingError> {
        let start_time = Instant::now();
        info!("Requested mode: {}, lang: {}", request.mode, request.target_lang);

        let lines = FormatParser::parse(&request.text);
        let metadata = self
            .settings
            .metadata
            .compute(&request.text, request.mode, self.translator.as_ref());

        let translated = match request.mode {
            ProcessingMode::Translate => self.translate_lines(&lines, &request.target_lang).await?,
            ProcessingMode::Summarize => self.summarize_document(&request.text, &request.target_lang).await?,
        };

        let lines = ResponseAssembler::assemble(translated, lines);
        let audio_text = ResponseAssembler::flatten(&lines);

        debug!(
            "Processed {} line(s) in {:?} ({} tokens)",
            lines.len(),
            start_time.elapsed(),
            metadata.token_count
        );

        Ok(ProcessingResult {
            lines,
            audio_text,
            word_count: metadata.word_count,
            token_count: metadata.token_count,
            est_seconds: metadata.est_seconds,
            est_minutes: metadata.est_minutes,
        })
    }

    /// Translate every line on its own, blank lines pass through untouched
    ///
    /// The line cache lives for this call only and is dropped with the request.
    async fn translate_lines(&self, lines: &[FormattedLine], target_language: &str) -> Result<Vec<String>, ProviderError> {
        let cache = TranslationCache::new(self.settings.cache_enabled);
        let mut translated = Vec::with_capacity(lines.len());

        for line in lines {
            if line.is_blank() {
                translated.push(String::new());
                continue;
            }

            let modified = self.idioms.apply(&line.text);
            translated.push(self.translate_cached(&cache, &modified, target_language).await?);
        }

        let stats = cache.stats();
        if stats.hits > 0 {
            debug!(
                "Line cache: {} hits, {} misses ({:.0}% hit rate)",
                stats.hits,
                stats.misses,
                stats.hit_rate() * 100.0
            );
        }

        Ok(translated)
    }

    async fn translate_cached(
        &self,
        cache: &TranslationCache,
        text: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let source_language = self.settings.source_language.as_str();

        if let Some(hit) = cache.get(text, source_language, target_language) {
            return Ok(hit);
        }

        let translation = self
            .translator
            .translate(text, source_language, target_language)
            .await?;
        cache.store(text, source_language, target_language, &translation);

        Ok(translation)
    }

    /// Summarize the whole document once and translate the summary
    ///
    /// Always yields exactly one output text. A blank document departs from
    /// the summarize-then-translate call sequence: neither engine is called
    /// and the single output text is empty.
    async fn summarize_document(&self, text: &str, target_language: &str) -> Result<Vec<String>, ProviderError> {
        if text.trim().is_empty() {
            return Ok(vec![String::new()]);
        }

        let modified = self.idioms.apply(text);
        let summary = self
            .summarizer
            .summarize(&modified, self.settings.summary_max_tokens)
            .await?;
        debug!("English summary: {}", summary);

        let translation = self
            .translator
            .translate(&summary, &self.settings.source_language, target_language)
            .await?;

        Ok(vec![translation])
    }
}
