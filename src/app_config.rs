use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pipeline::PipelineSettings;
use crate::script::MetadataCalculator;
use crate::script::metadata::{
    DEFAULT_MAX_TOKEN_LENGTH, DEFAULT_SUMMARIZE_TOKENS_PER_SECOND, DEFAULT_TRANSLATE_TOKENS_PER_SECOND,
};

/// Most retries allowed per engine call
pub const MAX_RETRY_COUNT: u32 = 10;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language scripts are written in (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language when a request names none (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation and summarization engines
    #[serde(default)]
    pub engines: EngineConfig,

    /// Idiom dictionary
    #[serde(default)]
    pub idioms: IdiomConfig,

    /// Metadata heuristics
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Request handling
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Engine backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineProvider {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: deterministic offline engine
    Mock,
}

impl EngineProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::Mock => "Mock",
        }
    }
}

impl std::fmt::Display for EngineProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for EngineProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Settings of one engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Backend type
    #[serde(default)]
    pub provider: EngineProvider,

    // @field: Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Input truncation limit in tokens
    #[serde(default = "default_max_input_tokens")]
    pub max_input_tokens: usize,

    // @field: Generation budget in tokens
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl ProviderConfig {
    // @param max_output_tokens: Generation budget
    // @returns: Ollama config with defaults
    pub fn ollama(max_output_tokens: u32) -> Self {
        Self {
            provider: EngineProvider::Ollama,
            model: default_ollama_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_input_tokens: default_max_input_tokens(),
            max_output_tokens,
        }
    }
}

/// Both engines plus shared settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_translation_engine")]
    pub translation: ProviderConfig,

    #[serde(default = "default_summarization_engine")]
    pub summarization: ProviderConfig,

    #[serde(default)]
    pub common: EngineCommonConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            translation: default_translation_engine(),
            summarization: default_summarization_engine(),
            common: EngineCommonConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Switch both engines to one backend
    pub fn set_provider(&mut self, provider: EngineProvider) {
        self.translation.provider = provider;
        self.summarization.provider = provider;
    }

    /// Use one model for both engines
    pub fn set_model(&mut self, model: &str) {
        self.translation.model = model.to_string();
        self.summarization.model = model.to_string();
    }
}

/// Settings applicable to all engines
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineCommonConfig {
    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for EngineCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Idiom dictionary location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IdiomConfig {
    /// Whether idioms are substituted at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON file of phrase -> replacement pairs
    #[serde(default = "default_idioms_path")]
    pub path: String,
}

impl Default for IdiomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_idioms_path(),
        }
    }
}

/// Heuristics behind token counts and duration estimates
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MetadataConfig {
    /// Tokenizer truncation limit
    #[serde(default = "default_max_token_length")]
    pub max_token_length: usize,

    /// Throughput assumed for translation
    #[serde(default = "default_translate_tokens_per_second")]
    pub translate_tokens_per_second: f64,

    /// Throughput assumed for summarization
    #[serde(default = "default_summarize_tokens_per_second")]
    pub summarize_tokens_per_second: f64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            max_token_length: default_max_token_length(),
            translate_tokens_per_second: default_translate_tokens_per_second(),
            summarize_tokens_per_second: default_summarize_tokens_per_second(),
        }
    }
}

/// Request handling settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProcessingConfig {
    /// Requests processed at once in batch mode
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Whether repeated lines within one request are translated once
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: default_concurrent_requests(),
            cache_enabled: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    crate::pipeline::DEFAULT_TARGET_LANGUAGE.to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_input_tokens() -> usize {
    512
}

fn default_max_output_tokens() -> u32 {
    512
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_idioms_path() -> String {
    "idioms.json".to_string()
}

fn default_max_token_length() -> usize {
    DEFAULT_MAX_TOKEN_LENGTH
}

fn default_translate_tokens_per_second() -> f64 {
    DEFAULT_TRANSLATE_TOKENS_PER_SECOND
}

fn default_summarize_tokens_per_second() -> f64 {
    DEFAULT_SUMMARIZE_TOKENS_PER_SECOND
}

fn default_translation_engine() -> ProviderConfig {
    ProviderConfig::ollama(default_max_output_tokens())
}

fn default_summarization_engine() -> ProviderConfig {
    ProviderConfig::ollama(crate::pipeline::DEFAULT_SUMMARY_MAX_TOKENS)
}

impl Config {
    /// Load a config file, or write and return the defaults if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found at {:?}, creating default config.", path);
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.source_language)
            .context("Invalid source language")?;
        crate::language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;

        for (name, engine) in [
            ("translation", &self.engines.translation),
            ("summarization", &self.engines.summarization),
        ] {
            if engine.provider == EngineProvider::Ollama {
                if engine.endpoint.trim().is_empty() {
                    return Err(anyhow!("The {} engine needs an endpoint", name));
                }
                if engine.model.trim().is_empty() {
                    return Err(anyhow!("The {} engine needs a model", name));
                }
            }
            if engine.max_input_tokens == 0 || engine.max_output_tokens == 0 {
                return Err(anyhow!("Token limits of the {} engine must be positive", name));
            }
        }

        if self.metadata.max_token_length == 0 {
            return Err(anyhow!("metadata.max_token_length must be positive"));
        }
        if self.metadata.translate_tokens_per_second <= 0.0 || self.metadata.summarize_tokens_per_second <= 0.0 {
            return Err(anyhow!("Token rates must be positive"));
        }
        if self.engines.common.retry_count > MAX_RETRY_COUNT {
            return Err(anyhow!(
                "engines.common.retry_count must be at most {}, got {}",
                MAX_RETRY_COUNT,
                self.engines.common.retry_count
            ));
        }
        if self.processing.concurrent_requests == 0 {
            return Err(anyhow!("processing.concurrent_requests must be at least 1"));
        }

        Ok(())
    }

    /// Pipeline tunables derived from this configuration
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            source_language: self.source_language.clone(),
            summary_max_tokens: self.engines.summarization.max_output_tokens,
            cache_enabled: self.processing.cache_enabled,
            metadata: MetadataCalculator {
                max_token_length: self.metadata.max_token_length,
                translate_tokens_per_second: self.metadata.translate_tokens_per_second,
                summarize_tokens_per_second: self.metadata.summarize_tokens_per_second,
            },
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            engines: EngineConfig::default(),
            idioms: IdiomConfig::default(),
            metadata: MetadataConfig::default(),
            processing: ProcessingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
