/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use scriptvox::app_config::{Config, EngineProvider, LogLevel, MAX_RETRY_COUNT};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "it");
    assert_eq!(config.engines.translation.provider, EngineProvider::Ollama);
    assert_eq!(config.engines.summarization.provider, EngineProvider::Ollama);
    assert_eq!(config.engines.translation.endpoint, "http://localhost:11434");
    assert_eq!(config.engines.summarization.max_output_tokens, 150);
    assert_eq!(config.engines.summarization.max_input_tokens, 512);
    assert_eq!(config.engines.common.retry_count, 3);
    assert_eq!(config.metadata.max_token_length, 512);
    assert_eq!(config.metadata.translate_tokens_per_second, 75.0);
    assert_eq!(config.metadata.summarize_tokens_per_second, 100.0);
    assert_eq!(config.processing.concurrent_requests, 4);
    assert!(config.processing.cache_enabled);
    assert!(config.idioms.enabled);
    assert_eq!(config.idioms.path, "idioms.json");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Invalid source language
    config.source_language = "x1z".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    // Invalid target language
    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "de".to_string();
    assert!(config.validate().is_ok());

    // Ollama needs a model
    config.engines.translation.model = " ".to_string();
    assert!(config.validate().is_err());

    // The mock engine does not
    config.engines.set_provider(EngineProvider::Mock);
    assert!(config.validate().is_ok());

    // Zero concurrency is rejected
    config.processing.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.processing.concurrent_requests = 1;

    // Zero rates are rejected
    config.metadata.translate_tokens_per_second = 0.0;
    assert!(config.validate().is_err());
}

/// Retry counts are bounded so backoff waits stay finite
#[test]
fn test_config_validation_withHugeRetryCount_shouldFail() {
    let mut config = Config::default();

    config.engines.common.retry_count = MAX_RETRY_COUNT;
    assert!(config.validate().is_ok());

    config.engines.common.retry_count = 100;
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("retry_count"));
}

/// A missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.target_language, "it");

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(written["engines"]["translation"]["provider"], "ollama");
    assert_eq!(written["log_level"], "info");
    Ok(())
}

/// Partial files are completed with defaults
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"target_language": "fr", "engines": {"summarization": {"provider": "mock"}}}"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.target_language, "fr");
    assert_eq!(config.engines.summarization.provider, EngineProvider::Mock);
    assert_eq!(config.engines.summarization.model, "llama3.2:3b");
    assert_eq!(config.engines.translation.provider, EngineProvider::Ollama);
    assert_eq!(config.processing.concurrent_requests, 4);
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Saved configs load back unchanged
#[test]
fn test_save_thenLoad_shouldKeepValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "es".to_string();
    config.engines.set_model("mistral:7b");
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.target_language, "es");
    assert_eq!(loaded.engines.translation.model, "mistral:7b");
    assert_eq!(loaded.engines.summarization.model, "mistral:7b");
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_engineProvider_fromStr_shouldParseKnownNames() {
    assert_eq!("ollama".parse::<EngineProvider>().unwrap(), EngineProvider::Ollama);
    assert_eq!("Mock".parse::<EngineProvider>().unwrap(), EngineProvider::Mock);
    assert!("openai".parse::<EngineProvider>().is_err());
}

#[test]
fn test_pipelineSettings_shouldMirrorConfig() {
    let mut config = Config::default();
    config.engines.summarization.max_output_tokens = 90;
    config.metadata.translate_tokens_per_second = 50.0;

    let settings = config.pipeline_settings();

    assert_eq!(settings.source_language, "en");
    assert_eq!(settings.summary_max_tokens, 90);
    assert!(settings.cache_enabled);
    assert_eq!(settings.metadata.translate_tokens_per_second, 50.0);
    assert_eq!(settings.metadata.max_token_length, 512);
}
