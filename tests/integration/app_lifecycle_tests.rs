/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use scriptvox::app_config::Config;
use scriptvox::{Controller, RequestBody};

use crate::common;

/// Test the controller initialization with the mock engines
#[test]
fn test_controller_withMockConfig_shouldLoadIdiomsFromFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::mock_config(temp_dir.path())?;

    let controller = Controller::with_config(config)?;

    assert_eq!(controller.config().target_language, "it");
    assert!(controller.pipeline().settings().cache_enabled);
    Ok(())
}

/// The idiom file configured is the one applied to requests
#[tokio::test]
async fn test_controller_withMockConfig_shouldApplyConfiguredIdioms() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let config = common::mock_config(temp_dir.path())?;
    let controller = Controller::with_config(config)?;

    let response = controller
        .handle(RequestBody {
            text: Some("It was a piece of cake.".to_string()),
            mode: Some("translate".to_string()),
            lang: Some("de".to_string()),
        })
        .await;

    let value: serde_json::Value = serde_json::from_str(&response.to_json())?;
    assert_eq!(value["audio_text"], "[de] It was a very easy.");
    Ok(())
}

/// Disabled idioms leave the text untouched even with a dictionary present
#[tokio::test]
async fn test_controller_withIdiomsDisabled_shouldTranslateVerbatim() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::mock_config(temp_dir.path())?;
    config.idioms.enabled = false;
    let controller = Controller::with_config(config)?;

    let response = controller
        .handle_json(r#"{"text": "Break a leg!", "mode": "translate"}"#)
        .await;

    let value: serde_json::Value = serde_json::from_str(&response.to_json())?;
    assert_eq!(value["audio_text"], "[it] Break a leg!");
    Ok(())
}

/// A missing idiom file is tolerated
#[test]
fn test_controller_withMissingIdiomFile_shouldStillInitialize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::mock_config(temp_dir.path())?;
    config.idioms.path = temp_dir.path().join("missing.json").to_string_lossy().into_owned();

    assert!(Controller::with_config(config).is_ok());
    Ok(())
}

/// A broken idiom file stops startup
#[test]
fn test_controller_withBrokenIdiomFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::mock_config(temp_dir.path())?;
    let broken = common::create_test_file(temp_dir.path(), "broken.json", "{\"break a leg\": ")?;
    config.idioms.path = broken.to_string_lossy().into_owned();

    assert!(Controller::with_config(config).is_err());
    Ok(())
}

/// Mock engines need no connection check
#[tokio::test]
async fn test_testConnection_withMockEngines_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::mock_config(temp_dir.path())?)?;

    controller.test_connection().await?;
    Ok(())
}

/// Ollama engines are checked and an unreachable server is reported
#[tokio::test]
async fn test_testConnection_withUnreachableOllama_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.idioms.path = common::create_test_idioms(temp_dir.path())?.to_string_lossy().into_owned();
    config.engines.translation.endpoint = "http://127.0.0.1:1".to_string();
    config.engines.summarization.endpoint = "http://127.0.0.1:1".to_string();
    config.engines.translation.timeout_secs = 2;
    config.engines.summarization.timeout_secs = 2;

    let controller = Controller::with_config(config)?;
    let error = controller.test_connection().await.unwrap_err();

    assert!(error.to_string().contains("translation engine"));
    Ok(())
}

/// Config written by `load_or_create` drives a working controller
#[test]
fn test_controller_fromCreatedConfigFile_shouldInitialize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let mut config = Config::load_or_create(&config_path)?;
    config.idioms.path = common::create_test_idioms(temp_dir.path())?.to_string_lossy().into_owned();
    config.validate()?;

    let controller = tokio_test::block_on(async { Controller::with_config(config) })?;
    assert_eq!(controller.config().source_language, "en");
    Ok(())
}
