/*!
 * Common test utilities for the scriptvox test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use scriptvox::app_config::{Config, EngineProvider};
use scriptvox::providers::mock::{MockCall, MockEngine};
use scriptvox::{IdiomMap, ScriptPipeline};

/// Short screenplay excerpt used across tests
pub const SAMPLE_SCRIPT: &str = "INT. KITCHEN - NIGHT\n\
\n\
JOHN\n\
Break a leg tonight.\n\
*he smiles*\n\
\n\
MARY\n\
Thanks, I will.";

/// Route log output through env_logger, once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Writes a small idiom dictionary
pub fn create_test_idioms(dir: &Path) -> Result<PathBuf> {
    create_test_file(
        dir,
        "idioms.json",
        r#"{
  "break a leg": "good luck",
  "piece of cake": "very easy"
}"#,
    )
}

/// Config using the mock engine and an idiom file inside `dir`
pub fn mock_config(dir: &Path) -> Result<Config> {
    let idioms_path = create_test_idioms(dir)?;

    let mut config = Config::default();
    config.engines.set_provider(EngineProvider::Mock);
    config.idioms.path = idioms_path.to_string_lossy().into_owned();
    Ok(config)
}

/// Pipeline whose engines are both `engine`
pub fn mock_pipeline(engine: &MockEngine) -> ScriptPipeline {
    let idioms = IdiomMap::from_pairs([("break a leg", "good luck")]).expect("valid idioms");
    ScriptPipeline::new(Arc::new(engine.clone()), Arc::new(engine.clone()), Arc::new(idioms))
}

/// Custom mock response answering the hero line in Italian
pub fn hero_in_italian(call: &MockCall) -> String {
    match call.text() {
        "The hero saves the city." => "L'eroe salva la città.".to_string(),
        other => format!("[it] {}", other),
    }
}
