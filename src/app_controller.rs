use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use log::{debug, error, info};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::{Config, EngineProvider, ProviderConfig};
use crate::errors::ProcessingError;
use crate::pipeline::{ProcessingRequest, ProcessingResult, ScriptPipeline};
use crate::protocol::{RequestBody, ResponseBody};
use crate::providers::mock::MockEngine;
use crate::providers::ollama::{Ollama, OllamaSummarizer, OllamaTranslator};
use crate::providers::{SummarizationEngine, TranslationEngine};
use crate::script::IdiomMap;

// @module: Application controller wiring configuration to the pipeline

/// Main application controller for script processing
///
/// Built once per process: engines and the idiom dictionary are created here
/// and shared by every request the controller handles.
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared request pipeline
    pipeline: ScriptPipeline,
    // @field: Ollama clients to check, by engine name
    ollama_clients: Vec<(&'static str, Ollama)>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let idioms = Arc::new(load_idioms(&config)?);
        let mut ollama_clients = Vec::new();

        let translator: Arc<dyn TranslationEngine> = match config.engines.translation.provider {
            EngineProvider::Ollama => {
                let client = build_client(&config, &config.engines.translation)?;
                ollama_clients.push(("translation", client.clone()));
                Arc::new(OllamaTranslator::new(
                    client,
                    &config.engines.translation.model,
                    config.engines.common.temperature,
                    config.engines.translation.max_input_tokens,
                    config.engines.translation.max_output_tokens,
                ))
            }
            EngineProvider::Mock => Arc::new(MockEngine::working()),
        };

        let summarizer: Arc<dyn SummarizationEngine> = match config.engines.summarization.provider {
            EngineProvider::Ollama => {
                let client = build_client(&config, &config.engines.summarization)?;
                ollama_clients.push(("summarization", client.clone()));
                Arc::new(OllamaSummarizer::new(
                    client,
                    &config.engines.summarization.model,
                    config.engines.common.temperature,
                    config.engines.summarization.max_input_tokens,
                ))
            }
            EngineProvider::Mock => Arc::new(MockEngine::working()),
        };

        let pipeline = ScriptPipeline::new(translator, summarizer, idioms).with_settings(config.pipeline_settings());

        Ok(Self {
            config,
            pipeline,
            ollama_clients,
        })
    }

    /// Create a controller around an already assembled pipeline
    pub fn with_pipeline(config: Config, pipeline: ScriptPipeline) -> Self {
        Self {
            config,
            pipeline,
            ollama_clients: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &ScriptPipeline {
        &self.pipeline
    }

    /// Run a validated request through the pipeline
    pub async fn process(&self, request: &ProcessingRequest) -> Result<ProcessingResult, ProcessingError> {
        let outcome = self.pipeline.run(request).await;
        if let Err(e) = &outcome {
            error!("Processing failed with error: {}", e);
        }
        outcome
    }

    /// Handle a raw request body, always producing a response body
    pub async fn handle(&self, body: RequestBody) -> ResponseBody {
        let request = match body.into_request() {
            Ok(request) => request,
            Err(e) => {
                let error = ProcessingError::from(e);
                error!("Processing failed with error: {}", error);
                return ResponseBody::failure(error.to_string());
            }
        };

        self.process(&request).await.into()
    }

    /// Handle a JSON request body
    pub async fn handle_json(&self, json: &str) -> ResponseBody {
        match RequestBody::from_json(json) {
            Ok(body) => self.handle(body).await,
            Err(e) => {
                let error = ProcessingError::from(e);
                error!("Processing failed with error: {}", error);
                ResponseBody::failure(error.to_string())
            }
        }
    }

    /// Handle JSON-lines requests concurrently, answers in input order
    ///
    /// At most `processing.concurrent_requests` requests are in flight; each
    /// one fails or succeeds on its own.
    pub async fn handle_batch(&self, input: &str) -> Vec<ResponseBody> {
        let requests: Vec<&str> = input.lines().filter(|line| !line.trim().is_empty()).collect();
        let concurrency = self.config.processing.concurrent_requests.max(1);

        info!("Processing {} request(s), {} at a time", requests.len(), concurrency);

        stream::iter(requests)
            .map(|json| self.handle_json(json))
            .buffered(concurrency)
            .collect()
            .await
    }

    /// Check that every configured Ollama server answers
    pub async fn test_connection(&self) -> Result<()> {
        for (name, client) in &self.ollama_clients {
            let version = client
                .version()
                .await
                .map_err(|e| anyhow!("Failed to connect to the {} engine at {}: {}", name, client.base_url(), e))?;
            info!("Connected to {} engine at {} (Ollama {})", name, client.base_url(), version);
        }
        Ok(())
    }
}

fn build_client(config: &Config, engine: &ProviderConfig) -> Result<Ollama> {
    Ollama::new_with_config(
        &engine.endpoint,
        engine.timeout_secs,
        config.engines.common.retry_count,
        config.engines.common.retry_backoff_ms,
    )
    .with_context(|| format!("Failed to create Ollama client for {}", engine.endpoint))
}

fn load_idioms(config: &Config) -> Result<IdiomMap> {
    if !config.idioms.enabled {
        debug!("Idiom substitution disabled by configuration");
        return Ok(IdiomMap::empty());
    }

    let idioms = IdiomMap::load(Path::new(&config.idioms.path))?;
    info!("Idiom dictionary ready ({} phrases)", idioms.len());
    Ok(idioms)
}
