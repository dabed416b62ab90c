use async_trait::async_trait;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{SummarizationEngine, TranslationEngine, estimate_tokens, truncate_to_tokens};

// Chat models sometimes label their answer despite the system prompt
static ANSWER_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:translation|translated text|summary)\s*:\s*").expect("Invalid answer label regex")
});

/// Trim the raw model answer and drop a leading answer label
fn clean_model_output(raw: &str) -> String {
    ANSWER_LABEL_REGEX.replace(raw.trim(), "").trim().to_string()
}

/// Ollama client for interacting with Ollama API
#[derive(Debug, Clone)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Cap the number of generated tokens
    pub fn num_predict(mut self, num_predict: u32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).num_predict = Some(num_predict);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

impl Ollama {
    /// Create a new Ollama client from an endpoint URL
    ///
    /// Accepts `host:port` as well as a full `http(s)://` URL.
    pub fn new_with_config(
        endpoint: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ProviderError> {
        let base_url = normalize_endpoint(endpoint)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Ollama speaks HTTP/1.1
            .http1_only()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate text from the Ollama API with retry logic
    ///
    /// Server and network errors are retried with exponential backoff; client
    /// errors (4xx) fail immediately.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            ProviderError::RequestFailed(format!("Failed to read Ollama response body: {}", e))
                        })?;
                        return parse_generation_body(&body);
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());

                    if !status.is_server_error() {
                        error!("Ollama API error ({}): {}", status, error_text);
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }

                    error!(
                        "Ollama API error ({}): {} - attempt {}/{}",
                        status,
                        error_text,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(ProviderError::ApiError {
                        status_code: status.as_u16(),
                        message: error_text,
                    });
                }
                Err(e) => {
                    error!(
                        "Ollama API network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(ProviderError::ConnectionError(format!(
                        "Failed to send request to Ollama API: {}",
                        e
                    )));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = backoff_delay_ms(self.backoff_base_ms, attempt);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Ollama API request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Invalid Ollama version response: {}", e)))?;

        response["version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

/// Upper bound for a single retry wait
pub const MAX_BACKOFF_MS: u64 = 60_000;

/// Exponential backoff before retry number `attempt` (1-based), capped at `MAX_BACKOFF_MS`
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    base_ms.saturating_mul(factor).min(MAX_BACKOFF_MS)
}

/// Turn a configured endpoint into a base URL without trailing slash
fn normalize_endpoint(endpoint: &str) -> Result<String, ProviderError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(ProviderError::ConnectionError("Endpoint cannot be empty".to_string()));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)
    } else {
        Url::parse(&format!("http://{}", endpoint))
    }
    .map_err(|e| ProviderError::ConnectionError(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

    if url.host_str().is_none() {
        return Err(ProviderError::ConnectionError(format!("Invalid host in endpoint: {}", endpoint)));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Parse a generate response body
///
/// Non-streaming requests return one JSON object; servers that ignore the
/// `stream` flag return JSON lines, which are concatenated.
fn parse_generation_body(body: &str) -> Result<GenerationResponse, ProviderError> {
    if let Ok(response) = serde_json::from_str::<GenerationResponse>(body) {
        return Ok(response);
    }

    let mut pieces = Vec::new();
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        let chunk: GenerationResponse = serde_json::from_str(line).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            error!("Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}", e, preview);
            ProviderError::ParseError(e.to_string())
        })?;
        pieces.push(chunk);
    }

    let last = pieces
        .last()
        .ok_or_else(|| ProviderError::ParseError("Empty response from Ollama".to_string()))?;

    Ok(GenerationResponse {
        model: last.model.clone(),
        response: pieces.iter().map(|p| p.response.as_str()).collect(),
        done: last.done,
        prompt_eval_count: last.prompt_eval_count,
        eval_count: last.eval_count,
    })
}

/// Translation engine backed by an Ollama model
#[derive(Debug, Clone)]
pub struct OllamaTranslator {
    client: Ollama,
    model: String,
    temperature: f32,
    max_input_tokens: usize,
    max_output_tokens: u32,
}

impl OllamaTranslator {
    pub fn new(
        client: Ollama,
        model: impl Into<String>,
        temperature: f32,
        max_input_tokens: usize,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
            max_input_tokens,
            max_output_tokens,
        }
    }

    /// Build the generate request for one translation call
    pub fn build_request(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<GenerationRequest, ProviderError> {
        let source_name = language_utils::get_language_name(source_language)
            .map_err(|_| ProviderError::UnsupportedLanguage(source_language.to_string()))?;
        let target_name = language_utils::get_language_name(target_language)
            .map_err(|_| ProviderError::UnsupportedLanguage(target_language.to_string()))?;

        let system_prompt = format!(
            "You are a professional screenplay translator. Translate the following text from {} to {}. \
             Keep names and capitalization as they are. \
             Only respond with the translated text, without any explanations or notes.",
            source_name, target_name
        );

        let input = truncate_to_tokens(text, self.max_input_tokens);

        Ok(GenerationRequest::new(&self.model, input)
            .system(system_prompt)
            .temperature(self.temperature)
            .num_predict(self.max_output_tokens))
    }
}

#[async_trait]
impl TranslationEngine for OllamaTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(text, source_language, target_language)?;
        let response = self.client.generate(&request).await?;

        debug!(
            "Ollama translation {} -> {}: {:?} prompt tokens, {:?} generated",
            source_language, target_language, response.prompt_eval_count, response.eval_count
        );

        Ok(clean_model_output(&response.response))
    }

    fn count_tokens(&self, text: &str, max_length: usize) -> usize {
        estimate_tokens(text).min(max_length)
    }
}

/// Summarization engine backed by an Ollama model
#[derive(Debug, Clone)]
pub struct OllamaSummarizer {
    client: Ollama,
    model: String,
    temperature: f32,
    max_input_tokens: usize,
}

impl OllamaSummarizer {
    pub fn new(client: Ollama, model: impl Into<String>, temperature: f32, max_input_tokens: usize) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
            max_input_tokens,
        }
    }

    /// Build the generate request for one summarization call
    pub fn build_request(&self, text: &str, max_output_tokens: u32) -> GenerationRequest {
        let input = truncate_to_tokens(text, self.max_input_tokens);

        GenerationRequest::new(&self.model, format!("summarize: {}", input))
            .system("Summarize the following English text in English. Only respond with the summary.")
            .temperature(self.temperature)
            .num_predict(max_output_tokens)
    }
}

#[async_trait]
impl SummarizationEngine for OllamaSummarizer {
    async fn summarize(&self, text: &str, max_output_tokens: u32) -> Result<String, ProviderError> {
        let request = self.build_request(text, max_output_tokens);
        let response = self.client.generate(&request).await?;
        Ok(clean_model_output(&response.response))
    }
}
