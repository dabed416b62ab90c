/*!
 * Mock engine implementations for testing and dry runs.
 *
 * This module provides a mock engine that simulates different behaviors:
 * - `MockEngine::working()` - Always succeeds with tagged text
 * - `MockEngine::intermittent(n)` - Fails every nth call
 * - `MockEngine::failing()` - Always fails with an error
 *
 * One `MockEngine` implements both engine traits and records every call it
 * receives, so tests can assert how the pipeline drove it.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{SummarizationEngine, TranslationEngine};

/// A call received by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Translate {
        text: String,
        source_language: String,
        target_language: String,
    },
    Summarize {
        text: String,
        max_output_tokens: u32,
    },
}

impl MockCall {
    /// Input text of the call
    pub fn text(&self) -> &str {
        match self {
            Self::Translate { text, .. } | Self::Summarize { text, .. } => text,
        }
    }
}

/// Behavior mode for the mock engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth call)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for concurrency testing)
    Slow { delay_ms: u64 },
}

/// Mock engine for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockEngine {
    /// Behavior mode
    behavior: MockBehavior,
    /// Call counter shared between clones
    call_count: Arc<AtomicUsize>,
    /// Every call received, in order
    calls: Arc<Mutex<Vec<MockCall>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockCall) -> String>,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock engine that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock engine
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock engine that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock engine that waits before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&MockCall) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the calls received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    fn default_response(call: &MockCall) -> String {
        match call {
            MockCall::Translate { text, target_language, .. } => {
                format!("[{}] {}", target_language, text)
            }
            MockCall::Summarize { text, .. } => {
                let first = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
                format!("[summary] {}", first)
            }
        }
    }

    async fn respond(&self, call: MockCall) -> Result<String, ProviderError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(call.clone());

        match self.behavior {
            MockBehavior::Working => {}
            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    return Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (call #{})", count + 1),
                    });
                }
            }
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    status_code: 500,
                    message: "Simulated engine failure".to_string(),
                });
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
            }
        }

        Ok(match self.custom_response {
            Some(generator) => generator(&call),
            None => Self::default_response(&call),
        })
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::working()
    }
}

#[async_trait]
impl TranslationEngine for MockEngine {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        self.respond(MockCall::Translate {
            text: text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        })
        .await
    }

    /// Whitespace-delimited tokens
    fn count_tokens(&self, text: &str, max_length: usize) -> usize {
        text.split_whitespace().count().min(max_length)
    }
}

#[async_trait]
impl SummarizationEngine for MockEngine {
    async fn summarize(&self, text: &str, max_output_tokens: u32) -> Result<String, ProviderError> {
        self.respond(MockCall::Summarize {
            text: text.to_string(),
            max_output_tokens,
        })
        .await
    }
}
