/*!
 * Request and response bodies exchanged with callers.
 *
 * Request: `{"text": "...", "mode": "translate" | "summarize", "lang": "it"}`
 * with `lang` optional. Success and failure bodies are told apart by the
 * presence of `result` or `error`.
 */

use serde::{Deserialize, Serialize};

use crate::errors::{ProcessingError, RequestError};
use crate::pipeline::{DEFAULT_TARGET_LANGUAGE, ProcessingMode, ProcessingRequest, ProcessingResult};
use crate::script::FormattedLine;

/// Raw request body as sent by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl RequestBody {
    /// Parse a JSON request body
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        serde_json::from_str(json).map_err(|e| RequestError::Malformed(e.to_string()))
    }

    /// Check required fields and build the processing request
    pub fn into_request(self) -> Result<ProcessingRequest, RequestError> {
        let text = self.text.ok_or(RequestError::MissingField("text"))?;
        let mode: ProcessingMode = self.mode.ok_or(RequestError::MissingField("mode"))?.parse()?;

        let target_lang = self
            .lang
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string());

        Ok(ProcessingRequest {
            text,
            mode,
            target_lang,
        })
    }
}

/// Successful response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessBody {
    pub result: Vec<FormattedLine>,
    pub audio_text: String,
    pub word_count: usize,
    pub token_count: usize,
    pub est_seconds: f64,
    pub est_minutes: f64,
}

impl From<ProcessingResult> for SuccessBody {
    fn from(result: ProcessingResult) -> Self {
        Self {
            result: result.lines,
            audio_text: result.audio_text,
            word_count: result.word_count,
            token_count: result.token_count,
            est_seconds: result.est_seconds,
            est_minutes: result.est_minutes,
        }
    }
}

/// Failure response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureBody {
    pub error: String,
}

/// Either response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success(SuccessBody),
    Failure(FailureBody),
}

impl ResponseBody {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(FailureBody { error: message.into() })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn to_json(&self) -> String {
        // plain data with string keys always serializes
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error":"Failed to encode response: {}"}}"#, e))
    }
}

impl From<Result<ProcessingResult, ProcessingError>> for ResponseBody {
    fn from(outcome: Result<ProcessingResult, ProcessingError>) -> Self {
        match outcome {
            Ok(result) => Self::Success(result.into()),
            Err(error) => Self::failure(error.to_string()),
        }
    }
}
