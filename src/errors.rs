/*!
 * Error types for the scriptvox application.
 *
 * This module contains custom error types for the different layers of the
 * pipeline, using the thiserror crate for ergonomic error definitions:
 * - `ProviderError`: failures raised by the translation/summarization engines
 * - `RequestError`: malformed or incomplete processing requests
 * - `ProcessingError`: the single failure a pipeline run reports
 * - `AppError`: application-level failures (config, files, CLI)
 */

use thiserror::Error;

/// Errors that can occur when calling an external engine
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine has no support for the requested language code
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// Errors caused by the shape of an incoming request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    /// A required field was absent
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The mode was neither "translate" nor "summarize"
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// The request body was not valid JSON
    #[error("Malformed request body: {0}")]
    Malformed(String),
}

/// The single failure reported by a pipeline run
///
/// Whatever went wrong, the whole request is aborted and the cause is carried
/// unmodified inside the message.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// Failure inside a translation or summarization engine
    #[error("Processing failed: {0}")]
    Engine(#[from] ProviderError),

    /// The request could not be turned into a processing request
    #[error("Processing failed: {0}")]
    Request(#[from] RequestError),
}

/// Application-level failures surfaced by the command line
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// An engine server could not be reached
    #[error("Connection check failed: {0}")]
    Connection(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
