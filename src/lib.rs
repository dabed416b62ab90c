/*!
 * # scriptvox - screenplay translation with formatting preserved
 *
 * A Rust library that translates or summarizes screenplay-style text through
 * external generative engines while keeping the script's line formatting.
 *
 * ## Features
 *
 * - Line classification: scene headings, character cues, italic directions
 * - Case-insensitive idiom substitution before translation
 * - Two modes:
 *   - translate: line by line, formatting reapplied 1:1
 *   - summarize: whole document summarized, then translated once
 * - Word/token counts and duration estimates
 * - Audio-ready transcript for speech playback
 * - Engines:
 *   - Ollama (local LLM)
 *   - Mock (deterministic, offline)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `script`: formatting parser, idiom dictionary, metadata, reconciliation
 * - `pipeline`: per-request orchestration
 * - `providers`: engine traits and their implementations
 * - `protocol`: request/response bodies
 * - `cache`: per-request line translation cache
 * - `app_config`: configuration management
 * - `app_controller`: wiring configuration, engines and pipeline together
 * - `language_utils`: ISO language code utilities
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod cache;
pub mod errors;
pub mod language_utils;
pub mod pipeline;
pub mod protocol;
pub mod providers;
pub mod script;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ProcessingError, ProviderError, RequestError};
pub use pipeline::{ProcessingMode, ProcessingRequest, ProcessingResult, ScriptPipeline};
pub use protocol::{RequestBody, ResponseBody};
pub use script::{FormatParser, FormattedLine, IdiomMap, LineAlign, LineStyle};
