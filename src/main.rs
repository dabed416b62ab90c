// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use scriptvox::app_config::{self, Config, EngineProvider};
use scriptvox::{AppError, Controller, ProcessingMode, RequestBody, ResponseBody};

/// CLI Wrapper for EngineProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliEngineProvider {
    Ollama,
    Mock,
}

impl From<CliEngineProvider> for EngineProvider {
    fn from(cli_provider: CliEngineProvider) -> Self {
        match cli_provider {
            CliEngineProvider::Ollama => EngineProvider::Ollama,
            CliEngineProvider::Mock => EngineProvider::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ProcessingMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliMode {
    Translate,
    Summarize,
}

impl From<CliMode> for ProcessingMode {
    fn from(cli_mode: CliMode) -> Self {
        match cli_mode {
            CliMode::Translate => ProcessingMode::Translate,
            CliMode::Summarize => ProcessingMode::Summarize,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate or summarize a script file (stdin when omitted)
    Process {
        /// Script file to process
        #[arg(value_name = "INPUT_PATH")]
        input_path: Option<PathBuf>,

        /// Processing mode
        #[arg(short, long, value_enum, default_value = "translate")]
        mode: CliMode,

        /// Target language code (defaults to the configured target language)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Process a raw JSON request body (stdin when omitted)
    Request {
        /// File holding the JSON request
        #[arg(value_name = "INPUT_PATH")]
        input_path: Option<PathBuf>,
    },

    /// Process JSON-lines requests concurrently, one response per line
    Batch {
        /// File holding one JSON request per line
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Check that the configured engines are reachable
    Check,

    /// Generate shell completions for scriptvox
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// scriptvox - screenplay translation with formatting preserved
///
/// Translates screenplay text line by line (or summarizes it) through a local
/// LLM, keeping scene headings, character cues and italics intact.
#[derive(Parser, Debug)]
#[command(name = "scriptvox")]
#[command(version)]
#[command(about = "Format-preserving screenplay translation and summarization")]
#[command(long_about = "scriptvox translates or summarizes screenplay text and returns the
formatted lines, an audio-ready transcript and duration estimates as JSON.

EXAMPLES:
    scriptvox process scene.txt                     # Translate to the default language
    scriptvox process -m summarize -l de scene.txt  # Summarize, then translate to German
    cat scene.txt | scriptvox process               # Read the script from stdin
    scriptvox request body.json                     # Process a raw JSON request
    scriptvox batch requests.jsonl                  # Process many requests concurrently
    scriptvox --provider mock process scene.txt     # Dry run without an engine
    scriptvox completions bash > scriptvox.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Engine backend for both engines
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliEngineProvider>,

    /// Model name for both engines
    #[arg(long, global = true)]
    model: Option<String>,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, emoji) = Self::decoration(record.level());

            // stdout carries JSON, logs go to stderr
            let _ = writeln!(std::io::stderr(), "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "scriptvox", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    // Command line log level applies before the config is read
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;
    let controller = Controller::with_config(config.clone())?;

    let responses = match cli.command {
        Commands::Process { input_path, mode, lang } => {
            let text = read_input(input_path.as_deref())?;
            let mode: ProcessingMode = mode.into();
            let body = RequestBody {
                text: Some(text),
                mode: Some(mode.to_string()),
                lang: Some(lang.unwrap_or_else(|| config.target_language.clone())),
            };
            vec![controller.handle(body).await]
        }
        Commands::Request { input_path } => {
            let json = read_input(input_path.as_deref())?;
            vec![controller.handle_json(&json).await]
        }
        Commands::Batch { input_path } => {
            let input = read_input(Some(&input_path))?;
            controller.handle_batch(&input).await
        }
        Commands::Check => {
            controller
                .test_connection()
                .await
                .map_err(|e| AppError::Connection(format!("{:#}", e)))?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    let mut stdout = std::io::stdout().lock();
    for response in &responses {
        let line = if cli.pretty {
            serde_json::to_string_pretty(response).context("Failed to encode response")?
        } else {
            response.to_json()
        };
        writeln!(stdout, "{}", line)?;
    }

    if responses.iter().all(ResponseBody::is_success) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Load the config file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(Path::new(&cli.config_path))?;

    if let Some(provider) = &cli.provider {
        config.engines.set_provider(provider.clone().into());
    }
    if let Some(model) = &cli.model {
        config.engines.set_model(model);
    }

    match &cli.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    config
        .validate()
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;
    debug!(
        "Engines: translation={} ({}), summarization={} ({})",
        config.engines.translation.provider.display_name(),
        config.engines.translation.model,
        config.engines.summarization.provider.display_name(),
        config.engines.summarization.model
    );

    Ok(config)
}

/// Read a file, or stdin when no path is given
fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| AppError::File(format!("Failed to read input file {:?}: {}", path, e))),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
