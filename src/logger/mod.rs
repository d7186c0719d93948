//! Logging built on `tracing-subscriber`.
//!
//! - console output with color control
//! - optional file output (full, compact or JSON) through a size-rotating writer
//! - gzip compression of rotated files

pub mod compression;
pub mod config;
pub mod error;
pub mod rotation;
pub(crate) mod writer;

pub use config::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig, RotationConfig};
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::RotatingFileWriter;

/// Installs the global subscriber described by `config`.
///
/// `RUST_LOG`, when set, takes precedence over `config.level`.
pub fn init_logger(config: &LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggerError::config(format!("invalid level directive: {}", e)))?;

    let file_layer = if config.file.enabled {
        Some(file_layer(&config.file)?)
    } else {
        None
    };

    let console_layer = config.console.enabled.then(|| {
        let use_ansi = config.console.colored && std::io::stdout().is_terminal();
        fmt::layer()
            .with_ansi(use_ansi)
            .with_target(true)
            .with_level(true)
    });

    // File layer goes before the console layer so ANSI codes from span fields
    // do not leak into the file (tokio-rs/tracing#1817).
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized {
            message: e.to_string(),
        })
}

fn file_layer<S>(config: &FileConfig) -> Result<Box<dyn Layer<S> + Send + Sync>, LoggerError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let writer = RotatingFileWriter::new(config)?;

    let layer = match config.format {
        LogFormat::Full => fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .compact()
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_ansi(false)
            .json()
            .with_writer(writer)
            .boxed(),
    };

    Ok(layer)
}
