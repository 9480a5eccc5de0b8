//! tracing-subscriber setup
//!
//! stdout in `pretty` or `json`, an optional daily-rotated JSON file in
//! `log_dir`, and the optional OTLP layer.

use crate::config::{LogFormat, Settings};
use crate::telemetry;
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

const LOG_FILE_PREFIX: &str = "phresh-marketplace.log";

/// Keeps the file writer flushing until dropped
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

pub fn init(settings: &Settings) -> Result<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .with_context(|| format!("Invalid log filter: {}", settings.log_filter))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    layers.push(match settings.log_format {
        // Production: JSON structured logging
        LogFormat::Json => fmt::layer().json().boxed(),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    });

    let file_guard = match settings.log_dir() {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir))?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    if let Some(otel) = telemetry::layer(settings)? {
        layers.push(otel);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LoggingGuard { _file: file_guard })
}
