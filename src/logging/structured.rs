//! Structured logging setup
//!
//! A console layer is always installed. When `logging.local_enabled` is
//! set, JSON records are also written to `<local_path>/hitoku.log.<period>`
//! through a non-blocking rolling appender.
//!
//! # Example
//!
//! ```no_run
//! use hitoku::logging::init_logging;
//! use hitoku::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//! ```

use crate::config::LoggingConfig;
use crate::domain::{HitokuError, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// File name prefix of rotated log files
pub const LOG_FILE_PREFIX: &str = "hitoku.log";

const ROTATIONS: [(&str, Rotation); 3] = [
    ("daily", Rotation::DAILY),
    ("hourly", Rotation::HOURLY),
    ("never", Rotation::NEVER),
];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the file writer thread alive; buffered records are flushed on drop
pub struct LoggingGuard {
    file_writer: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Whether a file writer is attached
    pub fn has_file_writer(&self) -> bool {
        self.file_writer.is_some()
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `level` when set. The subscriber can
/// only be installed once per process; a second call returns a
/// configuration error.
///
/// # Arguments
///
/// * `level` - Log level (trace, debug, info, warn, error)
/// * `config` - Logging configuration
///
/// # Errors
///
/// Returns [`HitokuError::Configuration`] if the level or rotation is
/// invalid, the log directory cannot be created, or a subscriber is
/// already installed.
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hitoku={level}")));

    let mut layers = vec![console_layer(filter.clone())];
    let file_writer = if config.local_enabled {
        let (layer, guard) = file_layer(config, filter)?;
        layers.push(layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| HitokuError::Configuration(format!("Failed to install log subscriber: {e}")))?;

    tracing::info!(
        level = %level,
        file_logging = config.local_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard { file_writer })
}

fn console_layer(filter: EnvFilter) -> BoxedLayer {
    tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(filter)
        .boxed()
}

fn file_layer(config: &LoggingConfig, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard)> {
    let rotation = parse_rotation(&config.local_rotation)?;
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        HitokuError::Configuration(format!(
            "Failed to create log directory {}: {e}",
            config.local_path
        ))
    })?;

    let appender = RollingFileAppender::new(rotation, &config.local_path, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_target(true)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();

    Ok((layer, guard))
}

/// Parse a log level name, ignoring case
pub(crate) fn parse_log_level(level: &str) -> Result<Level> {
    let valid = ["trace", "debug", "info", "warn", "error"];
    if !valid.iter().any(|name| name.eq_ignore_ascii_case(level)) {
        return Err(HitokuError::Configuration(format!(
            "Invalid log level '{level}'. Must be one of: {}",
            valid.join(", ")
        )));
    }
    level
        .parse()
        .map_err(|e| HitokuError::Configuration(format!("Invalid log level '{level}': {e}")))
}

fn parse_rotation(rotation: &str) -> Result<Rotation> {
    ROTATIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(rotation))
        .map(|(_, value)| value.clone())
        .ok_or_else(|| {
            HitokuError::Configuration(format!(
                "Invalid log rotation '{rotation}'. Must be one of: daily, hourly, never"
            ))
        })
}
