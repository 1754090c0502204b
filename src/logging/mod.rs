//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - console output filtered by level or `RUST_LOG`
//! - optional JSON file logs with rotation
//!
//! Log records carry counts, offsets, extractor kinds and tokens. They
//! never carry the plaintext of a redacted span.
//!
//! # Example
//!
//! ```no_run
//! use hitoku::logging::init_logging;
//! use hitoku::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the completion of one extractor pass
///
/// # Example
///
/// ```no_run
/// use hitoku::log_pass_complete;
/// use hitoku::anonymization::models::ExtractorKind;
/// use std::time::Duration;
///
/// log_pass_complete!(ExtractorKind::Money, 3, Duration::from_micros(250));
/// ```
#[macro_export]
macro_rules! log_pass_complete {
    ($kind:expr, $count:expr, $duration:expr) => {
        tracing::debug!(
            pass = %$kind,
            candidates = $count,
            duration_us = $duration.as_micros() as u64,
            "Extractor pass completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use hitoku::log_error_with_context;
/// use hitoku::domain::HitokuError;
///
/// let error = HitokuError::Annotation("model unavailable".to_string());
/// log_error_with_context!(&error, "Failed to annotate document");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::anonymization::models::ExtractorKind;
    use crate::domain::HitokuError;
    use std::time::Duration;

    #[test]
    fn test_macros_without_subscriber() {
        log_pass_complete!(ExtractorKind::Department, 2usize, Duration::from_millis(1));
        let error = HitokuError::Validation("empty input".to_string());
        log_error_with_context!(&error, "while testing");
    }
}
