//! Domain error types
//!
//! This module defines the error hierarchy for Hitoku. Errors carry
//! descriptive strings and never expose third-party error types.

use thiserror::Error;

/// Main Hitoku error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum HitokuError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid pattern or vocabulary in the pattern library
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// The NLP annotation collaborator failed or is unavailable
    #[error("Annotation error: {0}")]
    Annotation(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl HitokuError {
    /// Wraps a collaborator error, keeping its whole context chain
    pub fn annotation(err: anyhow::Error) -> Self {
        HitokuError::Annotation(format!("{err:#}"))
    }
}

impl From<std::io::Error> for HitokuError {
    fn from(err: std::io::Error) -> Self {
        HitokuError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HitokuError {
    fn from(err: serde_json::Error) -> Self {
        HitokuError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for HitokuError {
    fn from(err: toml::de::Error) -> Self {
        HitokuError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<regex::Error> for HitokuError {
    fn from(err: regex::Error) -> Self {
        HitokuError::Pattern(err.to_string())
    }
}

impl From<fancy_regex::Error> for HitokuError {
    fn from(err: fancy_regex::Error) -> Self {
        HitokuError::Pattern(err.to_string())
    }
}
