// Hitoku - Reversible redaction for Japanese business text
// Copyright (c) 2025 Hitoku Contributors
// Licensed under the MIT License

//! # Hitoku - Reversible redaction for Japanese business text
//!
//! Hitoku replaces personal and confidential information in Japanese
//! business documents with short hash tokens, and restores the original
//! text from those tokens on demand.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** sensitive spans with an ordered cascade of extractors
//! - **Redacting** them into `<<xxxxxxxx>>` tokens while keeping titles,
//!   honorifics and money separators readable
//! - **Decoding** tokenized text back to the original
//! - **Learning** sensitive literals from earlier documents
//!
//! ## Architecture
//!
//! - [`anonymization`] - Engine, extractors, resolver, vault and learning store
//! - [`config`] - Configuration management
//! - [`domain`] - Error and result types
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hitoku::anonymization::{AnonymizationEngine, LexiconAnnotator};
//! use hitoku::config::load_config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("hitoku.toml")?;
//!     let _guard = hitoku::logging::init_logging(&config.application.log_level, &config.logging)?;
//!
//!     let annotator = LexiconAnnotator::new([("山田太郎社長", "PERSON")]);
//!     let mut engine = AnonymizationEngine::new(config.anonymization, Box::new(annotator))?;
//!
//!     let anonymized = engine.anonymize("山田太郎社長の連絡先は03-1234-5678です")?;
//!     println!("{anonymized}");
//!     println!("{}", engine.decode(&anonymized));
//!     Ok(())
//! }
//! ```
//!
//! ## Learning
//!
//! Literals seen in one document can be redacted in later ones, even when
//! the annotator no longer flags them as entities:
//!
//! ```rust,no_run
//! use hitoku::anonymization::{AnonymizationConfig, AnonymizationEngine, LexiconAnnotator};
//! use std::collections::HashMap;
//!
//! # fn example() -> hitoku::Result<()> {
//! let mut engine =
//!     AnonymizationEngine::new(AnonymizationConfig::default(), Box::new(LexiconAnnotator::default()))?;
//!
//! let known = HashMap::from([("ブルーオーシャン".to_string(), "PROJECT".to_string())]);
//! engine.learn("コードネームはブルーオーシャンです", Some(&known))?;
//!
//! let anonymized = engine.anonymize("ブルーオーシャンの進捗")?;
//! assert!(!anonymized.contains("ブルーオーシャン"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Hitoku uses the [`domain::HitokuError`] type for all errors:
//!
//! ```rust,no_run
//! use hitoku::domain::HitokuError;
//!
//! fn example() -> Result<(), HitokuError> {
//!     let config = hitoku::config::load_config("hitoku.toml")?;
//!     let _ = config.anonymization.pass_order;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Hitoku uses structured logging with the `tracing` crate. Log records
//! carry counts, offsets and extractor kinds, never redacted plaintext.

pub mod anonymization;
pub mod config;
pub mod domain;
pub mod logging;

pub use anonymization::{AnonymizationConfig, AnonymizationEngine};
pub use domain::{HitokuError, Result};
