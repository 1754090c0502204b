//! Anonymization module for Hitoku
//!
//! Reversible redaction of Japanese business text. Sensitive spans are
//! replaced by `<<xxxxxxxx>>` tokens derived from SHA-256, and every token
//! can be mapped back to its plaintext through the hash vault.
//!
//! # Architecture
//!
//! The anonymization pipeline consists of:
//! - **Annotation**: tokens, entities and noun chunks from an [`Annotator`]
//! - **Detection**: an ordered cascade of span extractors
//! - **Resolution**: longest-wins selection of non-overlapping spans
//! - **Tokenization**: deterministic hashing with a reverse map for decoding
//! - **Learning**: literals remembered across documents
//!
//! # Usage
//!
//! ```rust,no_run
//! use hitoku::anonymization::{AnonymizationConfig, AnonymizationEngine, LexiconAnnotator};
//!
//! # fn example() -> hitoku::Result<()> {
//! let annotator = LexiconAnnotator::new([("東京都渋谷区", "GPE")]);
//! let mut engine = AnonymizationEngine::new(AnonymizationConfig::default(), Box::new(annotator))?;
//! let anonymized = engine.anonymize("本社は東京都渋谷区です")?;
//! println!("{}", engine.decode(&anonymized));
//! # Ok(())
//! # }
//! ```

pub mod annotator;
pub mod anonymizer;
pub mod config;
pub mod detector;
pub mod engine;
pub mod learning;
pub mod models;
pub mod report;

// Re-export main types
pub use annotator::{Annotation, Annotator, LexiconAnnotator};
pub use config::AnonymizationConfig;
pub use engine::AnonymizationEngine;
pub use learning::LearningStore;
pub use models::{AnonymizedText, CandidateSpan, ExtractorKind};
pub use report::Statistics;
