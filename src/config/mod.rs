//! Configuration management for hitoku.
//!
//! TOML configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HITOKU_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hitoku::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hitoku.toml")?;
//! println!("Passes: {:?}", config.anonymization.pass_order);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`AnonymizationConfig`] - Pass order, target labels, dry run, pattern library
//! - [`LoggingConfig`] - Local file logging and rotation
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymization]
//! dry_run = false
//! pass_order = ["identifier", "pattern", "money", "tech_stack",
//!               "department", "project", "nlp_entity", "learned_chunk"]
//! target_labels = ["PERSON", "ORG", "GPE", "LOC", "PRODUCT"]
//! pattern_library = "${HITOKU_PATTERNS}"
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;

pub use crate::anonymization::config::AnonymizationConfig;
pub use loader::load_config;
pub use schema::{ApplicationConfig, HitokuConfig, LoggingConfig};
