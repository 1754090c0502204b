//! Domain error and result types for Hitoku.
//!
//! All fallible operations return [`Result<T, HitokuError>`]:
//!
//! ```rust
//! use hitoku::domain::{HitokuError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = hitoku::config::load_config("hitoku.toml")?;
//!     let _ = config.anonymization.dry_run;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::HitokuError;
pub use result::Result;
