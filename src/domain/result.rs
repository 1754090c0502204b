//! Result type alias for Hitoku
//!
//! Uses [`HitokuError`] as the error type for every fallible operation.

use super::errors::HitokuError;

/// Result type alias for Hitoku operations
///
/// # Examples
///
/// ```
/// use hitoku::domain::result::Result;
/// use hitoku::domain::errors::HitokuError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(HitokuError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HitokuError>;
