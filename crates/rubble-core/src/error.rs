//! Error types for the simulation core.
//!
//! The simulation itself never errors — invariant violations are resolved
//! by defensive clamping. Config loading is the only fallible surface.

use thiserror::Error;

/// Errors raised while loading or validating tuning config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tuning file was not valid JSON.
    #[error("failed to parse tuning config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A tuning value is outside its allowed range.
    #[error("invalid tuning value for `{field}`: {message}")]
    InvalidValue {
        /// Field that failed validation.
        field: &'static str,
        /// What went wrong.
        message: String,
    },
}
