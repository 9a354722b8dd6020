//! Error types for simulation operations.
//!
//! Configuration problems abort construction with a descriptive failure;
//! persistence problems are reported to the caller with core state left
//! unchanged. Out-of-range runtime commands are not errors at all: they are
//! clamped and surfaced as warnings, since a long-running simulation must
//! not crash mid-generation.

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that can occur while constructing or persisting a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is outside its valid range.
    #[error("invalid value for {field}: {value} ({reason})")]
    Config {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value, rendered as text.
        value: String,
        /// Why the value is invalid.
        reason: &'static str,
    },

    /// A saved model is malformed or incompatible with the configuration.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// An underlying I/O failure while reading or writing a model file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization failure while encoding or decoding a model file.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Convenience constructor for configuration errors.
    pub fn config(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        SimError::Config {
            field,
            value: value.to_string(),
            reason,
        }
    }
}
