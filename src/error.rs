//! Error types for the classification engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific engine scenarios
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Invalid score record: {reason}")]
    InvalidScore { reason: String },

    #[error("Unknown division: {division}")]
    UnknownDivision { division: String },

    #[error("Weibull fit cancelled")]
    FitCancelled,

    #[error("Internal engine error: {message}")]
    InternalError { message: String },
}
