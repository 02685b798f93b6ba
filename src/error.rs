//! Error types for the competition engine
//!
//! Every failure the engine reports is a point-in-time rejection. None of them
//! is retried and none of them leaves the state half-modified.

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CompetitionError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompetitionError {
    /// Rejected input: team size, names, unknown members, import rows, speed times
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    /// Out-of-range configuration: hold counts, class names, slot numbers
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Snapshot could not be read or written
    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl CompetitionError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}
