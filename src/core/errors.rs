//! Error types for page-structure analysis.
//!
//! The page transformation itself is total: every stage returns a (possibly
//! degenerate) result rather than failing. The only fallible surface is
//! configuration, checked once when an analyzer is constructed.

use thiserror::Error;

/// Errors that can occur when setting up page-structure analysis.
#[derive(Error, Debug)]
pub enum StructError {
    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error indicating invalid input to a validation helper.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },
}

impl StructError {
    /// Creates a configuration error with the given message.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates an invalid-input error with the given message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Convenient result alias for structure-analysis operations.
pub type StructResult<T> = Result<T, StructError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StructError::config_error("acceptance_threshold out of range");
        assert_eq!(
            err.to_string(),
            "configuration: acceptance_threshold out of range"
        );

        let err = StructError::invalid_input("page_width must be positive");
        assert_eq!(err.to_string(), "invalid input: page_width must be positive");
    }
}
