//! Error types for core primitives.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by date, calendar, and day-count primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A date string could not be parsed or a date is out of range.
    #[error("invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string does not match the `<int><D|W|M|Y>` grammar.
    #[error("invalid tenor: {tenor}")]
    InvalidTenor {
        /// The offending tenor string.
        tenor: String,
    },

    /// An unknown day-count, calendar, frequency, or adjustment tag.
    #[error("unsupported convention: {name}")]
    UnsupportedConvention {
        /// The unrecognized tag.
        name: String,
    },

    /// Invalid input outside the date/tenor categories.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid tenor error.
    #[must_use]
    pub fn invalid_tenor(tenor: impl Into<String>) -> Self {
        Self::InvalidTenor {
            tenor: tenor.into(),
        }
    }

    /// Creates an unsupported convention error.
    #[must_use]
    pub fn unsupported_convention(name: impl Into<String>) -> Self {
        Self::UnsupportedConvention { name: name.into() }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 does not exist");
        assert!(err.to_string().contains("invalid date"));

        let err = CoreError::unsupported_convention("ACT/366");
        assert!(err.to_string().contains("ACT/366"));
    }
}
