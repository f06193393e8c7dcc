//! Result and error types for dom-assertions.

use thiserror::Error;

/// Result type for dom-assertions operations
pub type DomResult<T> = Result<T, DomError>;

/// Errors that can occur while asserting on markup
#[derive(Debug, Error)]
pub enum DomError {
    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Selector could not be parsed by the selector engine
    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector {
        /// Selector as written by the caller
        selector: String,
        /// Message from the selector engine
        message: String,
    },

    /// Fragment has no element that survives parsing
    #[error("No element found in fragment {fragment:?}")]
    InvalidFragment {
        /// Fragment as written by the caller
        fragment: String,
    },

    /// Call name did not match any known prefix
    #[error("Unknown assertion call {name:?}")]
    UnknownCall {
        /// Call name as written by the caller
        name: String,
    },

    /// Call was given an argument of the wrong shape
    #[error("Invalid argument for {call}: {message}")]
    InvalidArgument {
        /// Call that rejected the argument
        call: String,
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Whether this is an assertion failure rather than a usage error
    #[must_use]
    pub const fn is_assertion_failure(&self) -> bool {
        matches!(self, Self::AssertionFailed { .. })
    }

    /// The assertion message, if this is an assertion failure
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::AssertionFailed { message } => Some(message),
            _ => None,
        }
    }
}
