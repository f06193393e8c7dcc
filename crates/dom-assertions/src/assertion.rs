//! Assertion primitives shared by every assertion scope.
//!
//! Each primitive produces an [`AssertionResult`]; scopes turn failing
//! results into [`DomError::AssertionFailed`] with `?`.

use std::fmt::Debug;

use crate::result::{DomError, DomResult};

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Convert into a `DomResult`, failing with the stored message
    pub fn into_result(self) -> DomResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(DomError::AssertionFailed {
                message: self.message,
            })
        }
    }
}

/// Assertion helpers
#[derive(Debug)]
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug + ?Sized>(
        expected: &T,
        actual: &T,
        message: &str,
    ) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("{message}\nexpected {expected:?}, got {actual:?}"))
        }
    }

    /// Assert an Option is Some
    #[must_use]
    pub fn not_null<T>(value: &Option<T>, message: &str) -> AssertionResult {
        if value.is_some() {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }

    /// Assert an Option is None
    #[must_use]
    pub fn null<T>(value: &Option<T>, message: &str) -> AssertionResult {
        if value.is_none() {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }

    /// Assert a condition is true
    #[must_use]
    pub fn is_true(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }

    /// Assert a condition is false
    #[must_use]
    pub fn is_false(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::fail(message)
        } else {
            AssertionResult::pass()
        }
    }
}
