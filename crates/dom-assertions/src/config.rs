//! Assertion configuration.

use serde::{Deserialize, Serialize};

/// Attributes treated as HTML boolean attributes by default
pub const DEFAULT_BOOLEAN_ATTRIBUTES: &[&str] = &["readonly", "required"];

/// What a dynamic call does when its name has no known prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCallPolicy {
    /// Return `DomError::UnknownCall` (default)
    #[default]
    Reject,
    /// Log a warning and return the assertion unchanged
    Ignore,
}

/// Configuration carried by every assertion scope of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertConfig {
    /// Handling of unrecognised dynamic call names
    pub unknown_calls: UnknownCallPolicy,
    /// Attributes whose bare presence normalizes to `true`
    pub boolean_attributes: Vec<String>,
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            unknown_calls: UnknownCallPolicy::default(),
            boolean_attributes: DEFAULT_BOOLEAN_ATTRIBUTES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

impl AssertConfig {
    /// Create a new config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown call policy
    #[must_use]
    pub const fn with_unknown_calls(mut self, policy: UnknownCallPolicy) -> Self {
        self.unknown_calls = policy;
        self
    }

    /// Treat an additional attribute as boolean
    #[must_use]
    pub fn with_boolean_attribute(mut self, name: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        if !self.boolean_attributes.contains(&name) {
            self.boolean_attributes.push(name);
        }
        self
    }
}
