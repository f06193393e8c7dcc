//! Call-name dispatch.
//!
//! Turns free-form call names such as `containsTextarea`,
//! `doesnt_contain_input` or `hasAriaLabel` into a [`DynamicCall`] once, at
//! the call boundary. Executing the call is up to
//! [`ElementAsserts::call`](crate::ElementAsserts::call).

use std::sync::OnceLock;

use regex::Regex;

use crate::normalize::{AttributeMap, AttributeValue};

const CONTAINS: &str = "contains";
const DOESNT_CONTAIN: &str = "doesntContain";
const DOESNT_CONTAIN_SNAKE: &str = "doesnt_contain";
const HAS: &str = "has";

/// A parsed call name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicCall {
    /// `contains<Element>`
    Contains(String),
    /// `doesntContain<Element>`
    DoesntContain(String),
    /// `has<Attribute>`
    HasAttribute(String),
}

impl DynamicCall {
    /// Parse a call name; `None` when no prefix matches.
    ///
    /// The prefixes are mutually exclusive, so at most one rule applies.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(rest) = name.strip_prefix(CONTAINS) {
            return non_empty(element_identifier(rest)).map(Self::Contains);
        }
        if let Some(rest) = name
            .strip_prefix(DOESNT_CONTAIN)
            .or_else(|| name.strip_prefix(DOESNT_CONTAIN_SNAKE))
        {
            return non_empty(element_identifier(rest)).map(Self::DoesntContain);
        }
        if let Some(rest) = name.strip_prefix(HAS) {
            return non_empty(attribute_identifier(rest)).map(Self::HasAttribute);
        }
        None
    }
}

fn non_empty(identifier: String) -> Option<String> {
    (!identifier.is_empty()).then_some(identifier)
}

/// Argument passed along with a dynamic call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CallArg {
    /// No argument
    #[default]
    None,
    /// Expected attributes for `contains` / `doesntContain`
    Attributes(AttributeMap),
    /// Expected value for `has`
    Value(AttributeValue),
}

impl From<()> for CallArg {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<AttributeMap> for CallArg {
    fn from(map: AttributeMap) -> Self {
        Self::Attributes(map)
    }
}

impl<K: Into<String>, V: Into<AttributeValue>, const N: usize> From<[(K, V); N]> for CallArg {
    fn from(entries: [(K, V); N]) -> Self {
        Self::Attributes(entries.into())
    }
}

impl From<AttributeValue> for CallArg {
    fn from(value: AttributeValue) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for CallArg {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for CallArg {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<bool> for CallArg {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

/// `Textarea` -> `textarea`, `DatalistOption` -> `datalistOption`,
/// `_text_area` -> `textArea`
#[must_use]
pub fn element_identifier(raw: &str) -> String {
    let studly: String = raw
        .split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(upper_first)
        .collect();
    lower_first(&studly)
}

/// `AriaLabel` -> `aria-label`, `_data_test_id` -> `data-test-id`
#[must_use]
pub fn attribute_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;

    for c in raw.trim_start_matches(['_', '-']).chars() {
        if c == '_' || c == '-' {
            if !out.ends_with('-') {
                out.push('-');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    out.trim_end_matches('-').to_string()
}

/// Whether `selector` is a bare element type (`^\w+$`) rather than a
/// selector with combinators, attributes or pseudo-classes
#[must_use]
#[allow(clippy::expect_used)]
pub fn is_plain_element_name(selector: &str) -> bool {
    static PLAIN: OnceLock<Regex> = OnceLock::new();
    PLAIN
        .get_or_init(|| Regex::new(r"^\w+$").expect("valid pattern"))
        .is_match(selector)
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}
