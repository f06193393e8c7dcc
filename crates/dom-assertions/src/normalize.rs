//! Attribute values, attribute maps and their normalization.
//!
//! Expected values written by a test and actual values read from markup go
//! through the same [`Normalizer`] before they are compared, so
//! `class="b a"` equals `class="a b"` and a bare `required` equals
//! `required="required"` equals `true`.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::{AssertConfig, DEFAULT_BOOLEAN_ATTRIBUTES};

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean attribute state (`required`, `readonly`, ...)
    Flag(bool),
    /// Textual value as written in markup
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for AttributeValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Ordered attribute name to value mapping.
///
/// Keys are unique; inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributeMap {
    /// Create an empty map
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace an attribute
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up an attribute
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Whether the attribute is present
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of attributes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no attributes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// `self \ actual == ∅`: every pair here is present and equal in `actual`.
    ///
    /// Both maps are expected to be normalized already.
    #[must_use]
    pub fn is_subset_of(&self, actual: &Self) -> bool {
        self.iter()
            .all(|(name, value)| actual.get(name) == Some(value))
    }

    /// Pretty JSON rendering used in failure messages
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<K: Into<String>, V: Into<AttributeValue>, const N: usize> From<[(K, V); N]> for AttributeMap {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> From<Vec<(K, V)>> for AttributeMap {
    fn from(entries: Vec<(K, V)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<&AttributeMap> for AttributeMap {
    fn from(map: &AttributeMap) -> Self {
        map.clone()
    }
}

/// Build an [`AttributeMap`] with mixed value types.
///
/// ```
/// use dom_assertions::attrs;
///
/// let expected = attrs! { "type" => "email", "required" => true };
/// assert_eq!(expected.len(), 2);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::AttributeMap::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::AttributeMap::new();
        $( map.insert($name, $value); )+
        map
    }};
}

/// Canonicalizes attribute values before comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    boolean_attributes: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_BOOLEAN_ATTRIBUTES.iter().copied())
    }
}

impl Normalizer {
    /// Create a normalizer with the given boolean attribute names
    #[must_use]
    pub fn new<I, S>(boolean_attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            boolean_attributes: boolean_attributes
                .into_iter()
                .map(|name| name.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Create a normalizer from an assertion config
    #[must_use]
    pub fn from_config(config: &AssertConfig) -> Self {
        Self::new(config.boolean_attributes.iter().cloned())
    }

    /// Whether `name` is a boolean attribute for this normalizer
    #[must_use]
    pub fn is_boolean_attribute(&self, name: &str) -> bool {
        self.boolean_attributes
            .iter()
            .any(|known| known.eq_ignore_ascii_case(name))
    }

    /// Normalize a single attribute value
    #[must_use]
    pub fn normalize_attribute_value(&self, name: &str, value: AttributeValue) -> AttributeValue {
        match value {
            AttributeValue::Text(text) if name == "class" => {
                AttributeValue::Text(normalize_class(&text))
            }
            AttributeValue::Text(text)
                if self.is_boolean_attribute(name)
                    && (text.is_empty() || text.eq_ignore_ascii_case(name)) =>
            {
                AttributeValue::Flag(true)
            }
            other => other,
        }
    }

    /// Normalize every entry of a map, keeping key order
    #[must_use]
    pub fn normalize_attributes(&self, attributes: &AttributeMap) -> AttributeMap {
        attributes
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    self.normalize_attribute_value(name, value.clone()),
                )
            })
            .collect()
    }
}

/// Normalize a value with the default boolean attribute set
#[must_use]
pub fn normalize_attribute_value(name: &str, value: AttributeValue) -> AttributeValue {
    Normalizer::default().normalize_attribute_value(name, value)
}

/// Normalize a map with the default boolean attribute set
#[must_use]
pub fn normalize_attributes(attributes: &AttributeMap) -> AttributeMap {
    Normalizer::default().normalize_attributes(attributes)
}

fn normalize_class(class: &str) -> String {
    let mut tokens: Vec<&str> = class.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
