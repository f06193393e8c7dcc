//! Fluent assertions over a scoped document.
//!
//! Every assertion scope ([`DomAssert`], [`ElementAssert`], [`FormAssert`],
//! [`SelectAssert`]) owns an [`AssertCore`] and gets the shared assertion
//! surface from [`ElementAsserts`].

mod element;
mod form;
mod page;
mod select;

pub use element::ElementAssert;
pub use form::FormAssert;
pub use page::DomAssert;
pub use select::SelectAssert;

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::assertion::Assertion;
use crate::config::{AssertConfig, UnknownCallPolicy};
use crate::dispatch::{is_plain_element_name, CallArg, DynamicCall};
use crate::normalize::{AttributeMap, AttributeValue, Normalizer};
use crate::parser::{ElementHandle, ScopedParser};
use crate::result::{DomError, DomResult};

/// Per element type, the normalized attributes of every matching element.
///
/// Filled lazily on the first attribute query for a type and kept for the
/// lifetime of the owning assertion.
#[derive(Debug, Clone, Default)]
pub struct AttributeCache {
    entries: HashMap<String, Vec<AttributeMap>>,
}

impl AttributeCache {
    /// Cached attribute maps for an element type
    #[must_use]
    pub fn get(&self, element: &str) -> Option<&[AttributeMap]> {
        self.entries.get(element).map(Vec::as_slice)
    }

    /// Whether an element type has been gathered
    #[must_use]
    pub fn contains(&self, element: &str) -> bool {
        self.entries.contains_key(element)
    }

    /// Number of gathered element types
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been gathered yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State shared by every assertion scope: parser, config and cache
#[derive(Debug, Clone)]
pub struct AssertCore {
    parser: ScopedParser,
    config: AssertConfig,
    normalizer: Normalizer,
    cache: AttributeCache,
}

impl AssertCore {
    /// Create a core over `parser` with an empty cache
    #[must_use]
    pub fn new(parser: ScopedParser, config: AssertConfig) -> Self {
        let normalizer = Normalizer::from_config(&config);
        Self {
            parser,
            config,
            normalizer,
            cache: AttributeCache::default(),
        }
    }

    /// The scoped parser
    #[must_use]
    pub const fn parser(&self) -> &ScopedParser {
        &self.parser
    }

    /// The assertion config
    #[must_use]
    pub const fn config(&self) -> &AssertConfig {
        &self.config
    }

    /// The attribute normalizer
    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The attribute cache of this scope
    #[must_use]
    pub const fn attribute_cache(&self) -> &AttributeCache {
        &self.cache
    }

    /// A fresh core scoped to `handle`, same config, empty cache
    #[must_use]
    pub fn scoped(&self, handle: &ElementHandle) -> Self {
        Self::new(self.parser.scoped_to(handle), self.config.clone())
    }

    /// First match for `selector`, or an assertion failure with `message`
    pub fn require(
        &self,
        selector: &str,
        message: impl FnOnce() -> String,
    ) -> DomResult<ElementHandle> {
        self.parser
            .query(selector)?
            .ok_or_else(|| DomError::assertion(message()))
    }

    /// Normalized attribute of any handle.
    ///
    /// `text` on an `option` element reads its trimmed text content.
    #[must_use]
    pub fn attribute_of(&self, handle: &ElementHandle, name: &str) -> Option<AttributeValue> {
        let raw = self.parser.get_attribute_for(handle, name);
        if raw.is_none() && name == "text" && handle.name() == "option" {
            return Some(AttributeValue::Text(handle.text().trim().to_string()));
        }
        raw.map(|raw| self.normalizer.normalize_attribute_value(name, raw.into()))
    }

    /// Normalized attribute of the scope root
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<AttributeValue> {
        if name == "text"
            && self.parser.get_type() == "option"
            && !self.parser.has_attribute_for_root("text")
        {
            return Some(AttributeValue::Text(self.parser.get_text().trim().to_string()));
        }
        self.parser
            .get_attribute_for_root(name)
            .map(|raw| self.normalizer.normalize_attribute_value(name, raw.into()))
    }

    fn gather_attributes(&self, element: &str) -> DomResult<Vec<AttributeMap>> {
        let maps: Vec<AttributeMap> = self
            .parser
            .query_all(element)?
            .iter()
            .map(|handle| {
                let mut map: AttributeMap = self
                    .parser
                    .attributes_for(handle)
                    .into_iter()
                    .map(|(name, raw)| {
                        let value = self.normalizer.normalize_attribute_value(&name, raw.into());
                        (name, value)
                    })
                    .collect();
                if handle.name() == "option" && !map.contains_key("text") {
                    map.insert("text", handle.text().trim());
                }
                map
            })
            .collect();
        debug!(element, count = maps.len(), "gathered attributes");
        Ok(maps)
    }

    fn gathered(&mut self, element: &str) -> DomResult<&[AttributeMap]> {
        if !self.cache.contains(element) {
            let maps = self.gather_attributes(element)?;
            self.cache.entries.insert(element.to_string(), maps);
        }
        Ok(self.cache.get(element).unwrap_or_default())
    }

    /// Assert the root's attribute equals `expected` after normalization
    pub fn has(&self, attribute: &str, expected: AttributeValue) -> DomResult<()> {
        let message = format!("Could not find an attribute {attribute} with value {expected}");
        let expected = self
            .normalizer
            .normalize_attribute_value(attribute, expected);
        let actual = self.get_attribute(attribute);
        Assertion::equals(&Some(expected), &actual, &message).into_result()
    }

    /// Assert a matching element exists and, when attributes are given,
    /// that one such element carries all of them
    pub fn contains(&mut self, element: &str, attributes: &AttributeMap) -> DomResult<()> {
        let handle = self.require(element, || {
            format!("Could not find any matching element of type \"{element}\"")
        })?;

        if attributes.is_empty() {
            return Ok(());
        }

        let expected = self.normalizer.normalize_attributes(attributes);

        if !is_plain_element_name(element) {
            for (name, value) in expected.iter() {
                let actual = self.attribute_of(&handle, name);
                Assertion::equals(
                    &Some(value),
                    &actual.as_ref(),
                    &format!("Could not find attribute \"{name}\" with value \"{value}\""),
                )
                .into_result()?;
            }
            return Ok(());
        }

        let found = self
            .gathered(element)?
            .iter()
            .any(|actual| expected.is_subset_of(actual));

        Assertion::is_true(
            found,
            &format!(
                "Could not find a matching {element} with data: {}",
                attributes.to_pretty_json()?
            ),
        )
        .into_result()
    }

    /// Assert no element matches, or none carries all of `attributes`
    pub fn doesnt_contain(&mut self, element: &str, attributes: &AttributeMap) -> DomResult<()> {
        if attributes.is_empty() {
            return Assertion::null(
                &self.parser.query(element)?,
                &format!("Found a matching element of type \"{element}\""),
            )
            .into_result();
        }

        let expected = self.normalizer.normalize_attributes(attributes);

        if !is_plain_element_name(element) {
            if let Some(handle) = self.parser.query(element)? {
                for (name, value) in expected.iter() {
                    let actual = self.attribute_of(&handle, name);
                    Assertion::equals(
                        &Some(value),
                        &actual.as_ref(),
                        &format!("Found attribute \"{name}\" with value \"{value}\""),
                    )
                    .into_result()?;
                }
            }
        }

        let found = self
            .gathered(element)?
            .iter()
            .any(|actual| expected.is_subset_of(actual));

        Assertion::is_false(
            found,
            &format!(
                "Found a matching {element} with data: {}",
                attributes.to_pretty_json()?
            ),
        )
        .into_result()
    }

    /// Assert the root element type
    pub fn is(&self, element_type: &str) -> DomResult<()> {
        Assertion::equals(
            element_type,
            self.parser.get_type().as_str(),
            &format!("Element is not of type \"{element_type}\""),
        )
        .into_result()
    }

    /// Execute a parsed-at-the-boundary dynamic call
    pub fn call(&mut self, name: &str, arg: CallArg) -> DomResult<()> {
        let Some(call) = DynamicCall::parse(name) else {
            return match self.config.unknown_calls {
                UnknownCallPolicy::Reject => Err(DomError::UnknownCall {
                    name: name.to_string(),
                }),
                UnknownCallPolicy::Ignore => {
                    warn!(call = name, "ignoring unknown assertion call");
                    Ok(())
                }
            };
        };
        trace!(call = name, parsed = ?call, "dispatching assertion call");

        match (call, arg) {
            (DynamicCall::Contains(element), CallArg::None) => {
                self.contains(&element, &AttributeMap::new())
            }
            (DynamicCall::Contains(element), CallArg::Attributes(attributes)) => {
                self.contains(&element, &attributes)
            }
            (DynamicCall::DoesntContain(element), CallArg::None) => {
                self.doesnt_contain(&element, &AttributeMap::new())
            }
            (DynamicCall::DoesntContain(element), CallArg::Attributes(attributes)) => {
                self.doesnt_contain(&element, &attributes)
            }
            (DynamicCall::HasAttribute(attribute), CallArg::Value(value)) => {
                self.has(&attribute, value)
            }
            (DynamicCall::HasAttribute(_), _) => Err(DomError::InvalidArgument {
                call: name.to_string(),
                message: "expected a single attribute value".to_string(),
            }),
            (_, CallArg::Value(_)) => Err(DomError::InvalidArgument {
                call: name.to_string(),
                message: "expected an attribute map".to_string(),
            }),
        }
    }
}

/// The assertion surface shared by every scope.
///
/// Each method returns the scope itself so calls chain with `?`.
pub trait ElementAsserts: Sized {
    /// Shared assertion state
    fn core(&self) -> &AssertCore;

    /// Shared assertion state, mutably (the attribute cache fills lazily)
    fn core_mut(&mut self) -> &mut AssertCore;

    /// Assert the scope root has `attribute` equal to `value`
    fn has(&mut self, attribute: &str, value: impl Into<AttributeValue>) -> DomResult<&mut Self> {
        self.core().has(attribute, value.into())?;
        Ok(self)
    }

    /// Assert an element matching `element` exists with `attributes`
    fn contains(
        &mut self,
        element: &str,
        attributes: impl Into<AttributeMap>,
    ) -> DomResult<&mut Self> {
        let attributes = attributes.into();
        self.core_mut().contains(element, &attributes)?;
        Ok(self)
    }

    /// Assert an element matching `element` exists and run `callback`
    /// against it
    fn contains_with<F>(&mut self, element: &str, callback: F) -> DomResult<&mut Self>
    where
        F: FnOnce(&mut ElementAssert) -> DomResult<()>,
    {
        let handle = self.core().require(element, || {
            format!("Could not find any matching element of type \"{element}\"")
        })?;
        let mut scoped = ElementAssert::from_core(self.core().scoped(&handle));
        callback(&mut scoped)?;
        Ok(self)
    }

    /// Assert no element matching `element` carries `attributes`
    fn doesnt_contain(
        &mut self,
        element: &str,
        attributes: impl Into<AttributeMap>,
    ) -> DomResult<&mut Self> {
        let attributes = attributes.into();
        self.core_mut().doesnt_contain(element, &attributes)?;
        Ok(self)
    }

    /// Assert the scope root is of `element_type`
    fn is(&mut self, element_type: &str) -> DomResult<&mut Self> {
        self.core().is(element_type)?;
        Ok(self)
    }

    /// Assert `selector` matches and run `callback` scoped to the match
    fn find<F>(&mut self, selector: &str, callback: F) -> DomResult<&mut Self>
    where
        F: FnOnce(&mut ElementAssert) -> DomResult<()>,
    {
        let handle = self.core().require(selector, || {
            format!("Could not find any matching element for \"{selector}\"")
        })?;
        let mut scoped = ElementAssert::from_core(self.core().scoped(&handle));
        callback(&mut scoped)?;
        Ok(self)
    }

    /// Dispatch a call by name: `containsInput`, `doesnt_contain_select`,
    /// `hasAriaLabel`, ...
    fn call(&mut self, name: &str, arg: impl Into<CallArg>) -> DomResult<&mut Self> {
        self.core_mut().call(name, arg.into())?;
        Ok(self)
    }

    /// Normalized attribute of the scope root
    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        self.core().get_attribute(name)
    }

    /// Text content of the scope root
    fn text(&self) -> String {
        self.core().parser().get_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    fn core(html: &str) -> AssertCore {
        AssertCore::new(ScopedParser::new(html), AssertConfig::default())
    }

    #[test]
    fn test_cache_filled_once_per_type() {
        let mut core = core(r#"<input name="a"><input name="b">"#);
        assert!(core.attribute_cache().is_empty());
        core.contains("input", &attrs! { "name" => "b" }).unwrap();
        core.contains("input", &attrs! { "name" => "a" }).unwrap();
        assert_eq!(core.attribute_cache().len(), 1);
        assert_eq!(core.attribute_cache().get("input").unwrap().len(), 2);
    }

    #[test]
    fn test_existence_only_does_not_gather() {
        let mut core = core("<input>");
        core.contains("input", &AttributeMap::new()).unwrap();
        assert!(core.attribute_cache().is_empty());
    }

    #[test]
    fn test_scoped_core_has_fresh_cache() {
        let mut core = core(r#"<form><input name="a"></form>"#);
        core.contains("input", &attrs! { "name" => "a" }).unwrap();
        let form = core.parser().query("form").unwrap().unwrap();
        let scoped = core.scoped(&form);
        assert!(scoped.attribute_cache().is_empty());
        assert_eq!(scoped.config(), core.config());
    }

    #[test]
    fn test_option_text_is_gathered() {
        let mut core = core("<select><option value=\"1\"> One </option></select>");
        core.contains("option", &attrs! { "text" => "One", "value" => "1" })
            .unwrap();
    }

    #[test]
    fn test_attribute_of_normalizes() {
        let core = core(r#"<input required class="b a">"#);
        let input = core.parser().query("input").unwrap().unwrap();
        assert_eq!(core.attribute_of(&input, "required"), Some(AttributeValue::Flag(true)));
        assert_eq!(core.attribute_of(&input, "class"), Some("a b".into()));
        assert_eq!(core.attribute_of(&input, "readonly"), None);
    }

    #[test]
    fn test_failure_message_contains_payload() {
        let mut core = core(r#"<input type="text">"#);
        let err = core
            .contains("input", &attrs! { "type" => "email" })
            .unwrap_err();
        let message = err.failure_message().unwrap();
        assert!(message.starts_with("Could not find a matching input with data:"));
        assert!(message.contains("\"type\": \"email\""));
    }

    #[test]
    fn test_invalid_selector_propagates() {
        let mut core = core("<p></p>");
        let err = core.contains("p[", &AttributeMap::new()).unwrap_err();
        assert!(matches!(err, DomError::InvalidSelector { .. }));
    }

    #[test]
    fn test_selector_form_reads_through_parser() {
        let mut core = core(r#"<select><option value="1" class="y x"> One </option></select>"#);
        core.contains(
            "select option[value]",
            &attrs! { "value" => "1", "class" => "x y", "text" => "One" },
        )
        .unwrap();
        let option = core.parser().query("option").unwrap().unwrap();
        assert_eq!(core.attribute_of(&option, "text"), Some("One".into()));
        assert_eq!(core.attribute_of(&option, "label"), None);
    }
}
