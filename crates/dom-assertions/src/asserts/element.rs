//! Assertions scoped to a single matched element.

use super::{AssertCore, ElementAsserts};
use crate::config::AssertConfig;
use crate::parser::{ElementHandle, ScopedParser};
use crate::result::DomResult;

/// Assertions against one element and its descendants
#[derive(Debug, Clone)]
pub struct ElementAssert {
    core: AssertCore,
}

impl ElementAssert {
    /// Scope a new assertion to `handle`
    #[must_use]
    pub fn new(handle: &ElementHandle, config: AssertConfig) -> Self {
        Self::from_core(AssertCore::new(ScopedParser::from_handle(handle), config))
    }

    /// Scope a new assertion to the leading element of a markup fragment
    pub fn from_fragment(fragment: &str) -> DomResult<Self> {
        Ok(Self::from_core(AssertCore::new(
            ScopedParser::from_fragment(fragment)?,
            AssertConfig::default(),
        )))
    }

    pub(crate) fn from_core(core: AssertCore) -> Self {
        Self { core }
    }

    /// The element this assertion is scoped to
    #[must_use]
    pub fn element(&self) -> Option<ElementHandle> {
        self.core.parser().root()
    }
}

impl ElementAsserts for ElementAssert {
    fn core(&self) -> &AssertCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AssertCore {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn test_from_fragment() {
        let mut input = ElementAssert::from_fragment(r#"<input type="text" required>"#).unwrap();
        input
            .is("input")
            .unwrap()
            .has("type", "text")
            .unwrap()
            .has("required", true)
            .unwrap();
    }

    #[test]
    fn test_new_from_handle() {
        let parser = ScopedParser::new(r#"<ul><li class="b a">x</li></ul>"#);
        let li = parser.query("li").unwrap().unwrap();
        let mut item = ElementAssert::new(&li, AssertConfig::default());
        item.is("li").unwrap().has("class", "a b").unwrap();
        assert!(item.element().unwrap().same_node(&li));
        assert_eq!(item.text(), "x");
    }

    #[test]
    fn test_nested_find() {
        let mut section = ElementAssert::from_fragment(
            r#"<section><div class="card"><a href="/x">go</a></div></section>"#,
        )
        .unwrap();
        section
            .find("div.card", |card| {
                card.contains("a", attrs! { "href" => "/x" })?;
                Ok(())
            })
            .unwrap();
        let err = section.find("article", |_| Ok(())).unwrap_err();
        assert_eq!(
            err.failure_message(),
            Some("Could not find any matching element for \"article\"")
        );
    }

    #[test]
    fn test_is_mismatch() {
        let mut input = ElementAssert::from_fragment("<input>").unwrap();
        let err = input.is("textarea").unwrap_err();
        assert!(err
            .failure_message()
            .unwrap()
            .starts_with("Element is not of type \"textarea\""));
    }

    #[test]
    fn test_table_fragments_root_at_their_element() {
        let mut row = ElementAssert::from_fragment("<tr><td>x</td></tr>").unwrap();
        row.is("tr")
            .unwrap()
            .contains("td", attrs! {})
            .unwrap();

        let mut cell = ElementAssert::from_fragment(r#"<td class="b a">x</td>"#).unwrap();
        cell.is("td").unwrap().has("class", "a b").unwrap();
        assert_eq!(cell.text(), "x");
    }

    #[test]
    fn test_fragment_without_element() {
        let err = ElementAssert::from_fragment("plain text").unwrap_err();
        assert!(!err.is_assertion_failure());
    }
}
