//! Assertions over a whole parsed document.

use super::{AssertCore, ElementAssert, ElementAsserts, FormAssert, SelectAssert};
use crate::config::AssertConfig;
use crate::parser::ScopedParser;
use crate::result::DomResult;

/// Entry point of an assertion chain: owns the parsed markup
#[derive(Debug, Clone)]
pub struct DomAssert {
    core: AssertCore,
}

impl DomAssert {
    /// Parse `html` with the default config
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self::with_config(html, AssertConfig::default())
    }

    /// Parse `html` with an explicit config
    #[must_use]
    pub fn with_config(html: impl Into<String>, config: AssertConfig) -> Self {
        Self {
            core: AssertCore::new(ScopedParser::new(html), config),
        }
    }

    /// The markup under test
    #[must_use]
    pub fn content(&self) -> &str {
        self.core.parser().content()
    }

    /// Assert at least one element matches `selector`
    pub fn assert_element_exists(&mut self, selector: &str) -> DomResult<&mut Self> {
        self.core.require(selector, || {
            format!("No element found with selector: {selector}")
        })?;
        Ok(self)
    }

    /// Assert `selector` matches and run `callback` scoped to the match
    pub fn assert_element_exists_with<F>(&mut self, selector: &str, callback: F) -> DomResult<&mut Self>
    where
        F: FnOnce(&mut ElementAssert) -> DomResult<()>,
    {
        let handle = self.core.require(selector, || {
            format!("No element found with selector: {selector}")
        })?;
        let mut element = ElementAssert::from_core(self.core.scoped(&handle));
        callback(&mut element)?;
        Ok(self)
    }

    /// Assert a form matching `selector` exists and run `callback` on it
    pub fn assert_form_exists<F>(&mut self, selector: &str, callback: F) -> DomResult<&mut Self>
    where
        F: FnOnce(&mut FormAssert) -> DomResult<()>,
    {
        let handle = self.core.require(selector, || {
            if selector == "form" {
                "No form was found".to_string()
            } else {
                format!("No form was found matching \"{selector}\"")
            }
        })?;
        let mut form = FormAssert::from_core(self.core.scoped(&handle));
        callback(&mut form)?;
        Ok(self)
    }

    /// Assert a select matching `selector` exists and run `callback` on it
    pub fn assert_select_exists<F>(&mut self, selector: &str, callback: F) -> DomResult<&mut Self>
    where
        F: FnOnce(&mut SelectAssert) -> DomResult<()>,
    {
        let handle = self.core.require(selector, || {
            format!("No select was found matching \"{selector}\"")
        })?;
        let mut select = SelectAssert::from_core(self.core.scoped(&handle));
        callback(&mut select)?;
        Ok(self)
    }
}

impl ElementAsserts for DomAssert {
    fn core(&self) -> &AssertCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AssertCore {
        &mut self.core
    }
}
