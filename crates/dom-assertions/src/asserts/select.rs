//! Assertions for `<select>` and `<datalist>` elements.

use super::{AssertCore, ElementAsserts};
use crate::assertion::Assertion;
use crate::normalize::AttributeMap;
use crate::parser::ElementHandle;
use crate::result::DomResult;

/// Assertions against a `<select>` or `<datalist>` element
#[derive(Debug, Clone)]
pub struct SelectAssert {
    core: AssertCore,
}

impl SelectAssert {
    pub(crate) fn from_core(core: AssertCore) -> Self {
        Self { core }
    }

    /// Assert an option with `attributes` exists
    pub fn contains_option(&mut self, attributes: impl Into<AttributeMap>) -> DomResult<&mut Self> {
        self.contains("option", attributes)
    }

    /// Assert an option exists for each attribute map
    pub fn contains_options<I>(&mut self, options: I) -> DomResult<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<AttributeMap>,
    {
        for attributes in options {
            self.contains("option", attributes)?;
        }
        Ok(self)
    }

    /// Assert no option carries `attributes`
    pub fn doesnt_contain_option(
        &mut self,
        attributes: impl Into<AttributeMap>,
    ) -> DomResult<&mut Self> {
        self.doesnt_contain("option", attributes)
    }

    /// Assert the selected option (or the first, if none is marked
    /// selected) has `value`
    pub fn has_value(&mut self, value: &str) -> DomResult<&mut Self> {
        let selected = match self.core.parser().query("option[selected]")? {
            Some(option) => Some(option),
            None => self.core.parser().query("option")?,
        };
        let actual = selected.as_ref().map(option_value);
        Assertion::equals(
            &Some(value),
            &actual.as_deref(),
            &format!("Could not find a selected option with the value {value}"),
        )
        .into_result()?;
        Ok(self)
    }

    /// Assert a multiple select has exactly `values` selected, in any order
    pub fn has_values<I, S>(&mut self, values: I) -> DomResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Assertion::is_true(
            self.core.parser().has_attribute_for_root("multiple"),
            "This select does not allow multiple values",
        )
        .into_result()?;

        let mut expected: Vec<String> = values.into_iter().map(Into::into).collect();
        expected.sort();
        let mut actual: Vec<String> = self
            .core
            .parser()
            .query_all("option[selected]")?
            .iter()
            .map(option_value)
            .collect();
        actual.sort();

        Assertion::equals(
            &expected,
            &actual,
            &format!("Could not find selected options with the values {expected:?}"),
        )
        .into_result()?;
        Ok(self)
    }
}

impl ElementAsserts for SelectAssert {
    fn core(&self) -> &AssertCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AssertCore {
        &mut self.core
    }
}

/// The submitted value of an option: `value`, else its text
fn option_value(option: &ElementHandle) -> String {
    option
        .attribute("value")
        .unwrap_or_else(|| option.text().trim().to_string())
}
