//! Form-specific assertions: action, method spoofing and CSRF tokens.

use super::{AssertCore, ElementAsserts, SelectAssert};
use crate::assertion::Assertion;
use crate::result::DomResult;

/// Hidden input carrying a spoofed HTTP verb
const SPOOF_METHOD_SELECTOR: &str = r#"input[name="_method"]"#;

/// Hidden input carrying the CSRF token
const CSRF_SELECTOR: &str = r#"input[name="_token"]"#;

/// Assertions against a `<form>` element
#[derive(Debug, Clone)]
pub struct FormAssert {
    core: AssertCore,
}

impl FormAssert {
    pub(crate) fn from_core(core: AssertCore) -> Self {
        Self { core }
    }

    /// Assert the form posts to `url`.
    ///
    /// Scheme and host are ignored and the comparison is case-insensitive
    /// and tolerant of leading/trailing slashes.
    pub fn has_action(&mut self, url: &str) -> DomResult<&mut Self> {
        let actual = self
            .core
            .parser()
            .get_attribute_for_root("action")
            .unwrap_or_default();
        Assertion::equals(
            normalize_action(url).as_str(),
            normalize_action(&actual).as_str(),
            &format!("Could not find an action on the form with the value {url}"),
        )
        .into_result()?;
        Ok(self)
    }

    /// Assert the form uses `method`.
    ///
    /// Verbs other than GET and POST need `method="post"` plus a spoofing
    /// `_method` input.
    pub fn has_method(&mut self, method: &str) -> DomResult<&mut Self> {
        let method = method.to_ascii_uppercase();
        let form_method = self
            .core
            .parser()
            .get_attribute_for_root("method")
            .map_or_else(|| "GET".to_string(), |m| m.to_ascii_uppercase());

        if method == "GET" || method == "POST" {
            Assertion::equals(
                method.as_str(),
                form_method.as_str(),
                &format!("Could not find a method on the form with the value {method}"),
            )
            .into_result()?;
            return Ok(self);
        }

        Assertion::equals(
            "POST",
            form_method.as_str(),
            &format!("A form spoofing {method} must use the POST method"),
        )
        .into_result()?;
        self.has_spoof_method(&method)
    }

    /// Assert a `_method` input spoofs `method`
    pub fn has_spoof_method(&mut self, method: &str) -> DomResult<&mut Self> {
        let input = self
            .core
            .require(SPOOF_METHOD_SELECTOR, || "No spoof method was found".to_string())?;
        let actual = input.attribute("value").unwrap_or_default();
        Assertion::equals(
            method.to_ascii_uppercase().as_str(),
            actual.to_ascii_uppercase().as_str(),
            &format!("Could not find a spoofed method with the value {method}"),
        )
        .into_result()?;
        Ok(self)
    }

    /// Assert the form carries a CSRF token input
    pub fn has_csrf(&mut self) -> DomResult<&mut Self> {
        self.core
            .require(CSRF_SELECTOR, || "No CSRF was found".to_string())?;
        Ok(self)
    }

    /// Assert a select matching `selector` exists in the form and run
    /// `callback` on it
    pub fn find_select<F>(&mut self, selector: &str, callback: F) -> DomResult<&mut Self>
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

impl ElementAsserts for FormAssert {
    fn core(&self) -> &AssertCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AssertCore {
        &mut self.core
    }
}

/// `https://Example.com/Users/`, `//example.com/users` and `users` all
/// become `/users/`
fn normalize_action(url: &str) -> String {
    let url = url.trim();
    let path = match url.find("://") {
        Some(index) => strip_host(&url[index + 3..]),
        None => url.strip_prefix("//").map_or(url, strip_host),
    };
    let path = path.trim_matches('/').to_lowercase();
    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{path}/")
    }
}

/// `host/path` -> `/path`
fn strip_host(authority_and_path: &str) -> &str {
    authority_and_path
        .find('/')
        .map_or("", |slash| &authority_and_path[slash..])
}
