//! dom-assertions: fluent assertions for rendered HTML
//!
//! Assert on the structure of markup in tests without hand-writing selector
//! queries: "an `input` with `type=email` exists", "no `password` input
//! exists", "this element has `aria-label=Close`".
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   call name    ┌─────────────┐   selector   ┌──────────────┐
//! │  DomAssert / │──────────────► │ AssertCore  │────────────► │ ScopedParser │
//! │ ElementAssert│  ◄── &mut Self │ (+ cache)   │  ◄── handle  │  (scraper)   │
//! └──────────────┘                └─────┬───────┘              └──────────────┘
//!                                       │ expected & actual values
//!                                       ▼
//!                                 ┌─────────────┐
//!                                 │ Normalizer  │
//!                                 └─────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use dom_assertions::prelude::*;
//!
//! # fn main() -> DomResult<()> {
//! let html = r#"<form method="post"><input type="email" name="email" required class="b a"></form>"#;
//!
//! DomAssert::new(html)
//!     .contains("input", attrs! { "type" => "email", "class" => "a b", "required" => true })?
//!     .doesnt_contain("input", [("type", "password")])?
//!     .contains_with("form", |form| {
//!         form.is("form")?.has("method", "post")?;
//!         Ok(())
//!     })?
//!     .call("containsInput", [("name", "email")])?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod assertion;
mod asserts;
mod config;
mod dispatch;
mod normalize;
mod parser;
mod result;

pub use assertion::{Assertion, AssertionResult};
pub use asserts::{
    AssertCore, AttributeCache, DomAssert, ElementAssert, ElementAsserts, FormAssert,
    SelectAssert,
};
pub use config::{AssertConfig, UnknownCallPolicy, DEFAULT_BOOLEAN_ATTRIBUTES};
pub use dispatch::{
    attribute_identifier, element_identifier, is_plain_element_name, CallArg, DynamicCall,
};
pub use normalize::{
    normalize_attribute_value, normalize_attributes, AttributeMap, AttributeValue, Normalizer,
};
pub use parser::{ElementHandle, ParsedDocument, ScopedParser};
pub use result::{DomError, DomResult};

/// Typed `contains_<element>` / `has_<attribute>` shortcuts
#[cfg(feature = "derive")]
pub use dom_assertions_derive::DomShortcuts;

/// Everything a test needs in one import
pub mod prelude {
    pub use crate::attrs;
    pub use crate::{
        AssertConfig, AttributeMap, AttributeValue, DomAssert, DomError, DomResult,
        ElementAssert, ElementAsserts, FormAssert, SelectAssert, UnknownCallPolicy,
    };

    #[cfg(feature = "derive")]
    pub use crate::DomShortcuts;
}
