//! Derive macro generating typed assertion shortcuts for dom-assertions.
//!
//! Call names such as `containsTextarea` or `hasAriaLabel` can be dispatched
//! at runtime with `ElementAsserts::call`, but a typo there is only caught
//! when the test runs. `DomShortcuts` generates the same calls as real
//! methods so the compiler checks them:
//!
//! ```ignore
//! use dom_assertions::prelude::*;
//!
//! #[derive(DomShortcuts)]
//! #[dom(elements = [input, textarea, datalist_option])]
//! #[dom(attributes = [aria_label, action])]
//! struct Form;
//!
//! // Generates `trait FormExt` implemented for every `ElementAsserts`:
//! DomAssert::new(html)
//!     .contains_input(attrs! { "type" => "email" })?   // contains("input", ..)
//!     .doesnt_contain_textarea(attrs! {})?             // doesnt_contain("textarea", ..)
//!     .contains_datalist_option(attrs! {})?            // contains("datalistOption", ..)
//!     .has_aria_label("Sign in")?;                     // has("aria-label", ..)
//! ```
//!
//! Element idents map to lowerCamel element names and attribute idents to
//! kebab-case attribute names, the same conventions the runtime dispatcher
//! uses.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Attribute, DeriveInput, Ident, Token};

/// Derive an extension trait `<Name>Ext` of typed assertion shortcuts.
///
/// # Attributes
///
/// - `#[dom(elements = [a, b, ...])]` - generates `contains_a`,
///   `contains_a_with` and `doesnt_contain_a` for each element
/// - `#[dom(attributes = [x, y, ...])]` - generates `has_x` for each
///   attribute
///
/// The trait is blanket-implemented for every `ElementAsserts` type, and the
/// deriving type gains `ELEMENTS` / `ATTRIBUTES` constants listing the
/// resolved names.
#[proc_macro_derive(DomShortcuts, attributes(dom))]
pub fn derive_dom_shortcuts(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let vis = &input.vis;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (elements, attributes) = match parse_dom_attributes(&input.attrs) {
        Ok(lists) => lists,
        Err(err) => return err.to_compile_error().into(),
    };

    let trait_name = format_ident!("{}Ext", name);

    let element_methods = elements.iter().map(|ident| {
        let snake = to_snake_case(&ident.unraw().to_string());
        let element = to_lower_camel(&snake);
        let contains = format_ident!("contains_{}", snake, span = ident.span());
        let contains_with = format_ident!("contains_{}_with", snake, span = ident.span());
        let doesnt_contain = format_ident!("doesnt_contain_{}", snake, span = ident.span());
        let contains_doc = format!("Assert a `{element}` element exists with the given attributes");
        let contains_with_doc = format!("Assert a `{element}` element exists and run `callback` on it");
        let doesnt_contain_doc = format!("Assert no `{element}` element carries the given attributes");

        quote! {
            #[doc = #contains_doc]
            fn #contains(
                &mut self,
                attributes: impl ::core::convert::Into<::dom_assertions::AttributeMap>,
            ) -> ::dom_assertions::DomResult<&mut Self> {
                ::dom_assertions::ElementAsserts::contains(self, #element, attributes)
            }

            #[doc = #contains_with_doc]
            fn #contains_with<F>(&mut self, callback: F) -> ::dom_assertions::DomResult<&mut Self>
            where
                F: ::core::ops::FnOnce(
                    &mut ::dom_assertions::ElementAssert,
                ) -> ::dom_assertions::DomResult<()>,
            {
                ::dom_assertions::ElementAsserts::contains_with(self, #element, callback)
            }

            #[doc = #doesnt_contain_doc]
            fn #doesnt_contain(
                &mut self,
                attributes: impl ::core::convert::Into<::dom_assertions::AttributeMap>,
            ) -> ::dom_assertions::DomResult<&mut Self> {
                ::dom_assertions::ElementAsserts::doesnt_contain(self, #element, attributes)
            }
        }
    });

    let attribute_methods = attributes.iter().map(|ident| {
        let snake = to_snake_case(&ident.unraw().to_string());
        let attribute = to_kebab_case(&snake);
        let has = format_ident!("has_{}", snake, span = ident.span());
        let has_doc = format!("Assert the scope root has `{attribute}` equal to `value`");

        quote! {
            #[doc = #has_doc]
            fn #has(
                &mut self,
                value: impl ::core::convert::Into<::dom_assertions::AttributeValue>,
            ) -> ::dom_assertions::DomResult<&mut Self> {
                ::dom_assertions::ElementAsserts::has(self, #attribute, value)
            }
        }
    });

    let element_names: Vec<String> = elements
        .iter()
        .map(|ident| to_lower_camel(&to_snake_case(&ident.unraw().to_string())))
        .collect();
    let attribute_names: Vec<String> = attributes
        .iter()
        .map(|ident| to_kebab_case(&to_snake_case(&ident.unraw().to_string())))
        .collect();

    let trait_doc = format!("Typed assertion shortcuts generated from `{name}`");

    let expanded = quote! {
        #[doc = #trait_doc]
        #vis trait #trait_name: ::dom_assertions::ElementAsserts {
            #(#element_methods)*
            #(#attribute_methods)*
        }

        impl<T: ::dom_assertions::ElementAsserts> #trait_name for T {}

        impl #impl_generics #name #ty_generics #where_clause {
            /// Element names the shortcuts assert on
            pub const ELEMENTS: &'static [&'static str] = &[#(#element_names),*];

            /// Attribute names the shortcuts assert on
            pub const ATTRIBUTES: &'static [&'static str] = &[#(#attribute_names),*];
        }
    };

    TokenStream::from(expanded)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Collect `elements = [..]` and `attributes = [..]` from every `#[dom(..)]`
fn parse_dom_attributes(attrs: &[Attribute]) -> syn::Result<(Vec<Ident>, Vec<Ident>)> {
    let mut elements = Vec::new();
    let mut attributes = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("dom") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let target = if meta.path.is_ident("elements") {
                &mut elements
            } else if meta.path.is_ident("attributes") {
                &mut attributes
            } else {
                return Err(meta.error("expected `elements = [..]` or `attributes = [..]`"));
            };

            let value = meta.value()?;
            let content;
            syn::bracketed!(content in value);
            let list = Punctuated::<Ident, Token![,]>::parse_terminated_with(
                &content,
                Ident::parse_any,
            )?;
            target.extend(list);
            Ok(())
        })?;
    }

    Ok((elements, attributes))
}

/// Convert PascalCase or camelCase to snake_case
fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = c != '_';
        }
    }

    result
}

/// `datalist_option` -> `datalistOption`
fn to_lower_camel(snake: &str) -> String {
    let mut result = String::with_capacity(snake.len());
    let mut upper_next = false;

    for c in snake.chars() {
        if c == '_' {
            upper_next = !result.is_empty();
        } else if upper_next {
            result.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// `aria_label` -> `aria-label`
fn to_kebab_case(snake: &str) -> String {
    snake.trim_matches('_').replace('_', "-")
}
