//! End-to-end assertion chains against realistic markup.

use dom_assertions::prelude::*;
use dom_assertions::{CallArg, DynamicCall, ScopedParser};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const SIGNUP: &str = r#"<!doctype html>
<html>
<body>
    <form id="signup" action="/register" method="post">
        <input type="hidden" name="_token" value="t0k3n">
        <label for="email">Email</label>
        <input id="email" type="email" name="email" class="input wide" required>
        <input type="text" name="nickname" readonly="readonly">
        <textarea name="bio" aria-label="About you"></textarea>
        <select name="plan">
            <option value="free">Free</option>
            <option value="pro" selected>Pro</option>
        </select>
        <button type="submit" class="btn btn-primary">Sign up</button>
    </form>
</body>
</html>"#;

mod spec_examples {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nth_child_query() {
        let parser = ScopedParser::new(r#"<form id="f1"></form><form id="f2"></form>"#);
        let form = parser.query("form:nth-child(2)").unwrap().unwrap();
        assert_eq!(form.attribute("id").as_deref(), Some("f2"));
    }

    #[test]
    fn test_nth_of_type_within_scope() {
        let html = r#"<select id="outside"></select>
<form id="form1"><select id="a"></select></form>
<form id="form2"><select id="b"></select><select id="c"></select></form>"#;
        let mut parser = ScopedParser::new(html);
        let form = parser.query("#form2").unwrap().unwrap();
        parser.set_root(&form);
        let select = parser.query("select:nth-of-type(2)").unwrap().unwrap();
        assert_eq!(select.attribute("id").as_deref(), Some("c"));
    }

    #[test]
    fn test_bare_required_is_true() {
        DomAssert::new("<input required>")
            .contains_with("input", |input| {
                input.has("required", true)?;
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_class_order_insensitive() {
        DomAssert::new(r#"<div class="a b"></div>"#)
            .contains("div", attrs! { "class" => "b a" })
            .unwrap();
    }

    #[test]
    fn test_no_password_input() {
        DomAssert::new(r#"<input type="text">"#)
            .doesnt_contain("input", attrs! { "type" => "password" })
            .unwrap();
    }
}

mod contains {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_existence_only() {
        init_tracing();
        let mut page = DomAssert::new(SIGNUP);
        page.contains("textarea", attrs! {}).unwrap();
        let err = page.contains("table", attrs! {}).unwrap_err();
        assert_eq!(
            err.failure_message(),
            Some("Could not find any matching element of type \"table\"")
        );
    }

    #[test]
    fn test_subset_match_ignores_extra_attributes() {
        DomAssert::new(SIGNUP)
            .contains("input", attrs! { "name" => "email" })
            .unwrap()
            .contains(
                "input",
                attrs! { "type" => "email", "class" => "wide input", "required" => true },
            )
            .unwrap();
    }

    #[test]
    fn test_any_element_of_type_may_match() {
        DomAssert::new(SIGNUP)
            .contains("input", attrs! { "name" => "nickname", "readonly" => true })
            .unwrap();
    }

    #[test]
    fn test_attributes_must_belong_to_same_element() {
        let err = DomAssert::new(SIGNUP)
            .contains("input", attrs! { "name" => "email", "readonly" => true })
            .unwrap_err();
        let message = err.failure_message().unwrap();
        assert!(message.starts_with("Could not find a matching input with data:"));
        assert!(message.contains("\"readonly\": true"));
    }

    #[test]
    fn test_selector_form_checks_first_match() {
        let mut page = DomAssert::new(SIGNUP);
        page.contains("form#signup input[type=email]", attrs! { "name" => "email" })
            .unwrap();
        let err = page
            .contains("form#signup input", attrs! { "name" => "email" })
            .unwrap_err();
        assert!(err
            .failure_message()
            .unwrap()
            .starts_with("Could not find attribute \"name\" with value \"email\""));
    }

    #[test]
    fn test_option_text() {
        DomAssert::new(SIGNUP)
            .contains("option", attrs! { "value" => "pro", "text" => "Pro" })
            .unwrap();
    }

    #[test]
    fn test_callback_scopes_to_match() {
        DomAssert::new(SIGNUP)
            .contains_with("form", |form| {
                form.is("form")?
                    .has("action", "/register")?
                    .contains("button", attrs! { "class" => "btn-primary btn" })?
                    .doesnt_contain("a", attrs! {})?;
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_callback_errors_propagate() {
        let err = DomAssert::new(SIGNUP)
            .contains_with("label", |label| {
                label.contains("input", attrs! {})?;
                Ok(())
            })
            .unwrap_err();
        assert!(err.is_assertion_failure());
    }
}

mod doesnt_contain {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absent_element() {
        DomAssert::new(SIGNUP)
            .doesnt_contain("table", attrs! {})
            .unwrap();
        let err = DomAssert::new(SIGNUP)
            .doesnt_contain("textarea", attrs! {})
            .unwrap_err();
        assert_eq!(
            err.failure_message(),
            Some("Found a matching element of type \"textarea\"")
        );
    }

    #[test]
    fn test_not_strict_negation() {
        // another input exists, but none of type password
        let mut page = DomAssert::new(SIGNUP);
        page.contains("input", attrs! {}).unwrap();
        page.doesnt_contain("input", attrs! { "type" => "password" })
            .unwrap();
    }

    #[test]
    fn test_fails_when_any_element_matches() {
        let err = DomAssert::new(SIGNUP)
            .doesnt_contain("input", attrs! { "class" => "wide input" })
            .unwrap_err();
        assert!(err
            .failure_message()
            .unwrap()
            .starts_with("Found a matching input with data:"));
    }

    #[test]
    fn test_selector_form_with_missing_element_passes() {
        DomAssert::new(SIGNUP)
            .doesnt_contain("input[type=password]", attrs! { "name" => "secret" })
            .unwrap();
    }

    #[test]
    fn test_selector_form_checks_each_attribute_for_equality() {
        let err = DomAssert::new(SIGNUP)
            .doesnt_contain("input[type=email]", attrs! { "name" => "other" })
            .unwrap_err();
        assert!(err
            .failure_message()
            .unwrap()
            .starts_with("Found attribute \"name\" with value \"other\""));
    }
}

mod dispatch {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dynamic_calls_chain() {
        DomAssert::new(SIGNUP)
            .call("containsTextarea", [("name", "bio")])
            .unwrap()
            .call("doesntContainTable", ())
            .unwrap()
            .call("contains_select", ())
            .unwrap()
            .contains_with("textarea", |bio| {
                bio.call("hasAriaLabel", "About you")?
                    .call("has_name", "bio")?;
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_dynamic_call_failures() {
        let mut page = DomAssert::new(SIGNUP);
        let err = page.call("containsVideo", ()).unwrap_err();
        assert_eq!(
            err.failure_message(),
            Some("Could not find any matching element of type \"video\"")
        );
        let err = page.call("doesntContainInput", ()).unwrap_err();
        assert!(err.is_assertion_failure());
    }

    #[test]
    fn test_unknown_call_rejected_by_default() {
        let err = DomAssert::new(SIGNUP)
            .call("seesInput", ())
            .unwrap_err();
        assert!(matches!(err, DomError::UnknownCall { ref name } if name == "seesInput"));
    }

    #[test]
    fn test_unknown_call_ignored_when_configured() {
        let config = AssertConfig::new().with_unknown_calls(UnknownCallPolicy::Ignore);
        DomAssert::with_config(SIGNUP, config)
            .call("seesInput", ())
            .unwrap()
            .contains("form", attrs! {})
            .unwrap();
    }

    #[test]
    fn test_argument_shape_checked() {
        let mut page = DomAssert::new(SIGNUP);
        assert!(matches!(
            page.call("hasId", [("id", "x")]).unwrap_err(),
            DomError::InvalidArgument { .. }
        ));
        assert!(matches!(
            page.call("containsInput", "email").unwrap_err(),
            DomError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_parse_is_exposed() {
        assert_eq!(
            DynamicCall::parse("hasDataTestId"),
            Some(DynamicCall::HasAttribute("data-test-id".to_string()))
        );
        assert_eq!(CallArg::from("x"), CallArg::Value("x".into()));
    }
}

mod config {
    use super::*;

    #[test]
    fn test_extra_boolean_attribute() {
        let html = r#"<button disabled>Go</button>"#;
        let err = DomAssert::new(html)
            .contains("button", attrs! { "disabled" => true })
            .unwrap_err();
        assert!(err.is_assertion_failure());

        let config = AssertConfig::new().with_boolean_attribute("disabled");
        DomAssert::with_config(html, config)
            .contains("button", attrs! { "disabled" => true })
            .unwrap()
            .contains_with("button", |button| {
                button.has("disabled", true)?;
                Ok(())
            })
            .unwrap();
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_invalid_selector_is_not_an_assertion_failure() {
        let err = DomAssert::new(SIGNUP)
            .contains("input[", attrs! {})
            .unwrap_err();
        assert!(matches!(err, DomError::InvalidSelector { .. }));
        assert!(!err.is_assertion_failure());
    }

    #[test]
    fn test_missing_attribute_fails_has() {
        let err = DomAssert::new(SIGNUP)
            .contains_with("textarea", |bio| {
                bio.has("placeholder", "Tell us")?;
                Ok(())
            })
            .unwrap_err();
        assert!(err
            .failure_message()
            .unwrap()
            .starts_with("Could not find an attribute placeholder with value Tell us"));
    }

    #[test]
    fn test_absent_boolean_attribute_is_not_true() {
        let err = DomAssert::new("<input name=x>")
            .contains_with("input", |input| {
                input.has("required", true)?;
                Ok(())
            })
            .unwrap_err();
        assert!(err.is_assertion_failure());
    }
}
