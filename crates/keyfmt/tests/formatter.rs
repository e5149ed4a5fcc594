use std::sync::Arc;

use keyfmt::{
    tokenize, Boundaries, Element, ElementRegistry, FormatError, Formatter, PartKind,
};
use serde_json::{json, Value};

fn render(template: &str, data: &Value) -> String {
    Formatter::new().render_value(template, data).unwrap()
}

#[test]
fn tokenizing_round_trips_the_source() {
    let boundaries = Boundaries::default();
    for template in [
        "plain text only",
        "Hello {value}!",
        "{a}{b} tail",
        "escaped {{brace}} and {real?x=1}",
        "unterminated {ref",
    ] {
        let parts = tokenize(template, &boundaries);
        let joined: String = parts.iter().map(|p| p.raw()).collect();
        assert_eq!(joined, template, "round trip failed for {template:?}");
    }
}

#[test]
fn resolving_twice_renders_identically() {
    let formatter = Formatter::new();
    let data = json!({"id": 42, "name": "deploy"});
    let template = "job {parameter?name=name} ({parameter?name=id&format=D4})";

    let first = formatter.render_value(template, &data).unwrap();
    let second = formatter.render_value(template, &data).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "job deploy (0042)");
}

#[test]
fn doubled_braces_render_as_single_literals() {
    assert_eq!(render("{{text}}", &Value::Null), "{text}");
}

#[test]
fn format_attribute_binds() {
    assert_eq!(render("{value?format=N2}", &json!(3.14159)), "3.14");
}

#[test]
fn missing_required_attribute_names_element_and_attribute() {
    let err = Formatter::new().compile("{parameter}").unwrap_err();
    match &err {
        FormatError::MissingAttribute { element, attribute } => {
            assert_eq!(element, "parameter");
            assert_eq!(attribute, "name");
        }
        other => panic!("expected MissingAttribute, got {other}"),
    }
    let message = err.to_string();
    assert!(message.contains("parameter"));
    assert!(message.contains("name"));
}

#[test]
fn unregistered_element_renders_unchanged() {
    // Must fall back to literal text, not raise an error.
    assert_eq!(render("{doesNotExist}", &Value::Null), "{doesNotExist}");
}

#[test]
fn value_concatenates_with_literals() {
    assert_eq!(render("Hello {value}!", &json!("World")), "Hello World!");
}

#[test]
fn multiple_elements_keep_order() {
    let data = json!({"a": 1, "b": 2});
    let out = render("{parameter?name=a}-{parameter?name=b}-{parameter?name=a}", &data);
    assert_eq!(out, "1-2-1");
}

#[test]
fn parameter_shorthand_expands() {
    assert_eq!(
        render("{@requestId=unknown}", &json!({"requestId": "r-81"})),
        "r-81"
    );
    assert_eq!(render("{@requestId=unknown}", &json!({})), "unknown");
}

#[test]
fn unterminated_reference_degrades_to_literal() {
    // Pinned behavior: a start boundary with no matching end boundary is
    // literal text, not an error.
    let boundaries = Boundaries::default();
    let parts = tokenize("before {oops", &boundaries);
    assert_eq!(parts.last().map(|p| p.kind()), Some(PartKind::Literal));
    assert_eq!(render("before {oops", &Value::Null), "before {oops");
}

#[test]
fn null_data_renders_without_error() {
    assert_eq!(render("v={value}.", &Value::Null), "v=.");
    let out = Formatter::new().render("ok {value}", &()).unwrap();
    assert_eq!(out, "ok ");
}

#[test]
fn custom_element_through_registry_injection() {
    let mut registry = ElementRegistry::with_builtins();
    registry
        .register("sep", |ctx| {
            let width: usize = ctx
                .attrs()
                .convert(ctx.name(), &["width", "w"], |v| v.parse().ok())?
                .unwrap_or(8);
            Ok(Element::static_text("-".repeat(width)))
        })
        .unwrap();

    let formatter = Formatter::with_registry(registry);
    assert_eq!(
        formatter.render("a\n{sep?width=3}\nb", &()).unwrap(),
        "a\n---\nb"
    );
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = ElementRegistry::with_builtins();
    let err = registry
        .register("value", |_| Ok(Element::static_text("")))
        .unwrap_err();
    assert!(matches!(err, FormatError::ElementExists { .. }));
}

#[test]
fn compiled_template_renders_concurrently() {
    let formatter = Formatter::new();
    let template = Arc::new(
        formatter
            .compile("[{parameter?name=worker}] {parameter?name=message}")
            .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let template = Arc::clone(&template);
            std::thread::spawn(move || {
                let data = json!({"worker": i, "message": "done"});
                template.render_value(&data).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("[{i}] done"));
    }
}

#[test]
fn element_cache_is_transparent() {
    let cached = Formatter::new();
    let uncached = Formatter::new().with_cache_capacity(0);
    let data = json!({"n": 1234.5});
    let template = "{parameter?name=n&format=N2} {parameter?name=n&format=N2}";

    assert_eq!(
        cached.render_value(template, &data).unwrap(),
        uncached.render_value(template, &data).unwrap()
    );
    assert_eq!(cached.render_value(template, &data).unwrap(), "1,234.50 1,234.50");
}

#[test]
fn deterministic_builtins_are_stable_across_compiles() {
    let formatter = Formatter::new();
    let data = json!({"x": "stable"});

    let a = formatter.compile("{parameter?name=x}").unwrap();
    let b = formatter.compile("{parameter?name=x}").unwrap();
    assert_eq!(
        a.render_value(&data).unwrap(),
        b.render_value(&data).unwrap()
    );
}
