//! Option resolution: precedence, defaults and finalization

use std::sync::Arc;

use ajaxify::{
    AjaxResponse, CallbackRef, ContainerConfig, Document, Literal, NodeId, OptionResolver,
    OptionSet, OptionValue, Param, TextStatus,
};

fn element(doc: &mut Document, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let body = doc.body();
    let tree = doc.tree_mut();
    let el = tree.create_element(tag);
    for (k, v) in attrs {
        tree.set_attribute(el, k, v);
    }
    tree.append_child(body, el);
    el
}

// ============================================================================
// Precedence
// ============================================================================

/// Element kinds a parameter is read from: tag, attribute carrying the
/// local value, and the tag default
fn sources(param: Param) -> Vec<(&'static str, &'static str, OptionValue)> {
    match param {
        Param::Url => vec![
            ("a", "href", OptionValue::Absent),
            ("form", "action", OptionValue::Absent),
            ("span", "ajax-url", OptionValue::Absent),
        ],
        Param::Method => vec![
            ("form", "method", OptionValue::str("POST")),
            ("a", "ajax-method", OptionValue::str("GET")),
            ("span", "ajax-method", OptionValue::str("GET")),
        ],
        // A form's payload always comes from its controls
        Param::Data => vec![
            ("span", "ajax-data", OptionValue::Absent),
            ("a", "ajax-data", OptionValue::Absent),
        ],
        Param::DataType => vec![
            ("a", "ajax-dataType", OptionValue::Absent),
            ("form", "ajax-dataType", OptionValue::Absent),
        ],
        Param::ProcessData => vec![
            ("form", "ajax-processData", OptionValue::bool(false)),
            ("div", "ajax-processData", OptionValue::Absent),
        ],
        Param::ContentType => vec![
            ("form", "ajax-contentType", OptionValue::bool(false)),
            ("div", "ajax-contentType", OptionValue::Absent),
        ],
        _ => Vec::new(),
    }
}

/// Every presence combination of local attribute, global value and tag
/// default, for every element-overridable parameter
#[test]
fn test_precedence_all_combinations() {
    let overridable: Vec<_> = Param::ALL.into_iter().filter(|p| !p.is_container_wide()).collect();
    assert_eq!(overridable.len(), 6);

    for param in overridable {
        let sources = sources(param);
        assert!(!sources.is_empty(), "{}", param);

        for (tag, attr, default) in sources {
            for local in [false, true] {
                for global in [false, true] {
                    let mut doc = Document::new("https://example.com/");
                    let attrs = if local { vec![(attr, "local")] } else { Vec::new() };
                    let el = element(&mut doc, tag, &attrs);

                    let mut set = OptionSet::new();
                    if global {
                        set.set(param, OptionValue::str("global"));
                    }
                    let options = OptionResolver::new(set).resolve(&doc, el);

                    let expected = if local {
                        OptionValue::str("local")
                    } else if global {
                        OptionValue::str("global")
                    } else {
                        default.clone()
                    };
                    assert_eq!(
                        options.get(param),
                        &expected,
                        "param={} tag={} local={} global={}",
                        param,
                        tag,
                        local,
                        global
                    );
                }
            }
        }
    }
}

#[test]
fn test_precedence_through_config() {
    let mut doc = Document::new("https://example.com/");
    let plain = element(&mut doc, "div", &[]);
    let local = element(&mut doc, "div", &[("ajax-contentType", "text/local")]);
    let form = element(&mut doc, "form", &[]);

    let resolver = OptionResolver::new(ContainerConfig::new().content_type("text/global").global_options());
    assert_eq!(resolver.resolve(&doc, plain).get(Param::ContentType), &OptionValue::str("text/global"));
    assert_eq!(resolver.resolve(&doc, local).get(Param::ContentType), &OptionValue::str("text/local"));
    assert_eq!(resolver.resolve(&doc, form).get(Param::ContentType), &OptionValue::str("text/global"));
}

#[test]
fn test_container_wide_ignores_conflicting_attributes() {
    let mut doc = Document::new("https://example.com/");
    let link = element(
        &mut doc,
        "a",
        &[
            ("href", "/x"),
            ("ajax-success", "alert('pwned')"),
            ("ajax-cache", "true"),
            ("ajax-timeout", "1"),
        ],
    );

    let config = ContainerConfig::new()
        .cache(false)
        .timeout(5000)
        .on_success(|_, _, _| {});
    let success = config.callbacks.success.clone().unwrap();

    let options = OptionResolver::new(config.global_options()).resolve(&doc, link);
    assert_eq!(options.get(Param::Cache), &OptionValue::bool(false));
    assert_eq!(options.get(Param::Timeout), &OptionValue::Literal(Literal::Number(5000.0)));
    assert_eq!(
        options.get(Param::Success),
        &OptionValue::Callback(CallbackRef::Success(success))
    );
}

#[test]
fn test_container_wide_never_read_from_markup() {
    let mut doc = Document::new("https://example.com/");
    let link = element(&mut doc, "a", &[("ajax-complete", "done()"), ("ajax-timeout", "10")]);

    let options = OptionResolver::new(OptionSet::new()).resolve(&doc, link);
    for param in Param::ALL.into_iter().filter(Param::is_container_wide) {
        assert!(options.get(param).is_absent(), "{}", param);
    }
}

#[test]
fn test_global_applies_to_all_elements() {
    let mut doc = Document::new("https://example.com/");
    let a = element(&mut doc, "a", &[]);
    let b = element(&mut doc, "span", &[("ajax-dataType", "html")]);

    let resolver = OptionResolver::new(ContainerConfig::new().data_type("json").global_options());
    assert_eq!(resolver.resolve(&doc, a).get(Param::DataType), &OptionValue::str("json"));
    assert_eq!(resolver.resolve(&doc, b).get(Param::DataType), &OptionValue::str("html"));
}

// ============================================================================
// Tag defaults
// ============================================================================

#[test]
fn test_form_defaults_to_post() {
    let mut doc = Document::new("https://example.com/");
    let form = element(&mut doc, "form", &[("action", "/post")]);

    let options = OptionResolver::new(OptionSet::new()).resolve(&doc, form);
    assert_eq!(options.get(Param::Method), &OptionValue::str("POST"));
    assert_eq!(options.get(Param::ProcessData), &OptionValue::bool(false));
    assert_eq!(options.get(Param::ContentType), &OptionValue::bool(false));
}

#[test]
fn test_anchor_defaults_to_get() {
    let mut doc = Document::new("https://example.com/");
    let link = element(&mut doc, "a", &[("href", "/x")]);

    let options = OptionResolver::new(OptionSet::new()).resolve(&doc, link);
    assert_eq!(options.get(Param::Method), &OptionValue::str("GET"));
    assert!(options.get(Param::ProcessData).is_absent());
    assert!(options.get(Param::ContentType).is_absent());
}

#[test]
fn test_form_method_attribute_wins() {
    let mut doc = Document::new("https://example.com/");
    let form = element(&mut doc, "form", &[("method", "get")]);

    let resolver = OptionResolver::new(ContainerConfig::new().method("PUT").global_options());
    assert_eq!(resolver.resolve(&doc, form).get(Param::Method), &OptionValue::str("get"));
}

// ============================================================================
// Finalization
// ============================================================================

#[test]
fn test_finalize_removes_absent_entries() {
    let mut doc = Document::new("https://example.com/");
    let link = element(&mut doc, "a", &[("href", "/x")]);

    let options = OptionResolver::new(OptionSet::new()).resolve(&doc, link).finalize();
    let params: Vec<_> = options.params().collect();
    assert_eq!(params, vec![Param::Url, Param::Method]);
}

#[test]
fn test_finalize_keeps_explicit_false() {
    let mut doc = Document::new("https://example.com/");
    let form = element(&mut doc, "form", &[("action", "/post")]);

    let options = OptionResolver::new(OptionSet::new()).resolve(&doc, form).finalize();
    assert_eq!(options.get(Param::ProcessData), Some(&OptionValue::bool(false)));
    assert_eq!(options.get(Param::ContentType), Some(&OptionValue::bool(false)));
    assert!(!options.contains(Param::DataType));
    assert!(!options.contains(Param::Success));
}

#[test]
fn test_callbacks_survive_to_request() {
    let mut doc = Document::new("https://example.com/");
    let link = element(&mut doc, "a", &[("href", "/x")]);

    let config = ContainerConfig::new().on_complete(|_: &AjaxResponse, _: TextStatus| {});
    let complete = config.callbacks.complete.clone().unwrap();

    let request = OptionResolver::new(config.global_options())
        .resolve(&doc, link)
        .finalize()
        .into_request();
    assert!(Arc::ptr_eq(&request.callbacks.complete.unwrap(), &complete));
    assert!(request.callbacks.error.is_none());
}
