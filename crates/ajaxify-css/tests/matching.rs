//! Selector matching tests against a hand-built DOM

use ajaxify_css::{SelectorList, parse_selector_list};
use ajaxify_dom::{Document, NodeId};

struct Page {
    doc: Document,
    container: NodeId,
    link: NodeId,
    button: NodeId,
    form: NodeId,
    outside: NodeId,
}

fn element(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let tree = doc.tree_mut();
    let id = tree.create_element(tag);
    for (k, v) in attrs {
        tree.set_attribute(id, k, v);
    }
    tree.append_child(parent, id);
    id
}

/// <div id="c1">
///   <p><a href="/x" data-ajax>..</a></p>
///   <button data-ajax="1" class="btn primary">..</button>
///   <form action="/post" data-ajax></form>
/// </div>
/// <a id="out" href="/y" data-ajax></a>
fn page() -> Page {
    let mut doc = Document::new("https://example.com/");
    let body = doc.body();
    let container = element(&mut doc, body, "div", &[("id", "c1")]);
    let p = element(&mut doc, container, "p", &[]);
    let link = element(&mut doc, p, "a", &[("href", "/x"), ("data-ajax", "")]);
    let button = element(&mut doc, container, "button", &[("data-ajax", "1"), ("class", "btn primary")]);
    let form = element(&mut doc, container, "form", &[("action", "/post"), ("data-ajax", "")]);
    let outside = element(&mut doc, body, "a", &[("id", "out"), ("href", "/y"), ("data-ajax", "")]);
    Page { doc, container, link, button, form, outside }
}

fn sel(s: &str) -> SelectorList {
    parse_selector_list(s).unwrap()
}

// ============================================================================
// DEFAULT CONTAINER SELECTORS
// ============================================================================

#[test]
fn test_default_trigger_selector() {
    let p = page();
    let tree = p.doc.tree();
    let trigger = sel("#c1 [data-ajax]:not(form)");

    assert!(trigger.matches(tree, p.link));
    assert!(trigger.matches(tree, p.button));
    assert!(!trigger.matches(tree, p.form));
    assert!(!trigger.matches(tree, p.outside));
    assert!(!trigger.matches(tree, p.container));
}

#[test]
fn test_default_submit_selector() {
    let p = page();
    let tree = p.doc.tree();
    let submit = sel("#c1 form[data-ajax]");

    assert!(submit.matches(tree, p.form));
    assert!(!submit.matches(tree, p.link));
    assert_eq!(submit.query_all(tree, tree.root()), vec![p.form]);
}

#[test]
fn test_late_added_element_matches() {
    let mut p = page();
    let trigger = sel("#c1 [data-ajax]:not(form)");
    let late = element(&mut p.doc, p.container, "span", &[("data-ajax", "")]);

    assert!(trigger.matches(p.doc.tree(), late));

    p.doc.tree_mut().detach(late);
    assert!(!trigger.matches(p.doc.tree(), late));
}

// ============================================================================
// SELECTOR FEATURES
// ============================================================================

#[test]
fn test_child_combinator() {
    let p = page();
    let tree = p.doc.tree();

    assert!(sel("#c1 > button").matches(tree, p.button));
    assert!(!sel("#c1 > a").matches(tree, p.link));
    assert!(sel("#c1 > p > a").matches(tree, p.link));
}

#[test]
fn test_sibling_combinators() {
    let p = page();
    let tree = p.doc.tree();

    assert!(sel("p + button").matches(tree, p.button));
    assert!(!sel("p + form").matches(tree, p.form));
    assert!(sel("p ~ form").matches(tree, p.form));
}

#[test]
fn test_class_and_attribute_values() {
    let p = page();
    let tree = p.doc.tree();

    assert!(sel(".btn.primary").matches(tree, p.button));
    assert!(sel("[class~=primary]").matches(tree, p.button));
    assert!(sel("[data-ajax='1']").matches(tree, p.button));
    assert!(!sel("[data-ajax='1']").matches(tree, p.link));
    assert!(sel("a[href^='/']").matches(tree, p.link));
}

#[test]
fn test_structural_pseudo_classes() {
    let p = page();
    let tree = p.doc.tree();

    assert!(!sel("#c1 > :first-child").matches(tree, p.link));
    assert!(sel("#c1 > p:first-child").matches(tree, tree.parent(p.link).unwrap()));
    assert!(sel("#c1 > :last-child").matches(tree, p.form));
    assert!(sel("#c1 > :nth-child(2)").matches(tree, p.button));
    assert!(sel("a:only-child").matches(tree, p.link));
    assert!(sel("form:empty").matches(tree, p.form));
    assert!(sel("a:link").matches(tree, p.outside));
}

#[test]
fn test_selector_list_and_is() {
    let p = page();
    let tree = p.doc.tree();

    let list = sel("form, #out");
    assert!(list.matches(tree, p.form));
    assert!(list.matches(tree, p.outside));
    assert!(!list.matches(tree, p.button));

    assert!(sel(":is(button, form)[data-ajax]").matches(tree, p.form));
}

#[test]
fn test_closest() {
    let mut p = page();
    let inner = element(&mut p.doc, p.link, "span", &[]);
    let tree = p.doc.tree();

    assert_eq!(sel("a[data-ajax]").closest(tree, inner), Some(p.link));
    assert_eq!(sel("form").closest(tree, inner), None);
}

#[test]
fn test_from_str_and_display() {
    let list: SelectorList = "  #c1 form[data-ajax] ".parse().unwrap();
    assert_eq!(list.to_string(), "#c1 form[data-ajax]");
    assert!("#c1 >".parse::<SelectorList>().is_err());
}
