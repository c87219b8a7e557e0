//! Attribute Reader
//!
//! Reads one request parameter off an element. Anchors and forms carry
//! their URL (and forms their method and payload) in native attributes;
//! every other element uses the `ajax-*` attribute family.

use ajaxify_dom::{Document, DomTree, FormData, NodeId};

use crate::options::{OptionValue, Param};

/// Tag type, as far as attribute reading and defaults care
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Anchor,
    Form,
    Other,
}

impl TagKind {
    pub fn of(tree: &DomTree, node: NodeId) -> Self {
        match tree.tag_name(node) {
            Some("a") => TagKind::Anchor,
            Some("form") => TagKind::Form,
            _ => TagKind::Other,
        }
    }
}

/// Per-element attribute source
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeReader;

impl AttributeReader {
    pub fn new() -> Self {
        Self
    }

    /// Attribute consulted for `param` on an element of kind `kind`.
    ///
    /// `None` for a form's `data`, which comes from its controls.
    pub fn attribute_name(kind: TagKind, param: Param) -> Option<String> {
        match (param, kind) {
            (Param::Url, TagKind::Anchor) => Some("href".to_string()),
            (Param::Url, TagKind::Form) => Some("action".to_string()),
            (Param::Method, TagKind::Form) => Some("method".to_string()),
            (Param::Data, TagKind::Form) => None,
            _ => Some(param.attribute()),
        }
    }

    /// Read `param` from `element`. A missing or blank attribute is absent.
    pub fn read(&self, doc: &Document, element: NodeId, param: Param) -> OptionValue {
        let tree = doc.tree();
        let kind = TagKind::of(tree, element);

        match Self::attribute_name(kind, param) {
            Some(name) => tree
                .attribute(element, &name)
                .filter(|value| !value.trim().is_empty())
                .map(OptionValue::str)
                .unwrap_or(OptionValue::Absent),
            None => OptionValue::Form(FormData::from_form(doc, element)),
        }
    }
}
