//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena DOM.

use ajaxify_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        // Reading from an in-memory slice cannot fail; keep going with an
        // empty tree if it ever does.
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .unwrap_or_else(|e| {
                tracing::warn!("HTML read failed: {}", e);
                RcDom::default()
            });

        let mut document = Document::empty(url);
        let root = document.tree().root();
        convert_node(&dom.document, document.tree_mut(), root);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }
}

/// Convert an RcDom node (and its subtree) into our DOM format
fn convert_node(handle: &Handle, tree: &mut DomTree, parent: NodeId) {
    match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, tree, parent);
            }
        }
        RcNodeData::Text { contents } => {
            let id = tree.create_text(&contents.borrow().to_string());
            tree.append_child(parent, id);
        }
        RcNodeData::Comment { contents } => {
            let id = tree.create_comment(&contents.to_string());
            tree.append_child(parent, id);
        }
        RcNodeData::Element { name, attrs, .. } => {
            let id = tree.create_element(&name.local);
            if let Some(element) = tree.element_mut(id) {
                for attr in attrs.borrow().iter() {
                    element.set_attr(&attr.name.local, attr.value.to_string());
                }
            }
            tree.append_child(parent, id);

            for child in handle.children.borrow().iter() {
                convert_node(child, tree, id);
            }
        }
        RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html);

        assert!(doc.body().is_valid());
        assert_eq!(doc.tree().text_content(doc.body()), "Hello");
    }

    #[test]
    fn test_parse_fragment_gets_body() {
        let doc = HtmlParser::new().parse("<div id=\"c1\"><span>Text</span></div>");

        // Fragments get wrapped in html/head/body by html5ever
        let div = doc.get_element_by_id("c1").unwrap();
        assert_eq!(doc.tree().parent(div), Some(doc.body()));
    }

    #[test]
    fn test_attribute_names_lowercased() {
        let doc = HtmlParser::new().parse(r#"<a id="l" ajax-dataType="json" data-ajax>x</a>"#);
        let link = doc.get_element_by_id("l").unwrap();
        let el = doc.tree().element(link).unwrap();

        assert_eq!(el.get_attr("ajax-dataType"), Some("json"));
        assert!(el.attrs.iter().any(|a| a.name == "ajax-datatype"));
        assert_eq!(el.get_attr("data-ajax"), Some(""));
    }
}
