//! Document - High-level document API

use std::collections::HashMap;

use crate::{DomTree, FileEntry, NodeId};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL, the base for relative request URLs
    url: String,
    /// Files selected in `<input type="file">` controls
    files: HashMap<NodeId, Vec<FileEntry>>,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a new document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            files: HashMap::new(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            files: HashMap::new(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was built externally
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self
            .tree
            .children(root)
            .find(|(_, n)| n.as_element().is_some_and(|e| e.is("html")))
            .map(|(id, _)| id)
            .unwrap_or(NodeId::NONE);

        let (mut head, mut body) = (NodeId::NONE, NodeId::NONE);
        for (id, node) in self.tree.children(self.html_element) {
            match node.as_element().map(|e| e.tag.as_str()) {
                Some("head") => head = id,
                Some("body") => body = id,
                _ => {}
            }
        }
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get connected element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.tree.element(node).and_then(|e| e.id()) == Some(id))
    }

    /// Check whether a node is attached to the document
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.tree.root() || self.tree.is_ancestor(self.tree.root(), node)
    }

    /// Files currently selected in a file input
    pub fn files(&self, input: NodeId) -> &[FileEntry] {
        self.files.get(&input).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Select files in a file input (replaces the previous selection)
    pub fn set_files(&mut self, input: NodeId, files: Vec<FileEntry>) {
        self.files.insert(input, files);
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
