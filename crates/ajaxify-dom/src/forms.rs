//! Form Data
//!
//! The form data set of a `<form>`: what the browser would submit, built
//! from the named controls in tree order.

use crate::{Document, NodeId};

/// File selected in a file input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name
    pub name: String,
    /// MIME type
    pub mime_type: String,
    /// File content
    pub content: Vec<u8>,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Placeholder submitted for a file input with nothing selected
    pub fn empty() -> Self {
        Self::new("", "application/octet-stream", Vec::new())
    }
}

/// Form data entry value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDataValue {
    Text(String),
    File(FileEntry),
}

impl FormDataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::File(_) => None,
        }
    }
}

/// Ordered multi-map of form entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormDataValue)>,
}

impl FormData {
    /// Create empty form data
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the form data set of `form`, including controls outside it
    /// that name it in their `form` attribute
    pub fn from_form(doc: &Document, form: NodeId) -> Self {
        let tree = doc.tree();
        let mut data = Self::new();
        let top = tree.ancestors(form).last().unwrap_or(form);

        for node in tree.descendants(top) {
            let Some(el) = tree.element(node) else { continue };
            if form_owner(doc, node) != Some(form) {
                continue;
            }
            let name = match el.get_attr("name") {
                Some(n) if !n.is_empty() => n,
                _ => continue,
            };
            if el.has_attr("disabled") || in_disabled_fieldset(doc, form, node) {
                continue;
            }

            match el.tag.as_str() {
                "input" => {
                    let kind = el.get_attr("type").unwrap_or("text").to_ascii_lowercase();
                    match kind.as_str() {
                        "submit" | "button" | "reset" | "image" => {}
                        "checkbox" | "radio" => {
                            if el.has_attr("checked") {
                                data.append(name, el.get_attr("value").unwrap_or("on"));
                            }
                        }
                        "file" => {
                            let files = doc.files(node);
                            if files.is_empty() {
                                data.append_file(name, FileEntry::empty());
                            }
                            for file in files {
                                data.append_file(name, file.clone());
                            }
                        }
                        _ => data.append(name, el.get_attr("value").unwrap_or("")),
                    }
                }
                "select" => {
                    for value in selected_options(doc, node) {
                        data.append(name, &value);
                    }
                }
                "textarea" => {
                    let value = match el.get_attr("value") {
                        Some(v) => v.to_string(),
                        None => tree.text_content(node),
                    };
                    data.append(name, &value);
                }
                _ => {}
            }
        }

        tracing::debug!("Form data set: {} entries", data.len());
        data
    }

    /// Append a text value
    pub fn append(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), FormDataValue::Text(value.to_string())));
    }

    /// Append a file
    pub fn append_file(&mut self, name: &str, file: FileEntry) {
        self.entries.push((name.to_string(), FormDataValue::File(file)));
    }

    /// Get first value for name
    pub fn get(&self, name: &str) -> Option<&FormDataValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Get all values for name
    pub fn get_all(&self, name: &str) -> Vec<&FormDataValue> {
        self.entries.iter().filter(|(k, _)| k == name).map(|(_, v)| v).collect()
    }

    /// Check if key exists
    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Delete all entries with name
    pub fn delete(&mut self, name: &str) {
        self.entries.retain(|(k, _)| k != name);
    }

    /// Set value (replace existing)
    pub fn set(&mut self, name: &str, value: &str) {
        self.delete(name);
        self.append(name, value);
    }

    /// Iterate over entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FormDataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether any entry is a file
    pub fn has_files(&self) -> bool {
        self.entries.iter().any(|(_, v)| matches!(v, FormDataValue::File(_)))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), FormDataValue::Text(v.into())))
                .collect(),
        }
    }
}

/// Form a control belongs to: the target of its `form` attribute if set,
/// otherwise the nearest ancestor `<form>`
pub fn form_owner(doc: &Document, control: NodeId) -> Option<NodeId> {
    let tree = doc.tree();
    if let Some(form_id) = tree.attribute(control, "form") {
        return doc
            .get_element_by_id(form_id)
            .filter(|&f| tree.tag_name(f) == Some("form"));
    }
    tree.ancestors(control).find(|&n| tree.tag_name(n) == Some("form"))
}

/// A control inside a disabled `<fieldset>` is disabled, except inside
/// that fieldset's first `<legend>`.
fn in_disabled_fieldset(doc: &Document, form: NodeId, node: NodeId) -> bool {
    let tree = doc.tree();
    let mut previous = node;
    for ancestor in tree.ancestors(node) {
        if ancestor == form {
            return false;
        }
        if let Some(el) = tree.element(ancestor) {
            if el.is("fieldset") && el.has_attr("disabled") {
                let first_legend = tree
                    .children(ancestor)
                    .find(|(_, n)| n.as_element().is_some_and(|e| e.is("legend")))
                    .map(|(id, _)| id);
                if first_legend != Some(previous) {
                    return true;
                }
            }
        }
        previous = ancestor;
    }
    false
}

/// Values of the selected options of a `<select>`. A single select with no
/// explicit selection submits its first enabled option.
fn selected_options(doc: &Document, select: NodeId) -> Vec<String> {
    let tree = doc.tree();
    let options: Vec<NodeId> = tree
        .descendants(select)
        .into_iter()
        .filter(|&n| tree.element(n).is_some_and(|e| e.is("option")))
        .collect();

    let value_of = |option: NodeId| -> String {
        match tree.attribute(option, "value") {
            Some(v) => v.to_string(),
            None => tree
                .text_content(option)
                .split_ascii_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        }
    };
    let enabled = |option: &NodeId| tree.attribute(*option, "disabled").is_none();

    let selected: Vec<String> = options
        .iter()
        .filter(|&&o| tree.attribute(o, "selected").is_some())
        .filter(|&&o| enabled(&o))
        .map(|&o| value_of(o))
        .collect();

    let multiple = tree.attribute(select, "multiple").is_some();
    if selected.is_empty() && !multiple {
        return options.iter().find(|&&o| enabled(&o)).map(|&o| vec![value_of(o)]).unwrap_or_default();
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(build: impl FnOnce(&mut Document, NodeId)) -> (Document, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let form = doc.tree_mut().create_element("form");
        doc.tree_mut().append_child(body, form);
        build(&mut doc, form);
        (doc, form)
    }

    fn control(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let tree = doc.tree_mut();
        let id = tree.create_element(tag);
        for (k, v) in attrs {
            tree.set_attribute(id, k, v);
        }
        tree.append_child(parent, id);
        id
    }

    #[test]
    fn test_named_text_inputs() {
        let (doc, form) = form_with(|doc, form| {
            control(doc, form, "input", &[("name", "name"), ("value", "Fangxin")]);
            control(doc, form, "input", &[("name", "age"), ("value", "22")]);
            control(doc, form, "input", &[("value", "unnamed")]);
            control(doc, form, "input", &[("type", "submit"), ("name", "go"), ("value", "Submit")]);
        });

        let data = FormData::from_form(&doc, form);
        let expected: FormData = [("name", "Fangxin"), ("age", "22")].into_iter().collect();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_checkbox_and_disabled() {
        let (doc, form) = form_with(|doc, form| {
            control(doc, form, "input", &[("type", "checkbox"), ("name", "a"), ("checked", "")]);
            control(doc, form, "input", &[("type", "checkbox"), ("name", "b")]);
            control(doc, form, "input", &[("name", "c"), ("disabled", "")]);
        });

        let data = FormData::from_form(&doc, form);
        assert_eq!(data.len(), 1);
        assert_eq!(data.get("a").and_then(FormDataValue::as_text), Some("on"));
    }

    #[test]
    fn test_disabled_fieldset() {
        let (doc, form) = form_with(|doc, form| {
            let fieldset = control(doc, form, "fieldset", &[("disabled", "")]);
            let legend = control(doc, fieldset, "legend", &[]);
            control(doc, legend, "input", &[("name", "kept")]);
            control(doc, fieldset, "input", &[("name", "dropped")]);
        });

        let data = FormData::from_form(&doc, form);
        assert!(data.has("kept"));
        assert!(!data.has("dropped"));
    }

    #[test]
    fn test_file_input() {
        let mut input = NodeId::NONE;
        let (mut doc, form) = form_with(|doc, form| {
            input = control(doc, form, "input", &[("type", "file"), ("name", "upload")]);
        });

        let empty = FormData::from_form(&doc, form);
        assert_eq!(empty.get("upload"), Some(&FormDataValue::File(FileEntry::empty())));

        let file = FileEntry::new("a.txt", "text/plain", b"hello".to_vec());
        doc.set_files(input, vec![file.clone()]);
        let data = FormData::from_form(&doc, form);
        assert_eq!(data.get("upload"), Some(&FormDataValue::File(file)));
        assert!(data.has_files());
    }

    #[test]
    fn test_select_and_textarea() {
        let (doc, form) = form_with(|doc, form| {
            let select = control(doc, form, "select", &[("name", "color")]);
            let red = control(doc, select, "option", &[]);
            let text = doc.tree_mut().create_text("  Red ");
            doc.tree_mut().append_child(red, text);
            control(doc, select, "option", &[("value", "blue")]);

            let area = control(doc, form, "textarea", &[("name", "note")]);
            let body = doc.tree_mut().create_text("hi there");
            doc.tree_mut().append_child(area, body);
        });

        let data = FormData::from_form(&doc, form);
        assert_eq!(data.get("color").and_then(FormDataValue::as_text), Some("Red"));
        assert_eq!(data.get("note").and_then(FormDataValue::as_text), Some("hi there"));
    }

    #[test]
    fn test_form_attribute_controls() {
        let mut doc = Document::default();
        let body = doc.body();
        let form = control(&mut doc, body, "form", &[("id", "f")]);
        control(&mut doc, form, "input", &[("name", "inside"), ("value", "1")]);
        control(&mut doc, body, "input", &[("name", "outside"), ("value", "2"), ("form", "f")]);
        control(&mut doc, body, "input", &[("name", "stray"), ("value", "3")]);
        let other = control(&mut doc, body, "form", &[("id", "g")]);
        control(&mut doc, form, "input", &[("name", "moved"), ("value", "4"), ("form", "g")]);

        let data = FormData::from_form(&doc, form);
        let expected: FormData = [("inside", "1"), ("outside", "2")].into_iter().collect();
        assert_eq!(data, expected);

        let data = FormData::from_form(&doc, other);
        assert_eq!(data.get("moved").and_then(FormDataValue::as_text), Some("4"));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_multiple_select() {
        let (doc, form) = form_with(|doc, form| {
            let select = control(doc, form, "select", &[("name", "tags"), ("multiple", "")]);
            control(doc, select, "option", &[("value", "a"), ("selected", "")]);
            control(doc, select, "option", &[("value", "b")]);
            control(doc, select, "option", &[("value", "c"), ("selected", "")]);
        });

        let data = FormData::from_form(&doc, form);
        let values: Vec<_> = data.get_all("tags").into_iter().filter_map(FormDataValue::as_text).collect();
        assert_eq!(values, vec!["a", "c"]);
    }
}
