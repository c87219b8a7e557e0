//! Container
//!
//! One activation scope: the root element, the effective selectors and the
//! listeners bound for them.

use std::collections::BTreeMap;
use std::fmt;

use ajaxify_css::SelectorList;
use ajaxify_dom::NodeId;

use crate::binder::Binding;
use crate::config::ContainerConfig;

/// Container identifier (the root element's `id`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Default click selector: marked elements below the container, forms excluded
pub fn default_trigger_selector(id: &str) -> String {
    format!("#{} [data-ajax]:not(form)", escape_ident(id))
}

/// Default submit selector: marked forms below the container
pub fn default_form_selector(id: &str) -> String {
    format!("#{} form[data-ajax]", escape_ident(id))
}

/// Backslash-escape characters that cannot appear in a selector identifier
fn escape_ident(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        if !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Active container
#[derive(Debug)]
pub struct Container {
    id: ContainerId,
    root: NodeId,
    trigger: SelectorList,
    form: SelectorList,
    html_options: BTreeMap<String, String>,
    binding: Binding,
}

impl Container {
    pub(crate) fn new(
        id: ContainerId,
        root: NodeId,
        trigger: SelectorList,
        form: SelectorList,
        config: &ContainerConfig,
        binding: Binding,
    ) -> Self {
        Self {
            id,
            root,
            trigger,
            form,
            html_options: config.html_options.clone(),
            binding,
        }
    }

    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    /// Root element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Effective click selector
    pub fn trigger_selector(&self) -> &SelectorList {
        &self.trigger
    }

    /// Effective submit selector
    pub fn form_selector(&self) -> &SelectorList {
        &self.form
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    /// Opening tag of the container element
    pub fn begin_tag(&self) -> String {
        begin_tag(self.id.as_str(), &self.html_options)
    }

    /// Closing tag of the container element
    pub fn end_tag(&self) -> String {
        end_tag()
    }
}

/// Render `<div id="...">` with extra attributes sorted by name.
///
/// An `id` among the extra attributes is ignored.
pub fn begin_tag(id: &str, attributes: &BTreeMap<String, String>) -> String {
    let mut tag = format!("<div id=\"{}\"", escape(id));
    for (name, value) in attributes {
        if name.eq_ignore_ascii_case("id") {
            continue;
        }
        tag.push_str(&format!(" {}=\"{}\"", name, escape(value)));
    }
    tag.push('>');
    tag
}

pub fn end_tag() -> String {
    "</div>".to_string()
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
