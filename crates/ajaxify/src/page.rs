//! Page - a document with active containers
//!
//! Owns the parsed document, the listener registry and the containers.
//! `click` and `submit` play the part of the user: they fire the event
//! through the listeners and report what the browser would do next.

use std::rc::Rc;

use ajaxify_css::{SelectorList, parse_selector_list};
use ajaxify_dom::{Document, DomEvent, DomTree, EventListeners, NodeId, form_owner};
use ajaxify_html::HtmlParser;
use ajaxify_net::Transport;

use crate::binder::EventBinder;
use crate::config::ContainerConfig;
use crate::container::{Container, ContainerId, default_form_selector, default_trigger_selector};
use crate::dispatcher::RequestDispatcher;
use crate::resolver::OptionResolver;
use crate::ActivationError;

/// Prefix of generated container ids
const AUTO_ID_PREFIX: &str = "w";

/// What happens after an event has been dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultAction {
    /// A listener cancelled the default action
    Suppressed,
    /// Follow a link
    Navigate(String),
    /// Submit a form the ordinary way
    Submit { action: String, method: String },
    /// Nothing to do
    None,
}

/// Document host
pub struct Page {
    document: Document,
    listeners: EventListeners,
    containers: Vec<Container>,
    next_auto_id: usize,
    transport: Rc<dyn Transport>,
}

impl Page {
    /// Create a page over an existing document
    pub fn new(document: Document, transport: Rc<dyn Transport>) -> Self {
        Self {
            document,
            listeners: EventListeners::new(),
            containers: Vec::new(),
            next_auto_id: 0,
            transport,
        }
    }

    /// Parse `html` and host it
    pub fn from_html(html: &str, url: &str, transport: Rc<dyn Transport>) -> Self {
        Self::new(HtmlParser::new().parse_with_url(html, url), transport)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document; containers keep working on nodes added later
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn listeners(&self) -> &EventListeners {
        &self.listeners
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id().as_str() == id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    /// Next generated id (`w0`, `w1`, ...) not taken by an active container
    pub fn next_id(&mut self) -> String {
        loop {
            let id = format!("{}{}", AUTO_ID_PREFIX, self.next_auto_id);
            self.next_auto_id += 1;
            if self.container(&id).is_none() {
                return id;
            }
        }
    }

    /// Activate a container on the element carrying its id
    pub fn activate(&mut self, config: ContainerConfig) -> Result<ContainerId, ActivationError> {
        let id = match config.id.clone() {
            Some(id) => id,
            None => self.next_id(),
        };

        if self.container(&id).is_some() {
            return Err(ActivationError::DuplicateContainer(id));
        }
        let root = self
            .document
            .get_element_by_id(&id)
            .ok_or_else(|| ActivationError::MissingRoot(id.clone()))?;

        let trigger = parse_selector(
            config
                .trigger_selector
                .clone()
                .unwrap_or_else(|| default_trigger_selector(&id)),
        )?;
        let form = parse_selector(
            config
                .form_selector
                .clone()
                .unwrap_or_else(|| default_form_selector(&id)),
        )?;

        let binder = EventBinder::new(
            OptionResolver::new(config.global_options()),
            RequestDispatcher::new(self.transport.clone()),
        );
        let binding = binder.bind(&mut self.listeners, root, &trigger, &form);

        tracing::info!(
            "Activated container #{} (click: {}, submit: {})",
            id,
            trigger,
            form
        );

        let id = ContainerId::new(id);
        self.containers
            .push(Container::new(id.clone(), root, trigger, form, &config, binding));
        Ok(id)
    }

    /// Create the container element under `parent`, then activate it.
    ///
    /// The element gets the (possibly generated) id and the configured
    /// extra attributes.
    pub fn mount(
        &mut self,
        parent: NodeId,
        mut config: ContainerConfig,
    ) -> Result<ContainerId, ActivationError> {
        let id = match config.id.clone() {
            Some(id) => id,
            None => self.next_id(),
        };
        if self.container(&id).is_some() {
            return Err(ActivationError::DuplicateContainer(id));
        }

        let tree = self.document.tree_mut();
        let root = tree.create_element("div");
        tree.set_attribute(root, "id", &id);
        for (name, value) in &config.html_options {
            if !name.eq_ignore_ascii_case("id") {
                tree.set_attribute(root, name, value);
            }
        }
        tree.append_child(parent, root);

        config.id = Some(id);
        self.activate(config)
    }

    /// Tear a container down. Returns false if it was not active.
    pub fn deactivate(&mut self, id: &str) -> bool {
        let Some(index) = self.containers.iter().position(|c| c.id().as_str() == id) else {
            return false;
        };
        let container = self.containers.remove(index);
        EventBinder::unbind(&mut self.listeners, container.binding());
        tracing::info!("Deactivated container #{}", id);
        true
    }

    /// Click `node` and report the default action
    pub fn click(&mut self, node: NodeId) -> DefaultAction {
        let mut event = DomEvent::click(node);
        if !self.listeners.dispatch(&self.document, &mut event) {
            return DefaultAction::Suppressed;
        }

        match activation_behavior(&self.document, node) {
            Some(Activation::Follow(href)) => DefaultAction::Navigate(href),
            Some(Activation::SubmitForm(form)) => self.submit(form),
            None => DefaultAction::None,
        }
    }

    /// Submit `form` and report the default action
    pub fn submit(&mut self, form: NodeId) -> DefaultAction {
        let mut event = DomEvent::submit(form);
        if !self.listeners.dispatch(&self.document, &mut event) {
            return DefaultAction::Suppressed;
        }

        let tree = self.document.tree();
        let action = tree
            .attribute(form, "action")
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(self.document.url())
            .to_string();
        let method = tree
            .attribute(form, "method")
            .map(|m| m.trim().to_ascii_uppercase())
            .filter(|m| m == "POST" || m == "DIALOG")
            .unwrap_or_else(|| "GET".to_string());

        DefaultAction::Submit { action, method }
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.document.url())
            .field("containers", &self.containers)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

fn parse_selector(selector: String) -> Result<SelectorList, ActivationError> {
    parse_selector_list(&selector)
        .map_err(|source| ActivationError::InvalidSelector { selector, source })
}

enum Activation {
    Follow(String),
    SubmitForm(NodeId),
}

/// Nearest activatable element at or above `node`
fn activation_behavior(doc: &Document, node: NodeId) -> Option<Activation> {
    let tree = doc.tree();
    for current in std::iter::once(node).chain(tree.ancestors(node)) {
        let Some(element) = tree.element(current) else {
            continue;
        };
        if element.is("a") {
            if let Some(href) = element.get_attr("href") {
                return Some(Activation::Follow(href.to_string()));
            }
        }
        if is_submit_button(tree, current) {
            return form_owner(doc, current).map(Activation::SubmitForm);
        }
    }
    None
}

fn is_submit_button(tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.element(node) else {
        return false;
    };
    if element.has_attr("disabled") {
        return false;
    }
    let kind = element.get_attr("type").map(|t| t.trim().to_ascii_lowercase());
    match element.tag.as_str() {
        "button" => matches!(kind.as_deref(), None | Some("submit") | Some("")),
        "input" => matches!(kind.as_deref(), Some("submit") | Some("image")),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ajaxify_net::RecordingTransport;

    fn page(html: &str) -> (Page, Rc<RecordingTransport>) {
        let transport = Rc::new(RecordingTransport::new());
        (Page::from_html(html, "https://example.com/site/", transport.clone()), transport)
    }

    #[test]
    fn test_next_id_sequence() {
        let (mut page, _) = page("<div id=\"w0\"></div>");
        assert_eq!(page.next_id(), "w0");
        assert_eq!(page.next_id(), "w1");
    }

    #[test]
    fn test_auto_id_skips_active() {
        let (mut page, _) = page("<div id=\"w0\"></div><div id=\"w1\"></div>");
        page.activate(ContainerConfig::new().with_id("w0")).unwrap();
        let id = page.activate(ContainerConfig::new()).unwrap();
        assert_eq!(id.as_str(), "w1");
    }

    #[test]
    fn test_submit_default_action() {
        let (mut page, _) = page("<form id=\"f\" action=\"/go\" method=\"post\"></form><form id=\"g\"></form>");
        let f = page.document().get_element_by_id("f").unwrap();
        let g = page.document().get_element_by_id("g").unwrap();

        assert_eq!(
            page.submit(f),
            DefaultAction::Submit { action: "/go".into(), method: "POST".into() }
        );
        assert_eq!(
            page.submit(g),
            DefaultAction::Submit { action: "https://example.com/site/".into(), method: "GET".into() }
        );
    }

    #[test]
    fn test_submit_button_form_attribute() {
        let (mut page, _) = page("<form id=\"f\" action=\"/go\"></form><button id=\"b\" form=\"f\">Go</button>");
        let button = page.document().get_element_by_id("b").unwrap();
        assert_eq!(
            page.click(button),
            DefaultAction::Submit { action: "/go".into(), method: "GET".into() }
        );
    }

    #[test]
    fn test_click_plain_element() {
        let (mut page, transport) = page("<p id=\"p\">text</p>");
        let p = page.document().get_element_by_id("p").unwrap();
        assert_eq!(page.click(p), DefaultAction::None);
        assert!(transport.is_empty());
    }
}
