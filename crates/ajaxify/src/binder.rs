//! Event Binder
//!
//! Attaches a container's two delegated listeners (click on triggers,
//! submit on forms) to its root element. Each firing suppresses the default
//! action, resolves options for the matched element and dispatches once.

use std::rc::Rc;

use ajaxify_css::SelectorList;
use ajaxify_dom::{Document, DomEvent, EventHandler, EventListeners, EventType, ListenerId, NodeId};

use crate::dispatcher::RequestDispatcher;
use crate::resolver::OptionResolver;

/// Listener handles of one container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub click: ListenerId,
    pub submit: ListenerId,
}

/// Binds request handling to a container's events
#[derive(Debug, Clone)]
pub struct EventBinder {
    resolver: Rc<OptionResolver>,
    dispatcher: RequestDispatcher,
}

impl EventBinder {
    pub fn new(resolver: OptionResolver, dispatcher: RequestDispatcher) -> Self {
        Self {
            resolver: Rc::new(resolver),
            dispatcher,
        }
    }

    /// Listen below `root` for clicks on `trigger` and submits of `form`
    pub fn bind(
        &self,
        listeners: &mut EventListeners,
        root: NodeId,
        trigger: &SelectorList,
        form: &SelectorList,
    ) -> Binding {
        let click = listeners.add_delegated(
            root,
            EventType::Click,
            Rc::new(trigger.clone()),
            self.handler(),
        );
        let submit = listeners.add_delegated(
            root,
            EventType::Submit,
            Rc::new(form.clone()),
            self.handler(),
        );
        Binding { click, submit }
    }

    /// Remove both listeners
    pub fn unbind(listeners: &mut EventListeners, binding: Binding) {
        listeners.remove(binding.click);
        listeners.remove(binding.submit);
    }

    fn handler(&self) -> EventHandler {
        let resolver = self.resolver.clone();
        let dispatcher = self.dispatcher.clone();

        Rc::new(move |doc: &Document, event: &mut DomEvent| {
            event.prevent_default();
            let Some(element) = event.current_target else {
                return;
            };

            tracing::debug!("Intercepted {} on {:?}", event.event_type.as_str(), element);
            let options = resolver.resolve(doc, element).finalize();
            dispatcher.dispatch(options);

            // One request per event, for the nearest matching element
            event.stop_propagation();
        })
    }
}
