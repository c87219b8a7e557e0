//! Delegated Event Listeners
//!
//! A listener is registered once on a root element together with a matcher.
//! Matching runs against the live tree each time an event fires, so nodes
//! added after registration are handled and removed nodes are not.

use std::fmt;
use std::rc::Rc;

use crate::{Document, DomEvent, DomTree, EventType, NodeId};

/// Decides whether an element is a delegation target.
///
/// Implemented by the selector layer; the DOM only asks yes/no questions.
pub trait ElementMatcher {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool;
}

impl<F> ElementMatcher for F
where
    F: Fn(&DomTree, NodeId) -> bool,
{
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self(tree, node)
    }
}

/// Handler invoked with `event.current_target` set to the matched node
pub type EventHandler = Rc<dyn Fn(&Document, &mut DomEvent)>;

/// Listener handle, used for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

struct DelegatedListener {
    id: ListenerId,
    root: NodeId,
    event_type: EventType,
    matcher: Rc<dyn ElementMatcher>,
    handler: EventHandler,
}

impl fmt::Debug for DelegatedListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedListener")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

/// Registry of delegated listeners for one document
#[derive(Debug, Default)]
pub struct EventListeners {
    next_id: u64,
    delegated: Vec<DelegatedListener>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen on `root` for events whose path crosses an element accepted
    /// by `matcher` below `root`.
    pub fn add_delegated(
        &mut self,
        root: NodeId,
        event_type: EventType,
        matcher: Rc<dyn ElementMatcher>,
        handler: EventHandler,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.delegated.push(DelegatedListener {
            id,
            root,
            event_type,
            matcher,
            handler,
        });
        tracing::debug!("Added delegated {} listener {:?} on {:?}", event_type.as_str(), id, root);
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.delegated.len();
        self.delegated.retain(|l| l.id != id);
        self.delegated.len() < before
    }

    /// Number of listeners registered on `root`
    pub fn count_on(&self, root: NodeId) -> usize {
        self.delegated.iter().filter(|l| l.root == root).count()
    }

    pub fn len(&self) -> usize {
        self.delegated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegated.is_empty()
    }

    /// Dispatch an event through the bubbling path.
    ///
    /// Listening roots are visited from the target outwards; for each root,
    /// every node between the target and the root (root excluded) that the
    /// matcher accepts gets one handler call, nearest first.
    ///
    /// Returns `false` if a handler prevented the default action.
    pub fn dispatch(&self, doc: &Document, event: &mut DomEvent) -> bool {
        let tree = doc.tree();
        let event_type = event.event_type;
        let mut path = vec![event.target];
        path.extend(tree.ancestors(event.target));

        'path: for (depth, &listening) in path.iter().enumerate() {
            for listener in self
                .delegated
                .iter()
                .filter(|l| l.root == listening && l.event_type == event_type)
            {
                for &candidate in &path[..depth] {
                    if !listener.matcher.matches(tree, candidate) {
                        continue;
                    }
                    event.current_target = Some(candidate);
                    (listener.handler)(doc, event);
                    if event.is_propagation_stopped() {
                        break 'path;
                    }
                }
            }
            if !event.bubbles {
                break;
            }
        }

        event.current_target = None;
        !event.is_default_prevented()
    }
}
