//! Option Resolver
//!
//! Decides, per parameter and per event, which source wins:
//!
//! - container-wide parameters (`success`, `error`, `beforeSend`,
//!   `complete`, `cache`, `timeout`): the container's value, or absent
//! - everything else: element attribute, then container value, then tag
//!   default, then absent
//!
//! String values are passed through as literals and never interpreted.

use ajaxify_dom::{Document, NodeId};

use crate::attributes::{AttributeReader, TagKind};
use crate::defaults::DefaultPolicy;
use crate::options::{OptionSet, OptionValue, Param};

/// Resolves request options for one container
#[derive(Debug, Clone)]
pub struct OptionResolver {
    global: OptionSet,
    reader: AttributeReader,
    policy: DefaultPolicy,
}

impl OptionResolver {
    /// Create a resolver over the container's global options
    pub fn new(global: OptionSet) -> Self {
        Self {
            global,
            reader: AttributeReader::new(),
            policy: DefaultPolicy::new(),
        }
    }

    pub fn global(&self) -> &OptionSet {
        &self.global
    }

    /// Resolve every parameter for `element`
    pub fn resolve(&self, doc: &Document, element: NodeId) -> OptionSet {
        let kind = TagKind::of(doc.tree(), element);
        let mut options = OptionSet::new();

        for param in Param::ALL {
            options.set(param, self.resolve_param(doc, element, kind, param));
        }

        self.warn_ignored_attributes(doc, element);
        tracing::debug!(
            "Resolved {:?} <{}>: {:?}",
            element,
            doc.tree().tag_name(element).unwrap_or("?"),
            options.present().map(|p| p.name()).collect::<Vec<_>>()
        );
        options
    }

    fn resolve_param(&self, doc: &Document, element: NodeId, kind: TagKind, param: Param) -> OptionValue {
        let global = || self.global.get(param).clone();

        if param.is_container_wide() {
            return global();
        }

        self.reader
            .read(doc, element, param)
            .or_else(global)
            .or_else(|| self.policy.default_for(param, kind))
    }

    /// Container-wide settings in markup have no effect; say so
    fn warn_ignored_attributes(&self, doc: &Document, element: NodeId) {
        let tree = doc.tree();
        for param in Param::ALL.into_iter().filter(Param::is_container_wide) {
            let name = param.attribute();
            if tree.attribute(element, &name).is_some() {
                tracing::warn!(
                    "Ignoring {} on {:?}: {} can only be set on the container",
                    name,
                    element,
                    param
                );
            }
        }
    }
}
