//! Ajaxify
//!
//! Declarative asynchronous requests for DOM containers.
//!
//! A container is activated once with a [`ContainerConfig`]. From then on,
//! clicks on its trigger elements and submits of its forms are intercepted:
//! the default action is suppressed, request options are resolved from
//! element attributes, container-wide settings and tag defaults, and the
//! resulting request is handed to a [`Transport`].
//!
//! # Example
//! ```rust,ignore
//! use std::rc::Rc;
//! use ajaxify::{ContainerConfig, Page, RecordingTransport};
//!
//! let transport = Rc::new(RecordingTransport::new());
//! let mut page = Page::from_html(html, "https://example.com/", transport.clone());
//! page.activate(ContainerConfig::new().with_id("c1"))?;
//! page.click(link);
//! assert_eq!(transport.last().unwrap().url.as_deref(), Some("/x"));
//! ```

mod error;
pub mod options;
mod attributes;
mod defaults;
mod resolver;
mod config;
mod container;
mod binder;
mod dispatcher;
mod page;

pub use error::ActivationError;
pub use options::{CallbackRef, FinalOptions, Literal, OptionSet, OptionValue, Param};
pub use attributes::{AttributeReader, TagKind};
pub use defaults::DefaultPolicy;
pub use resolver::OptionResolver;
pub use config::{ConfigData, ContainerConfig};
pub use container::{Container, ContainerId};
pub use binder::{Binding, EventBinder};
pub use dispatcher::RequestDispatcher;
pub use page::{DefaultAction, Page};

pub use ajaxify_dom::{Document, FormData, NodeId};
pub use ajaxify_net::{
    AjaxRequest, AjaxResponse, Callbacks, ContentType, HttpTransport, RecordingTransport,
    RequestData, ResponseBody, TextStatus, Transport, TransportError,
};

/// Version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
