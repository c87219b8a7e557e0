//! Request value
//!
//! What a transport receives per triggering event. Every field is optional:
//! a parameter nobody configured is simply not set.

use std::fmt;
use std::sync::Arc;

use ajaxify_dom::FormData;

use crate::{AjaxResponse, ResponseBody, TextStatus};

/// Called with the interpreted body when the request succeeds
pub type SuccessCallback = Arc<dyn Fn(&ResponseBody, TextStatus, &AjaxResponse) + Send + Sync>;
/// Called with the response, status and error text when the request fails
pub type ErrorCallback = Arc<dyn Fn(&AjaxResponse, TextStatus, &str) + Send + Sync>;
/// Called before the request goes out; returning `false` cancels it
pub type BeforeSendCallback = Arc<dyn Fn(&AjaxRequest) -> bool + Send + Sync>;
/// Called last, after success or error
pub type CompleteCallback = Arc<dyn Fn(&AjaxResponse, TextStatus) + Send + Sync>;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl Method {
    /// Parse an HTTP verb (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            "HEAD" => Some(Method::Head),
            "OPTIONS" => Some(Method::Options),
            "PATCH" => Some(Method::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }

    /// Whether request data goes into the query string instead of a body
    pub fn has_no_content(&self) -> bool {
        matches!(self, Method::Get | Method::Head)
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestData {
    /// Raw string, sent as-is
    Text(String),
    /// Structured key/value payload (form data set)
    Form(FormData),
}

/// `contentType` setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    /// Explicit header value
    Header(String),
    /// `false`: leave the content type to the body encoding
    Disabled,
}

/// Lifecycle callbacks
#[derive(Clone, Default)]
pub struct Callbacks {
    pub success: Option<SuccessCallback>,
    pub error: Option<ErrorCallback>,
    pub before_send: Option<BeforeSendCallback>,
    pub complete: Option<CompleteCallback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("success", &self.success.is_some())
            .field("error", &self.error.is_some())
            .field("before_send", &self.before_send.is_some())
            .field("complete", &self.complete.is_some())
            .finish()
    }
}

/// One asynchronous request, built per event and consumed by a transport
#[derive(Debug, Clone, Default)]
pub struct AjaxRequest {
    /// HTTP verb as configured (not yet validated)
    pub method: Option<String>,
    /// Target URL, possibly relative
    pub url: Option<String>,
    pub data: Option<RequestData>,
    /// Expected response type (`json`, `html`, `text`, ...)
    pub data_type: Option<String>,
    pub process_data: Option<bool>,
    pub content_type: Option<ContentType>,
    pub cache: Option<bool>,
    /// Milliseconds before abort
    pub timeout: Option<u64>,
    pub callbacks: Callbacks,
}

impl AjaxRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(url: &str) -> Self {
        Self {
            method: Some("GET".to_string()),
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    pub fn post(url: &str) -> Self {
        Self {
            method: Some("POST".to_string()),
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: RequestData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_data_type(mut self, data_type: &str) -> Self {
        self.data_type = Some(data_type.to_string());
        self
    }

    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Effective method: configured verb upper-cased, `GET` when unset
    pub fn method_name(&self) -> String {
        self.method.as_deref().unwrap_or("GET").trim().to_ascii_uppercase()
    }
}
