//! Ajaxify Networking
//!
//! The request value handed to a transport, the callbacks it carries, and
//! the transports themselves: a `reqwest`-backed HTTP transport and a
//! recording transport for tests and embedding.

mod request;
mod response;
pub mod body;
mod transport;
mod http;

pub use request::{
    AjaxRequest, BeforeSendCallback, Callbacks, CompleteCallback, ContentType, ErrorCallback,
    Method, RequestData, SuccessCallback,
};
pub use response::{AjaxResponse, ResponseBody, TextStatus};
pub use transport::{RecordingTransport, Transport, deliver, execute};
pub use http::{HttpTransport, PreparedRequest, prepare};
pub use url::Url;

/// Transport error
///
/// Never returned from [`Transport::send`]; reported to the request's
/// error callback instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl TransportError {
    /// Status text reported to callbacks for this failure
    pub fn text_status(&self) -> TextStatus {
        match self {
            TransportError::Timeout => TextStatus::Timeout,
            TransportError::Parse(_) => TextStatus::ParserError,
            _ => TextStatus::Error,
        }
    }
}
