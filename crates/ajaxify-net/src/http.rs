//! HTTP transport
//!
//! Turns an [`AjaxRequest`] into a concrete HTTP exchange with the
//! blocking `reqwest` client, one worker thread per request.

use std::thread;
use std::time::Duration;

use url::Url;

use crate::body::{self, FORM_URLENCODED};
use crate::transport::execute;
use crate::{
    AjaxRequest, AjaxResponse, ContentType, Method, RequestData, TextStatus, Transport,
    TransportError,
};

/// Request with every setting resolved to wire form
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

impl PreparedRequest {
    /// Get header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Resolve a request against the page URL.
pub fn prepare(request: &AjaxRequest, base: &Url) -> Result<PreparedRequest, TransportError> {
    let method_name = request.method_name();
    let method = Method::parse(&method_name)
        .ok_or_else(|| TransportError::UnsupportedMethod(method_name.clone()))?;

    let mut url = match request.url.as_deref().map(str::trim) {
        None | Some("") => base.clone(),
        Some(target) => base
            .join(target)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", target, e)))?,
    };

    let mut headers = vec![
        ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
        ("Accept".to_string(), body::accept_for(request.data_type.as_deref()).to_string()),
    ];

    let mut payload = None;
    // Content type implied by the body encoding
    let mut implied_type = None;

    if method.has_no_content() {
        match &request.data {
            Some(RequestData::Text(text)) => body::append_query(&mut url, text.trim_start_matches('?')),
            Some(RequestData::Form(form)) => body::append_query(&mut url, &body::urlencode(form)),
            None => {}
        }
        if request.cache == Some(false) {
            body::cache_bust(&mut url);
        }
    } else {
        match &request.data {
            Some(RequestData::Text(text)) => {
                payload = Some(text.clone().into_bytes());
            }
            Some(RequestData::Form(form)) if request.process_data == Some(false) => {
                let (content_type, bytes) = body::multipart(form);
                implied_type = Some(content_type);
                payload = Some(bytes);
            }
            Some(RequestData::Form(form)) => {
                payload = Some(body::urlencode(form).into_bytes());
            }
            None => {}
        }
    }

    let content_type = match &request.content_type {
        Some(ContentType::Header(value)) => Some(value.clone()),
        Some(ContentType::Disabled) => implied_type,
        None if payload.is_some() => implied_type.or_else(|| Some(FORM_URLENCODED.to_string())),
        None => None,
    };
    if let Some(content_type) = content_type {
        headers.push(("Content-Type".to_string(), content_type));
    }

    Ok(PreparedRequest {
        method,
        url,
        headers,
        body: payload,
        timeout: request.timeout.filter(|&ms| ms > 0).map(Duration::from_millis),
    })
}

/// Perform a prepared request on the calling thread
pub fn perform(
    client: &reqwest::blocking::Client,
    prepared: &PreparedRequest,
) -> Result<AjaxResponse, TransportError> {
    let url = prepared.url.as_str();
    let mut request = match prepared.method {
        Method::Get => client.get(url),
        Method::Post => client.post(url),
        Method::Put => client.put(url),
        Method::Delete => client.delete(url),
        Method::Head => client.head(url),
        Method::Patch => client.patch(url),
        Method::Options => client.request(reqwest::Method::OPTIONS, url),
    };

    for (name, value) in &prepared.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(bytes) = &prepared.body {
        request = request.body(bytes.clone());
    }
    if let Some(timeout) = prepared.timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().map_err(map_error)?;

    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.to_string(), v.to_string())))
        .collect();
    let body = response.text().map_err(map_error)?;

    Ok(AjaxResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        headers,
        body,
    })
}

fn map_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}

/// Transport backed by a real HTTP client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base: Url,
}

impl HttpTransport {
    /// Create a transport resolving relative URLs against `base`
    pub fn new(base: &str) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Self::with_client(client, base)
    }

    pub fn with_client(client: reqwest::blocking::Client, base: &str) -> Result<Self, TransportError> {
        let base = Url::parse(base).map_err(|e| TransportError::InvalidUrl(format!("{}: {}", base, e)))?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Run the request lifecycle on the calling thread.
    ///
    /// Returns the final text status ([`TextStatus::Canceled`] when
    /// `beforeSend` vetoed the request).
    pub fn send_blocking(&self, request: AjaxRequest) -> TextStatus {
        run(&self.client, &self.base, &request)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: AjaxRequest) {
        let client = self.client.clone();
        let base = self.base.clone();

        let spawned = thread::Builder::new()
            .name("ajaxify-request".to_string())
            .spawn(move || {
                run(&client, &base, &request);
            });
        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn request worker: {}", e);
        }
    }
}

fn run(client: &reqwest::blocking::Client, base: &Url, request: &AjaxRequest) -> TextStatus {
    execute(request, |request| {
        let prepared = prepare(request, base)?;
        tracing::info!("HTTP {} {}", prepared.method.as_str(), prepared.url);
        perform(client, &prepared)
    })
}
