//! Transport seam
//!
//! A transport takes ownership of a request and runs its lifecycle:
//! `beforeSend`, then the exchange, then `success` or `error`, then
//! `complete`. Failures never surface to the caller.

use std::cell::RefCell;

use crate::{AjaxRequest, AjaxResponse, ResponseBody, TextStatus, TransportError};

/// Issues asynchronous requests
pub trait Transport {
    /// Hand a request to the transport. Fire-and-forget.
    fn send(&self, request: AjaxRequest);
}

/// Run a request's full lifecycle around `perform`.
///
/// When `beforeSend` returns false the result is [`TextStatus::Canceled`],
/// `perform` is never called and no other callback fires.
pub fn execute<F>(request: &AjaxRequest, perform: F) -> TextStatus
where
    F: FnOnce(&AjaxRequest) -> Result<AjaxResponse, TransportError>,
{
    if let Some(before_send) = &request.callbacks.before_send {
        if !before_send(request) {
            tracing::debug!("Request to {:?} cancelled by beforeSend", request.url);
            return TextStatus::Canceled;
        }
    }
    deliver(request, perform(request))
}

/// Deliver an outcome to the request's callbacks.
///
/// Exactly one of `success`/`error` fires, then `complete`.
pub fn deliver(request: &AjaxRequest, outcome: Result<AjaxResponse, TransportError>) -> TextStatus {
    let callbacks = &request.callbacks;

    let (response, status) = match outcome {
        Ok(response) if response.is_success() => {
            match ResponseBody::interpret(&response.body, request.data_type.as_deref()) {
                Ok(body) => {
                    let status = if response.status == 304 {
                        TextStatus::NotModified
                    } else {
                        TextStatus::Success
                    };
                    if let Some(success) = &callbacks.success {
                        success(&body, status, &response);
                    }
                    (response, status)
                }
                Err(e) => {
                    tracing::warn!("Response body is not valid {:?}: {}", request.data_type, e);
                    let status = TextStatus::ParserError;
                    if let Some(error) = &callbacks.error {
                        error(&response, status, &e.to_string());
                    }
                    (response, status)
                }
            }
        }
        Ok(response) => {
            let reason = if response.status_text.is_empty() {
                TransportError::HttpStatus(response.status).to_string()
            } else {
                response.status_text.clone()
            };
            tracing::warn!("Request to {:?} failed: {} {}", request.url, response.status, reason);
            let status = TextStatus::Error;
            if let Some(error) = &callbacks.error {
                error(&response, status, &reason);
            }
            (response, status)
        }
        Err(e) => {
            tracing::warn!("Request to {:?} failed: {}", request.url, e);
            let response = AjaxResponse::failed();
            let status = e.text_status();
            if let Some(error) = &callbacks.error {
                error(&response, status, &e.to_string());
            }
            (response, status)
        }
    };

    if let Some(complete) = &callbacks.complete {
        complete(&response, status);
    }
    status
}

/// Transport that records requests instead of sending them.
///
/// Recorded requests are answered later with [`RecordingTransport::respond`],
/// which runs the same lifecycle a network transport would.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: RefCell<Vec<AjaxRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every request received so far
    pub fn requests(&self) -> Vec<AjaxRequest> {
        self.requests.borrow().clone()
    }

    /// Most recent request
    pub fn last(&self) -> Option<AjaxRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.requests.borrow_mut().clear();
    }

    /// Answer the request at `index` with `outcome`.
    ///
    /// Returns `None` if there is no such request.
    pub fn respond(
        &self,
        index: usize,
        outcome: Result<AjaxResponse, TransportError>,
    ) -> Option<TextStatus> {
        let request = self.requests.borrow().get(index).cloned()?;
        Some(execute(&request, move |_| outcome))
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: AjaxRequest) {
        tracing::debug!("Recorded {} request to {:?}", request.method_name(), request.url);
        self.requests.borrow_mut().push(request);
    }
}
