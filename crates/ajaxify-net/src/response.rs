//! Response side: what callbacks observe

/// Status text passed to callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStatus {
    Success,
    NotModified,
    Error,
    Timeout,
    ParserError,
    /// `beforeSend` returned false; no callback observes this
    Canceled,
}

impl TextStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextStatus::Success => "success",
            TextStatus::NotModified => "notmodified",
            TextStatus::Error => "error",
            TextStatus::Timeout => "timeout",
            TextStatus::ParserError => "parsererror",
            TextStatus::Canceled => "canceled",
        }
    }
}

/// Completed (or failed) HTTP exchange
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AjaxResponse {
    /// HTTP status, 0 when no response arrived
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl AjaxResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Response used when the request never produced one
    pub fn failed() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// 2xx or 304
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) || self.status == 304
    }

    /// Get header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response body interpreted according to `dataType`
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Json(serde_json::Value),
}

impl ResponseBody {
    /// Interpret a response body. Only `json` is parsed; everything else
    /// stays text, since rendering is the callbacks' business.
    pub fn interpret(body: &str, data_type: Option<&str>) -> Result<Self, serde_json::Error> {
        match data_type.map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("json") => {
                if body.trim().is_empty() {
                    Ok(ResponseBody::Json(serde_json::Value::Null))
                } else {
                    serde_json::from_str(body).map(ResponseBody::Json)
                }
            }
            _ => Ok(ResponseBody::Text(body.to_string())),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(s) => Some(s),
            ResponseBody::Json(_) => None,
        }
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        304 => "Not Modified",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}
