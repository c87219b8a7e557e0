//! Request Options
//!
//! The closed parameter set, the values a parameter can take, and the
//! per-dispatch option set built by the resolver.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ajaxify_dom::FormData;
use ajaxify_net::{
    AjaxRequest, BeforeSendCallback, Callbacks, CompleteCallback, ContentType, ErrorCallback,
    RequestData, SuccessCallback,
};
use serde::Deserialize;

/// Request parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Param {
    Url,
    Method,
    Data,
    DataType,
    ProcessData,
    ContentType,
    Success,
    Error,
    BeforeSend,
    Complete,
    Cache,
    Timeout,
}

impl Param {
    /// Every parameter, in resolution order
    pub const ALL: [Param; 12] = [
        Param::Url,
        Param::Method,
        Param::Data,
        Param::DataType,
        Param::ProcessData,
        Param::ContentType,
        Param::Success,
        Param::Error,
        Param::BeforeSend,
        Param::Complete,
        Param::Cache,
        Param::Timeout,
    ];

    /// Parameter name as used in configuration (`dataType`, `beforeSend`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            Param::Url => "url",
            Param::Method => "method",
            Param::Data => "data",
            Param::DataType => "dataType",
            Param::ProcessData => "processData",
            Param::ContentType => "contentType",
            Param::Success => "success",
            Param::Error => "error",
            Param::BeforeSend => "beforeSend",
            Param::Complete => "complete",
            Param::Cache => "cache",
            Param::Timeout => "timeout",
        }
    }

    /// Generic per-element attribute (`ajax-dataType`)
    pub fn attribute(&self) -> String {
        format!("ajax-{}", self.name())
    }

    /// Container-wide parameters are never overridden per element
    pub fn is_container_wide(&self) -> bool {
        matches!(
            self,
            Param::Success
                | Param::Error
                | Param::BeforeSend
                | Param::Complete
                | Param::Cache
                | Param::Timeout
        )
    }

    /// Parameters whose values are function references
    pub fn is_callback(&self) -> bool {
        matches!(self, Param::Success | Param::Error | Param::BeforeSend | Param::Complete)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Literal {
    /// Boolean view: `"true"`/`"false"` strings are read as booleans,
    /// anything else by truthiness.
    pub fn as_bool(&self) -> bool {
        match self {
            Literal::Bool(b) => *b,
            Literal::Number(n) => *n != 0.0 && !n.is_nan(),
            Literal::Str(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("false") {
                    false
                } else {
                    s.eq_ignore_ascii_case("true") || !s.is_empty()
                }
            }
        }
    }

    /// Non-negative integer view (milliseconds)
    pub fn as_millis(&self) -> Option<u64> {
        match self {
            Literal::Number(n) if *n >= 0.0 && n.is_finite() => Some(*n as u64),
            Literal::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Str(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<u64> for Literal {
    fn from(n: u64) -> Self {
        Literal::Number(n as f64)
    }
}

/// Function reference for one of the lifecycle callbacks
#[derive(Clone)]
pub enum CallbackRef {
    Success(SuccessCallback),
    Error(ErrorCallback),
    BeforeSend(BeforeSendCallback),
    Complete(CompleteCallback),
}

impl CallbackRef {
    fn addr(&self) -> *const () {
        match self {
            CallbackRef::Success(f) => Arc::as_ptr(f) as *const (),
            CallbackRef::Error(f) => Arc::as_ptr(f) as *const (),
            CallbackRef::BeforeSend(f) => Arc::as_ptr(f) as *const (),
            CallbackRef::Complete(f) => Arc::as_ptr(f) as *const (),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            CallbackRef::Success(_) => "success",
            CallbackRef::Error(_) => "error",
            CallbackRef::BeforeSend(_) => "beforeSend",
            CallbackRef::Complete(_) => "complete",
        }
    }
}

impl fmt::Debug for CallbackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallbackRef::{}({:p})", self.kind(), self.addr())
    }
}

/// Same kind and same function object
impl PartialEq for CallbackRef {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.addr() == other.addr()
    }
}

/// Value of one parameter
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OptionValue {
    /// Nobody set it
    #[default]
    Absent,
    Literal(Literal),
    /// Structured key/value payload
    Form(FormData),
    Callback(CallbackRef),
}

impl OptionValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, OptionValue::Absent)
    }

    pub fn str(s: impl Into<String>) -> Self {
        OptionValue::Literal(Literal::Str(s.into()))
    }

    pub fn bool(b: bool) -> Self {
        OptionValue::Literal(Literal::Bool(b))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            OptionValue::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// `self` unless absent, otherwise the next candidate
    pub fn or_else(self, next: impl FnOnce() -> OptionValue) -> OptionValue {
        if self.is_absent() { next() } else { self }
    }
}

impl From<Literal> for OptionValue {
    fn from(literal: Literal) -> Self {
        OptionValue::Literal(literal)
    }
}

/// One value per parameter of the closed set
///
/// Every key is always present; unset parameters hold [`OptionValue::Absent`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet {
    values: BTreeMap<Param, OptionValue>,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            values: Param::ALL.iter().map(|&p| (p, OptionValue::Absent)).collect(),
        }
    }
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, param: Param) -> &OptionValue {
        // Populated for every key at construction
        self.values.get(&param).unwrap_or(&OptionValue::Absent)
    }

    pub fn set(&mut self, param: Param, value: OptionValue) {
        self.values.insert(param, value);
    }

    pub fn with(mut self, param: Param, value: OptionValue) -> Self {
        self.set(param, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Param, &OptionValue)> {
        self.values.iter().map(|(&p, v)| (p, v))
    }

    /// Parameters holding a concrete value
    pub fn present(&self) -> impl Iterator<Item = Param> + '_ {
        self.iter().filter(|(_, v)| !v.is_absent()).map(|(p, _)| p)
    }

    /// Drop every absent entry
    pub fn finalize(self) -> FinalOptions {
        FinalOptions {
            values: self.values.into_iter().filter(|(_, v)| !v.is_absent()).collect(),
        }
    }
}

/// Option set with absent entries removed, ready for dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalOptions {
    values: BTreeMap<Param, OptionValue>,
}

impl FinalOptions {
    pub fn get(&self, param: Param) -> Option<&OptionValue> {
        self.values.get(&param)
    }

    pub fn contains(&self, param: Param) -> bool {
        self.values.contains_key(&param)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.values.keys().copied()
    }

    fn literal(&self, param: Param) -> Option<&Literal> {
        self.get(param).and_then(OptionValue::as_literal)
    }

    /// Build the transport request.
    ///
    /// Boolean parameters given as strings are read as booleans here;
    /// `contentType: false` becomes [`ContentType::Disabled`].
    pub fn into_request(self) -> AjaxRequest {
        let mut request = AjaxRequest::new();
        request.url = self.literal(Param::Url).map(Literal::to_string);
        request.method = self.literal(Param::Method).map(Literal::to_string);
        request.data_type = self.literal(Param::DataType).map(Literal::to_string);
        request.process_data = self.literal(Param::ProcessData).map(Literal::as_bool);
        request.cache = self.literal(Param::Cache).map(Literal::as_bool);
        request.timeout = self.literal(Param::Timeout).and_then(Literal::as_millis);

        request.content_type = self.literal(Param::ContentType).and_then(|l| match l {
            Literal::Str(s) if !is_bool_word(s) => Some(ContentType::Header(s.clone())),
            Literal::Number(_) => Some(ContentType::Header(l.to_string())),
            // `true` means "use the default", same as unset
            l if l.as_bool() => None,
            _ => Some(ContentType::Disabled),
        });

        request.data = match self.get(Param::Data) {
            Some(OptionValue::Form(form)) => Some(RequestData::Form(form.clone())),
            Some(OptionValue::Literal(l)) => Some(RequestData::Text(l.to_string())),
            _ => None,
        };

        let mut callbacks = Callbacks::default();
        for value in self.values.into_values() {
            match value {
                OptionValue::Callback(CallbackRef::Success(f)) => callbacks.success = Some(f),
                OptionValue::Callback(CallbackRef::Error(f)) => callbacks.error = Some(f),
                OptionValue::Callback(CallbackRef::BeforeSend(f)) => callbacks.before_send = Some(f),
                OptionValue::Callback(CallbackRef::Complete(f)) => callbacks.complete = Some(f),
                _ => {}
            }
        }
        request.callbacks = callbacks;
        request
    }
}

fn is_bool_word(s: &str) -> bool {
    let s = s.trim();
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}
