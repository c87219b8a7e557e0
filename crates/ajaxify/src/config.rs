//! Container Configuration
//!
//! Everything a container is activated with. The value is captured once at
//! activation and never changes afterwards.

use std::collections::BTreeMap;
use std::sync::Arc;

use ajaxify_dom::FormData;
use ajaxify_net::{AjaxRequest, AjaxResponse, Callbacks, ResponseBody, TextStatus};
use serde::Deserialize;

use crate::ActivationError;
use crate::options::{CallbackRef, Literal, OptionSet, OptionValue, Param};

/// Container-wide `data` setting
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigData {
    /// Raw string payload
    Text(String),
    /// Flat object of fields
    Fields(serde_json::Map<String, serde_json::Value>),
}

impl ConfigData {
    fn to_option(&self) -> OptionValue {
        match self {
            ConfigData::Text(text) => OptionValue::str(text.as_str()),
            ConfigData::Fields(fields) => OptionValue::Form(
                fields
                    .iter()
                    .map(|(k, v)| match v {
                        serde_json::Value::String(s) => (k.clone(), s.clone()),
                        serde_json::Value::Null => (k.clone(), String::new()),
                        other => (k.clone(), other.to_string()),
                    })
                    .collect::<FormData>(),
            ),
        }
    }
}

/// Container activation settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerConfig {
    /// Container element id; generated when unset
    pub id: Option<String>,
    /// Click targets, default `#<id> [data-ajax]:not(form)`
    #[serde(alias = "linkSelector")]
    pub trigger_selector: Option<String>,
    /// Submit targets, default `#<id> form[data-ajax]`
    #[serde(alias = "submitSelector")]
    pub form_selector: Option<String>,

    pub url: Option<String>,
    pub method: Option<String>,
    pub data: Option<ConfigData>,
    pub data_type: Option<String>,
    pub process_data: Option<Literal>,
    pub content_type: Option<Literal>,
    pub cache: Option<Literal>,
    /// Milliseconds
    pub timeout: Option<Literal>,

    /// Extra attributes of the container element
    #[serde(alias = "options")]
    pub html_options: BTreeMap<String, String>,

    #[serde(skip)]
    pub callbacks: Callbacks,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON activation surface
    pub fn from_json(json: &str) -> Result<Self, ActivationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn trigger_selector(mut self, selector: &str) -> Self {
        self.trigger_selector = Some(selector.to_string());
        self
    }

    pub fn form_selector(mut self, selector: &str) -> Self {
        self.form_selector = Some(selector.to_string());
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn data(mut self, data: &str) -> Self {
        self.data = Some(ConfigData::Text(data.to_string()));
        self
    }

    pub fn data_fields<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), serde_json::Value::String(v.into())))
            .collect();
        self.data = Some(ConfigData::Fields(fields));
        self
    }

    pub fn data_type(mut self, data_type: &str) -> Self {
        self.data_type = Some(data_type.to_string());
        self
    }

    pub fn process_data(mut self, process: bool) -> Self {
        self.process_data = Some(Literal::Bool(process));
        self
    }

    pub fn content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(Literal::from(content_type));
        self
    }

    /// `contentType: false`
    pub fn no_content_type(mut self) -> Self {
        self.content_type = Some(Literal::Bool(false));
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = Some(Literal::Bool(cache));
        self
    }

    pub fn timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(Literal::from(millis));
        self
    }

    pub fn html_option(mut self, name: &str, value: &str) -> Self {
        self.html_options.insert(name.to_string(), value.to_string());
        self
    }

    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResponseBody, TextStatus, &AjaxResponse) + Send + Sync + 'static,
    {
        self.callbacks.success = Some(Arc::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&AjaxResponse, TextStatus, &str) + Send + Sync + 'static,
    {
        self.callbacks.error = Some(Arc::new(f));
        self
    }

    pub fn on_before_send<F>(mut self, f: F) -> Self
    where
        F: Fn(&AjaxRequest) -> bool + Send + Sync + 'static,
    {
        self.callbacks.before_send = Some(Arc::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(&AjaxResponse, TextStatus) + Send + Sync + 'static,
    {
        self.callbacks.complete = Some(Arc::new(f));
        self
    }

    /// Container-wide option set; unset parameters are absent
    pub fn global_options(&self) -> OptionSet {
        let literal = |value: &Option<Literal>| {
            value.clone().map(OptionValue::Literal).unwrap_or_default()
        };
        let string = |value: &Option<String>| {
            value.as_deref().map(OptionValue::str).unwrap_or_default()
        };
        let callbacks = &self.callbacks;

        OptionSet::new()
            .with(Param::Url, string(&self.url))
            .with(Param::Method, string(&self.method))
            .with(Param::Data, self.data.as_ref().map(ConfigData::to_option).unwrap_or_default())
            .with(Param::DataType, string(&self.data_type))
            .with(Param::ProcessData, literal(&self.process_data))
            .with(Param::ContentType, literal(&self.content_type))
            .with(Param::Cache, literal(&self.cache))
            .with(Param::Timeout, literal(&self.timeout))
            .with(Param::Success, callback(callbacks.success.clone().map(CallbackRef::Success)))
            .with(Param::Error, callback(callbacks.error.clone().map(CallbackRef::Error)))
            .with(Param::BeforeSend, callback(callbacks.before_send.clone().map(CallbackRef::BeforeSend)))
            .with(Param::Complete, callback(callbacks.complete.clone().map(CallbackRef::Complete)))
    }
}

fn callback(value: Option<CallbackRef>) -> OptionValue {
    value.map(OptionValue::Callback).unwrap_or_default()
}
