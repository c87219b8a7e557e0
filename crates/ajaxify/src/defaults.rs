//! Tag-type defaults

use crate::attributes::TagKind;
use crate::options::{OptionValue, Param};

/// Fallback values used when neither the element nor the container sets
/// a parameter
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl DefaultPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn default_for(&self, param: Param, kind: TagKind) -> OptionValue {
        match (param, kind) {
            (Param::Method, TagKind::Form) => OptionValue::str("POST"),
            (Param::Method, _) => OptionValue::str("GET"),
            // Form payloads go out as multipart
            (Param::ProcessData | Param::ContentType, TagKind::Form) => OptionValue::bool(false),
            _ => OptionValue::Absent,
        }
    }
}
