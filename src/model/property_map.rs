//! PropertyMap: the named property-values on every node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Timestamp, Value};

/// A value with an optional unit tag and optional observation time.
///
/// Serialized as `{"value": …, "unit": "unit:…", "timestamp": "…"}` with the
/// optional keys omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(rename = "timestamp", default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<Timestamp>,
}

impl PropertyValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self { value: value.into(), unit: None, observed_at: None }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn observed_at(mut self, at: Timestamp) -> Self {
        self.observed_at = Some(at);
        self
    }
}

/// A map of property names to values.
///
/// Ordered so two builds from the same inputs serialize byte-for-byte alike.
pub type PropertyMap = BTreeMap<String, PropertyValue>;
