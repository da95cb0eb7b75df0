//! Property-value construction and the inclusion rule.
//!
//! Every optional field goes through [`PropertyMapBuilder::optional`] (or
//! [`include_if_present`] for a cluster), which includes the field iff the
//! source is `Some`. Zero, `false` and the empty string are present values.

use crate::model::{PropertyMap, PropertyValue, Timestamp, Value};

/// Build a property value.
///
/// `value` is always set, `unit` only when given, and the observation time
/// only when `observed_at` is given.
pub fn make_property_value(
    value: impl Into<Value>,
    unit: Option<&str>,
    observed_at: Option<Timestamp>,
) -> PropertyValue {
    PropertyValue {
        value: value.into(),
        unit: unit.map(str::to_owned),
        observed_at,
    }
}

/// Run `build` on the cluster source when it is present; otherwise contribute
/// nothing. The result is merged into the node's map as a unit.
pub fn include_if_present<T>(source: Option<T>, build: impl FnOnce(T) -> PropertyMap) -> PropertyMap {
    source.map(build).unwrap_or_default()
}

/// The source as a [`Value`], or `None` when unset. NaN and infinite readings
/// have no JSON form and count as unset.
fn supplied<V: Into<Value>>(key: &str, value: Option<V>) -> Option<Value> {
    let value = value?.into();
    if value.is_representable() {
        Some(value)
    } else {
        tracing::debug!(key, %value, "dropping non-finite reading");
        None
    }
}

/// Assembles one node's [`PropertyMap`] against a single captured timestamp.
#[derive(Debug, Clone)]
pub struct PropertyMapBuilder {
    at: Timestamp,
    map: PropertyMap,
}

impl PropertyMapBuilder {
    pub fn new(at: Timestamp) -> Self {
        Self { at, map: PropertyMap::new() }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.at
    }

    /// Always-present static field.
    pub fn required(&mut self, key: &str, value: impl Into<Value>, unit: Option<&str>) -> &mut Self {
        self.insert(key, make_property_value(value, unit, None))
    }

    /// Always-present live field, stamped with the build timestamp.
    pub fn required_live(&mut self, key: &str, value: impl Into<Value>, unit: Option<&str>) -> &mut Self {
        self.insert(key, make_property_value(value, unit, Some(self.at)))
    }

    /// Always-present field with a default substituted when the source is unset.
    pub fn with_default<V: Into<Value>>(
        &mut self,
        key: &str,
        value: Option<V>,
        default: V,
        unit: Option<&str>,
    ) -> &mut Self {
        let value = supplied(key, value).unwrap_or_else(|| default.into());
        self.required(key, value, unit)
    }

    /// Always-present live field with a default, stamped with the build timestamp.
    pub fn with_default_live<V: Into<Value>>(
        &mut self,
        key: &str,
        value: Option<V>,
        default: V,
        unit: Option<&str>,
    ) -> &mut Self {
        let value = supplied(key, value).unwrap_or_else(|| default.into());
        self.required_live(key, value, unit)
    }

    /// Optional static field: included iff `value` is `Some`.
    pub fn optional<V: Into<Value>>(&mut self, key: &str, value: Option<V>, unit: Option<&str>) -> &mut Self {
        match supplied(key, value) {
            Some(v) => self.required(key, v, unit),
            None => self,
        }
    }

    /// Optional live field: included iff `value` is `Some`, stamped when included.
    pub fn optional_live<V: Into<Value>>(
        &mut self,
        key: &str,
        value: Option<V>,
        unit: Option<&str>,
    ) -> &mut Self {
        match supplied(key, value) {
            Some(v) => self.required_live(key, v, unit),
            None => self,
        }
    }

    /// Merge a cluster produced by [`include_if_present`].
    pub fn merge(&mut self, cluster: PropertyMap) -> &mut Self {
        self.map.extend(cluster);
        self
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn build(self) -> PropertyMap {
        self.map
    }

    fn insert(&mut self, key: &str, value: PropertyValue) -> &mut Self {
        self.map.insert(key.to_owned(), value);
        self
    }
}
