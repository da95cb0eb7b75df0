//! # Configuration Provider
//!
//! Static identifiers (device id, owner, location, network defaults) come from
//! a key-value store the host owns. Builders see it only through
//! [`ConfigProvider::lookup`] and apply their own fallback per key.
//!
//! | Provider | Description |
//! |----------|-------------|
//! | `NoConfig` | Every key unset; builders use their fallbacks |
//! | `MemoryConfig` | Runtime-settable map, loadable from a flat JSON object |
//! | `HashMap<String, Value>` | Plain map owned by the caller |
//! | `serde_json::Map` | A parsed JSON object used as-is |

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use parking_lot::RwLock;

use crate::model::Value;
use crate::{Error, Result};

/// Well-known configuration keys. Spelled as the flow-context keys the
/// acquisition side already uses.
pub mod keys {
    pub const DEVICE_ID: &str = "deviceId";
    pub const DEVICE_NAME: &str = "deviceName";
    pub const MANUFACTURER: &str = "manufacturer";
    pub const MODEL: &str = "model";
    pub const METER_ID: &str = "meterId";
    pub const METER_NAME: &str = "meterName";
    pub const RUN_ID: &str = "runId";
    pub const RUN_NUMBER: &str = "runNumber";
    pub const RUN_NAME: &str = "runName";
    pub const OWNER: &str = "owner";
    pub const IP_ADDRESS: &str = "ipAddress";
    pub const MAC_ADDRESS: &str = "macAddress";
    pub const SUBNET_MASK: &str = "subnetMask";
    pub const GATEWAY: &str = "gateway";
    pub const MODBUS_ADDRESS: &str = "modbusAddress";
    pub const LOCATION: &str = "location";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const ELEVATION: &str = "elevation";
    pub const SURFACE_LSD: &str = "surfaceLSD";
    pub const DOWNHOLE_LSD: &str = "downholeLSD";
    pub const TIME_ZONE: &str = "timeZone";
}

// ============================================================================
// ConfigProvider Trait
// ============================================================================

/// Opaque key lookup into the host's static configuration.
///
/// `Send + Sync` so a single provider can serve pipelines on several threads.
pub trait ConfigProvider: Send + Sync {
    /// The configured value for `key`, or `None` when unset.
    fn lookup(&self, key: &str) -> Option<Value>;

    /// `key` as a string. Non-string scalars are read through their display form.
    fn lookup_string(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// `key` as a number. Numeric strings are parsed.
    fn lookup_f64(&self, key: &str) -> Option<f64> {
        match self.lookup(key)? {
            Value::String(s) => s.trim().parse().ok(),
            other => other.as_float(),
        }
    }

    /// `key` as an integer. Numeric strings are parsed.
    fn lookup_i64(&self, key: &str) -> Option<i64> {
        match self.lookup(key)? {
            Value::String(s) => s.trim().parse().ok(),
            other => other.as_int(),
        }
    }
}

impl<C: ConfigProvider + ?Sized> ConfigProvider for &C {
    fn lookup(&self, key: &str) -> Option<Value> {
        (**self).lookup(key)
    }
}

impl<C: ConfigProvider + ?Sized> ConfigProvider for std::sync::Arc<C> {
    fn lookup(&self, key: &str) -> Option<Value> {
        (**self).lookup(key)
    }
}

// ============================================================================
// Providers
// ============================================================================

/// A provider with nothing configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfig;

impl ConfigProvider for NoConfig {
    fn lookup(&self, _key: &str) -> Option<Value> {
        None
    }
}

impl ConfigProvider for HashMap<String, Value> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl ConfigProvider for serde_json::Map<String, serde_json::Value> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).cloned().map(Value::from)
    }
}

/// In-memory configuration the host can update while pipelines read it.
#[derive(Debug, Default)]
pub struct MemoryConfig {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            entries: RwLock::new(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Load a flat JSON object (`{"deviceId": "WELL-7", "latitude": 54.1, ...}`).
    pub fn from_json_reader(reader: impl Read) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_reader(reader)?;
        let serde_json::Value::Object(map) = raw else {
            return Err(Error::Config(format!(
                "expected a JSON object at the top level, got {}",
                json_kind(&raw)
            )));
        };
        tracing::debug!(keys = map.len(), "loaded configuration object");
        Ok(Self::from_pairs(map.into_iter().map(|(k, v)| (k, Value::from(v)))))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Set (or replace) a key.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Remove a key. Returns true if it was set.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ConfigProvider for MemoryConfig {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ============================================================================
// Resolution: explicit input → config → fallback
// ============================================================================

/// Resolve a required string: explicit value, then config, then `fallback`.
pub fn resolve_string(
    explicit: Option<&str>,
    config: &dyn ConfigProvider,
    key: &str,
    fallback: &str,
) -> String {
    if let Some(v) = explicit {
        return v.to_owned();
    }
    config.lookup_string(key).unwrap_or_else(|| {
        tracing::trace!(key, fallback, "configuration key unset, using fallback");
        fallback.to_owned()
    })
}

/// Resolve a required integer: explicit value, then config, then `fallback`.
pub fn resolve_i64(explicit: Option<i64>, config: &dyn ConfigProvider, key: &str, fallback: i64) -> i64 {
    explicit.or_else(|| config.lookup_i64(key)).unwrap_or_else(|| {
        tracing::trace!(key, fallback, "configuration key unset, using fallback");
        fallback
    })
}
