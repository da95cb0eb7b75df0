//! Operational status and the severity order used to aggregate it.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::Value;

/// Ordered alarm severity: `Normal < Alarm < Fault`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Normal,
    Alarm,
    Fault,
}

impl Severity {
    /// The status a parent tier emits for this severity.
    pub fn to_status(self) -> Status {
        match self {
            Severity::Normal => Status::Normal,
            Severity::Alarm => Status::Alarm,
            Severity::Fault => Status::Fault,
        }
    }
}

/// A status string as reported by an instrument or supplied as an override.
///
/// Unrecognized strings are kept verbatim in `Other` and emitted unchanged;
/// there is no validation boundary on status values. Non-string input (a raw
/// register number, say) is carried as its JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Status {
    #[default]
    Normal,
    Alarm,
    Fault,
    /// Meter-only input state. Aggregates as [`Severity::Fault`].
    Offline,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Normal => "Normal",
            Status::Alarm => "Alarm",
            Status::Fault => "Fault",
            Status::Offline => "Offline",
            Status::Other(s) => s,
        }
    }

    /// Severity for aggregation. `None` for unrecognized strings.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Status::Normal => Some(Severity::Normal),
            Status::Alarm => Some(Severity::Alarm),
            Status::Fault | Status::Offline => Some(Severity::Fault),
            Status::Other(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Status::Other(_))
    }

    /// Decode a flow-computer status register.
    ///
    /// `0` Normal, `1` Alarm, `2` Fault, `3` Offline; unknown codes read as Normal.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Status::Alarm,
            2 => Status::Fault,
            3 => Status::Offline,
            _ => Status::Normal,
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match s {
            "Normal" => Status::Normal,
            "Alarm" => Status::Alarm,
            "Fault" => Status::Fault,
            "Offline" => Status::Offline,
            other => Status::Other(other.to_owned()),
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match Status::from(s.as_str()) {
            Status::Other(_) => Status::Other(s),
            known => known,
        }
    }
}

impl From<Value> for Status {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => Status::from(s),
            Value::Null => Status::Normal,
            other => Status::Other(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Status::from(Value::from(raw)))
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        match s {
            Status::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl From<Status> for Value {
    fn from(s: Status) -> Self {
        Value::String(s.into())
    }
}

impl From<Severity> for Status {
    fn from(s: Severity) -> Self {
        s.to_status()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Normal < Severity::Alarm);
        assert!(Severity::Alarm < Severity::Fault);
        assert_eq!(Severity::Normal.max(Severity::Fault), Severity::Fault);
    }

    #[test]
    fn test_offline_aggregates_as_fault() {
        assert_eq!(Status::Offline.severity(), Some(Severity::Fault));
        assert_eq!(Status::Other("Tripped".into()).severity(), None);
    }

    #[test]
    fn test_unknown_status_round_trips_verbatim() {
        let s = Status::from("Tripped");
        assert_eq!(s, Status::Other("Tripped".into()));
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"Tripped\"");
        let back: Status = serde_json::from_str("\"Offline\"").unwrap();
        assert_eq!(back, Status::Offline);
    }

    #[test]
    fn test_non_string_status_is_carried_as_text() {
        let code: Status = serde_json::from_str("2").unwrap();
        assert_eq!(code, Status::Other("2".into()));
        assert_eq!(code.severity(), None);
        let flag: Status = serde_json::from_str("true").unwrap();
        assert_eq!(flag, Status::Other("true".into()));
        let nested: Status = serde_json::from_str(r#"{"code":2}"#).unwrap();
        assert_eq!(nested, Status::Other(r#"{"code":2}"#.into()));
        assert_eq!(Status::from(Value::Null), Status::Normal);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Status::from_code(0), Status::Normal);
        assert_eq!(Status::from_code(1), Status::Alarm);
        assert_eq!(Status::from_code(2), Status::Fault);
        assert_eq!(Status::from_code(3), Status::Offline);
        assert_eq!(Status::from_code(99), Status::Normal);
    }
}
