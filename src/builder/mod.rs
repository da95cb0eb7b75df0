//! # Builders
//!
//! Three stages, leaves first:
//!
//! ```text
//! MeterInput ──build_meter──▶ meter Node ─┐
//!                                         │ MeterVariant
//! RunInput ───────────────build_run───────▶ run Node ─┐
//!                                                      │
//! DeviceInput ──────────────────────build_device──────▶ device Node (document root)
//! ```
//!
//! Each stage is a pure function of its inputs, an injected
//! [`ConfigProvider`](crate::config::ConfigProvider) and a timestamp. A stage
//! captures the clock only when no upstream timestamp is handed to it, so one
//! pipeline run stamps every live field with the same instant.

pub mod property;
pub mod status;
pub mod meter;
pub mod run;
pub mod device;
pub mod configuration;

use crate::model::{Node, Timestamp};

pub use property::{include_if_present, make_property_value, PropertyMapBuilder};
pub use status::{derive_active_alarm_count, derive_device_status, derive_run_status};
pub use meter::{build_meter, GasComposition, MeterIdentity, MeterInput, MeterReading, SensorDescriptor, SensorGroup};
pub use run::{build_run, MeterType, MeterVariant, RunInput};
pub use device::{build_device, DeviceInput};
pub use configuration::MeterConfiguration;

/// A built node plus the timestamp its live fields carry, for the next stage
/// to reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct Built {
    pub node: Node,
    pub timestamp: Timestamp,
}

impl Built {
    pub fn into_node(self) -> Node {
        self.node
    }
}
