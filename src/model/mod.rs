//! # Profile Document Model
//!
//! Plain data for the three-tier document: FlowComputer → MeterRun → meter.
//! These types are what every builder produces and every consumer reads.
//!
//! Design rule: no I/O, no clock reads, no global state in this module.

pub mod node;
pub mod relationship;
pub mod value;
pub mod property_map;
pub mod status;
pub mod timestamp;
pub mod unit;

pub use node::{Node, NodeId, NodeKind, Runs};
pub use relationship::Relationship;
pub use value::Value;
pub use property_map::{PropertyMap, PropertyValue};
pub use status::{Severity, Status};
pub use timestamp::Timestamp;
