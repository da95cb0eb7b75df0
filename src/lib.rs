//! # smprofile: Smart Manufacturing Profile Documents for Flow Computers
//!
//! Builds the three-tier JSON-LD document a gas flow computer publishes:
//! a `FlowComputer` device embedding a `MeterRun`, which embeds the meter
//! configuration (an orifice gas meter).
//!
//! ## Design Principles
//!
//! 1. **Builders are pure**: inputs + config + timestamp → `Node`, nothing else
//! 2. **Presence, not truthiness**: an optional field appears iff it was supplied
//! 3. **Config is injected**: `ConfigProvider` is the only route to site settings
//! 4. **Status flows upward**: meter → run → device, worst severity wins
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smprofile::{Pipeline, PipelineInput};
//!
//! # fn example() -> smprofile::Result<()> {
//! let mut input = PipelineInput::default();
//! input.meter.reading.flow_rate = Some(0.0);
//! input.meter.reading.meter_status = Some("Fault".into());
//!
//! let assembly = Pipeline::new().assemble(&input);
//! println!("{} -> {}", assembly.topic, assembly.document.to_json_string(true)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Providers
//!
//! | Provider | Description |
//! |----------|-------------|
//! | `NoConfig` | Built-in fallbacks only |
//! | `MemoryConfig` | Runtime-settable, loadable from a JSON file |
//! | `HashMap` / `serde_json::Map` | Caller-owned maps |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod builder;
pub mod export;
pub mod pipeline;
pub mod publish;
pub mod validate;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Node, NodeId, NodeKind, Relationship, Value, PropertyMap, PropertyValue,
    Severity, Status, Timestamp,
};

// ============================================================================
// Re-exports: Config
// ============================================================================

pub use config::{ConfigProvider, MemoryConfig, NoConfig};

// ============================================================================
// Re-exports: Builders
// ============================================================================

pub use builder::{
    build_device, build_meter, build_run, Built, DeviceInput, MeterInput,
    MeterConfiguration, MeterType, MeterVariant, RunInput,
};

// ============================================================================
// Re-exports: Output
// ============================================================================

pub use export::{Context, Document};
pub use pipeline::{Assembly, Pipeline, PipelineInput};
pub use publish::{derive_topic, DocumentSink, Envelope, MemorySink};
pub use validate::{validate_document, ValidationReport};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
