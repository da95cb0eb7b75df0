//! # Publishing
//!
//! The transport that carries a finished document (MQTT, REST, a file) lives
//! outside this crate. It plugs in through [`DocumentSink`]; the crate only
//! decides the destination topic when the caller leaves it unset.
//!
//! | Sink | Description |
//! |------|-------------|
//! | `MemorySink` | Records envelopes in memory for tests and embedding |

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::export::Document;
use crate::Result;

/// Topic for a device's data when the caller doesn't choose one.
pub fn derive_topic(device_id: &str) -> String {
    format!("efm/devices/{device_id}/data")
}

/// A document addressed to a destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub topic: String,
    pub document: Document,
}

impl Envelope {
    pub fn new(topic: impl Into<String>, document: Document) -> Self {
        Self { topic: topic.into(), document }
    }

    /// Serialized payload bytes (compact JSON-LD).
    pub fn payload(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.document)?)
    }
}

/// Hand-off point to a transport.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Deliver one envelope. Errors are reported as [`crate::Error::Publish`]
    /// or [`crate::Error::Io`] by implementations.
    async fn publish(&self, envelope: Envelope) -> Result<()>;
}

#[async_trait]
impl<S: DocumentSink + ?Sized> DocumentSink for Arc<S> {
    async fn publish(&self, envelope: Envelope) -> Result<()> {
        (**self).publish(envelope).await
    }
}

/// Sink that keeps every envelope it receives.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<Vec<Envelope>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Envelopes received so far, oldest first.
    pub fn envelopes(&self) -> Vec<Envelope> {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<Envelope> {
        std::mem::take(&mut *self.inner.lock())
    }
}

#[async_trait]
impl DocumentSink for MemorySink {
    async fn publish(&self, envelope: Envelope) -> Result<()> {
        tracing::info!(topic = %envelope.topic, root = %envelope.document.root.id, "published document");
        self.inner.lock().push(envelope);
        Ok(())
    }
}
