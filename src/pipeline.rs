//! Pipeline: meter → run → device in one call, threading one timestamp.

use serde::{Deserialize, Serialize};

use crate::builder::{build_device, build_meter, build_run, DeviceInput, MeterInput, MeterVariant, RunInput};
use crate::config::{ConfigProvider, NoConfig};
use crate::export::Document;
use crate::model::Timestamp;
use crate::publish::{derive_topic, DocumentSink, Envelope};
use crate::Result;

/// Inputs for one full pipeline run. Deserializes from
/// `{"meter": {"identity": …, "reading": …}, "run": …, "device": …, "topic": …}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineInput {
    pub meter: MeterInput,
    pub run: RunInput,
    pub device: DeviceInput,
    /// Destination; derived from the device id when unset.
    pub topic: Option<String>,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub document: Document,
    pub topic: String,
    /// The instant every live field in `document` carries.
    pub timestamp: Timestamp,
}

impl Assembly {
    pub fn into_envelope(self) -> Envelope {
        Envelope::new(self.topic, self.document)
    }
}

/// Chains the three builders against one configuration provider.
pub struct Pipeline<C: ConfigProvider> {
    config: C,
}

impl<C: ConfigProvider> Pipeline<C> {
    pub fn with_config(config: C) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Assemble with the clock read once at the start.
    pub fn assemble(&self, input: &PipelineInput) -> Assembly {
        self.assemble_at(input, Timestamp::now())
    }

    /// Assemble with an injected timestamp. Identical inputs and timestamp
    /// give an identical document.
    pub fn assemble_at(&self, input: &PipelineInput, at: Timestamp) -> Assembly {
        let meter = build_meter(&input.meter, &self.config, Some(at));
        self.assemble_with_meter_at(
            Some(MeterVariant::Orifice(meter.node)),
            &input.run,
            &input.device,
            input.topic.as_deref(),
            meter.timestamp,
        )
    }

    /// Assemble around a meter built elsewhere (a turbine or Coriolis meter,
    /// say), or with no meter at all.
    pub fn assemble_with_meter_at(
        &self,
        meter: Option<MeterVariant>,
        run: &RunInput,
        device: &DeviceInput,
        topic: Option<&str>,
        at: Timestamp,
    ) -> Assembly {
        let run = build_run(meter, run, &self.config, Some(at));
        let root = build_device(Some(run.node), device, &self.config, Some(run.timestamp));
        let topic = topic
            .map(str::to_owned)
            .unwrap_or_else(|| derive_topic(&device.resolved_id(&self.config)));

        tracing::info!(root = %root.node.id, %topic, timestamp = %root.timestamp, "assembled profile document");
        Assembly {
            document: Document::new(root.node),
            topic,
            timestamp: root.timestamp,
        }
    }

    /// Assemble and hand the document to `sink`. Returns what was sent.
    pub async fn publish<S>(&self, sink: &S, input: &PipelineInput) -> Result<Envelope>
    where
        S: DocumentSink + ?Sized,
    {
        let envelope = self.assemble(input).into_envelope();
        sink.publish(envelope.clone()).await?;
        Ok(envelope)
    }
}

impl Pipeline<NoConfig> {
    /// A pipeline that uses only the built-in fallbacks.
    pub fn new() -> Self {
        Self::with_config(NoConfig)
    }
}

impl Default for Pipeline<NoConfig> {
    fn default() -> Self {
        Self::new()
    }
}
