//! Node in the profile document.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{PropertyMap, PropertyValue, Relationship, Status, Value};

/// Instance identifier, e.g. `jpi:MeterRun/Instance/SCADAPAK-474-RUN1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Compose the instance IRI for a node of `kind` with local id `id`.
    pub fn instance(kind: &NodeKind, id: &str) -> Self {
        Self(format!("{}/Instance/{}", kind.as_str(), id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile type of a node (`@type`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    FlowComputer,
    MeterRun,
    OrificeGasMeter,
    /// Any other profile type, e.g. a meter produced outside this crate.
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::FlowComputer => "jpi:FlowComputer",
            NodeKind::MeterRun => "jpi:MeterRun",
            NodeKind::OrificeGasMeter => "jpi:OrificeGasMeter",
            NodeKind::Other(s) => s,
        }
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "jpi:FlowComputer" => NodeKind::FlowComputer,
            "jpi:MeterRun" => NodeKind::MeterRun,
            "jpi:OrificeGasMeter" => NodeKind::OrificeGasMeter,
            _ => NodeKind::Other(s),
        }
    }
}

impl From<NodeKind> for String {
    fn from(k: NodeKind) -> Self {
        match k {
            NodeKind::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs embedded under `jpi:hasRun`. One inline slot; more spill to the heap.
pub type Runs = SmallVec<[Box<Node>; 1]>;

/// A typed, labeled record of property-values with optional embedded children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "@id")]
    pub id: NodeId,
    #[serde(rename = "@type")]
    pub kind: NodeKind,
    #[serde(rename = "rdfs:label")]
    pub label: String,
    #[serde(rename = "jpi:propertyValues")]
    pub properties: PropertyMap,
    #[serde(rename = "jpi:hasMeterConfiguration", default, skip_serializing_if = "Option::is_none")]
    pub meter_configuration: Option<Box<Node>>,
    #[serde(rename = "jpi:hasRun", default, skip_serializing_if = "Option::is_none")]
    pub runs: Option<Runs>,
}

impl Node {
    /// A node of `kind` whose `@id` is derived from the local `id`.
    pub fn new(kind: NodeKind, id: &str, label: impl Into<String>) -> Self {
        Self {
            id: NodeId::instance(&kind, id),
            kind,
            label: label.into(),
            properties: PropertyMap::new(),
            meter_configuration: None,
            runs: None,
        }
    }

    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Embed `meter` under `jpi:hasMeterConfiguration`.
    pub fn with_meter_configuration(mut self, meter: Node) -> Self {
        self.meter_configuration = Some(Box::new(meter));
        self
    }

    /// Embed `runs` under `jpi:hasRun`.
    pub fn with_runs(mut self, runs: impl IntoIterator<Item = Node>) -> Self {
        self.runs = Some(runs.into_iter().map(Box::new).collect());
        self
    }

    pub fn has_kind(&self, kind: &NodeKind) -> bool {
        &self.kind == kind
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).map(|pv| &pv.value)
    }

    /// The node's `Status` property, if it carries one.
    ///
    /// Non-string values are read through their display form; `null` reads as
    /// no status at all.
    pub fn status(&self) -> Option<Status> {
        match self.value("Status")? {
            Value::Null => None,
            other => Some(Status::from(other.clone())),
        }
    }

    pub fn runs(&self) -> &[Box<Node>] {
        self.runs.as_deref().unwrap_or(&[])
    }

    /// The relationship this node uses to embed its children, if any are attached.
    pub fn relationship(&self) -> Option<Relationship> {
        if self.meter_configuration.is_some() {
            Some(Relationship::HasMeterConfiguration)
        } else if self.runs.is_some() {
            Some(Relationship::HasRun)
        } else {
            None
        }
    }

    /// Direct children in document order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.meter_configuration
            .as_deref()
            .into_iter()
            .chain(self.runs().iter().map(|b| b.as_ref()))
    }
}
