//! JSON-LD export: wrap the device node in its `@context` and serialize.
//!
//! ```text
//! build_device() → Document::new(node) → write_json_ld()
//!   → MQTT payload, REST body, or a .jsonld file
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::model::Node;
use crate::Result;

pub const JPI_NAMESPACE: &str = "https://github.com/JPISolutions/SMProfiles/profiles/v1#";
pub const SM_NAMESPACE: &str = "http://cesmii.org/sm/";
pub const RDFS_NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
pub const UNIT_NAMESPACE: &str = "http://qudt.org/vocab/unit/";

/// The `@context` block binding the prefixes used in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub jpi: String,
    pub sm: String,
    pub rdfs: String,
    pub xsd: String,
    pub unit: String,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            jpi: JPI_NAMESPACE.to_owned(),
            sm: SM_NAMESPACE.to_owned(),
            rdfs: RDFS_NAMESPACE.to_owned(),
            xsd: XSD_NAMESPACE.to_owned(),
            unit: UNIT_NAMESPACE.to_owned(),
        }
    }
}

/// A complete profile document: context plus root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "@context")]
    pub context: Context,
    #[serde(flatten)]
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { context: Context::default(), root }
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let out = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(out)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Write the document as pretty JSON-LD followed by a newline.
    pub fn write_json_ld(&self, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl From<Node> for Document {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, PropertyValue};

    fn device() -> Node {
        let run = Node::new(NodeKind::MeterRun, "R1", "Run 1").with_property("Status", PropertyValue::new("Alarm"));
        Node::new(NodeKind::FlowComputer, "D1", "Device 1")
            .with_property("NumberOfRuns", PropertyValue::new(1))
            .with_runs([run])
    }

    #[test]
    fn test_context_and_root_keys() {
        let json = Document::new(device()).to_json_value().unwrap();
        assert_eq!(json["@context"]["jpi"], JPI_NAMESPACE);
        assert_eq!(json["@context"]["unit"], UNIT_NAMESPACE);
        assert_eq!(json["@id"], "jpi:FlowComputer/Instance/D1");
        assert_eq!(json["@type"], "jpi:FlowComputer");
        assert_eq!(json["rdfs:label"], "Device 1");
        assert_eq!(json["jpi:propertyValues"]["NumberOfRuns"]["value"], 1);
        assert_eq!(json["jpi:hasRun"][0]["@type"], "jpi:MeterRun");
    }

    #[test]
    fn test_only_root_carries_context() {
        let json = Document::new(device()).to_json_value().unwrap();
        assert!(json["jpi:hasRun"][0].get("@context").is_none());
    }

    #[test]
    fn test_write_json_ld() {
        let mut buf = Vec::new();
        Document::new(device()).write_json_ld(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"jpi:hasRun\""));
    }

    #[test]
    fn test_parse_back() {
        let doc = Document::new(device());
        let text = doc.to_json_string(false).unwrap();
        let back = Document::from_json_str(&text).unwrap();
        assert_eq!(back.root.runs().len(), 1);
        assert_eq!(back.root.runs()[0].status(), doc.root.runs()[0].status());
    }
}
