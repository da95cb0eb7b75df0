//! Parent → child relationships between profile nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NodeKind;

/// The fixed relationship each parent kind uses to embed its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    /// MeterRun → meter. A single node.
    HasMeterConfiguration,
    /// FlowComputer → runs. Always a sequence, even with one run.
    HasRun,
}

impl Relationship {
    pub fn name(self) -> &'static str {
        match self {
            Relationship::HasMeterConfiguration => "has-meter-configuration",
            Relationship::HasRun => "has-run",
        }
    }

    /// JSON-LD key the relationship is written under.
    pub fn iri(self) -> &'static str {
        match self {
            Relationship::HasMeterConfiguration => "jpi:hasMeterConfiguration",
            Relationship::HasRun => "jpi:hasRun",
        }
    }

    /// Whether children are written as an array.
    pub fn is_sequence(self) -> bool {
        matches!(self, Relationship::HasRun)
    }

    /// The relationship a parent of `kind` embeds its children with.
    pub fn for_parent(kind: &NodeKind) -> Option<Self> {
        match kind {
            NodeKind::MeterRun => Some(Relationship::HasMeterConfiguration),
            NodeKind::FlowComputer => Some(Relationship::HasRun),
            _ => None,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_relationships() {
        assert_eq!(Relationship::for_parent(&NodeKind::MeterRun), Some(Relationship::HasMeterConfiguration));
        assert_eq!(Relationship::for_parent(&NodeKind::FlowComputer), Some(Relationship::HasRun));
        assert_eq!(Relationship::for_parent(&NodeKind::OrificeGasMeter), None);
        assert!(Relationship::HasRun.is_sequence());
        assert_eq!(Relationship::HasMeterConfiguration.iri(), "jpi:hasMeterConfiguration");
    }
}
