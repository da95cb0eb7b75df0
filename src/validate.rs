//! Structural validation of a serialized profile document.
//!
//! An opt-in check on output: builders never call it and never reject input.
//! Findings are split into errors (the document is malformed) and warnings
//! (it is usable but unconventional).

use serde_json::{Map, Value as Json};

use crate::model::{Relationship, Timestamp};
use crate::{Error, Result};

const REQUIRED_NODE_KEYS: [&str; 4] = ["@id", "@type", "rdfs:label", "jpi:propertyValues"];
const RECOMMENDED_NAMESPACES: [&str; 3] = ["jpi", "rdfs", "xsd"];
const UNIT_PREFIXES: [&str; 2] = ["unit:", "qudt:"];

/// Outcome of [`validate_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Err(Error::Validation)` listing every error, if there are any.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(Error::Validation(self.errors.join("; ")))
        }
    }
}

/// Validate a document rooted at `doc`, including every embedded node.
pub fn validate_document(doc: &Json) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(root) = doc.as_object() else {
        report.errors.push("document root must be a JSON object".into());
        return report;
    };

    match root.get("@context").and_then(Json::as_object) {
        Some(ctx) => {
            for ns in RECOMMENDED_NAMESPACES {
                if !ctx.contains_key(ns) {
                    report.warnings.push(format!("missing recommended namespace: {ns}"));
                }
            }
        }
        None => report.errors.push("missing required field: @context".into()),
    }

    validate_node(root, "$", &mut report);

    for w in &report.warnings {
        tracing::warn!(warning = %w, "profile document warning");
    }
    for e in &report.errors {
        tracing::warn!(error = %e, "profile document error");
    }
    report
}

fn validate_node(node: &Map<String, Json>, path: &str, report: &mut ValidationReport) {
    for key in REQUIRED_NODE_KEYS {
        if !node.contains_key(key) {
            report.errors.push(format!("{path}: missing required field: {key}"));
        }
    }

    if let Some(kind) = node.get("@type") {
        match kind.as_str() {
            Some(s) if s.starts_with("jpi:") => {}
            Some(s) => report.warnings.push(format!("{path}: unexpected @type: {s}")),
            None => report.errors.push(format!("{path}: @type must be a string")),
        }
    }

    match node.get("jpi:propertyValues") {
        Some(Json::Object(props)) => {
            for (name, pv) in props {
                validate_property(pv, &format!("{path}.{name}"), report);
            }
        }
        Some(_) => report.errors.push(format!("{path}: jpi:propertyValues must be an object")),
        None => {}
    }

    let meter_key = Relationship::HasMeterConfiguration.iri();
    match node.get(meter_key) {
        Some(Json::Object(child)) => validate_node(child, &format!("{path}.{meter_key}"), report),
        Some(_) => report.errors.push(format!("{path}: {meter_key} must be an object")),
        None => {}
    }

    let run_key = Relationship::HasRun.iri();
    match node.get(run_key) {
        Some(Json::Array(children)) => {
            for (i, child) in children.iter().enumerate() {
                match child.as_object() {
                    Some(obj) => validate_node(obj, &format!("{path}.{run_key}[{i}]"), report),
                    None => report.errors.push(format!("{path}.{run_key}[{i}]: must be an object")),
                }
            }
        }
        Some(_) => report.errors.push(format!("{path}: {run_key} must be an array")),
        None => {}
    }
}

fn validate_property(pv: &Json, path: &str, report: &mut ValidationReport) {
    let Some(obj) = pv.as_object() else {
        report.errors.push(format!("{path}: property value must be an object"));
        return;
    };
    if !obj.contains_key("value") {
        report.errors.push(format!("{path}: missing value"));
    }
    if let Some(unit) = obj.get("unit") {
        match unit.as_str() {
            Some(u) if UNIT_PREFIXES.iter().any(|p| u.starts_with(p)) => {}
            Some(u) => report.warnings.push(format!("{path}: non-standard unit: {u}")),
            None => report.errors.push(format!("{path}: unit must be a string")),
        }
    }
    if let Some(ts) = obj.get("timestamp") {
        let parsed = ts.as_str().map(str::parse::<Timestamp>);
        if !matches!(parsed, Some(Ok(_))) {
            report.errors.push(format!("{path}: timestamp is not RFC 3339: {ts}"));
        }
    }
}
