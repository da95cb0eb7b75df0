//! Meter configuration documents.
//!
//! Commissioning tools export an orifice meter's static setup as a nested
//! document:
//!
//! ```text
//! { "configuration": { name, owner, latitude, …,
//!     "AGA3": { orificeDiameter, … },
//!     "AGA8": { units, components: [{component, value}], density, compressibility },
//!     "sensors": { differentialPressure, staticPressure, flowingTemperature } } }
//! ```
//!
//! [`MeterConfiguration::into_input`] flattens it into a [`MeterInput`] so the
//! same Meter Builder produces the node. `null` entries count as unset.

use std::io::Read;

use serde::{Deserialize, Serialize};

use super::meter::{GasComposition, MeterIdentity, MeterInput, MeterReading, SensorDescriptor};
use crate::Result;

/// AGA-3 orifice and pipe setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Aga3Config {
    pub calculation: Option<String>,
    pub orifice_tap: Option<String>,
    pub orifice_diameter: Option<f64>,
    pub orifice_material: Option<String>,
    pub orifice_reference_temperature: Option<f64>,
    pub pipe_inside_diameter: Option<f64>,
    pub pipe_material: Option<String>,
    pub pipe_reference_temperature: Option<f64>,
    pub isentropic_exponent: Option<f64>,
    pub viscosity: Option<f64>,
    /// Exported under the misspelled `flowExtentsion` key.
    #[serde(rename = "flowExtentsion", alias = "flowExtension")]
    pub flow_extension: Option<String>,
}

/// One `{component, value}` entry of an AGA-8 table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentFraction {
    pub component: String,
    pub value: Option<f64>,
}

/// AGA-8 gas composition and calculated properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Aga8Config {
    pub units: Option<String>,
    pub components: Vec<ComponentFraction>,
    pub density: Option<f64>,
    pub compressibility: Option<f64>,
}

/// One transmitter as exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SensorConfig {
    pub source: Option<String>,
    pub serial_number: Option<String>,
    pub minimum_range: Option<f64>,
    pub maximum_range: Option<f64>,
    pub tap_location: Option<String>,
    pub sensor_type: Option<String>,
}

impl From<SensorConfig> for SensorDescriptor {
    fn from(s: SensorConfig) -> Self {
        SensorDescriptor {
            source: s.source,
            serial_number: s.serial_number,
            min_range: s.minimum_range,
            max_range: s.maximum_range,
            tap_location: s.tap_location,
            sensor_type: s.sensor_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SensorsConfig {
    pub differential_pressure: Option<SensorConfig>,
    pub static_pressure: Option<SensorConfig>,
    pub flowing_temperature: Option<SensorConfig>,
}

/// The `configuration` object of a meter configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeterConfiguration {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    pub base_temperature: Option<f64>,
    pub base_pressure: Option<f64>,
    pub atmospheric_pressure: Option<f64>,
    pub units: Option<String>,
    pub contract_hour: Option<i64>,
    #[serde(rename = "AGA3")]
    pub aga3: Aga3Config,
    #[serde(rename = "AGA8")]
    pub aga8: Aga8Config,
    pub sensors: SensorsConfig,
}

#[derive(Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    configuration: MeterConfiguration,
}

impl MeterConfiguration {
    /// Read the `configuration` object out of a parsed document. A document
    /// without one yields an empty configuration.
    pub fn from_document(doc: &serde_json::Value) -> Result<Self> {
        Ok(ConfigDocument::deserialize(doc)?.configuration)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let doc: ConfigDocument = serde_json::from_reader(reader)?;
        Ok(doc.configuration)
    }

    /// Flatten into Meter Builder input. `meter_id` names the instance; the
    /// configuration's `name` becomes the label.
    pub fn into_input(self, meter_id: Option<&str>) -> MeterInput {
        let gas = self.gas_composition();
        let MeterConfiguration {
            name,
            owner,
            latitude,
            longitude,
            elevation,
            base_temperature,
            base_pressure,
            atmospheric_pressure,
            units,
            contract_hour,
            aga3,
            aga8,
            sensors,
        } = self;

        let reading = MeterReading {
            latitude,
            longitude,
            elevation,
            base_temperature,
            base_pressure,
            atmospheric_pressure,
            units,
            contract_hour,
            aga3_calculation: aga3.calculation,
            orifice_tap_type: aga3.orifice_tap,
            orifice_diameter: aga3.orifice_diameter,
            orifice_material: aga3.orifice_material,
            orifice_ref_temp: aga3.orifice_reference_temperature,
            pipe_inside_diameter: aga3.pipe_inside_diameter,
            pipe_material: aga3.pipe_material,
            pipe_ref_temp: aga3.pipe_reference_temperature,
            isentropic_exponent: aga3.isentropic_exponent,
            viscosity: aga3.viscosity,
            flow_extension: aga3.flow_extension,
            gas_composition: gas,
            gas_density: aga8.density,
            compressibility: aga8.compressibility,
            dp_sensor: sensors.differential_pressure.map(Into::into),
            static_pressure_sensor: sensors.static_pressure.map(Into::into),
            temp_sensor: sensors.flowing_temperature.map(Into::into),
            ..Default::default()
        };

        tracing::info!(meter = ?meter_id, name = ?name, "converted meter configuration");
        MeterInput {
            identity: MeterIdentity {
                meter_id: meter_id.map(str::to_owned),
                meter_name: name,
                owner,
            },
            reading,
        }
    }

    /// The AGA-8 table as a composition, `None` when the table is empty.
    fn gas_composition(&self) -> Option<GasComposition> {
        if self.aga8.components.is_empty() && self.aga8.units.is_none() {
            return None;
        }
        let mut gas = GasComposition { units: self.aga8.units.clone(), ..Default::default() };
        for entry in &self.aga8.components {
            let Some(fraction) = entry.value else { continue };
            if !gas.set(&entry.component, fraction) {
                tracing::warn!(component = %entry.component, "unknown gas component, skipped");
            }
        }
        tracing::debug!(components = self.aga8.components.len(), total = gas.total(), "gas composition");
        Some(gas)
    }
}
