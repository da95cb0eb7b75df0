//! Meter Builder: flat reading snapshot → `jpi:OrificeGasMeter` node.
//!
//! A pass-through assembler: it never rejects a reading. Fields with a default
//! always appear; fields without one (live measurements and orifice/pipe
//! diameters included) appear only when supplied and are never written as
//! `null`. A supplied sensor descriptor always yields its whole cluster.

use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigProvider, keys};
use crate::model::{unit, Node, NodeKind, PropertyMap, Status, Timestamp};

use super::property::{include_if_present, PropertyMapBuilder};
use super::Built;

pub const DEFAULT_METER_ID: &str = "SCADAPAK-474-RUN1-METER";
pub const DEFAULT_METER_NAME: &str = "SCADAPak 474 Orifice Meter";
pub const DEFAULT_OWNER: &str = "Your Company";

// ============================================================================
// Input
// ============================================================================

/// Identification for the meter. Unset fields fall back to configuration,
/// then to the crate defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeterIdentity {
    pub meter_id: Option<String>,
    pub meter_name: Option<String>,
    pub owner: Option<String>,
}

/// Descriptor for one transmitter feeding the meter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SensorDescriptor {
    pub source: Option<String>,
    pub serial_number: Option<String>,
    pub min_range: Option<f64>,
    pub max_range: Option<f64>,
    /// Static-pressure sensors only.
    pub tap_location: Option<String>,
    /// Static-pressure sensors only (`gauge` / `absolute`).
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
}

/// AGA-8 detail gas composition as molar fractions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GasComposition {
    pub units: Option<String>,
    pub methane: Option<f64>,
    pub ethane: Option<f64>,
    pub propane: Option<f64>,
    pub iso_butane: Option<f64>,
    pub n_butane: Option<f64>,
    pub iso_pentane: Option<f64>,
    pub n_pentane: Option<f64>,
    pub hexane: Option<f64>,
    pub heptane: Option<f64>,
    pub octane: Option<f64>,
    pub nonane: Option<f64>,
    pub decane: Option<f64>,
    pub nitrogen: Option<f64>,
    pub carbon_dioxide: Option<f64>,
    pub hydrogen_sulfide: Option<f64>,
    pub hydrogen: Option<f64>,
    pub helium: Option<f64>,
    pub water: Option<f64>,
    pub carbon_monoxide: Option<f64>,
    pub oxygen: Option<f64>,
    pub argon: Option<f64>,
}

impl GasComposition {
    /// `(property name, fraction)` for every component, in AGA-8 order.
    pub fn components(&self) -> [(&'static str, Option<f64>); 21] {
        [
            ("GasComp_C1", self.methane),
            ("GasComp_C2", self.ethane),
            ("GasComp_C3", self.propane),
            ("GasComp_iC4", self.iso_butane),
            ("GasComp_nC4", self.n_butane),
            ("GasComp_iC5", self.iso_pentane),
            ("GasComp_nC5", self.n_pentane),
            ("GasComp_C6", self.hexane),
            ("GasComp_C7", self.heptane),
            ("GasComp_C8", self.octane),
            ("GasComp_C9", self.nonane),
            ("GasComp_C10", self.decane),
            ("GasComp_N2", self.nitrogen),
            ("GasComp_CO2", self.carbon_dioxide),
            ("GasComp_H2S", self.hydrogen_sulfide),
            ("GasComp_H2", self.hydrogen),
            ("GasComp_He", self.helium),
            ("GasComp_H2O", self.water),
            ("GasComp_CO", self.carbon_monoxide),
            ("GasComp_O2", self.oxygen),
            ("GasComp_Ar", self.argon),
        ]
    }

    /// Set one component by its short code (`C1`, `iC4`, `N2`, …). Returns
    /// false for an unknown code.
    pub fn set(&mut self, code: &str, fraction: f64) -> bool {
        let slot = match code {
            "C1" => &mut self.methane,
            "C2" => &mut self.ethane,
            "C3" => &mut self.propane,
            "iC4" => &mut self.iso_butane,
            "nC4" => &mut self.n_butane,
            "iC5" => &mut self.iso_pentane,
            "nC5" => &mut self.n_pentane,
            "C6" => &mut self.hexane,
            "C7" => &mut self.heptane,
            "C8" => &mut self.octane,
            "C9" => &mut self.nonane,
            "C10" => &mut self.decane,
            "N2" => &mut self.nitrogen,
            "CO2" => &mut self.carbon_dioxide,
            "H2S" => &mut self.hydrogen_sulfide,
            "H2" => &mut self.hydrogen,
            "He" => &mut self.helium,
            "H2O" => &mut self.water,
            "CO" => &mut self.carbon_monoxide,
            "O2" => &mut self.oxygen,
            "Ar" => &mut self.argon,
            _ => return false,
        };
        *slot = Some(fraction);
        true
    }

    /// Sum of the supplied fractions.
    pub fn total(&self) -> f64 {
        self.components().iter().filter_map(|(_, v)| *v).sum()
    }
}

/// One poll of the flow computer, already scaled to engineering units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeterReading {
    // Location
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    #[serde(rename = "surfaceLSD")]
    pub surface_lsd: Option<String>,
    #[serde(rename = "downholeLSD")]
    pub downhole_lsd: Option<String>,

    // Base conditions
    pub base_temperature: Option<f64>,
    pub base_pressure: Option<f64>,
    pub atmospheric_pressure: Option<f64>,
    pub units: Option<String>,
    pub contract_hour: Option<i64>,

    // AGA-3 configuration
    pub aga3_calculation: Option<String>,
    pub orifice_tap_type: Option<String>,
    pub orifice_diameter: Option<f64>,
    pub orifice_material: Option<String>,
    pub orifice_ref_temp: Option<f64>,
    pub pipe_inside_diameter: Option<f64>,
    pub pipe_material: Option<String>,
    pub pipe_ref_temp: Option<f64>,
    pub isentropic_exponent: Option<f64>,
    pub viscosity: Option<f64>,
    pub flow_extension: Option<String>,

    pub gas_composition: Option<GasComposition>,

    // Calculated gas properties
    pub gas_density: Option<f64>,
    pub compressibility: Option<f64>,
    pub specific_gravity: Option<f64>,

    // Sensors
    pub dp_sensor: Option<SensorDescriptor>,
    pub static_pressure_sensor: Option<SensorDescriptor>,
    pub temp_sensor: Option<SensorDescriptor>,

    // Live measurements
    pub flow_rate: Option<f64>,
    pub differential_pressure: Option<f64>,
    pub static_pressure: Option<f64>,
    pub temperature: Option<f64>,

    // Energy
    pub energy_flow_rate: Option<f64>,
    pub heating_value: Option<f64>,

    // Totals
    pub accumulated_volume: Option<f64>,
    pub accumulated_energy: Option<f64>,
    pub current_day_volume: Option<f64>,
    pub previous_day_volume: Option<f64>,
    pub current_hour_volume: Option<f64>,
    pub previous_hour_volume: Option<f64>,

    pub meter_status: Option<Status>,
}

/// Everything the Meter Builder consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterInput {
    pub identity: MeterIdentity,
    pub reading: MeterReading,
}

// ============================================================================
// Sensor groups
// ============================================================================

/// The three transmitter groups an orifice meter reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorGroup {
    DifferentialPressure,
    StaticPressure,
    Temperature,
}

impl SensorGroup {
    pub fn prefix(self) -> &'static str {
        match self {
            SensorGroup::DifferentialPressure => "DPSensor",
            SensorGroup::StaticPressure => "StaticPressureSensor",
            SensorGroup::Temperature => "TempSensor",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            SensorGroup::Temperature => unit::DEG_C,
            _ => unit::KILO_PA,
        }
    }

    /// Default `(min, max)` range when the descriptor omits one.
    pub fn default_range(self) -> (f64, f64) {
        match self {
            SensorGroup::DifferentialPressure => (0.0, 100.0),
            SensorGroup::StaticPressure => (0.0, 10_000.0),
            SensorGroup::Temperature => (-40.0, 100.0),
        }
    }

    /// The cluster for one supplied descriptor: always the full 4 keys
    /// (6 for static pressure). An unset source or serial number reads `""`.
    pub fn properties(self, sensor: &SensorDescriptor, at: Timestamp) -> PropertyMap {
        let prefix = self.prefix();
        let (min, max) = self.default_range();
        let mut b = PropertyMapBuilder::new(at);
        b.with_default(&format!("{prefix}_Source"), sensor.source.as_deref(), "", None)
            .with_default(&format!("{prefix}_SerialNumber"), sensor.serial_number.as_deref(), "", None)
            .with_default(&format!("{prefix}_MinRange"), sensor.min_range, min, Some(self.unit()))
            .with_default(&format!("{prefix}_MaxRange"), sensor.max_range, max, Some(self.unit()));
        if self == SensorGroup::StaticPressure {
            b.with_default(&format!("{prefix}_TapLocation"), sensor.tap_location.as_deref(), "upstream", None)
                .with_default(&format!("{prefix}_Type"), sensor.sensor_type.as_deref(), "gauge", None);
        }
        b.build()
    }
}

fn gas_composition_properties(gas: &GasComposition, at: Timestamp) -> PropertyMap {
    let mut b = PropertyMapBuilder::new(at);
    b.with_default("AGA8_Units", gas.units.as_deref(), "molar_fraction", None);
    for (name, fraction) in gas.components() {
        b.with_default(name, fraction, 0.0, Some(unit::UNITLESS));
    }
    b.build()
}

// ============================================================================
// Builder
// ============================================================================

/// Build the meter node. Captures the clock once unless `at` is injected.
pub fn build_meter(input: &MeterInput, config: &dyn ConfigProvider, at: Option<Timestamp>) -> Built {
    let at = at.unwrap_or_else(Timestamp::now);
    let id = config::resolve_string(input.identity.meter_id.as_deref(), config, keys::METER_ID, DEFAULT_METER_ID);
    let name = config::resolve_string(input.identity.meter_name.as_deref(), config, keys::METER_NAME, DEFAULT_METER_NAME);
    let owner = config::resolve_string(input.identity.owner.as_deref(), config, keys::OWNER, DEFAULT_OWNER);
    let r = &input.reading;

    let mut props = PropertyMapBuilder::new(at);

    // Identification
    props.required("Name", name.as_str(), None)
        .required("Owner", owner.as_str(), None);

    // Location
    props.optional("Latitude", r.latitude.or_else(|| config.lookup_f64(keys::LATITUDE)), Some(unit::DEG))
        .optional("Longitude", r.longitude.or_else(|| config.lookup_f64(keys::LONGITUDE)), Some(unit::DEG))
        .optional("Elevation", r.elevation.or_else(|| config.lookup_f64(keys::ELEVATION)), Some(unit::M))
        .optional("SurfaceLSD", r.surface_lsd.clone().or_else(|| config.lookup_string(keys::SURFACE_LSD)), None)
        .optional("DownholeLSD", r.downhole_lsd.clone().or_else(|| config.lookup_string(keys::DOWNHOLE_LSD)), None);

    // Base conditions
    props.with_default("BaseTemperature", r.base_temperature, 15.0, Some(unit::DEG_C))
        .with_default("BasePressure", r.base_pressure, 101.325, Some(unit::KILO_PA))
        .with_default("AtmosphericPressure", r.atmospheric_pressure, 101.325, Some(unit::KILO_PA))
        .with_default("Units", r.units.as_deref(), "metric", None)
        .with_default("ContractHour", r.contract_hour, 8, None);

    // Calculation standard, orifice plate and pipe
    props.with_default("AGA3_Calculation", r.aga3_calculation.as_deref(), "AGA3_1992", None)
        .with_default("OrificeTapType", r.orifice_tap_type.as_deref(), "Flange", None)
        .optional("OrificeDiameter", r.orifice_diameter, Some(unit::MILLI_M))
        .with_default("OrificeMaterial", r.orifice_material.as_deref(), "Type_316_Stainless_Steel", None)
        .with_default("OrificeReferenceTemperature", r.orifice_ref_temp, 20.0, Some(unit::DEG_C))
        .optional("PipeInsideDiameter", r.pipe_inside_diameter, Some(unit::MILLI_M))
        .with_default("PipeMaterial", r.pipe_material.as_deref(), "Carbon_Steel", None)
        .with_default("PipeReferenceTemperature", r.pipe_ref_temp, 20.0, Some(unit::DEG_C));

    // Gas properties
    props.with_default("IsentropicExponent", r.isentropic_exponent, 1.3, Some(unit::UNITLESS))
        .with_default("Viscosity", r.viscosity, 0.010268, Some(unit::CENTI_POISE))
        .with_default("FlowExtension", r.flow_extension.as_deref(), "Method_1", None);

    props.merge(include_if_present(r.gas_composition.as_ref(), |gas| gas_composition_properties(gas, at)));

    props.optional_live("GasDensity", r.gas_density, Some(unit::KILO_GM_PER_M3))
        .optional_live("Compressibility", r.compressibility, Some(unit::UNITLESS))
        .optional_live("SpecificGravity", r.specific_gravity, Some(unit::UNITLESS));

    // Sensor clusters
    for (group, descriptor) in [
        (SensorGroup::DifferentialPressure, &r.dp_sensor),
        (SensorGroup::StaticPressure, &r.static_pressure_sensor),
        (SensorGroup::Temperature, &r.temp_sensor),
    ] {
        props.merge(include_if_present(descriptor.as_ref(), |s| group.properties(s, at)));
    }

    // Live measurements
    props.optional_live("FlowRate", r.flow_rate, Some(unit::M3_PER_HR))
        .optional_live("DifferentialPressure", r.differential_pressure, Some(unit::KILO_PA))
        .optional_live("StaticPressure", r.static_pressure, Some(unit::KILO_PA))
        .optional_live("Temperature", r.temperature, Some(unit::DEG_C));

    props.optional_live("EnergyFlowRate", r.energy_flow_rate, Some(unit::GJ_PER_HR))
        .optional_live("HeatingValue", r.heating_value, Some(unit::MEGA_J_PER_M3));

    // Totals. Previous-period volumes are closed values and carry no timestamp.
    props.with_default_live("AccumulatedVolume", r.accumulated_volume, 0.0, Some(unit::M3))
        .optional_live("AccumulatedEnergy", r.accumulated_energy, Some(unit::GIGA_J))
        .optional_live("CurrentDayVolume", r.current_day_volume, Some(unit::M3))
        .optional("PreviousDayVolume", r.previous_day_volume, Some(unit::M3))
        .optional_live("CurrentHourVolume", r.current_hour_volume, Some(unit::M3))
        .optional("PreviousHourVolume", r.previous_hour_volume, Some(unit::M3));

    let status = r.meter_status.clone().unwrap_or_default();
    if !status.is_recognized() {
        tracing::debug!(meter = %id, %status, "carrying unrecognized meter status verbatim");
    }
    props.required_live("Status", status, None);

    let node = Node::new(NodeKind::OrificeGasMeter, &id, name).with_properties(props.build());
    tracing::debug!(node = %node.id, properties = node.properties.len(), "built meter");
    Built { node, timestamp: at }
}
