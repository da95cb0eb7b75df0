//! QUDT unit tags (`http://qudt.org/vocab/unit/`) attached to property values.
//!
//! Values are passed through literally; no conversion happens here.

pub const DEG: &str = "unit:DEG";
pub const DEG_C: &str = "unit:DEG_C";
pub const M: &str = "unit:M";
pub const MILLI_M: &str = "unit:MilliM";
pub const KILO_PA: &str = "unit:KiloPA";
pub const UNITLESS: &str = "unit:UNITLESS";
pub const CENTI_POISE: &str = "unit:CentiPOISE";
pub const KILO_GM_PER_M3: &str = "unit:KiloGM-PER-M3";
pub const M3: &str = "unit:M3";
pub const M3_PER_HR: &str = "unit:M3-PER-HR";
pub const GJ_PER_HR: &str = "unit:GJ-PER-HR";
pub const MEGA_J_PER_M3: &str = "unit:MegaJ-PER-M3";
pub const GIGA_J: &str = "unit:GigaJ";
pub const SEC: &str = "unit:SEC";
pub const PERCENT: &str = "unit:PERCENT";
pub const V: &str = "unit:V";
