//! Domain model for EV charging specification records
//!
//! This module defines the structured record types and the domain constants
//! (ports, phases, voltages, standard charge-point ratings) that the
//! validation engine and the entry flow operate on. Field names and literal
//! values are a wire contract with the JSON dataset files.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed `type` marker carried by every record in the dataset
pub const EV_TYPE: &str = "bev";

/// The eight conventional AC charge-point power ratings in kW
pub const STANDARD_CHARGE_POINTS: [f64; 8] = [2.0, 2.3, 3.7, 7.4, 11.0, 16.0, 22.0, 43.0];

/// Valid usable phase counts for AC charging
pub const USABLE_PHASES: [u8; 3] = [1, 2, 3];

/// Vehicle category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Car,
    Motorbike,
    Microcar,
}

impl VehicleCategory {
    /// All selectable categories, in display order
    pub const ALL: [VehicleCategory; 3] = [
        VehicleCategory::Car,
        VehicleCategory::Motorbike,
        VehicleCategory::Microcar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleCategory::Car => "car",
            VehicleCategory::Motorbike => "motorbike",
            VehicleCategory::Microcar => "microcar",
        }
    }

    /// Voltage architectures valid for this category.
    ///
    /// 48 V is restricted to microcars; cars and motorbikes use 400 V or
    /// 800 V architectures.
    pub fn allowed_voltages(self) -> &'static [ChargingVoltage] {
        match self {
            VehicleCategory::Microcar => &[ChargingVoltage::V48, ChargingVoltage::V400],
            VehicleCategory::Car | VehicleCategory::Motorbike => {
                &[ChargingVoltage::V400, ChargingVoltage::V800]
            }
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Charging-system nominal voltage class
///
/// Serialized as the bare number (48/400/800) in dataset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum ChargingVoltage {
    V48,
    V400,
    V800,
}

impl ChargingVoltage {
    pub fn volts(self) -> u16 {
        match self {
            ChargingVoltage::V48 => 48,
            ChargingVoltage::V400 => 400,
            ChargingVoltage::V800 => 800,
        }
    }
}

impl From<ChargingVoltage> for u16 {
    fn from(voltage: ChargingVoltage) -> Self {
        voltage.volts()
    }
}

impl TryFrom<u16> for ChargingVoltage {
    type Error = String;

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        match value {
            48 => Ok(ChargingVoltage::V48),
            400 => Ok(ChargingVoltage::V400),
            800 => Ok(ChargingVoltage::V800),
            other => Err(format!("unknown charging voltage: {other}")),
        }
    }
}

impl std::fmt::Display for ChargingVoltage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.volts())
    }
}

/// AC charging port types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcPort {
    Type1,
    Type2,
}

impl AcPort {
    pub const ALL: [AcPort; 2] = [AcPort::Type1, AcPort::Type2];

    pub fn as_str(self) -> &'static str {
        match self {
            AcPort::Type1 => "type1",
            AcPort::Type2 => "type2",
        }
    }
}

/// DC charging port types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DcPort {
    Ccs,
    Chademo,
    TeslaSuc,
    TeslaCcs,
}

impl DcPort {
    pub const ALL: [DcPort; 4] = [DcPort::Ccs, DcPort::Chademo, DcPort::TeslaSuc, DcPort::TeslaCcs];

    pub fn as_str(self) -> &'static str {
        match self {
            DcPort::Ccs => "ccs",
            DcPort::Chademo => "chademo",
            DcPort::TeslaSuc => "tesla_suc",
            DcPort::TeslaCcs => "tesla_ccs",
        }
    }
}

/// Achievable AC charging power per standard charge-point rating
///
/// Always fully populated; each value is `min(rating, ac max power)`.
/// The JSON keys are the rating labels used across the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerPerChargingPoint {
    #[serde(rename = "2.0")]
    pub kw_2_0: f64,
    #[serde(rename = "2.3")]
    pub kw_2_3: f64,
    #[serde(rename = "3.7")]
    pub kw_3_7: f64,
    #[serde(rename = "7.4")]
    pub kw_7_4: f64,
    #[serde(rename = "11")]
    pub kw_11: f64,
    #[serde(rename = "16")]
    pub kw_16: f64,
    #[serde(rename = "22")]
    pub kw_22: f64,
    #[serde(rename = "43")]
    pub kw_43: f64,
}

impl PowerPerChargingPoint {
    /// All entries as (label, rating kW, achievable kW), in rating order
    pub fn entries(&self) -> [(&'static str, f64, f64); 8] {
        [
            ("2.0", 2.0, self.kw_2_0),
            ("2.3", 2.3, self.kw_2_3),
            ("3.7", 3.7, self.kw_3_7),
            ("7.4", 7.4, self.kw_7_4),
            ("11", 11.0, self.kw_11),
            ("16", 16.0, self.kw_16),
            ("22", 22.0, self.kw_22),
            ("43", 43.0, self.kw_43),
        ]
    }
}

/// One sample of a DC charging curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// State of charge in percent (0-100)
    pub percentage: f64,

    /// Deliverable power in kW at this state of charge
    pub power: f64,
}

impl CurvePoint {
    pub fn new(percentage: f64, power: f64) -> Self {
        Self { percentage, power }
    }
}

/// AC charger sub-record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcCharger {
    /// Supported AC ports (may be empty)
    pub ports: Vec<AcPort>,

    /// Usable phase count (1-3)
    pub usable_phases: u8,

    /// Maximum AC charging power in kW
    pub max_power: f64,

    /// Achievable power per standard charge point; optional so a missing
    /// mapping is representable and reported by validation
    pub power_per_charging_point: Option<PowerPerChargingPoint>,
}

/// DC charger sub-record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcCharger {
    /// Supported DC ports (must be non-empty)
    pub ports: Vec<DcPort>,

    /// Maximum DC charging power in kW
    pub max_power: f64,

    /// Power-vs-state-of-charge samples, ascending by percentage
    pub charging_curve: Vec<CurvePoint>,

    /// Whether the curve was synthesized rather than hand-entered
    pub is_default_charging_curve: bool,
}

/// Average energy consumption container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyConsumption {
    /// Average consumption in kWh/100km
    pub average_consumption: f64,
}

/// A brand referenced by vehicle records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
}

/// One curated vehicle record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Opaque unique record id
    pub id: Uuid,

    /// Fixed EV marker, always [`EV_TYPE`]
    #[serde(rename = "type")]
    pub kind: String,

    /// Brand name
    pub brand: String,

    /// Id of the referenced brand
    pub brand_id: Uuid,

    /// Model name
    pub model: String,

    /// Vehicle category
    pub vehicle_type: VehicleCategory,

    /// Variant label (may be empty)
    pub variant: String,

    /// Release year
    pub release_year: u16,

    /// Usable battery capacity in kWh
    pub usable_battery_size: f64,

    /// Energy consumption figures
    pub energy_consumption: EnergyConsumption,

    /// Charging voltage architecture
    pub charging_voltage: ChargingVoltage,

    /// AC charger details
    pub ac_charger: AcCharger,

    /// DC charger details, if the vehicle supports DC charging
    #[serde(default)]
    pub dc_charger: Option<DcCharger>,
}
