//! Default charging-curve synthesis
//!
//! This module derives a default DC fast-charging power curve from battery
//! capacity, voltage architecture, and charger power ratings. Real vehicles
//! hold peak power through an early plateau and then taper in steps; the
//! breakpoints for that shape live in a single policy table keyed by
//! capacity tier and voltage tier.

use crate::error::{FaradayError, Result};
use crate::record::{
    ChargingVoltage, CurvePoint, PowerPerChargingPoint, STANDARD_CHARGE_POINTS,
};

/// Battery-capacity tier used to select a curve shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityTier {
    /// Below 10 kWh
    Small,
    /// 10 to 30 kWh inclusive
    Medium,
    /// Above 30 kWh
    Large,
}

impl CapacityTier {
    pub fn from_kwh(battery_capacity_kwh: f64) -> Self {
        if battery_capacity_kwh < 10.0 {
            CapacityTier::Small
        } else if battery_capacity_kwh <= 30.0 {
            CapacityTier::Medium
        } else {
            CapacityTier::Large
        }
    }
}

/// How one breakpoint derives its power from the charger ratings
#[derive(Debug, Clone, Copy)]
enum PowerRule {
    /// Peak DC power
    Peak,
    /// Fixed fraction of DC max power
    Fraction(f64),
    /// Fraction of DC max power, floored by the AC max power
    FlooredFraction(f64),
    /// The AC max power directly (one-segment curve tails)
    AcTail,
}

/// One breakpoint of a curve shape: state of charge plus a power rule
#[derive(Debug, Clone, Copy)]
struct Breakpoint {
    percentage: f64,
    rule: PowerRule,
}

const fn bp(percentage: f64, rule: PowerRule) -> Breakpoint {
    Breakpoint { percentage, rule }
}

// Curve-shape policy. Higher voltage architectures sustain peak power for a
// larger fraction of state of charge, and smaller batteries taper sooner.
// Every synthesized curve is produced from exactly one of these rows.

const V48_SMALL: &[Breakpoint] = &[
    bp(0.0, PowerRule::Peak),
    bp(50.0, PowerRule::Peak),
    bp(70.0, PowerRule::Fraction(0.8)),
    bp(100.0, PowerRule::Fraction(0.2)),
];

const V48_MEDIUM_LARGE: &[Breakpoint] = &[
    bp(0.0, PowerRule::Peak),
    bp(30.0, PowerRule::Peak),
    bp(60.0, PowerRule::Fraction(0.9)),
    bp(80.0, PowerRule::Fraction(0.5)),
    bp(100.0, PowerRule::Fraction(0.2)),
];

const V400_SMALL: &[Breakpoint] = &[
    bp(0.0, PowerRule::Peak),
    bp(70.0, PowerRule::Peak),
    bp(100.0, PowerRule::AcTail),
];

const V400_MEDIUM: &[Breakpoint] = &[
    bp(0.0, PowerRule::Peak),
    bp(50.0, PowerRule::Peak),
    bp(80.0, PowerRule::Fraction(0.8)),
    bp(100.0, PowerRule::Fraction(0.2)),
];

const V400_LARGE: &[Breakpoint] = &[
    bp(0.0, PowerRule::Peak),
    bp(30.0, PowerRule::Peak),
    bp(60.0, PowerRule::Fraction(0.9)),
    bp(80.0, PowerRule::FlooredFraction(0.5)),
    bp(100.0, PowerRule::FlooredFraction(0.2)),
];

const V800_SMALL: &[Breakpoint] = &[
    bp(0.0, PowerRule::Peak),
    bp(70.0, PowerRule::Peak),
    bp(100.0, PowerRule::AcTail),
];

const V800_MEDIUM: &[Breakpoint] = &[
    bp(0.0, PowerRule::Peak),
    bp(60.0, PowerRule::Peak),
    bp(80.0, PowerRule::FlooredFraction(0.5)),
    bp(100.0, PowerRule::FlooredFraction(0.2)),
];

const V800_LARGE: &[Breakpoint] = &[
    bp(0.0, PowerRule::Peak),
    bp(40.0, PowerRule::Peak),
    bp(70.0, PowerRule::Fraction(0.9)),
    bp(85.0, PowerRule::FlooredFraction(0.5)),
    bp(100.0, PowerRule::FlooredFraction(0.2)),
];

fn breakpoints(voltage: ChargingVoltage, tier: CapacityTier) -> &'static [Breakpoint] {
    match (voltage, tier) {
        (ChargingVoltage::V48, CapacityTier::Small) => V48_SMALL,
        (ChargingVoltage::V48, _) => V48_MEDIUM_LARGE,
        (ChargingVoltage::V400, CapacityTier::Small) => V400_SMALL,
        (ChargingVoltage::V400, CapacityTier::Medium) => V400_MEDIUM,
        (ChargingVoltage::V400, CapacityTier::Large) => V400_LARGE,
        (ChargingVoltage::V800, CapacityTier::Small) => V800_SMALL,
        (ChargingVoltage::V800, CapacityTier::Medium) => V800_MEDIUM,
        (ChargingVoltage::V800, CapacityTier::Large) => V800_LARGE,
    }
}

/// Synthesize a default charging curve.
///
/// The curve starts at 0% state of charge at peak DC power, holds an early
/// plateau, and tapers in steps to 100%. Tail powers are floored so the
/// curve never ends below the vehicle's AC charging capability; all powers
/// are clamped to the DC max so the result always passes record validation.
pub fn default_charging_curve(
    battery_capacity_kwh: f64,
    dc_max_power: f64,
    ac_max_power: f64,
    voltage: ChargingVoltage,
) -> Result<Vec<CurvePoint>> {
    if dc_max_power <= 0.0 {
        return Err(FaradayError::curve_input(format!(
            "dc max power must be positive, got {dc_max_power}"
        )));
    }
    if battery_capacity_kwh <= 0.0 {
        return Err(FaradayError::curve_input(format!(
            "battery capacity must be positive, got {battery_capacity_kwh}"
        )));
    }

    let tier = CapacityTier::from_kwh(battery_capacity_kwh);
    let curve = breakpoints(voltage, tier)
        .iter()
        .map(|point| {
            let power = match point.rule {
                PowerRule::Peak => dc_max_power,
                PowerRule::Fraction(factor) => factor * dc_max_power,
                PowerRule::FlooredFraction(factor) => (factor * dc_max_power).max(ac_max_power),
                PowerRule::AcTail => ac_max_power,
            };
            CurvePoint::new(point.percentage, power.min(dc_max_power))
        })
        .collect();

    Ok(curve)
}

/// Achievable AC power per standard charge-point rating.
///
/// Each entry is the lesser of the charge point's rating and the vehicle's
/// AC max power. Pure and idempotent.
pub fn power_per_charging_point(ac_max_power: f64) -> PowerPerChargingPoint {
    let capped = |rating: f64| rating.min(ac_max_power);
    PowerPerChargingPoint {
        kw_2_0: capped(STANDARD_CHARGE_POINTS[0]),
        kw_2_3: capped(STANDARD_CHARGE_POINTS[1]),
        kw_3_7: capped(STANDARD_CHARGE_POINTS[2]),
        kw_7_4: capped(STANDARD_CHARGE_POINTS[3]),
        kw_11: capped(STANDARD_CHARGE_POINTS[4]),
        kw_16: capped(STANDARD_CHARGE_POINTS[5]),
        kw_22: capped(STANDARD_CHARGE_POINTS[6]),
        kw_43: capped(STANDARD_CHARGE_POINTS[7]),
    }
}
