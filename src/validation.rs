//! Record validation against the dataset schema
//!
//! The engine reports every violation it finds as a human-readable message
//! rather than stopping at the first, and never fails itself: an empty list
//! is the sole success signal. It performs no mutation and holds no state
//! beyond a logger.

use crate::logging::get_logger;
use crate::record::{AcCharger, CurvePoint, DcCharger, EV_TYPE, USABLE_PHASES, VehicleRecord};

/// Validates assembled vehicle records and charging sub-records
pub struct ValidationEngine {
    logger: crate::logging::StructuredLogger,
}

impl ValidationEngine {
    /// Create a new validation engine
    pub fn new() -> Self {
        let logger = get_logger("validation");
        Self { logger }
    }

    /// Validate a full vehicle record.
    ///
    /// Every check is evaluated independently so all violations are
    /// reported together. Empty result means the record is valid.
    pub fn validate_record(&self, record: &VehicleRecord) -> Vec<String> {
        let mut errors = Vec::new();

        if record.kind != EV_TYPE {
            errors.push(format!(
                "Record type must be '{EV_TYPE}', got '{}'",
                record.kind
            ));
        }

        if !valid_name(&record.brand) {
            errors.push("Brand name must contain only letters, digits, spaces and hyphens".into());
        }

        if !valid_name(&record.model) {
            errors.push("Model name must contain only letters, digits, spaces and hyphens".into());
        }

        if record.usable_battery_size <= 0.0 {
            errors.push("Usable battery size must be positive".into());
        }

        if record.energy_consumption.average_consumption <= 0.0 {
            errors.push("Average energy consumption must be positive".into());
        }

        if !record
            .vehicle_type
            .allowed_voltages()
            .contains(&record.charging_voltage)
        {
            errors.push(format!(
                "Charging voltage {} V is not valid for vehicle type '{}'",
                record.charging_voltage, record.vehicle_type
            ));
        }

        errors.extend(self.validate_ac_charger(&record.ac_charger));
        if let Some(dc_charger) = &record.dc_charger {
            errors.extend(self.validate_dc_charger(dc_charger));
        }

        if !errors.is_empty() {
            self.logger.debug(&format!(
                "Record {} failed validation with {} error(s)",
                record.id,
                errors.len()
            ));
        }

        errors
    }

    /// Validate the charging sub-records in isolation, as used mid-entry
    /// before the full record exists.
    pub fn validate_charging(
        &self,
        ac_charger: &AcCharger,
        dc_charger: Option<&DcCharger>,
    ) -> Vec<String> {
        let mut errors = self.validate_ac_charger(ac_charger);
        if let Some(dc_charger) = dc_charger {
            errors.extend(self.validate_dc_charger(dc_charger));
        }
        errors
    }

    fn validate_ac_charger(&self, charger: &AcCharger) -> Vec<String> {
        let mut errors = Vec::new();

        // Empty port lists are valid; duplicates are not
        if has_duplicates(&charger.ports) {
            errors.push("AC ports must not contain duplicates".into());
        }

        if !USABLE_PHASES.contains(&charger.usable_phases) {
            errors.push(format!(
                "AC charger must have between 1 and 3 usable phases, got {}",
                charger.usable_phases
            ));
        }

        if charger.max_power <= 0.0 {
            errors.push("AC charger must have positive max power".into());
        }

        match &charger.power_per_charging_point {
            None => errors.push("AC charger is missing power per charging point".into()),
            Some(mapping) => {
                for (label, _, value) in mapping.entries() {
                    if value <= 0.0 {
                        errors.push(format!(
                            "Power per charging point '{label}' must be positive, got {value}"
                        ));
                    } else if charger.max_power > 0.0 && value > charger.max_power {
                        errors.push(format!(
                            "Power per charging point '{label}' is {value} kW, exceeding the max power of {} kW",
                            charger.max_power
                        ));
                    }
                }
            }
        }

        errors
    }

    fn validate_dc_charger(&self, charger: &DcCharger) -> Vec<String> {
        let mut errors = Vec::new();

        if charger.ports.is_empty() {
            errors.push("DC ports cannot be empty when DC charging exists".into());
        }

        if has_duplicates(&charger.ports) {
            errors.push("DC ports must not contain duplicates".into());
        }

        if charger.max_power <= 0.0 {
            errors.push("DC charger must have positive max power".into());
        }

        for point in &charger.charging_curve {
            if !(0.0..=100.0).contains(&point.percentage) {
                errors.push(format!(
                    "Invalid charging curve percentage: {}",
                    point.percentage
                ));
            }
            if point.power <= 0.0 || point.power > charger.max_power {
                errors.push(format!(
                    "Invalid charging curve power: {} kW exceeds the max power of {} kW",
                    point.power, charger.max_power
                ));
            }
        }

        for window in charger.charging_curve.windows(2) {
            if window[0].percentage >= window[1].percentage {
                errors.push(format!(
                    "Charging curve percentages must be strictly ascending ({}% before {}%)",
                    window[0].percentage, window[1].percentage
                ));
            }
        }

        errors
    }

    /// Check a curve against a max power, as a simple predicate.
    ///
    /// Used for re-checking hand-entered curves; the full per-point messages
    /// come from [`Self::validate_record`].
    pub fn validate_curve(&self, curve: &[CurvePoint], max_power: f64) -> bool {
        if curve.is_empty() {
            return false;
        }
        let points_ok = curve.iter().all(|point| {
            (0.0..=100.0).contains(&point.percentage)
                && point.power > 0.0
                && point.power <= max_power
        });
        let ascending = curve
            .windows(2)
            .all(|window| window[0].percentage < window[1].percentage);
        points_ok && ascending
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Brand and model names: non-empty, letters/digits/spaces/hyphens only
pub fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-')
}

fn has_duplicates<T: PartialEq>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, item)| items[..i].contains(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AcPort, DcPort};

    fn ac_charger() -> AcCharger {
        AcCharger {
            ports: vec![AcPort::Type2],
            usable_phases: 3,
            max_power: 11.0,
            power_per_charging_point: Some(crate::curve::power_per_charging_point(11.0)),
        }
    }

    #[test]
    fn test_valid_name() {
        assert!(valid_name("Ioniq 5"));
        assert!(valid_name("e-208"));
        assert!(!valid_name(""));
        assert!(!valid_name("Škoda!"));
    }

    #[test]
    fn test_ac_charger_checks() {
        let engine = ValidationEngine::new();
        assert!(engine.validate_charging(&ac_charger(), None).is_empty());

        // Empty port list is permitted
        let mut charger = ac_charger();
        charger.ports.clear();
        assert!(engine.validate_charging(&charger, None).is_empty());

        let mut charger = ac_charger();
        charger.usable_phases = 4;
        charger.max_power = -1.0;
        let errors = engine.validate_charging(&charger, None);
        assert!(errors.iter().any(|e| e.contains("usable phases")));
        assert!(errors.iter().any(|e| e.contains("positive max power")));
    }

    #[test]
    fn test_missing_charge_point_mapping() {
        let engine = ValidationEngine::new();
        let mut charger = ac_charger();
        charger.power_per_charging_point = None;
        let errors = engine.validate_charging(&charger, None);
        assert!(
            errors
                .iter()
                .any(|e| e.contains("missing power per charging point"))
        );
    }

    #[test]
    fn test_dc_charger_checks() {
        let engine = ValidationEngine::new();
        let dc = DcCharger {
            ports: vec![],
            max_power: 50.0,
            charging_curve: vec![CurvePoint::new(50.0, 60.0), CurvePoint::new(20.0, 40.0)],
            is_default_charging_curve: false,
        };
        let errors = engine.validate_charging(&ac_charger(), Some(&dc));
        assert!(errors.iter().any(|e| e.contains("DC ports cannot be empty")));
        assert!(errors.iter().any(|e| e.contains("exceeds the max power")));
        assert!(errors.iter().any(|e| e.contains("strictly ascending")));
    }

    #[test]
    fn test_duplicate_ports() {
        let engine = ValidationEngine::new();
        let mut charger = ac_charger();
        charger.ports = vec![AcPort::Type2, AcPort::Type2];
        let dc = DcCharger {
            ports: vec![DcPort::Ccs, DcPort::Ccs],
            max_power: 50.0,
            charging_curve: vec![CurvePoint::new(0.0, 50.0), CurvePoint::new(100.0, 11.0)],
            is_default_charging_curve: true,
        };
        let errors = engine.validate_charging(&charger, Some(&dc));
        assert!(errors.iter().any(|e| e.contains("AC ports")));
        assert!(errors.iter().any(|e| e.contains("DC ports must not")));
    }

    #[test]
    fn test_validate_curve_predicate() {
        let engine = ValidationEngine::new();
        assert!(!engine.validate_curve(&[], 50.0));

        let good = [
            CurvePoint::new(0.0, 48.0),
            CurvePoint::new(60.0, 50.0),
            CurvePoint::new(100.0, 11.0),
        ];
        assert!(engine.validate_curve(&good, 50.0));

        let out_of_range = [CurvePoint::new(-5.0, 40.0), CurvePoint::new(100.0, 11.0)];
        assert!(!engine.validate_curve(&out_of_range, 50.0));

        let not_ascending = [
            CurvePoint::new(0.0, 48.0),
            CurvePoint::new(60.0, 50.0),
            CurvePoint::new(60.0, 45.0),
            CurvePoint::new(100.0, 11.0),
        ];
        assert!(!engine.validate_curve(&not_ascending, 50.0));

        let over_power = [CurvePoint::new(0.0, 55.0), CurvePoint::new(100.0, 11.0)];
        assert!(!engine.validate_curve(&over_power, 50.0));
    }
}
