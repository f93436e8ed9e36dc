use faraday::curve::{default_charging_curve, power_per_charging_point};
use faraday::record::{ChargingVoltage, CurvePoint};

#[test]
fn small_battery_400v_scenario() {
    // 8 kWh city car on a 50 kW DC charger with 11 kW AC
    let curve = default_charging_curve(8.0, 50.0, 11.0, ChargingVoltage::V400).unwrap();
    assert_eq!(
        curve,
        vec![
            CurvePoint::new(0.0, 50.0),
            CurvePoint::new(70.0, 50.0),
            CurvePoint::new(100.0, 11.0),
        ]
    );
}

#[test]
fn large_battery_800v_scenario() {
    // 60 kWh pack on an 800 V architecture, 150 kW DC, 11 kW AC
    let curve = default_charging_curve(60.0, 150.0, 11.0, ChargingVoltage::V800).unwrap();
    assert_eq!(
        curve,
        vec![
            CurvePoint::new(0.0, 150.0),
            CurvePoint::new(40.0, 150.0),
            CurvePoint::new(70.0, 135.0),
            CurvePoint::new(85.0, 75.0),
            CurvePoint::new(100.0, 30.0),
        ]
    );
}

#[test]
fn high_ac_power_raises_the_tail_floor() {
    // 22 kW AC on a large 400 V pack floors the 80% and 100% breakpoints
    let curve = default_charging_curve(80.0, 30.0, 22.0, ChargingVoltage::V400).unwrap();
    let at_80 = curve.iter().find(|p| p.percentage == 80.0).unwrap();
    let at_100 = curve.iter().find(|p| p.percentage == 100.0).unwrap();
    assert_eq!(at_80.power, 22.0); // max(0.5 * 30, 22)
    assert_eq!(at_100.power, 22.0); // max(0.2 * 30, 22)
}

#[test]
fn synthesized_curves_always_validate() {
    let engine = faraday::ValidationEngine::new();
    for voltage in [ChargingVoltage::V48, ChargingVoltage::V400, ChargingVoltage::V800] {
        for capacity in [4.0, 9.9, 10.0, 25.0, 30.0, 31.0, 100.0] {
            for (dc, ac) in [(50.0, 11.0), (150.0, 22.0), (11.0, 43.0), (350.0, 7.4)] {
                let curve = default_charging_curve(capacity, dc, ac, voltage).unwrap();
                assert!(
                    engine.validate_curve(&curve, dc),
                    "invalid curve for voltage={voltage:?} capacity={capacity} dc={dc} ac={ac}: {curve:?}"
                );
                assert_eq!(curve[0].percentage, 0.0);
                assert_eq!(curve[0].power, dc);
                assert_eq!(curve.last().unwrap().percentage, 100.0);
            }
        }
    }
}

#[test]
fn charge_point_mapping_caps_at_ac_power() {
    let mapping = power_per_charging_point(7.4);
    for (label, rating, value) in mapping.entries() {
        assert_eq!(value, rating.min(7.4), "wrong value for rating {label}");
    }
    assert_eq!(mapping.entries().len(), 8);

    // Large AC chargers pass every rating through unchanged
    let mapping = power_per_charging_point(50.0);
    for (_, rating, value) in mapping.entries() {
        assert_eq!(value, rating);
    }
}
