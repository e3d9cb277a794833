//! Integration test: reference house + buffer over a few control intervals.
//!
//! House: C_in = 2e6 J/K, C_out = 1e7 J/K, R = (0.01, 0.02, 0.05, 0.01) K/W,
//! 10 m² glazing. Buffer: 5e6 J/K. Interval 900 s.

use hp_core::AssetId;
use hp_thermal::{
    BoundaryGuard, BufferState, Capacities, EQUILIBRIUM_TOL, OperatingBounds, Resistances,
    ThermalBufferModel, ThermalError, ThermalNetworkModel, WeatherForcing,
};

const DT: f64 = 900.0;

fn house() -> ThermalNetworkModel {
    ThermalNetworkModel::new(
        Capacities {
            c_in: 2.0e6,
            c_out: 1.0e7,
        },
        Resistances {
            r_exch: 0.01,
            r_floor: 0.02,
            r_vent: 0.05,
            r_cond: 0.01,
        },
        10.0,
    )
    .unwrap()
}

fn winter() -> WeatherForcing {
    WeatherForcing {
        air_temp: 280.0,
        soil_temp: 285.0,
        solar_irradiance: 0.0,
    }
}

#[test]
fn equilibrium_then_step_stays_at_setpoint() {
    let house = house();
    let eq = house.initialize(293.15, 3000.0, &winter()).unwrap();

    assert!(eq.required_heat_to_house >= 0.0);
    assert!(eq.required_heat_to_house <= 3000.0);
    assert!((eq.state.indoor() - 293.15).abs() < EQUILIBRIUM_TOL);

    let next = house
        .step(&eq.state, DT, &winter(), eq.required_heat_to_house)
        .unwrap();
    // Derivative vanishes at equilibrium: only round-off remains
    assert!((next.indoor() - eq.state.indoor()).abs() < 1e-6);
    assert!((next.envelope() - eq.state.envelope()).abs() < 1e-6);
}

#[test]
fn capacity_limited_house_settles_below_target() {
    let house = house();
    let eq = house.initialize(293.15, 1000.0, &winter()).unwrap();

    assert!(eq.required_heat_to_house > 1000.0);
    assert_eq!(eq.heat_to_house, 1000.0);
    assert!(eq.is_clamped());
    assert!(eq.state.indoor() < 293.15);
}

#[test]
fn fixed_point_when_ambient_equals_target() {
    let house = house();
    let forcing = WeatherForcing {
        air_temp: 293.15,
        soil_temp: 293.15,
        solar_irradiance: 0.0,
    };
    let eq = house.initialize(293.15, 3000.0, &forcing).unwrap();
    assert!(eq.required_heat_to_house.abs() < 1e-6);
    assert!(eq.heat_to_house.abs() < 1e-6);
    assert!((eq.state.indoor() - 293.15).abs() < EQUILIBRIUM_TOL);
    assert!((eq.state.envelope() - 293.15).abs() < EQUILIBRIUM_TOL);
}

#[test]
fn heat_off_cools_house_and_drains_nothing() {
    let house = house();
    let buffer = ThermalBufferModel::new(5.0e6).unwrap();

    let eq = house.initialize(293.15, 3000.0, &winter()).unwrap();
    let mut h = eq.state;
    let mut b = buffer.initialize(323.15).unwrap();

    for _ in 0..8 {
        let prev = h.indoor();
        h = house.step(&h, DT, &winter(), 0.0).unwrap();
        b = buffer.step(&b, DT, 0.0, 0.0).unwrap();
        assert!(h.indoor() < prev);
    }
    assert_eq!(b.temperature, 323.15);
    // still well above ambient after two hours
    assert!(h.indoor() > 285.0);
}

#[test]
fn guarded_interval_with_buffer_supplying_house() {
    let house = house();
    let buffer = ThermalBufferModel::new(5.0e6).unwrap();
    let guard = BoundaryGuard::new(
        AssetId::from("f9502a6a-982b-4df9-98b4-c2c6345267ac"),
        OperatingBounds {
            buffer_min: 303.15,
            buffer_max: 353.15,
            house_min: 288.15,
        },
    )
    .unwrap();

    let eq = house.initialize(293.15, 3000.0, &winter()).unwrap();
    let b0 = buffer.initialize(323.15).unwrap();

    let h1 = house.step(&eq.state, DT, &winter(), eq.heat_to_house).unwrap();
    let b1 = buffer.step(&b0, DT, eq.heat_to_house, 0.0).unwrap();
    let out = guard.apply(b1, h1).unwrap();

    assert!(out.snapped.is_empty());
    let drop = eq.heat_to_house * DT / 5.0e6;
    assert!((out.buffer.temperature - (323.15 - drop)).abs() < 1e-9);
}

#[test]
fn house_below_minimum_after_step_is_domain_violation() {
    let house = house();
    let buffer = ThermalBufferModel::new(5.0e6).unwrap();
    // Minimum above what the house can hold with the heating switched off
    let guard = BoundaryGuard::new(
        AssetId::from("hp-cold"),
        OperatingBounds {
            buffer_min: 303.15,
            buffer_max: 353.15,
            house_min: 293.0,
        },
    )
    .unwrap();

    let eq = house.initialize(293.15, 3000.0, &winter()).unwrap();
    let mut h = eq.state;
    let b = BufferState { temperature: 323.15 };

    let mut failure = None;
    for _ in 0..20 {
        h = house.step(&h, DT, &winter(), 0.0).unwrap();
        let b = buffer.step(&b, DT, 0.0, 0.0).unwrap();
        if let Err(e) = guard.apply(b, h) {
            failure = Some(e);
            break;
        }
    }

    match failure {
        Some(ThermalError::DomainViolation { bound, .. }) => {
            assert_eq!(bound.as_str(), "house_temp_min");
        }
        other => panic!("expected house domain violation, got {other:?}"),
    }
}
