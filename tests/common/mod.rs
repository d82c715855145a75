//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use bess_dispatch::demand::reference_demand;
use bess_dispatch::dispatch::types::{
    DemandPoint, DemandSeries, DispatchConfig, DispatchWindow, power_from_f64,
};
use rust_decimal::Decimal;

/// Exact decimal for a float literal.
pub fn kw(value: f64) -> Decimal {
    power_from_f64(value).expect("finite literal")
}

/// Reference parameters: peak 18-21 capped at 150, charge 0-4 at -50.
pub fn reference_config() -> DispatchConfig {
    DispatchConfig::REFERENCE
}

/// Reference config with a different discharge cap.
pub fn config_with_limit(peak_power_limit: f64) -> DispatchConfig {
    DispatchConfig {
        peak_power_limit: kw(peak_power_limit),
        ..DispatchConfig::REFERENCE
    }
}

/// Reference config with a different charge power.
pub fn config_with_charge(charge_power: f64) -> DispatchConfig {
    DispatchConfig {
        charge_power: kw(charge_power),
        ..DispatchConfig::REFERENCE
    }
}

/// Peak 12-15, charge 22-23: windows far from the reference ones.
pub fn shifted_config() -> DispatchConfig {
    DispatchConfig {
        peak_window: DispatchWindow::new(12, 15),
        charge_window: DispatchWindow::new(22, 23),
        peak_power_limit: kw(75.0),
        charge_power: kw(-20.0),
    }
}

/// Fractional cap and charge power.
pub fn fractional_config() -> DispatchConfig {
    DispatchConfig {
        peak_power_limit: kw(80.3),
        charge_power: kw(-50.1),
        ..DispatchConfig::REFERENCE
    }
}

pub fn point(hour: usize, demand: f64) -> DemandPoint {
    DemandPoint::new(hour, kw(demand))
}

/// A one-step series.
pub fn single(hour: usize, demand: f64) -> DemandSeries {
    DemandSeries::new(vec![point(hour, demand)])
}

/// The reference day, a sparse, out-of-order, partly negative series, and a
/// series of fractional values that floats cannot hold exactly.
pub fn demand_fixtures() -> Vec<DemandSeries> {
    vec![
        reference_demand(),
        DemandSeries::new(vec![
            point(21, 500.0),
            point(3, -20.0),
            point(18, -40.0),
            point(30, 12.0),
            point(0, 0.0),
            point(13, 90.0),
        ]),
        DemandSeries::new(vec![
            point(2, 0.1),
            point(3, 80.3),
            point(1, -0.4),
            point(19, 0.7),
            point(20, 150.15),
            point(14, 33.33),
            point(23, 1e-9),
        ]),
    ]
}
