//! Per-regime guarantees of the allocator over whole series.

mod common;

use bess_dispatch::dispatch::allocate;
use bess_dispatch::dispatch::types::{DemandSeries, DispatchConfig, Regime};
use bess_dispatch::error::{DispatchError, InputError};
use rust_decimal::Decimal;

use common::kw;

fn configs() -> Vec<DispatchConfig> {
    vec![
        common::reference_config(),
        common::shifted_config(),
        common::config_with_limit(0.0),
        common::config_with_charge(-0.2),
        common::fractional_config(),
    ]
}

#[test]
fn every_step_follows_its_window_formula() {
    for config in configs() {
        for series in common::demand_fixtures() {
            let result = allocate(&series, &config).expect("fixtures are valid");
            assert_eq!(result.len(), series.len());

            for (point, step) in series.iter().zip(result.iter()) {
                assert_eq!(step.hour, point.hour, "order must follow input");
                let d = point.demand;

                if config.peak_window.contains(point.hour) {
                    assert_eq!(step.regime, Regime::Discharge);
                    assert_eq!(step.storage_power, d.min(config.peak_power_limit));
                    if d >= Decimal::ZERO {
                        assert!(step.storage_power >= Decimal::ZERO);
                        assert!(step.grid_power >= Decimal::ZERO);
                    }
                } else if config.charge_window.contains(point.hour) {
                    assert_eq!(step.regime, Regime::Charge);
                    assert_eq!(step.storage_power, config.charge_power);
                    assert_eq!(step.grid_power, d - config.charge_power);
                } else {
                    assert_eq!(step.regime, Regime::Idle);
                    assert_eq!(step.storage_power, Decimal::ZERO);
                    assert_eq!(step.grid_power, d);
                }
            }
        }
    }
}

#[test]
fn grid_plus_storage_equals_demand_exactly() {
    for config in configs() {
        for series in common::demand_fixtures() {
            let result = allocate(&series, &config).unwrap();
            for step in &result {
                assert_eq!(
                    step.grid_power + step.storage_power,
                    step.demand,
                    "balance violated at h={}",
                    step.hour
                );
            }
        }
    }
}

#[test]
fn fractional_charge_step_balances() {
    let result = allocate(&common::single(2, 0.1), &common::config_with_charge(-0.2)).unwrap();
    let step = result.steps()[0];
    assert_eq!(step.storage_power, kw(-0.2));
    assert_eq!(step.grid_power, kw(0.3));
    assert_eq!(step.grid_power + step.storage_power, kw(0.1));

    let result = allocate(&common::single(3, 80.3), &common::fractional_config()).unwrap();
    let step = result.steps()[0];
    assert_eq!(step.grid_power, kw(130.4));
    assert_eq!(step.grid_power + step.storage_power, kw(80.3));
}

#[test]
fn allocation_is_idempotent() {
    for series in common::demand_fixtures() {
        let a = allocate(&series, &common::reference_config()).unwrap();
        let b = allocate(&series, &common::reference_config()).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn scenario_table() {
    // (hour, demand, storage, grid)
    let cases = [
        (19, 100.0, 100.0, 0.0),
        (19, 250.0, 150.0, 100.0),
        (2, 80.0, -50.0, 130.0),
        (10, 100.0, 0.0, 100.0),
    ];
    for (hour, demand, storage, grid) in cases {
        let result = allocate(&common::single(hour, demand), &common::reference_config()).unwrap();
        assert_eq!(result.len(), 1);
        let step = result.steps()[0];
        assert_eq!(step.storage_power, kw(storage), "storage at h={hour} d={demand}");
        assert_eq!(step.grid_power, kw(grid), "grid at h={hour} d={demand}");
    }
}

#[test]
fn negative_cap_fails_with_config_error() {
    let err = allocate(&common::single(19, 100.0), &common::config_with_limit(-10.0)).unwrap_err();
    assert!(matches!(err, DispatchError::Config(_)), "{err}");
}

#[test]
fn nan_demand_fails_with_input_error() {
    let err = DemandSeries::from_hourly(&[10.0, 20.0, f64::NAN]).unwrap_err();
    assert!(matches!(err, InputError::NonFinite { time_index: 2, .. }));
}

#[test]
fn supply_only_view_clips_without_touching_result() {
    let series = bess_dispatch::demand::reference_demand();
    let result = allocate(&series, &common::reference_config()).unwrap();
    let before = result.clone();

    let supply = result.supply_only_storage();
    assert_eq!(supply.len(), result.len());
    assert!(supply.iter().all(|&v| v >= Decimal::ZERO));
    assert_eq!(supply[2], Decimal::ZERO);
    assert_eq!(supply[19], kw(150.0));

    assert_eq!(result, before);
    assert_eq!(result.steps()[2].storage_power, kw(-50.0));
}
