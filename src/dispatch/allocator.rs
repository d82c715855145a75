//! Fixed-schedule peak-shaving allocator.
//!
//! Each step is allocated independently of every other step: storage
//! discharges inside the peak window (capped), charges at a fixed rate inside
//! the charge window, and idles elsewhere. No state of charge is carried
//! between steps.

use rust_decimal::Decimal;

use super::types::{DemandPoint, DemandSeries, DispatchConfig, DispatchResult, DispatchStep, Regime};
use crate::error::{DispatchError, InputError};

/// Allocates every demand step between storage and the grid.
///
/// Configuration is validated before the series; both checks run before any
/// output is produced.
///
/// # Errors
///
/// Returns [`DispatchError::Config`] for an invalid or contradictory
/// configuration and [`DispatchError::Input`] for an empty series or a
/// repeated time index.
///
/// # Examples
///
/// ```
/// use bess_dispatch::dispatch::allocate;
/// use bess_dispatch::dispatch::types::{DemandSeries, DispatchConfig};
/// use rust_decimal::Decimal;
///
/// let mut hourly = [0.0; 20];
/// hourly[19] = 250.0;
/// let series = DemandSeries::from_hourly(&hourly).unwrap();
/// let result = allocate(&series, &DispatchConfig::REFERENCE).unwrap();
/// assert_eq!(result.steps()[19].storage_power, Decimal::from(150));
/// assert_eq!(result.steps()[19].grid_power, Decimal::from(100));
/// ```
pub fn allocate(
    series: &DemandSeries,
    config: &DispatchConfig,
) -> Result<DispatchResult, DispatchError> {
    config.validate()?;
    series.validate()?;
    Ok(allocate_unchecked(series, config))
}

/// Like [`allocate`], but rejects series longer than `max_steps`.
///
/// # Errors
///
/// Everything [`allocate`] returns, plus [`InputError::TooLong`].
pub fn allocate_bounded(
    series: &DemandSeries,
    config: &DispatchConfig,
    max_steps: usize,
) -> Result<DispatchResult, DispatchError> {
    config.validate()?;
    if series.len() > max_steps {
        return Err(InputError::TooLong {
            len: series.len(),
            max: max_steps,
        }
        .into());
    }
    series.validate()?;
    Ok(allocate_unchecked(series, config))
}

fn allocate_unchecked(series: &DemandSeries, config: &DispatchConfig) -> DispatchResult {
    DispatchResult::new(series.iter().map(|p| dispatch_step(p, config)).collect())
}

/// Allocates a single step. Assumes `config` has already been validated.
///
/// Peak-window membership is checked first; a validated config never has a
/// time index in both windows.
pub fn dispatch_step(point: &DemandPoint, config: &DispatchConfig) -> DispatchStep {
    let d = point.demand;
    let (storage_power, regime) = if config.peak_window.contains(point.hour) {
        (d.min(config.peak_power_limit), Regime::Discharge)
    } else if config.charge_window.contains(point.hour) {
        (config.charge_power, Regime::Charge)
    } else {
        (Decimal::ZERO, Regime::Idle)
    };

    DispatchStep {
        hour: point.hour,
        demand: d,
        grid_power: d - storage_power,
        storage_power,
        regime,
    }
}
