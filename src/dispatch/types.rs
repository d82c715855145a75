//! Dispatch data model: demand input, allocation parameters, and per-step results.

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, InputError};

/// Converts a float reading into an exact decimal power value.
///
/// Goes through the shortest decimal rendering of `value`, so `0.1` becomes
/// exactly `0.1`. Returns `None` for NaN, infinities, and magnitudes outside
/// the `Decimal` range.
pub fn power_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    value.to_string().parse().ok()
}

/// Nearest float to a decimal power value, for float-only consumers.
pub fn power_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Demand at one time index.
///
/// Powers are decimals so that `grid_power + storage_power == demand` holds
/// exactly for every step; floats are converted once on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandPoint {
    /// Time index (conventionally the hour of day).
    pub hour: usize,
    /// Demand power. Negative values are allowed and never clamped.
    #[serde(with = "rust_decimal::serde::float")]
    pub demand: Decimal,
}

impl DemandPoint {
    pub fn new(hour: usize, demand: Decimal) -> Self {
        Self { hour, demand }
    }

    /// Builds a point from a float reading.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NonFinite`] when `demand` has no decimal value.
    pub fn from_f64(hour: usize, demand: f64) -> Result<Self, InputError> {
        power_from_f64(demand)
            .map(|d| Self::new(hour, d))
            .ok_or(InputError::NonFinite {
                time_index: hour,
                value: demand,
            })
    }
}

/// Ordered demand series.
///
/// Construction is unchecked; [`DemandSeries::validate`] enforces a non-empty
/// series with unique time indices. Indices need not be contiguous.
///
/// # Examples
///
/// ```
/// use bess_dispatch::dispatch::types::DemandSeries;
///
/// let series = DemandSeries::from_hourly(&[80.0, 90.5, 120.0]).unwrap();
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.points()[2].hour, 2);
/// assert_eq!(series.points()[1].demand.to_string(), "90.5");
/// assert!(series.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandSeries {
    points: Vec<DemandPoint>,
}

impl DemandSeries {
    pub fn new(points: Vec<DemandPoint>) -> Self {
        Self { points }
    }

    /// Indexes a plain array of float readings from hour 0.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NonFinite`] for the first value that is NaN,
    /// infinite, or out of range.
    pub fn from_hourly(values: &[f64]) -> Result<Self, InputError> {
        values
            .iter()
            .enumerate()
            .map(|(hour, &demand)| DemandPoint::from_f64(hour, demand))
            .collect()
    }

    pub fn points(&self) -> &[DemandPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DemandPoint> {
        self.points.iter()
    }

    /// Checks the series invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: an empty series or a repeated
    /// time index.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.points.is_empty() {
            return Err(InputError::Empty);
        }

        let mut seen = HashSet::with_capacity(self.points.len());
        for p in &self.points {
            if !seen.insert(p.hour) {
                return Err(InputError::DuplicateIndex { time_index: p.hour });
            }
        }
        Ok(())
    }
}

impl FromIterator<DemandPoint> for DemandSeries {
    fn from_iter<I: IntoIterator<Item = DemandPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Inclusive range of time indices during which one storage behavior applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchWindow {
    /// First time index (inclusive).
    pub start: usize,
    /// Last time index (inclusive).
    pub end: usize,
}

impl DispatchWindow {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: usize) -> bool {
        self.start <= hour && hour <= self.end
    }

    /// True when the two windows share at least one time index.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for DispatchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Fixed-schedule allocation parameters.
///
/// Storage power is signed positive for discharge and negative for charge,
/// so `charge_power` is expected to be `<= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Window in which storage discharges, capped at `peak_power_limit`.
    pub peak_window: DispatchWindow,
    /// Window in which storage charges at `charge_power`.
    pub charge_window: DispatchWindow,
    /// Maximum discharge power during the peak window (>= 0).
    #[serde(with = "rust_decimal::serde::float")]
    pub peak_power_limit: Decimal,
    /// Storage power while charging (<= 0).
    #[serde(with = "rust_decimal::serde::float")]
    pub charge_power: Decimal,
}

impl DispatchConfig {
    /// Peak window 18-21, charge window 0-4, cap 150, charge -50.
    pub const REFERENCE: Self = Self {
        peak_window: DispatchWindow::new(18, 21),
        charge_window: DispatchWindow::new(0, 4),
        peak_power_limit: Decimal::from_parts(150, 0, 0, false, 0),
        charge_power: Decimal::from_parts(50, 0, 0, true, 0),
    };

    /// Checks the configuration and reports the first violated constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a negative power limit, a positive charge
    /// power, an inverted window, or peak and charge windows that share a
    /// time index.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.peak_power_limit < Decimal::ZERO {
            return Err(ConfigError::new(
                "peak_power_limit",
                format!("must be >= 0, got {}", self.peak_power_limit),
            ));
        }
        if self.charge_power > Decimal::ZERO {
            return Err(ConfigError::new(
                "charge_power",
                format!(
                    "must be <= 0 (charging is negative storage power), got {}",
                    self.charge_power
                ),
            ));
        }
        for (field, window) in [
            ("peak_window", &self.peak_window),
            ("charge_window", &self.charge_window),
        ] {
            if window.start > window.end {
                return Err(ConfigError::new(
                    field,
                    format!("start {} is after end {}", window.start, window.end),
                ));
            }
        }
        if self.peak_window.overlaps(&self.charge_window) {
            return Err(ConfigError::new(
                "charge_window",
                format!(
                    "overlaps peak_window ({} vs {})",
                    self.charge_window, self.peak_window
                ),
            ));
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Storage behavior applied at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Discharge,
    Charge,
    Idle,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Discharge => "discharge",
            Self::Charge => "charge",
            Self::Idle => "idle",
        })
    }
}

/// Allocation outcome for one time step.
///
/// `grid_power + storage_power == demand` holds exactly for every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStep {
    /// Time index copied from the input.
    pub hour: usize,
    /// Input demand.
    #[serde(with = "rust_decimal::serde::float")]
    pub demand: Decimal,
    /// Residual power drawn from the external grid.
    #[serde(with = "rust_decimal::serde::float")]
    pub grid_power: Decimal,
    /// Storage power (positive = discharge, negative = charge).
    #[serde(with = "rust_decimal::serde::float")]
    pub storage_power: Decimal,
    /// Which branch of the schedule produced this step.
    pub regime: Regime,
}

impl fmt::Display for DispatchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:02} demand={:.2} grid={:.2} storage={:.2} ({})",
            self.hour, self.demand, self.grid_power, self.storage_power, self.regime
        )
    }
}

/// One entry per input step, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispatchResult {
    steps: Vec<DispatchStep>,
}

impl DispatchResult {
    pub(crate) fn new(steps: Vec<DispatchStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[DispatchStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DispatchStep> {
        self.steps.iter()
    }

    /// Storage power with charging clipped to zero, for supply-only charts.
    ///
    /// Returns a fresh vector; the stored steps are left untouched.
    pub fn supply_only_storage(&self) -> Vec<Decimal> {
        self.steps
            .iter()
            .map(|s| s.storage_power.max(Decimal::ZERO))
            .collect()
    }
}

impl<'a> IntoIterator for &'a DispatchResult {
    type Item = &'a DispatchStep;
    type IntoIter = std::slice::Iter<'a, DispatchStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
