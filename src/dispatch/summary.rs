//! Aggregate metrics derived from a dispatch result.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{DispatchResult, Regime, power_to_f64};

/// Spot price curve (per MWh) matching the reference demand day.
const REFERENCE_PRICES: [f64; 24] = [
    120.0, 110.0, 105.0, 100.0, 115.0, 150.0, 200.0, 250.0, 280.0, 300.0, 290.0, 270.0, 260.0,
    250.0, 280.0, 350.0, 450.0, 550.0, 600.0, 500.0, 400.0, 300.0, 200.0, 150.0,
];

/// Hourly spot prices for the reference day, indexed by hour.
pub fn reference_prices() -> &'static [f64] {
    &REFERENCE_PRICES
}

/// Key figures for one allocation run.
///
/// Computed post-hoc from the result so that step data and reported metrics
/// cannot disagree. Each step counts as one hour when converting power to
/// energy.
///
/// Energy totals follow the sign of storage power, not the regime: a peak
/// step with negative demand absorbs power and counts as charged energy,
/// while still counting as a discharge step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    /// Highest demand in the series.
    #[serde(with = "rust_decimal::serde::float")]
    pub peak_demand: Decimal,
    /// Highest grid draw after allocation.
    #[serde(with = "rust_decimal::serde::float")]
    pub peak_grid: Decimal,
    /// `peak_demand - peak_grid`; negative when charging sets a new peak.
    #[serde(with = "rust_decimal::serde::float")]
    pub peak_reduction: Decimal,
    /// Sum of positive storage power, whatever the regime.
    #[serde(with = "rust_decimal::serde::float")]
    pub energy_discharged: Decimal,
    /// Sum of |negative storage power|, whatever the regime.
    #[serde(with = "rust_decimal::serde::float")]
    pub energy_charged: Decimal,
    /// Steps in the peak window.
    pub discharge_steps: usize,
    /// Steps in the charge window.
    pub charge_steps: usize,
    pub idle_steps: usize,
}

impl DispatchSummary {
    /// Computes all figures from a complete result. An empty result yields
    /// all zeros.
    pub fn from_result(result: &DispatchResult) -> Self {
        let peak_demand = result.iter().map(|s| s.demand).max().unwrap_or_default();
        let peak_grid = result
            .iter()
            .map(|s| s.grid_power)
            .max()
            .unwrap_or_default();

        let mut discharged = Decimal::ZERO;
        let mut charged = Decimal::ZERO;
        let (mut n_discharge, mut n_charge, mut n_idle) = (0, 0, 0);

        for s in result {
            if s.storage_power > Decimal::ZERO {
                discharged += s.storage_power;
            } else {
                charged -= s.storage_power;
            }

            match s.regime {
                Regime::Discharge => n_discharge += 1,
                Regime::Charge => n_charge += 1,
                Regime::Idle => n_idle += 1,
            }
        }

        Self {
            peak_demand,
            peak_grid,
            peak_reduction: peak_demand - peak_grid,
            energy_discharged: discharged,
            energy_charged: charged,
            discharge_steps: n_discharge,
            charge_steps: n_charge,
            idle_steps: n_idle,
        }
    }
}

impl fmt::Display for DispatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dispatch Summary ---")?;
        writeln!(f, "Peak demand:        {:.2}", self.peak_demand)?;
        writeln!(f, "Peak grid import:   {:.2}", self.peak_grid)?;
        writeln!(f, "Peak reduction:     {:.2}", self.peak_reduction)?;
        writeln!(f, "Energy discharged:  {:.2}", self.energy_discharged)?;
        writeln!(f, "Energy charged:     {:.2}", self.energy_charged)?;
        write!(
            f,
            "Steps (dis/chg/idle): {}/{}/{}",
            self.discharge_steps, self.charge_steps, self.idle_steps
        )
    }
}

/// Value of the storage schedule against an hourly price curve.
///
/// Sums `storage_power * price` over steps whose hour has a price: discharge
/// earns, charging costs. Steps beyond the end of `prices` are skipped.
pub fn arbitrage_value(result: &DispatchResult, prices: &[f64]) -> f64 {
    result
        .iter()
        .filter_map(|s| prices.get(s.hour).map(|p| power_to_f64(s.storage_power) * p))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::allocate;
    use crate::dispatch::types::{DemandPoint, DemandSeries, DispatchConfig, power_from_f64};

    fn kw(value: f64) -> Decimal {
        power_from_f64(value).unwrap()
    }

    fn point(hour: usize, demand: f64) -> DemandPoint {
        DemandPoint::new(hour, kw(demand))
    }

    fn run(points: Vec<DemandPoint>) -> DispatchResult {
        allocate(&DemandSeries::new(points), &DispatchConfig::REFERENCE).unwrap()
    }

    #[test]
    fn peak_reduction_and_energy() {
        // discharge 150 of 250 at h19, charge 50 at h2, idle at h10
        let result = run(vec![point(2, 80.0), point(10, 100.0), point(19, 250.0)]);
        let s = DispatchSummary::from_result(&result);
        assert_eq!(s.peak_demand, kw(250.0));
        assert_eq!(s.peak_grid, kw(130.0));
        assert_eq!(s.peak_reduction, kw(120.0));
        assert_eq!(s.energy_discharged, kw(150.0));
        assert_eq!(s.energy_charged, kw(50.0));
        assert_eq!((s.discharge_steps, s.charge_steps, s.idle_steps), (1, 1, 1));
    }

    #[test]
    fn negative_peak_demand_counts_as_charged_energy() {
        // h20 is in the peak window: storage follows demand to -30
        let result = run(vec![point(20, -30.0), point(19, 100.0)]);
        let s = DispatchSummary::from_result(&result);
        assert_eq!(s.discharge_steps, 2);
        assert_eq!(s.energy_discharged, kw(100.0));
        assert_eq!(s.energy_charged, kw(30.0));
    }

    #[test]
    fn fractional_energy_sums_exactly() {
        let result = run(vec![point(0, 80.3), point(1, 0.1), point(18, 0.1), point(19, 0.2)]);
        let s = DispatchSummary::from_result(&result);
        assert_eq!(s.energy_discharged, kw(0.3));
        assert_eq!(s.energy_charged, kw(100.0));
        assert_eq!(s.peak_grid, kw(130.3));
    }

    #[test]
    fn empty_result_is_zeroed() {
        let s = DispatchSummary::from_result(&DispatchResult::default());
        assert_eq!(s.peak_grid, Decimal::ZERO);
        assert_eq!(s.energy_charged, Decimal::ZERO);
        assert_eq!(s.idle_steps, 0);
    }

    #[test]
    fn arbitrage_uses_hour_as_price_index() {
        let result = run(vec![point(2, 80.0), point(19, 100.0)]);
        // -50 * 105 + 100 * 500
        let value = arbitrage_value(&result, reference_prices());
        assert_eq!(value, -5250.0 + 50000.0);
    }

    #[test]
    fn arbitrage_skips_unpriced_hours() {
        let result = run(vec![point(19, 100.0)]);
        assert_eq!(arbitrage_value(&result, &[1.0; 5]), 0.0);
    }
}
