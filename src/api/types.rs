//! API request, response, and query types.
//!
//! Step field names match the CSV export columns.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dispatch::summary::DispatchSummary;
use crate::dispatch::types::{DemandSeries, DispatchConfig, DispatchStep, Regime};

/// One dispatch step with its state-of-charge annotation.
#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub hour: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub demand: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub grid_power: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub storage_power: Decimal,
    pub regime: Regime,
    /// Absent when no trace value exists for this step.
    pub soc: Option<f64>,
}

impl StepRecord {
    pub fn new(step: &DispatchStep, soc: Option<f64>) -> Self {
        Self {
            hour: step.hour,
            demand: step.demand,
            grid_power: step.grid_power,
            storage_power: step.storage_power,
            regime: step.regime,
            soc,
        }
    }
}

/// Dispatch parameters and aggregate figures.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub config: DispatchConfig,
    pub summary: DispatchSummary,
}

/// Optional hour range for the dispatch endpoint.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// First hour (inclusive).
    pub from: Option<usize>,
    /// Last hour (inclusive).
    pub to: Option<usize>,
}

/// Body of `POST /allocate`.
///
/// `config` falls back to the server's run configuration when omitted.
#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    pub demand: DemandSeries,
    #[serde(default)]
    pub config: Option<DispatchConfig>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_request_parses_without_config() {
        let body = r#"{"demand":[{"hour":19,"demand":250.0}]}"#;
        let req: AllocateRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.demand.len(), 1);
        assert!(req.config.is_none());
    }

    #[test]
    fn allocate_request_parses_nested_windows() {
        let body = r#"{
            "demand": [{"hour": 2, "demand": 80.0}],
            "config": {
                "peak_window": {"start": 17, "end": 20},
                "charge_window": {"start": 0, "end": 3},
                "peak_power_limit": 100.0,
                "charge_power": -20.0
            }
        }"#;
        let req: AllocateRequest = serde_json::from_str(body).unwrap();
        let cfg = req.config.unwrap();
        assert_eq!(cfg.peak_window.start, 17);
        assert_eq!(cfg.charge_power, Decimal::from(-20));
    }

    #[test]
    fn step_record_serializes_regime_lowercase() {
        let step = DispatchStep {
            hour: 19,
            demand: Decimal::from(250),
            grid_power: Decimal::from(100),
            storage_power: Decimal::from(150),
            regime: Regime::Discharge,
        };
        let json = serde_json::to_value(StepRecord::new(&step, Some(0.4))).unwrap();
        assert_eq!(json["regime"], "discharge");
        assert_eq!(json["soc"], 0.4);
    }
}
