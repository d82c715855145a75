//! Scenario orchestration: demand source, allocation, and annotations.

use tracing::{info, warn};

use crate::config::ScenarioConfig;
use crate::dispatch::summary::DispatchSummary;
use crate::dispatch::types::{DemandSeries, DispatchConfig, DispatchResult};
use crate::dispatch::{allocate, allocate_bounded};
use crate::error::{ConfigError, LoadError};

/// Outcome of running one scenario end to end.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub config: DispatchConfig,
    pub demand: DemandSeries,
    pub result: DispatchResult,
    /// State of charge after each step, aligned with `result`.
    pub soc: Vec<f64>,
    pub summary: DispatchSummary,
}

/// Runs a scenario with the demand selected by its `[demand]` section.
///
/// # Errors
///
/// Returns a `LoadError` if the scenario is invalid, the demand source fails
/// to load, or allocation rejects the inputs.
pub fn run_scenario(scenario: &ScenarioConfig) -> Result<RunOutput, LoadError> {
    let demand = scenario.load_demand()?;
    run_with_demand(scenario, demand)
}

/// Runs a scenario against an explicit demand series.
///
/// # Errors
///
/// See [`run_scenario`].
pub fn run_with_demand(
    scenario: &ScenarioConfig,
    demand: DemandSeries,
) -> Result<RunOutput, LoadError> {
    let config = scenario.dispatch_config()?;
    let result = match scenario.dispatch.max_steps {
        Some(max) => allocate_bounded(&demand, &config, max),
        None => allocate(&demand, &config),
    }?;

    let storage = &scenario.storage;
    let soc = scenario
        .soc_model()?
        .trace(storage.initial_soc, &result, storage.duration_hours)?;
    if let Some(low) = soc.iter().copied().reduce(f64::min) {
        if low <= 0.0 {
            warn!("state of charge reaches empty; storage capacity may be undersized");
        }
    }

    let summary = DispatchSummary::from_result(&result);
    info!(
        steps = result.len(),
        peak_reduction = %summary.peak_reduction,
        "dispatch complete"
    );

    Ok(RunOutput {
        config,
        demand,
        result,
        soc,
        summary,
    })
}

/// Rejects a scenario whose validation produced errors.
///
/// # Errors
///
/// Returns the first error; every error is logged.
pub fn ensure_valid(scenario: &ScenarioConfig) -> Result<(), ConfigError> {
    let mut errors = scenario.validate();
    for e in &errors {
        warn!("{e}");
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.swap_remove(0))
    }
}
