use crate::dispatch::types::{DispatchResult, power_to_f64};
use crate::error::ConfigError;

/// Lossy state-of-charge integrator.
///
/// Integrates storage power over a step duration with a single efficiency
/// factor applied on both directions. This is the textbook bookkeeping model
/// only: no resistance, temperature, or ageing effects.
///
/// # Power Convention
/// - Positive power: charging (energy into storage)
/// - Negative power: discharging
///
/// Dispatch results use the opposite sign, see [`SocModel::trace`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocModel {
    capacity: f64,
    efficiency: f64,
}

impl SocModel {
    /// Creates a model for a storage unit of `capacity` energy units.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `capacity` is not positive or `efficiency`
    /// is outside `(0, 1]`.
    pub fn new(capacity: f64, efficiency: f64) -> Result<Self, ConfigError> {
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(ConfigError::new(
                "storage.capacity",
                format!("must be > 0, got {capacity}"),
            ));
        }
        if !(efficiency > 0.0 && efficiency <= 1.0) {
            return Err(ConfigError::new(
                "storage.efficiency",
                format!("must be in (0, 1], got {efficiency}"),
            ));
        }
        Ok(Self {
            capacity,
            efficiency,
        })
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Advances `soc` by holding `power` for `duration_hours`.
    ///
    /// Charging stores `power * efficiency`; discharging draws
    /// `power / efficiency`. The result is clamped to `[0, 1]`.
    pub fn step(&self, soc: f64, power: f64, duration_hours: f64) -> f64 {
        let effective = if power > 0.0 {
            power * self.efficiency
        } else {
            power / self.efficiency
        };
        let delta = effective * duration_hours / self.capacity;
        (soc + delta).clamp(0.0, 1.0)
    }

    /// State of charge after each dispatch step, starting from `initial_soc`.
    ///
    /// Storage power is negated on the way in (dispatch discharges positive).
    /// The trace only annotates the result; allocation never reads it.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `initial_soc` is outside `[0, 1]` or
    /// `duration_hours` is not positive.
    pub fn trace(
        &self,
        initial_soc: f64,
        result: &DispatchResult,
        duration_hours: f64,
    ) -> Result<Vec<f64>, ConfigError> {
        if !(0.0..=1.0).contains(&initial_soc) {
            return Err(ConfigError::new(
                "storage.initial_soc",
                format!("must be in [0, 1], got {initial_soc}"),
            ));
        }
        if !(duration_hours.is_finite() && duration_hours > 0.0) {
            return Err(ConfigError::new(
                "storage.duration_hours",
                format!("must be > 0, got {duration_hours}"),
            ));
        }

        let mut soc = initial_soc;
        Ok(result
            .iter()
            .map(|s| {
                soc = self.step(soc, -power_to_f64(s.storage_power), duration_hours);
                soc
            })
            .collect())
    }
}
