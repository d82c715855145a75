//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::demand::{SyntheticDemand, load_csv, reference_demand};
use crate::dispatch::types::{
    DemandSeries, DispatchConfig, DispatchWindow, power_from_f64, power_to_f64,
};
use crate::error::{ConfigError, LoadError};
use crate::storage::SocModel;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the reference scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::reference`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Dispatch windows and power limits.
    #[serde(default)]
    pub dispatch: DispatchSection,
    /// Where the demand series comes from.
    #[serde(default)]
    pub demand: DemandSection,
    /// Storage parameters for the state-of-charge trace.
    #[serde(default)]
    pub storage: StorageSection,
}

/// Dispatch windows (inclusive hour bounds) and power limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchSection {
    pub peak_start: usize,
    pub peak_end: usize,
    pub charge_start: usize,
    pub charge_end: usize,
    /// Discharge cap during the peak window (>= 0).
    pub peak_power_limit: f64,
    /// Storage power while charging (<= 0).
    pub charge_power: f64,
    /// Optional upper bound on the number of demand steps.
    pub max_steps: Option<usize>,
}

impl Default for DispatchSection {
    fn default() -> Self {
        let r = DispatchConfig::REFERENCE;
        Self {
            peak_start: r.peak_window.start,
            peak_end: r.peak_window.end,
            charge_start: r.charge_window.start,
            charge_end: r.charge_window.end,
            peak_power_limit: power_to_f64(r.peak_power_limit),
            charge_power: power_to_f64(r.charge_power),
            max_steps: None,
        }
    }
}

/// Demand source selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandSection {
    /// `"reference"`, `"csv"`, or `"synthetic"`.
    pub source: String,
    /// CSV file path (required for `"csv"`).
    pub path: Option<PathBuf>,
    /// Number of synthetic steps to generate.
    pub steps: usize,
    /// Synthetic mean demand.
    pub base: f64,
    /// Synthetic daily amplitude.
    pub amplitude: f64,
    /// Synthetic phase offset (radians).
    pub phase_rad: f64,
    /// Synthetic noise standard deviation.
    pub noise_std: f64,
    /// Synthetic noise seed.
    pub seed: u64,
}

impl Default for DemandSection {
    fn default() -> Self {
        Self {
            source: "reference".to_string(),
            path: None,
            steps: 24,
            base: 150.0,
            amplitude: 60.0,
            phase_rad: -3.4,
            noise_std: 0.0,
            seed: 42,
        }
    }
}

/// Storage parameters for the state-of-charge annotation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    /// Usable energy capacity.
    pub capacity: f64,
    /// Initial state of charge (0.0-1.0).
    pub initial_soc: f64,
    /// One-way efficiency (0.0-1.0].
    pub efficiency: f64,
    /// Duration of one step in hours.
    pub duration_hours: f64,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            capacity: 1000.0,
            initial_soc: 0.5,
            efficiency: 0.9,
            duration_hours: 1.0,
        }
    }
}

impl ScenarioConfig {
    /// Peak 18-21 capped at 150, charge 0-4 at -50, reference demand day.
    pub fn reference() -> Self {
        Self::default()
    }

    /// Wider evening peak with a higher discharge cap.
    pub fn evening_peak() -> Self {
        Self {
            dispatch: DispatchSection {
                peak_start: 16,
                peak_end: 22,
                peak_power_limit: 200.0,
                ..DispatchSection::default()
            },
            storage: StorageSection {
                capacity: 3000.0,
                ..StorageSection::default()
            },
            ..Self::default()
        }
    }

    /// Longer night charge window with a stronger charge rate.
    pub fn night_charge() -> Self {
        Self {
            dispatch: DispatchSection {
                charge_start: 0,
                charge_end: 6,
                charge_power: -80.0,
                ..DispatchSection::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference", "evening_peak", "night_charge"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::reference()),
            "evening_peak" => Ok(Self::evening_peak()),
            "night_charge" => Ok(Self::night_charge()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// A relative `demand.path` is resolved against the scenario file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let (Some(csv), Some(dir)) = (cfg.demand.path.as_mut(), path.parent()) {
            if csv.is_relative() {
                *csv = dir.join(&*csv);
            }
        }
        info!(path = %path.display(), "loaded scenario");
        Ok(cfg)
    }

    /// Replaces the `[demand]` section with the given CSV file.
    ///
    /// Used for the `--demand` override, so that validation sees the demand
    /// source that will actually be loaded.
    pub fn with_demand_csv(mut self, path: PathBuf) -> Self {
        self.demand = DemandSection {
            source: "csv".to_string(),
            path: Some(path),
            ..DemandSection::default()
        };
        self
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `LoadError::Toml` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(s)?)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let d = &self.dispatch;
        let peak_inverted = d.peak_start > d.peak_end;
        let charge_inverted = d.charge_start > d.charge_end;
        if peak_inverted {
            errors.push(ConfigError::new(
                "dispatch.peak_start",
                "must be <= dispatch.peak_end",
            ));
        }
        if charge_inverted {
            errors.push(ConfigError::new(
                "dispatch.charge_start",
                "must be <= dispatch.charge_end",
            ));
        }
        if !peak_inverted && !charge_inverted {
            let peak = DispatchWindow::new(d.peak_start, d.peak_end);
            let charge = DispatchWindow::new(d.charge_start, d.charge_end);
            if peak.overlaps(&charge) {
                errors.push(ConfigError::new(
                    "dispatch.charge_window",
                    format!("overlaps the peak window ({peak})"),
                ));
            }
        }
        if !d.peak_power_limit.is_finite() || d.peak_power_limit < 0.0 {
            errors.push(ConfigError::new(
                "dispatch.peak_power_limit",
                "must be a finite value >= 0",
            ));
        }
        if !d.charge_power.is_finite() || d.charge_power > 0.0 {
            errors.push(ConfigError::new(
                "dispatch.charge_power",
                "must be a finite value <= 0",
            ));
        }
        if d.max_steps == Some(0) {
            errors.push(ConfigError::new("dispatch.max_steps", "must be > 0"));
        }

        let dem = &self.demand;
        match dem.source.as_str() {
            "reference" => {}
            "csv" => {
                if dem.path.is_none() {
                    errors.push(ConfigError::new(
                        "demand.path",
                        "required when demand.source = \"csv\"",
                    ));
                }
            }
            "synthetic" => {
                if dem.steps == 0 {
                    errors.push(ConfigError::new("demand.steps", "must be > 0"));
                }
                for (field, value) in [
                    ("demand.base", dem.base),
                    ("demand.amplitude", dem.amplitude),
                    ("demand.phase_rad", dem.phase_rad),
                ] {
                    if !value.is_finite() {
                        errors.push(ConfigError::new(field, "must be finite"));
                    }
                }
                if !(dem.noise_std.is_finite() && dem.noise_std >= 0.0) {
                    errors.push(ConfigError::new(
                        "demand.noise_std",
                        "must be a finite value >= 0",
                    ));
                }
            }
            other => errors.push(ConfigError::new(
                "demand.source",
                format!("must be \"reference\", \"csv\" or \"synthetic\", got \"{other}\""),
            )),
        }

        let s = &self.storage;
        if let Err(e) = SocModel::new(s.capacity, s.efficiency) {
            errors.push(e);
        }
        if !(0.0..=1.0).contains(&s.initial_soc) {
            errors.push(ConfigError::new("storage.initial_soc", "must be in [0.0, 1.0]"));
        }
        if !(s.duration_hours.is_finite() && s.duration_hours > 0.0) {
            errors.push(ConfigError::new(
                "storage.duration_hours",
                "must be a finite value > 0",
            ));
        }

        errors
    }

    /// Allocation parameters for this scenario, with powers converted to
    /// exact decimals.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found in the dispatch section.
    pub fn dispatch_config(&self) -> Result<DispatchConfig, ConfigError> {
        let d = &self.dispatch;
        let power = |field: &str, value: f64| {
            power_from_f64(value).ok_or_else(|| {
                ConfigError::new(format!("dispatch.{field}"), format!("must be finite, got {value}"))
            })
        };
        let cfg = DispatchConfig {
            peak_window: DispatchWindow::new(d.peak_start, d.peak_end),
            charge_window: DispatchWindow::new(d.charge_start, d.charge_end),
            peak_power_limit: power("peak_power_limit", d.peak_power_limit)?,
            charge_power: power("charge_power", d.charge_power)?,
        };
        cfg.validate().map_err(|e| ConfigError {
            field: format!("dispatch.{}", e.field),
            message: e.message,
        })?;
        Ok(cfg)
    }

    /// State-of-charge model for this scenario.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for non-positive capacity or out-of-range
    /// efficiency.
    pub fn soc_model(&self) -> Result<SocModel, ConfigError> {
        SocModel::new(self.storage.capacity, self.storage.efficiency)
    }

    /// Produces the demand series selected by the `[demand]` section.
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` for an unknown source, a missing CSV path, or a
    /// CSV file that fails to load.
    pub fn load_demand(&self) -> Result<DemandSeries, LoadError> {
        let dem = &self.demand;
        debug!(source = %dem.source, "resolving demand source");
        match dem.source.as_str() {
            "reference" => Ok(reference_demand()),
            "csv" => {
                let path = dem.path.as_deref().ok_or_else(|| {
                    ConfigError::new("demand.path", "required when demand.source = \"csv\"")
                })?;
                load_csv(path)
            }
            "synthetic" => Ok(SyntheticDemand::new(
                dem.base,
                dem.amplitude,
                dem.phase_rad,
                dem.noise_std,
                24,
                dem.seed,
            )
            .generate(dem.steps)?),
            other => Err(ConfigError::new(
                "demand.source",
                format!("unknown source \"{other}\""),
            )
            .into()),
        }
    }
}
