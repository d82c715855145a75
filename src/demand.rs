//! Demand series sources: the built-in reference day, CSV files, and a
//! seeded synthetic profile.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::dispatch::types::{DemandPoint, DemandSeries};
use crate::error::{InputError, LoadError};

/// Sample demand for hours 0-23 with an evening peak above the reference cap.
const REFERENCE_DEMAND: [i64; 24] = [
    90, 85, 80, 78, 80, 95, 120, 150, 170, 165, 160, 155, 150, 148, 150, 160, 185, 220, 260, 280,
    250, 200, 140, 110,
];

/// The fixed 24-hour sample day used by the reference scenario.
pub fn reference_demand() -> DemandSeries {
    REFERENCE_DEMAND
        .iter()
        .enumerate()
        .map(|(hour, &demand)| DemandPoint::new(hour, Decimal::from(demand)))
        .collect()
}

/// One CSV row as read from disk, before decimal conversion.
#[derive(Debug, Deserialize)]
struct CsvRow {
    hour: usize,
    demand: f64,
}

/// Reads a demand series from CSV with header `hour,demand`.
///
/// Rows keep file order. The series is validated before returning.
///
/// # Errors
///
/// Returns `LoadError::Csv` for malformed rows and `LoadError::Input` if the
/// series is empty, holds a non-finite value, or repeats an hour.
pub fn read_csv(reader: impl Read) -> Result<DemandSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        let row = row?;
        points.push(DemandPoint::from_f64(row.hour, row.demand)?);
    }
    let series = DemandSeries::new(points);
    series.validate()?;
    Ok(series)
}

/// Loads a demand series from a CSV file. See [`read_csv`].
///
/// # Errors
///
/// Returns `LoadError::Io` if the file cannot be opened, otherwise whatever
/// [`read_csv`] returns.
pub fn load_csv(path: &Path) -> Result<DemandSeries, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let series = read_csv(file)?;
    info!(path = %path.display(), steps = series.len(), "loaded demand CSV");
    Ok(series)
}

/// Sinusoidal daily demand with optional Gaussian noise.
///
/// Deterministic for a fixed seed. Values are not clamped, so a large
/// amplitude or noise can yield negative demand.
#[derive(Debug, Clone)]
pub struct SyntheticDemand {
    /// Mean demand.
    pub base: f64,
    /// Amplitude of the daily swing.
    pub amplitude: f64,
    /// Phase offset in radians (0 = rising through the mean at hour 0).
    pub phase_rad: f64,
    /// Standard deviation of the additive noise.
    pub noise_std: f64,
    /// Steps that make up one daily cycle.
    pub steps_per_day: usize,
    rng: StdRng,
}

impl SyntheticDemand {
    pub fn new(
        base: f64,
        amplitude: f64,
        phase_rad: f64,
        noise_std: f64,
        steps_per_day: usize,
        seed: u64,
    ) -> Self {
        Self {
            base,
            amplitude,
            phase_rad,
            noise_std,
            steps_per_day: steps_per_day.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Demand at a single step. Advances the noise generator.
    pub fn demand_at(&mut self, step: usize) -> f64 {
        let day_pos = (step % self.steps_per_day) as f64 / self.steps_per_day as f64;
        let angle = 2.0 * std::f64::consts::PI * day_pos + self.phase_rad;
        self.base + self.amplitude * angle.sin() + gaussian_noise(&mut self.rng, self.noise_std)
    }

    /// Generates `steps` consecutive points starting at index 0.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NonFinite`] if a non-finite parameter produced
    /// a value with no decimal form.
    pub fn generate(&mut self, steps: usize) -> Result<DemandSeries, InputError> {
        let series = (0..steps)
            .map(|t| DemandPoint::from_f64(t, self.demand_at(t)))
            .collect::<Result<DemandSeries, _>>()?;
        debug!(steps, base = self.base, amplitude = self.amplitude, "generated synthetic demand");
        Ok(series)
    }
}

/// Box-Muller sample with mean 0 and the given standard deviation.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos() * std_dev
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::types::{power_from_f64, power_to_f64};

    fn point(hour: usize, demand: f64) -> DemandPoint {
        DemandPoint::new(hour, power_from_f64(demand).unwrap())
    }

    #[test]
    fn reference_day_covers_24_hours() {
        let series = reference_demand();
        assert_eq!(series.len(), 24);
        assert!(series.validate().is_ok());
        assert_eq!(series.points()[19].demand, Decimal::from(280));
    }

    #[test]
    fn csv_parses_in_file_order() {
        let data = "hour,demand\n19, 250\n2,80.3\n10,-5.5\n";
        let series = read_csv(data.as_bytes()).unwrap();
        assert_eq!(
            series.points(),
            &[point(19, 250.0), point(2, 80.3), point(10, -5.5)]
        );
        assert_eq!(series.points()[1].demand.to_string(), "80.3");
    }

    #[test]
    fn csv_with_nan_is_an_input_error() {
        let err = read_csv("hour,demand\n0,1\n4,NaN\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Input(InputError::NonFinite { time_index: 4, .. })
        ));
    }

    #[test]
    fn csv_with_duplicate_hour_is_rejected() {
        let data = "hour,demand\n3,1\n3,2\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Input(InputError::DuplicateIndex { time_index: 3 })
        ));
    }

    #[test]
    fn csv_with_only_header_is_empty() {
        let err = read_csv("hour,demand\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Input(InputError::Empty)));
    }

    #[test]
    fn csv_with_bad_number_is_a_csv_error() {
        let err = read_csv("hour,demand\n1,abc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("/nonexistent/demand.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn synthetic_without_noise_is_a_pure_sine() {
        let mut profile = SyntheticDemand::new(100.0, 50.0, 0.0, 0.0, 24, 1);
        let series = profile.generate(24).unwrap();
        assert_eq!(series.len(), 24);
        assert_eq!(series.points()[0].demand, Decimal::from(100));
        assert!((power_to_f64(series.points()[6].demand) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn synthetic_with_nan_base_is_rejected() {
        let mut profile = SyntheticDemand::new(f64::NAN, 50.0, 0.0, 0.0, 24, 1);
        assert!(matches!(
            profile.generate(3),
            Err(InputError::NonFinite { time_index: 0, .. })
        ));
    }

    #[test]
    fn synthetic_is_deterministic_for_seed() {
        let a = SyntheticDemand::new(100.0, 50.0, 1.2, 5.0, 24, 42).generate(48).unwrap();
        let b = SyntheticDemand::new(100.0, 50.0, 1.2, 5.0, 24, 42).generate(48).unwrap();
        assert_eq!(a, b);
    }
}
