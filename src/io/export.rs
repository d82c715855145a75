//! CSV export for dispatch results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::dispatch::types::DispatchResult;

/// Column header for CSV dispatch export.
pub const HEADER: &str = "hour,demand,grid_power,storage_power,regime,soc";

/// Exports a dispatch result to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. `soc` is the
/// state-of-charge trace aligned with the result; steps without a value
/// get an empty `soc` cell. Produces deterministic output for identical
/// inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &DispatchResult, soc: &[f64], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, soc, buf)?;
    info!(path = %path.display(), rows = result.len(), "wrote dispatch CSV");
    Ok(())
}

/// Writes a dispatch result as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &DispatchResult, soc: &[f64], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for (i, s) in result.iter().enumerate() {
        wtr.write_record(&[
            s.hour.to_string(),
            format!("{:.4}", s.demand),
            format!("{:.4}", s.grid_power),
            format!("{:.4}", s.storage_power),
            s.regime.to_string(),
            soc.get(i).map(|v| format!("{v:.4}")).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
