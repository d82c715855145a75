use std::path::PathBuf;

use clap::Parser;

/// Peak-shaving dispatch for a battery energy storage system.
///
/// If neither --scenario nor --preset is given, the reference preset is used.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Load scenario from a TOML config file.
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (reference, evening_peak, night_charge).
    #[arg(long)]
    pub preset: Option<String>,

    /// Read demand from a CSV file (`hour,demand`) instead of the scenario's source.
    #[arg(long)]
    pub demand: Option<PathBuf>,

    /// Export step results to CSV.
    #[arg(long)]
    pub telemetry_out: Option<PathBuf>,

    /// Start the REST API server after the run.
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}
