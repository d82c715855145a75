//! Dispatch runner entry point: CLI wiring and scenario-driven allocation.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bess_dispatch::config::ScenarioConfig;
use bess_dispatch::dispatch::summary::{arbitrage_value, reference_prices};
use bess_dispatch::io::export::export_csv;
use bess_dispatch::runner::{ensure_valid, run_scenario};

use crate::cli::Args;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // --scenario takes priority, then --preset, then the reference default
    let mut scenario = if let Some(path) = &args.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(name) = &args.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::reference()
    };
    if let Some(path) = &args.demand {
        scenario = scenario.with_demand_csv(path.clone());
    }

    ensure_valid(&scenario).context("invalid scenario")?;

    let run = run_scenario(&scenario)?;

    for step in &run.result {
        println!("{step}");
    }
    println!("\n{}", run.summary);
    println!(
        "Arbitrage value:    {:.2}",
        arbitrage_value(&run.result, reference_prices())
    );

    if let Some(path) = &args.telemetry_out {
        export_csv(&run.result, &run.soc, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(bess_dispatch::api::AppState::from_run(
            run,
            scenario.dispatch.max_steps,
        ));
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(bess_dispatch::api::serve(state, addr))?;
    }

    info!("done");
    Ok(())
}
