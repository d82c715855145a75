//! Fixed-schedule peak-shaving dispatch for battery energy storage.

/// REST API over a completed run (feature `api`).
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod demand;
pub mod dispatch;
pub mod error;
pub mod io;
pub mod runner;
/// State-of-charge and state-of-power annotations.
pub mod storage;
