//! Storage state annotations computed alongside a dispatch run.

pub mod soc;
pub mod sop;

pub use soc::SocModel;
pub use sop::state_of_power;
