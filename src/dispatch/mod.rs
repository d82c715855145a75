pub mod allocator;
/// Post-hoc dispatch metrics.
pub mod summary;
pub mod types;

pub use allocator::{allocate, allocate_bounded, dispatch_step};
