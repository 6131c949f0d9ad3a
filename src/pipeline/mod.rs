//! Pipeline entry points.
//!
//! - `run_sweep`: crawl the portal, search the gazette and persist history

pub mod sweep;

pub use sweep::{Sweep, SweepReport, SweepState, run_sweep};
