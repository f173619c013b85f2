//! Alignment and aggregation engine.
//!
//! Two layers:
//! - `align` puts the series of a logical group on a common time axis and
//!   aggregates across entities at every axis point.
//! - `summary` derives per-run figures: initial/final fitness, improvement,
//!   obstacle counts and value distributions.
//!
//! Nothing in here fails on missing data. Empty inputs yield `None` or
//! points flagged as "no data", and the caller decides how to present them.

mod align;
mod stats;
mod summary;

pub use align::*;
pub use stats::*;
pub use summary::*;
