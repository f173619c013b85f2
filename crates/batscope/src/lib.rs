//! Command-line front end for batscope
//!
//! Finds OMNeT++ result files, analyzes each run with `batscope_core`,
//! prints a console summary and optionally exports JSON.

// ============================================================================
// Modules
// ============================================================================

pub mod discovery;
pub mod export;
pub mod logging;
pub mod report;
pub mod settings;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use discovery::{DiscoveredRun, discover_runs};
pub use export::export_run;
pub use logging::init_logging;
pub use report::{Report, RunSummary, format_report, format_run};
pub use settings::{check_max_distance, load_settings};
