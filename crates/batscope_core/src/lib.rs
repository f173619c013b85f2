//! Result analysis for bat-algorithm UAV swarm simulations
//!
//! This crate reads OMNeT++ result files and turns them into swarm-level
//! figures. It supports:
//! - Scalar (`.sca`) and vector (`.vec`) files, including quoted tokens,
//!   `module`/`statistic` context lines and per-vector column layouts
//! - Tolerant parsing: malformed lines are skipped and counted, never fatal
//! - Grouping of series by metric kind and UAV index from module paths
//! - Nearest-neighbor alignment onto a common time axis with per-point
//!   mean, standard deviation, min and max
//! - Fitness improvement, obstacle and distribution summaries per run
//!
//! # Pipeline
//!
//! ```ignore
//! use batscope_core::{AnalysisConfig, RunInput, analyze_run};
//!
//! let input = RunInput {
//!     name: "General-#0".to_string(),
//!     scalar_path: Some("results/General-#0.sca".into()),
//!     vector_path: Some("results/General-#0.vec".into()),
//! };
//! let run = analyze_run(&input, &AnalysisConfig::default())?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod resolve;
pub mod series;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::AnalysisConfig;
pub use error::{ReadError, SkipReason};
pub use pipeline::{RunAccumulator, RunAnalysis, RunInput, analyze_parsed, analyze_run, analyze_runs};
pub use resolve::{KeyResolver, LogicalGroup, MetricPattern};
