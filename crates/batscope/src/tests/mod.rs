//! End-to-end tests over result directories
//!
//! Tests are organized by topic:
//! - `results_dir` - Discovery, analysis, report and export of a results directory
