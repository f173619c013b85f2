//! Scenario tests for the batscope analysis engine
//!
//! Tests are organized by topic:
//! - `parsing` - Whole-file parsing of scalar and vector result files
//! - `alignment` - Time axis construction and per-point aggregation
//! - `summaries` - Fitness and obstacle summaries over parsed files
//! - `data_quality` - Redeclarations, undeclared ids and disagreeing sources

mod parsing;
