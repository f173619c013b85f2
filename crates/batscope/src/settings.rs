//! YAML analysis settings
//!
//! ```yaml
//! final_fitness_metrics: [finalFitness]
//! align:
//!   max_distance: 2.5
//! vector:
//!   implicit_time: true
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::fs;
use std::path::Path;

use batscope_core::AnalysisConfig;

/// Error types for settings loading
#[derive(Debug)]
pub enum SettingsError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(msg) => write!(f, "IO error: {}", msg),
            SettingsError::Parse(msg) => write!(f, "Parse error: {}", msg),
            SettingsError::Invalid(msg) => write!(f, "Invalid setting: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Parse settings from a YAML string. Blank input yields the defaults.
pub fn settings_from_yaml(yaml: &str) -> Result<AnalysisConfig, SettingsError> {
    if yaml.trim().is_empty() {
        return Ok(AnalysisConfig::default());
    }
    let config: AnalysisConfig =
        serde_saphyr::from_str(yaml).map_err(|e| SettingsError::Parse(e.to_string()))?;
    if let Some(max) = config.align.max_distance {
        check_max_distance(max)?;
    }
    Ok(config)
}

/// Accept an alignment cutoff only when it is a finite, non-negative number of seconds
pub fn check_max_distance(value: f64) -> Result<f64, SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SettingsError::Invalid(format!(
            "max_distance must be a finite non-negative number of seconds, got {value}"
        )))
    }
}

/// Load settings from `path`
pub fn load_settings(path: &Path) -> Result<AnalysisConfig, SettingsError> {
    let content = fs::read_to_string(path)
        .map_err(|e| SettingsError::Io(format!("{}: {}", path.display(), e)))?;
    let config = settings_from_yaml(&content)?;
    tracing::debug!("loaded settings from {}", path.display());
    Ok(config)
}
