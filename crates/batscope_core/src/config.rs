//! Analysis configuration
//!
//! Every field has a default matching the bat-algorithm simulation's
//! recorded names, so an empty settings file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::analysis::AlignOptions;
use crate::parser::VectorParseOptions;
use crate::resolve::{KeyResolver, MetricPattern};

fn default_final_fitness_metrics() -> Vec<String> {
    vec!["finalFitness".to_string(), "fitness:last".to_string()]
}

fn default_obstacles_metrics() -> Vec<String> {
    vec![
        "obstaclesAvoided".to_string(),
        "obstaclesAvoided:last".to_string(),
    ]
}

fn default_personal_best_metric() -> String {
    "personalBestFitness".to_string()
}

fn default_agreement_tolerance() -> f64 {
    1e-6
}

/// How a run's result files are interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Metric kind patterns in priority order (first match wins)
    #[serde(default = "MetricPattern::defaults")]
    pub metric_patterns: Vec<MetricPattern>,

    /// Scalar names holding the end-of-run fitness, first present wins
    #[serde(default = "default_final_fitness_metrics")]
    pub final_fitness_metrics: Vec<String>,

    /// Scalar names holding the obstacles-avoided count, first present wins
    #[serde(default = "default_obstacles_metrics")]
    pub obstacles_metrics: Vec<String>,

    #[serde(default = "default_personal_best_metric")]
    pub personal_best_metric: String,

    /// Relative tolerance when comparing last vector samples against
    /// end-of-run scalars
    #[serde(default = "default_agreement_tolerance")]
    pub agreement_tolerance: f64,

    #[serde(default)]
    pub align: AlignOptions,

    #[serde(default)]
    pub vector: VectorParseOptions,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            metric_patterns: MetricPattern::defaults(),
            final_fitness_metrics: default_final_fitness_metrics(),
            obstacles_metrics: default_obstacles_metrics(),
            personal_best_metric: default_personal_best_metric(),
            agreement_tolerance: default_agreement_tolerance(),
            align: AlignOptions::default(),
            vector: VectorParseOptions::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a variant with a different alignment cutoff
    #[must_use]
    pub fn with_max_distance(&self, max_distance: Option<f64>) -> Self {
        let mut config = self.clone();
        config.align.max_distance = max_distance;
        config
    }

    pub fn resolver(&self) -> KeyResolver {
        KeyResolver::new(&self.metric_patterns)
    }

    /// Whether two final values agree within `agreement_tolerance`
    pub fn values_agree(&self, a: f64, b: f64) -> bool {
        let scale = a.abs().max(b.abs()).max(1.0);
        (a - b).abs() <= self.agreement_tolerance * scale
    }
}
