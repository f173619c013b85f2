//! Derived per-run figures.
//!
//! Fitness is a distance to the target, so it decreases as a bat improves:
//! improvement is `initial - final`.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::model::{DataWarning, EntityKey};
use crate::resolve::{LogicalGroup, entity_key};
use crate::series::ScalarTable;

use super::{DistributionStats, mean};

/// Change of a lower-is-better quantity between start and end of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub initial: f64,
    pub final_value: f64,
    /// `initial - final_value`
    pub absolute: f64,
    /// `absolute / initial * 100`; `None` when `initial` is zero
    pub percent: Option<f64>,
}

impl Improvement {
    pub fn new(initial: f64, final_value: f64) -> Self {
        let absolute = initial - final_value;
        let percent = if initial == 0.0 {
            None
        } else {
            Some(absolute / initial * 100.0).filter(|p| p.is_finite())
        };
        Self {
            initial,
            final_value,
            absolute,
            percent,
        }
    }
}

/// Where an entity's final value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalSource {
    /// Last sample of the fitness vector
    Vector,
    /// End-of-run scalar
    Scalar,
}

/// Fitness figures for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFitness {
    pub key: EntityKey,
    pub entity_path: String,
    /// First fitness sample, only known from vector files
    pub initial: Option<f64>,
    pub final_value: f64,
    pub final_source: FinalSource,
    /// Lowest fitness sample seen during the run
    pub best: Option<f64>,
    /// Highest fitness sample seen during the run
    pub worst: Option<f64>,
    pub improvement: Option<Improvement>,
}

/// Swarm-wide fitness summary of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessSummary {
    pub entities: Vec<EntityFitness>,
    pub initial: Option<DistributionStats>,
    pub final_stats: DistributionStats,
    /// Distribution of per-entity improvement percentages, entities with
    /// an undefined percentage left out
    pub improvement_percent: Option<DistributionStats>,
    /// Mean initial versus mean final over entities that have both
    pub swarm_improvement: Option<Improvement>,
    pub warnings: Vec<DataWarning>,
}

impl FitnessSummary {
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entity with the lowest final fitness
    pub fn best_entity(&self) -> Option<&EntityFitness> {
        self.entities
            .iter()
            .min_by(|a, b| a.final_value.total_cmp(&b.final_value))
    }
}

/// Combine fitness vectors and end-of-run scalars into a summary.
///
/// An entity's final value is the end-of-run scalar when the scalar file
/// has one, otherwise the last vector sample. When both exist and disagree
/// a [`DataWarning::FinalValueMismatch`] is attached. Returns `None` when
/// neither source has fitness data.
pub fn summarize_fitness(
    group: Option<&LogicalGroup>,
    scalars: Option<&ScalarTable>,
    config: &AnalysisConfig,
) -> Option<FitnessSummary> {
    let final_scalar = |path: &str| scalars.and_then(|t| t.first_of(path, &config.final_fitness_metrics));

    let mut entities = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = rustc_hash::FxHashSet::default();

    // one series per entity path; members are sorted so `fitness` wins over
    // names like `personalBestFitness`
    for member in group.map(LogicalGroup::members).unwrap_or_default() {
        let series = &member.series;
        if series.is_empty() || !seen.insert(series.entity_path.as_str()) {
            continue;
        }
        let (Some(initial), Some(last)) = (series.initial_value(), series.final_value()) else {
            continue;
        };

        let (final_value, final_source) = match final_scalar(&series.entity_path) {
            Some(scalar) => {
                if !config.values_agree(last, scalar) {
                    tracing::warn!(
                        "{}: last fitness sample {last} disagrees with scalar {scalar}",
                        series.entity_path
                    );
                    warnings.push(DataWarning::FinalValueMismatch {
                        entity_path: series.entity_path.clone(),
                        vector_value: last,
                        scalar_value: scalar,
                    });
                }
                (scalar, FinalSource::Scalar)
            }
            None => (last, FinalSource::Vector),
        };

        entities.push(EntityFitness {
            key: member.key,
            entity_path: series.entity_path.clone(),
            initial: Some(initial),
            final_value,
            final_source,
            best: series.values().min_by(f64::total_cmp),
            worst: series.values().max_by(f64::total_cmp),
            improvement: Some(Improvement::new(initial, final_value)),
        });
    }

    // entities only present in the scalar file
    if let Some(table) = scalars {
        for record in table.iter() {
            if !config.final_fitness_metrics.contains(&record.metric_name)
                || seen.contains(record.entity_path.as_str())
            {
                continue;
            }
            let Some(final_value) = final_scalar(&record.entity_path) else {
                continue;
            };
            seen.insert(record.entity_path.as_str());
            entities.push(EntityFitness {
                key: entity_key(&record.entity_path),
                entity_path: record.entity_path.clone(),
                initial: None,
                final_value,
                final_source: FinalSource::Scalar,
                best: None,
                worst: None,
                improvement: None,
            });
        }
    }

    entities.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.entity_path.cmp(&b.entity_path)));

    let finals: Vec<f64> = entities.iter().map(|e| e.final_value).collect();
    let final_stats = DistributionStats::from_values(&finals)?;

    let initials: Vec<f64> = entities.iter().filter_map(|e| e.initial).collect();
    let percents: Vec<f64> = entities
        .iter()
        .filter_map(|e| e.improvement.and_then(|i| i.percent))
        .collect();
    let paired_finals: Vec<f64> = entities
        .iter()
        .filter(|e| e.initial.is_some())
        .map(|e| e.final_value)
        .collect();
    let swarm_improvement = match (mean(&initials), mean(&paired_finals)) {
        (Some(initial), Some(final_value)) => Some(Improvement::new(initial, final_value)),
        _ => None,
    };

    Some(FitnessSummary {
        entities,
        initial: DistributionStats::from_values(&initials),
        final_stats,
        improvement_percent: DistributionStats::from_values(&percents),
        swarm_improvement,
        warnings,
    })
}

/// Obstacles-avoided counts of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSummary {
    /// `(entity, path, count)` ordered by entity key
    pub per_entity: Vec<(EntityKey, String, f64)>,
    pub total: f64,
    pub average_per_entity: f64,
    /// Entities whose final count is greater than zero
    pub entities_with_nonzero: usize,
    pub max_single: f64,
}

impl ObstacleSummary {
    fn from_counts(mut per_entity: Vec<(EntityKey, String, f64)>) -> Option<Self> {
        if per_entity.is_empty() {
            return None;
        }
        per_entity.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let total: f64 = per_entity.iter().map(|(_, _, v)| v).sum();
        Some(Self {
            total,
            average_per_entity: total / per_entity.len() as f64,
            entities_with_nonzero: per_entity.iter().filter(|(_, _, v)| *v > 0.0).count(),
            max_single: per_entity
                .iter()
                .map(|(_, _, v)| *v)
                .fold(f64::NEG_INFINITY, f64::max),
            per_entity,
        })
    }

    pub fn entity_count(&self) -> usize {
        self.per_entity.len()
    }
}

/// Summarize obstacles avoided.
///
/// Uses the end-of-run scalars when the scalar file has any, otherwise the
/// final samples of the obstacles-avoided vector group.
pub fn summarize_obstacles(
    scalars: Option<&ScalarTable>,
    group: Option<&LogicalGroup>,
    config: &AnalysisConfig,
) -> Option<ObstacleSummary> {
    if let Some(table) = scalars {
        let mut counts = Vec::new();
        let mut seen = rustc_hash::FxHashSet::default();
        for record in table.iter() {
            if !config.obstacles_metrics.contains(&record.metric_name)
                || !seen.insert(record.entity_path.as_str())
            {
                continue;
            }
            if let Some(value) = table.first_of(&record.entity_path, &config.obstacles_metrics) {
                counts.push((entity_key(&record.entity_path), record.entity_path.clone(), value));
            }
        }
        if let Some(summary) = ObstacleSummary::from_counts(counts) {
            return Some(summary);
        }
    }

    let counts = group?
        .members()
        .iter()
        .filter_map(|m| {
            let last = m.series.final_value()?;
            Some((m.key, m.series.entity_path.clone(), last))
        })
        .collect();
    ObstacleSummary::from_counts(counts)
}

/// Distribution of one scalar metric across entities
pub fn scalar_distribution(table: &ScalarTable, metric_name: &str) -> Option<DistributionStats> {
    let values: Vec<f64> = table.with_metric(metric_name).map(|r| r.value).collect();
    DistributionStats::from_values(&values)
}
