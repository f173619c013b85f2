//! Per-run pipeline
//!
//! Drives one simulation run through parser, series builder, key resolver
//! and analysis, and collects many runs into a [`RunAccumulator`].

use std::collections::BTreeMap;
use std::path::PathBuf;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{
    AlignedSeriesSet, DistributionStats, FitnessSummary, ObstacleSummary, scalar_distribution,
    summarize_fitness, summarize_obstacles,
};
use crate::config::AnalysisConfig;
use crate::error::{ReadError, Result};
use crate::model::{DataWarning, MetricKind, RunMetadata};
use crate::parser::{
    ParseStats, ParsedScalarFile, ParsedVectorFile, read_scalar_file, read_vector_file,
};
use crate::resolve::{LogicalGroup, count_indexed_entities, network_name};
use crate::series::{ScalarTable, VectorSeriesSet};

/// Result files belonging to one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInput {
    /// `<config>-#<repetition>`
    pub name: String,
    pub scalar_path: Option<PathBuf>,
    pub vector_path: Option<PathBuf>,
}

/// Everything derived from one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAnalysis {
    pub name: String,
    /// Header of the scalar file, gaps filled from the vector file
    pub metadata: RunMetadata,
    pub started_at: Option<jiff::civil::DateTime>,
    pub network: Option<String>,
    /// Distinct indexed entities seen in either file
    pub entity_count: usize,
    pub scalar_stats: Option<ParseStats>,
    pub vector_stats: Option<ParseStats>,
    pub series_count: usize,
    pub groups: Vec<LogicalGroup>,
    pub aligned: Vec<AlignedSeriesSet>,
    pub fitness: Option<FitnessSummary>,
    pub personal_best: Option<DistributionStats>,
    pub obstacles: Option<ObstacleSummary>,
    pub warnings: Vec<DataWarning>,
}

impl RunAnalysis {
    pub fn group(&self, kind: MetricKind) -> Option<&LogicalGroup> {
        self.groups.iter().find(|g| g.kind() == kind)
    }

    pub fn aligned(&self, kind: MetricKind) -> Option<&AlignedSeriesSet> {
        self.aligned.iter().find(|a| a.kind == kind)
    }

    pub fn has_data(&self) -> bool {
        self.series_count > 0 || self.scalar_stats.as_ref().is_some_and(|s| s.records > 0)
    }
}

/// Analyze already-parsed files of one run. Either file may be absent.
pub fn analyze_parsed(
    name: impl Into<String>,
    scalars: Option<ParsedScalarFile>,
    vectors: Option<ParsedVectorFile>,
    config: &AnalysisConfig,
) -> RunAnalysis {
    let name = name.into();
    let resolver = config.resolver();

    let mut metadata = RunMetadata::default();
    let mut warnings = Vec::new();

    let (scalar_stats, table) = match scalars {
        Some(parsed) => {
            metadata = parsed.metadata;
            (Some(parsed.stats), Some(ScalarTable::build(parsed.records)))
        }
        None => (None, None),
    };

    let (vector_stats, series) = match vectors {
        Some(parsed) => {
            metadata.merge_missing(&parsed.metadata);
            let set = VectorSeriesSet::build(parsed.records);
            warnings.extend(set.warnings());
            (Some(parsed.stats), set.into_sorted())
        }
        None => (None, Vec::new()),
    };
    let series_count = series.len();

    let paths = table
        .iter()
        .flat_map(|t| t.iter().map(|r| r.entity_path.as_str()))
        .chain(series.iter().map(|(_, s)| s.entity_path.as_str()));
    let entity_count = count_indexed_entities(paths);
    let network = table
        .iter()
        .flat_map(|t| t.iter().map(|r| r.entity_path.as_str()))
        .chain(series.iter().map(|(_, s)| s.entity_path.as_str()))
        .find_map(network_name)
        .map(str::to_string);

    let groups = resolver.group_series(series.into_iter().map(|(_, s)| s));
    let aligned: Vec<_> = groups
        .iter()
        .map(|g| AlignedSeriesSet::from_group(g, &config.align))
        .collect();

    let find = |kind: MetricKind| groups.iter().find(|g| g.kind() == kind);
    let fitness = summarize_fitness(find(MetricKind::Fitness), table.as_ref(), config);
    if let Some(summary) = &fitness {
        warnings.extend(summary.warnings.iter().cloned());
    }
    let obstacles = summarize_obstacles(table.as_ref(), find(MetricKind::ObstaclesAvoided), config);
    let personal_best = table
        .as_ref()
        .and_then(|t| scalar_distribution(t, &config.personal_best_metric));

    tracing::info!(
        "{name}: {entity_count} entities, {series_count} series, {} groups",
        groups.len()
    );

    RunAnalysis {
        started_at: metadata.started_at(),
        name,
        metadata,
        network,
        entity_count,
        scalar_stats,
        vector_stats,
        series_count,
        groups,
        aligned,
        fitness,
        personal_best,
        obstacles,
        warnings,
    }
}

/// Read and analyze the files of one run
pub fn analyze_run(input: &RunInput, config: &AnalysisConfig) -> Result<RunAnalysis> {
    let scalars = input
        .scalar_path
        .as_deref()
        .map(read_scalar_file)
        .transpose()?;
    let vectors = input
        .vector_path
        .as_deref()
        .map(|path| read_vector_file(path, config.vector))
        .transpose()?;
    Ok(analyze_parsed(input.name.clone(), scalars, vectors, config))
}

/// Analyze independent runs, in parallel with the `parallel` feature.
///
/// Results come back in input order.
pub fn analyze_runs(
    inputs: &[RunInput],
    config: &AnalysisConfig,
) -> Vec<(String, Result<RunAnalysis>)> {
    #[cfg(feature = "parallel")]
    let results = inputs
        .par_iter()
        .map(|input| (input.name.clone(), analyze_run(input, config)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results = inputs
        .iter()
        .map(|input| (input.name.clone(), analyze_run(input, config)))
        .collect();

    results
}

/// Runs analyzed so far, keyed by run name
#[derive(Debug, Default)]
pub struct RunAccumulator {
    runs: BTreeMap<String, RunAnalysis>,
    failures: Vec<(String, ReadError)>,
}

impl RunAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run, replacing an earlier run of the same name
    pub fn absorb(&mut self, analysis: RunAnalysis) {
        if self.runs.contains_key(&analysis.name) {
            tracing::warn!("run {} analyzed twice, keeping the later result", analysis.name);
        }
        self.runs.insert(analysis.name.clone(), analysis);
    }

    pub fn record_failure(&mut self, name: impl Into<String>, error: ReadError) {
        let name = name.into();
        tracing::warn!("run {name} failed: {error}");
        self.failures.push((name, error));
    }

    /// Fold the output of [`analyze_runs`]
    pub fn extend(&mut self, results: impl IntoIterator<Item = (String, Result<RunAnalysis>)>) {
        for (name, result) in results {
            match result {
                Ok(analysis) => self.absorb(analysis),
                Err(err) => self.record_failure(name, err),
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&RunAnalysis> {
        self.runs.get(name)
    }

    /// Runs ordered by name
    pub fn runs(&self) -> impl Iterator<Item = &RunAnalysis> {
        self.runs.values()
    }

    pub fn failures(&self) -> &[(String, ReadError)] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn into_runs(self) -> Vec<RunAnalysis> {
        self.runs.into_values().collect()
    }
}
