//! Result file discovery
//!
//! OMNeT++ names result files `<config>-#<repetition>.sca` and
//! `<config>-#<repetition>.vec`. Files sharing a stem form one run.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use batscope_core::RunInput;

/// A run found in the results directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRun {
    pub config: String,
    pub repetition: u32,
    pub input: RunInput,
}

/// Split a result file stem into configuration name and repetition
pub fn parse_run_stem(stem: &str) -> Option<(&str, u32)> {
    let (config, repetition) = stem.rsplit_once("-#")?;
    if config.is_empty() || repetition.is_empty() || !repetition.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    Some((config, repetition.parse().ok()?))
}

/// Collect the runs in `results_dir`, ordered by configuration name then
/// repetition.
///
/// `configs` restricts the result to those configuration names; an empty
/// slice keeps every configuration.
pub fn discover_runs(results_dir: &Path, configs: &[String]) -> io::Result<Vec<DiscoveredRun>> {
    let mut runs: BTreeMap<(String, u32), RunInput> = BTreeMap::new();

    for entry in fs::read_dir(results_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if ext != "sca" && ext != "vec" {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((config, repetition)) = parse_run_stem(stem) else {
            tracing::debug!("ignoring {}: not a <config>-#<n> result file", path.display());
            continue;
        };
        if !configs.is_empty() && !configs.iter().any(|c| c == config) {
            continue;
        }

        let input = runs
            .entry((config.to_string(), repetition))
            .or_insert_with(|| RunInput {
                name: stem.to_string(),
                scalar_path: None,
                vector_path: None,
            });
        if ext == "sca" {
            input.scalar_path = Some(path.clone());
        } else {
            input.vector_path = Some(path.clone());
        }
    }

    tracing::info!("found {} runs in {}", runs.len(), results_dir.display());

    Ok(runs
        .into_iter()
        .map(|((config, repetition), input)| DiscoveredRun {
            config,
            repetition,
            input,
        })
        .collect())
}
