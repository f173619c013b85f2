use std::path::PathBuf;

use batscope::{
    check_max_distance, discover_runs, export_run, format_report, init_logging, load_settings,
};
use batscope_core::{AnalysisConfig, RunAccumulator, RunInput, analyze_runs};
use clap::Parser;
use color_eyre::eyre::{WrapErr, eyre};

#[derive(Parser, Debug)]
#[command(name = "batscope")]
#[command(about = "Analyze OMNeT++ results of bat-algorithm UAV swarm simulations")]
struct Args {
    /// Directory holding the .sca/.vec result files
    #[arg(default_value = "simulations/results")]
    results_dir: PathBuf,

    /// Only analyze these configurations (repeatable)
    #[arg(short, long = "config-name")]
    config_name: Vec<String>,

    /// YAML analysis settings
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write one JSON file per run into this directory
    #[arg(long)]
    export: Option<PathBuf>,

    /// Drop series whose nearest sample is farther than this from an axis point (seconds)
    #[arg(long, allow_negative_numbers = true)]
    max_distance: Option<f64>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let mut config = match &args.settings {
        Some(path) => load_settings(path).wrap_err("Failed to load settings")?,
        None => AnalysisConfig::default(),
    };
    if let Some(max) = args.max_distance {
        let max = check_max_distance(max).map_err(|e| eyre!("--max-distance: {e}"))?;
        config = config.with_max_distance(Some(max));
    }

    if !args.results_dir.is_dir() {
        return Err(eyre!(
            "Results directory not found: {}",
            args.results_dir.display()
        ));
    }

    let runs = discover_runs(&args.results_dir, &args.config_name).wrap_err_with(|| {
        format!("Failed to scan {}", args.results_dir.display())
    })?;
    if runs.is_empty() {
        return Err(eyre!(
            "No results found in {}. Run a simulation first.",
            args.results_dir.display()
        ));
    }

    let inputs: Vec<RunInput> = runs.into_iter().map(|r| r.input).collect();
    let mut acc = RunAccumulator::new();
    acc.extend(analyze_runs(&inputs, &config));

    print!("{}", format_report(&acc));

    if let Some(dir) = &args.export {
        for run in acc.runs() {
            export_run(dir, run).wrap_err_with(|| format!("Failed to export {}", run.name))?;
        }
    }

    if acc.is_empty() {
        return Err(eyre!("None of the {} runs could be read", inputs.len()));
    }

    tracing::info!("analyzed {} runs", acc.len());
    Ok(())
}
