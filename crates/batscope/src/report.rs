//! Console summaries

use std::fmt;

use batscope_core::analysis::{DistributionStats, Improvement};
use batscope_core::{RunAccumulator, RunAnalysis};

const RULE_WIDTH: usize = 70;

/// Format an optional value, `N/A` when absent
pub fn format_optional(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.precision$}{unit}"),
        _ => "N/A".to_string(),
    }
}

fn write_distribution(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    stats: &DistributionStats,
    unit: &str,
) -> fmt::Result {
    writeln!(f, "\n  {title}:")?;
    writeln!(f, "     Mean:    {:>8.2}{unit}", stats.mean)?;
    writeln!(f, "     Median:  {:>8.2}{unit}", stats.median)?;
    writeln!(f, "     Std dev: {:>8.2}{unit}", stats.std_dev)?;
    writeln!(f, "     Min:     {:>8.2}{unit}", stats.min)?;
    writeln!(f, "     Max:     {:>8.2}{unit}", stats.max)
}

fn write_improvement(f: &mut fmt::Formatter<'_>, improvement: &Improvement) -> fmt::Result {
    writeln!(
        f,
        "     Average improvement: {:.2} m ({})",
        improvement.absolute,
        format_optional(improvement.percent, 1, "%")
    )
}

/// Summary block for one run
pub struct RunSummary<'a>(pub &'a RunAnalysis);

impl fmt::Display for RunSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let run = self.0;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "  Run: {}", run.name)?;
        writeln!(f, "{rule}")?;
        if let Some(config) = run.metadata.config_name() {
            writeln!(f, "  Configuration: {config}")?;
        }
        if let Some(started) = run.started_at {
            writeln!(f, "  Started:       {started}")?;
        }
        writeln!(
            f,
            "  Network:       {}",
            run.network.as_deref().unwrap_or("N/A")
        )?;
        writeln!(f, "  UAVs:          {}", run.entity_count)?;

        let skipped = run.scalar_stats.as_ref().map_or(0, |s| s.total_skipped())
            + run.vector_stats.as_ref().map_or(0, |s| s.total_skipped());
        if skipped > 0 {
            writeln!(f, "  Skipped lines: {skipped}")?;
        }

        match &run.fitness {
            Some(fitness) => {
                if let Some(initial) = &fitness.initial {
                    write_distribution(f, "Initial fitness (distance to target)", initial, " m")?;
                }
                write_distribution(
                    f,
                    "Final fitness (distance to target)",
                    &fitness.final_stats,
                    " m",
                )?;
                if let Some(best) = fitness.best_entity() {
                    writeln!(f, "     Best UAV:  {} ({:.2} m)", best.key, best.final_value)?;
                }

                if fitness.swarm_improvement.is_some() || fitness.improvement_percent.is_some() {
                    writeln!(f, "\n  Improvement:")?;
                }
                if let Some(swarm) = &fitness.swarm_improvement {
                    write_improvement(f, swarm)?;
                }
                if let Some(percent) = &fitness.improvement_percent {
                    writeln!(f, "     Mean:  {:.2}%", percent.mean)?;
                    writeln!(f, "     Best:  {:.2}%", percent.max)?;
                    writeln!(f, "     Worst: {:.2}%", percent.min)?;
                }
            }
            None => writeln!(f, "\n  No fitness data")?,
        }

        if let Some(personal_best) = &run.personal_best {
            write_distribution(f, "Personal best fitness", personal_best, " m")?;
        }

        match &run.obstacles {
            Some(obstacles) => {
                writeln!(f, "\n  Obstacle avoidance:")?;
                writeln!(f, "     Total avoided:      {}", obstacles.total)?;
                writeln!(
                    f,
                    "     Average per UAV:    {:.1}",
                    obstacles.average_per_entity
                )?;
                writeln!(
                    f,
                    "     UAVs that avoided:  {}/{}",
                    obstacles.entities_with_nonzero,
                    obstacles.entity_count()
                )?;
                writeln!(f, "     Max by single UAV:  {}", obstacles.max_single)?;
            }
            None => writeln!(f, "\n  No obstacle data")?,
        }

        if !run.aligned.is_empty() {
            writeln!(f, "\n  Aligned series:")?;
            for aligned in &run.aligned {
                writeln!(
                    f,
                    "     {:<18} {} series, {} points",
                    aligned.kind.label(),
                    aligned.series_count,
                    aligned.len()
                )?;
            }
        }

        if !run.warnings.is_empty() {
            writeln!(f, "\n  Warnings:")?;
            for warning in &run.warnings {
                writeln!(f, "     - {warning}")?;
            }
        }

        Ok(())
    }
}

/// Summary of every run plus the runs that could not be read
pub struct Report<'a>(pub &'a RunAccumulator);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let acc = self.0;
        for run in acc.runs() {
            writeln!(f, "{}", RunSummary(run))?;
        }
        if !acc.failures().is_empty() {
            writeln!(f, "Failed runs:")?;
            for (name, error) in acc.failures() {
                writeln!(f, "  {name}: {error}")?;
            }
        }
        Ok(())
    }
}

pub fn format_run(run: &RunAnalysis) -> String {
    RunSummary(run).to_string()
}

pub fn format_report(acc: &RunAccumulator) -> String {
    Report(acc).to_string()
}
