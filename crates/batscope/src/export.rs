//! JSON export of run analyses

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use batscope_core::RunAnalysis;

/// Write content to a file atomically using write-then-rename pattern.
///
/// The content is first written to a sibling temporary file, then renamed
/// over the target path.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Replace characters that are unsafe in file names
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '#' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Pretty JSON for one run.
///
/// Statistics of points without data are NaN, which JSON cannot represent;
/// they are written as `null`.
pub fn run_to_json(run: &RunAnalysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(run)
}

/// Write `<run name>.json` into `dir`, creating the directory if needed
pub fn export_run(dir: &Path, run: &RunAnalysis) -> color_eyre::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", sanitize_filename(&run.name)));
    let json = run_to_json(run)?;
    atomic_write(&path, &json)?;
    tracing::info!("exported {} to {}", run.name, path.display());
    Ok(path)
}
