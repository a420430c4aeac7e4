//! Result persistence: `FUN`/`VAR` plain-text files plus a JSON run
//! summary carrying enough metadata to reproduce the search.

use crate::config::Config;
use crate::evolution::Candidate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Objective values of the final population, one line per candidate.
pub const FUN_FILE: &str = "FUN";
/// Decision vectors of the final population, one line per candidate.
pub const VAR_FILE: &str = "VAR";
pub const SUMMARY_FILE: &str = "summary.json";

/// Run summary with full metadata for reproducibility.
#[derive(Serialize, Deserialize)]
pub struct RunExport {
    /// Schema version for forward/backward compatibility
    pub schema_version: String,
    /// Unix timestamp when the export was generated
    pub generated_at: u64,
    /// Target average nDCG the search aimed for
    pub target: f64,
    /// Snapshot of the run configuration
    pub config: Config,
    /// Final population, best first
    pub results: Vec<ResultEntry>,
}

#[derive(Serialize, Deserialize)]
pub struct ResultEntry {
    /// Rank within the final population (1 = best)
    pub rank: usize,
    /// `|target - average nDCG|` of the profile
    pub objective: f64,
    /// The relevance profile itself
    pub profile: Vec<u32>,
}

impl RunExport {
    pub fn new(target: f64, config: &Config, results: &[Candidate]) -> Self {
        Self {
            schema_version: "1.0.0".to_string(),
            generated_at: chrono::Utc::now().timestamp() as u64,
            target,
            config: config.clone(),
            results: results
                .iter()
                .enumerate()
                .map(|(i, candidate)| ResultEntry {
                    rank: i + 1,
                    objective: candidate.objective,
                    profile: candidate.profile.clone(),
                })
                .collect(),
        }
    }
}

/// Writes the `FUN` and `VAR` files for the final population, creating the
/// output directory if needed.
pub fn write_results(dir: &Path, results: &[Candidate]) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    let mut fun = String::new();
    let mut var = String::new();
    for candidate in results {
        fun.push_str(&candidate.objective.to_string());
        fun.push('\n');

        let grades: Vec<String> = candidate.profile.iter().map(u32::to_string).collect();
        var.push_str(&grades.join(" "));
        var.push('\n');
    }

    fs::write(dir.join(FUN_FILE), fun)?;
    fs::write(dir.join(VAR_FILE), var)?;
    Ok(())
}

/// Writes the JSON run summary next to the `FUN`/`VAR` files.
pub fn write_summary(dir: &Path, export: &RunExport) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(export)?;
    fs::write(dir.join(SUMMARY_FILE), json)?;
    Ok(())
}

/// Reads a run summary back from an output directory.
pub fn read_summary(dir: &Path) -> Result<RunExport, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(dir.join(SUMMARY_FILE))?;
    let export: RunExport = serde_json::from_str(&content)?;
    Ok(export)
}
