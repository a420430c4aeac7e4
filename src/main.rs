use rankforge::config::Config;
use rankforge::evolution::EvolutionEngine;
use rankforge::export::{self, RunExport};
use rankforge::problem::RelevanceProblem;
use rankforge::report;
use std::path::Path;
use std::process;

/// Resolves the target average nDCG: a literal `target.value` wins,
/// otherwise the configured run id is looked up in the report directory.
///
/// # Arguments
/// * `config` - Reference to the loaded and validated run configuration.
///
/// # Returns
/// * `Ok(f64)` - The target average nDCG for this search.
/// * `Err(String)` - Error message if the report harvest or lookup fails.
fn resolve_target(config: &Config) -> Result<f64, String> {
    if let Some(value) = config.target.value {
        return Ok(value);
    }

    // validate() guarantees both fields are present when value is absent.
    let dir = config
        .target
        .reports_dir
        .as_ref()
        .ok_or("no target source configured")?;
    let run_id = config
        .target
        .run_id
        .as_ref()
        .ok_or("no target run id configured")?;

    let targets = report::harvest_targets(Path::new(dir))
        .map_err(|e| format!("Failed to harvest report files: {}", e))?;
    log::info!(
        "Harvested {} target nDCG figures from '{}'.",
        targets.len(),
        dir
    );

    let raw = targets
        .get(run_id)
        .ok_or_else(|| format!("Run '{}' not found in report files", run_id))?;
    raw.parse::<f64>()
        .map_err(|e| format!("Run '{}' has unparsable nDCG value '{}': {}", run_id, raw, e))
}

fn main() {
    env_logger::init();
    log::info!("Booting rankforge...");

    // 1. Load and Validate Configuration
    let config = match Config::load(Path::new("config.toml")) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        process::exit(1);
    }
    log::info!("Configuration loaded and validated.");

    // 2. Resolve the target average nDCG
    let target = match resolve_target(&config) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to resolve target nDCG: {}", e);
            process::exit(1);
        }
    };
    log::info!("Searching for a relevance profile with average nDCG ~ {:.4}", target);

    // 3. Define the search problem
    let problem = match RelevanceProblem::new(
        config.profile.length,
        config.profile.min_grade,
        config.profile.max_grade,
        target,
        config.profile.caps(),
    ) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Invalid problem definition: {}", e);
            process::exit(1);
        }
    };

    // 4. Run the Evolution
    log::info!("--- Starting Evolution ---");
    let mut engine = EvolutionEngine::new(&config.ga, &problem);
    let results = engine.evolve();

    // 5. Persist results
    let output_dir = Path::new(&config.output.directory);
    if let Err(e) = export::write_results(output_dir, &results) {
        log::error!("Failed to write FUN/VAR files: {}", e);
        process::exit(1);
    }
    let summary = RunExport::new(target, &config, &results);
    if let Err(e) = export::write_summary(output_dir, &summary) {
        log::error!("Failed to write run summary: {}", e);
        process::exit(1);
    }
    log::info!("Results written to '{}'.", output_dir.display());

    log::info!("Top 5 Profiles:");
    for (i, candidate) in results.iter().take(5).enumerate() {
        println!("\n[Rank {}] Distance to target: {:.6}", i + 1, candidate.objective);
        println!("  Profile: {:?}", candidate.profile);
    }
}
