use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub ga: GaConfig,
    pub profile: ProfileConfig,
    pub target: TargetConfig,
    pub output: OutputConfig,
}

/// Parameters of the evolutionary loop.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GaConfig {
    pub population_size: usize,
    pub offspring_size: usize,
    /// Total evaluation budget; the loop stops once this many profiles
    /// have been evaluated.
    pub max_evaluations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub tournament_size: usize,
}

/// Shape of the relevance profiles being searched for.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileConfig {
    /// Number of positions in the ranked list.
    pub length: usize,
    pub min_grade: u32,
    pub max_grade: u32,
    /// Maximum occurrence count per grade, indexed by `grade - min_grade`.
    /// Negative entries mean unbounded (TOML arrays cannot hold nulls).
    pub grade_caps: Vec<i64>,
}

impl ProfileConfig {
    /// Cap table in the form the problem consumes: `None` marks an
    /// unbounded grade.
    pub fn caps(&self) -> Vec<Option<usize>> {
        self.grade_caps
            .iter()
            .map(|&cap| usize::try_from(cap).ok())
            .collect()
    }
}

/// Where the target average nDCG comes from: a literal value, or a
/// `runid` looked up in a directory of evaluation report files.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TargetConfig {
    pub value: Option<f64>,
    pub reports_dir: Option<String>,
    pub run_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OutputConfig {
    pub directory: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Checks the configuration for values the run could not recover from.
    pub fn validate(&self) -> Result<(), String> {
        if self.ga.population_size == 0 {
            return Err("population_size must be greater than zero".to_string());
        }
        if self.ga.offspring_size == 0 {
            return Err("offspring_size must be greater than zero".to_string());
        }
        if self.ga.tournament_size == 0 {
            return Err("tournament_size must be greater than zero".to_string());
        }
        if self.ga.max_evaluations < self.ga.population_size {
            return Err(format!(
                "max_evaluations ({}) must cover at least the initial population ({})",
                self.ga.max_evaluations, self.ga.population_size
            ));
        }
        if !(0.0..=1.0).contains(&self.ga.crossover_rate) {
            return Err(format!(
                "crossover_rate ({}) must be within [0, 1]",
                self.ga.crossover_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.ga.mutation_rate) {
            return Err(format!(
                "mutation_rate ({}) must be within [0, 1]",
                self.ga.mutation_rate
            ));
        }
        if self.profile.length == 0 {
            return Err("profile length must be greater than zero".to_string());
        }
        if self.profile.min_grade > self.profile.max_grade {
            return Err(format!(
                "min_grade ({}) must not exceed max_grade ({})",
                self.profile.min_grade, self.profile.max_grade
            ));
        }
        let expected_caps = (self.profile.max_grade - self.profile.min_grade + 1) as usize;
        if self.profile.grade_caps.len() != expected_caps {
            return Err(format!(
                "grade_caps has {} entries, expected {} (one per grade)",
                self.profile.grade_caps.len(),
                expected_caps
            ));
        }
        match self.target.value {
            Some(value) if !(0.0..=1.0).contains(&value) => {
                return Err(format!("target value ({}) must be within [0, 1]", value));
            }
            Some(_) => {}
            None => {
                if self.target.reports_dir.is_none() || self.target.run_id.is_none() {
                    return Err(
                        "no target source: set target.value, or both target.reports_dir \
                         and target.run_id"
                            .to_string(),
                    );
                }
            }
        }
        if self.output.directory.is_empty() {
            return Err("output directory must not be empty".to_string());
        }
        Ok(())
    }
}
