pub mod operators;

use crate::config::GaConfig;
use crate::problem::{Profile, RelevanceProblem, INFEASIBLE};
use log::{debug, info};
use operators::{SumProductCrossover, SwapShiftMutation};
use rand::prelude::*;
use rand::rng;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/// Marker for a candidate that has not been evaluated yet. Never survives
/// past `evaluate_population`.
const UNEVALUATED: f64 = f64::NAN;

/// A relevance profile together with its scalar objective.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub profile: Profile,
    /// `|target - average nDCG|`, or infinity when a grade cap is violated.
    /// Lower is better.
    pub objective: f64,
}

/// Elitist (mu+lambda) evolutionary loop over relevance profiles. Owns the
/// population for the duration of a run; the problem and operators are
/// consumed as stateless strategy objects.
pub struct EvolutionEngine<'a> {
    config: &'a GaConfig,
    problem: &'a RelevanceProblem,
    crossover: SumProductCrossover,
    mutation: SwapShiftMutation,
    population: Vec<Candidate>,
    /// Cumulative number of objective evaluations; the run terminates once
    /// this reaches the configured budget.
    evaluations: usize,
}

/// Outcome of one `evaluate_population` pass.
#[derive(Debug, Copy, Clone)]
pub struct EvaluationReport {
    pub evaluated: usize,
    pub infeasible: usize,
}

impl<'a> EvolutionEngine<'a> {
    pub fn new(config: &'a GaConfig, problem: &'a RelevanceProblem) -> Self {
        Self {
            config,
            problem,
            crossover: SumProductCrossover::new(problem.min_grade(), problem.max_grade()),
            mutation: SwapShiftMutation::new(
                config.mutation_rate,
                problem.min_grade(),
                problem.max_grade(),
            ),
            population: Vec::with_capacity(config.population_size),
            evaluations: 0,
        }
    }

    /// Runs the search to its evaluation budget and returns the final
    /// population, sorted ascending by objective (best first).
    pub fn evolve(&mut self) -> Vec<Candidate> {
        info!(
            "Initializing population of size {} (target avg nDCG {:.4}, {} grade constraints)...",
            self.config.population_size,
            self.problem.target(),
            self.problem.constraint_count()
        );
        self.initialize_population();
        self.evaluate_population();

        let mut generation = 0;
        while self.evaluations < self.config.max_evaluations {
            generation += 1;

            let offspring = self.breed_offspring();
            self.population.extend(offspring);
            let report = self.evaluate_population();
            self.sort_population();
            self.population.truncate(self.config.population_size);

            if let Some(best) = self.population.first() {
                info!(
                    "Gen {}: Best distance={:.6} | Infeasible offspring={}/{} | Evaluations={}/{}",
                    generation,
                    best.objective,
                    report.infeasible,
                    report.evaluated,
                    self.evaluations,
                    self.config.max_evaluations
                );
                debug!("Gen {}: Best profile={:?}", generation, best.profile);
            }
        }

        self.sort_population();
        info!("Evolution complete after {} evaluations.", self.evaluations);
        self.population.clone()
    }

    /// Seeds the population with random profiles drawn from the problem.
    pub fn initialize_population(&mut self) {
        let mut rng = rng();
        self.population = (0..self.config.population_size)
            .map(|_| Candidate {
                profile: self.problem.random_profile(&mut rng),
                objective: UNEVALUATED,
            })
            .collect();
    }

    /// Evaluates every candidate that still carries the unevaluated marker.
    /// Evaluation is pure, so candidates are scored in parallel and the
    /// results applied sequentially.
    pub fn evaluate_population(&mut self) -> EvaluationReport {
        let work_items: Vec<(usize, Profile)> = self
            .population
            .iter()
            .enumerate()
            .filter_map(|(i, candidate)| {
                candidate.objective.is_nan().then(|| (i, candidate.profile.clone()))
            })
            .collect();

        if work_items.is_empty() {
            return EvaluationReport {
                evaluated: 0,
                infeasible: 0,
            };
        }

        let results: Vec<(usize, f64)> = work_items
            .par_iter()
            .map(|(i, profile)| (*i, self.problem.evaluate(profile)))
            .collect();

        let mut infeasible = 0;
        for (i, objective) in &results {
            self.population[*i].objective = *objective;
            if *objective == INFEASIBLE {
                infeasible += 1;
            }
        }
        self.evaluations += results.len();

        EvaluationReport {
            evaluated: results.len(),
            infeasible,
        }
    }

    /// Breeds `offspring_size` children: tournament-selected parents are
    /// recombined at the configured crossover rate and every child is
    /// mutated. Children carry the unevaluated marker.
    fn breed_offspring(&self) -> Vec<Candidate> {
        let mut rng = rng();
        let mut offspring = Vec::with_capacity(self.config.offspring_size);

        while offspring.len() < self.config.offspring_size {
            let parent1 = self.tournament(&mut rng);
            let parent2 = self.tournament(&mut rng);

            let (mut first, mut second) = if rng.random::<f64>() < self.config.crossover_rate {
                self.crossover
                    .apply(&mut rng, &parent1.profile, &parent2.profile)
            } else {
                (parent1.profile.clone(), parent2.profile.clone())
            };

            self.mutation.apply(&mut rng, &mut first);
            self.mutation.apply(&mut rng, &mut second);

            for profile in [first, second] {
                if offspring.len() < self.config.offspring_size {
                    offspring.push(Candidate {
                        profile,
                        objective: UNEVALUATED,
                    });
                }
            }
        }

        offspring
    }

    /// Tournament selection over the evaluated population, minimizing the
    /// objective.
    fn tournament<R: Rng + ?Sized>(&self, rng: &mut R) -> &Candidate {
        let mut winner = &self.population[rng.random_range(0..self.population.len())];
        for _ in 1..self.config.tournament_size {
            let challenger = &self.population[rng.random_range(0..self.population.len())];
            if challenger.objective < winner.objective {
                winner = challenger;
            }
        }
        winner
    }

    fn sort_population(&mut self) {
        self.population.sort_by(|a, b| {
            a.objective
                .partial_cmp(&b.objective)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}
