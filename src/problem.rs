//! The relevance-profile search problem: solution space, random profile
//! generation, and the constrained objective.

use crate::metrics::average_ndcg;
use rand::Rng;
use rand_distr::{Distribution, Geometric};
use std::collections::HashMap;
use thiserror::Error;

/// Objective assigned to a profile that violates any grade cap.
pub const INFEASIBLE: f64 = f64::INFINITY;

/// Success probability of the geometric draw seeding initial profiles;
/// biases starting grades heavily toward 0, like real judgment pools.
const GEOMETRIC_SUCCESS_P: f64 = 0.7;

/// A ranked list's graded relevance judgments, position-significant.
pub type Profile = Vec<u32>;

#[derive(Error, Debug)]
pub enum ProblemError {
    #[error("grade range is inverted: min_grade {min} > max_grade {max}")]
    InvertedGradeRange { min: u32, max: u32 },
    #[error("cap table has {actual} entries, expected {expected} (one per grade)")]
    CapTableSize { expected: usize, actual: usize },
    #[error("profile length must be greater than zero")]
    EmptyProfile,
}

/// Single-objective, constrained combinatorial search problem: find a
/// profile whose average nDCG sits as close as possible to `target` while
/// no grade occurs more often than its cap allows.
#[derive(Debug, Clone)]
pub struct RelevanceProblem {
    length: usize,
    min_grade: u32,
    max_grade: u32,
    target: f64,
    /// Maximum occurrence count per grade, indexed by `grade - min_grade`;
    /// `None` marks an unbounded grade.
    caps: Vec<Option<usize>>,
    draw: Geometric,
}

impl RelevanceProblem {
    pub fn new(
        length: usize,
        min_grade: u32,
        max_grade: u32,
        target: f64,
        caps: Vec<Option<usize>>,
    ) -> Result<Self, ProblemError> {
        if length == 0 {
            return Err(ProblemError::EmptyProfile);
        }
        if min_grade > max_grade {
            return Err(ProblemError::InvertedGradeRange {
                min: min_grade,
                max: max_grade,
            });
        }
        let expected = (max_grade - min_grade + 1) as usize;
        if caps.len() != expected {
            return Err(ProblemError::CapTableSize {
                expected,
                actual: caps.len(),
            });
        }
        Ok(Self {
            length,
            min_grade,
            max_grade,
            target,
            caps,
            draw: Geometric::new(GEOMETRIC_SUCCESS_P).expect("valid success probability"),
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn min_grade(&self) -> u32 {
        self.min_grade
    }

    pub fn max_grade(&self) -> u32 {
        self.max_grade
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Nominal constraint count (one per grade). Declarative bookkeeping
    /// only; enforcement happens through the infeasibility penalty.
    pub fn constraint_count(&self) -> usize {
        self.caps.len()
    }

    /// Draws a random profile: geometric samples clamped to the grade
    /// range, with a fallback to grade 0 whenever the drawn grade has
    /// already reached its cap. The fallback itself is not checked against
    /// grade 0's cap, so a fresh profile can still overshoot it; such
    /// profiles are rejected by `evaluate`, never here.
    pub fn random_profile<R: Rng + ?Sized>(&self, rng: &mut R) -> Profile {
        let mut counts = vec![0usize; self.max_grade as usize + 1];
        let mut profile = Vec::with_capacity(self.length);
        for _ in 0..self.length {
            let drawn = self.draw.sample(rng).min(u64::from(self.max_grade)) as u32;
            let mut grade = drawn.max(self.min_grade);
            if self
                .cap_for(grade)
                .is_some_and(|cap| counts[grade as usize] >= cap)
            {
                grade = 0;
            }
            counts[grade as usize] += 1;
            profile.push(grade);
        }
        profile
    }

    /// Evaluates a profile to its scalar objective: `|target - average
    /// nDCG|`, or [`INFEASIBLE`] when any grade occurs more often than its
    /// cap allows. Grades the cap table does not cover (reachable through
    /// the crossover wrap-around when `min_grade > 0`) are infeasible too.
    pub fn evaluate(&self, profile: &Profile) -> f64 {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for &grade in profile {
            *counts.entry(grade).or_insert(0) += 1;
        }
        for (&grade, &count) in &counts {
            let cap = match grade.checked_sub(self.min_grade) {
                Some(offset) if (offset as usize) < self.caps.len() => {
                    self.caps[offset as usize]
                }
                _ => return INFEASIBLE,
            };
            if cap.is_some_and(|cap| count > cap) {
                return INFEASIBLE;
            }
        }
        (self.target - average_ndcg(profile)).abs()
    }

    fn cap_for(&self, grade: u32) -> Option<usize> {
        self.caps
            .get((grade - self.min_grade) as usize)
            .copied()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn get_test_problem() -> RelevanceProblem {
        RelevanceProblem::new(6, 0, 3, 0.4834, vec![None, Some(10), Some(5), Some(3)]).unwrap()
    }

    #[test]
    fn test_cap_table_size_is_validated() {
        let result = RelevanceProblem::new(6, 0, 3, 0.5, vec![None, Some(1)]);
        assert!(matches!(
            result,
            Err(ProblemError::CapTableSize {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_inverted_grade_range_is_rejected() {
        let result = RelevanceProblem::new(6, 3, 1, 0.5, vec![None]);
        assert!(matches!(
            result,
            Err(ProblemError::InvertedGradeRange { min: 3, max: 1 })
        ));
    }

    #[test]
    fn test_zero_length_is_rejected() {
        let result = RelevanceProblem::new(0, 0, 3, 0.5, vec![None, None, None, None]);
        assert!(matches!(result, Err(ProblemError::EmptyProfile)));
    }

    #[test]
    fn test_random_profile_respects_length_and_bounds() {
        let problem = get_test_problem();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let profile = problem.random_profile(&mut rng);
            assert_eq!(profile.len(), 6);
            assert!(profile.iter().all(|&g| g <= 3));
        }
    }

    #[test]
    fn test_random_profile_falls_back_to_zero_at_cap() {
        // Every non-zero grade is capped at 0 occurrences, so all draws
        // above 0 must collapse onto grade 0.
        let problem =
            RelevanceProblem::new(10, 0, 3, 0.5, vec![None, Some(0), Some(0), Some(0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let profile = problem.random_profile(&mut rng);
            assert!(profile.iter().all(|&g| g == 0));
        }
    }

    #[test]
    fn test_cap_violation_is_infeasible() {
        let problem = get_test_problem();
        // Four 3s against a cap of three.
        assert_eq!(problem.evaluate(&vec![3, 3, 3, 3, 0, 0]), INFEASIBLE);
    }

    #[test]
    fn test_unbounded_grade_never_trips_the_penalty() {
        let problem = get_test_problem();
        let objective = problem.evaluate(&vec![0, 0, 0, 0, 0, 0]);
        // All-zero profile scores 0, so the objective is the target itself.
        assert!((objective - 0.4834).abs() < 1e-12);
    }

    #[test]
    fn test_feasible_profile_scores_distance_to_target() {
        let problem = get_test_problem();
        let profile = vec![3, 2, 3, 0, 1, 2];
        let objective = problem.evaluate(&profile);
        assert!((objective - (0.4834f64 - 0.9206280143488264).abs()).abs() < 1e-9);
    }

    #[test]
    fn test_grade_below_min_is_infeasible() {
        // With min_grade = 1 the cap table does not cover grade 0, which
        // the crossover wrap-around can still produce.
        let problem = RelevanceProblem::new(4, 1, 3, 0.5, vec![None, Some(2), Some(1)]).unwrap();
        assert_eq!(problem.evaluate(&vec![0, 1, 1, 2]), INFEASIBLE);
    }

    #[test]
    fn test_constraint_count_matches_cap_table() {
        assert_eq!(get_test_problem().constraint_count(), 4);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let problem = get_test_problem();
        let profile = vec![1, 2, 0, 3, 0, 1];
        assert_eq!(problem.evaluate(&profile), problem.evaluate(&profile));
    }
}
