//! Domain-specific genetic operators over relevance profiles. Both take an
//! injectable random source so runs can be reproduced under a seeded rng.

use crate::problem::Profile;
use rand::Rng;

/// Per-position arithmetic crossover: each position of one child carries
/// the parents' sum and the sibling carries their product, both reduced
/// modulo the grade-range span plus one, with the assignment order
/// coin-flipped independently per position.
///
/// The modulus is `(max_grade - min_grade) + 1` — the span of the grade
/// range, not the vector length — so with a non-zero `min_grade` children
/// can land below the valid range. That quirk is intentional and left to
/// the evaluation penalty to filter out.
pub struct SumProductCrossover {
    modulus: u32,
}

impl SumProductCrossover {
    pub fn new(min_grade: u32, max_grade: u32) -> Self {
        Self {
            modulus: max_grade - min_grade + 1,
        }
    }

    /// Recombines two equal-length parents into exactly two children of
    /// the same length. Objective values are the caller's to reset.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        first: &Profile,
        second: &Profile,
    ) -> (Profile, Profile) {
        let mut left = Vec::with_capacity(first.len());
        let mut right = Vec::with_capacity(second.len());
        for (&a, &b) in first.iter().zip(second) {
            let sum = (a + b) % self.modulus;
            let product = (a * b) % self.modulus;
            if rng.random_bool(0.5) {
                left.push(sum);
                right.push(product);
            } else {
                left.push(product);
                right.push(sum);
            }
        }
        (left, right)
    }
}

/// Per-position mutation: with the configured probability a position is
/// either swapped with a uniformly random position (possibly itself) or
/// shifted by a uniform amount in `[0, span]` modulo `span + 1`, each move
/// equally likely. Mutates the profile in place.
pub struct SwapShiftMutation {
    probability: f64,
    span: u32,
}

impl SwapShiftMutation {
    pub fn new(probability: f64, min_grade: u32, max_grade: u32) -> Self {
        Self {
            probability,
            span: max_grade - min_grade,
        }
    }

    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, profile: &mut Profile) {
        if profile.is_empty() {
            return;
        }
        for index in 0..profile.len() {
            if !rng.random_bool(self.probability) {
                continue;
            }
            if rng.random_bool(0.5) {
                let other = rng.random_range(0..profile.len());
                profile.swap(index, other);
            } else {
                let shift = rng.random_range(0..=self.span);
                profile[index] = (profile[index] + shift) % (self.span + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_crossover_returns_two_children_of_parent_length() {
        let crossover = SumProductCrossover::new(0, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let parent1: Profile = vec![3, 2, 3, 0, 1, 2];
        let parent2: Profile = vec![0, 1, 2, 3, 3, 0];

        let (child1, child2) = crossover.apply(&mut rng, &parent1, &parent2);
        assert_eq!(child1.len(), parent1.len());
        assert_eq!(child2.len(), parent2.len());
    }

    #[test]
    fn test_crossover_children_carry_complementary_values() {
        let crossover = SumProductCrossover::new(0, 3);
        let mut rng = StdRng::seed_from_u64(2);
        let parent1: Profile = vec![3, 2, 3, 0, 1, 2, 1, 0];
        let parent2: Profile = vec![0, 1, 2, 3, 3, 0, 2, 2];

        let (child1, child2) = crossover.apply(&mut rng, &parent1, &parent2);
        for i in 0..parent1.len() {
            let sum = (parent1[i] + parent2[i]) % 4;
            let product = (parent1[i] * parent2[i]) % 4;
            let pair = (child1[i], child2[i]);
            assert!(
                pair == (sum, product) || pair == (product, sum),
                "position {} got {:?}, expected a sum/product pairing",
                i,
                pair
            );
        }
    }

    #[test]
    fn test_crossover_values_stay_below_modulus() {
        let crossover = SumProductCrossover::new(0, 3);
        let mut rng = StdRng::seed_from_u64(3);
        let parent1: Profile = vec![3; 16];
        let parent2: Profile = vec![3; 16];

        let (child1, child2) = crossover.apply(&mut rng, &parent1, &parent2);
        assert!(child1.iter().chain(&child2).all(|&g| g < 4));
    }

    #[test]
    fn test_mutation_probability_zero_is_identity() {
        let mutation = SwapShiftMutation::new(0.0, 0, 3);
        let mut rng = StdRng::seed_from_u64(4);
        let original: Profile = vec![3, 2, 3, 0, 1, 2];
        let mut profile = original.clone();

        mutation.apply(&mut rng, &mut profile);
        assert_eq!(profile, original);
    }

    #[test]
    fn test_mutation_probability_one_touches_every_position() {
        let mutation = SwapShiftMutation::new(1.0, 0, 3);
        let original: Profile = vec![0, 0, 0, 0, 0, 0, 0, 0];

        // A swap can be a no-op but a shift changes a zero 75% of the time;
        // across seeds the profile cannot stay all-zero throughout.
        let mut changed = false;
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut profile = original.clone();
            mutation.apply(&mut rng, &mut profile);
            assert_eq!(profile.len(), original.len());
            assert!(profile.iter().all(|&g| g <= 3));
            changed |= profile != original;
        }
        assert!(changed);
    }

    #[test]
    fn test_mutation_keeps_values_in_range() {
        let mutation = SwapShiftMutation::new(1.0, 0, 3);
        let mut rng = StdRng::seed_from_u64(5);
        let mut profile: Profile = vec![3, 2, 3, 0, 1, 2];
        for _ in 0..100 {
            mutation.apply(&mut rng, &mut profile);
            assert!(profile.iter().all(|&g| g <= 3));
        }
    }

    #[test]
    fn test_mutation_on_empty_profile_is_a_noop() {
        let mutation = SwapShiftMutation::new(1.0, 0, 3);
        let mut rng = StdRng::seed_from_u64(6);
        let mut empty: Profile = vec![];
        mutation.apply(&mut rng, &mut empty);
        assert!(empty.is_empty());
    }
}
