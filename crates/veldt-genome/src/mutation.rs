//! Mutation operators applied to newborn genomes.

use crate::genome::GENE_RANGE;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use veldt_core::MutationVariant;

/// A mutation operator with its mutation-count bounds, fixed at birth.
///
/// Variants are a closed set chosen once at simulation construction; both
/// share the same contract: mutate a uniformly chosen number of distinct
/// gene positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationStrategy {
    /// Replace each selected gene with a fresh value that differs from it
    Random { min: usize, max: usize },
    /// Shift each selected gene by +1 or -1, modulo the gene range
    IncrementDecrement { min: usize, max: usize },
}

impl MutationStrategy {
    pub fn from_config(variant: MutationVariant, min: usize, max: usize) -> Self {
        match variant {
            MutationVariant::Random => Self::Random { min, max },
            MutationVariant::IncrementDecrement => Self::IncrementDecrement { min, max },
        }
    }

    fn bounds(&self) -> (usize, usize) {
        match *self {
            Self::Random { min, max } | Self::IncrementDecrement { min, max } => (min, max),
        }
    }

    /// Mutate the genes in place.
    ///
    /// Picks a count uniformly in the configured bounds, then that many
    /// distinct gene indices uniformly without replacement.
    pub fn mutate(&self, genes: &mut [u8], rng: &mut ChaCha8Rng) {
        let (min, max) = self.bounds();
        let count = rng.gen_range(min..=max).min(genes.len());
        if count == 0 {
            return;
        }

        let mut indices: Vec<usize> = (0..genes.len()).collect();
        indices.shuffle(rng);

        for &index in indices.iter().take(count) {
            genes[index] = match self {
                Self::Random { .. } => {
                    // Uniform over the values that differ from the original
                    (genes[index] + rng.gen_range(1..GENE_RANGE)) % GENE_RANGE
                }
                Self::IncrementDecrement { .. } => {
                    let shift = if rng.gen_bool(0.5) { 1 } else { GENE_RANGE - 1 };
                    (genes[index] + shift) % GENE_RANGE
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn changed_positions(before: &[u8], after: &[u8]) -> Vec<usize> {
        before
            .iter()
            .zip(after)
            .enumerate()
            .filter(|(_, (b, a))| b != a)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_fixed_count_changes_exactly_that_many_genes() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let strategy = MutationStrategy::Random { min: 3, max: 3 };

        for _ in 0..50 {
            let before = vec![0, 1, 2, 3, 4, 5, 6, 7];
            let mut after = before.clone();
            strategy.mutate(&mut after, &mut rng);
            assert_eq!(changed_positions(&before, &after).len(), 3);
        }
    }

    #[test]
    fn test_increment_decrement_moves_by_one_mod_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let strategy = MutationStrategy::IncrementDecrement { min: 4, max: 4 };

        for _ in 0..50 {
            let before = vec![0, 7, 3, 5, 1, 6, 2, 4];
            let mut after = before.clone();
            strategy.mutate(&mut after, &mut rng);

            let changed = changed_positions(&before, &after);
            assert_eq!(changed.len(), 4);
            for index in changed {
                let diff = (after[index] + GENE_RANGE - before[index]) % GENE_RANGE;
                assert!(diff == 1 || diff == GENE_RANGE - 1);
            }
        }
    }

    #[test]
    fn test_zero_mutations_is_a_no_op() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let strategy = MutationStrategy::Random { min: 0, max: 0 };
        let before = vec![1, 2, 3];
        let mut after = before.clone();
        strategy.mutate(&mut after, &mut rng);
        assert_eq!(before, after);
    }

    proptest! {
        #[test]
        fn prop_mutation_count_stays_in_bounds(
            seed in any::<u64>(),
            len in 1usize..24,
            min in 0usize..4,
            spread in 0usize..4,
        ) {
            let max = (min + spread).min(len);
            let min = min.min(max);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut genes: Vec<u8> = (0..len).map(|i| (i % 8) as u8).collect();
            let before = genes.clone();

            let strategy = MutationStrategy::Random { min, max };
            strategy.mutate(&mut genes, &mut rng);

            let changed = changed_positions(&before, &genes).len();
            prop_assert!(changed >= min.min(len) && changed <= max);
            prop_assert!(genes.iter().all(|&g| g < GENE_RANGE));
        }

        #[test]
        fn prop_increment_decrement_preserves_range(
            seed in any::<u64>(),
            genes in proptest::collection::vec(0u8..8, 1..24),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut mutated = genes.clone();
            let strategy = MutationStrategy::IncrementDecrement { min: 1, max: genes.len() };
            strategy.mutate(&mut mutated, &mut rng);
            prop_assert_eq!(mutated.len(), genes.len());
            prop_assert!(mutated.iter().all(|&g| g < GENE_RANGE));
        }
    }
}
