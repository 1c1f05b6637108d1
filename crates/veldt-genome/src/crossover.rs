//! Energy-weighted crossover between two parent genomes.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// Combine two equal-length parent gene sequences into a child sequence.
///
/// The parent with more energy contributes a contiguous run from one end of
/// its own sequence, sized by its share of the combined parental energy
/// (rounded to nearest); the other parent supplies the remaining genes from
/// the complementary end of its own sequence. A fair coin decides which end
/// the stronger parent contributes. On equal energy the second parent counts
/// as the stronger one.
pub fn crossover(
    first_genes: &[u8],
    first_energy: i32,
    second_genes: &[u8],
    second_energy: i32,
    rng: &mut ChaCha8Rng,
) -> Vec<u8> {
    debug_assert_eq!(first_genes.len(), second_genes.len());
    debug_assert!(first_energy + second_energy > 0);

    let length = first_genes.len();
    let (stronger, stronger_energy, weaker) = if first_energy > second_energy {
        (first_genes, first_energy, second_genes)
    } else {
        (second_genes, second_energy, first_genes)
    };

    let total = (first_energy + second_energy) as f64;
    let stronger_share = ((stronger_energy as f64 / total) * length as f64).round() as usize;
    let stronger_share = stronger_share.min(length);
    let weaker_share = length - stronger_share;

    let stronger_from_head = rng.gen_bool(0.5);
    trace!(
        stronger_share,
        stronger_from_head,
        "crossing over parent genomes"
    );

    let mut child = Vec::with_capacity(length);
    if stronger_from_head {
        child.extend_from_slice(&stronger[..stronger_share]);
        child.extend_from_slice(&weaker[stronger_share..]);
    } else {
        child.extend_from_slice(&weaker[..weaker_share]);
        child.extend_from_slice(&stronger[weaker_share..]);
    }
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    // Pins the split-from-opposite-ends convention: the stronger parent's run
    // comes from one end of its own sequence and the weaker parent fills in
    // from the complementary end of its own sequence. Both coin orientations
    // must show up across seeds, and nothing else may ever be produced.
    #[test]
    fn test_child_is_one_of_the_two_end_splits() {
        let stronger = [7, 6, 5, 4, 3, 2, 1, 0];
        let weaker = [0, 1, 2, 3, 4, 5, 6, 7];

        // 75 / (75 + 25) * 8 = 6 genes from the stronger parent
        let head_split: Vec<u8> = [&stronger[..6], &weaker[6..]].concat();
        let tail_split: Vec<u8> = [&weaker[..2], &stronger[2..]].concat();

        let mut seen_head = false;
        let mut seen_tail = false;
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let child = crossover(&stronger, 75, &weaker, 25, &mut rng);
            if child == head_split {
                seen_head = true;
            } else if child == tail_split {
                seen_tail = true;
            } else {
                panic!("unexpected child sequence: {child:?}");
            }
        }
        assert!(seen_head && seen_tail);
    }

    #[test]
    fn test_share_is_rounded_to_nearest() {
        let stronger = [7; 8];
        let weaker = [1; 8];

        // 60 / 100 * 8 = 4.8, rounds to 5, whichever end the coin picks
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..16 {
            let child = crossover(&stronger, 60, &weaker, 40, &mut rng);
            assert_eq!(child.iter().filter(|&&g| g == 7).count(), 5);
        }
    }

    #[test]
    fn test_whole_genome_goes_to_a_dominant_parent() {
        let stronger = [3; 4];
        let weaker = [5; 4];

        // 99 / 100 * 4 rounds to 4: the weaker parent contributes nothing
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let child = crossover(&stronger, 99, &weaker, 1, &mut rng);
        assert_eq!(child, vec![3; 4]);
    }

    #[test]
    fn test_child_length_matches_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for length in [1usize, 2, 7, 32] {
            let a: Vec<u8> = vec![3; length];
            let b: Vec<u8> = vec![4; length];
            let child = crossover(&a, 30, &b, 20, &mut rng);
            assert_eq!(child.len(), length);
        }
    }
}
