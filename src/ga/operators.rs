//! Generic bit-vector genetic operators.
//!
//! Crossover and mutation operators for fixed-length binary chromosomes
//! stored as [`FixedBitSet`]s. They know nothing about what a bit means;
//! feasibility constraints are restored afterwards by the problem's repair
//! step.
//!
//! # Crossover Operators
//!
//! - [`uniform_crossover`]: each gene drawn from either parent with p = 0.5
//!
//! # Mutation Operators
//!
//! - [`bit_flip_mutation`]: independent flip per gene, O(n)
//!
//! # References
//!
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"
//! - Bäck (1993), "Optimal Mutation Rates in Genetic Search"

use fixedbitset::FixedBitSet;
use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Uniform crossover for bit vectors.
///
/// For every position a fair coin decides whether child 1 takes the gene of
/// parent 1 (and child 2 that of parent 2) or the other way around. Genes on
/// which the parents agree are inherited unchanged by both children.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths.
pub fn uniform_crossover<R: Rng>(
    parent1: &FixedBitSet,
    parent2: &FixedBitSet,
    rng: &mut R,
) -> (FixedBitSet, FixedBitSet) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    let mut child1 = FixedBitSet::with_capacity(n);
    let mut child2 = FixedBitSet::with_capacity(n);

    for i in 0..n {
        let (a, b) = (parent1.contains(i), parent2.contains(i));
        if rng.random::<bool>() {
            child1.set(i, a);
            child2.set(i, b);
        } else {
            child1.set(i, b);
            child2.set(i, a);
        }
    }

    (child1, child2)
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Flips every gene independently with probability `rate`.
///
/// Returns the number of flipped genes.
///
/// # Complexity
/// O(n)
pub fn bit_flip_mutation<R: Rng>(genes: &mut FixedBitSet, rate: f64, rng: &mut R) -> usize {
    if rate <= 0.0 {
        return 0;
    }
    let rate = rate.min(1.0);

    let mut flipped = 0;
    for i in 0..genes.len() {
        if rng.random_bool(rate) {
            genes.toggle(i);
            flipped += 1;
        }
    }
    flipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn bits(n: usize, ones: &[usize]) -> FixedBitSet {
        let mut b = FixedBitSet::with_capacity(n);
        for &i in ones {
            b.insert(i);
        }
        b
    }

    #[test]
    fn test_uniform_crossover_preserves_agreement() {
        let p1 = bits(8, &[0, 1, 2, 5]);
        let p2 = bits(8, &[0, 3, 5, 7]);
        let mut rng = create_rng(42);

        for _ in 0..50 {
            let (c1, c2) = uniform_crossover(&p1, &p2, &mut rng);
            // Both parents set 0 and 5; neither sets 4 or 6.
            for c in [&c1, &c2] {
                assert!(c.contains(0) && c.contains(5));
                assert!(!c.contains(4) && !c.contains(6));
            }
        }
    }

    #[test]
    fn test_uniform_crossover_conserves_genes() {
        let p1 = bits(10, &[1, 2, 3]);
        let p2 = bits(10, &[3, 4, 8, 9]);
        let mut rng = create_rng(3);

        let (c1, c2) = uniform_crossover(&p1, &p2, &mut rng);
        // Each position is a swap or a copy, so per-position totals match.
        for i in 0..10 {
            let parents = p1.contains(i) as u8 + p2.contains(i) as u8;
            let children = c1.contains(i) as u8 + c2.contains(i) as u8;
            assert_eq!(parents, children, "position {i}");
        }
    }

    #[test]
    fn test_uniform_crossover_identical_parents() {
        let p = bits(6, &[1, 4]);
        let mut rng = create_rng(1);
        let (c1, c2) = uniform_crossover(&p, &p, &mut rng);
        assert_eq!(c1, p);
        assert_eq!(c2, p);
    }

    #[test]
    #[should_panic(expected = "parents must have equal length")]
    fn test_uniform_crossover_length_mismatch() {
        let mut rng = create_rng(1);
        uniform_crossover(&bits(3, &[]), &bits(4, &[]), &mut rng);
    }

    #[test]
    fn test_bit_flip_zero_rate() {
        let mut g = bits(16, &[2, 3]);
        let before = g.clone();
        let mut rng = create_rng(42);
        assert_eq!(bit_flip_mutation(&mut g, 0.0, &mut rng), 0);
        assert_eq!(g, before);
    }

    #[test]
    fn test_bit_flip_full_rate_inverts() {
        let mut g = bits(5, &[0, 3]);
        let mut rng = create_rng(42);
        assert_eq!(bit_flip_mutation(&mut g, 1.0, &mut rng), 5);
        assert_eq!(g.ones().collect::<Vec<_>>(), vec![1, 2, 4]);
    }

    #[test]
    fn test_bit_flip_rate_is_per_gene() {
        let mut rng = create_rng(9);
        let mut total = 0;
        for _ in 0..200 {
            let mut g = FixedBitSet::with_capacity(100);
            total += bit_flip_mutation(&mut g, 0.1, &mut rng);
        }
        // Expected 2000 flips over 20 000 genes.
        assert!((1700..2300).contains(&total), "got {total} flips");
    }
}
