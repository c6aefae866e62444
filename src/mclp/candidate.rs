//! Candidate encoding: an indicator bit per candidate facility.

use crate::ga::Individual;
use fixedbitset::FixedBitSet;
use std::cmp::Ordering;

/// A set of open facilities, encoded over *positions* in the request's
/// `facilities` list (not over point indices).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    genes: FixedBitSet,
    fitness: f64,
}

impl Candidate {
    /// The empty selection over `facility_count` candidates.
    pub fn empty(facility_count: usize) -> Self {
        Self {
            genes: FixedBitSet::with_capacity(facility_count),
            fitness: 0.0,
        }
    }

    /// A selection with the given positions open.
    ///
    /// Fitness starts unset (`-inf`) until evaluated.
    ///
    /// # Panics
    /// Panics if a position is `>= facility_count`.
    pub fn from_positions<I>(facility_count: usize, positions: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut genes = FixedBitSet::with_capacity(facility_count);
        for p in positions {
            genes.insert(p);
        }
        Self::from_genes(genes)
    }

    pub(crate) fn from_genes(genes: FixedBitSet) -> Self {
        Self {
            genes,
            fitness: f64::NEG_INFINITY,
        }
    }

    pub fn genes(&self) -> &FixedBitSet {
        &self.genes
    }

    pub(crate) fn genes_mut(&mut self) -> &mut FixedBitSet {
        &mut self.genes
    }

    /// Length of the encoding (number of candidate facilities).
    pub fn facility_count(&self) -> usize {
        self.genes.len()
    }

    /// Whether no facility is open.
    pub fn is_empty(&self) -> bool {
        self.genes.is_clear()
    }

    /// Number of open facilities.
    pub fn open_count(&self) -> usize {
        self.genes.count_ones(..)
    }

    pub fn is_open(&self, position: usize) -> bool {
        self.genes.contains(position)
    }

    /// Open positions in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.genes.ones()
    }

    pub fn open(&mut self, position: usize) {
        self.genes.insert(position);
    }

    pub fn close(&mut self, position: usize) {
        self.genes.set(position, false);
    }

    /// Keeps the `max_open` lowest open positions and closes the rest.
    ///
    /// Returns the number of closed positions.
    pub fn truncate_to(&mut self, max_open: usize) -> usize {
        let excess: Vec<usize> = self.genes.ones().skip(max_open).collect();
        for &p in &excess {
            self.genes.set(p, false);
        }
        excess.len()
    }
}

impl Individual for Candidate {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Fewer open facilities first, then the lexicographically smaller
    /// vector of open positions.
    fn tie_break(&self, other: &Self) -> Ordering {
        self.open_count()
            .cmp(&other.open_count())
            .then_with(|| self.positions().cmp(other.positions()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::compare;

    fn scored(n: usize, positions: &[usize], fitness: f64) -> Candidate {
        let mut c = Candidate::from_positions(n, positions.iter().copied());
        c.set_fitness(fitness);
        c
    }

    #[test]
    fn test_empty() {
        let c = Candidate::empty(5);
        assert_eq!(c.facility_count(), 5);
        assert!(c.is_empty());
        assert_eq!(c.open_count(), 0);
        assert_eq!(c.fitness(), 0.0);
    }

    #[test]
    fn test_open_close() {
        let mut c = Candidate::from_positions(4, [1, 3]);
        assert_eq!(c.positions().collect::<Vec<_>>(), vec![1, 3]);
        c.open(0);
        c.close(3);
        assert_eq!(c.positions().collect::<Vec<_>>(), vec![0, 1]);
        assert!(c.is_open(0));
        assert!(!c.is_open(3));
    }

    #[test]
    fn test_truncate_drops_highest() {
        let mut c = Candidate::from_positions(8, [1, 2, 5, 7]);
        assert_eq!(c.truncate_to(2), 2);
        assert_eq!(c.positions().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(c.truncate_to(5), 0);
    }

    #[test]
    fn test_higher_fitness_wins() {
        let a = scored(3, &[0, 1], 5.0);
        let b = scored(3, &[2], 3.0);
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_parsimony_tie_break() {
        let a = scored(3, &[0, 1], 3.0);
        let b = scored(3, &[2], 3.0);
        assert_eq!(compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_lexicographic_tie_break() {
        let a = scored(3, &[0], 3.0);
        let b = scored(3, &[1], 3.0);
        let c = scored(3, &[2], 3.0);
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare(&a, &c), Ordering::Less);
        assert_eq!(compare(&b, &c), Ordering::Less);

        let d = scored(4, &[0, 3], 1.0);
        let e = scored(4, &[1, 2], 1.0);
        assert_eq!(compare(&d, &e), Ordering::Less);
    }

    #[test]
    fn test_identical_compare_equal() {
        let a = scored(3, &[1], 2.0);
        assert_eq!(compare(&a, &a.clone()), Ordering::Equal);
    }
}
