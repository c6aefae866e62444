//! Selection strategies for the GA.
//!
//! Selection determines which individuals are chosen as parents for
//! crossover. Different strategies provide different selection pressure.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::{compare, Fitness, Individual};
use rand::seq::index;
use rand::Rng;

/// Selection strategy for choosing parents.
///
/// All strategies assume **maximization** (higher fitness = better) and
/// break fitness ties with [`Individual::tie_break`].
///
/// # Examples
///
/// ```
/// use u_mclp::ga::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Roulette wheel (fitness-proportionate)
/// let sel = Selection::Roulette;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: draw `k` distinct individuals, select the best.
    ///
    /// Contestants are sampled without replacement, so a tournament of the
    /// whole population always returns its best member.
    /// - k=2: light pressure (good for diversity)
    /// - k=3-5: moderate pressure (typical default)
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Weights are fitness shifted by the population minimum, so the worst
    /// individual keeps only an epsilon chance.
    ///
    /// # Complexity
    /// O(n) per selection (linear scan)
    Roulette,

    /// Rank-based selection.
    ///
    /// Individuals are ordered best first and selection probability is
    /// proportional to `n - rank`, not raw fitness value.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        self.mating_pool(population, 1, rng)[0]
    }

    /// Draws `size` parent indices for one generation.
    ///
    /// Per-population work (roulette weights, the rank order) is done once
    /// for the whole pool.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn mating_pool<I: Individual, R: Rng>(
        &self,
        population: &[I],
        size: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => (0..size)
                .map(|_| tournament(population, *k, rng))
                .collect(),
            Selection::Roulette => {
                let weights = roulette_weights(population);
                (0..size).map(|_| spin(&weights, rng)).collect()
            }
            Selection::Rank => {
                let order = rank_order(population);
                let n = order.len();
                // rank 0 (best) gets weight n
                let weights: Vec<f64> = (0..n).map(|rank| (n - rank) as f64).collect();
                (0..size).map(|_| order[spin(&weights, rng)]).collect()
            }
        }
    }
}

/// Tournament selection without replacement: sample k distinct
/// individuals, return the best.
fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let k = k.clamp(1, n);

    let mut contestants = index::sample(rng, n, k).into_iter();
    let mut best_idx = contestants.next().unwrap_or(0);
    for idx in contestants {
        if compare(&population[idx], &population[best_idx]).is_lt() {
            best_idx = idx;
        }
    }
    best_idx
}

/// Min-shifted fitness weights.
///
/// weight_i = fitness_i - min_fitness + epsilon
fn roulette_weights<I: Individual>(population: &[I]) -> Vec<f64> {
    let fitnesses: Vec<f64> = population
        .iter()
        .map(|ind| ind.fitness().to_f64())
        .collect();

    let min_fitness = fitnesses.iter().cloned().fold(f64::INFINITY, f64::min);
    let epsilon = 1e-10;

    fitnesses
        .iter()
        .map(|&f| {
            let w = f - min_fitness + epsilon;
            if w.is_finite() && w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect()
}

/// Population indices, best first.
fn rank_order<I: Individual>(population: &[I]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| compare(&population[a], &population[b]));
    order
}

/// Spins a wheel with the given slot weights and returns the slot.
fn spin<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let n = weights.len();
    if n == 1 {
        return 0;
    }

    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}
