//! The covering-location problem as a [`GaProblem`].

use super::candidate::Candidate;
use super::config::RepairStrategy;
use super::fitness::{fitness, marginal_gain, unique_contributions};
use crate::coverage::{weight_of, CoverageMatrix};
use crate::ga::operators::{bit_flip_mutation, uniform_crossover};
use crate::ga::{GaProblem, Individual};
use fixedbitset::FixedBitSet;
use rand::seq::index;
use rand::Rng;

/// Binds a coverage matrix, demand weights and a facility budget into a
/// problem the GA runner can evolve.
///
/// Every candidate leaving [`GaProblem::repair`] has at most `budget` open
/// facilities.
#[derive(Debug, Clone)]
pub struct CoveringProblem<'a> {
    coverage: &'a CoverageMatrix,
    demands: &'a [f64],
    budget: usize,
    repair: RepairStrategy,
}

impl<'a> CoveringProblem<'a> {
    /// Creates the problem.
    ///
    /// `budget` is the maximum number of open facilities.
    pub fn new(
        coverage: &'a CoverageMatrix,
        demands: &'a [f64],
        budget: usize,
        repair: RepairStrategy,
    ) -> Self {
        Self {
            coverage,
            demands,
            budget,
            repair,
        }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Closes facilities until the budget holds, using the configured
    /// repair strategy.
    pub fn enforce_budget(&self, candidate: &mut Candidate) {
        if candidate.open_count() <= self.budget {
            return;
        }
        match self.repair {
            RepairStrategy::DropHighest => {
                candidate.truncate_to(self.budget);
            }
            RepairStrategy::DropLeastMarginal => self.drop_least_marginal(candidate),
        }
    }

    /// Greedy construction: repeatedly opens the closed site with the
    /// largest positive marginal gain (lowest position on ties) until the
    /// budget is spent or no site adds demand.
    ///
    /// The greedy selection for budget `k + 1` extends the one for `k`, so
    /// its fitness never decreases as the budget grows.
    pub fn greedy(&self) -> Candidate {
        let mut candidate = Candidate::empty(self.coverage.facility_count());
        let mut covered = FixedBitSet::with_capacity(self.coverage.point_count());
        self.fill(&mut candidate, &mut covered);
        candidate.set_fitness(weight_of(&covered, self.demands));
        candidate
    }

    /// Local improvement of an evaluated candidate.
    ///
    /// Spends any unused budget greedily, then applies the best improving
    /// single swap (close one open site, open one closed site) until no
    /// swap gains demand. Never decreases fitness or exceeds the budget.
    /// Returns true when the candidate improved.
    pub fn polish(&self, candidate: &mut Candidate) -> bool {
        let start = candidate.fitness();

        let mut covered = self.coverage.union_of(candidate.positions());
        self.fill(candidate, &mut covered);
        candidate.set_fitness(weight_of(&covered, self.demands));

        while let Some((out, into)) = self.best_swap(candidate) {
            let before = candidate.fitness();
            candidate.close(out);
            candidate.open(into);
            let after = fitness(candidate, self.coverage, self.demands);
            if after <= before {
                candidate.close(into);
                candidate.open(out);
                break;
            }
            candidate.set_fitness(after);
        }

        candidate.fitness() > start
    }

    fn fill(&self, candidate: &mut Candidate, covered: &mut FixedBitSet) {
        while candidate.open_count() < self.budget {
            match self.best_addition(candidate, covered) {
                Some(pos) => {
                    candidate.open(pos);
                    covered.union_with(self.coverage.row(pos));
                }
                None => break,
            }
        }
    }

    /// Closed position with the largest positive gain over `covered`.
    fn best_addition(&self, candidate: &Candidate, covered: &FixedBitSet) -> Option<usize> {
        let mut best = None;
        let mut best_gain = 0.0;
        for pos in 0..self.coverage.facility_count() {
            if candidate.is_open(pos) {
                continue;
            }
            let gain = marginal_gain(self.coverage.row(pos), covered, self.demands);
            if gain > best_gain {
                best_gain = gain;
                best = Some(pos);
            }
        }
        best
    }

    /// The `(close, open)` pair with the largest gain above tolerance.
    fn best_swap(&self, candidate: &Candidate) -> Option<(usize, usize)> {
        let current = candidate.fitness();
        let open: Vec<usize> = candidate.positions().collect();
        let mut best = None;
        let mut best_delta = 1e-9 * current.abs().max(1.0);

        for &out in &open {
            let rest = self
                .coverage
                .union_of(open.iter().copied().filter(|&p| p != out));
            let rest_weight = weight_of(&rest, self.demands);
            for into in 0..self.coverage.facility_count() {
                if candidate.is_open(into) {
                    continue;
                }
                let delta = rest_weight
                    + marginal_gain(self.coverage.row(into), &rest, self.demands)
                    - current;
                if delta > best_delta {
                    best_delta = delta;
                    best = Some((out, into));
                }
            }
        }
        best
    }

    fn drop_least_marginal(&self, candidate: &mut Candidate) {
        while candidate.open_count() > self.budget {
            let contributions = unique_contributions(candidate, self.coverage, self.demands);
            // Positions ascend, so `<=` leaves the highest position on ties.
            let mut victim = None;
            let mut least = f64::INFINITY;
            for (pos, lost) in contributions {
                if lost <= least {
                    least = lost;
                    victim = Some(pos);
                }
            }
            match victim {
                Some(pos) => candidate.close(pos),
                None => break,
            }
        }
    }
}

impl GaProblem for CoveringProblem<'_> {
    type Individual = Candidate;

    /// Uniformly random subset with cardinality uniform in
    /// `[1, min(budget, facility_count)]`.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Candidate {
        let n = self.coverage.facility_count();
        let upper = self.budget.min(n);
        if upper == 0 {
            return Candidate::empty(n);
        }
        let size = rng.random_range(1..=upper);
        Candidate::from_positions(n, index::sample(rng, n, size))
    }

    fn evaluate(&self, candidate: &Candidate) -> f64 {
        fitness(candidate, self.coverage, self.demands)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &Candidate,
        parent2: &Candidate,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let (a, b) = uniform_crossover(parent1.genes(), parent2.genes(), rng);
        vec![Candidate::from_genes(a), Candidate::from_genes(b)]
    }

    fn mutate<R: Rng>(&self, candidate: &mut Candidate, rate: f64, rng: &mut R) {
        bit_flip_mutation(candidate.genes_mut(), rate, rng);
    }

    fn repair(&self, candidate: &mut Candidate) {
        self.enforce_budget(candidate);
    }

    fn seed_individuals(&self) -> Vec<Candidate> {
        vec![self.greedy()]
    }
}
