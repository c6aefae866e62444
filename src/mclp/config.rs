//! Solver configuration.

use crate::error::SolveError;
use crate::ga::GaConfig;

/// Which search engine solves the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Exact search when the subset space is within
    /// [`SolverConfig::exact_subset_limit`], the genetic algorithm otherwise.
    #[default]
    Auto,
    /// Always run the genetic algorithm.
    Genetic,
    /// Always run branch and bound.
    Exact,
}

/// How a candidate over budget is brought back to `max_facilities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepairStrategy {
    /// Close open positions from the highest downward.
    #[default]
    DropHighest,
    /// Repeatedly close the facility whose removal loses the least uniquely
    /// covered demand; ties close the highest position.
    DropLeastMarginal,
}

/// Configuration of a [`Solver`](super::Solver).
///
/// ```
/// use u_mclp::mclp::{SolverConfig, Strategy};
/// use u_mclp::ga::GaConfig;
///
/// let config = SolverConfig::default()
///     .with_strategy(Strategy::Genetic)
///     .with_ga(GaConfig::fast().with_seed(7));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SolverConfig {
    /// Genetic algorithm parameters.
    pub ga: GaConfig,

    /// Search engine selection.
    pub strategy: Strategy,

    /// Repair operator used by the genetic algorithm.
    pub repair: RepairStrategy,

    /// Largest number of feasible subsets `Σ_{i≤k} C(n, i)` for which
    /// [`Strategy::Auto`] picks exact search.
    pub exact_subset_limit: u64,

    /// Locally improve the GA's best (fill unused budget, then single
    /// swaps) before returning it. Exact results are never touched.
    pub polish: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            ga: GaConfig::default(),
            strategy: Strategy::Auto,
            repair: RepairStrategy::DropHighest,
            exact_subset_limit: 20_000,
            polish: true,
        }
    }
}

impl SolverConfig {
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_repair(mut self, repair: RepairStrategy) -> Self {
        self.repair = repair;
        self
    }

    pub fn with_exact_subset_limit(mut self, limit: u64) -> Self {
        self.exact_subset_limit = limit;
        self
    }

    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }

    /// Shorthand for seeding the genetic algorithm.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ga.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`SolveError::InvalidConfig`] from the GA parameters.
    pub fn validate(&self) -> Result<(), SolveError> {
        self.ga.validate()
    }

    /// Resolves [`Strategy::Auto`] for an instance with `facility_count`
    /// candidates and budget `budget`.
    pub fn resolve_strategy(&self, facility_count: usize, budget: usize) -> Strategy {
        match self.strategy {
            Strategy::Auto => {
                if subset_count(facility_count, budget, self.exact_subset_limit)
                    <= self.exact_subset_limit
                {
                    Strategy::Exact
                } else {
                    Strategy::Genetic
                }
            }
            other => other,
        }
    }
}

/// `Σ_{i=0..=k} C(n, i)`, saturating once it exceeds `cap`.
pub(crate) fn subset_count(n: usize, k: usize, cap: u64) -> u64 {
    let k = k.min(n) as u64;
    let n = n as u64;
    let mut total: u64 = 1;
    let mut term: u64 = 1;
    for i in 0..k {
        // C(n, i+1) = C(n, i) * (n - i) / (i + 1); exact at every step.
        term = match term.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return u64::MAX,
        };
        total = total.saturating_add(term);
        if total > cap {
            return total;
        }
    }
    total
}
