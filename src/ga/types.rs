//! Core trait definitions for the GA framework.
//!
//! The two central traits, [`Individual`] and [`GaProblem`], define the
//! contract between the generic GA engine and the problem implementation.

use rand::Rng;
use std::cmp::Ordering;

/// Marker trait for fitness values.
///
/// Fitness must support comparison and be cheaply copyable.
/// Higher fitness is considered better (maximization).
///
/// Implemented for `f64`.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Converts the fitness to `f64` for logging and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

/// A candidate solution in the GA population.
///
/// Individuals carry their own fitness value. The GA framework calls
/// [`GaProblem::evaluate`] to compute fitness, then stores it via
/// [`set_fitness`](Individual::set_fitness).
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct MySolution {
///     genes: Vec<bool>,
///     fitness: f64,
/// }
///
/// impl Individual for MySolution {
///     type Fitness = f64;
///     fn fitness(&self) -> f64 { self.fitness }
///     fn set_fitness(&mut self, f: f64) { self.fitness = f; }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Returns the current fitness of this individual.
    fn fitness(&self) -> Self::Fitness;

    /// Sets the fitness of this individual.
    ///
    /// Called by the GA framework after evaluation.
    fn set_fitness(&mut self, fitness: Self::Fitness);

    /// Orders two individuals whose fitness compares equal.
    ///
    /// `Less` means `self` is preferred. The default treats them as
    /// indistinguishable; implementations that need fully deterministic
    /// outcomes should impose a total order here.
    fn tie_break(&self, _other: &Self) -> Ordering {
        Ordering::Equal
    }
}

/// Ranks two individuals, best first.
///
/// Returns `Less` when `a` is better than `b`: higher fitness wins, and
/// equal (or incomparable) fitness falls through to
/// [`Individual::tie_break`].
pub fn compare<I: Individual>(a: &I, b: &I) -> Ordering {
    match b.fitness().partial_cmp(&a.fitness()) {
        Some(Ordering::Equal) | None => a.tie_break(b),
        Some(ord) => ord,
    }
}

/// Defines a GA optimization problem.
///
/// This is the main trait the problem layer implements to plug its logic
/// into the generic GA framework. It covers:
///
/// 1. **Initialization**: How to create random individuals
/// 2. **Evaluation**: How to compute fitness
/// 3. **Crossover**: How to recombine two parents
/// 4. **Mutation**: How to perturb an individual
/// 5. **Repair**: How to restore feasibility after 3 and 4
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the GA runner may evaluate
/// individuals in parallel using rayon.
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random individual.
    ///
    /// Called during population initialization. The implementation should
    /// produce a valid (but not necessarily good) solution.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns its fitness.
    ///
    /// This is typically the most expensive operation. The GA framework
    /// may call this in parallel across the population, so it must not
    /// depend on evaluation order.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Produces one or two offspring by recombining two parents.
    ///
    /// The default implementation clones both parents (no crossover).
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone(), parent2.clone()]
    }

    /// Mutates an individual in place.
    ///
    /// `rate` is the configured mutation rate; how it is applied (per
    /// individual or per gene) is up to the problem. The default is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rate: f64, _rng: &mut R) {}

    /// Restores feasibility of an individual after crossover or mutation.
    ///
    /// The default is a no-op.
    fn repair(&self, _individual: &mut Self::Individual) {}

    /// Individuals placed in the initial population before the random ones.
    ///
    /// Extras beyond `population_size` are dropped. Seeds are repaired and
    /// evaluated like every other member. The default provides none.
    fn seed_individuals(&self) -> Vec<Self::Individual> {
        Vec::new()
    }
}
