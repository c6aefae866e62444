//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repair
//! → repeat.

use super::config::GaConfig;
use super::types::{compare, Fitness, GaProblem, Individual};
use crate::error::SolveError;
use crate::random::{create_rng, fresh_seed};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why an evolutionary run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// All `max_generations` generations were executed.
    MaxGenerations,
    /// Best fitness did not improve for `plateau_patience` generations.
    Plateau,
    /// The external cancellation flag was raised.
    Cancelled,
    /// The wall-clock limit was reached.
    TimeLimit,
}

/// Result of a GA optimization run.
///
/// Contains the best solution found, along with statistics about the
/// evolutionary process.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Total number of generations executed.
    pub generations: usize,

    /// Why the loop stopped.
    pub termination: Termination,

    /// Number of calls to [`GaProblem::evaluate`].
    pub evaluations: usize,

    /// Seed the generator was created from.
    pub seed: u64,

    /// Best fitness of the initial population, then the best-ever fitness
    /// at the end of each executed generation. Never decreases.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Errors
    /// [`SolveError::InvalidConfig`] if the configuration does not validate.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, SolveError> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before starting the next generation and returns the best solution
    /// found so far. Trajectory and counters stay consistent with the
    /// generations that actually completed.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>, SolveError> {
        config.validate()?;

        let started = Instant::now();
        let deadline = config
            .time_limit_ms
            .map(|ms| started + Duration::from_millis(ms));
        let seed = config.seed.unwrap_or_else(fresh_seed);
        let mut rng = create_rng(seed);
        let pop_size = config.population_size;
        let elite_count = config.elite_count;

        // 1. Initialize population
        let mut population: Vec<P::Individual> = problem.seed_individuals();
        population.truncate(pop_size);
        while population.len() < pop_size {
            population.push(problem.create_individual(&mut rng));
        }
        for ind in &mut population {
            problem.repair(ind);
        }

        // 2. Evaluate initial population
        evaluate_all(problem, &mut population, config.parallel);
        let mut evaluations = pop_size;

        // 3. Track best
        let mut best = population[best_index(&population)].clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness().to_f64());

        let mut stagnation_counter = 0usize;
        let mut generations = 0usize;
        let mut termination = Termination::MaxGenerations;

        // 4. Evolutionary loop
        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    termination = Termination::Cancelled;
                    break;
                }
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                termination = Termination::TimeLimit;
                break;
            }

            // Best first; stable sort keeps the order deterministic.
            population.sort_by(compare);

            let mut next_gen: Vec<P::Individual> = Vec::with_capacity(pop_size);
            next_gen.extend_from_slice(&population[..elite_count]);

            // Mating pool
            let pool = config
                .selection
                .mating_pool(&population, pop_size, &mut rng);

            let mut cursor = 0usize;
            while next_gen.len() < pop_size {
                let p1 = &population[pool[cursor % pop_size]];
                let p2 = &population[pool[(cursor + 1) % pop_size]];
                cursor += 2;

                let children = if rng.random_bool(config.crossover_rate) {
                    problem.crossover(p1, p2, &mut rng)
                } else {
                    vec![p1.clone(), p2.clone()]
                };

                for mut child in children {
                    if next_gen.len() >= pop_size {
                        break;
                    }
                    problem.repair(&mut child);
                    problem.mutate(&mut child, config.mutation_rate, &mut rng);
                    problem.repair(&mut child);
                    next_gen.push(child);
                }
            }

            // Elites keep their fitness; only offspring are evaluated.
            evaluate_all(problem, &mut next_gen[elite_count..], config.parallel);
            evaluations += pop_size - elite_count;

            population = next_gen;
            generations = gen + 1;

            let gen_best = &population[best_index(&population)];
            if compare(gen_best, &best).is_lt() {
                let old = best.fitness().to_f64();
                let new = gen_best.fitness().to_f64();
                if is_significant(old, new, config.convergence_threshold) {
                    stagnation_counter = 0;
                } else {
                    stagnation_counter += 1;
                }
                best = gen_best.clone();
            } else {
                stagnation_counter += 1;
            }

            fitness_history.push(best.fitness().to_f64());

            tracing::trace!(
                generation = generations,
                best = best.fitness().to_f64(),
                stagnation = stagnation_counter,
                "generation complete"
            );

            if config.plateau_patience > 0 && stagnation_counter >= config.plateau_patience {
                termination = Termination::Plateau;
                break;
            }
        }

        tracing::debug!(
            generations,
            evaluations,
            seed,
            best = best.fitness().to_f64(),
            ?termination,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ga run finished"
        );

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            termination,
            evaluations,
            seed,
            fitness_history,
        })
    }
}

/// Whether moving from `old` to `new` counts as progress.
fn is_significant(old: f64, new: f64, threshold: f64) -> bool {
    if new <= old {
        return false;
    }
    if threshold <= 0.0 || old == 0.0 || !old.is_finite() {
        return true;
    }
    (new - old).abs() / old.abs() >= threshold
}

fn evaluate_sequential<P: GaProblem>(problem: &P, individuals: &mut [P::Individual]) {
    for ind in individuals.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

/// Evaluate all given individuals.
///
/// Evaluation never touches the generator, so parallel and sequential
/// evaluation produce identical runs.
#[cfg(feature = "parallel")]
fn evaluate_all<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], parallel: bool) {
    use rayon::prelude::*;
    if parallel {
        individuals.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        evaluate_sequential(problem, individuals);
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], _parallel: bool) {
    evaluate_sequential(problem, individuals);
}

/// Index of the best individual; the first one wins a full tie.
fn best_index<I: Individual>(population: &[I]) -> usize {
    let mut best = 0;
    for i in 1..population.len() {
        if compare(&population[i], &population[best]).is_lt() {
            best = i;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================
