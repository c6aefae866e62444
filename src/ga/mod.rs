//! Genetic Algorithm framework.
//!
//! A generic GA engine built on trait-based abstractions. A problem is
//! plugged in by implementing [`GaProblem`], which specifies how to create,
//! evaluate, crossover, mutate and repair individuals. The covering-location
//! problem in [`crate::mclp`] is one such implementation.
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with associated fitness type
//! - [`GaProblem`]: Problem definition: initialization, evaluation, operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, selection, presets)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final optimization result with statistics
//!
//! # Submodules
//!
//! - [`operators`]: Bit-vector crossover and mutation operators
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner, Termination};
pub use selection::Selection;
pub use types::{compare, Fitness, GaProblem, Individual};
