//! Maximal Covering Location Problem.
//!
//! Given demand points with weights, a set of candidate facility sites and a
//! coverage radius, open at most `max_facilities` sites so that the total
//! weight of points within the radius of an open site is as large as
//! possible.
//!
//! # Key Types
//!
//! - [`Candidate`]: A selection of open sites, encoded over candidate positions
//! - [`CoveringProblem`]: The problem as a [`GaProblem`](crate::ga::GaProblem)
//! - [`BranchAndBound`]: Exact search for small instances
//! - [`SolverConfig`]: Strategy choice, repair policy and GA parameters
//! - [`Solver`]: Validates a request, runs the search and assembles the result
//!
//! # Ranking
//!
//! Higher covered demand is better. Among equal fitness, fewer open
//! facilities win, then the lexicographically smaller list of positions.
//! Both engines rank with the same order, so for small instances the GA and
//! the exact search agree on which optimum to report.

mod candidate;
mod config;
mod exact;
mod fitness;
mod problem;
mod solver;

pub use candidate::Candidate;
pub use config::{RepairStrategy, SolverConfig, Strategy};
pub use exact::{BranchAndBound, ExactResult};
pub use fitness::fitness;
pub use problem::CoveringProblem;
pub use solver::{solve, SolveReport, Solver, StopReason};
