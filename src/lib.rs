//! Maximal Covering Location solver.
//!
//! Chooses up to `max_facilities` sites among candidate points so that the
//! demand weight lying within `coverage_radius` of an open site is maximized.
//!
//! - **Coverage**: Precomputed point-by-site coverage as bit rows
//!   ([`coverage`]).
//! - **Genetic Algorithm (GA)**: Generic evolutionary engine with pluggable
//!   selection, crossover, mutation and repair ([`ga`]).
//! - **MCLP**: The covering problem on top of the GA, an exact branch and
//!   bound for small instances, and the [`Solver`] tying them together
//!   ([`mclp`]).
//! - **Model**: Request and result contract ([`model`]).
//!
//! # Example
//!
//! ```
//! use u_mclp::{OptimizationRequest, Solver, SolverConfig};
//!
//! let request = OptimizationRequest::new(
//!     vec![(0.0, 0.0), (1.0, 0.0), (5.0, 5.0)],
//!     vec![1.0, 2.0, 3.0],
//!     vec![0, 1, 2],
//!     1,
//!     1.5,
//! );
//! let report = Solver::new(SolverConfig::default().with_seed(7))
//!     .solve(&request)
//!     .unwrap();
//! assert_eq!(report.result.solution, vec![0]);
//! ```

pub mod coverage;
pub mod error;
pub mod ga;
pub mod geometry;
pub mod mclp;
pub mod model;
pub mod random;

pub use error::SolveError;
pub use geometry::Point;
pub use mclp::{solve, SolveReport, Solver, SolverConfig, Strategy};
pub use model::{OptimizationRequest, OptimizationResult};
