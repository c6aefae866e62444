//! Outgoing optimization result and its assembly.

use crate::ga::Individual;
use crate::mclp::Candidate;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result returned to the serving layer.
///
/// The fitness field is serialized as `Fitness` to match the published
/// response contract.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult {
    /// Run identifier.
    pub id: u64,
    /// Best fitness per generation; a single entry for exact solves.
    pub target: Vec<f64>,
    /// Total demand covered by `solution`.
    #[cfg_attr(feature = "serde", serde(rename = "Fitness"))]
    pub fitness: f64,
    /// Chosen facilities as point indices, in request order.
    pub solution: Vec<usize>,
}

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out process-unique run identifiers, starting at 1.
pub fn next_run_id() -> u64 {
    NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed)
}

/// Packages the best candidate and the trajectory into the response.
///
/// `facilities` maps candidate positions back to point indices.
///
/// # Panics
/// Panics if the candidate was encoded over more positions than
/// `facilities` holds.
pub fn assemble(
    best: &Candidate,
    trajectory: Vec<f64>,
    facilities: &[usize],
    request_id: u64,
) -> OptimizationResult {
    OptimizationResult {
        id: request_id,
        target: trajectory,
        fitness: best.fitness(),
        solution: best.positions().map(|pos| facilities[pos]).collect(),
    }
}
