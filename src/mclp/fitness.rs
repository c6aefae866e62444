//! Covered-demand objective.

use super::candidate::Candidate;
use crate::coverage::CoverageMatrix;
use fixedbitset::FixedBitSet;

/// Total demand covered by the open facilities of `candidate`.
///
/// Takes the union of the open facilities' coverage sets and sums each
/// covered point's weight exactly once. The empty candidate scores 0.0.
pub fn fitness(candidate: &Candidate, coverage: &CoverageMatrix, demands: &[f64]) -> f64 {
    coverage.covered_weight(candidate.positions(), demands)
}

/// Weight of the points in `row` not already in `covered`.
pub(crate) fn marginal_gain(row: &FixedBitSet, covered: &FixedBitSet, demands: &[f64]) -> f64 {
    row.difference(covered).map(|i| demands[i]).sum()
}

/// Weight covered by `candidate` that would be lost by closing each open
/// facility on its own, as `(position, lost_weight)` pairs.
pub(crate) fn unique_contributions(
    candidate: &Candidate,
    coverage: &CoverageMatrix,
    demands: &[f64],
) -> Vec<(usize, f64)> {
    let mut reach = vec![0u32; coverage.point_count()];
    for pos in candidate.positions() {
        for p in coverage.row(pos).ones() {
            reach[p] += 1;
        }
    }
    candidate
        .positions()
        .map(|pos| {
            let lost = coverage
                .row(pos)
                .ones()
                .filter(|&p| reach[p] == 1)
                .map(|p| demands[p])
                .sum::<f64>();
            (pos, lost)
        })
        .collect()
}
