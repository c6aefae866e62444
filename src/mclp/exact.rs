//! Exact branch and bound for small instances.
//!
//! Enumerates subsets of facility positions in lexicographic order: each
//! node of the search tree is a feasible selection, and its children open
//! one more facility at a higher position. A node's subtree is skipped when
//! an optimistic bound on anything it can still reach falls strictly below
//! the incumbent.
//!
//! The bound is the node's covered weight plus the sum of the `slots`
//! largest marginal gains among the remaining positions. Coverage is
//! submodular, so no combination of `slots` further facilities can gain
//! more than that.
//!
//! Nodes are ranked with the same order as the genetic algorithm
//! ([`compare`]), and equal bounds are never pruned, so ties between optimal
//! selections resolve exactly as they would by exhaustive enumeration.

use super::candidate::Candidate;
use super::fitness::marginal_gain;
use crate::coverage::{weight_of, CoverageMatrix};
use crate::ga::{compare, Individual, Termination};
use fixedbitset::FixedBitSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// How often (in nodes) the deadline and cancellation flag are polled.
const POLL_INTERVAL: u64 = 1024;

/// Outcome of a branch-and-bound search.
#[derive(Debug, Clone)]
pub struct ExactResult {
    /// Best selection found; optimal unless `interrupted` is set.
    pub best: Candidate,
    /// Number of search-tree nodes visited.
    pub nodes: u64,
    /// Set when the search stopped before exhausting the tree.
    pub interrupted: Option<Termination>,
}

/// Depth-first branch and bound over facility subsets of size ≤ `budget`.
pub struct BranchAndBound<'a> {
    coverage: &'a CoverageMatrix,
    demands: &'a [f64],
    budget: usize,
    deadline: Option<Instant>,
    cancel: Option<&'a AtomicBool>,
}

struct Session {
    best: Candidate,
    nodes: u64,
    interrupted: Option<Termination>,
}

impl<'a> BranchAndBound<'a> {
    pub fn new(coverage: &'a CoverageMatrix, demands: &'a [f64], budget: usize) -> Self {
        Self {
            coverage,
            demands,
            budget,
            deadline: None,
            cancel: None,
        }
    }

    /// Stops the search at `deadline`, keeping the incumbent.
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Stops the search once `flag` is raised, keeping the incumbent.
    pub fn with_cancel(mut self, flag: Option<&'a AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    /// Runs the search.
    pub fn solve(&self) -> ExactResult {
        let n = self.coverage.facility_count();
        let mut session = Session {
            best: Candidate::empty(n),
            nodes: 0,
            interrupted: None,
        };

        let covered = FixedBitSet::with_capacity(self.coverage.point_count());
        let mut open = Vec::with_capacity(self.budget.min(n));
        self.explore(&mut session, 0, &mut open, &covered, 0.0);

        tracing::debug!(
            nodes = session.nodes,
            best = session.best.fitness(),
            interrupted = ?session.interrupted,
            "branch and bound finished"
        );

        ExactResult {
            best: session.best,
            nodes: session.nodes,
            interrupted: session.interrupted,
        }
    }

    fn explore(
        &self,
        session: &mut Session,
        next: usize,
        open: &mut Vec<usize>,
        covered: &FixedBitSet,
        weight: f64,
    ) {
        if session.interrupted.is_some() {
            return;
        }
        session.nodes += 1;
        if session.nodes % POLL_INTERVAL == 0 {
            session.interrupted = self.poll();
            if session.interrupted.is_some() {
                return;
            }
        }

        let n = self.coverage.facility_count();
        let mut node = Candidate::from_positions(n, open.iter().copied());
        node.set_fitness(weight);
        if compare(&node, &session.best).is_lt() {
            session.best = node;
        }

        let slots = self.budget.saturating_sub(open.len());
        if slots == 0 || next >= n {
            return;
        }

        let incumbent = session.best.fitness();
        let tolerance = 1e-9 * incumbent.abs().max(1.0);
        if weight + self.optimistic_gain(next, covered, slots) < incumbent - tolerance {
            return;
        }

        for pos in next..n {
            let mut child = covered.clone();
            child.union_with(self.coverage.row(pos));
            let child_weight = weight_of(&child, self.demands);

            open.push(pos);
            self.explore(session, pos + 1, open, &child, child_weight);
            open.pop();

            if session.interrupted.is_some() {
                return;
            }
        }
    }

    /// Sum of the `slots` largest marginal gains among positions `next..`.
    fn optimistic_gain(&self, next: usize, covered: &FixedBitSet, slots: usize) -> f64 {
        let mut gains: Vec<f64> = (next..self.coverage.facility_count())
            .map(|pos| marginal_gain(self.coverage.row(pos), covered, self.demands))
            .collect();
        gains.sort_by(|a, b| b.total_cmp(a));
        gains.iter().take(slots).sum()
    }

    fn poll(&self) -> Option<Termination> {
        if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Some(Termination::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(Termination::TimeLimit);
        }
        None
    }
}
