//! Facility → demand-point coverage relation.
//!
//! [`build_coverage`] computes, once per request, one bitset per candidate
//! facility marking the demand points within the coverage radius. Rows are
//! indexed by *position* in the `facilities` list, columns by point index.
//! The matrix is immutable afterwards and shared read-only by every fitness
//! evaluation in the run.

use crate::error::SolveError;
use crate::geometry::Point;
use fixedbitset::FixedBitSet;

/// Read-only coverage relation between candidate facilities and points.
#[derive(Debug, Clone)]
pub struct CoverageMatrix {
    rows: Vec<FixedBitSet>,
    point_count: usize,
}

/// Builds the coverage matrix for a request.
///
/// # Errors
///
/// - [`SolveError::InputShape`] when `points` and `demands` differ in length
///   or a facility index is outside `[0, points.len())`.
/// - [`SolveError::InputRange`] when `radius` is negative or NaN.
pub fn build_coverage(
    points: &[Point],
    demands: &[f64],
    facilities: &[usize],
    radius: f64,
) -> Result<CoverageMatrix, SolveError> {
    if points.len() != demands.len() {
        return Err(SolveError::InputShape(format!(
            "points has {} entries but demands has {}",
            points.len(),
            demands.len()
        )));
    }
    if let Some(&bad) = facilities.iter().find(|&&f| f >= points.len()) {
        return Err(SolveError::InputShape(format!(
            "facility index {bad} out of range for {} points",
            points.len()
        )));
    }
    if radius.is_nan() || radius < 0.0 {
        return Err(SolveError::InputRange(format!(
            "coverage_radius must be >= 0, got {radius}"
        )));
    }

    let radius_sq = radius * radius;
    let rows = build_rows(points, facilities, radius_sq);

    Ok(CoverageMatrix {
        rows,
        point_count: points.len(),
    })
}

fn build_row(points: &[Point], site: &Point, radius_sq: f64) -> FixedBitSet {
    let mut row = FixedBitSet::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if site.within(p, radius_sq) {
            row.insert(i);
        }
    }
    row
}

#[cfg(feature = "parallel")]
fn build_rows(points: &[Point], facilities: &[usize], radius_sq: f64) -> Vec<FixedBitSet> {
    use rayon::prelude::*;
    facilities
        .par_iter()
        .map(|&f| build_row(points, &points[f], radius_sq))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_rows(points: &[Point], facilities: &[usize], radius_sq: f64) -> Vec<FixedBitSet> {
    facilities
        .iter()
        .map(|&f| build_row(points, &points[f], radius_sq))
        .collect()
}

impl CoverageMatrix {
    /// Number of candidate facilities (rows).
    pub fn facility_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of demand points (columns).
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Points covered by the facility at `position`.
    ///
    /// # Panics
    /// Panics if `position >= facility_count()`.
    pub fn row(&self, position: usize) -> &FixedBitSet {
        &self.rows[position]
    }

    /// Whether the facility at `position` covers `point`.
    pub fn covers(&self, position: usize, point: usize) -> bool {
        self.rows[position].contains(point)
    }

    /// Union of the coverage sets of the given facility positions.
    pub fn union_of<I>(&self, positions: I) -> FixedBitSet
    where
        I: IntoIterator<Item = usize>,
    {
        let mut covered = FixedBitSet::with_capacity(self.point_count);
        for pos in positions {
            covered.union_with(&self.rows[pos]);
        }
        covered
    }

    /// Total demand covered by the given facility positions.
    ///
    /// Each point counts once no matter how many facilities reach it, and
    /// weights are summed in ascending point order so equal sets always
    /// produce bit-identical totals.
    pub fn covered_weight<I>(&self, positions: I, demands: &[f64]) -> f64
    where
        I: IntoIterator<Item = usize>,
    {
        weight_of(&self.union_of(positions), demands)
    }
}

/// Sums `demands` over the points set in `covered`, in ascending order.
pub(crate) fn weight_of(covered: &FixedBitSet, demands: &[f64]) -> f64 {
    covered.ones().map(|i| demands[i]).sum()
}
