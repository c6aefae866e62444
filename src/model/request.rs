//! Incoming optimization request and its validated form.

use crate::error::SolveError;
use crate::geometry::Point;
use fixedbitset::FixedBitSet;

/// Optimization request as received from the serving layer.
///
/// Integer fields are signed so that negative values coming off the wire
/// reach validation and are reported precisely instead of failing
/// deserialization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationRequest {
    /// Demand point coordinates, length N.
    pub points: Vec<Point>,
    /// Demand weight per point, length N, each >= 0.
    pub demands: Vec<f64>,
    /// Indices into `points` eligible to host a facility. Distinct, in `[0, N)`.
    pub facilities: Vec<i64>,
    /// Maximum number of facilities to open. Must be > 0.
    pub max_facilities: i64,
    /// Coverage radius shared by all facilities. Must be >= 0.
    pub coverage_radius: f64,
}

/// A validated request.
///
/// Only produced by [`OptimizationRequest::validate`], so holding one means
/// every shape and range invariant has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    points: Vec<Point>,
    demands: Vec<f64>,
    facilities: Vec<usize>,
    max_facilities: usize,
    coverage_radius: f64,
}

impl OptimizationRequest {
    /// Creates a request from plain coordinate tuples.
    pub fn new(
        points: Vec<(f64, f64)>,
        demands: Vec<f64>,
        facilities: Vec<i64>,
        max_facilities: i64,
        coverage_radius: f64,
    ) -> Self {
        Self {
            points: points.into_iter().map(Point::from).collect(),
            demands,
            facilities,
            max_facilities,
            coverage_radius,
        }
    }

    /// Checks every invariant in one pass and returns the typed instance.
    ///
    /// Shape errors are reported before range errors.
    ///
    /// # Errors
    ///
    /// - [`SolveError::InputShape`]: `points`/`demands` length mismatch,
    ///   facility index outside `[0, N)`, duplicate facility index.
    /// - [`SolveError::InputRange`]: non-finite coordinate, negative or
    ///   non-finite demand, negative or NaN radius, `max_facilities <= 0`.
    pub fn validate(&self) -> Result<Instance, SolveError> {
        let n = self.points.len();
        if n != self.demands.len() {
            return Err(SolveError::InputShape(format!(
                "points has {n} entries but demands has {}",
                self.demands.len()
            )));
        }

        let mut seen = FixedBitSet::with_capacity(n);
        let mut facilities = Vec::with_capacity(self.facilities.len());
        for &raw in &self.facilities {
            let idx = usize::try_from(raw)
                .ok()
                .filter(|&i| i < n)
                .ok_or_else(|| {
                    SolveError::InputShape(format!(
                        "facility index {raw} out of range for {n} points"
                    ))
                })?;
            if seen.put(idx) {
                return Err(SolveError::InputShape(format!(
                    "duplicate facility index {idx}"
                )));
            }
            facilities.push(idx);
        }

        if let Some(i) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(SolveError::InputRange(format!(
                "point {i} has a non-finite coordinate"
            )));
        }
        if let Some((i, d)) = self
            .demands
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_finite() || **d < 0.0)
        {
            return Err(SolveError::InputRange(format!(
                "demand {i} must be finite and >= 0, got {d}"
            )));
        }
        if self.coverage_radius.is_nan() || self.coverage_radius < 0.0 {
            return Err(SolveError::InputRange(format!(
                "coverage_radius must be >= 0, got {}",
                self.coverage_radius
            )));
        }
        if self.max_facilities <= 0 {
            return Err(SolveError::InputRange(format!(
                "max_facilities must be > 0, got {}",
                self.max_facilities
            )));
        }
        let max_facilities = usize::try_from(self.max_facilities).map_err(|_| {
            SolveError::InputRange(format!(
                "max_facilities {} does not fit this platform",
                self.max_facilities
            ))
        })?;

        Ok(Instance {
            points: self.points.clone(),
            demands: self.demands.clone(),
            facilities,
            max_facilities,
            coverage_radius: self.coverage_radius,
        })
    }
}

impl Instance {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn demands(&self) -> &[f64] {
        &self.demands
    }

    /// Candidate facility sites as point indices, in request order.
    pub fn facilities(&self) -> &[usize] {
        &self.facilities
    }

    /// The facility budget.
    pub fn max_facilities(&self) -> usize {
        self.max_facilities
    }

    /// Budget clamped to the number of candidates.
    pub fn effective_budget(&self) -> usize {
        self.max_facilities.min(self.facilities.len())
    }

    pub fn coverage_radius(&self) -> f64 {
        self.coverage_radius
    }

    /// Sum of all demand weights.
    pub fn total_demand(&self) -> f64 {
        self.demands.iter().sum()
    }
}
