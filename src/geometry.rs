//! Planar points and distance tests.
//!
//! Coordinates are already projected, so plain Euclidean distance applies.
//! Coverage checks compare squared distances against a squared radius and
//! never take a square root.

/// A location in the plane.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "(f64, f64)", into = "(f64, f64)")
)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true when both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Squared Euclidean distance to `other`.
    pub fn squared_distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Whether `other` lies within `radius_sq` (a squared radius) of `self`.
    ///
    /// The boundary is inclusive, so a coincident point is always within
    /// reach, even at radius zero.
    #[inline]
    pub fn within(&self, other: &Point, radius_sq: f64) -> bool {
        self.squared_distance(other) <= radius_sq
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.squared_distance(&b) - 25.0).abs() < 1e-12);
        assert!((b.squared_distance(&a) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_within_is_inclusive() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!(a.within(&b, 1.0));
        assert!(!a.within(&b, 0.99));
    }

    #[test]
    fn test_coincident_at_zero_radius() {
        let a = Point::new(2.5, -1.0);
        assert!(a.within(&a, 0.0));
        assert!(!a.within(&Point::new(2.5, -1.0 + 1e-9), 0.0));
    }

    #[test]
    fn test_infinite_radius_covers_everything_finite() {
        let a = Point::new(0.0, 0.0);
        let far = Point::new(1e150, -1e150);
        assert!(a.within(&far, f64::INFINITY));
    }

    #[test]
    fn test_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f64::INFINITY).is_finite());
    }
}
