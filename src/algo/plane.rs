//! Best-fit planes for polygon faces.
//!
//! Faces coming out of an editor are rarely exactly planar: vertices are
//! snapped, rotated, and written in single precision. Before a face can be
//! triangulated in 2D it needs a plane that all of its corners lie close to.
//!
//! [`fit_plane`] finds the least-squares plane through a point set: the plane
//! passes through the centroid, and its normal is the direction of least
//! variance, the left singular vector belonging to the smallest singular value
//! of the 3×N matrix of centered points. For three points this is the usual
//! cross-product normal.
//!
//! # Example
//!
//! ```
//! use tessel::algo::plane::fit_plane;
//! use nalgebra::Point3;
//!
//! let square = [
//!     Point3::new(0.0, 0.0, 2.0),
//!     Point3::new(1.0, 0.0, 2.0),
//!     Point3::new(1.0, 1.0, 2.0),
//!     Point3::new(0.0, 1.0, 2.0),
//! ];
//! let plane = fit_plane(&square);
//! assert!((plane.normal.z.abs() - 1.0).abs() < 1e-9);
//! assert!((plane.point.z - 2.0).abs() < 1e-12);
//! ```

use nalgebra::{Matrix3xX, Point3, Vector3};
use serde::Serialize;

/// Iteration cap for the SVD; degenerate input must not stall the caller.
const SVD_MAX_ITERATIONS: usize = 1000;

/// A plane given by a unit normal and a point on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plane {
    /// Unit normal. Zero when the plane could not be determined.
    pub normal: Vector3<f64>,
    /// A point on the plane (the centroid for fitted planes).
    pub point: Point3<f64>,
}

impl Plane {
    /// Create a plane from a normal (normalized here) and a point on it.
    ///
    /// A normal too short to normalize is stored as the zero vector.
    pub fn new(normal: Vector3<f64>, point: Point3<f64>) -> Self {
        Self {
            normal: normal
                .try_normalize(f64::EPSILON)
                .filter(|n| n.iter().all(|c| c.is_finite()))
                .unwrap_or_else(Vector3::zeros),
            point,
        }
    }

    /// Signed distance of the plane from the origin, so that
    /// `normal · p + distance == 0` for points `p` on the plane.
    #[inline]
    pub fn distance(&self) -> f64 {
        -self.normal.dot(&self.point.coords)
    }

    /// Signed distance from a point to the plane, positive on the normal side.
    #[inline]
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&(p - self.point))
    }

    /// The point on the plane closest to `p`.
    #[inline]
    pub fn closest_point(&self, p: &Point3<f64>) -> Point3<f64> {
        p - self.normal * self.signed_distance(p)
    }

    /// Root-mean-square distance of `points` from the plane.
    pub fn rms_deviation(&self, points: &[Point3<f64>]) -> f64 {
        if points.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = points
            .iter()
            .map(|p| {
                let d = self.signed_distance(p);
                d * d
            })
            .sum();
        (sum_sq / points.len() as f64).sqrt()
    }
}

/// Compute the centroid of a point set.
///
/// Returns the origin for an empty slice.
pub fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}

/// Fit a least-squares plane to a point set.
///
/// Meant for three or more points. Collinear or coincident input yields an
/// arbitrary (but finite) normal, and input the SVD cannot handle at all
/// (non-finite coordinates) yields a zero normal; neither panics. Such faces
/// fail later, in triangulation, where they are reported.
pub fn fit_plane(points: &[Point3<f64>]) -> Plane {
    let center = centroid(points);
    if points.len() < 2 || !points.iter().all(|p| p.iter().all(|c| c.is_finite())) {
        return Plane::new(Vector3::zeros(), center);
    }

    let centered = Matrix3xX::from_fn(points.len(), |row, col| points[col][row] - center[row]);

    let normal = centered
        .try_svd(true, false, f64::EPSILON, SVD_MAX_ITERATIONS)
        .and_then(|svd| {
            let smallest = svd.singular_values.imin();
            svd.u.map(|u| u.column(smallest).into_owned())
        })
        .unwrap_or_else(Vector3::zeros);

    Plane::new(normal, center)
}
