//! Projection of face loops into a 2D frame on their fit plane.
//!
//! The frame is built from the face itself: `axis_x` points from the second
//! corner to the first, and `axis_y = axis_x × normal`. Note that this makes
//! the frame left-handed with respect to the plane normal (`axis_x × axis_y =
//! -normal`). The triangulator only relies on winding being *consistent*, so
//! this is harmless, but it is why a positive turning angle in the projected
//! polygon corresponds to clockwise order seen from the normal side.

use nalgebra::{Point2, Point3, Vector3};
use serde::Serialize;

use super::plane::Plane;

/// A face loop flattened onto its plane and expressed in 2D.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPolygon {
    /// The input points moved onto the plane.
    pub flattened: Vec<Point3<f64>>,
    /// 2D coordinates of the flattened points, in input order.
    pub points: Vec<Point2<f64>>,
    /// In-plane direction mapped to +x.
    pub axis_x: Vector3<f64>,
    /// In-plane direction mapped to +y.
    pub axis_y: Vector3<f64>,
}

/// Move every point onto the plane along the plane normal.
pub fn flatten_to_plane(points: &[Point3<f64>], plane: &Plane) -> Vec<Point3<f64>> {
    points.iter().map(|p| plane.closest_point(p)).collect()
}

/// Flatten `points` onto `plane` and express them in a 2D basis on it.
///
/// Coordinates are signed scalar projections (dot products) of each
/// flattened point onto the two axes. Axes that cannot be normalized (two
/// coincident leading points, a zero normal) are the zero vector, which
/// collapses the corresponding coordinate to zero instead of producing NaN.
///
/// # Example
///
/// ```
/// use tessel::algo::plane::fit_plane;
/// use tessel::algo::project::{project, shoelace_area};
/// use nalgebra::Point3;
///
/// let quad = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 2.0, 0.0),
///     Point3::new(0.0, 2.0, 3.0),
///     Point3::new(0.0, 0.0, 3.0),
/// ];
/// let projected = project(&quad, &fit_plane(&quad));
/// assert!((shoelace_area(&projected.points).abs() - 6.0).abs() < 1e-9);
/// ```
pub fn project(points: &[Point3<f64>], plane: &Plane) -> ProjectedPolygon {
    let flattened = flatten_to_plane(points, plane);

    let axis_x = match (flattened.first(), flattened.get(1)) {
        (Some(p0), Some(p1)) => unit_or_zero(p0 - p1),
        _ => Vector3::zeros(),
    };
    let axis_y = unit_or_zero(axis_x.cross(&plane.normal));

    let points = flattened
        .iter()
        .map(|p| Point2::new(p.coords.dot(&axis_x), p.coords.dot(&axis_y)))
        .collect();

    ProjectedPolygon {
        flattened,
        points,
        axis_x,
        axis_y,
    }
}

/// Signed area of a 2D polygon (shoelace formula).
///
/// Positive for counter-clockwise order in a right-handed 2D frame.
pub fn shoelace_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    0.5 * twice
}

/// Unsigned area of a planar 3D polygon, summed over a triangle fan.
pub fn polygon_area(points: &[Point3<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let p0 = points[0];
    let vector_area = points[1..]
        .windows(2)
        .fold(Vector3::zeros(), |acc, w| acc + (w[0] - p0).cross(&(w[1] - p0)));
    0.5 * vector_area.norm()
}

fn unit_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}
