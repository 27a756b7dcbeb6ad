//! Ear-clipping triangulation of simple 2D polygons.
//!
//! Faces are small (editor polygons rarely exceed a few dozen corners) and
//! almost always simple, so a quadratic ear clipper is plenty. What matters is
//! that bad input fails *visibly*: a polygon that cannot be clipped within
//! the iteration budget is reported as an [`EarClipFailure`] and produces no
//! triangles at all.
//!
//! # Algorithm
//!
//! 1. Sum the signed turning angle over all vertices. A positive total is
//!    treated as [`Winding::Clockwise`] (see [`project`](super::project) for
//!    why), anything else as counter-clockwise. This is done once, up front.
//! 2. Walk a cursor around the list of remaining vertices. A vertex is an ear
//!    candidate if it turns strictly in the polygon's winding direction;
//!    straight and reflex vertices are skipped.
//! 3. A candidate is clipped if no other remaining vertex lies inside or on
//!    the triangle it forms with its neighbours. Clipping emits
//!    `(previous, next, current)` and removes the current vertex.
//! 4. Stop when two vertices remain, or when the iteration budget runs out.
//!
//! # Example
//!
//! ```
//! use tessel::algo::triangulate::{ear_clip, DEFAULT_MAX_ITERATIONS};
//! use nalgebra::Point2;
//!
//! // A dart with one reflex vertex.
//! let dart = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 1.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(2.0, 4.0),
//! ];
//! let triangles = ear_clip(&dart, DEFAULT_MAX_ITERATIONS).unwrap();
//! assert_eq!(triangles, vec![[1, 3, 2], [3, 1, 0]]);
//! ```

use nalgebra::{Point2, Vector2};
use serde::Serialize;
use thiserror::Error;

/// Iteration budget used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: usize = 9999;

/// How faces are split into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriangulationMode {
    /// Project to the fit plane and ear-clip. Handles concave faces.
    #[default]
    EarClip,
    /// Fan from the first corner. Only correct for convex faces.
    Fan,
}

/// Rotational order of a projected polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    /// Total turning angle is positive.
    Clockwise,
    /// Total turning angle is zero or negative.
    CounterClockwise,
}

impl Winding {
    /// Whether a vertex with this turning angle is convex under this winding.
    ///
    /// Straight vertices (angle exactly zero) are never convex, so they are
    /// never clipped into a zero-area triangle.
    #[inline]
    pub fn is_convex(self, angle: f64) -> bool {
        match self {
            Winding::Clockwise => angle > 0.0,
            Winding::CounterClockwise => angle < 0.0,
        }
    }
}

/// Ear clipping ran out of iterations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[error("ear clipping stopped after {iterations} iterations with {remaining} points left")]
pub struct EarClipFailure {
    /// Iterations spent.
    pub iterations: usize,
    /// Points still in the working list.
    pub remaining: usize,
    /// Winding detected for the polygon.
    pub winding: Winding,
}

/// Signed angle, in radians, between the edge arriving at `current` and the
/// edge leaving it.
///
/// Zero-length edges contribute a zero direction, giving an angle of zero.
pub fn turning_angle(prev: &Point2<f64>, current: &Point2<f64>, next: &Point2<f64>) -> f64 {
    let incoming = direction(current - prev);
    let outgoing = direction(next - current);
    incoming.perp(&outgoing).atan2(incoming.dot(&outgoing))
}

/// Detect the winding of a polygon from its total turning angle.
pub fn detect_winding(points: &[Point2<f64>]) -> Winding {
    let n = points.len();
    let total: f64 = (0..n)
        .map(|i| {
            let prev = if i == 0 { n - 1 } else { i - 1 };
            turning_angle(&points[prev], &points[i], &points[(i + 1) % n])
        })
        .sum();

    if total > 0.0 {
        Winding::Clockwise
    } else {
        Winding::CounterClockwise
    }
}

/// Check whether `p` lies inside or on the boundary of triangle `abc`.
pub fn triangle_contains(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> bool {
    let d1 = edge_sign(p, a, b);
    let d2 = edge_sign(p, b, c);
    let d3 = edge_sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Triangulate a simple polygon by ear clipping.
///
/// Returns triangles as indices into `points`. Polygons with fewer than three
/// points yield no triangles. Fails if more than two points remain after
/// `max_iterations` cursor steps, which happens for self-intersecting,
/// degenerate, or badly projected polygons.
pub fn ear_clip(
    points: &[Point2<f64>],
    max_iterations: usize,
) -> Result<Vec<[usize; 3]>, EarClipFailure> {
    let n = points.len();
    if n < 3 {
        return Ok(Vec::new());
    }

    let winding = detect_winding(points);

    // Input indices of the points not yet clipped, in polygon order.
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);
    let mut cursor = 0;
    let mut iterations = 0;

    while remaining.len() > 2 && iterations < max_iterations {
        let size = remaining.len();
        cursor = (cursor + 1) % size;
        iterations += 1;

        let prev = if cursor == 0 { size - 1 } else { cursor - 1 };
        let next = (cursor + 1) % size;

        let a = &points[remaining[prev]];
        let b = &points[remaining[cursor]];
        let c = &points[remaining[next]];

        if !winding.is_convex(turning_angle(a, b, c)) {
            continue;
        }

        let blocked = remaining.iter().enumerate().any(|(k, &i)| {
            k != prev && k != cursor && k != next && triangle_contains(&points[i], a, b, c)
        });
        if blocked {
            continue;
        }

        triangles.push([remaining[prev], remaining[next], remaining[cursor]]);
        remaining.remove(cursor);
    }

    if remaining.len() > 2 {
        return Err(EarClipFailure {
            iterations,
            remaining: remaining.len(),
            winding,
        });
    }

    Ok(triangles)
}

/// Fan-triangulate a loop of `n` corners: `(0, i + 2, i + 1)`.
pub fn fan_triangulate(n: usize) -> Vec<[usize; 3]> {
    (0..n.saturating_sub(2)).map(|i| [0, i + 2, i + 1]).collect()
}

#[inline]
fn direction(v: Vector2<f64>) -> Vector2<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector2::zeros)
}

#[inline]
fn edge_sign(p1: &Point2<f64>, p2: &Point2<f64>, p3: &Point2<f64>) -> f64 {
    (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
}
