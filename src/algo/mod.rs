//! Triangulation pipeline.
//!
//! Each polygon face passes through the same stages:
//!
//! - **Plane fitting** ([`plane`]): least-squares plane through the corners
//! - **Projection** ([`project`]): flatten onto the plane and express in 2D
//! - **Triangulation** ([`triangulate`]): ear clipping with winding detection
//! - **Assembly** ([`assemble`]): per-face driver that gathers triangles into
//!   per-material submeshes and records failed faces

pub mod assemble;
pub mod plane;
pub mod progress;
pub mod project;
pub mod triangulate;

pub use progress::Progress;
