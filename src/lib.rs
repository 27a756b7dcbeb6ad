//! # Tessel
//!
//! Triangulation of half-edge polygon meshes.
//!
//! Level editors store brush geometry as polygon meshes: faces of any arity,
//! not always planar, not always convex, with texture coordinates and normals
//! stored per face corner. Tessel turns such a mesh into triangle lists that a
//! renderer can consume, one list per material.
//!
//! ## Features
//!
//! - **Half-edge data structure**: type-safe indices over flat arenas,
//!   validated once at decode time
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Robust per-face pipeline**: SVD plane fit, planar projection, and ear
//!   clipping with an iteration safeguard
//! - **Failure reporting**: faces that cannot be triangulated are skipped and
//!   reported with their plane and projected points
//! - **File formats**: raw half-edge JSON, PLY polygons, OBJ and PLY output
//!
//! ## Quick Start
//!
//! ```no_run
//! use tessel::prelude::*;
//!
//! let mesh: HalfEdgeMesh = tessel::io::load("brush.json").unwrap();
//! let out = assemble(&mesh, &AssembleOptions::default()).unwrap();
//!
//! for failure in &out.failures {
//!     eprintln!("{}", failure);
//! }
//! tessel::io::save(&out, "brush.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use tessel::prelude::*;
//! use nalgebra::Point3;
//!
//! // An L-shaped hexagon: concave, so a fan would overlap itself.
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(2.0, 1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(1.0, 2.0, 0.0),
//!     Point3::new(0.0, 2.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2, 3, 4, 5]];
//!
//! let mesh: HalfEdgeMesh =
//!     build_from_polygons(&positions, &faces, &[0], vec!["dev/floor".into()]).unwrap();
//! let out = assemble(&mesh, &AssembleOptions::default()).unwrap();
//!
//! assert_eq!(out.num_triangles(), 4);
//! assert!((out.surface_area() - 3.0).abs() < 1e-9);
//! ```
//!
//! ## Face Traversal
//!
//! ```
//! use tessel::prelude::*;
//! use nalgebra::Point3;
//!
//! # let positions = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let mesh: HalfEdgeMesh =
//! #     build_from_polygons(&positions, &[vec![0, 1, 2]], &[0], vec!["m".into()]).unwrap();
//! for f in mesh.face_ids() {
//!     for corner in mesh.face_loop(f).unwrap() {
//!         println!("{:?} at {:?}", corner.vertex, mesh.position(corner.vertex));
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use tessel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::assemble::{
        assemble, AssembleOptions, AssembledMesh, AxisConvention, FaceFailure, FailureRecord,
        Submesh,
    };
    pub use crate::algo::triangulate::TriangulationMode;
    pub use crate::error::{FaceLoopError, MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_raw, CornerId, FaceId, HalfEdgeId, HalfEdgeMesh,
        MaterialId, MeshIndex, RawPolygonMesh, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
