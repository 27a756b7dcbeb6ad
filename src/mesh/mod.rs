//! Core mesh data structures.
//!
//! This module provides the half-edge polygon mesh that the triangulation
//! pipeline reads from.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`]: flat arenas of positions, half-edges,
//! and faces that reference each other by index, plus attribute streams keyed
//! by face corner. Faces may have any number of sides. The mesh is read-only
//! once built.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex position
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//! - [`CornerId`] - Identifies a face corner (UV/normal slot)
//! - [`MaterialId`] - Identifies an entry in the material list
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait).
//!
//! # Construction
//!
//! ```
//! use tessel::mesh::{HalfEdgeMesh, build_from_polygons};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh =
//!     build_from_polygons(&positions, &faces, &[0], vec!["dev/grid".into()]).unwrap();
//! assert_eq!(mesh.num_materials(), 1);
//! ```

mod builder;
mod halfedge;
mod index;
mod raw;

pub use builder::{build_from_polygons, build_from_raw, to_raw};
pub use halfedge::{Face, FaceCorner, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh};
pub use index::{CornerId, FaceId, HalfEdgeId, MaterialId, MeshIndex, VertexId};
pub use raw::RawPolygonMesh;
