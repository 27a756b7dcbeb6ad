//! Flat-array interchange form of a half-edge polygon mesh.
//!
//! [`RawPolygonMesh`] mirrors the array-of-structs layout level editors store
//! polygon meshes in: one entry per half-edge in each `edge_*` array, one entry
//! per face in each `face_*` array, and attribute streams indexed by corner.
//! Signed indices use `-1` for "none" (no opposite, boundary half-edge).

use serde::{Deserialize, Serialize};

/// A half-edge polygon mesh as parallel index and attribute arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPolygonMesh {
    /// Vertex positions.
    pub positions: Vec<[f64; 3]>,

    /// Origin vertex of each half-edge.
    pub edge_vertex_indices: Vec<i32>,

    /// Opposite half-edge of each half-edge, `-1` for none.
    #[serde(default)]
    pub edge_opposite_indices: Vec<i32>,

    /// Next half-edge around the face.
    pub edge_next_indices: Vec<i32>,

    /// Face of each half-edge, `-1` for boundary half-edges.
    pub edge_face_indices: Vec<i32>,

    /// Corner attribute index of each half-edge.
    pub edge_corner_indices: Vec<i32>,

    /// Start half-edge of each face.
    pub face_edge_indices: Vec<i32>,

    /// Material index of each face.
    pub face_material_indices: Vec<i32>,

    /// Declared material names.
    pub materials: Vec<String>,

    /// Per-corner texture coordinates.
    #[serde(default)]
    pub texcoords: Vec<[f64; 2]>,

    /// Per-corner normals.
    #[serde(default)]
    pub normals: Vec<[f64; 3]>,
}

impl RawPolygonMesh {
    /// Number of half-edges described.
    pub fn num_edges(&self) -> usize {
        self.edge_vertex_indices.len()
    }

    /// Number of faces described.
    pub fn num_faces(&self) -> usize {
        self.face_edge_indices.len()
    }
}
