//! Mesh construction utilities.
//!
//! This module builds [`HalfEdgeMesh`] values from two kinds of input:
//!
//! - [`build_from_raw`] decodes the flat half-edge arrays of a
//!   [`RawPolygonMesh`], validating every index once so that later traversal
//!   can index without bounds surprises
//! - [`build_from_polygons`] derives the half-edge structure from face-vertex
//!   lists, as found in PLY files
//!
//! [`to_raw`] goes the other way.

use std::collections::HashMap;

use nalgebra::{Point3, Vector2, Vector3};

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh};
use super::index::{CornerId, FaceId, HalfEdgeId, MaterialId, MeshIndex, VertexId};
use super::raw::RawPolygonMesh;
use crate::error::{MeshError, Result};

/// Decode a raw half-edge description into a mesh.
///
/// All `edge_*` arrays must have the same length (an empty
/// `edge_opposite_indices` means no half-edge has a partner), the two `face_*`
/// arrays must have the same length, and the attribute streams, when both are
/// present, must agree on the corner count. Every index is range-checked.
///
/// A face whose loop is broken is *not* an error here; it is reported when the
/// face is walked.
///
/// # Example
/// ```
/// use tessel::mesh::{build_from_raw, HalfEdgeMesh, RawPolygonMesh};
///
/// let raw = RawPolygonMesh {
///     positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
///     edge_vertex_indices: vec![0, 1, 2],
///     edge_opposite_indices: vec![-1, -1, -1],
///     edge_next_indices: vec![1, 2, 0],
///     edge_face_indices: vec![0, 0, 0],
///     edge_corner_indices: vec![0, 1, 2],
///     face_edge_indices: vec![0],
///     face_material_indices: vec![0],
///     materials: vec!["dev/floor".to_string()],
///     ..Default::default()
/// };
///
/// let mesh: HalfEdgeMesh = build_from_raw(&raw).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_raw<I: MeshIndex>(raw: &RawPolygonMesh) -> Result<HalfEdgeMesh<I>> {
    let num_faces = raw.num_faces();
    if num_faces == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let num_vertices = raw.positions.len();
    let num_edges = raw.num_edges();

    check_len("edge_next_indices", num_edges, raw.edge_next_indices.len())?;
    check_len("edge_face_indices", num_edges, raw.edge_face_indices.len())?;
    check_len("edge_corner_indices", num_edges, raw.edge_corner_indices.len())?;
    if !raw.edge_opposite_indices.is_empty() {
        check_len(
            "edge_opposite_indices",
            num_edges,
            raw.edge_opposite_indices.len(),
        )?;
    }
    check_len(
        "face_material_indices",
        num_faces,
        raw.face_material_indices.len(),
    )?;
    if !raw.texcoords.is_empty() && !raw.normals.is_empty() {
        check_len("normals", raw.texcoords.len(), raw.normals.len())?;
    }
    let num_corners = raw.texcoords.len().max(raw.normals.len());
    check_capacity::<I>("positions", num_vertices)?;
    check_capacity::<I>("edge_vertex_indices", num_edges)?;
    check_capacity::<I>("face_edge_indices", num_faces)?;
    check_capacity::<I>("materials", raw.materials.len())?;
    check_capacity::<I>("corners", num_corners)?;

    // Boundary half-edges (face -1) may leave `next` and `corner` unset.
    let corner_limit = if num_corners > 0 {
        num_corners
    } else {
        I::MAX.to_usize() + 1
    };
    let mut halfedges = Vec::with_capacity(num_edges);
    for e in 0..num_edges {
        let face = optional_index("edge_face_indices", e, raw.edge_face_indices[e], num_faces)?;
        let opposite = match raw.edge_opposite_indices.get(e) {
            Some(&o) => optional_index("edge_opposite_indices", e, o, num_edges)?,
            None => None,
        };
        let (next, corner) = if face.is_some() {
            (
                Some(required_index("edge_next_indices", e, raw.edge_next_indices[e], num_edges)?),
                Some(required_index(
                    "edge_corner_indices",
                    e,
                    raw.edge_corner_indices[e],
                    corner_limit,
                )?),
            )
        } else {
            (
                optional_index("edge_next_indices", e, raw.edge_next_indices[e], num_edges)?,
                optional_index("edge_corner_indices", e, raw.edge_corner_indices[e], corner_limit)?,
            )
        };

        halfedges.push(HalfEdge {
            origin: VertexId::new(required_index(
                "edge_vertex_indices",
                e,
                raw.edge_vertex_indices[e],
                num_vertices,
            )?),
            opposite: opposite.map_or_else(HalfEdgeId::invalid, HalfEdgeId::new),
            next: next.map_or_else(HalfEdgeId::invalid, HalfEdgeId::new),
            face: face.map_or_else(FaceId::invalid, FaceId::new),
            corner: corner.map_or_else(CornerId::invalid, CornerId::new),
        });
    }

    let mut faces = Vec::with_capacity(num_faces);
    for f in 0..num_faces {
        let he = required_index("face_edge_indices", f, raw.face_edge_indices[f], num_edges)?;
        let m = required_index(
            "face_material_indices",
            f,
            raw.face_material_indices[f],
            raw.materials.len(),
        )?;
        faces.push(Face::new(HalfEdgeId::new(he), MaterialId::new(m)));
    }

    let mut mesh = HalfEdgeMesh {
        positions: raw
            .positions
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect(),
        halfedges,
        faces,
        face_sizes: Vec::new(),
        texcoords: raw.texcoords.iter().map(|&[u, v]| Vector2::new(u, v)).collect(),
        normals: raw
            .normals
            .iter()
            .map(|&[x, y, z]| Vector3::new(x, y, z))
            .collect(),
        materials: raw.materials.clone(),
    };
    count_face_sizes(&mut mesh);

    Ok(mesh)
}

/// Build a half-edge mesh from vertices and polygon faces.
///
/// # Arguments
/// * `positions` - List of vertex positions
/// * `faces` - List of polygon faces, each as a loop of vertex indices
/// * `face_materials` - Material index of each face
/// * `materials` - Declared material names
///
/// Opposite half-edges are linked across shared edges; edges used by a single
/// face get a boundary half-edge. Corner `k` is the `k`-th face corner in
/// input order, so corner attributes can be attached afterwards with
/// [`HalfEdgeMesh::with_corner_attributes`].
///
/// # Example
/// ```
/// use tessel::mesh::{build_from_polygons, FaceId, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
///
/// let mesh: HalfEdgeMesh =
///     build_from_polygons(&positions, &faces, &[0], vec!["tools/nodraw".into()]).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.face_loop(FaceId::new(0)).unwrap().len(), 4);
/// ```
pub fn build_from_polygons<I: MeshIndex>(
    positions: &[Point3<f64>],
    faces: &[Vec<usize>],
    face_materials: &[usize],
    materials: Vec<String>,
) -> Result<HalfEdgeMesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    check_len("face_materials", faces.len(), face_materials.len())?;

    for (fi, face) in faces.iter().enumerate() {
        if face.is_empty() {
            return Err(MeshError::invalid_param("faces", fi, "face has no vertices"));
        }
        for &vi in face {
            if vi >= positions.len() {
                return Err(MeshError::InvalidIndex {
                    what: "faces",
                    position: fi,
                    index: vi as i64,
                    len: positions.len(),
                });
            }
        }
        if face_materials[fi] >= materials.len() {
            return Err(MeshError::InvalidIndex {
                what: "face_materials",
                position: fi,
                index: face_materials[fi] as i64,
                len: materials.len(),
            });
        }
    }

    let num_corners: usize = faces.iter().map(Vec::len).sum();
    check_capacity::<I>("positions", positions.len())?;
    check_capacity::<I>("faces", faces.len())?;
    check_capacity::<I>("materials", materials.len())?;
    check_capacity::<I>("corners", num_corners)?;

    let mut mesh = HalfEdgeMesh {
        positions: positions.to_vec(),
        halfedges: Vec::with_capacity(num_corners + num_corners / 4),
        faces: Vec::with_capacity(faces.len()),
        face_sizes: Vec::new(),
        texcoords: Vec::new(),
        normals: Vec::new(),
        materials,
    };

    // Map from directed edge (v0, v1) to half-edge ID
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::new();

    // First pass: one half-edge per face corner, linked around the face
    for (fi, face) in faces.iter().enumerate() {
        let first = mesh.halfedges.len();
        let face_id = FaceId::<I>::new(fi);
        let n = face.len();

        for (k, &v0) in face.iter().enumerate() {
            let v1 = face[(k + 1) % n];
            let he = HalfEdgeId::<I>::new(first + k);
            mesh.halfedges.push(HalfEdge {
                origin: VertexId::new(v0),
                opposite: HalfEdgeId::invalid(),
                next: HalfEdgeId::new(first + (k + 1) % n),
                face: face_id,
                corner: CornerId::new(first + k),
            });
            edge_map.insert((v0, v1), he);
        }

        mesh.faces.push(Face::new(
            HalfEdgeId::new(first),
            MaterialId::new(face_materials[fi]),
        ));
    }

    let num_boundary = edge_map
        .keys()
        .filter(|&&(v0, v1)| !edge_map.contains_key(&(v1, v0)))
        .count();
    check_capacity::<I>("halfedges", num_corners + num_boundary)?;

    // Second pass: link opposites, creating boundary half-edges where missing.
    // Sorted so boundary half-edge numbering does not depend on hash order.
    let mut directed: Vec<((usize, usize), HalfEdgeId<I>)> =
        edge_map.iter().map(|(&k, &he)| (k, he)).collect();
    directed.sort_by_key(|&(_, he)| he);

    for ((v0, v1), he) in directed {
        if let Some(&opposite) = edge_map.get(&(v1, v0)) {
            mesh.halfedges[he.index()].opposite = opposite;
        } else {
            let boundary = HalfEdgeId::<I>::new(mesh.halfedges.len());
            mesh.halfedges.push(HalfEdge {
                origin: VertexId::new(v1),
                opposite: he,
                ..HalfEdge::new()
            });
            mesh.halfedges[he.index()].opposite = boundary;
        }
    }

    // Third pass: link boundary half-edges into loops
    link_boundary_loops(&mut mesh);

    count_face_sizes(&mut mesh);
    Ok(mesh)
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Attach per-corner attribute streams.
    ///
    /// Each non-empty stream must have one entry per corner referenced by the
    /// mesh's half-edges.
    pub fn with_corner_attributes(
        mut self,
        texcoords: Vec<Vector2<f64>>,
        normals: Vec<Vector3<f64>>,
    ) -> Result<Self> {
        let needed = self
            .halfedges
            .iter()
            .filter(|he| he.corner.is_valid())
            .map(|he| he.corner.index() + 1)
            .max()
            .unwrap_or(0);

        if !texcoords.is_empty() {
            check_len("texcoords", needed, texcoords.len())?;
        }
        if !normals.is_empty() {
            check_len("normals", needed, normals.len())?;
        }

        self.texcoords = texcoords;
        self.normals = normals;
        Ok(self)
    }
}

/// Convert a half-edge mesh back into its flat-array form.
pub fn to_raw<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> RawPolygonMesh {
    fn signed(valid: bool, index: usize) -> i32 {
        if valid {
            index as i32
        } else {
            -1
        }
    }

    RawPolygonMesh {
        positions: mesh.positions.iter().map(|p| [p.x, p.y, p.z]).collect(),
        edge_vertex_indices: mesh
            .halfedges
            .iter()
            .map(|he| he.origin.index() as i32)
            .collect(),
        edge_opposite_indices: mesh
            .halfedges
            .iter()
            .map(|he| signed(he.opposite.is_valid(), he.opposite.index()))
            .collect(),
        edge_next_indices: mesh
            .halfedges
            .iter()
            .map(|he| signed(he.next.is_valid(), he.next.index()))
            .collect(),
        edge_face_indices: mesh
            .halfedges
            .iter()
            .map(|he| signed(he.face.is_valid(), he.face.index()))
            .collect(),
        edge_corner_indices: mesh
            .halfedges
            .iter()
            .map(|he| signed(he.corner.is_valid(), he.corner.index()))
            .collect(),
        face_edge_indices: mesh
            .faces
            .iter()
            .map(|f| f.halfedge.index() as i32)
            .collect(),
        face_material_indices: mesh
            .faces
            .iter()
            .map(|f| f.material.index() as i32)
            .collect(),
        materials: mesh.materials.clone(),
        texcoords: mesh.texcoords.iter().map(|t| [t.x, t.y]).collect(),
        normals: mesh.normals.iter().map(|n| [n.x, n.y, n.z]).collect(),
    }
}

/// Link boundary half-edges into loops.
fn link_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    let boundary: Vec<HalfEdgeId<I>> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    // Group by origin vertex for quick lookup
    let mut outgoing: HashMap<usize, HalfEdgeId<I>> = HashMap::new();
    for &he in &boundary {
        outgoing.insert(mesh.origin(he).index(), he);
    }

    // The next boundary half-edge starts where this one ends
    for &he in &boundary {
        let dest = mesh.origin(mesh.opposite(he)).index();
        if let Some(&next) = outgoing.get(&dest) {
            mesh.halfedges[he.index()].next = next;
        }
    }
}

fn count_face_sizes<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    let mut sizes = vec![0usize; mesh.faces.len()];
    for he in &mesh.halfedges {
        if he.face.is_valid() {
            sizes[he.face.index()] += 1;
        }
    }
    mesh.face_sizes = sizes;
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(MeshError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

/// Every element count must leave room for the invalid sentinel.
fn check_capacity<I: MeshIndex>(what: &'static str, count: usize) -> Result<()> {
    let limit = I::MAX.to_usize() + 1;
    if count > limit {
        return Err(MeshError::invalid_param(
            what,
            count,
            "too many elements for the mesh index type",
        ));
    }
    Ok(())
}

fn required_index(what: &'static str, position: usize, index: i32, len: usize) -> Result<usize> {
    if index < 0 || index as usize >= len {
        return Err(MeshError::InvalidIndex {
            what,
            position,
            index: i64::from(index),
            len,
        });
    }
    Ok(index as usize)
}

fn optional_index(
    what: &'static str,
    position: usize,
    index: i32,
    len: usize,
) -> Result<Option<usize>> {
    if index == -1 {
        return Ok(None);
    }
    required_index(what, position, index, len).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_raw() -> RawPolygonMesh {
        RawPolygonMesh {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            edge_vertex_indices: vec![0, 1, 2, 3],
            edge_opposite_indices: vec![-1, -1, -1, -1],
            edge_next_indices: vec![1, 2, 3, 0],
            edge_face_indices: vec![0, 0, 0, 0],
            edge_corner_indices: vec![0, 1, 2, 3],
            face_edge_indices: vec![0],
            face_material_indices: vec![0],
            materials: vec!["dev/wall".to_string()],
            texcoords: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            normals: vec![[0.0, 0.0, 1.0]; 4],
        }
    }

    #[test]
    fn test_build_from_raw() {
        let mesh: HalfEdgeMesh = build_from_raw(&quad_raw()).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_halfedges(), 4);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_corners(), 4);
        assert_eq!(mesh.face_size(FaceId::new(0)), 4);
        assert_eq!(mesh.material_name(MaterialId::new(0)), Some("dev/wall"));
        assert!(mesh.has_texcoords());
        assert!(mesh.has_normals());
    }

    #[test]
    fn test_raw_rejects_bad_indices() {
        let mut raw = quad_raw();
        raw.edge_next_indices[2] = 9;
        assert!(matches!(
            build_from_raw::<u32>(&raw),
            Err(MeshError::InvalidIndex {
                what: "edge_next_indices",
                position: 2,
                index: 9,
                len: 4
            })
        ));

        let mut raw = quad_raw();
        raw.face_material_indices[0] = 1;
        assert!(matches!(
            build_from_raw::<u32>(&raw),
            Err(MeshError::InvalidIndex {
                what: "face_material_indices",
                ..
            })
        ));

        let mut raw = quad_raw();
        raw.edge_vertex_indices[0] = -1;
        assert!(build_from_raw::<u32>(&raw).is_err());

        let mut raw = quad_raw();
        raw.face_edge_indices[0] = 4;
        assert!(matches!(
            build_from_raw::<u32>(&raw),
            Err(MeshError::InvalidIndex {
                what: "face_edge_indices",
                position: 0,
                index: 4,
                len: 4
            })
        ));
    }

    #[test]
    fn test_raw_decodes_faces() {
        let mut raw = quad_raw();
        raw.face_edge_indices[0] = 2;
        raw.materials.push("dev/floor".to_string());
        raw.face_material_indices[0] = 1;

        let mesh: HalfEdgeMesh = build_from_raw(&raw).unwrap();
        let face = FaceId::new(0);
        assert_eq!(mesh.face(face).halfedge, HalfEdgeId::new(2));
        assert_eq!(mesh.face_material(face), MaterialId::new(1));
        assert_eq!(mesh.material_name(mesh.face_material(face)), Some("dev/floor"));
    }

    #[test]
    fn test_small_index_type_rejects_large_meshes() {
        let mut raw = quad_raw();
        raw.positions.resize(70_000, [0.0, 0.0, 0.0]);
        assert!(build_from_raw::<u32>(&raw).is_ok());
        assert!(matches!(
            build_from_raw::<u16>(&raw),
            Err(MeshError::InvalidParameter {
                name: "positions",
                ..
            })
        ));

        let mut raw = quad_raw();
        raw.texcoords.clear();
        raw.normals.clear();
        raw.edge_corner_indices[3] = 70_000;
        assert!(matches!(
            build_from_raw::<u16>(&raw),
            Err(MeshError::InvalidIndex {
                what: "edge_corner_indices",
                position: 3,
                ..
            })
        ));

        let positions = vec![Point3::new(0.0, 0.0, 0.0); 70_000];
        assert!(matches!(
            build_from_polygons::<u16>(&positions, &[vec![0, 1, 2]], &[0], vec!["m".into()]),
            Err(MeshError::InvalidParameter {
                name: "positions",
                ..
            })
        ));
    }

    #[test]
    fn test_raw_rejects_length_mismatch() {
        let mut raw = quad_raw();
        raw.edge_face_indices.pop();
        assert!(matches!(
            build_from_raw::<u32>(&raw),
            Err(MeshError::LengthMismatch {
                what: "edge_face_indices",
                expected: 4,
                got: 3
            })
        ));

        let mut raw = quad_raw();
        raw.normals.pop();
        assert!(matches!(
            build_from_raw::<u32>(&raw),
            Err(MeshError::LengthMismatch { what: "normals", .. })
        ));
    }

    #[test]
    fn test_raw_without_attributes_or_opposites() {
        let mut raw = quad_raw();
        raw.texcoords.clear();
        raw.normals.clear();
        raw.edge_opposite_indices.clear();
        let mesh: HalfEdgeMesh = build_from_raw(&raw).unwrap();
        assert!(!mesh.has_texcoords());
        assert!(!mesh.has_normals());
        assert!(!mesh.opposite(HalfEdgeId::new(0)).is_valid());
    }

    #[test]
    fn test_empty_raw() {
        let raw = RawPolygonMesh::default();
        assert!(matches!(
            build_from_raw::<u32>(&raw),
            Err(MeshError::EmptyMesh)
        ));
    }

    #[test]
    fn test_polygons_link_opposites() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]];
        let mesh: HalfEdgeMesh =
            build_from_polygons(&positions, &faces, &[0, 0], vec!["m".into()]).unwrap();

        assert!(mesh.is_valid());
        // Half-edge 1 runs 1 -> 2, half-edge 7 runs 2 -> 1.
        assert_eq!(mesh.opposite(HalfEdgeId::new(1)), HalfEdgeId::new(7));
        assert_eq!(mesh.opposite(HalfEdgeId::new(7)), HalfEdgeId::new(1));
        assert_eq!(mesh.num_boundary_halfedges(), 6);

        // Boundary half-edges form a closed loop around the two quads.
        let start = mesh
            .halfedge_ids()
            .find(|&he| mesh.is_boundary_halfedge(he))
            .unwrap();
        let mut he = start;
        let mut steps = 0;
        loop {
            assert!(mesh.is_boundary_halfedge(he));
            he = mesh.next(he);
            steps += 1;
            if he == start || steps > 6 {
                break;
            }
        }
        assert_eq!(steps, 6);
    }

    #[test]
    fn test_polygons_reject_bad_input() {
        let positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            build_from_polygons::<u32>(&positions, &[vec![0, 1, 5]], &[0], vec!["m".into()]),
            Err(MeshError::InvalidIndex { what: "faces", .. })
        ));
        assert!(matches!(
            build_from_polygons::<u32>(&positions, &[vec![0, 1]], &[3], vec!["m".into()]),
            Err(MeshError::InvalidIndex {
                what: "face_materials",
                ..
            })
        ));
        assert!(matches!(
            build_from_polygons::<u32>(&positions, &[], &[], vec![]),
            Err(MeshError::EmptyMesh)
        ));
    }

    #[test]
    fn test_corner_attributes() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh =
            build_from_polygons(&positions, &[vec![0, 1, 2]], &[0], vec!["m".into()]).unwrap();

        let uv = vec![Vector2::zeros(); 3];
        assert!(mesh
            .clone()
            .with_corner_attributes(uv.clone(), vec![Vector3::z(); 2])
            .is_err());

        let mesh = mesh.with_corner_attributes(uv, Vec::new()).unwrap();
        assert!(mesh.has_texcoords());
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_to_raw_round_trip() {
        let raw = quad_raw();
        let mesh: HalfEdgeMesh = build_from_raw(&raw).unwrap();
        assert_eq!(to_raw(&mesh), raw);
    }

    #[test]
    fn test_boundary_halfedges_survive_round_trip() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh =
            build_from_polygons(&positions, &[vec![0, 1, 2]], &[0], vec!["m".into()]).unwrap();
        let raw = to_raw(&mesh);
        assert_eq!(raw.num_edges(), 6);
        assert_eq!(&raw.edge_corner_indices[3..], &[-1, -1, -1]);

        let decoded: HalfEdgeMesh = build_from_raw(&raw).unwrap();
        assert_eq!(decoded.num_boundary_halfedges(), 3);
        assert_eq!(to_raw(&decoded), raw);

        // Face half-edges still need a corner.
        let mut broken = raw.clone();
        broken.edge_corner_indices[0] = -1;
        assert!(matches!(
            build_from_raw::<u32>(&broken),
            Err(MeshError::InvalidIndex {
                what: "edge_corner_indices",
                position: 0,
                ..
            })
        ));
    }
}
