//! Half-edge polygon mesh data structure.
//!
//! This module provides a half-edge representation for polygon meshes as they
//! come out of level editors: faces of arbitrary arity, possibly non-planar,
//! with attributes stored per face corner rather than per vertex.
//!
//! # Structure
//!
//! - Each half-edge knows its **origin vertex**, its **opposite** half-edge,
//!   the **next** half-edge around its face, the **face** it bounds, and the
//!   **corner** whose attributes apply where it leaves its origin
//! - Each face stores one half-edge on its boundary and a material index
//! - Texture coordinates and normals are indexed by corner, so a vertex shared
//!   by several faces can carry a different UV and normal in each
//!
//! # Boundary Handling
//!
//! Boundary half-edges have an invalid face ID. They are kept so the opposite
//! relation stays symmetric, but face traversal never visits them.
//!
//! # Face Sizes
//!
//! The number of half-edges owned by each face is counted once when the mesh
//! is built. A face loop walk takes exactly that many `next` steps and must
//! land back on the face's start half-edge; anything else marks the face as
//! malformed.

use nalgebra::{Point3, Vector2, Vector3};

use super::index::{CornerId, FaceId, HalfEdgeId, MaterialId, MeshIndex, VertexId};
use crate::error::{FaceLoopError, MeshError, Result};

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The half-edge running the other way along the same edge.
    /// Invalid when the source data has no partner.
    pub opposite: HalfEdgeId<I>,

    /// The next half-edge around the face.
    pub next: HalfEdgeId<I>,

    /// The face this half-edge belongs to.
    /// Invalid for boundary half-edges.
    pub face: FaceId<I>,

    /// The face corner at this half-edge's origin.
    pub corner: CornerId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new uninitialized half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            opposite: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
            corner: CornerId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// The half-edge the face loop starts from.
    pub halfedge: HalfEdgeId<I>,

    /// Index into the mesh's material list.
    pub material: MaterialId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given start half-edge and material.
    pub fn new(halfedge: HalfEdgeId<I>, material: MaterialId<I>) -> Self {
        Self { halfedge, material }
    }
}

/// One corner of a face loop, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner<I: MeshIndex = u32> {
    /// The half-edge leaving this corner.
    pub halfedge: HalfEdgeId<I>,
    /// The vertex at this corner.
    pub vertex: VertexId<I>,
    /// The corner attribute index.
    pub corner: CornerId<I>,
}

/// A half-edge mesh of arbitrary polygons with per-corner attributes.
///
/// The mesh is immutable once built; see [`build_from_raw`](super::build_from_raw)
/// and [`build_from_polygons`](super::build_from_polygons).
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    /// Shared vertex positions.
    pub(crate) positions: Vec<Point3<f64>>,

    /// All half-edges in the mesh, boundary ones included.
    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// All faces in the mesh.
    pub(crate) faces: Vec<Face<I>>,

    /// Number of half-edges owned by each face.
    pub(crate) face_sizes: Vec<usize>,

    /// Per-corner texture coordinates (empty if the stream is absent).
    pub(crate) texcoords: Vec<Vector2<f64>>,

    /// Per-corner normals (empty if the stream is absent).
    pub(crate) normals: Vec<Vector3<f64>>,

    /// Declared material names.
    pub(crate) materials: Vec<String>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
            face_sizes: Vec::new(),
            texcoords: Vec::new(),
            normals: Vec::new(),
            materials: Vec::new(),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of half-edges, boundary half-edges included.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of declared materials.
    #[inline]
    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    /// Get the number of face corners with attribute data.
    pub fn num_corners(&self) -> usize {
        self.texcoords.len().max(self.normals.len())
    }

    /// Get the declared material names.
    #[inline]
    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    /// Get a material name by ID.
    pub fn material_name(&self, m: MaterialId<I>) -> Option<&str> {
        self.materials.get(m.index()).map(String::as_str)
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    /// Get the texture coordinate of a corner, if the mesh has any.
    #[inline]
    pub fn texcoord(&self, c: CornerId<I>) -> Option<&Vector2<f64>> {
        self.texcoords.get(c.index())
    }

    /// Get the normal of a corner, if the mesh has any.
    #[inline]
    pub fn normal(&self, c: CornerId<I>) -> Option<&Vector3<f64>> {
        self.normals.get(c.index())
    }

    /// Check whether the mesh carries texture coordinates.
    #[inline]
    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// Check whether the mesh carries corner normals.
    #[inline]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    // ==================== Topology Queries ====================

    /// Get the opposite half-edge.
    #[inline]
    pub fn opposite(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).opposite
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the corner of a half-edge.
    #[inline]
    pub fn corner_of(&self, he: HalfEdgeId<I>) -> CornerId<I> {
        self.halfedge(he).corner
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Number of half-edges owned by a face.
    #[inline]
    pub fn face_size(&self, f: FaceId<I>) -> usize {
        self.face_sizes[f.index()]
    }

    /// Material of a face.
    #[inline]
    pub fn face_material(&self, f: FaceId<I>) -> MaterialId<I> {
        self.face(f).material
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.positions.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over half-edges around a face.
    ///
    /// The walk is bounded by the face's half-edge count, so it terminates
    /// even when the `next` chain of a corrupt face never closes.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Walk a face loop and return its corners in traversal order.
    ///
    /// Fails with [`MeshError::MalformedFace`] if the face owns fewer than
    /// three half-edges, if the walk reaches a half-edge of another face, or
    /// if it does not return to the start half-edge after exactly
    /// [`face_size`](Self::face_size) steps. Returning earlier is also a
    /// failure, since the remaining half-edges of the face are never visited.
    pub fn face_loop(&self, f: FaceId<I>) -> Result<Vec<FaceCorner<I>>> {
        self.walk_face(f).map_err(|reason| malformed(f, reason))
    }

    /// Like [`face_loop`](Self::face_loop), but returns the bare reason.
    pub fn walk_face(&self, f: FaceId<I>) -> std::result::Result<Vec<FaceCorner<I>>, FaceLoopError> {
        let count = self.face_size(f);
        if count < 3 {
            return Err(FaceLoopError::TooFewEdges { count });
        }

        let start = self.face(f).halfedge;
        let mut corners = Vec::with_capacity(count);
        for (step, he) in self.face_halfedges(f).enumerate() {
            if step > 0 && he == start {
                return Err(FaceLoopError::NotClosed { steps: step });
            }
            let edge = self.halfedge(he);
            if edge.face != f {
                return Err(FaceLoopError::LeftFace {
                    step,
                    halfedge: he.index(),
                });
            }
            corners.push(FaceCorner {
                halfedge: he,
                vertex: edge.origin,
                corner: edge.corner,
            });
        }

        match corners.last() {
            Some(last) if self.next(last.halfedge) == start => Ok(corners),
            _ => Err(FaceLoopError::NotClosed { steps: count }),
        }
    }

    /// Positions of a face's corners in loop order.
    pub fn face_positions(&self, f: FaceId<I>) -> Result<Vec<Point3<f64>>> {
        Ok(self
            .face_loop(f)?
            .iter()
            .map(|c| *self.position(c.vertex))
            .collect())
    }

    // ==================== Geometry ====================

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.positions.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    /// Count the boundary half-edges.
    pub fn num_boundary_halfedges(&self) -> usize {
        self.halfedges.iter().filter(|he| he.is_boundary()).count()
    }

    // ==================== Validation ====================

    /// Check that the opposite relation is symmetric and every face's start
    /// half-edge belongs to that face.
    ///
    /// Loop closure is not checked here; it is reported per face by
    /// [`face_loop`](Self::face_loop).
    pub fn is_valid(&self) -> bool {
        for (i, he) in self.halfedges.iter().enumerate() {
            if he.opposite.is_valid() && self.opposite(he.opposite).index() != i {
                return false;
            }
        }

        self.face_ids()
            .all(|f| self.face_of(self.face(f).halfedge) == f)
    }
}

fn malformed<I: MeshIndex>(f: FaceId<I>, reason: FaceLoopError) -> MeshError {
    MeshError::MalformedFace {
        face: f.index(),
        reason,
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    current: HalfEdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            current: start,
            remaining: if start.is_valid() { mesh.face_size(f) } else { 0 },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || !self.current.is_valid() {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);
        self.remaining -= 1;

        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.current.is_valid() { self.remaining } else { 0 };
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;

    fn square_and_triangle() -> HalfEdgeMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
        build_from_polygons(&positions, &faces, &[0, 1], vec!["a".into(), "b".into()])
            .unwrap()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.bounding_box().is_none());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_face_loop_order() {
        let mesh = square_and_triangle();
        let corners = mesh.face_loop(FaceId::new(0)).unwrap();
        let vertices: Vec<usize> = corners.iter().map(|c| c.vertex.index()).collect();
        assert_eq!(vertices, vec![0, 1, 2, 3]);

        let corners = mesh.face_loop(FaceId::new(1)).unwrap();
        let vertices: Vec<usize> = corners.iter().map(|c| c.vertex.index()).collect();
        assert_eq!(vertices, vec![1, 4, 2]);
        // Corners are numbered per face corner, not per vertex.
        assert_eq!(corners[0].corner.index(), 4);
    }

    #[test]
    fn test_face_sizes_and_boundary() {
        let mesh = square_and_triangle();
        assert_eq!(mesh.face_size(FaceId::new(0)), 4);
        assert_eq!(mesh.face_size(FaceId::new(1)), 3);
        // 7 interior half-edges, one shared edge, so 5 boundary half-edges.
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.num_boundary_halfedges(), 5);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_unclosed_loop_is_malformed() {
        let mut mesh = square_and_triangle();
        // Short-circuit the square: its last half-edge now points at its third.
        let start = mesh.face(FaceId::new(0)).halfedge;
        let he: Vec<_> = mesh.face_halfedges(FaceId::new(0)).collect();
        mesh.halfedges[he[3].index()].next = he[2];
        assert_ne!(he[2], start);

        match mesh.face_loop(FaceId::new(0)) {
            Err(MeshError::MalformedFace { face, reason }) => {
                assert_eq!(face, 0);
                assert_eq!(reason, FaceLoopError::NotClosed { steps: 4 });
            }
            other => panic!("expected malformed face, got {:?}", other),
        }
        assert!(mesh.face_loop(FaceId::new(1)).is_ok());
    }

    #[test]
    fn test_loop_closing_early_is_malformed() {
        let mut mesh = square_and_triangle();
        // The square's second half-edge leads back to its first, so the last
        // two half-edges of the face are never reached.
        let he: Vec<_> = mesh.face_halfedges(FaceId::new(0)).collect();
        mesh.halfedges[he[1].index()].next = he[0];

        assert_eq!(
            mesh.walk_face(FaceId::new(0)),
            Err(FaceLoopError::NotClosed { steps: 2 })
        );
        assert!(mesh.face_loop(FaceId::new(1)).is_ok());
    }

    #[test]
    fn test_loop_leaving_face_is_malformed() {
        let mut mesh = square_and_triangle();
        let he: Vec<_> = mesh.face_halfedges(FaceId::new(0)).collect();
        let foreign = mesh.face(FaceId::new(1)).halfedge;
        mesh.halfedges[he[1].index()].next = foreign;

        let err = mesh.face_loop(FaceId::new(0)).unwrap_err();
        assert!(matches!(
            err,
            MeshError::MalformedFace {
                reason: FaceLoopError::LeftFace { step: 2, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_degenerate_face_has_too_few_edges() {
        let positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let mesh: HalfEdgeMesh =
            build_from_polygons(&positions, &[vec![0, 1]], &[0], vec!["m".into()]).unwrap();
        assert_eq!(
            mesh.walk_face(FaceId::new(0)),
            Err(FaceLoopError::TooFewEdges { count: 2 })
        );
    }

    #[test]
    fn test_bounding_box() {
        let mesh = square_and_triangle();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(2.0, 1.0, 0.0));
    }
}
