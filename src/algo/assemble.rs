//! Assembly of a triangulated, per-material mesh from a half-edge polygon mesh.
//!
//! Every face is processed on its own: its corner loop is read from the
//! half-edge structure, fitted with a plane, projected to 2D, and ear-clipped.
//! The resulting triangles are appended to the submesh of the face's
//! material, with one output vertex per emitted face corner.
//!
//! A face that cannot be processed never aborts the whole mesh. It adds no
//! vertices and no triangles, and is reported in [`AssembledMesh::failures`]
//! with enough data to see why.
//!
//! # Example
//!
//! ```
//! use tessel::algo::assemble::{assemble, AssembleOptions};
//! use tessel::mesh::{build_from_polygons, HalfEdgeMesh};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: HalfEdgeMesh =
//!     build_from_polygons(&positions, &[vec![0, 1, 2, 3]], &[0], vec!["floor".into()]).unwrap();
//!
//! let out = assemble(&mesh, &AssembleOptions::default()).unwrap();
//! assert_eq!(out.num_triangles(), 2);
//! assert!((out.surface_area() - 1.0).abs() < 1e-9);
//! assert!(out.failures.is_empty());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::{Point2, Point3, Vector2, Vector3};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{FaceLoopError, MeshError, Result};
use crate::mesh::{FaceCorner, FaceId, HalfEdgeMesh, MeshIndex};

use super::plane::{fit_plane, Plane};
use super::project::{polygon_area, project};
use super::triangulate::{
    ear_clip, fan_triangulate, TriangulationMode, Winding, DEFAULT_MAX_ITERATIONS,
};
use super::Progress;

/// Coordinate convention of the output buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisConvention {
    /// Keep source coordinates.
    #[default]
    Identity,
    /// Z-up source to Y-up output: `(x, y, z)` becomes `(-y, z, x)`.
    SourceToYUp,
}

impl AxisConvention {
    /// Apply the convention to a position or direction.
    #[inline]
    pub fn apply(self, v: Vector3<f64>) -> Vector3<f64> {
        match self {
            AxisConvention::Identity => v,
            AxisConvention::SourceToYUp => Vector3::new(-v.y, v.z, v.x),
        }
    }
}

/// Options for [`assemble`].
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Uniform scale applied to output positions.
    pub scale: f64,

    /// Axis convention applied to output positions and normals.
    pub axes: AxisConvention,

    /// How faces are split into triangles.
    pub mode: TriangulationMode,

    /// Ear-clipping iteration budget per face.
    pub max_iterations: usize,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,

    /// Share output vertices between corners with identical position,
    /// texture coordinate, and normal.
    pub weld_vertices: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            axes: AxisConvention::Identity,
            mode: TriangulationMode::EarClip,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parallel: true,
            weld_vertices: false,
        }
    }
}

impl AssembleOptions {
    /// Set the uniform output scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the output axis convention.
    pub fn with_axes(mut self, axes: AxisConvention) -> Self {
        self.axes = axes;
        self
    }

    /// Set the triangulation mode.
    pub fn with_mode(mut self, mode: TriangulationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the ear-clipping iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable vertex welding.
    pub fn with_welding(mut self, weld: bool) -> Self {
        self.weld_vertices = weld;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(MeshError::invalid_param(
                "scale",
                self.scale,
                "must be finite and non-zero",
            ));
        }
        if self.max_iterations == 0 {
            return Err(MeshError::invalid_param(
                "max_iterations",
                self.max_iterations,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Triangles of one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submesh {
    /// Material name.
    pub material: String,
    /// Triangles as indices into the output vertex buffers.
    pub triangles: Vec<[usize; 3]>,
}

/// Diagnostics for a face whose ear clipping did not converge.
///
/// Geometry is given in source coordinates. [`AssembleOptions::axes`] and
/// [`AssembleOptions::scale`] only apply to the output buffers, so the plane
/// and points here line up with the input mesh rather than the assembled one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    /// Face index in the source mesh.
    pub face: usize,
    /// Material index of the face.
    pub material: usize,
    /// Iterations spent before giving up.
    pub iterations: usize,
    /// Points left unclipped.
    pub remaining: usize,
    /// Winding detected for the projected polygon.
    pub winding: Winding,
    /// Best-fit plane of the face.
    pub plane: Plane,
    /// Face corners moved onto the plane.
    pub flattened: Vec<Point3<f64>>,
    /// Projected 2D polygon.
    pub points: Vec<Point2<f64>>,
    /// In-plane direction mapped to +x.
    pub axis_x: Vector3<f64>,
    /// In-plane direction mapped to +y.
    pub axis_y: Vector3<f64>,
}

/// A face that contributed nothing to the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaceFailure {
    /// The face loop could not be walked.
    Malformed {
        /// Face index in the source mesh.
        face: usize,
        /// Material index of the face.
        material: usize,
        /// Why the walk failed.
        reason: FaceLoopError,
    },
    /// Ear clipping ran out of iterations.
    Triangulation(FailureRecord),
}

impl FaceFailure {
    /// Index of the failed face.
    pub fn face(&self) -> usize {
        match self {
            FaceFailure::Malformed { face, .. } => *face,
            FaceFailure::Triangulation(record) => record.face,
        }
    }

    /// Material index of the failed face.
    pub fn material(&self) -> usize {
        match self {
            FaceFailure::Malformed { material, .. } => *material,
            FaceFailure::Triangulation(record) => record.material,
        }
    }
}

impl fmt::Display for FaceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceFailure::Malformed { face, reason, .. } => {
                write!(f, "face {} is malformed: {}", face, reason)
            }
            FaceFailure::Triangulation(record) => write!(
                f,
                "face {} did not triangulate: {} of {} points left after {} iterations",
                record.face,
                record.remaining,
                record.points.len(),
                record.iterations
            ),
        }
    }
}

/// Output of [`assemble`]: shared vertex buffers plus one submesh per material.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssembledMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Texture coordinates, parallel to `positions` (empty if the source has none).
    pub texcoords: Vec<Vector2<f64>>,
    /// Normals, parallel to `positions` (empty if the source has none).
    pub normals: Vec<Vector3<f64>>,
    /// One entry per declared material, used or not.
    pub submeshes: Vec<Submesh>,
    /// Faces that were skipped, in face order.
    pub failures: Vec<FaceFailure>,
}

impl AssembledMesh {
    /// Number of output vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles over all submeshes.
    pub fn num_triangles(&self) -> usize {
        self.submeshes.iter().map(|s| s.triangles.len()).sum()
    }

    /// Iterate over all triangles with the index of their submesh.
    pub fn triangles(&self) -> impl Iterator<Item = (usize, [usize; 3])> + '_ {
        self.submeshes
            .iter()
            .enumerate()
            .flat_map(|(m, s)| s.triangles.iter().map(move |&t| (m, t)))
    }

    /// Total area of all triangles.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|(_, [a, b, c])| {
                polygon_area(&[self.positions[a], self.positions[b], self.positions[c]])
            })
            .sum()
    }

    /// Axis-aligned bounding box of the output vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.positions.first()?;
        Some(self.positions.iter().fold((*first, *first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    /// True when every face made it into the output.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of processing a single face.
enum FaceOutput<I: MeshIndex> {
    Triangles {
        material: usize,
        corners: Vec<FaceCorner<I>>,
        triangles: Vec<[usize; 3]>,
    },
    Failed(FaceFailure),
}

/// Triangulate every face of `mesh` and gather the results per material.
///
/// Fails only for invalid options. Bad faces are reported in
/// [`AssembledMesh::failures`].
pub fn assemble<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    options: &AssembleOptions,
) -> Result<AssembledMesh> {
    assemble_with_progress(mesh, options, &Progress::none())
}

/// [`assemble`] with progress reporting.
///
/// Progress runs over two equal halves: triangulating faces, then merging
/// them into the output buffers.
pub fn assemble_with_progress<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    options: &AssembleOptions,
    progress: &Progress,
) -> Result<AssembledMesh> {
    options.validate()?;

    let num_faces = mesh.num_faces();
    let done = AtomicUsize::new(0);
    let run = |i: usize| {
        let output = process_face(mesh, FaceId::new(i), options);
        let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
        progress.report_sub(finished, num_faces, 0, 2, "Triangulating faces");
        output
    };

    let outputs: Vec<FaceOutput<I>> = if options.parallel {
        (0..num_faces).into_par_iter().map(run).collect()
    } else {
        (0..num_faces).map(run).collect()
    };

    let mut writer = Writer::new(mesh, options);
    for (i, output) in outputs.into_iter().enumerate() {
        match output {
            FaceOutput::Triangles {
                material,
                corners,
                triangles,
            } => writer.push_face(material, &corners, &triangles),
            FaceOutput::Failed(failure) => {
                log::warn!("{}", failure);
                writer.out.failures.push(failure);
            }
        }
        progress.report_sub(i + 1, num_faces, 1, 2, "Merging faces");
    }

    let out = writer.out;
    log::debug!(
        "Assembled {} faces into {} vertices and {} triangles over {} materials ({} failed)",
        num_faces,
        out.num_vertices(),
        out.num_triangles(),
        out.submeshes.len(),
        out.failures.len()
    );
    Ok(out)
}

fn process_face<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    f: FaceId<I>,
    options: &AssembleOptions,
) -> FaceOutput<I> {
    let material = mesh.face_material(f).index();

    let corners = match mesh.walk_face(f) {
        Ok(corners) => corners,
        Err(reason) => {
            return FaceOutput::Failed(FaceFailure::Malformed {
                face: f.index(),
                material,
                reason,
            })
        }
    };

    let triangles = match options.mode {
        TriangulationMode::Fan => fan_triangulate(corners.len()),
        TriangulationMode::EarClip => {
            let points: Vec<Point3<f64>> =
                corners.iter().map(|c| *mesh.position(c.vertex)).collect();
            let plane = fit_plane(&points);
            let projected = project(&points, &plane);

            match ear_clip(&projected.points, options.max_iterations) {
                Ok(triangles) => triangles,
                Err(failure) => {
                    return FaceOutput::Failed(FaceFailure::Triangulation(FailureRecord {
                        face: f.index(),
                        material,
                        iterations: failure.iterations,
                        remaining: failure.remaining,
                        winding: failure.winding,
                        plane,
                        flattened: projected.flattened,
                        points: projected.points,
                        axis_x: projected.axis_x,
                        axis_y: projected.axis_y,
                    }))
                }
            }
        }
    };

    FaceOutput::Triangles {
        material,
        corners,
        triangles,
    }
}

/// Bit pattern of an output vertex, for welding.
type VertexKey = [u64; 8];

/// Single writer that appends face results to the output buffers.
struct Writer<'a, I: MeshIndex> {
    mesh: &'a HalfEdgeMesh<I>,
    options: &'a AssembleOptions,
    out: AssembledMesh,
    welded: HashMap<VertexKey, usize>,
}

impl<'a, I: MeshIndex> Writer<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, options: &'a AssembleOptions) -> Self {
        let submeshes = mesh
            .materials()
            .iter()
            .map(|name| Submesh {
                material: name.clone(),
                triangles: Vec::new(),
            })
            .collect();

        Self {
            mesh,
            options,
            out: AssembledMesh {
                submeshes,
                ..Default::default()
            },
            welded: HashMap::new(),
        }
    }

    fn push_face(&mut self, material: usize, corners: &[FaceCorner<I>], triangles: &[[usize; 3]]) {
        let slots: Vec<usize> = corners.iter().map(|c| self.push_corner(c)).collect();

        if let Some(submesh) = self.out.submeshes.get_mut(material) {
            submesh
                .triangles
                .extend(triangles.iter().map(|t| t.map(|local| slots[local])));
        }
    }

    fn push_corner(&mut self, corner: &FaceCorner<I>) -> usize {
        let axes = self.options.axes;
        let position = Point3::from(axes.apply(self.mesh.position(corner.vertex).coords))
            * self.options.scale;
        let texcoord = self.mesh.texcoord(corner.corner).copied();
        let normal = self.mesh.normal(corner.corner).map(|n| axes.apply(*n));

        if self.options.weld_vertices {
            let key = vertex_key(&position, texcoord.as_ref(), normal.as_ref());
            if let Some(&slot) = self.welded.get(&key) {
                return slot;
            }
            self.welded.insert(key, self.out.positions.len());
        }

        let slot = self.out.positions.len();
        self.out.positions.push(position);
        if self.mesh.has_texcoords() {
            self.out.texcoords.push(texcoord.unwrap_or_else(Vector2::zeros));
        }
        if self.mesh.has_normals() {
            self.out.normals.push(normal.unwrap_or_else(Vector3::zeros));
        }
        slot
    }
}

fn vertex_key(
    position: &Point3<f64>,
    texcoord: Option<&Vector2<f64>>,
    normal: Option<&Vector3<f64>>,
) -> VertexKey {
    let uv = texcoord.copied().unwrap_or_else(Vector2::zeros);
    let n = normal.copied().unwrap_or_else(Vector3::zeros);
    [
        position.x, position.y, position.z, uv.x, uv.y, n.x, n.y, n.z,
    ]
    .map(f64::to_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_polygons, build_from_raw, to_raw};
    use approx::assert_relative_eq;
    use std::sync::Mutex;

    fn unit_square() -> HalfEdgeMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_polygons(&positions, &[vec![0, 1, 2, 3]], &[0], vec!["floor".into()]).unwrap()
    }

    /// A 3x1 strip of quads plus an L-shaped hexagon, over two materials.
    fn mixed_mesh() -> HalfEdgeMesh {
        let mut positions = Vec::new();
        for j in 0..2 {
            for i in 0..4 {
                positions.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        // L-shape above the strip, in the z = 1 plane.
        positions.extend([
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(2.0, 1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, 2.0, 1.0),
            Point3::new(0.0, 2.0, 1.0),
        ]);
        let faces = vec![
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![8, 9, 10, 11, 12, 13],
        ];
        build_from_polygons(
            &positions,
            &faces,
            &[0, 1, 0, 2],
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_unit_square() {
        let mesh = unit_square();
        let plane = fit_plane(&mesh.face_positions(FaceId::new(0)).unwrap());
        assert_relative_eq!(plane.normal.z.abs(), 1.0, epsilon = 1e-9);

        let out = assemble(&mesh, &AssembleOptions::default()).unwrap();
        assert_eq!(out.submeshes.len(), 1);
        assert_eq!(out.submeshes[0].material, "floor");
        assert_eq!(out.num_triangles(), 2);
        assert_eq!(out.num_vertices(), 4);
        assert_relative_eq!(out.surface_area(), 1.0, epsilon = 1e-9);
        assert!(out.is_complete());
    }

    #[test]
    fn test_submeshes_follow_materials() {
        let out = assemble(&mixed_mesh(), &AssembleOptions::default()).unwrap();

        assert_eq!(out.submeshes.len(), 3);
        assert_eq!(out.submeshes[0].triangles.len(), 4);
        assert_eq!(out.submeshes[1].triangles.len(), 2);
        assert_eq!(out.submeshes[2].triangles.len(), 4);
        // One output vertex per face corner.
        assert_eq!(out.num_vertices(), 4 + 4 + 4 + 6);
        assert_relative_eq!(out.surface_area(), 3.0 + 3.0, epsilon = 1e-9);

        // Triangles of a face only reference that face's vertices.
        for t in &out.submeshes[1].triangles {
            assert!(t.iter().all(|&v| (4..8).contains(&v)));
        }
    }

    #[test]
    fn test_unused_materials_keep_their_submesh() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh = build_from_polygons(
            &positions,
            &[vec![0, 1, 2]],
            &[1],
            vec!["unused".into(), "used".into(), "also_unused".into()],
        )
        .unwrap();

        let out = assemble(&mesh, &AssembleOptions::default()).unwrap();
        let counts: Vec<usize> = out.submeshes.iter().map(|s| s.triangles.len()).collect();
        assert_eq!(counts, vec![0, 1, 0]);
    }

    #[test]
    fn test_malformed_face_is_skipped() {
        let mut raw = to_raw(&mixed_mesh());
        // Make the second face's loop skip its start half-edge.
        let start = raw.face_edge_indices[1] as usize;
        let second = raw.edge_next_indices[start];
        let third = raw.edge_next_indices[second as usize];
        let fourth = raw.edge_next_indices[third as usize] as usize;
        raw.edge_next_indices[fourth] = second;
        let mesh: HalfEdgeMesh = build_from_raw(&raw).unwrap();

        let out = assemble(&mesh, &AssembleOptions::default()).unwrap();

        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].face(), 1);
        assert_eq!(out.failures[0].material(), 1);
        assert!(matches!(
            out.failures[0],
            FaceFailure::Malformed {
                reason: FaceLoopError::NotClosed { steps: 4 },
                ..
            }
        ));

        // The other faces are untouched; the bad face adds nothing.
        assert!(out.submeshes[1].triangles.is_empty());
        assert_eq!(out.num_triangles(), 8);
        assert_eq!(out.num_vertices(), 4 + 4 + 6);
    }

    #[test]
    fn test_face_loop_closing_early_is_malformed() {
        let mut raw = to_raw(&mixed_mesh());
        // The second face's loop returns to its start after two half-edges.
        let start = raw.face_edge_indices[1];
        let second = raw.edge_next_indices[start as usize] as usize;
        raw.edge_next_indices[second] = start;
        let mesh: HalfEdgeMesh = build_from_raw(&raw).unwrap();

        let out = assemble(&mesh, &AssembleOptions::default()).unwrap();

        assert_eq!(out.failures.len(), 1);
        assert!(matches!(
            out.failures[0],
            FaceFailure::Malformed {
                face: 1,
                reason: FaceLoopError::NotClosed { steps: 2 },
                ..
            }
        ));
        assert!(out.submeshes[1].triangles.is_empty());
    }

    #[test]
    fn test_degenerate_face_is_reported() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
            Point3::new(5.0, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh = build_from_polygons(
            &positions,
            &[vec![0, 1, 2, 3], vec![4, 5, 6]],
            &[0, 0],
            vec!["m".into()],
        )
        .unwrap();

        let out = assemble(&mesh, &AssembleOptions::default().with_max_iterations(200)).unwrap();

        assert_eq!(out.failures.len(), 1);
        match &out.failures[0] {
            FaceFailure::Triangulation(record) => {
                assert_eq!(record.face, 0);
                assert_eq!(record.iterations, 200);
                assert_eq!(record.points.len(), 4);
                assert_eq!(record.flattened.len(), 4);
            }
            other => panic!("unexpected failure {:?}", other),
        }
        assert_eq!(out.num_triangles(), 1);
        assert_eq!(out.num_vertices(), 3);
    }

    #[test]
    fn test_failure_record_uses_source_coordinates() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh =
            build_from_polygons(&positions, &[vec![0, 1, 2, 3]], &[0], vec!["m".into()])
                .unwrap();

        let options = AssembleOptions::default()
            .with_axes(AxisConvention::SourceToYUp)
            .with_scale(8.0)
            .with_max_iterations(50);
        let out = assemble(&mesh, &options).unwrap();

        match &out.failures[0] {
            FaceFailure::Triangulation(record) => {
                assert_relative_eq!(record.plane.point, Point3::new(0.5, 0.25, 0.0), epsilon = 1e-12);
                for (flat, source) in record.flattened.iter().zip(&positions) {
                    assert_relative_eq!(*flat, *source, epsilon = 1e-9);
                }
            }
            other => panic!("unexpected failure {:?}", other),
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mesh = mixed_mesh();
        let parallel = assemble(&mesh, &AssembleOptions::default()).unwrap();
        let sequential = assemble(&mesh, &AssembleOptions::default().sequential()).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_axes_and_scale() {
        let positions = vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(2.0, 2.0, 3.0),
            Point3::new(1.0, 3.0, 3.0),
        ];
        let mesh: HalfEdgeMesh =
            build_from_polygons(&positions, &[vec![0, 1, 2]], &[0], vec!["m".into()])
                .unwrap()
                .with_corner_attributes(vec![], vec![Vector3::z(); 3])
                .unwrap();

        let options = AssembleOptions::default()
            .with_axes(AxisConvention::SourceToYUp)
            .with_scale(2.0);
        let out = assemble(&mesh, &options).unwrap();

        assert_relative_eq!(out.positions[0], Point3::new(-4.0, 6.0, 2.0));
        assert_relative_eq!(out.normals[0], Vector3::y());
        assert!(out.texcoords.is_empty());
        assert_relative_eq!(out.surface_area(), 0.5 * 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_corner_attributes_follow_corners() {
        let texcoords: Vec<Vector2<f64>> =
            (0..4).map(|i| Vector2::new(i as f64, 10.0 + i as f64)).collect();
        let mesh = unit_square().with_corner_attributes(texcoords, vec![]).unwrap();

        let out = assemble(&mesh, &AssembleOptions::default()).unwrap();
        assert_eq!(out.texcoords.len(), 4);
        for (p, uv) in out.positions.iter().zip(&out.texcoords) {
            let source = mesh
                .vertex_ids()
                .position(|v| mesh.position(v) == p)
                .unwrap();
            assert_eq!(uv.x, source as f64);
        }
    }

    #[test]
    fn test_welding() {
        let mesh = mixed_mesh();
        let plain = assemble(&mesh, &AssembleOptions::default()).unwrap();
        let welded = assemble(&mesh, &AssembleOptions::default().with_welding(true)).unwrap();

        // The strip shares 4 interior corners.
        assert_eq!(welded.num_vertices(), 8 + 6);
        assert!(welded.num_vertices() < plain.num_vertices());
        assert_eq!(welded.num_triangles(), plain.num_triangles());
        assert_relative_eq!(welded.surface_area(), plain.surface_area(), epsilon = 1e-9);
    }

    #[test]
    fn test_fan_mode() {
        let out = assemble(
            &mixed_mesh(),
            &AssembleOptions::default().with_mode(TriangulationMode::Fan),
        )
        .unwrap();
        assert_eq!(out.num_triangles(), 10);
        assert!(out.failures.is_empty());
        assert_eq!(out.submeshes[1].triangles, vec![[4, 6, 5], [4, 7, 6]]);
    }

    #[test]
    fn test_invalid_options() {
        let mesh = unit_square();
        assert!(matches!(
            assemble(&mesh, &AssembleOptions::default().with_scale(0.0)),
            Err(MeshError::InvalidParameter { .. })
        ));
        assert!(assemble(&mesh, &AssembleOptions::default().with_max_iterations(0)).is_err());
    }

    #[test]
    fn test_progress_reaches_end() {
        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let progress = Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        });

        assemble_with_progress(&mixed_mesh(), &AssembleOptions::default(), &progress).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 8);
        assert_eq!(seen.last(), Some(&(2000, 2000)));
    }

    #[test]
    fn test_empty_mesh() {
        let mesh: HalfEdgeMesh = HalfEdgeMesh::new();
        let out = assemble(&mesh, &AssembleOptions::default()).unwrap();
        assert_eq!(out.num_triangles(), 0);
        assert!(out.bounding_box().is_none());
    }

    #[test]
    fn test_failure_report_serializes() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let mesh: HalfEdgeMesh =
            build_from_polygons(&positions, &[vec![0, 1, 2, 3]], &[0], vec!["m".into()]).unwrap();
        let out = assemble(&mesh, &AssembleOptions::default().with_max_iterations(50)).unwrap();
        assert_eq!(out.failures.len(), 1);

        let json = serde_json::to_value(&out.failures).unwrap();
        assert_eq!(json[0]["kind"], "triangulation");
        assert_eq!(json[0]["face"], 0);
        assert_eq!(json[0]["points"].as_array().unwrap().len(), 4);
    }
}
