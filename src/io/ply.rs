//! PLY (Stanford polygon) format support.
//!
//! Polygon meshes are read with faces of any arity. Two optional extensions
//! carry material information:
//!
//! - a `material_index` integer property on the `face` element
//! - header comments of the form `comment material <name>`, one per material
//!   in index order
//!
//! Faces without `material_index` use material 0. Indices without a named
//! comment get a generated name (`material_<i>`).

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::algo::assemble::AssembledMesh;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, HalfEdgeMesh, MeshIndex};

const MATERIAL_COMMENT: &str = "material";

/// Load a polygon mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use tessel::io::ply;
/// use tessel::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = ply::load("brush.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(&mut reader).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let x = get_float_property(vertex, "x")
            .ok_or_else(|| load_error("vertex missing x coordinate"))?;
        let y = get_float_property(vertex, "y")
            .ok_or_else(|| load_error("vertex missing y coordinate"))?;
        let z = get_float_property(vertex, "z")
            .ok_or_else(|| load_error("vertex missing z coordinate"))?;
        vertices.push(Point3::new(x, y, z));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(face_element.len());
    let mut face_materials: Vec<usize> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;
        faces.push(indices);
        face_materials.push(get_int_property(face, "material_index").unwrap_or(0));
    }

    if faces.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    let mut materials: Vec<String> = ply
        .header
        .comments
        .iter()
        .filter_map(|c| c.trim().strip_prefix(MATERIAL_COMMENT))
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(|rest| rest.trim().to_string())
        .collect();
    let needed = face_materials.iter().max().map_or(1, |&m| m + 1);
    while materials.len() < needed {
        materials.push(format!("material_{}", materials.len()));
    }

    log::debug!(
        "Loaded {} vertices, {} faces, {} materials from {}",
        vertices.len(),
        faces.len(),
        materials.len(),
        path.display()
    );

    build_from_polygons(&vertices, &faces, &face_materials, materials)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_int_property(element: &DefaultElement, name: &str) -> Option<usize> {
    match element.get(name)? {
        Property::Int(v) => usize::try_from(*v).ok(),
        Property::UInt(v) => usize::try_from(*v).ok(),
        Property::Short(v) => usize::try_from(*v).ok(),
        Property::UShort(v) => Some(*v as usize),
        Property::Char(v) => usize::try_from(*v).ok(),
        Property::UChar(v) => Some(*v as usize),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a polygon mesh to a PLY file (ASCII format).
///
/// Faces keep their arity; materials are written as header comments plus a
/// per-face `material_index`. Fails if any face loop is malformed.
pub fn save_polygons<P: AsRef<Path>, I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    path: P,
) -> Result<()> {
    let loops = mesh
        .face_ids()
        .map(|f| mesh.face_loop(f))
        .collect::<Result<Vec<_>>>()?;

    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    write_header(
        &mut writer,
        mesh.materials(),
        mesh.num_vertices(),
        loops.len(),
        false,
        false,
        "uint",
    )?;

    for v in mesh.vertex_ids() {
        let p = mesh.position(v);
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }

    for (f, corners) in mesh.face_ids().zip(&loops) {
        write!(writer, "{}", corners.len())?;
        for c in corners {
            write!(writer, " {}", c.vertex.index())?;
        }
        writeln!(writer, " {}", mesh.face_material(f).index())?;
    }

    writer.flush()?;
    Ok(())
}

/// Save an assembled triangle mesh to a PLY file (ASCII format).
///
/// Normals and texture coordinates are written when present.
///
/// # Example
///
/// ```no_run
/// use tessel::algo::assemble::AssembledMesh;
/// use tessel::io::ply;
///
/// let mesh = AssembledMesh::default();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &AssembledMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let materials: Vec<String> = mesh.submeshes.iter().map(|s| s.material.clone()).collect();
    let has_normals = !mesh.normals.is_empty();
    let has_texcoords = !mesh.texcoords.is_empty();

    write_header(
        &mut writer,
        &materials,
        mesh.num_vertices(),
        mesh.num_triangles(),
        has_normals,
        has_texcoords,
        "uchar",
    )?;

    for (i, p) in mesh.positions.iter().enumerate() {
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        if let (true, Some(n)) = (has_normals, mesh.normals.get(i)) {
            write!(writer, " {} {} {}", n.x, n.y, n.z)?;
        }
        if let (true, Some(t)) = (has_texcoords, mesh.texcoords.get(i)) {
            write!(writer, " {} {}", t.x, t.y)?;
        }
        writeln!(writer)?;
    }

    for (material, [a, b, c]) in mesh.triangles() {
        writeln!(writer, "3 {} {} {} {}", a, b, c, material)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_header<W: Write>(
    writer: &mut W,
    materials: &[String],
    num_vertices: usize,
    num_faces: usize,
    normals: bool,
    texcoords: bool,
    count_type: &str,
) -> Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by tessel")?;
    for name in materials {
        writeln!(writer, "comment {} {}", MATERIAL_COMMENT, name)?;
    }
    writeln!(writer, "element vertex {}", num_vertices)?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    if normals {
        writeln!(writer, "property double nx")?;
        writeln!(writer, "property double ny")?;
        writeln!(writer, "property double nz")?;
    }
    if texcoords {
        writeln!(writer, "property double s")?;
        writeln!(writer, "property double t")?;
    }
    writeln!(writer, "element face {}", num_faces)?;
    writeln!(writer, "property list {} int vertex_indices", count_type)?;
    writeln!(writer, "property int material_index")?;
    writeln!(writer, "end_header")?;
    Ok(())
}
