//! JSON encoding of the flat half-edge arrays.
//!
//! The file holds a single [`RawPolygonMesh`] object. `edge_opposite_indices`,
//! `texcoords`, and `normals` may be omitted.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::algo::assemble::AssembledMesh;
use crate::error::Result;
use crate::mesh::{build_from_raw, to_raw, HalfEdgeMesh, MeshIndex, RawPolygonMesh};

/// Read the raw arrays without decoding them.
pub fn read_raw<P: AsRef<Path>>(path: P) -> Result<RawPolygonMesh> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Load and decode a polygon mesh.
///
/// # Example
///
/// ```no_run
/// use tessel::io::json;
/// use tessel::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = json::load("brush.json").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let raw = read_raw(path)?;
    build_from_raw(&raw)
}

/// Save a polygon mesh as raw arrays.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    write_pretty(&to_raw(mesh), path)
}

/// Save an assembled mesh, failures included.
pub fn save_assembled<P: AsRef<Path>>(mesh: &AssembledMesh, path: P) -> Result<()> {
    write_pretty(mesh, path)
}

pub(crate) fn write_pretty<T: serde::Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
