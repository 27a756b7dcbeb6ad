//! Wavefront OBJ output for assembled meshes.
//!
//! Vertex streams are written once (`v`, then `vt` and `vn` when present), and
//! triangles are grouped by material with one `usemtl` statement per non-empty
//! submesh. No `.mtl` library is written; material names are passed through as
//! they appear in the source mesh.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::algo::assemble::AssembledMesh;
use crate::error::Result;

/// Save an assembled mesh to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use tessel::algo::assemble::AssembledMesh;
/// use tessel::io::obj;
///
/// let mesh = AssembledMesh::default();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &AssembledMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write an assembled mesh as OBJ text.
pub fn write<W: Write>(mesh: &AssembledMesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Generated by tessel")?;
    writeln!(
        writer,
        "# {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    )?;

    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for t in &mesh.texcoords {
        writeln!(writer, "vt {} {}", t.x, t.y)?;
    }
    for n in &mesh.normals {
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    let has_texcoords = !mesh.texcoords.is_empty();
    let has_normals = !mesh.normals.is_empty();

    for submesh in mesh.submeshes.iter().filter(|s| !s.triangles.is_empty()) {
        writeln!(writer, "usemtl {}", submesh.material)?;
        for triangle in &submesh.triangles {
            write!(writer, "f")?;
            for &v in triangle {
                // OBJ indices are 1-based.
                let i = v + 1;
                match (has_texcoords, has_normals) {
                    (true, true) => write!(writer, " {}/{}/{}", i, i, i)?,
                    (true, false) => write!(writer, " {}/{}", i, i)?,
                    (false, true) => write!(writer, " {}//{}", i, i)?,
                    (false, false) => write!(writer, " {}", i)?,
                }
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}
