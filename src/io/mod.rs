//! Mesh file I/O.
//!
//! Polygon meshes are read from and written to the formats below; assembled
//! (triangulated) meshes are written only.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load polygons | Save polygons | Save triangles |
//! |--------|-----------|---------------|---------------|----------------|
//! | Raw half-edge JSON | `.json` | ✓ | ✓ | ✓ |
//! | PLY | `.ply` | ✓ | ✓ | ✓ |
//! | Wavefront OBJ | `.obj` | ✗ | ✗ | ✓ |
//!
//! # Usage
//!
//! ```no_run
//! use tessel::algo::assemble::{assemble, AssembleOptions};
//! use tessel::io::{load, save, write_failure_report};
//! use tessel::mesh::HalfEdgeMesh;
//!
//! let mesh: HalfEdgeMesh = load("brush.json").unwrap();
//! let out = assemble(&mesh, &AssembleOptions::default()).unwrap();
//!
//! save(&out, "brush.obj").unwrap();
//! write_failure_report(&out.failures, "failures.json").unwrap();
//! ```

pub mod json;
pub mod obj;
pub mod ply;
pub mod report;

use std::path::Path;

pub use report::write_failure_report;

use crate::algo::assemble::AssembledMesh;
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Raw half-edge arrays as JSON.
    Json,
    /// PLY (Stanford polygon) format.
    Ply,
    /// Wavefront OBJ format.
    Obj,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "ply" => Some(Format::Ply),
            "obj" => Some(Format::Obj),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a polygon mesh with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use tessel::io::load;
/// use tessel::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = load("brush.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Json => json::load(path),
        Format::Ply => ply::load(path),
        Format::Obj => Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ is an output-only format".to_string(),
        }),
    }
}

/// Save a polygon mesh with automatic format detection.
pub fn save_mesh<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Json => json::save(mesh, path),
        Format::Ply => ply::save_polygons(mesh, path),
        Format::Obj => Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: "OBJ output needs an assembled mesh".to_string(),
        }),
    }
}

/// Save an assembled mesh with automatic format detection.
pub fn save<P: AsRef<Path>>(mesh: &AssembledMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Json => json::save_assembled(mesh, path),
        Format::Ply => ply::save(mesh, path),
        Format::Obj => obj::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/brush.JSON"), Some(Format::Json));
        assert_eq!(Format::from_path("brush.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("brush.obj"), Some(Format::Obj));
        assert_eq!(Format::from_path("brush.stl"), None);
        assert_eq!(Format::from_path("brush"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load::<_, u32>("brush.stl"),
            Err(MeshError::UnsupportedFormat { extension }) if extension == "stl"
        ));
        assert!(matches!(
            load::<_, u32>("brush.obj"),
            Err(MeshError::LoadError { .. })
        ));
        assert!(matches!(
            save(&AssembledMesh::default(), "out"),
            Err(MeshError::UnsupportedFormat { .. })
        ));
    }
}
