//! JSON report of faces that did not make it into an assembled mesh.

use std::path::Path;

use crate::algo::assemble::FaceFailure;
use crate::error::Result;

/// Write failed faces as a pretty-printed JSON array.
///
/// Each entry is tagged with `"kind"` (`"malformed"` or `"triangulation"`).
/// Triangulation entries carry the fit plane, the flattened and projected
/// points, and the projection axes.
pub fn write_failure_report<P: AsRef<Path>>(failures: &[FaceFailure], path: P) -> Result<()> {
    let path = path.as_ref();
    super::json::write_pretty(failures, path)?;
    log::info!("Wrote {} failed faces to {}", failures.len(), path.display());
    Ok(())
}
