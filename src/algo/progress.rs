//! Progress reporting for mesh assembly.
//!
//! # Example
//!
//! ```
//! use tessel::algo::assemble::{assemble_with_progress, AssembleOptions};
//! use tessel::algo::progress::Progress;
//! use tessel::mesh::{build_from_polygons, HalfEdgeMesh};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: HalfEdgeMesh =
//!     build_from_polygons(&positions, &[vec![0, 1, 2]], &[0], vec!["m".into()]).unwrap();
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! assemble_with_progress(&mesh, &AssembleOptions::default(), &progress).unwrap();
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Steps completed so far
/// - `total`: Total number of steps
/// - `message`: Description of the current phase
///
/// The callback may be invoked from worker threads.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report progress within one phase of a multi-phase operation.
    ///
    /// Maps `[0, sub_total]` onto `[phase, phase + 1]` out of `phases`,
    /// reported in thousandths of a phase.
    #[inline]
    pub fn report_sub(
        &self,
        sub_current: usize,
        sub_total: usize,
        phase: usize,
        phases: usize,
        message: &str,
    ) {
        if sub_total == 0 || phases == 0 {
            return;
        }
        let sub_fraction = (sub_current * 1000) / sub_total;
        (self.callback)(phase * 1000 + sub_fraction, phases * 1000, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
