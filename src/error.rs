//! Error types for tessel.
//!
//! This module defines all error types used throughout the library. Errors
//! that concern a single face (see [`MeshError::MalformedFace`]) are normally
//! collected by the assembler as [`FaceFailure`](crate::algo::assemble::FaceFailure)
//! records instead of aborting the whole mesh.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// Two arrays that must run in parallel have different lengths.
    #[error("{what} has {got} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending array.
        what: &'static str,
        /// The length it should have.
        expected: usize,
        /// The length it has.
        got: usize,
    },

    /// An index array references an element that does not exist.
    #[error("{what}[{position}] = {index} is out of range (len {len})")]
    InvalidIndex {
        /// Name of the index array.
        what: &'static str,
        /// Position within the index array.
        position: usize,
        /// The out-of-range value.
        index: i64,
        /// Number of elements that can be referenced.
        len: usize,
    },

    /// A face's half-edge loop could not be walked.
    #[error("face {face} is malformed: {reason}")]
    MalformedFace {
        /// The face index.
        face: usize,
        /// What went wrong while walking the loop.
        reason: FaceLoopError,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

/// Reasons a face loop walk fails.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaceLoopError {
    /// The face owns fewer than three half-edges.
    #[error("face has only {count} half-edges")]
    TooFewEdges {
        /// Number of half-edges whose face is this face.
        count: usize,
    },

    /// Following `next` from the start edge did not return to it on exactly
    /// the last step.
    #[error("loop did not close after {steps} steps")]
    NotClosed {
        /// Steps taken before the walk gave up.
        steps: usize,
    },

    /// The walk reached a half-edge that belongs to another face.
    #[error("step {step} reached half-edge {halfedge} of another face")]
    LeftFace {
        /// Step at which the foreign half-edge was reached.
        step: usize,
        /// The foreign half-edge.
        halfedge: usize,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
