//! Error types for asset generation

use std::path::PathBuf;
use thiserror::Error;

/// Structural problems found while assembling a mesh
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("mesh has no faces")]
    NoFaces,
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// A failed generation, export or import
///
/// Every stage of the pipeline reports through this type. A call that returns
/// an error never hands back a file path.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("invalid mesh: {0}")]
    Validation(#[from] ValidationError),
    #[error("unsupported output format {format:?}")]
    UnsupportedFormat { format: String },
    #[error("filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to import {path:?}: {reason}")]
    Import { path: PathBuf, reason: String },
}

impl ForgeError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
