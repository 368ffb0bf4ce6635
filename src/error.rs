//! Error types for matrix loading and connection clustering

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the library
#[derive(Error, Debug)]
pub enum ClusteringError {
    #[error("Expected a 2D matrix, got {ndim} dimension(s)")]
    MalformedShape { ndim: usize },

    #[error("Mismatch in number of starting and receiving regions for {cluster}: {rows} rows, {cols} columns")]
    PairingMismatch {
        cluster: String,
        rows: usize,
        cols: usize,
    },

    #[error("Matrix shape {found:?} does not match expected shape {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Invalid connection label: {0}")]
    InvalidLabel(String),

    #[error("Connection label {label} is outside a {rows}x{cols} matrix")]
    LabelOutOfBounds {
        label: String,
        rows: usize,
        cols: usize,
    },

    #[error("No input matrices provided")]
    EmptyInput,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read npy file {path}: {message}")]
    Npy { path: PathBuf, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Output {0} already exists, use -f to overwrite")]
    OutputExists(PathBuf),

    #[error("Directory {0} for the output file does not exist")]
    MissingOutputDirectory(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClusteringError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Library result alias
pub type Result<T> = std::result::Result<T, ClusteringError>;
