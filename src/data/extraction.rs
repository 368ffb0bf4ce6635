//! Per-connection value extraction across subject matrices

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::error::{ClusteringError, Result};
use crate::graph::Edge;
use crate::matrix::ConnectivityMatrix;

/// Values of the selected connections for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRow {
    /// Subject identifier (usually the input path)
    pub id: String,

    /// One value per selected connection, in column order
    pub values: Vec<f64>,
}

/// Subjects by connections table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionTable {
    /// Connection labels (`"{row}_{col}"`, 1-based regions)
    pub columns: Vec<String>,

    pub rows: Vec<ExtractionRow>,
}

/// Connections selected by a binary mask (upper triangle, row-major)
pub fn selected_connections(mask: &ConnectivityMatrix) -> Vec<Edge> {
    mask.edges(1.0)
}

/// Extract the masked connection values of every subject matrix
///
/// Every matrix must have the mask's shape. Rows keep the order of `subjects`.
pub fn extract_connection_values(
    mask: &ConnectivityMatrix,
    subjects: &[(String, ConnectivityMatrix)],
) -> Result<ExtractionTable> {
    let edges = selected_connections(mask);
    let expected = mask.shape();

    log::info!(
        "Extracting {} connections from {} matrices",
        edges.len(),
        subjects.len()
    );

    let rows = subjects
        .par_iter()
        .map(|(id, matrix)| {
            let found = matrix.shape();
            if found != expected {
                return Err(ClusteringError::ShapeMismatch { expected, found });
            }

            let data = matrix.data();
            let values = edges.iter().map(|edge| data[[edge.row, edge.col]]).collect();

            Ok(ExtractionRow {
                id: id.clone(),
                values,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ExtractionTable {
        columns: edges.iter().map(Edge::label).collect(),
        rows,
    })
}
