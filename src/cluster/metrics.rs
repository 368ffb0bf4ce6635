//! Cluster statistics over connectivity metric matrices

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use crate::cluster::{Cluster, ClusterMap};
use crate::error::{ClusteringError, Result};
use crate::graph::Edge;
use crate::matrix::ConnectivityMatrix;

/// Summary statistics of one metric matrix over the cells of a cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetrics {
    /// Cluster name
    pub cluster: String,

    /// Number of connections in the cluster
    pub connections: usize,

    pub mean: Option<f64>,

    /// Sample standard deviation (needs at least two connections)
    pub std_dev: Option<f64>,

    pub min: Option<f64>,

    pub max: Option<f64>,
}

/// Cluster statistics for one subject matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMetrics {
    pub id: String,
    pub clusters: Vec<ClusterMetrics>,
}

/// Resolve a cluster's labels to matrix cells, checking bounds
pub fn cluster_cells(cluster: &Cluster, shape: (usize, usize)) -> Result<Vec<Edge>> {
    let (rows, cols) = shape;
    cluster
        .connections
        .iter()
        .map(|label| {
            let edge = Edge::from_label(label)?;
            if edge.row >= rows || edge.col >= cols {
                return Err(ClusteringError::LabelOutOfBounds {
                    label: label.clone(),
                    rows,
                    cols,
                });
            }
            Ok(edge)
        })
        .collect()
}

/// Binary mask with ones on the cells of `cluster`
pub fn cluster_mask(cluster: &Cluster, shape: (usize, usize)) -> Result<ConnectivityMatrix> {
    let mut mask = Array2::zeros(shape);
    for edge in cluster_cells(cluster, shape)? {
        mask[[edge.row, edge.col]] = 1.0;
    }
    Ok(ConnectivityMatrix::new(mask))
}

/// Calculate statistics for a single cluster
pub fn calculate_cluster_metrics(
    cluster: &Cluster,
    matrix: &ConnectivityMatrix,
) -> Result<ClusterMetrics> {
    let data = matrix.data();
    let values: Vec<f64> = cluster_cells(cluster, matrix.shape())?
        .iter()
        .map(|edge| data[[edge.row, edge.col]])
        .collect();

    let (mean, min, max) = if values.is_empty() {
        (None, None, None)
    } else {
        (
            Some(Statistics::mean(values.iter())),
            Some(Statistics::min(values.iter())),
            Some(Statistics::max(values.iter())),
        )
    };
    let std_dev = (values.len() > 1).then(|| Statistics::std_dev(values.iter()));

    Ok(ClusterMetrics {
        cluster: cluster.name.clone(),
        connections: values.len(),
        mean,
        std_dev,
        min,
        max,
    })
}

/// Calculate statistics for every cluster, in cluster order
pub fn compute_cluster_metrics(
    clusters: &ClusterMap,
    matrix: &ConnectivityMatrix,
) -> Result<Vec<ClusterMetrics>> {
    clusters
        .iter()
        .map(|cluster| calculate_cluster_metrics(cluster, matrix))
        .collect()
}
