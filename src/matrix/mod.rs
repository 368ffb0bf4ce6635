//! Dense connectivity matrix and connection extraction

use ndarray::{Array2, ArrayD, Ix2};
use crate::error::{ClusteringError, Result};
use crate::graph::Edge;

/// Region-by-region connectivity matrix
///
/// Rows and columns share one region index space; the matrix may be
/// rectangular.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivityMatrix {
    data: Array2<f64>,
}

impl ConnectivityMatrix {
    /// Wrap an existing 2D array
    pub fn new(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Convert an array of arbitrary dimensionality, rejecting anything but 2D
    pub fn from_dyn(data: ArrayD<f64>) -> Result<Self> {
        let ndim = data.ndim();
        let data = data
            .into_dimensionality::<Ix2>()
            .map_err(|_| ClusteringError::MalformedShape { ndim })?;
        Ok(Self { data })
    }

    /// Matrix filled with ones, used to select every connection
    pub fn ones(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::ones((rows, cols)),
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Square matrices are treated as symmetric connectomes
    pub fn is_square(&self) -> bool {
        let (rows, cols) = self.shape();
        rows == cols
    }

    /// Largest region index space covered by rows or columns
    pub fn region_count(&self) -> usize {
        let (rows, cols) = self.shape();
        rows.max(cols)
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Copy of the matrix with every cell below the diagonal set to zero
    pub fn upper_triangle(&self) -> Self {
        let mut data = self.data.clone();
        for ((row, col), value) in data.indexed_iter_mut() {
            if col < row {
                *value = 0.0;
            }
        }
        Self { data }
    }

    /// Upper-triangle cells (diagonal included) equal to `value`, in row-major order
    pub fn edges(&self, value: f64) -> Vec<Edge> {
        self.data
            .indexed_iter()
            .filter(|&((row, col), &cell)| col >= row && cell == value)
            .map(|((row, col), _)| Edge::new(row, col))
            .collect()
    }

    /// Number of cells equal to `value` over the whole matrix
    pub fn count_value(&self, value: f64) -> usize {
        self.data.iter().filter(|&&cell| cell == value).count()
    }

    /// Percentage of cells equal to `value`
    pub fn density(&self, value: f64) -> f64 {
        let total = self.data.len();
        if total == 0 {
            return 0.0;
        }
        self.count_value(value) as f64 / total as f64 * 100.0
    }
}
