//! Connections between regions and their textual labels

use std::fmt;
use crate::error::{ClusteringError, Result};

/// A significant connection, stored with 0-based matrix indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub row: usize,
    pub col: usize,
}

impl Edge {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Label with 1-based region numbers, e.g. `"3_17"`
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Parse a `"{row}_{col}"` label back into 0-based indices
    pub fn from_label(label: &str) -> Result<Self> {
        let invalid = || ClusteringError::InvalidLabel(label.to_string());

        let (row, col) = label.trim().split_once('_').ok_or_else(invalid)?;
        let row: usize = row.parse().map_err(|_| invalid())?;
        let col: usize = col.parse().map_err(|_| invalid())?;

        // Region numbers start at 1
        if row == 0 || col == 0 {
            return Err(invalid());
        }

        Ok(Self::new(row - 1, col - 1))
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.row + 1, self.col + 1)
    }
}
