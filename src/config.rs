//! Configuration management for connection clustering

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Algorithm used to discover clusters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Disjoint-set union over region indices
    #[default]
    UnionFind,

    /// Grow an index set until it stops changing, one cluster at a time
    FixedPoint,
}

/// Default configuration for a clustering run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cell value that marks a significant connection
    pub connection_value: f64,

    /// Clusters with fewer connections are dropped (1 keeps everything)
    pub min_cluster_size: usize,

    /// Clustering algorithm
    pub strategy: Strategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection_value: 1.0,
            min_cluster_size: 1,
            strategy: Strategy::UnionFind,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(connection_value: f64, min_cluster_size: usize, strategy: Strategy) -> Self {
        Self {
            connection_value,
            min_cluster_size,
            strategy,
        }
    }
}
