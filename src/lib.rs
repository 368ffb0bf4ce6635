//! Clustering of significant connections in brain connectivity matrices
//!
//! Connections (cells equal to the connection value in the upper triangle of a
//! region-by-region matrix) are grouped into clusters of connections that are
//! transitively linked through shared regions.

pub mod config;
pub mod error;
pub mod matrix;
pub mod data;
pub mod graph;
pub mod cluster;
pub mod storage;

pub use cluster::detection::{
    cluster_connections, cluster_connections_with, ClusterObserver, LogObserver, NoopObserver,
};
pub use cluster::{Cluster, ClusterMap};
pub use config::{Config, Strategy};
pub use error::{ClusteringError, Result};
pub use matrix::ConnectivityMatrix;
