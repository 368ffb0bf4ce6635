//! Cluster detection algorithms

use std::collections::{BTreeSet, HashMap};
use itertools::Itertools;
use crate::cluster::ClusterMap;
use crate::config::{Config, Strategy};
use crate::error::{ClusteringError, Result};
use crate::graph::{DisjointSets, Edge};
use crate::matrix::ConnectivityMatrix;

/// Progress hooks for a clustering run
///
/// Every method has an empty default body so implementors only override
/// what they need.
pub trait ClusterObserver {
    /// Called once with the input matrix shape
    fn on_shape(&mut self, _rows: usize, _cols: usize) {}

    /// Called once the connection list has been extracted
    fn on_edges_extracted(&mut self, _count: usize) {}

    /// Number of growth passes the fixed-point strategy needed for one cluster
    fn on_expansion(&mut self, _passes: usize) {}

    /// Called for every emitted cluster, in discovery order
    fn on_cluster(&mut self, _name: &str, _connections: &[String]) {}

    /// Called when no connections remain
    fn on_finished(&mut self, _clusters: usize) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ClusterObserver for NoopObserver {}

/// Observer that forwards progress to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ClusterObserver for LogObserver {
    fn on_shape(&mut self, rows: usize, cols: usize) {
        if rows == cols {
            log::info!("Input matrix is symmetrical ({}x{})", rows, cols);
        } else {
            log::info!("Input matrix is asymmetrical ({}x{})", rows, cols);
        }
    }

    fn on_edges_extracted(&mut self, count: usize) {
        log::info!("Matrix contains {} connections. Clustering connections...", count);
    }

    fn on_expansion(&mut self, passes: usize) {
        log::debug!("Index set stabilised after {} passes", passes);
    }

    fn on_cluster(&mut self, name: &str, connections: &[String]) {
        log::info!("{} holds {} connections", name, connections.len());
        log::debug!("{}: {}", name, connections.iter().join(", "));
    }

    fn on_finished(&mut self, clusters: usize) {
        log::info!("{} clusters extracted. No remaining connections.", clusters);
    }
}

/// Cluster the significant connections of `matrix`
pub fn cluster_connections(matrix: &ConnectivityMatrix, config: &Config) -> Result<ClusterMap> {
    cluster_connections_with(matrix, config, &mut NoopObserver)
}

/// Cluster the significant connections of `matrix`, reporting progress to `observer`
pub fn cluster_connections_with<O>(
    matrix: &ConnectivityMatrix,
    config: &Config,
    observer: &mut O,
) -> Result<ClusterMap>
where
    O: ClusterObserver + ?Sized,
{
    let (rows, cols) = matrix.shape();
    observer.on_shape(rows, cols);

    let edges = matrix.edges(config.connection_value);
    observer.on_edges_extracted(edges.len());

    let mut clusters = match config.strategy {
        Strategy::UnionFind => union_find_clusters(&edges, matrix.region_count(), observer)?,
        Strategy::FixedPoint => fixed_point_clusters(&edges, observer)?,
    };

    if config.min_cluster_size > 1 {
        clusters.retain_min_size(config.min_cluster_size);
    }

    observer.on_finished(clusters.len());

    Ok(clusters)
}

/// Group `edges` into components of shared region indices with a disjoint-set forest
///
/// Clusters come out in the order of their first edge in `edges`, and each
/// cluster lists its edges in that same order.
pub fn union_find_clusters<O>(
    edges: &[Edge],
    region_count: usize,
    observer: &mut O,
) -> Result<ClusterMap>
where
    O: ClusterObserver + ?Sized,
{
    let mut sets = DisjointSets::new(region_count);
    for edge in edges {
        sets.union(edge.row, edge.col);
    }

    // Assign each root a slot the first time one of its edges shows up
    let mut slot_by_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<(usize, Vec<Edge>)> = Vec::new();

    for &edge in edges {
        let root = sets.find(edge.row);
        let slot = *slot_by_root.entry(root).or_insert_with(|| {
            groups.push((root, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(edge);
    }

    let mut clusters = ClusterMap::new();
    for (root, members) in groups {
        // Edges reached through their row and through their column must pair up
        let by_row = members.iter().filter(|e| sets.find(e.row) == root).count();
        let by_col = members.iter().filter(|e| sets.find(e.col) == root).count();
        if by_row != by_col {
            return Err(ClusteringError::PairingMismatch {
                cluster: super::cluster_name(clusters.len() + 1),
                rows: by_col,
                cols: by_row,
            });
        }

        let labels = members.iter().map(Edge::label).collect();
        let cluster = clusters.push(labels);
        observer.on_cluster(&cluster.name, &cluster.connections);
    }

    Ok(clusters)
}

/// Group `edges` by growing a region index set until it stops changing
///
/// One cluster is extracted per outer iteration, seeded from the row of the
/// first remaining edge. Produces the same clusters as [`union_find_clusters`]
/// with more passes over the edge pool.
pub fn fixed_point_clusters<O>(edges: &[Edge], observer: &mut O) -> Result<ClusterMap>
where
    O: ClusterObserver + ?Sized,
{
    let mut pool: Vec<Edge> = edges.to_vec();
    let mut clusters = ClusterMap::new();

    while let Some(seed) = pool.first() {
        let mut regions: BTreeSet<usize> = BTreeSet::from([seed.row]);
        let mut passes = 0;

        loop {
            passes += 1;
            let mut grown = regions.clone();
            for edge in &pool {
                if regions.contains(&edge.row) {
                    grown.insert(edge.col);
                }
                if regions.contains(&edge.col) {
                    grown.insert(edge.row);
                }
            }
            if grown == regions {
                break;
            }
            regions = grown;
        }
        observer.on_expansion(passes);

        // Rows of edges matched by column, columns of edges matched by row
        let rows: Vec<usize> = pool
            .iter()
            .filter(|e| regions.contains(&e.col))
            .map(|e| e.row)
            .collect();
        let cols: Vec<usize> = pool
            .iter()
            .filter(|e| regions.contains(&e.row))
            .map(|e| e.col)
            .collect();

        if rows.len() != cols.len() {
            return Err(ClusteringError::PairingMismatch {
                cluster: super::cluster_name(clusters.len() + 1),
                rows: rows.len(),
                cols: cols.len(),
            });
        }

        let labels = rows
            .iter()
            .zip(&cols)
            .map(|(&row, &col)| Edge::new(row, col).label())
            .collect();

        pool.retain(|e| !regions.contains(&e.row) && !regions.contains(&e.col));

        let cluster = clusters.push(labels);
        observer.on_cluster(&cluster.name, &cluster.connections);
    }

    Ok(clusters)
}
