//! Cluster analysis module

pub mod detection;
pub mod metrics;

use std::fmt;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Group of connections transitively linked by shared regions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// `Cluster_{n}`, 1-based in discovery order
    pub name: String,

    /// Connection labels (`"{row}_{col}"`, 1-based regions)
    pub connections: Vec<String>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

/// Name of the n-th cluster (1-based)
pub fn cluster_name(n: usize) -> String {
    format!("Cluster_{}", n)
}

/// Ordered mapping from cluster name to connection labels
///
/// Serializes as a JSON object whose keys keep discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterMap {
    clusters: Vec<Cluster>,
}

impl ClusterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cluster, naming it after its position
    pub fn push(&mut self, connections: Vec<String>) -> &Cluster {
        let name = cluster_name(self.clusters.len() + 1);
        self.clusters.push(Cluster { name, connections });
        &self.clusters[self.clusters.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clusters.iter().map(|cluster| cluster.name.as_str())
    }

    /// Total number of connections across all clusters
    pub fn total_connections(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// Every connection label, cluster by cluster
    pub fn flatten(&self) -> impl Iterator<Item = &str> {
        self.clusters
            .iter()
            .flat_map(|cluster| cluster.connections.iter().map(String::as_str))
    }

    /// Drop clusters with fewer than `min_size` connections and renumber the rest
    pub fn retain_min_size(&mut self, min_size: usize) {
        self.clusters.retain(|cluster| cluster.len() >= min_size);
        for (idx, cluster) in self.clusters.iter_mut().enumerate() {
            cluster.name = cluster_name(idx + 1);
        }
    }
}

impl<'a> IntoIterator for &'a ClusterMap {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

impl Serialize for ClusterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.clusters.len()))?;
        for cluster in &self.clusters {
            map.serialize_entry(&cluster.name, &cluster.connections)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClusterMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ClusterMapVisitor)
    }
}

struct ClusterMapVisitor;

impl<'de> Visitor<'de> for ClusterMapVisitor {
    type Value = ClusterMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of cluster names to connection labels")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ClusterMap, A::Error> {
        let mut clusters = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, connections)) = access.next_entry::<String, Vec<String>>()? {
            clusters.push(Cluster { name, connections });
        }
        Ok(ClusterMap { clusters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClusterMap {
        let mut clusters = ClusterMap::new();
        clusters.push(vec!["1_2".into(), "2_3".into()]);
        clusters.push(vec!["5_9".into()]);
        clusters.push(vec!["4_4".into(), "4_7".into(), "7_8".into()]);
        clusters
    }

    #[test]
    fn test_push_names_in_order() {
        let clusters = sample();
        assert_eq!(
            clusters.names().collect::<Vec<_>>(),
            vec!["Cluster_1", "Cluster_2", "Cluster_3"]
        );
        assert_eq!(clusters.total_connections(), 6);
        assert_eq!(clusters.get("Cluster_2").unwrap().connections, vec!["5_9"]);
    }

    #[test]
    fn test_json_keeps_key_order() {
        let clusters = sample();
        let json = serde_json::to_string(&clusters).unwrap();
        assert_eq!(
            json,
            r#"{"Cluster_1":["1_2","2_3"],"Cluster_2":["5_9"],"Cluster_3":["4_4","4_7","7_8"]}"#
        );

        let back: ClusterMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, clusters);
    }

    #[test]
    fn test_deserialize_preserves_foreign_order() {
        let json = r#"{"Cluster_10": ["3_4"], "Cluster_2": ["1_1"]}"#;
        let clusters: ClusterMap = serde_json::from_str(json).unwrap();
        assert_eq!(clusters.names().collect::<Vec<_>>(), vec!["Cluster_10", "Cluster_2"]);
    }

    #[test]
    fn test_retain_min_size_renumbers() {
        let mut clusters = sample();
        clusters.retain_min_size(2);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters.get("Cluster_2").unwrap().connections.len(), 3);
        assert!(clusters.get("Cluster_3").is_none());
    }
}
