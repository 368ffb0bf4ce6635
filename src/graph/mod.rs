//! Connections and region connectivity structures

pub mod edges;
pub mod disjoint;

pub use edges::Edge;
pub use disjoint::DisjointSets;
