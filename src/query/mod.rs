//! Point-in-time queries over a decoded [`SnapshotGraph`](crate::graph::SnapshotGraph)
//!
//! `structural` holds graph-shape queries that work on any schema; `domain`
//! holds the supply-chain questions that read typed vertices and edges.

pub mod domain;
pub mod structural;

pub use domain::*;
pub use structural::{
    ancestors, ancestors_descendants, descendants, edge_attributes, edge_details, edge_weight, ego_graph, induced_subgraph,
    node_details, shortest_path, IncidentEdge, Lineage, PathResult, WEIGHT_ATTR,
};
