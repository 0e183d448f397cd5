//! Decoded snapshot graph and its read API

pub mod decoder;
pub mod fingerprint;
pub mod snapshot_graph;
pub mod traversal;

use std::collections::BTreeMap;

pub use decoder::decode;
pub use fingerprint::graph_fingerprint;
pub use snapshot_graph::SnapshotGraph;

use crate::storage::{EdgeRecord, NodeRecord};

/// Read-only graph access used by every query module
pub trait GraphStore {
    /// Directed graphs distinguish successors from predecessors
    fn is_directed(&self) -> bool;

    // === NODE OPERATIONS ===

    /// Vertex by identifier
    fn get_node(&self, id: &str) -> Option<&NodeRecord>;

    fn node_exists(&self, id: &str) -> bool {
        self.get_node(id).is_some()
    }

    /// All vertices in insertion order
    fn get_all_nodes(&self) -> Vec<&NodeRecord>;

    /// Vertices whose type tag equals `node_type`
    fn find_by_type(&self, node_type: &str) -> Vec<&NodeRecord> {
        self.get_all_nodes()
            .into_iter()
            .filter(|node| node.is_type(node_type))
            .collect()
    }

    // === EDGE OPERATIONS ===

    /// The single edge stored for a pair. Undirected graphs ignore orientation.
    fn get_edge(&self, src: &str, dst: &str) -> Option<&EdgeRecord>;

    /// Edges leaving `id` (every incident edge when undirected)
    fn get_outgoing_edges(&self, id: &str) -> Vec<&EdgeRecord>;

    /// Edges entering `id` (every incident edge when undirected)
    fn get_incoming_edges(&self, id: &str) -> Vec<&EdgeRecord>;

    fn get_all_edges(&self) -> Vec<&EdgeRecord>;

    /// Successors (adjacent vertices when undirected)
    fn neighbors(&self, id: &str) -> Vec<&str>;

    /// Predecessors (adjacent vertices when undirected)
    fn reverse_neighbors(&self, id: &str) -> Vec<&str>;

    // === STATS ===

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// Vertex count per type tag; untyped endpoint vertices are omitted
    fn count_nodes_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for node in self.get_all_nodes() {
            if let Some(node_type) = &node.node_type {
                *counts.entry(node_type.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Edge count per relationship type; fallback edges are omitted
    fn count_edges_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for edge in self.get_all_edges() {
            if let Some(relationship_type) = &edge.relationship_type {
                *counts.entry(relationship_type.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}
