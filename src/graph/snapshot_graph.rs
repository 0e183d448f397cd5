//! In-memory attributed graph for one timestamp

use std::collections::HashMap;

use indexmap::IndexMap;

use super::{fingerprint, GraphStore};
use crate::storage::{EdgeRecord, NodeRecord};

/// Directed or undirected graph with at most one edge per vertex pair.
///
/// A second edge for the same pair replaces the first (last write wins);
/// parallel relationships between two entities are not representable.
#[derive(Debug, Clone)]
pub struct SnapshotGraph {
    directed: bool,

    nodes: IndexMap<String, NodeRecord>,
    edges: Vec<EdgeRecord>,

    // Pair key -> slot in `edges`. Undirected keys are stored in sorted order.
    edge_index: HashMap<(String, String), usize>,

    // src -> edge slots (undirected: both endpoints)
    adjacency: HashMap<String, Vec<usize>>,

    // dst -> edge slots, directed graphs only
    reverse_adjacency: HashMap<String, Vec<usize>>,
}

impl SnapshotGraph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            nodes: IndexMap::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
            adjacency: HashMap::new(),
            reverse_adjacency: HashMap::new(),
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    fn pair_key(&self, src: &str, dst: &str) -> (String, String) {
        if self.directed || src <= dst {
            (src.to_string(), dst.to_string())
        } else {
            (dst.to_string(), src.to_string())
        }
    }

    /// Insert or replace a vertex; returns the record it replaced
    pub fn add_node(&mut self, node: NodeRecord) -> Option<NodeRecord> {
        self.nodes.insert(node.id.clone(), node)
    }

    /// Insert an edge, creating bare endpoint vertices as needed.
    /// Returns the edge it replaced, if the pair already had one.
    pub fn add_edge(&mut self, edge: EdgeRecord) -> Option<EdgeRecord> {
        for endpoint in [&edge.src, &edge.dst] {
            if !self.nodes.contains_key(endpoint.as_str()) {
                self.nodes.insert(endpoint.clone(), NodeRecord::bare(endpoint.clone()));
            }
        }

        let key = self.pair_key(&edge.src, &edge.dst);
        if let Some(&slot) = self.edge_index.get(&key) {
            return Some(std::mem::replace(&mut self.edges[slot], edge));
        }

        let slot = self.edges.len();
        if self.directed {
            self.adjacency.entry(edge.src.clone()).or_default().push(slot);
            self.reverse_adjacency.entry(edge.dst.clone()).or_default().push(slot);
        } else {
            self.adjacency.entry(edge.src.clone()).or_default().push(slot);
            if edge.src != edge.dst {
                self.adjacency.entry(edge.dst.clone()).or_default().push(slot);
            }
        }
        self.edge_index.insert(key, slot);
        self.edges.push(edge);
        None
    }

    /// Content hash over vertices and edges, independent of insertion order
    pub fn fingerprint(&self) -> u128 {
        fingerprint::graph_fingerprint(self)
    }

    fn edges_at(&self, slots: Option<&Vec<usize>>) -> Vec<&EdgeRecord> {
        slots
            .map(|slots| slots.iter().map(|&slot| &self.edges[slot]).collect())
            .unwrap_or_default()
    }
}

impl GraphStore for SnapshotGraph {
    fn is_directed(&self) -> bool {
        self.directed
    }

    fn get_node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    fn get_all_nodes(&self) -> Vec<&NodeRecord> {
        self.nodes.values().collect()
    }

    fn get_edge(&self, src: &str, dst: &str) -> Option<&EdgeRecord> {
        let key = self.pair_key(src, dst);
        self.edge_index.get(&key).map(|&slot| &self.edges[slot])
    }

    fn get_outgoing_edges(&self, id: &str) -> Vec<&EdgeRecord> {
        self.edges_at(self.adjacency.get(id))
    }

    fn get_incoming_edges(&self, id: &str) -> Vec<&EdgeRecord> {
        if self.directed {
            self.edges_at(self.reverse_adjacency.get(id))
        } else {
            self.edges_at(self.adjacency.get(id))
        }
    }

    fn get_all_edges(&self) -> Vec<&EdgeRecord> {
        self.edges.iter().collect()
    }

    fn neighbors(&self, id: &str) -> Vec<&str> {
        self.get_outgoing_edges(id)
            .into_iter()
            .map(|edge| if self.directed { edge.dst.as_str() } else { edge.other_end(id) })
            .collect()
    }

    fn reverse_neighbors(&self, id: &str) -> Vec<&str> {
        self.get_incoming_edges(id)
            .into_iter()
            .map(|edge| if self.directed { edge.src.as_str() } else { edge.other_end(id) })
            .collect()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
