//! Point-in-time structural queries over one decoded graph

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{GraphError, Result};
use crate::graph::{traversal, GraphStore, SnapshotGraph};
use crate::storage::{Attributes, EdgeRecord};

/// Edge attribute read as the per-edge cost by [`shortest_path`]
pub const WEIGHT_ATTR: &str = "weight";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentEdge {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub path: Vec<String>,
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lineage {
    pub ancestors: Vec<String>,
    pub descendants: Vec<String>,
}

fn require_node<G: GraphStore + ?Sized>(graph: &G, node_id: &str) -> Result<()> {
    if graph.node_exists(node_id) {
        Ok(())
    } else {
        Err(GraphError::NodeNotFound(node_id.to_string()))
    }
}

/// Subgraph on `ids` with every edge whose endpoints are both kept
pub fn induced_subgraph<'a, G, I>(graph: &G, ids: I) -> SnapshotGraph
where
    G: GraphStore + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let mut sub = SnapshotGraph::new(graph.is_directed());
    let mut kept = HashSet::new();

    for id in ids {
        if let Some(node) = graph.get_node(id) {
            sub.add_node(node.clone());
            kept.insert(id);
        }
    }

    for edge in graph.get_all_edges() {
        if kept.contains(edge.src.as_str()) && kept.contains(edge.dst.as_str()) {
            sub.add_edge(edge.clone());
        }
    }

    sub
}

/// Induced subgraph of every vertex within `radius` hops of `node_id`.
/// Hops ignore edge direction.
pub fn ego_graph<G: GraphStore + ?Sized>(graph: &G, node_id: &str, radius: usize) -> Result<SnapshotGraph> {
    require_node(graph, node_id)?;

    let reached = traversal::bfs(&[node_id], radius, |id| {
        let mut adjacent = graph.neighbors(id);
        adjacent.extend(graph.reverse_neighbors(id));
        adjacent
    });

    Ok(induced_subgraph(graph, reached))
}

/// Full attribute bag of one vertex
pub fn node_details<'g, G: GraphStore + ?Sized>(graph: &'g G, node_id: &str) -> Result<&'g Attributes> {
    graph
        .get_node(node_id)
        .map(|node| &node.attributes)
        .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))
}

/// The edge stored for `src -> dst` (either orientation when undirected)
pub fn edge_details<'g, G: GraphStore + ?Sized>(graph: &'g G, src: &str, dst: &str) -> Result<&'g EdgeRecord> {
    graph.get_edge(src, dst).ok_or_else(|| GraphError::EdgeNotFound {
        src: src.to_string(),
        dst: dst.to_string(),
    })
}

/// Edges leaving `node_id` (every incident edge when undirected), oriented
/// from `node_id` to the neighbour
pub fn edge_attributes<G: GraphStore + ?Sized>(graph: &G, node_id: &str) -> Result<Vec<IncidentEdge>> {
    require_node(graph, node_id)?;

    Ok(graph
        .get_outgoing_edges(node_id)
        .into_iter()
        .map(|edge| IncidentEdge {
            from: node_id.to_string(),
            to: if graph.is_directed() {
                edge.dst.clone()
            } else {
                edge.other_end(node_id).to_string()
            },
            relationship_type: edge.relationship_type.clone(),
            attributes: edge.attributes.clone(),
        })
        .collect())
}

/// Cost of traversing `edge`: its numeric `weight`, or 1.0 when absent.
///
/// A non-numeric weight also counts as 1.0. Negative or NaN weights are rejected.
pub fn edge_weight(edge: &EdgeRecord) -> Result<f64> {
    match edge.attributes.get(WEIGHT_ATTR) {
        None => Ok(1.0),
        Some(value) => match value.as_f64() {
            Some(weight) if weight.is_nan() || weight < 0.0 => Err(GraphError::InvalidWeight {
                src: edge.src.clone(),
                dst: edge.dst.clone(),
                weight,
            }),
            Some(weight) => Ok(weight),
            None => {
                tracing::warn!(
                    "Non-numeric weight {} on {} -> {}, using 1.0",
                    value,
                    edge.src,
                    edge.dst
                );
                Ok(1.0)
            }
        },
    }
}

/// Minimum-weight path from `source` to `destination`, following edge
/// direction on directed graphs.
///
/// Missing endpoints yield `NodeNotFound`; disconnected endpoints yield `NoPath`.
pub fn shortest_path<G: GraphStore + ?Sized>(graph: &G, source: &str, destination: &str) -> Result<PathResult> {
    require_node(graph, source)?;
    require_node(graph, destination)?;

    let found = traversal::dijkstra(source, destination, |id| {
        graph
            .get_outgoing_edges(id)
            .into_iter()
            .map(|edge| {
                let next = if graph.is_directed() {
                    edge.dst.as_str()
                } else {
                    edge.other_end(id)
                };
                Ok((next, edge_weight(edge)?))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    match found {
        Some((path, cost)) => Ok(PathResult {
            path: path.into_iter().map(str::to_string).collect(),
            cost,
        }),
        None => Err(GraphError::NoPath {
            src: source.to_string(),
            dst: destination.to_string(),
        }),
    }
}

fn closure<'g, F>(node_id: &'g str, get_neighbors: F) -> Vec<String>
where
    F: FnMut(&'g str) -> Vec<&'g str>,
{
    let mut reached: Vec<String> = traversal::dfs(&[node_id], usize::MAX, get_neighbors)
        .into_iter()
        .filter(|id| *id != node_id)
        .map(str::to_string)
        .collect();
    reached.sort();
    reached
}

fn require_directed<G: GraphStore + ?Sized>(graph: &G) -> Result<()> {
    if graph.is_directed() {
        Ok(())
    } else {
        Err(GraphError::UndirectedGraph)
    }
}

/// Every vertex with a directed path into `node_id`, sorted
pub fn ancestors<G: GraphStore + ?Sized>(graph: &G, node_id: &str) -> Result<Vec<String>> {
    require_directed(graph)?;
    require_node(graph, node_id)?;
    Ok(closure(node_id, |id| graph.reverse_neighbors(id)))
}

/// Every vertex reachable from `node_id`, sorted
pub fn descendants<G: GraphStore + ?Sized>(graph: &G, node_id: &str) -> Result<Vec<String>> {
    require_directed(graph)?;
    require_node(graph, node_id)?;
    Ok(closure(node_id, |id| graph.neighbors(id)))
}

pub fn ancestors_descendants<G: GraphStore + ?Sized>(graph: &G, node_id: &str) -> Result<Lineage> {
    Ok(Lineage {
        ancestors: ancestors(graph, node_id)?,
        descendants: descendants(graph, node_id)?,
    })
}
