//! Deterministic content hashes via BLAKE3

use blake3::Hasher;

use super::{GraphStore, SnapshotGraph};

fn leading_u128(hash: &blake3::Hash) -> u128 {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash.as_bytes()[0..16]);
    u128::from_le_bytes(bytes)
}

/// Hash of a graph's vertex set, edge set and all attributes.
///
/// Two decodes of the same document hash equal regardless of insertion order,
/// which is what the cache relies on when it rebuilds an evicted timestamp.
pub fn graph_fingerprint(graph: &SnapshotGraph) -> u128 {
    let mut nodes: Vec<String> = graph
        .get_all_nodes()
        .into_iter()
        .map(|node| {
            format!(
                "{}|{}|{}",
                node.id,
                node.node_type.as_deref().unwrap_or(""),
                serde_json::Value::from(
                    node.attributes.clone().into_iter().collect::<serde_json::Map<_, _>>()
                )
            )
        })
        .collect();
    nodes.sort();

    let mut edges: Vec<String> = graph
        .get_all_edges()
        .into_iter()
        .map(|edge| {
            // Undirected edges hash the same whichever way round they were stored
            let (a, b) = if graph.is_directed() || edge.src <= edge.dst {
                (&edge.src, &edge.dst)
            } else {
                (&edge.dst, &edge.src)
            };
            format!(
                "{}|{}|{}|{}",
                a,
                b,
                edge.relationship_type.as_deref().unwrap_or(""),
                serde_json::Value::from(
                    edge.attributes.clone().into_iter().collect::<serde_json::Map<_, _>>()
                )
            )
        })
        .collect();
    edges.sort();

    let mut hasher = Hasher::new();
    hasher.update(if graph.is_directed() { b"D" } else { b"U" });
    for line in nodes.iter().chain(std::iter::once(&String::from("--"))).chain(edges.iter()) {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }

    leading_u128(&hasher.finalize())
}
