//! Snapshot document -> SnapshotGraph

use serde_json::Value;

use super::SnapshotGraph;
use crate::error::{GraphError, Result};
use crate::storage::{
    value_to_id, zip_fields, EdgeRecord, NodeRecord, SnapshotDocument, NODE_TYPE_ATTR,
    RELATIONSHIP_TYPE_ATTR,
};

/// Materialise one snapshot as a graph.
///
/// Nodes are decoded type by type in document order. An identifier seen under
/// an earlier type is replaced by the later one. Edge records of an undeclared
/// type fall back to an attribute-less edge between their first two elements.
pub fn decode(document: &SnapshotDocument) -> Result<SnapshotGraph> {
    let mut graph = SnapshotGraph::new(document.directed);

    for (node_type, records) in &document.node_values {
        let fields = document.node_types.get(node_type).ok_or_else(|| {
            GraphError::Schema(format!("node_values has undeclared node type '{}'", node_type))
        })?;

        for record in records {
            let node = decode_node(node_type, fields, record)?;
            if let Some(previous) = graph.add_node(node) {
                tracing::warn!(
                    "Duplicate node id '{}': {:?} replaced by {}",
                    previous.id,
                    previous.node_type,
                    node_type
                );
            }
        }
    }

    let mut fallback_edges = 0usize;
    for record in &document.relationship_values {
        let known = record
            .first()
            .and_then(Value::as_str)
            .and_then(|name| document.relationship_types.get_key_value(name));

        let edge = match known {
            Some((relationship_type, fields)) => decode_edge(relationship_type, fields, record)?,
            None => {
                fallback_edges += 1;
                decode_fallback_edge(record)?
            }
        };
        graph.add_edge(edge);
    }

    if fallback_edges > 0 {
        tracing::debug!("{} edge records with undeclared relationship type", fallback_edges);
    }

    Ok(graph)
}

fn decode_node(node_type: &str, fields: &[String], record: &[Value]) -> Result<NodeRecord> {
    let id_value = record.last().ok_or_else(|| {
        GraphError::Schema(format!("empty {} record", node_type))
    })?;
    let id = value_to_id(id_value).ok_or_else(|| {
        GraphError::Schema(format!("{} record has non-scalar identifier {}", node_type, id_value))
    })?;

    let mut attributes = zip_fields(fields, record)
        .map_err(|e| GraphError::Schema(format!("{} record '{}': {}", node_type, id, e)))?;
    attributes.insert(NODE_TYPE_ATTR.to_string(), Value::String(node_type.to_string()));

    Ok(NodeRecord {
        id,
        node_type: Some(node_type.to_string()),
        attributes,
    })
}

fn decode_edge(relationship_type: &str, fields: &[String], record: &[Value]) -> Result<EdgeRecord> {
    if record.len() < 3 {
        return Err(GraphError::Schema(format!(
            "{} record needs a type and two endpoints, got {} values",
            relationship_type,
            record.len()
        )));
    }

    let n = record.len();
    let src = endpoint(relationship_type, &record[n - 2])?;
    let dst = endpoint(relationship_type, &record[n - 1])?;

    let mut attributes = zip_fields(fields, &record[1..n - 2]).map_err(|e| {
        GraphError::Schema(format!("{} edge {} -> {}: {}", relationship_type, src, dst, e))
    })?;
    attributes.insert(
        RELATIONSHIP_TYPE_ATTR.to_string(),
        Value::String(relationship_type.to_string()),
    );

    Ok(EdgeRecord {
        src,
        dst,
        relationship_type: Some(relationship_type.to_string()),
        attributes,
    })
}

fn decode_fallback_edge(record: &[Value]) -> Result<EdgeRecord> {
    if record.len() < 2 {
        return Err(GraphError::Schema(format!(
            "untyped edge record needs two elements, got {}",
            record.len()
        )));
    }

    Ok(EdgeRecord {
        src: endpoint("untyped", &record[0])?,
        dst: endpoint("untyped", &record[1])?,
        relationship_type: None,
        attributes: Default::default(),
    })
}

fn endpoint(relationship_type: &str, value: &Value) -> Result<String> {
    value_to_id(value).ok_or_else(|| {
        GraphError::Schema(format!("{} edge has non-scalar endpoint {}", relationship_type, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;
    use indexmap::IndexMap;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn document(value: Value) -> SnapshotDocument {
        SnapshotDocument::from_value(value).unwrap()
    }

    fn supply_chain() -> SnapshotDocument {
        document(json!({
            "directed": true,
            "node_types": {
                "Supplier": ["name", "reliability", "id"],
                "Warehouse": ["name", "max_capacity", "id"]
            },
            "node_values": {
                "Supplier": [["Acme", 0.8, "S_001"], ["Globex", 0.95, "S_002"]],
                "Warehouse": [["Central", 5000, "W_001"]]
            },
            "relationship_types": {
                "SupplierToWarehouse": ["transportation_cost", "lead_time"]
            },
            "relationship_values": [
                ["SupplierToWarehouse", 120.5, 3, "S_001", "W_001"],
                ["SupplierToWarehouse", 99.0, 5, "S_002", "W_001"]
            ]
        }))
    }

    #[test]
    fn test_decode_nodes_positional() {
        let graph = decode(&supply_chain()).unwrap();

        assert!(graph.is_directed());
        assert_eq!(graph.node_count(), 3);

        let supplier = graph.get_node("S_001").unwrap();
        assert_eq!(supplier.node_type.as_deref(), Some("Supplier"));
        assert_eq!(supplier.get("name"), Some(&json!("Acme")));
        assert_eq!(supplier.get_f64("reliability"), Some(0.8));
        // Identifier is also kept as an ordinary attribute
        assert_eq!(supplier.get("id"), Some(&json!("S_001")));
        assert_eq!(supplier.get("node_type"), Some(&json!("Supplier")));
    }

    #[test]
    fn test_decode_edges_positional() {
        let graph = decode(&supply_chain()).unwrap();

        assert_eq!(graph.edge_count(), 2);
        let edge = graph.get_edge("S_001", "W_001").unwrap();
        assert_eq!(edge.get_f64("transportation_cost"), Some(120.5));
        assert_eq!(edge.get_f64("lead_time"), Some(3.0));
        assert_eq!(edge.attributes["relationship_type"], json!("SupplierToWarehouse"));
        assert!(graph.get_edge("W_001", "S_001").is_none());
    }

    #[test]
    fn test_decode_undirected() {
        let mut doc = supply_chain();
        doc.directed = false;
        let graph = decode(&doc).unwrap();

        assert!(!graph.is_directed());
        assert!(graph.get_edge("W_001", "S_001").is_some());
    }

    #[test]
    fn test_unknown_relationship_falls_back() {
        let graph = decode(&document(json!({
            "directed": true,
            "node_types": {},
            "node_values": {},
            "relationship_types": {},
            "relationship_values": [["Mystery", "B", 7, "C"]]
        })))
        .unwrap();

        // Edge between the first two elements, no attributes
        let edge = graph.get_edge("Mystery", "B").unwrap();
        assert!(edge.relationship_type.is_none());
        assert!(edge.attributes.is_empty());
        assert!(graph.get_node("C").is_none());
    }

    #[test]
    fn test_duplicate_id_later_type_wins() {
        // Raw text so bucket order is the document's, not sorted
        let doc = SnapshotDocument::from_slice(
            br#"{"directed": true,
                 "node_types": {"Parts": ["cost", "id"], "Facility": ["operating_cost", "id"]},
                 "node_values": {"Parts": [[5, "X_1"]], "Facility": [[900, "X_1"]]},
                 "relationship_types": {},
                 "relationship_values": []}"#,
        )
        .unwrap();
        let graph = decode(&doc).unwrap();

        assert_eq!(graph.node_count(), 1);
        let node = graph.get_node("X_1").unwrap();
        assert!(node.is_type("Facility"));
        assert_eq!(node.get_f64("operating_cost"), Some(900.0));
        assert!(node.get("cost").is_none());
    }

    #[test]
    fn test_short_node_record_is_schema_error() {
        let err = decode(&document(json!({
            "directed": true,
            "node_types": {"Parts": ["name", "cost", "id"]},
            "node_values": {"Parts": [["bolt", "P_1"]]},
            "relationship_types": {},
            "relationship_values": []
        })))
        .unwrap_err();
        assert!(matches!(err, GraphError::Schema(_)));
    }

    #[test]
    fn test_short_edge_record_is_schema_error() {
        let err = decode(&document(json!({
            "directed": true,
            "node_types": {},
            "node_values": {},
            "relationship_types": {"PartsToFacility": ["quantity", "distance"]},
            "relationship_values": [["PartsToFacility", 4, "P_1", "F_1"]]
        })))
        .unwrap_err();
        assert!(matches!(err, GraphError::Schema(_)));
    }

    #[test]
    fn test_undeclared_node_type_is_schema_error() {
        let err = decode(&document(json!({
            "directed": true,
            "node_types": {},
            "node_values": {"Parts": [["P_1"]]},
            "relationship_types": {},
            "relationship_values": []
        })))
        .unwrap_err();
        assert!(matches!(err, GraphError::Schema(_)));
    }

    #[test]
    fn test_edge_to_unlisted_node_creates_vertex() {
        let graph = decode(&document(json!({
            "directed": true,
            "node_types": {},
            "node_values": {},
            "relationship_types": {"WarehouseToParts": []},
            "relationship_values": [["WarehouseToParts", "W_9", "P_9"]]
        })))
        .unwrap();

        assert_eq!(graph.node_count(), 2);
        assert!(graph.get_node("P_9").unwrap().node_type.is_none());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let doc = supply_chain();
        assert_eq!(decode(&doc).unwrap().fingerprint(), decode(&doc).unwrap().fingerprint());
    }

    // Randomly shaped documents: per type a field count and rows of scalars

    /// (attribute count, rows of attribute values)
    type NodeBucket = (usize, Vec<Vec<Value>>);
    /// (attribute count, rows of (attribute values, source pick, target pick))
    type EdgeBucket = (usize, Vec<(Vec<Value>, usize, usize)>);

    fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            (-1.0e6..1.0e6f64).prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ]
    }

    fn arb_node_bucket() -> impl Strategy<Value = NodeBucket> {
        (0usize..4).prop_flat_map(|n| (Just(n), prop::collection::vec(prop::collection::vec(arb_scalar(), n), 0..5)))
    }

    fn arb_edge_bucket() -> impl Strategy<Value = EdgeBucket> {
        (0usize..4).prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec((prop::collection::vec(arb_scalar(), n), 0usize..32, 0usize..32), 0..8),
            )
        })
    }

    fn field_names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn synthetic_document(nodes: &[NodeBucket], edges: &[EdgeBucket]) -> SnapshotDocument {
        let mut document = SnapshotDocument {
            directed: true,
            node_types: IndexMap::new(),
            node_values: IndexMap::new(),
            relationship_types: IndexMap::new(),
            relationship_values: Vec::new(),
        };

        // Endpoint pool: every node id plus a few ids with no node record
        let mut pool: Vec<String> = (0..3).map(|i| format!("X_{}", i)).collect();
        for (t, (n, rows)) in nodes.iter().enumerate() {
            let node_type = format!("T{}", t);
            let mut fields = field_names("f", *n);
            fields.push("id".to_string());

            let records = rows
                .iter()
                .enumerate()
                .map(|(r, row)| {
                    let id = format!("N{}_{}", t, r);
                    pool.push(id.clone());
                    let mut record = row.clone();
                    record.push(Value::String(id));
                    record
                })
                .collect();
            document.node_types.insert(node_type.clone(), fields);
            document.node_values.insert(node_type, records);
        }

        for (t, (n, rows)) in edges.iter().enumerate() {
            let relationship_type = format!("R{}", t);
            for (row, src, dst) in rows {
                let mut record = vec![Value::String(relationship_type.clone())];
                record.extend(row.iter().cloned());
                record.push(Value::String(pool[src % pool.len()].clone()));
                record.push(Value::String(pool[dst % pool.len()].clone()));
                document.relationship_values.push(record);
            }
            document.relationship_types.insert(relationship_type, field_names("a", *n));
        }

        document
    }

    proptest! {
        #[test]
        fn decoded_attributes_follow_record_positions(
            nodes in prop::collection::vec(arb_node_bucket(), 1..4),
            edges in prop::collection::vec(arb_edge_bucket(), 0..4),
        ) {
            let document = synthetic_document(&nodes, &edges);
            let graph = decode(&document).unwrap();

            for (node_type, records) in &document.node_values {
                let fields = &document.node_types[node_type];
                for record in records {
                    let id = record.last().and_then(Value::as_str).unwrap();
                    let node = graph.get_node(id).unwrap();
                    prop_assert_eq!(node.node_type.as_deref(), Some(node_type.as_str()));
                    prop_assert_eq!(node.get(NODE_TYPE_ATTR), Some(&Value::String(node_type.clone())));
                    for (i, field) in fields.iter().enumerate() {
                        prop_assert_eq!(node.get(field), Some(&record[i]));
                    }
                    prop_assert_eq!(node.get("id"), record.last());
                }
            }

            // Later records for the same ordered pair replace earlier ones
            let mut expected: HashMap<(String, String), &Vec<Value>> = HashMap::new();
            for record in &document.relationship_values {
                let n = record.len();
                let key = (record[n - 2].as_str().unwrap().to_string(), record[n - 1].as_str().unwrap().to_string());
                expected.insert(key, record);
            }
            prop_assert_eq!(graph.edge_count(), expected.len());

            for ((src, dst), record) in &expected {
                let relationship_type = record[0].as_str().unwrap();
                let fields = &document.relationship_types[relationship_type];
                let edge = graph.get_edge(src, dst).unwrap();
                prop_assert_eq!(edge.relationship_type.as_deref(), Some(relationship_type));
                prop_assert_eq!(
                    edge.attributes.get(RELATIONSHIP_TYPE_ATTR),
                    Some(&Value::String(relationship_type.to_string()))
                );
                for (i, field) in fields.iter().enumerate() {
                    prop_assert_eq!(edge.attributes.get(field), Some(&record[i + 1]));
                }
                prop_assert_eq!(edge.attributes.len(), fields.len() + 1);
            }
        }
    }
}
