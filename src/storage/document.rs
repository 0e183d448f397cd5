//! Self-describing snapshot document (one per timestamp)
//!
//! ```text
//! {
//!   "directed": true,
//!   "node_types":          { "Facility": ["name", "operating_cost", "id"] },
//!   "node_values":         { "Facility": [["Plant A", 1200.0, "F_001"]] },
//!   "relationship_types":  { "PartsToFacility": ["quantity", "distance"] },
//!   "relationship_values": [["PartsToFacility", 40, 12.5, "P_001", "F_001"]]
//! }
//! ```
//!
//! Node records end with their identifier. Edge records start with the
//! relationship type and end with `source, target`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codec::check_arity;
use crate::error::{GraphError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub directed: bool,

    /// node type -> ordered field names; the last one names the identifier
    pub node_types: IndexMap<String, Vec<String>>,

    /// node type -> records aligned with `node_types[type]`
    pub node_values: IndexMap<String, Vec<Vec<Value>>>,

    /// relationship type -> ordered attribute names (endpoints excluded)
    pub relationship_types: IndexMap<String, Vec<String>>,

    /// `[type, attr..., source, target]`
    pub relationship_values: Vec<Vec<Value>>,
}

/// Declared field names per type, for attribute selectors
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaCatalog {
    pub node_types: IndexMap<String, Vec<String>>,
    pub relationship_types: IndexMap<String, Vec<String>>,
}

impl SnapshotDocument {
    /// Parse a document; missing keys and wrong shapes surface as schema errors.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Position of `attribute` inside a node record of `node_type`
    pub fn node_field_index(&self, node_type: &str, attribute: &str) -> Option<usize> {
        self.node_types
            .get(node_type)?
            .iter()
            .position(|f| f == attribute)
    }

    /// Position of `attribute` inside a full edge record of `relationship_type`
    /// (offset by the leading type-name element)
    pub fn relationship_field_index(&self, relationship_type: &str, attribute: &str) -> Option<usize> {
        self.relationship_types
            .get(relationship_type)?
            .iter()
            .position(|f| f == attribute)
            .map(|idx| idx + 1)
    }

    /// Records of one node type (empty if the bucket is absent)
    pub fn nodes_of_type(&self, node_type: &str) -> &[Vec<Value>] {
        self.node_values
            .get(node_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edge records whose type tag equals `relationship_type`
    pub fn edges_of_type<'a>(&'a self, relationship_type: &'a str) -> impl Iterator<Item = &'a Vec<Value>> + 'a {
        self.relationship_values
            .iter()
            .filter(move |record| record.first().and_then(Value::as_str) == Some(relationship_type))
    }

    /// Records of one node type, each checked against the declared field list.
    ///
    /// Scans that read raw records go through here so a malformed snapshot
    /// fails the same way it does in `decode`.
    pub fn checked_nodes_of_type(&self, node_type: &str) -> Result<&[Vec<Value>]> {
        let records = self.nodes_of_type(node_type);
        if records.is_empty() {
            return Ok(records);
        }

        let fields = self.node_types.get(node_type).ok_or_else(|| {
            GraphError::Schema(format!("node_values has undeclared node type '{}'", node_type))
        })?;
        for record in records {
            check_arity(fields, record).map_err(|e| GraphError::Schema(format!("{} record: {}", node_type, e)))?;
        }
        Ok(records)
    }

    /// Records of a declared relationship type, each checked to hold the type
    /// tag, one value per declared field and both endpoints.
    ///
    /// Undeclared types carry no attributes, so they yield nothing here.
    pub fn checked_edges_of_type<'a>(&'a self, relationship_type: &'a str) -> Result<Vec<&'a Vec<Value>>> {
        let fields = match self.relationship_types.get(relationship_type) {
            Some(fields) => fields,
            None => return Ok(Vec::new()),
        };

        self.edges_of_type(relationship_type)
            .map(|record| {
                let expected = fields.len() + 3;
                if record.len() == expected {
                    Ok(record)
                } else {
                    Err(GraphError::Schema(format!(
                        "{} edge record has {} values, expected {} (type, {:?}, source, target)",
                        relationship_type,
                        record.len(),
                        expected,
                        fields
                    )))
                }
            })
            .collect()
    }

    pub fn catalog(&self) -> SchemaCatalog {
        SchemaCatalog {
            node_types: self.node_types.clone(),
            relationship_types: self.relationship_types.clone(),
        }
    }
}
