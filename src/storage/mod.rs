//! Snapshot documents and the decoded record types built from them

pub mod codec;
pub mod document;
pub mod snapshot_set;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use codec::{check_arity, zip_fields};
pub use document::{SchemaCatalog, SnapshotDocument};
pub use snapshot_set::{timestamp_token, SnapshotFile, SnapshotSet};

/// Implicit attribute recording the node-type bucket a vertex came from
pub const NODE_TYPE_ATTR: &str = "node_type";

/// Implicit attribute recording the relationship type of an edge
pub const RELATIONSHIP_TYPE_ATTR: &str = "relationship_type";

/// Open-ended attribute bag. Keys are schema field names, known only at load time.
pub type Attributes = BTreeMap<String, Value>;

/// Decoded vertex: type tag + attribute bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Identifier, unique across the whole snapshot
    pub id: String,

    /// Type bucket that produced the vertex. `None` for vertices that only
    /// appear as edge endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    /// All decoded fields, including the identifier field and `node_type`
    pub attributes: Attributes,
}

impl NodeRecord {
    /// Vertex materialised from an edge endpoint with no node record behind it
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: None,
            attributes: Attributes::new(),
        }
    }

    pub fn is_type(&self, node_type: &str) -> bool {
        self.node_type.as_deref() == Some(node_type)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        attr_f64(&self.attributes, key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

/// Decoded edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub src: String,
    pub dst: String,

    /// `None` for fallback edges whose type is not declared in the schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,

    pub attributes: Attributes,
}

impl EdgeRecord {
    pub fn is_type(&self, relationship_type: &str) -> bool {
        self.relationship_type.as_deref() == Some(relationship_type)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        attr_f64(&self.attributes, key)
    }

    /// The endpoint opposite to `id` (for undirected incidence)
    pub fn other_end(&self, id: &str) -> &str {
        if self.src == id {
            &self.dst
        } else {
            &self.src
        }
    }
}

/// Numeric view of an attribute. Non-numeric values read as `None`.
pub fn attr_f64(attributes: &Attributes, key: &str) -> Option<f64> {
    attributes.get(key).and_then(Value::as_f64)
}

/// Identifier form of a record value: strings as-is, integers in decimal.
pub fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}
