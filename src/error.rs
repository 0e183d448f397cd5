//! Error types for snapshot decoding and graph queries

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Snapshot not found: timestamp {timestamp} (known: 0..{known})")]
    SnapshotNotFound { timestamp: usize, known: usize },

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Edge not found: {src} -> {dst}")]
    EdgeNotFound { src: String, dst: String },

    #[error("No path between {src} and {dst}")]
    NoPath { src: String, dst: String },

    #[error("Invalid date {value:?}: {reason}")]
    DateParse { value: String, reason: String },

    #[error("Degenerate distribution over {points} trend points (zero variance)")]
    DegenerateDistribution { points: usize },

    #[error("Ancestor/descendant queries require a directed graph")]
    UndirectedGraph,

    #[error("Attribute '{attribute}' not found for node '{node_id}' in any timestamp")]
    AttributeNeverFound { node_id: String, attribute: String },

    #[error("Invalid edge weight {weight} on {src} -> {dst}")]
    InvalidWeight { src: String, dst: String, weight: f64 },

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Config error in {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(serde_json::Error),
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        // Shape problems (missing key, wrong type) are schema violations, not parse failures
        match err.classify() {
            serde_json::error::Category::Data => GraphError::Schema(err.to_string()),
            _ => GraphError::Json(err),
        }
    }
}

impl GraphError {
    /// Errors that mean "the target is absent" rather than "something broke".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::NodeNotFound(_)
                | GraphError::EdgeNotFound { .. }
                | GraphError::SnapshotNotFound { .. }
                | GraphError::AttributeNeverFound { .. }
        )
    }
}
