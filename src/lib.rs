//! supplygraph - temporal supply-chain graph over per-timestamp snapshots
//!
//! # Architecture
//!
//! - **Snapshots**: one self-describing JSON document per timestamp
//!   (`timestamp_<n>.json`), read through memmap2
//! - **Decoder**: positional records -> attributed vertices and edges
//! - **Cache**: bounded LRU of decoded graphs, shared as `Arc`
//! - **Queries**: structural (ego graph, paths, lineage) and supply-chain
//!   domain questions over one graph
//! - **Temporal**: attribute trends, peak classification and anomaly
//!   detection across the whole sequence, straight from the documents
//!
//! # Usage example
//!
//! ```no_run
//! use supplygraph::{query, Session, SessionConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::open(SessionConfig::new("./data/size_1000"))?;
//!
//! let graph = session.select(0)?;
//! let parts = query::parts_for_product_offering(graph.as_ref(), "PO_001");
//! println!("PO_001 needs {} parts", parts.len());
//!
//! let demand = session.analyzer().node_attribute_trend("ProductOffering", "demand")?;
//! for point in demand {
//!     println!("t={} mean demand {:.1}", point.timestamp, point.value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod profile;
pub mod query;
pub mod session;
pub mod storage;
pub mod temporal;

#[cfg(test)]
mod test_fixtures;

pub use config::SessionConfig;
pub use error::{GraphError, Result};
pub use graph::{decode, GraphStore, SnapshotGraph};
pub use session::{Session, SnapshotCache};
pub use storage::{EdgeRecord, NodeRecord, SnapshotDocument, SnapshotSet};
pub use temporal::{TemporalAnalyzer, TrendPoint};
