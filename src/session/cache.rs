//! Bounded LRU cache of decoded snapshot graphs

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::error::Result;
use crate::graph::{decode, GraphStore, SnapshotGraph};
use crate::storage::SnapshotSet;

/// Default number of decoded timestamps kept in memory
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Timestamp -> decoded graph, evicting the least recently used entry.
///
/// Not synchronised: one cache per session. Callers sharing it across threads
/// must wrap it in a mutex.
pub struct SnapshotCache {
    snapshots: SnapshotSet,
    graphs: LruCache<usize, Arc<SnapshotGraph>>,
    stats: CacheStats,
}

impl SnapshotCache {
    pub fn new(snapshots: SnapshotSet, capacity: NonZeroUsize) -> Self {
        Self {
            snapshots,
            graphs: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    pub fn with_default_capacity(snapshots: SnapshotSet) -> Self {
        Self::new(
            snapshots,
            NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        )
    }

    /// Cached graph for `timestamp`, reading and decoding the snapshot on a miss.
    ///
    /// A failed read or decode leaves the cache untouched.
    pub fn get_or_load(&mut self, timestamp: usize) -> Result<Arc<SnapshotGraph>> {
        if let Some(graph) = self.graphs.get(&timestamp) {
            self.stats.hits += 1;
            tracing::debug!("Snapshot cache hit: timestamp {}", timestamp);
            return Ok(Arc::clone(graph));
        }

        self.stats.misses += 1;
        let document = self.snapshots.read_document(timestamp)?;
        let graph = Arc::new(decode(&document)?);

        tracing::info!(
            "Decoded snapshot {}: {} nodes, {} edges",
            timestamp,
            graph.node_count(),
            graph.edge_count()
        );

        if let Some((evicted, _)) = self.graphs.push(timestamp, Arc::clone(&graph)) {
            if evicted != timestamp {
                self.stats.evictions += 1;
                tracing::debug!("Snapshot cache evicted timestamp {}", evicted);
            }
        }

        Ok(graph)
    }

    pub fn contains(&self, timestamp: usize) -> bool {
        self.graphs.contains(&timestamp)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.graphs.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn snapshots(&self) -> &SnapshotSet {
        &self.snapshots
    }

    pub fn clear(&mut self) {
        self.graphs.clear();
    }
}
