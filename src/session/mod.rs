//! One dashboard session: the snapshot sequence, its graph cache and the
//! currently selected graph

pub mod cache;

use std::ops::Range;
use std::sync::Arc;

pub use cache::{CacheStats, SnapshotCache, DEFAULT_CACHE_CAPACITY};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::graph::SnapshotGraph;
use crate::storage::{SchemaCatalog, SnapshotDocument, SnapshotSet};
use crate::temporal::TemporalAnalyzer;

pub struct Session {
    config: SessionConfig,
    cache: SnapshotCache,
    current: Option<(usize, Arc<SnapshotGraph>)>,
}

impl Session {
    /// Discover snapshots under the configured directory
    pub fn open(config: SessionConfig) -> Result<Self> {
        let snapshots = SnapshotSet::discover(&config.snapshot_dir)?;
        Ok(Self::with_snapshots(snapshots, config))
    }

    pub fn with_snapshots(snapshots: SnapshotSet, config: SessionConfig) -> Self {
        let cache = SnapshotCache::new(snapshots, config.cache_capacity);
        Self {
            config,
            cache,
            current: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn snapshots(&self) -> &SnapshotSet {
        self.cache.snapshots()
    }

    /// Known timestamps, for selector population
    pub fn timestamps(&self) -> Range<usize> {
        self.snapshots().timestamps()
    }

    /// Graph for `timestamp` through the cache, without changing the selection
    pub fn graph_at(&mut self, timestamp: usize) -> Result<Arc<SnapshotGraph>> {
        self.cache.get_or_load(timestamp)
    }

    /// Make `timestamp` the current graph. On failure the previous selection
    /// stays in place and remains usable.
    pub fn select(&mut self, timestamp: usize) -> Result<Arc<SnapshotGraph>> {
        let graph = self.cache.get_or_load(timestamp)?;
        self.current = Some((timestamp, Arc::clone(&graph)));
        Ok(graph)
    }

    pub fn current(&self) -> Option<&Arc<SnapshotGraph>> {
        self.current.as_ref().map(|(_, graph)| graph)
    }

    pub fn current_timestamp(&self) -> Option<usize> {
        self.current.as_ref().map(|(timestamp, _)| *timestamp)
    }

    /// Raw document for `timestamp`, read fresh
    pub fn document(&self, timestamp: usize) -> Result<SnapshotDocument> {
        self.snapshots().read_document(timestamp)
    }

    /// Declared node/relationship fields of one snapshot
    pub fn catalog(&self, timestamp: usize) -> Result<SchemaCatalog> {
        Ok(self.document(timestamp)?.catalog())
    }

    /// Full-range scans; bypasses the graph cache
    pub fn analyzer(&self) -> TemporalAnalyzer<'_> {
        TemporalAnalyzer::new(self.snapshots())
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }
}
