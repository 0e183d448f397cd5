//! Session configuration

use std::fs::File;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::session::DEFAULT_CACHE_CAPACITY;

/// Default utilisation fraction separating peak from off-peak timestamps
pub const DEFAULT_PEAK_THRESHOLD: f64 = 0.9;

fn default_cache_capacity() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN)
}

fn default_peak_threshold() -> f64 {
    DEFAULT_PEAK_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding `timestamp_<n>.json` snapshots
    pub snapshot_dir: PathBuf,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: NonZeroUsize,

    #[serde(default = "default_peak_threshold")]
    pub peak_threshold: f64,
}

impl SessionConfig {
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.into(),
            cache_capacity: default_cache_capacity(),
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
        }
    }

    /// Zero is clamped to one
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        self
    }

    pub fn peak_threshold(mut self, threshold: f64) -> Self {
        self.peak_threshold = threshold;
        self
    }

    /// Load from a JSON file; omitted fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        serde_json::from_reader(file).map_err(|e| GraphError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
