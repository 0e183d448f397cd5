//! Ordered set of snapshot files, one per timestamp

use std::fs::{self, File};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use memmap2::Mmap;
use regex_lite::Regex;

use super::SnapshotDocument;
use crate::error::{GraphError, Result};

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"timestamp_(\d+)").expect("valid timestamp pattern"))
}

/// Numeric `timestamp_<n>` token embedded in a snapshot file name
pub fn timestamp_token(name: &str) -> Option<u64> {
    token_pattern()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub token: u64,
    pub path: PathBuf,
}

/// Snapshot files sorted by their embedded token; timestamp `t` is position `t`.
#[derive(Debug, Clone)]
pub struct SnapshotSet {
    files: Vec<SnapshotFile>,
}

impl SnapshotSet {
    /// Find every `timestamp_<n>*.json` file directly under `dir`
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
            let has_token = path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or(false, |name| name.starts_with("timestamp_") && timestamp_token(name).is_some());
            if path.is_file() && is_json && has_token {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(GraphError::InvalidFormat(format!(
                "no timestamp_*.json snapshot files in {:?}",
                dir
            )));
        }

        let set = Self::from_paths(paths)?;
        tracing::info!("Discovered {} snapshots in {:?}", set.len(), dir);
        Ok(set)
    }

    /// Order explicit paths by their token
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self> {
        let mut files = paths
            .into_iter()
            .map(|path| {
                let token = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .and_then(timestamp_token)
                    .ok_or_else(|| {
                        GraphError::InvalidFormat(format!("no timestamp token in {:?}", path))
                    })?;
                Ok(SnapshotFile { token, path })
            })
            .collect::<Result<Vec<_>>>()?;

        files.sort_by(|a, b| a.token.cmp(&b.token).then_with(|| a.path.cmp(&b.path)));
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Known timestamps, `0..len`
    pub fn timestamps(&self) -> Range<usize> {
        0..self.files.len()
    }

    pub fn files(&self) -> &[SnapshotFile] {
        &self.files
    }

    pub fn file(&self, timestamp: usize) -> Result<&SnapshotFile> {
        self.files.get(timestamp).ok_or(GraphError::SnapshotNotFound {
            timestamp,
            known: self.files.len(),
        })
    }

    /// Read and parse the document for `timestamp`
    pub fn read_document(&self, timestamp: usize) -> Result<SnapshotDocument> {
        let path = &self.file(timestamp)?.path;
        let file = File::open(path)?;

        if file.metadata()?.len() == 0 {
            return Err(GraphError::Schema(format!("empty snapshot document {:?}", path)));
        }

        let mmap = unsafe { Mmap::map(&file)? };
        SnapshotDocument::from_slice(&mmap)
    }
}
