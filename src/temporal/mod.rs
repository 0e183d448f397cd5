//! Cross-timestamp aggregation.
//!
//! Scans read every snapshot document directly, one at a time, rather than
//! going through the decoded-graph cache: a trend touches each timestamp once
//! and would otherwise evict the graphs the user is browsing.

pub mod stats;

use serde::Serialize;
use serde_json::Value;

pub use stats::{classify_peaks, detect_anomalies, Anomaly, AnomalyReport, PeakReport};

use crate::error::{GraphError, Result};
use crate::storage::{value_to_id, SnapshotDocument, SnapshotSet};

/// Mean of one attribute at one timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: usize,
    pub value: f64,
}

pub struct TemporalAnalyzer<'a> {
    snapshots: &'a SnapshotSet,
}

fn numeric(value: &Value, context: &str) -> Option<f64> {
    let number = value.as_f64();
    if number.is_none() && !value.is_null() {
        tracing::warn!("Skipping non-numeric value {} for {}", value, context);
    }
    number
}

fn mean_at(timestamp: usize, values: Vec<f64>) -> Option<TrendPoint> {
    stats::mean(&values).map(|value| TrendPoint { timestamp, value })
}

impl<'a> TemporalAnalyzer<'a> {
    pub fn new(snapshots: &'a SnapshotSet) -> Self {
        Self { snapshots }
    }

    /// Collect one optional point per timestamp, in timestamp order
    fn scan<F>(&self, mut point_at: F) -> Result<Vec<TrendPoint>>
    where
        F: FnMut(usize, &SnapshotDocument) -> Result<Option<TrendPoint>>,
    {
        let mut trend = Vec::new();
        for timestamp in self.snapshots.timestamps() {
            let document = self.snapshots.read_document(timestamp)?;
            if let Some(point) = point_at(timestamp, &document)? {
                trend.push(point);
            }
        }
        Ok(trend)
    }

    /// Per-timestamp mean of `attribute` over every `node_type` record.
    ///
    /// Timestamps where the type or attribute is undeclared, or no record
    /// holds a number, are omitted.
    pub fn node_attribute_trend(&self, node_type: &str, attribute: &str) -> Result<Vec<TrendPoint>> {
        let context = format!("{}.{}", node_type, attribute);
        let trend = self.scan(|timestamp, document| {
            let idx = match document.node_field_index(node_type, attribute) {
                Some(idx) => idx,
                None => return Ok(None),
            };
            let values = document
                .checked_nodes_of_type(node_type)?
                .iter()
                .filter_map(|record| numeric(&record[idx], &context))
                .collect();
            Ok(mean_at(timestamp, values))
        })?;

        tracing::info!(
            "Trend {}: {} points over {} snapshots",
            context,
            trend.len(),
            self.snapshots.len()
        );
        Ok(trend)
    }

    /// `attribute` of the vertex `node_id` at every timestamp that has it.
    ///
    /// A record matches only when its trailing identifier equals `node_id`;
    /// other fields that happen to contain the same text do not count. Node
    /// buckets are searched in document order and the first match wins.
    pub fn node_value_trend(&self, node_id: &str, attribute: &str) -> Result<Vec<TrendPoint>> {
        let context = format!("{}.{}", node_id, attribute);
        let trend = self.scan(|timestamp, document| {
            for node_type in document.node_values.keys() {
                let records = document.checked_nodes_of_type(node_type)?;
                let found = records
                    .iter()
                    .find(|record| record.last().and_then(value_to_id).as_deref() == Some(node_id));
                if let Some(record) = found {
                    let point = document
                        .node_field_index(node_type, attribute)
                        .and_then(|idx| numeric(&record[idx], &context))
                        .map(|value| TrendPoint { timestamp, value });
                    return Ok(point);
                }
            }
            Ok(None)
        })?;

        if trend.is_empty() {
            return Err(GraphError::AttributeNeverFound {
                node_id: node_id.to_string(),
                attribute: attribute.to_string(),
            });
        }
        Ok(trend)
    }

    /// Per-timestamp mean of `attribute` over every `relationship_type` edge
    pub fn edge_attribute_trend(&self, relationship_type: &str, attribute: &str) -> Result<Vec<TrendPoint>> {
        let context = format!("{}.{}", relationship_type, attribute);
        let trend = self.scan(|timestamp, document| {
            let idx = match document.relationship_field_index(relationship_type, attribute) {
                Some(idx) => idx,
                None => return Ok(None),
            };
            let values = document
                .checked_edges_of_type(relationship_type)?
                .into_iter()
                .filter_map(|record| numeric(&record[idx], &context))
                .collect();
            Ok(mean_at(timestamp, values))
        })?;

        tracing::info!(
            "Trend {}: {} points over {} snapshots",
            context,
            trend.len(),
            self.snapshots.len()
        );
        Ok(trend)
    }

    pub fn peak_classification(&self, node_type: &str, attribute: &str, threshold: f64) -> Result<PeakReport> {
        let trend = self.node_attribute_trend(node_type, attribute)?;
        Ok(classify_peaks(trend, threshold))
    }

    pub fn detect_anomalies(&self, node_type: &str, attribute: &str, z_threshold: f64) -> Result<AnomalyReport> {
        let trend = self.node_attribute_trend(node_type, attribute)?;
        let report = detect_anomalies(trend, z_threshold)?;
        if !report.anomalies.is_empty() {
            tracing::info!(
                "{} anomalies in {}.{} at |z| > {}",
                report.anomalies.len(),
                node_type,
                attribute,
                z_threshold
            );
        }
        Ok(report)
    }
}
