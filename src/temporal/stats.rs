//! Statistics over a mean trend

use serde::Serialize;

use super::TrendPoint;
use crate::error::{GraphError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakReport {
    pub trend: Vec<TrendPoint>,
    pub threshold: f64,
    /// Timestamps with mean >= threshold
    pub peak: Vec<usize>,
    pub off_peak: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub timestamp: usize,
    pub value: f64,
    pub z_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport {
    pub trend: Vec<TrendPoint>,
    pub mean: f64,
    /// Population standard deviation of the trend values
    pub std_dev: f64,
    pub z_threshold: f64,
    pub anomalies: Vec<Anomaly>,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population (divide by n) standard deviation
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

pub fn classify_peaks(trend: Vec<TrendPoint>, threshold: f64) -> PeakReport {
    let (peak, off_peak): (Vec<&TrendPoint>, Vec<&TrendPoint>) =
        trend.iter().partition(|point| point.value >= threshold);
    let peak = peak.into_iter().map(|p| p.timestamp).collect();
    let off_peak = off_peak.into_iter().map(|p| p.timestamp).collect();

    PeakReport {
        trend,
        threshold,
        peak,
        off_peak,
    }
}

/// Flag points whose z-score against the trend itself exceeds `z_threshold`
/// in absolute value.
///
/// Empty and zero-variance trends are rejected.
pub fn detect_anomalies(trend: Vec<TrendPoint>, z_threshold: f64) -> Result<AnomalyReport> {
    let values: Vec<f64> = trend.iter().map(|p| p.value).collect();
    let degenerate = || GraphError::DegenerateDistribution { points: values.len() };

    let mu = mean(&values).ok_or_else(degenerate)?;
    let sigma = population_std_dev(&values).ok_or_else(degenerate)?;
    if sigma == 0.0 || !sigma.is_finite() {
        return Err(degenerate());
    }

    let anomalies = trend
        .iter()
        .filter_map(|point| {
            let z_score = (point.value - mu) / sigma;
            (z_score.abs() > z_threshold).then_some(Anomaly {
                timestamp: point.timestamp,
                value: point.value,
                z_score,
            })
        })
        .collect();

    Ok(AnomalyReport {
        trend,
        mean: mu,
        std_dev: sigma,
        z_threshold,
        anomalies,
    })
}
