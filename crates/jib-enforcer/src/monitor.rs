//! # Performance Monitor
//!
//! Per-operation duration series and counts, behind a reader/writer
//! lock like every other shared registry in the stack.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Aggregates for one operation name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationStats {
    /// How many times the operation ran.
    pub count: usize,
    /// Mean duration in seconds.
    pub average: f64,
    /// Total duration in seconds.
    pub total: f64,
}

#[derive(Debug, Default)]
struct Series {
    durations: Vec<f64>,
}

/// Records operation durations for observability.
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    metrics: RwLock<BTreeMap<String, Series>>,
}

impl PerformanceMonitor {
    /// Create an empty monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one run of `operation` taking `duration` seconds.
    pub fn record_operation(&self, operation: &str, duration: f64) {
        self.metrics
            .write()
            .entry(operation.to_string())
            .or_default()
            .durations
            .push(duration);
    }

    /// Mean duration for `operation`, `0.0` when never recorded.
    pub fn average_duration(&self, operation: &str) -> f64 {
        let metrics = self.metrics.read();
        match metrics.get(operation) {
            Some(series) if !series.durations.is_empty() => {
                series.durations.iter().sum::<f64>() / series.durations.len() as f64
            }
            _ => 0.0,
        }
    }

    /// How many times `operation` ran.
    pub fn operation_count(&self, operation: &str) -> usize {
        self.metrics
            .read()
            .get(operation)
            .map(|series| series.durations.len())
            .unwrap_or(0)
    }

    /// Aggregates for every recorded operation.
    pub fn all_metrics(&self) -> BTreeMap<String, OperationStats> {
        self.metrics
            .read()
            .iter()
            .map(|(name, series)| {
                let total: f64 = series.durations.iter().sum();
                let count = series.durations.len();
                (
                    name.clone(),
                    OperationStats {
                        count,
                        average: if count == 0 { 0.0 } else { total / count as f64 },
                        total,
                    },
                )
            })
            .collect()
    }

    /// Drop all recorded series.
    pub fn reset(&self) {
        self.metrics.write().clear();
    }
}
