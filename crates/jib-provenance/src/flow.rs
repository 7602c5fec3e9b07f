//! # Data-Flow Tracker
//!
//! A flat, append-only record of cross-jurisdiction data movements,
//! layered over the provenance DAG. Each recorded flow also creates a
//! provenance node, so the DAG and the record list stay consistent.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use jib_core::{sha256_hex, ArtifactId, JurisdictionId};

use crate::graph::{Operation, ProvenanceGraph, ProvenanceNode};

/// One recorded data movement between jurisdictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    /// The provenance node created for this flow.
    pub node_id: String,
    /// The artifact that moved.
    pub artifact_id: ArtifactId,
    /// What the movement was part of.
    pub operation: Operation,
    /// Where the data came from.
    pub source_jurisdiction: JurisdictionId,
    /// Where the data went.
    pub target_jurisdiction: JurisdictionId,
    /// Unix seconds.
    pub timestamp: i64,
    /// Whether the flow left its source jurisdiction.
    pub cross_boundary: bool,
}

/// Aggregate counts over all recorded flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSummary {
    /// All flows recorded.
    pub total_flows: usize,
    /// Flows whose source and target jurisdictions differ.
    pub cross_boundary_flows: usize,
    /// Flows that stayed inside one jurisdiction.
    pub intra_boundary_flows: usize,
}

/// Tracks data flows across jurisdictional boundaries.
#[derive(Debug, Default)]
pub struct DataFlowTracker {
    graph: ProvenanceGraph,
    records: RwLock<Vec<FlowRecord>>,
}

impl DataFlowTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying provenance DAG.
    pub fn graph(&self) -> &ProvenanceGraph {
        &self.graph
    }

    /// Record a flow at `timestamp`, creating a provenance node for it.
    ///
    /// Returns the id of the created node.
    pub fn record_data_flow(
        &self,
        artifact_id: ArtifactId,
        operation: Operation,
        source_jurisdiction: JurisdictionId,
        target_jurisdiction: JurisdictionId,
        timestamp: i64,
    ) -> String {
        let node_id = sha256_hex(
            format!(
                "{artifact_id}:{operation}:{source_jurisdiction}:{target_jurisdiction}:{timestamp}"
            )
            .as_bytes(),
        );
        let cross_boundary = source_jurisdiction != target_jurisdiction;

        let mut metadata = BTreeMap::new();
        metadata.insert(
            "target_jurisdiction".to_string(),
            serde_json::Value::String(target_jurisdiction.to_string()),
        );

        self.graph.add_node(ProvenanceNode {
            id: node_id.clone(),
            artifact_id: artifact_id.clone(),
            operation,
            jurisdiction_id: source_jurisdiction.clone(),
            timestamp,
            parent_ids: Vec::new(),
            metadata,
        });

        self.records.write().push(FlowRecord {
            node_id: node_id.clone(),
            artifact_id,
            operation,
            source_jurisdiction,
            target_jurisdiction,
            timestamp,
            cross_boundary,
        });

        node_id
    }

    /// All flows that crossed a jurisdiction boundary.
    pub fn cross_boundary_flows(&self) -> Vec<FlowRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.cross_boundary)
            .cloned()
            .collect()
    }

    /// Aggregate counts over all recorded flows.
    pub fn flow_summary(&self) -> FlowSummary {
        let records = self.records.read();
        let cross = records.iter().filter(|r| r.cross_boundary).count();
        FlowSummary {
            total_flows: records.len(),
            cross_boundary_flows: cross,
            intra_boundary_flows: records.len() - cross,
        }
    }

    /// Every flow touching `jurisdiction_id` as source or target.
    pub fn audit_compliance(&self, jurisdiction_id: &JurisdictionId) -> Vec<FlowRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| {
                r.source_jurisdiction == *jurisdiction_id
                    || r.target_jurisdiction == *jurisdiction_id
            })
            .cloned()
            .collect()
    }
}
