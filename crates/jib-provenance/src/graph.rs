//! # Provenance DAG
//!
//! Nodes are added with explicit parent ids; edges run parent → child.
//! Lineage traces are DFS-ordered starting at the queried node, so a
//! trace reads child-first back to the sources. Acyclicity is validated
//! with a recursion-stack DFS; any back-edge fails the whole graph.

use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use jib_core::{ArtifactId, JurisdictionId};

/// The operations recorded in provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Artifact content was read.
    Read,
    /// Artifact content was written.
    Write,
    /// Artifact was derived into a new form.
    Transform,
    /// Artifact left one runtime for another.
    Transmit,
    /// The enforcement pipeline ruled on a crossing.
    BoundaryCheck,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Read => f.write_str("read"),
            Operation::Write => f.write_str("write"),
            Operation::Transform => f.write_str("transform"),
            Operation::Transmit => f.write_str("transmit"),
            Operation::BoundaryCheck => f.write_str("boundary_check"),
        }
    }
}

/// One recorded operation on an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceNode {
    /// Node identifier (digest-derived or caller-chosen, unique).
    pub id: String,
    /// The artifact operated on.
    pub artifact_id: ArtifactId,
    /// What happened.
    pub operation: Operation,
    /// The jurisdiction the operation ran in.
    pub jurisdiction_id: JurisdictionId,
    /// Unix seconds.
    pub timestamp: i64,
    /// Ids of the input nodes this operation consumed.
    pub parent_ids: Vec<String>,
    /// Free-form annotations.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// A single jurisdiction transition `(from, to)` found in a lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryCrossing {
    /// Jurisdiction the data came from.
    pub from: JurisdictionId,
    /// Jurisdiction the data moved to.
    pub to: JurisdictionId,
}

/// Append-only DAG of provenance nodes.
#[derive(Debug, Default)]
pub struct ProvenanceGraph {
    inner: RwLock<GraphInner>,
}

#[derive(Debug, Default)]
struct GraphInner {
    nodes: HashMap<String, ProvenanceNode>,
    /// parent id → child ids, in insertion order.
    edges: HashMap<String, Vec<String>>,
}

impl ProvenanceGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, recording parent → child edges for each parent id.
    pub fn add_node(&self, node: ProvenanceNode) {
        let mut inner = self.inner.write();
        for parent_id in &node.parent_ids {
            inner
                .edges
                .entry(parent_id.clone())
                .or_default()
                .push(node.id.clone());
        }
        inner.nodes.insert(node.id.clone(), node);
    }

    /// A snapshot of the node with the given id.
    pub fn get(&self, node_id: &str) -> Option<ProvenanceNode> {
        self.inner.read().nodes.get(node_id).cloned()
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Whether the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.inner.read().nodes.is_empty()
    }

    /// DFS-ordered lineage starting at `node_id`, then its ancestors.
    ///
    /// A visited set prevents revisits when ancestries share nodes.
    /// Unknown ids yield an empty trace.
    pub fn trace_lineage(&self, node_id: &str) -> Vec<ProvenanceNode> {
        let inner = self.inner.read();
        let mut lineage = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack = vec![node_id.to_string()];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(node) = inner.nodes.get(&current) {
                lineage.push(node.clone());
                // Reverse so the first parent is explored first, matching
                // recursive DFS order.
                for parent_id in node.parent_ids.iter().rev() {
                    stack.push(parent_id.clone());
                }
            }
        }
        lineage
    }

    /// All jurisdiction transitions along the lineage of `node_id`,
    /// emitted oldest-first (the parent → child direction of time).
    pub fn find_boundary_crossings(&self, node_id: &str) -> Vec<BoundaryCrossing> {
        let lineage = self.trace_lineage(node_id);
        let mut crossings = Vec::new();

        // The lineage is [child, ..., ancestor]; walk it backwards.
        for window in 0..lineage.len().saturating_sub(1) {
            let from = &lineage[lineage.len() - 1 - window];
            let to = &lineage[lineage.len() - 2 - window];
            if from.jurisdiction_id != to.jurisdiction_id {
                crossings.push(BoundaryCrossing {
                    from: from.jurisdiction_id.clone(),
                    to: to.jurisdiction_id.clone(),
                });
            }
        }
        crossings
    }

    /// Whether `source_node_id` appears in the lineage of
    /// `target_node_id` — i.e. taint at the source reaches the target.
    pub fn check_taint_propagation(&self, source_node_id: &str, target_node_id: &str) -> bool {
        self.trace_lineage(target_node_id)
            .iter()
            .any(|node| node.id == source_node_id)
    }

    /// Count of lineage nodes per jurisdiction for `node_id`.
    pub fn jurisdiction_summary(&self, node_id: &str) -> BTreeMap<JurisdictionId, usize> {
        let mut counts = BTreeMap::new();
        for node in self.trace_lineage(node_id) {
            *counts.entry(node.jurisdiction_id).or_insert(0) += 1;
        }
        counts
    }

    /// Whether the graph contains no cycle.
    ///
    /// DFS with a recursion stack over every node; a back-edge anywhere
    /// fails the whole graph.
    pub fn validate_acyclicity(&self) -> bool {
        let inner = self.inner.read();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut in_stack: HashSet<&str> = HashSet::new();

        for start in inner.nodes.keys() {
            if visited.contains(start.as_str()) {
                continue;
            }
            // Iterative DFS; the stack holds (node, next child index).
            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            in_stack.insert(start.as_str());
            visited.insert(start.as_str());

            while let Some((node_id, child_index)) = stack.pop() {
                let children = inner.edges.get(node_id).map(Vec::as_slice).unwrap_or(&[]);
                if child_index < children.len() {
                    stack.push((node_id, child_index + 1));
                    let child: &str = &children[child_index];
                    if !inner.nodes.contains_key(child) {
                        continue;
                    }
                    if in_stack.contains(child) {
                        return false; // back-edge
                    }
                    if visited.insert(child) {
                        in_stack.insert(child);
                        stack.push((child, 0));
                    }
                } else {
                    in_stack.remove(node_id);
                }
            }
        }
        true
    }
}
