//! # CLI State File
//!
//! Registrations, bindings, emitted proofs, and the audit leaf sequence,
//! serialized as one JSON document. The leaf sequence is authoritative:
//! the audit root is recomputed from it on every `root` invocation, so
//! tampering with any persisted record is visible as a root mismatch.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use jib_core::{
    Boundary, BoundaryProof, CryptographicBinding, ExecutionDomain, Jurisdiction, NodeId,
};
use jib_crypto::AuditMerkleTree;
use jib_enforcer::IntegratedEnforcer;
use jib_temporal::TemporalBoundary;

/// Everything the CLI persists between invocations.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StateFile {
    /// Registered jurisdictions.
    #[serde(default)]
    pub jurisdictions: Vec<Jurisdiction>,
    /// Registered execution domains.
    #[serde(default)]
    pub domains: Vec<ExecutionDomain>,
    /// Registered boundary rules.
    #[serde(default)]
    pub boundaries: Vec<Boundary>,
    /// Registered temporal boundary rules.
    #[serde(default)]
    pub temporal_boundaries: Vec<TemporalBoundary>,
    /// Signed artifact bindings.
    #[serde(default)]
    pub bindings: Vec<CryptographicBinding>,
    /// Proofs emitted by `enforce`.
    #[serde(default)]
    pub proofs: Vec<BoundaryProof>,
    /// The audit leaf sequence (binding and proof hashes, append order).
    #[serde(default)]
    pub audit_leaves: Vec<String>,
}

impl StateFile {
    /// Load the state file, or start empty when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading state file {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing state file {}", path.display()))
    }

    /// Write the state file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing state")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing state file {}", path.display()))
    }

    /// Replay this state into a fresh single-node enforcer.
    ///
    /// Bindings go through the import path; the decision pipeline
    /// re-verifies them, so a tampered state file fails closed at
    /// enforcement time.
    pub fn build_enforcer(&self) -> anyhow::Result<IntegratedEnforcer> {
        let node_id = NodeId::new("jib-cli").map_err(|e| anyhow::anyhow!(e.to_string()))?;
        let enforcer = IntegratedEnforcer::new(node_id, Vec::new());

        for jurisdiction in &self.jurisdictions {
            enforcer.register_jurisdiction(jurisdiction.clone());
        }
        for domain in &self.domains {
            enforcer.register_execution_domain(domain.clone());
        }
        for boundary in &self.boundaries {
            enforcer.register_boundary(boundary.clone());
        }
        for temporal in &self.temporal_boundaries {
            enforcer.register_temporal_boundary(temporal.clone());
        }
        for binding in &self.bindings {
            enforcer.base().import_binding(binding.clone());
        }
        Ok(enforcer)
    }

    /// Recompute the audit root from the persisted leaf sequence.
    pub fn audit_root(&self) -> String {
        let mut tree = AuditMerkleTree::new();
        for leaf in &self.audit_leaves {
            tree.add_leaf(leaf.clone());
        }
        tree.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jib_core::{DomainId, JurisdictionId, JurisdictionType};

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::load(&dir.path().join("nope.json")).unwrap();
        assert!(state.jurisdictions.is_empty());
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = StateFile::default();
        state.jurisdictions.push(Jurisdiction::new(
            JurisdictionId::new("us-ca").unwrap(),
            "California",
            JurisdictionType::Legal,
        ));
        state.domains.push(ExecutionDomain::new(
            DomainId::new("prod-west").unwrap(),
            "Prod West",
            JurisdictionId::new("us-ca").unwrap(),
        ));
        state.audit_leaves.push("ab".repeat(32));
        state.save(&path).unwrap();

        let loaded = StateFile::load(&path).unwrap();
        assert_eq!(loaded.jurisdictions.len(), 1);
        assert_eq!(loaded.domains.len(), 1);
        assert_eq!(loaded.audit_root(), "ab".repeat(32));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"not json").unwrap();
        assert!(StateFile::load(&path).is_err());
    }

    #[test]
    fn empty_leaf_sequence_has_empty_root() {
        assert_eq!(StateFile::default().audit_root(), "");
    }
}
