//! # Integration Adapter
//!
//! The surface external systems consume: prepare an execution context
//! for an artifact entering a domain, emit proofs outward, and fetch
//! them back by id. Persistence behind this adapter is opaque to the
//! core; this implementation keeps everything in memory.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use jib_core::{ArtifactId, BoundaryProof, CryptographicBinding, DomainId, ExecutionDomain};

/// A binding reduced to what external systems need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSummary {
    /// The binding id.
    pub id: String,
    /// The bound jurisdiction.
    pub jurisdiction_id: String,
    /// The binding category.
    pub binding_type: String,
}

/// Everything an external runtime needs to admit an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// The artifact entering execution.
    pub artifact_id: ArtifactId,
    /// The domain it enters.
    pub domain_id: DomainId,
    /// The artifact's jurisdiction bindings.
    pub jurisdiction_bindings: Vec<BindingSummary>,
}

#[derive(Debug, Default)]
struct AdapterState {
    bindings: HashMap<String, CryptographicBinding>,
    proofs: HashMap<String, BoundaryProof>,
}

/// In-memory integration surface.
#[derive(Debug, Default)]
pub struct IntegrationAdapter {
    state: RwLock<AdapterState>,
}

impl IntegrationAdapter {
    /// Create an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding for later context preparation.
    pub fn register_binding(&self, binding: CryptographicBinding) {
        self.state
            .write()
            .bindings
            .insert(binding.id.clone(), binding);
    }

    /// Build the execution context for `artifact_id` entering
    /// `domain_id`.
    pub fn prepare_execution_context(
        &self,
        artifact_id: &ArtifactId,
        domain_id: &DomainId,
    ) -> ExecutionContext {
        let state = self.state.read();
        let jurisdiction_bindings = state
            .bindings
            .values()
            .filter(|b| b.artifact_id == *artifact_id)
            .map(|b| BindingSummary {
                id: b.id.clone(),
                jurisdiction_id: b.jurisdiction_id.to_string(),
                binding_type: b.binding_type.clone(),
            })
            .collect();

        ExecutionContext {
            artifact_id: artifact_id.clone(),
            domain_id: domain_id.clone(),
            jurisdiction_bindings,
        }
    }

    /// Emit a proof to external consumers.
    pub fn emit_proof(&self, proof: BoundaryProof) {
        self.state.write().proofs.insert(proof.id.clone(), proof);
    }

    /// A previously emitted proof by id.
    pub fn get_proof(&self, proof_id: &str) -> Option<BoundaryProof> {
        self.state.read().proofs.get(proof_id).cloned()
    }

    /// Every proof emitted so far.
    pub fn all_proofs(&self) -> Vec<BoundaryProof> {
        self.state.read().proofs.values().cloned().collect()
    }

    /// Every registered binding for one artifact.
    pub fn bindings_for_artifact(&self, artifact_id: &ArtifactId) -> Vec<CryptographicBinding> {
        self.state
            .read()
            .bindings
            .values()
            .filter(|b| b.artifact_id == *artifact_id)
            .cloned()
            .collect()
    }

    /// Whether a domain record is complete enough to integrate against.
    pub fn validate_execution_domain(&self, domain: &ExecutionDomain) -> bool {
        !domain.id.as_str().is_empty() && !domain.jurisdiction_id.as_str().is_empty()
    }
}
