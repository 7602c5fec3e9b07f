//! # Boundary Proofs
//!
//! A proof is the machine-verifiable record of one enforcement decision:
//! which artifact, which domain pair, which jurisdiction ruled, whether
//! flow was allowed, and why. Proofs are append-only; their hashes are
//! the leaves of the audit Merkle tree.

use serde::{Deserialize, Serialize};

use crate::digest::sha256_hex;
use crate::identity::{ArtifactId, DomainId, JurisdictionId};

/// The machine-verifiable record of one enforcement decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryProof {
    /// `sha256_hex(artifact_id ":" source_domain_id ":" target_domain_id)`.
    pub id: String,
    /// The artifact whose movement was decided.
    pub artifact_id: ArtifactId,
    /// Where the artifact is moving from.
    pub source_domain_id: DomainId,
    /// Where the artifact is moving to.
    pub target_domain_id: DomainId,
    /// The jurisdiction of the source domain — the scope that ruled.
    pub jurisdiction_id: JurisdictionId,
    /// The decision.
    pub allowed: bool,
    /// Why — taken verbatim from the deciding boundary rule, or the
    /// default-deny explanation when no rule exists.
    pub reason: String,
    /// Unix seconds at which the decision was made.
    pub timestamp: i64,
    /// Supporting record ids (binding ids, decision-log entries).
    pub evidence: Vec<String>,
}

impl BoundaryProof {
    /// Derive the proof id from the request triple.
    pub fn derive_id(
        artifact_id: &ArtifactId,
        source_domain_id: &DomainId,
        target_domain_id: &DomainId,
    ) -> String {
        sha256_hex(format!("{artifact_id}:{source_domain_id}:{target_domain_id}").as_bytes())
    }

    /// The proof's Merkle leaf:
    /// `sha256_hex(id ":" artifact ":" src ":" tgt ":" allowed ":" timestamp)`
    /// with the decision rendered as `true`/`false`.
    pub fn hash(&self) -> String {
        sha256_hex(
            format!(
                "{}:{}:{}:{}:{}:{}",
                self.id,
                self.artifact_id,
                self.source_domain_id,
                self.target_domain_id,
                self.allowed,
                self.timestamp
            )
            .as_bytes(),
        )
    }
}
