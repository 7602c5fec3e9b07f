//! # Invariant Checker
//!
//! Pure predicates over enforcer state and proofs. Each check returns
//! `Ok(())` or an [`EnforcementError::InvariantViolation`] naming the
//! invariant and the offending context. The integrated pipeline calls
//! these inline; binding integrity (I3) is asserted by the cryptographic
//! layer during the binding loop.

use jib_core::{ArtifactId, BoundaryKey, BoundaryProof, EnforcementError, Invariant, JurisdictionId};

use crate::base::BoundaryEnforcer;

/// Reasons that mark a decision ambiguous; an allow paired with one of
/// these violates fail-closed semantics.
const AMBIGUOUS_REASONS: [&str; 2] = ["ambiguous", "unclear"];

/// Runtime assertions over enforcement state.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvariantChecker;

impl InvariantChecker {
    /// I1 — every artifact participating in a check holds a binding.
    pub fn check_no_unbound_execution(
        &self,
        enforcer: &BoundaryEnforcer,
        artifact_id: &ArtifactId,
    ) -> Result<(), EnforcementError> {
        if !enforcer.has_bindings(artifact_id) {
            return Err(EnforcementError::invariant_violation(
                Invariant::NoUnboundExecution,
                format!("{artifact_id} has no bindings"),
                &[("artifact_id", artifact_id.as_str())],
            ));
        }
        Ok(())
    }

    /// I2 — cross-jurisdiction flow requires an explicit boundary rule.
    /// An intra-jurisdiction pair passes trivially.
    pub fn check_explicit_boundaries(
        &self,
        enforcer: &BoundaryEnforcer,
        source_jurisdiction_id: &JurisdictionId,
        target_jurisdiction_id: &JurisdictionId,
    ) -> Result<(), EnforcementError> {
        if source_jurisdiction_id == target_jurisdiction_id {
            return Ok(());
        }
        let key = BoundaryKey::new(
            source_jurisdiction_id.clone(),
            target_jurisdiction_id.clone(),
        );
        if enforcer.boundary_for_key(&key).is_none() {
            return Err(EnforcementError::invariant_violation(
                Invariant::ExplicitBoundaries,
                format!("no boundary defined for {key}"),
                &[("boundary_key", &key.to_string())],
            ));
        }
        Ok(())
    }

    /// I4 — a decision whose reason is ambiguous can never be an allow.
    pub fn check_fail_closed_ambiguity(
        &self,
        allowed: bool,
        reason: &str,
    ) -> Result<(), EnforcementError> {
        if allowed && AMBIGUOUS_REASONS.contains(&reason) {
            return Err(EnforcementError::invariant_violation(
                Invariant::FailClosedAmbiguity,
                format!("ambiguous case allowed: {reason}"),
                &[("reason", reason)],
            ));
        }
        Ok(())
    }

    /// I5 — every emitted proof is complete enough to audit: non-empty
    /// id, artifact, jurisdiction, and reason, with a positive timestamp.
    pub fn check_auditability(&self, proof: &BoundaryProof) -> Result<(), EnforcementError> {
        let missing = if proof.id.is_empty() {
            Some("id")
        } else if proof.artifact_id.as_str().is_empty() {
            Some("artifact_id")
        } else if proof.jurisdiction_id.as_str().is_empty() {
            Some("jurisdiction_id")
        } else if proof.reason.is_empty() {
            Some("reason")
        } else if proof.timestamp <= 0 {
            Some("timestamp")
        } else {
            None
        };

        if let Some(field) = missing {
            return Err(EnforcementError::invariant_violation(
                Invariant::Auditability,
                format!("proof missing {field}"),
                &[("proof_id", &proof.id), ("field", field)],
            ));
        }
        Ok(())
    }
}
