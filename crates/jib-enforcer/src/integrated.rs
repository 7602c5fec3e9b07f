//! # Integrated Enforcer — The Decision Pipeline
//!
//! One entry point, [`IntegratedEnforcer::enforce_with_all_checks`],
//! composes every check the stack provides into a single atomic decision.
//! The order is fixed and part of the contract:
//!
//! 1.  load bindings — none means the artifact may not execute at all;
//! 2.  verify every binding and its revocation status — an unsigned
//!     binding never reaches the semantic checks;
//! 3.  resolve both execution domains;
//! 4.  temporal validity for the jurisdiction pair;
//! 5.  invariants I1 and I2;
//! 6.  distributed consent — no proof is materialized for a decision the
//!     cluster rejected;
//! 7.  provenance recording;
//! 8.  the base decision producing the proof;
//! 9.  invariant I5 over the proof (I4 guards the decision's reason);
//! 10. Merkle append.
//!
//! The whole sequence runs behind an exclusive decision lock, so a
//! decision is atomic with respect to concurrent binding mutations and
//! audit appends. An error at any step aborts with nothing recorded —
//! provenance and the Merkle append are the last mutating steps.

use std::sync::Arc;
use std::time::Instant;

use ed25519_dalek::SigningKey;
use parking_lot::{Mutex, RwLock};

use jib_consensus::{DecisionRecord, DistributedEnforcer, LoopbackTransport, PeerTransport};
use jib_core::{
    unix_now, ArtifactId, Boundary, BoundaryKey, BoundaryProof, CryptographicBinding, DomainId,
    EnforcementError, ExecutionDomain, Jurisdiction, JurisdictionId, NodeId, DEFAULT_BINDING_TYPE,
};
use jib_crypto::{verify_binding, AuditMerkleTree, KeyManager, RevocationSet};
use jib_policy::PolicyManager;
use jib_provenance::{DataFlowTracker, FlowSummary, Operation};
use jib_temporal::{TemporalBoundary, TemporalBoundaryManager};

use crate::base::BoundaryEnforcer;
use crate::invariants::InvariantChecker;
use crate::monitor::PerformanceMonitor;

/// The full enforcement pipeline for one node.
pub struct IntegratedEnforcer {
    base: BoundaryEnforcer,
    key_manager: KeyManager,
    merkle: RwLock<AuditMerkleTree>,
    revocation: RwLock<RevocationSet>,
    temporal: TemporalBoundaryManager,
    distributed: DistributedEnforcer,
    provenance: DataFlowTracker,
    invariants: InvariantChecker,
    policies: RwLock<PolicyManager>,
    monitor: PerformanceMonitor,
    /// Serializes whole decisions; steps 1–10 run under this lock.
    decision_lock: Mutex<()>,
}

impl IntegratedEnforcer {
    /// Create an enforcer whose consensus peers all affirm (single-node
    /// and single-process deployments).
    pub fn new(node_id: NodeId, peers: Vec<NodeId>) -> Self {
        Self::with_transport(node_id, peers, Arc::new(LoopbackTransport))
    }

    /// Create an enforcer with an explicit consensus transport.
    pub fn with_transport(
        node_id: NodeId,
        peers: Vec<NodeId>,
        transport: Arc<dyn PeerTransport>,
    ) -> Self {
        Self {
            base: BoundaryEnforcer::new(),
            key_manager: KeyManager::new(),
            merkle: RwLock::new(AuditMerkleTree::new()),
            revocation: RwLock::new(RevocationSet::new()),
            temporal: TemporalBoundaryManager::new(),
            distributed: DistributedEnforcer::new(node_id, peers, transport),
            provenance: DataFlowTracker::new(),
            invariants: InvariantChecker,
            policies: RwLock::new(PolicyManager::new()),
            monitor: PerformanceMonitor::new(),
            decision_lock: Mutex::new(()),
        }
    }

    // -- registration surface -------------------------------------------------

    /// Register (or replace) a jurisdiction.
    pub fn register_jurisdiction(&self, jurisdiction: Jurisdiction) {
        self.base.register_jurisdiction(jurisdiction);
    }

    /// Register (or replace) an execution domain.
    pub fn register_execution_domain(&self, domain: ExecutionDomain) {
        self.base.register_execution_domain(domain);
    }

    /// Register (or replace) a boundary rule.
    pub fn register_boundary(&self, boundary: Boundary) {
        self.base.register_boundary(boundary);
    }

    /// Register a time-bounded boundary rule.
    pub fn register_temporal_boundary(&self, boundary: TemporalBoundary) {
        self.temporal.register_boundary(boundary);
    }

    /// Bind an artifact to a jurisdiction and append the binding to the
    /// audit tree.
    pub fn bind_artifact(
        &self,
        artifact_id: &ArtifactId,
        jurisdiction_id: &JurisdictionId,
        signing_key: &SigningKey,
        artifact_hash: impl Into<String>,
    ) -> Result<CryptographicBinding, EnforcementError> {
        let binding = self.base.bind_artifact(
            artifact_id,
            jurisdiction_id,
            signing_key,
            artifact_hash,
            DEFAULT_BINDING_TYPE,
        )?;
        self.merkle.write().add_leaf(binding.hash()?);
        Ok(binding)
    }

    /// Revoke a binding effective now.
    pub fn revoke_binding(&self, binding_id: &str) {
        self.revoke_binding_at(binding_id, unix_now());
    }

    /// Revoke a binding effective at `timestamp`.
    pub fn revoke_binding_at(&self, binding_id: &str, timestamp: i64) {
        tracing::info!(binding_id, timestamp, "binding revoked");
        self.revocation.write().revoke(binding_id, timestamp);
    }

    // -- the pipeline ---------------------------------------------------------

    /// Run the full decision pipeline for one attempted movement.
    ///
    /// Returns the proof — which carries the decision, including an
    /// explicit-deny `allowed = false` — or the typed error of the first
    /// failing step. Pre-proof failures record nothing.
    pub fn enforce_with_all_checks(
        &self,
        artifact_id: &ArtifactId,
        source_domain_id: &DomainId,
        target_domain_id: &DomainId,
    ) -> Result<BoundaryProof, EnforcementError> {
        let _guard = self.decision_lock.lock();
        let started = Instant::now();

        // Step 1: an artifact with no bindings may not execute at all.
        let bindings = self.base.bindings_for(artifact_id);
        if bindings.is_empty() {
            return Err(EnforcementError::invalid_binding(
                format!("no bindings found for {artifact_id}"),
                &[("artifact_id", artifact_id.as_str())],
            ));
        }

        let now = unix_now();

        // Step 2: integrity (I3) — every binding verifies and is
        // unrevoked as of the decision timestamp.
        for binding in &bindings {
            if !verify_binding(binding) {
                tracing::warn!(binding_id = %binding.id, "binding failed signature verification");
                return Err(EnforcementError::binding_integrity(
                    &binding.id,
                    artifact_id.as_str(),
                ));
            }
            if self.revocation.read().is_revoked(&binding.id, now) {
                tracing::warn!(binding_id = %binding.id, "binding is revoked");
                return Err(EnforcementError::binding_integrity(
                    &binding.id,
                    artifact_id.as_str(),
                ));
            }
        }

        // Step 3: both endpoints must be registered domains.
        let source_domain = self.base.execution_domain(source_domain_id).ok_or_else(|| {
            EnforcementError::jurisdictional_violation(
                format!("unknown execution domain {source_domain_id}"),
                &[("domain_id", source_domain_id.as_str())],
            )
        })?;
        let target_domain = self.base.execution_domain(target_domain_id).ok_or_else(|| {
            EnforcementError::jurisdictional_violation(
                format!("unknown execution domain {target_domain_id}"),
                &[("domain_id", target_domain_id.as_str())],
            )
        })?;

        let boundary_key = BoundaryKey::new(
            source_domain.jurisdiction_id.clone(),
            target_domain.jurisdiction_id.clone(),
        );

        // Step 4: if temporal rules exist for the pair, at least one
        // must hold now; none registered means no temporal constraint.
        let temporal_rules = self.temporal.boundaries_for_key(&boundary_key);
        if !temporal_rules.is_empty() && !temporal_rules.iter().any(|tb| tb.is_valid_at(now)) {
            return Err(EnforcementError::temporal_constraint(
                boundary_key.to_string(),
                now,
            ));
        }

        // Step 5: invariants over the request.
        self.invariants
            .check_no_unbound_execution(&self.base, artifact_id)?;
        self.invariants.check_explicit_boundaries(
            &self.base,
            &source_domain.jurisdiction_id,
            &target_domain.jurisdiction_id,
        )?;

        // Step 6: the cluster must consent before any proof exists.
        let decision = self.distributed.propose_decision(
            artifact_id,
            source_domain_id,
            target_domain_id,
        )?;
        if !decision {
            return Err(EnforcementError::consensus_failure(
                "distributed consensus denied boundary crossing",
                &[
                    ("artifact_id", artifact_id.as_str()),
                    ("source_domain_id", source_domain_id.as_str()),
                    ("target_domain_id", target_domain_id.as_str()),
                ],
            ));
        }

        // Step 7: the crossing attempt itself becomes provenance.
        self.provenance.record_data_flow(
            artifact_id.clone(),
            Operation::BoundaryCheck,
            source_domain.jurisdiction_id.clone(),
            target_domain.jurisdiction_id.clone(),
            now,
        );

        // Step 8: the base decision materializes the proof.
        let proof = self
            .base
            .check_boundary(artifact_id, source_domain_id, target_domain_id)?;

        // Step 9: the proof must be fail-closed (I4) and auditable (I5).
        self.invariants
            .check_fail_closed_ambiguity(proof.allowed, &proof.reason)?;
        self.invariants.check_auditability(&proof)?;

        // Step 10: append to the audit tree; last, so failed decisions
        // leave no partial state.
        self.merkle.write().add_leaf(proof.hash());

        tracing::info!(
            artifact_id = %artifact_id,
            source_domain_id = %source_domain_id,
            target_domain_id = %target_domain_id,
            allowed = proof.allowed,
            reason = %proof.reason,
            "boundary decision recorded"
        );
        self.monitor.record_operation(
            "enforce_with_all_checks",
            started.elapsed().as_secs_f64(),
        );

        Ok(proof)
    }

    // -- audit surface --------------------------------------------------------

    /// The current audit Merkle root (`""` while the tree is empty).
    pub fn merkle_root(&self) -> String {
        self.merkle.read().root()
    }

    /// Number of audit leaves (bindings and proofs).
    pub fn merkle_leaf_count(&self) -> usize {
        self.merkle.read().leaf_count()
    }

    /// The distributed decision log.
    pub fn decision_log(&self) -> Vec<DecisionRecord> {
        self.distributed.decision_log()
    }

    /// Aggregate data-flow counts.
    pub fn flow_summary(&self) -> FlowSummary {
        self.provenance.flow_summary()
    }

    // -- component access -----------------------------------------------------

    /// The underlying registries and plain decision.
    pub fn base(&self) -> &BoundaryEnforcer {
        &self.base
    }

    /// Ed25519 key material management.
    pub fn key_manager(&self) -> &KeyManager {
        &self.key_manager
    }

    /// The temporal boundary registry.
    pub fn temporal(&self) -> &TemporalBoundaryManager {
        &self.temporal
    }

    /// The provenance tracker.
    pub fn provenance(&self) -> &DataFlowTracker {
        &self.provenance
    }

    /// The hierarchical policy registry.
    pub fn policies(&self) -> &RwLock<PolicyManager> {
        &self.policies
    }

    /// Operation timing series.
    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }
}

impl std::fmt::Debug for IntegratedEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegratedEnforcer")
            .field("distributed", &self.distributed)
            .field("merkle_leaves", &self.merkle.read().leaf_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jib_core::JurisdictionType;
    use rand_core::OsRng;
    use std::collections::BTreeMap;

    use jib_consensus::ScriptedTransport;

    fn jid(s: &str) -> JurisdictionId {
        JurisdictionId::new(s).unwrap()
    }

    fn aid(s: &str) -> ArtifactId {
        ArtifactId::new(s).unwrap()
    }

    fn did(s: &str) -> DomainId {
        DomainId::new(s).unwrap()
    }

    fn nid(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    fn two_zone() -> IntegratedEnforcer {
        let enforcer = IntegratedEnforcer::new(nid("node-1"), vec![nid("node-2"), nid("node-3")]);
        enforcer.register_jurisdiction(Jurisdiction::new(
            jid("us-ca"),
            "California",
            JurisdictionType::Legal,
        ));
        enforcer.register_jurisdiction(Jurisdiction::new(
            jid("us-tx"),
            "Texas",
            JurisdictionType::Legal,
        ));
        enforcer.register_execution_domain(ExecutionDomain::new(
            did("prod-west"),
            "Prod West",
            jid("us-ca"),
        ));
        enforcer.register_execution_domain(ExecutionDomain::new(
            did("prod-east"),
            "Prod East",
            jid("us-tx"),
        ));
        enforcer
    }

    fn allow_rule() -> Boundary {
        Boundary::new("b-1", jid("us-ca"), jid("us-tx"), true, "policy")
    }

    fn temporal_rule(id: &str, from: Option<i64>, until: Option<i64>) -> TemporalBoundary {
        TemporalBoundary {
            id: id.to_string(),
            source_jurisdiction_id: jid("us-ca"),
            target_jurisdiction_id: jid("us-tx"),
            allowed: true,
            reason: "window".to_string(),
            valid_from: from,
            valid_until: until,
            renewal_policy: None,
        }
    }

    #[test]
    fn full_pipeline_allows_and_audits() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        enforcer.register_boundary(allow_rule());

        let leaves_before = enforcer.merkle_leaf_count();
        let proof = enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap();

        assert!(proof.allowed);
        assert_eq!(proof.reason, "policy");
        assert_eq!(enforcer.merkle_leaf_count(), leaves_before + 1);
        assert!(!enforcer.merkle_root().is_empty());
        assert_eq!(enforcer.decision_log().len(), 1);
        assert_eq!(enforcer.flow_summary().cross_boundary_flows, 1);
        assert_eq!(enforcer.monitor().operation_count("enforce_with_all_checks"), 1);
    }

    #[test]
    fn unbound_artifact_is_rejected_first() {
        let enforcer = two_zone();
        enforcer.register_boundary(allow_rule());
        let err = enforcer
            .enforce_with_all_checks(&aid("ghost"), &did("prod-west"), &did("prod-east"))
            .unwrap_err();
        assert!(matches!(
            err,
            EnforcementError::InvalidJurisdictionBinding { .. }
        ));
        // Nothing was recorded.
        assert_eq!(enforcer.merkle_leaf_count(), 0);
        assert!(enforcer.decision_log().is_empty());
        assert_eq!(enforcer.flow_summary().total_flows, 0);
    }

    #[test]
    fn tampered_binding_is_an_integrity_violation() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        let binding = enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        enforcer.register_boundary(allow_rule());

        // A second artifact arrives through the import path with its
        // signature replaced by arbitrary bytes.
        let mut tampered = binding;
        tampered.artifact_id = aid("model-y");
        tampered.signature = vec![0u8; 64];
        enforcer.base().import_binding(tampered);

        let err = enforcer
            .enforce_with_all_checks(&aid("model-y"), &did("prod-west"), &did("prod-east"))
            .unwrap_err();
        assert!(matches!(
            err,
            EnforcementError::BindingIntegrityViolation { .. }
        ));
    }

    #[test]
    fn revoked_binding_fails_integrity() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        let binding = enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        enforcer.register_boundary(allow_rule());
        enforcer.revoke_binding(&binding.id);

        let err = enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap_err();
        assert!(matches!(
            err,
            EnforcementError::BindingIntegrityViolation { .. }
        ));
    }

    #[test]
    fn future_revocation_does_not_block_today() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        let binding = enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        enforcer.register_boundary(allow_rule());
        enforcer.revoke_binding_at(&binding.id, unix_now() + 86_400);

        assert!(enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .is_ok());
    }

    #[test]
    fn unknown_domain_is_jurisdictional_violation() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        let err = enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("nowhere"))
            .unwrap_err();
        assert!(matches!(err, EnforcementError::JurisdictionalViolation { .. }));
    }

    #[test]
    fn expired_temporal_rule_blocks() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        enforcer.register_boundary(allow_rule());
        enforcer.register_temporal_boundary(temporal_rule(
            "tb-1",
            Some(0),
            Some(unix_now() - 3600),
        ));

        let err = enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap_err();
        assert!(matches!(
            err,
            EnforcementError::TemporalConstraintViolation { .. }
        ));
    }

    #[test]
    fn one_live_temporal_rule_suffices() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        enforcer.register_boundary(allow_rule());
        enforcer.register_temporal_boundary(temporal_rule("dead", Some(0), Some(100)));
        enforcer.register_temporal_boundary(temporal_rule("live", None, None));

        assert!(enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .is_ok());
    }

    #[test]
    fn missing_rule_is_invariant_violation_not_deny_proof() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        // No boundary rule registered: I2 must fire before any proof.
        let err = enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap_err();
        assert!(matches!(err, EnforcementError::InvariantViolation { .. }));
        assert_eq!(enforcer.decision_log().len(), 0);
    }

    #[test]
    fn consensus_veto_is_consensus_failure() {
        let mut votes = BTreeMap::new();
        votes.insert(nid("node-2"), false);
        votes.insert(nid("node-3"), true);
        let transport = Arc::new(ScriptedTransport::new(votes));
        let enforcer = IntegratedEnforcer::with_transport(
            nid("node-1"),
            vec![nid("node-2"), nid("node-3")],
            transport,
        );
        enforcer.register_jurisdiction(Jurisdiction::new(
            jid("us-ca"),
            "California",
            JurisdictionType::Legal,
        ));
        enforcer.register_jurisdiction(Jurisdiction::new(
            jid("us-tx"),
            "Texas",
            JurisdictionType::Legal,
        ));
        enforcer.register_execution_domain(ExecutionDomain::new(
            did("prod-west"),
            "Prod West",
            jid("us-ca"),
        ));
        enforcer.register_execution_domain(ExecutionDomain::new(
            did("prod-east"),
            "Prod East",
            jid("us-tx"),
        ));
        enforcer.register_boundary(allow_rule());
        let key = SigningKey::generate(&mut OsRng);
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();

        let leaves_before = enforcer.merkle_leaf_count();
        let err = enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap_err();
        assert!(matches!(err, EnforcementError::ConsensusFailure { .. }));
        // A vetoed decision materializes no proof and appends no leaf.
        assert_eq!(enforcer.merkle_leaf_count(), leaves_before);
    }

    #[test]
    fn explicit_deny_rule_yields_false_proof_and_audits() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        enforcer.register_boundary(Boundary::new(
            "b-1",
            jid("us-ca"),
            jid("us-tx"),
            false,
            "export embargo",
        ));

        let leaves_before = enforcer.merkle_leaf_count();
        let proof = enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap();
        assert!(!proof.allowed);
        assert_eq!(proof.reason, "export embargo");
        // Denials are audited too.
        assert_eq!(enforcer.merkle_leaf_count(), leaves_before + 1);
    }

    #[test]
    fn binding_appends_audit_leaf() {
        let enforcer = two_zone();
        let key = SigningKey::generate(&mut OsRng);
        assert_eq!(enforcer.merkle_leaf_count(), 0);
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();
        assert_eq!(enforcer.merkle_leaf_count(), 1);
        assert!(!enforcer.merkle_root().is_empty());
    }

    #[test]
    fn intra_jurisdiction_needs_no_rule_but_still_denies_without_one() {
        // Same jurisdiction: I2 passes trivially, but the base decision
        // still requires an explicit rule for the (j, j) pair.
        let enforcer = two_zone();
        enforcer.register_execution_domain(ExecutionDomain::new(
            did("prod-west-2"),
            "Prod West 2",
            jid("us-ca"),
        ));
        let key = SigningKey::generate(&mut OsRng);
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash-1")
            .unwrap();

        let proof = enforcer
            .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-west-2"))
            .unwrap();
        assert!(!proof.allowed);
        assert_eq!(proof.reason, crate::base::DEFAULT_DENY_REASON);
    }
}
