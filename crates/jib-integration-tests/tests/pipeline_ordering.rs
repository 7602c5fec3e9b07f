//! The pipeline's step order is part of its contract: integrity rules
//! on a binding fire before semantic invariants, consensus rules before
//! any proof exists, and concurrent decisions serialize on the audit
//! log.

use std::collections::BTreeMap;
use std::sync::Arc;

use ed25519_dalek::SigningKey;
use rand_core::OsRng;

use jib_consensus::ScriptedTransport;
use jib_core::{
    ArtifactId, Boundary, DomainId, EnforcementError, ExecutionDomain, Jurisdiction,
    JurisdictionId, JurisdictionType, NodeId,
};
use jib_enforcer::IntegratedEnforcer;

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

fn register_zones(enforcer: &IntegratedEnforcer) {
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
}

#[test]
fn integrity_failure_fires_before_missing_rule() {
    // Both defects present: a tampered binding AND no boundary rule.
    // The pipeline must report the integrity violation — an unsigned
    // binding never reaches the semantic checks.
    let enforcer = IntegratedEnforcer::new(nid("node-1"), Vec::new());
    register_zones(&enforcer);

    let key = SigningKey::generate(&mut OsRng);
    let binding = enforcer
        .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "sha256:aa11")
        .unwrap();
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
fn consensus_veto_leaves_no_proof_or_provenance() {
    let mut votes = BTreeMap::new();
    votes.insert(nid("node-2"), false);
    votes.insert(nid("node-3"), true);
    let enforcer = IntegratedEnforcer::with_transport(
        nid("node-1"),
        vec![nid("node-2"), nid("node-3")],
        Arc::new(ScriptedTransport::new(votes)),
    );
    register_zones(&enforcer);
    enforcer.register_boundary(Boundary::new(
        "b-ca-tx",
        jid("us-ca"),
        jid("us-tx"),
        true,
        "policy",
    ));
    let key = SigningKey::generate(&mut OsRng);
    enforcer
        .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "sha256:aa11")
        .unwrap();

    let leaves_before = enforcer.merkle_leaf_count();
    let err = enforcer
        .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
        .unwrap_err();

    assert!(matches!(err, EnforcementError::ConsensusFailure { .. }));
    // Consensus runs before the proof is materialized: no audit leaf,
    // no flow record.
    assert_eq!(enforcer.merkle_leaf_count(), leaves_before);
    assert_eq!(enforcer.flow_summary().total_flows, 0);
}

#[test]
fn concurrent_decisions_serialize_on_the_audit_log() {
    let enforcer = Arc::new(IntegratedEnforcer::new(
        nid("node-1"),
        vec![nid("node-2"), nid("node-3")],
    ));
    register_zones(&enforcer);
    enforcer.register_boundary(Boundary::new(
        "b-ca-tx",
        jid("us-ca"),
        jid("us-tx"),
        true,
        "policy",
    ));

    let key = SigningKey::generate(&mut OsRng);
    let threads = 8;
    for i in 0..threads {
        enforcer
            .bind_artifact(
                &aid(&format!("model-{i}")),
                &jid("us-ca"),
                &key,
                format!("sha256:{i:02x}"),
            )
            .unwrap();
    }
    let leaves_after_bindings = enforcer.merkle_leaf_count();

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let enforcer = Arc::clone(&enforcer);
            std::thread::spawn(move || {
                enforcer
                    .enforce_with_all_checks(
                        &aid(&format!("model-{i}")),
                        &did("prod-west"),
                        &did("prod-east"),
                    )
                    .map(|proof| proof.allowed)
            })
        })
        .collect();

    let mut allowed = 0;
    for handle in handles {
        if handle.join().unwrap().unwrap() {
            allowed += 1;
        }
    }

    assert_eq!(allowed, threads);
    // One audit leaf per decision, no lost or duplicated appends.
    assert_eq!(
        enforcer.merkle_leaf_count(),
        leaves_after_bindings + threads
    );
    assert_eq!(enforcer.decision_log().len(), threads);
    assert_eq!(enforcer.flow_summary().total_flows, threads);
}

#[test]
fn quorum_failure_is_consensus_failure_not_allow() {
    // Nobody but the proposer answers in a 4-node cluster.
    let enforcer = IntegratedEnforcer::with_transport(
        nid("node-1"),
        vec![nid("node-2"), nid("node-3"), nid("node-4")],
        Arc::new(ScriptedTransport::new(BTreeMap::new())),
    );
    register_zones(&enforcer);
    enforcer.register_boundary(Boundary::new(
        "b-ca-tx",
        jid("us-ca"),
        jid("us-tx"),
        true,
        "policy",
    ));
    let key = SigningKey::generate(&mut OsRng);
    enforcer
        .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "sha256:aa11")
        .unwrap();

    let err = enforcer
        .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
        .unwrap_err();
    assert!(matches!(err, EnforcementError::ConsensusFailure { .. }));
}
