//! Governance surfaces around the pipeline: policy composition over
//! registered rules, provenance lineage from enforcement, the
//! integration adapter, and threshold co-signing of a binding.

use ed25519_dalek::SigningKey;
use rand_core::OsRng;

use jib_core::{
    ArtifactId, Boundary, DomainId, ExecutionDomain, Jurisdiction, JurisdictionId,
    JurisdictionType, NodeId,
};
use jib_crypto::ThresholdSigner;
use jib_enforcer::{IntegrationAdapter, IntegratedEnforcer};
use jib_policy::{BoundaryExpr, PolicyManager, PolicyNode};
use jib_provenance::Operation;

fn jid(s: &str) -> JurisdictionId {
    JurisdictionId::new(s).unwrap()
}

fn aid(s: &str) -> ArtifactId {
    ArtifactId::new(s).unwrap()
}

fn did(s: &str) -> DomainId {
    DomainId::new(s).unwrap()
}

fn two_zone() -> IntegratedEnforcer {
    let enforcer = IntegratedEnforcer::new(NodeId::new("node-1").unwrap(), Vec::new());
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
    enforcer.register_boundary(Boundary::new(
        "b-ca-tx",
        jid("us-ca"),
        jid("us-tx"),
        true,
        "policy",
    ));
    enforcer
}

#[test]
fn policies_layer_over_registered_rules() {
    let enforcer = two_zone();
    let rule = enforcer
        .base()
        .boundary_for_key(&jib_core::BoundaryKey::new(jid("us-ca"), jid("us-tx")))
        .unwrap();

    let mut policies = enforcer.policies().write();
    policies.add_policy(PolicyNode::new(
        "export-ok",
        "export permitted",
        BoundaryExpr::atomic(&rule.id, rule.allowed),
    ));
    policies.add_policy(PolicyNode::new(
        "export-embargo",
        "export embargoed",
        BoundaryExpr::atomic(&rule.id, !rule.allowed),
    ));

    assert!(policies.evaluate_policy("export-ok", &Default::default()));
    let conflicts = policies.find_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].boundary_id, rule.id);
}

#[test]
fn enforcement_leaves_a_lineage_trail() {
    let enforcer = two_zone();
    let key = SigningKey::generate(&mut OsRng);
    enforcer
        .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "sha256:aa11")
        .unwrap();

    enforcer
        .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
        .unwrap();

    let flows = enforcer.provenance().cross_boundary_flows();
    assert_eq!(flows.len(), 1);
    assert_eq!(flows[0].operation, Operation::BoundaryCheck);

    let node = enforcer
        .provenance()
        .graph()
        .get(&flows[0].node_id)
        .expect("flow node recorded");
    assert_eq!(node.jurisdiction_id, jid("us-ca"));
    assert!(enforcer.provenance().graph().validate_acyclicity());

    let audit = enforcer.provenance().audit_compliance(&jid("us-tx"));
    assert_eq!(audit.len(), 1);
}

#[test]
fn adapter_round_trips_bindings_and_proofs() {
    let enforcer = two_zone();
    let adapter = IntegrationAdapter::new();
    let key = SigningKey::generate(&mut OsRng);

    let binding = enforcer
        .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "sha256:aa11")
        .unwrap();
    adapter.register_binding(binding.clone());

    let proof = enforcer
        .enforce_with_all_checks(&aid("model-x"), &did("prod-west"), &did("prod-east"))
        .unwrap();
    adapter.emit_proof(proof.clone());

    let context = adapter.prepare_execution_context(&aid("model-x"), &did("prod-east"));
    assert_eq!(context.jurisdiction_bindings.len(), 1);
    assert_eq!(context.jurisdiction_bindings[0].id, binding.id);
    assert_eq!(adapter.get_proof(&proof.id), Some(proof));
}

#[test]
fn binding_canonical_form_supports_threshold_cosigning() {
    let enforcer = two_zone();
    let key = SigningKey::generate(&mut OsRng);
    let binding = enforcer
        .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "sha256:aa11")
        .unwrap();
    let canonical = binding.canonical_form().unwrap();

    let authority_a = SigningKey::generate(&mut OsRng);
    let authority_b = SigningKey::generate(&mut OsRng);
    let authority_c = SigningKey::generate(&mut OsRng);

    let mut scheme = ThresholdSigner::new(2, 3).unwrap();
    scheme.add_signer("authority-a", authority_a.verifying_key());
    scheme.add_signer("authority-b", authority_b.verifying_key());
    scheme.add_signer("authority-c", authority_c.verifying_key());

    let combined = scheme
        .sign_with_threshold(
            &canonical,
            &[("authority-c", &authority_c), ("authority-a", &authority_a)],
        )
        .unwrap();
    assert!(scheme.verify_threshold(&canonical, &combined));

    // A different binding's canonical form does not verify.
    let other = enforcer
        .bind_artifact(&aid("model-y"), &jid("us-ca"), &key, "sha256:bb22")
        .unwrap();
    assert!(!scheme.verify_threshold(&other.canonical_form().unwrap(), &combined));
}
