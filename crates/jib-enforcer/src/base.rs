//! # Base Enforcer — Registries and the Plain Decision
//!
//! Four registries — jurisdictions, execution domains, artifact bindings,
//! boundary rules — guarded by a single reader/writer lock, plus the
//! unadorned `check_boundary`/`enforce_boundary` decision over them.
//!
//! Registrations replace; nothing mutates in place. A missing boundary
//! rule decides `allowed = false` with the canonical default-deny reason.

use std::collections::HashMap;

use ed25519_dalek::SigningKey;
use parking_lot::RwLock;

use jib_core::{
    unix_now, ArtifactId, Boundary, BoundaryKey, BoundaryProof, CryptographicBinding, DomainId,
    EnforcementError, ExecutionDomain, Jurisdiction, JurisdictionId, SIGNATURE_ALGORITHM,
};
use jib_crypto::sign_canonical;

/// The reason recorded when no boundary rule covers a pair.
pub const DEFAULT_DENY_REASON: &str = "No explicit boundary rule defined";

#[derive(Debug, Default)]
struct Registries {
    jurisdictions: HashMap<JurisdictionId, Jurisdiction>,
    execution_domains: HashMap<DomainId, ExecutionDomain>,
    bound_artifacts: HashMap<ArtifactId, Vec<CryptographicBinding>>,
    /// Keyed by the canonical `"{src}:{tgt}"` rendering.
    boundaries: HashMap<String, Boundary>,
}

/// Registries and the plain boundary decision.
#[derive(Debug, Default)]
pub struct BoundaryEnforcer {
    registries: RwLock<Registries>,
}

impl BoundaryEnforcer {
    /// Create an enforcer with empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a jurisdiction.
    pub fn register_jurisdiction(&self, jurisdiction: Jurisdiction) {
        self.registries
            .write()
            .jurisdictions
            .insert(jurisdiction.id.clone(), jurisdiction);
    }

    /// Register (or replace) an execution domain.
    ///
    /// The domain's jurisdiction is checked at boundary time, not here,
    /// so registration order does not matter.
    pub fn register_execution_domain(&self, domain: ExecutionDomain) {
        self.registries
            .write()
            .execution_domains
            .insert(domain.id.clone(), domain);
    }

    /// Register (or replace) the boundary rule for its jurisdiction pair.
    pub fn register_boundary(&self, boundary: Boundary) {
        let key = boundary.key().to_string();
        self.registries.write().boundaries.insert(key, boundary);
    }

    /// Bind an artifact to a jurisdiction, signing the canonical form.
    ///
    /// # Errors
    ///
    /// [`EnforcementError::InvalidJurisdictionBinding`] when the
    /// jurisdiction is not registered.
    pub fn bind_artifact(
        &self,
        artifact_id: &ArtifactId,
        jurisdiction_id: &JurisdictionId,
        signing_key: &SigningKey,
        artifact_hash: impl Into<String>,
        binding_type: impl Into<String>,
    ) -> Result<CryptographicBinding, EnforcementError> {
        let mut registries = self.registries.write();

        if !registries.jurisdictions.contains_key(jurisdiction_id) {
            return Err(EnforcementError::invalid_binding(
                format!("jurisdiction {jurisdiction_id} not registered"),
                &[("jurisdiction_id", jurisdiction_id.as_str())],
            ));
        }

        let timestamp = unix_now();
        let mut binding = CryptographicBinding {
            id: CryptographicBinding::derive_id(artifact_id, jurisdiction_id, timestamp),
            artifact_id: artifact_id.clone(),
            jurisdiction_id: jurisdiction_id.clone(),
            binding_type: binding_type.into(),
            signature_algorithm: SIGNATURE_ALGORITHM.to_string(),
            public_key: signing_key.verifying_key().to_bytes(),
            signature: Vec::new(),
            artifact_hash: artifact_hash.into(),
            timestamp,
        };
        binding.signature = sign_canonical(signing_key, &binding.canonical_form()?);

        registries
            .bound_artifacts
            .entry(artifact_id.clone())
            .or_default()
            .push(binding.clone());

        tracing::debug!(
            artifact_id = %artifact_id,
            jurisdiction_id = %jurisdiction_id,
            binding_id = %binding.id,
            "artifact bound to jurisdiction"
        );
        Ok(binding)
    }

    /// Import a binding created elsewhere (another node's replication
    /// stream, or an external adapter).
    ///
    /// No verification happens here: the decision pipeline re-verifies
    /// every binding at decision time, so a defective import is rejected
    /// there, fail-closed.
    pub fn import_binding(&self, binding: CryptographicBinding) {
        self.registries
            .write()
            .bound_artifacts
            .entry(binding.artifact_id.clone())
            .or_default()
            .push(binding);
    }

    /// The jurisdictions an artifact is bound to, in binding order.
    pub fn resolve_jurisdictions(&self, artifact_id: &ArtifactId) -> Vec<JurisdictionId> {
        self.registries
            .read()
            .bound_artifacts
            .get(artifact_id)
            .map(|bindings| bindings.iter().map(|b| b.jurisdiction_id.clone()).collect())
            .unwrap_or_default()
    }

    /// A snapshot of all bindings for an artifact.
    pub fn bindings_for(&self, artifact_id: &ArtifactId) -> Vec<CryptographicBinding> {
        self.registries
            .read()
            .bound_artifacts
            .get(artifact_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the artifact holds at least one binding.
    pub fn has_bindings(&self, artifact_id: &ArtifactId) -> bool {
        self.registries
            .read()
            .bound_artifacts
            .get(artifact_id)
            .is_some_and(|bindings| !bindings.is_empty())
    }

    /// A snapshot of a registered jurisdiction.
    pub fn jurisdiction(&self, jurisdiction_id: &JurisdictionId) -> Option<Jurisdiction> {
        self.registries
            .read()
            .jurisdictions
            .get(jurisdiction_id)
            .cloned()
    }

    /// A snapshot of a registered execution domain.
    pub fn execution_domain(&self, domain_id: &DomainId) -> Option<ExecutionDomain> {
        self.registries
            .read()
            .execution_domains
            .get(domain_id)
            .cloned()
    }

    /// The boundary rule for a jurisdiction pair, if one is registered.
    pub fn boundary_for_key(&self, key: &BoundaryKey) -> Option<Boundary> {
        self.registries
            .read()
            .boundaries
            .get(&key.to_string())
            .cloned()
    }

    /// Decide whether `artifact_id` may move between two domains.
    ///
    /// Resolves both domains, asserts the artifact is bound to the source
    /// domain's jurisdiction, and looks up the boundary rule. A missing
    /// rule decides deny with [`DEFAULT_DENY_REASON`].
    ///
    /// # Errors
    ///
    /// [`EnforcementError::JurisdictionalViolation`] for an unknown
    /// domain or an artifact not bound to the source jurisdiction.
    pub fn check_boundary(
        &self,
        artifact_id: &ArtifactId,
        source_domain_id: &DomainId,
        target_domain_id: &DomainId,
    ) -> Result<BoundaryProof, EnforcementError> {
        let registries = self.registries.read();

        let source_domain = registries
            .execution_domains
            .get(source_domain_id)
            .ok_or_else(|| {
                EnforcementError::jurisdictional_violation(
                    format!("unknown execution domain {source_domain_id}"),
                    &[("domain_id", source_domain_id.as_str())],
                )
            })?;
        let target_domain = registries
            .execution_domains
            .get(target_domain_id)
            .ok_or_else(|| {
                EnforcementError::jurisdictional_violation(
                    format!("unknown execution domain {target_domain_id}"),
                    &[("domain_id", target_domain_id.as_str())],
                )
            })?;

        let bound_to_source = registries
            .bound_artifacts
            .get(artifact_id)
            .is_some_and(|bindings| {
                bindings
                    .iter()
                    .any(|b| b.jurisdiction_id == source_domain.jurisdiction_id)
            });
        if !bound_to_source {
            return Err(EnforcementError::jurisdictional_violation(
                format!(
                    "artifact {artifact_id} not bound to source jurisdiction {}",
                    source_domain.jurisdiction_id
                ),
                &[
                    ("artifact_id", artifact_id.as_str()),
                    ("jurisdiction_id", source_domain.jurisdiction_id.as_str()),
                ],
            ));
        }

        let key = BoundaryKey::new(
            source_domain.jurisdiction_id.clone(),
            target_domain.jurisdiction_id.clone(),
        );
        let (allowed, reason) = match registries.boundaries.get(&key.to_string()) {
            Some(boundary) => (boundary.allowed, boundary.reason.clone()),
            None => (false, DEFAULT_DENY_REASON.to_string()),
        };

        Ok(BoundaryProof {
            id: BoundaryProof::derive_id(artifact_id, source_domain_id, target_domain_id),
            artifact_id: artifact_id.clone(),
            source_domain_id: source_domain_id.clone(),
            target_domain_id: target_domain_id.clone(),
            jurisdiction_id: source_domain.jurisdiction_id.clone(),
            allowed,
            reason,
            timestamp: unix_now(),
            evidence: Vec::new(),
        })
    }

    /// Like [`BoundaryEnforcer::check_boundary`], but a deny decision is
    /// an error rather than an `allowed = false` proof.
    pub fn enforce_boundary(
        &self,
        artifact_id: &ArtifactId,
        source_domain_id: &DomainId,
        target_domain_id: &DomainId,
    ) -> Result<BoundaryProof, EnforcementError> {
        let proof = self.check_boundary(artifact_id, source_domain_id, target_domain_id)?;
        if !proof.allowed {
            return Err(EnforcementError::jurisdictional_violation(
                format!("cross-domain execution denied: {}", proof.reason),
                &[
                    ("artifact_id", artifact_id.as_str()),
                    ("source_domain_id", source_domain_id.as_str()),
                    ("target_domain_id", target_domain_id.as_str()),
                ],
            ));
        }
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jib_core::{JurisdictionType, DEFAULT_BINDING_TYPE};
    use rand_core::OsRng;

    fn jid(s: &str) -> JurisdictionId {
        JurisdictionId::new(s).unwrap()
    }

    fn aid(s: &str) -> ArtifactId {
        ArtifactId::new(s).unwrap()
    }

    fn did(s: &str) -> DomainId {
        DomainId::new(s).unwrap()
    }

    /// Two registered jurisdictions with one domain each.
    fn two_zone_enforcer() -> (BoundaryEnforcer, SigningKey) {
        let enforcer = BoundaryEnforcer::new();
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
        (enforcer, SigningKey::generate(&mut OsRng))
    }

    #[test]
    fn bind_rejects_unregistered_jurisdiction() {
        let (enforcer, key) = two_zone_enforcer();
        let err = enforcer
            .bind_artifact(&aid("model-x"), &jid("eu-de"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap_err();
        assert!(matches!(
            err,
            EnforcementError::InvalidJurisdictionBinding { .. }
        ));
    }

    #[test]
    fn bind_produces_verifiable_binding() {
        let (enforcer, key) = two_zone_enforcer();
        let binding = enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap();
        assert!(jib_crypto::verify_binding(&binding));
        assert_eq!(enforcer.resolve_jurisdictions(&aid("model-x")), vec![jid("us-ca")]);
        assert!(enforcer.has_bindings(&aid("model-x")));
    }

    #[test]
    fn multiple_bindings_accumulate() {
        let (enforcer, key) = two_zone_enforcer();
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap();
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-tx"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap();
        assert_eq!(enforcer.bindings_for(&aid("model-x")).len(), 2);
    }

    #[test]
    fn check_rejects_unknown_domain() {
        let (enforcer, key) = two_zone_enforcer();
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap();
        let err = enforcer
            .check_boundary(&aid("model-x"), &did("prod-west"), &did("nowhere"))
            .unwrap_err();
        assert!(matches!(err, EnforcementError::JurisdictionalViolation { .. }));
    }

    #[test]
    fn check_rejects_artifact_not_bound_to_source() {
        let (enforcer, key) = two_zone_enforcer();
        // Bound to the *target* jurisdiction, not the source.
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-tx"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap();
        let err = enforcer
            .check_boundary(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap_err();
        assert!(matches!(err, EnforcementError::JurisdictionalViolation { .. }));
    }

    #[test]
    fn missing_rule_denies_with_default_reason() {
        let (enforcer, key) = two_zone_enforcer();
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap();
        let proof = enforcer
            .check_boundary(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap();
        assert!(!proof.allowed);
        assert_eq!(proof.reason, DEFAULT_DENY_REASON);
        assert_eq!(proof.jurisdiction_id, jid("us-ca"));
    }

    #[test]
    fn explicit_rule_decides() {
        let (enforcer, key) = two_zone_enforcer();
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap();
        enforcer.register_boundary(Boundary::new(
            "b-1",
            jid("us-ca"),
            jid("us-tx"),
            true,
            "policy",
        ));

        let proof = enforcer
            .check_boundary(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap();
        assert!(proof.allowed);
        assert_eq!(proof.reason, "policy");
        assert!(proof.timestamp > 0);
    }

    #[test]
    fn enforce_raises_on_deny() {
        let (enforcer, key) = two_zone_enforcer();
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap();
        enforcer.register_boundary(Boundary::new(
            "b-1",
            jid("us-ca"),
            jid("us-tx"),
            false,
            "export embargo",
        ));

        let err = enforcer
            .enforce_boundary(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap_err();
        assert!(err.to_string().contains("export embargo"));
    }

    #[test]
    fn re_registration_replaces_rule() {
        let (enforcer, key) = two_zone_enforcer();
        enforcer
            .bind_artifact(&aid("model-x"), &jid("us-ca"), &key, "hash", DEFAULT_BINDING_TYPE)
            .unwrap();
        enforcer.register_boundary(Boundary::new("b-1", jid("us-ca"), jid("us-tx"), false, "old"));
        enforcer.register_boundary(Boundary::new("b-2", jid("us-ca"), jid("us-tx"), true, "new"));

        let proof = enforcer
            .check_boundary(&aid("model-x"), &did("prod-west"), &did("prod-east"))
            .unwrap();
        assert!(proof.allowed);
        assert_eq!(proof.reason, "new");
    }
}
