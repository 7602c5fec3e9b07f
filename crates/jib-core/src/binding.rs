//! # Cryptographic Bindings
//!
//! A binding is a signed declaration that an artifact belongs to a
//! jurisdiction. An artifact may hold several bindings (multi-jurisdiction
//! membership); each one verifies independently under its embedded public
//! key.
//!
//! ## Signing Format
//!
//! The signed payload is the canonical serialization of the five-field
//! mapping `{artifact_hash, artifact_id, binding_type, jurisdiction_id,
//! timestamp}` with keys in ASCII-ascending order, compact separators,
//! and the timestamp as a bare Unix-seconds integer. The format is stable
//! across implementations; changing it invalidates every existing
//! signature.

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalBytes;
use crate::digest::sha256_hex;
use crate::error::EnforcementError;
use crate::identity::{ArtifactId, JurisdictionId};

/// The binding type recorded when callers do not specify one.
pub const DEFAULT_BINDING_TYPE: &str = "static";

/// The only signature algorithm the stack accepts.
pub const SIGNATURE_ALGORITHM: &str = "Ed25519";

/// A non-repudiable, signed association between an artifact and a
/// jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptographicBinding {
    /// `sha256_hex(artifact_id ":" jurisdiction_id ":" timestamp)`.
    pub id: String,
    /// The bound artifact.
    pub artifact_id: ArtifactId,
    /// The jurisdiction the artifact is bound to.
    pub jurisdiction_id: JurisdictionId,
    /// Binding category (e.g. `"static"`).
    pub binding_type: String,
    /// Always `"Ed25519"`.
    pub signature_algorithm: String,
    /// The signer's Ed25519 public key (32 bytes).
    pub public_key: [u8; 32],
    /// Ed25519 signature over the canonical form (64 bytes when valid).
    pub signature: Vec<u8>,
    /// Content hash of the artifact at binding time.
    pub artifact_hash: String,
    /// Unix seconds at which the binding was created and signed.
    pub timestamp: i64,
}

/// The exact payload shape that gets signed. Field order matches the
/// ASCII-ascending key order of the wire format.
#[derive(Serialize)]
struct SigningPayload<'a> {
    artifact_hash: &'a str,
    artifact_id: &'a str,
    binding_type: &'a str,
    jurisdiction_id: &'a str,
    timestamp: i64,
}

impl CryptographicBinding {
    /// Derive the binding id from its identifying triple.
    pub fn derive_id(artifact_id: &ArtifactId, jurisdiction_id: &JurisdictionId, timestamp: i64) -> String {
        sha256_hex(format!("{artifact_id}:{jurisdiction_id}:{timestamp}").as_bytes())
    }

    /// The deterministic serialization this binding's signature covers.
    pub fn canonical_form(&self) -> Result<CanonicalBytes, EnforcementError> {
        CanonicalBytes::new(&SigningPayload {
            artifact_hash: &self.artifact_hash,
            artifact_id: self.artifact_id.as_str(),
            binding_type: &self.binding_type,
            jurisdiction_id: self.jurisdiction_id.as_str(),
            timestamp: self.timestamp,
        })
    }

    /// SHA-256 of the canonical form — the binding's Merkle leaf.
    pub fn hash(&self) -> Result<String, EnforcementError> {
        Ok(sha256_hex(self.canonical_form()?.as_bytes()))
    }
}
