//! # Ed25519 Key Material and Binding Verification
//!
//! Key generation, canonical-form signing, and signature verification for
//! artifact/jurisdiction bindings.
//!
//! ## Security Invariant
//!
//! - Private keys live only inside [`KeyManager`] or caller-held
//!   [`SigningKey`] values; neither is serializable and `Debug` output is
//!   redacted.
//! - [`sign_canonical`] accepts only [`CanonicalBytes`] — the signature
//!   base is canonical by construction.
//! - [`verify_binding`] fails closed: an empty signature, a malformed
//!   public key, or a canonicalization error all yield `false`, never a
//!   panic.

use std::collections::HashMap;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use parking_lot::RwLock;
use rand_core::OsRng;

use jib_core::{CanonicalBytes, CryptographicBinding};

/// Generates, stores, and applies Ed25519 signing keys.
///
/// The store is keyed by caller-chosen key ids (typically one per
/// jurisdictional authority). Does not implement `Serialize` — private
/// keys must not leak into logs, responses, or artifacts.
pub struct KeyManager {
    keys: RwLock<HashMap<String, SigningKey>>,
}

impl KeyManager {
    /// Create an empty key manager.
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Generate a fresh Ed25519 key pair.
    pub fn generate_keypair(&self) -> (SigningKey, VerifyingKey) {
        let signing = SigningKey::generate(&mut OsRng);
        let verifying = signing.verifying_key();
        (signing, verifying)
    }

    /// Store a private key under a caller-chosen id.
    pub fn store_key(&self, key_id: impl Into<String>, key: SigningKey) {
        self.keys.write().insert(key_id.into(), key);
    }

    /// Retrieve a stored private key by id.
    pub fn get_key(&self, key_id: &str) -> Option<SigningKey> {
        self.keys.read().get(key_id).cloned()
    }

    /// The public key bytes for a private key.
    pub fn public_key_bytes(&self, key: &SigningKey) -> [u8; 32] {
        key.verifying_key().to_bytes()
    }
}

impl Default for KeyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyManager({} keys, <private>)", self.keys.read().len())
    }
}

/// Sign canonical bytes, returning the 64-byte Ed25519 signature.
pub fn sign_canonical(key: &SigningKey, canonical: &CanonicalBytes) -> Vec<u8> {
    key.sign(canonical.as_bytes()).to_bytes().to_vec()
}

/// Verify a binding's signature against its embedded public key.
///
/// Recomputes the canonical form and checks the Ed25519 signature.
/// Returns `false` — never an error — on any defect: empty signature,
/// wrong signature length, unparseable public key, or a canonical form
/// that cannot be produced.
pub fn verify_binding(binding: &CryptographicBinding) -> bool {
    if binding.signature.is_empty() {
        return false;
    }
    let verifying_key = match VerifyingKey::from_bytes(&binding.public_key) {
        Ok(vk) => vk,
        Err(_) => return false,
    };
    let sig_bytes: [u8; 64] = match binding.signature.as_slice().try_into() {
        Ok(b) => b,
        Err(_) => return false,
    };
    let signature = Signature::from_bytes(&sig_bytes);
    let canonical = match binding.canonical_form() {
        Ok(c) => c,
        Err(_) => return false,
    };
    verifying_key
        .verify(canonical.as_bytes(), &signature)
        .is_ok()
}
