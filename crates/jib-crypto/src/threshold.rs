//! # Threshold Signing (k-of-n)
//!
//! Multiple jurisdictional authorities can co-sign one canonical form.
//! The combined signature is the concatenation of k individual Ed25519
//! signatures ordered by ascending signer id; verification requires at
//! least k chunks that verify under distinct registered signer keys.
//!
//! The concatenation format is a deliberate simplification — an
//! aggregate scheme (e.g. FROST) would change the on-wire format and is
//! left as a future migration.

use std::collections::{BTreeMap, BTreeSet};

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use jib_core::{CanonicalBytes, EnforcementError};

const SIGNATURE_LEN: usize = 64;

/// A k-of-n co-signing group over registered signer public keys.
#[derive(Debug, Clone)]
pub struct ThresholdSigner {
    threshold: usize,
    total_parties: usize,
    signers: BTreeMap<String, VerifyingKey>,
}

impl ThresholdSigner {
    /// Create a scheme requiring `threshold` of `total_parties` signers.
    ///
    /// # Errors
    ///
    /// Rejects a zero threshold and thresholds above the party count.
    pub fn new(threshold: usize, total_parties: usize) -> Result<Self, EnforcementError> {
        if threshold == 0 || threshold > total_parties {
            return Err(EnforcementError::boundary_verification(
                format!("invalid threshold {threshold} of {total_parties}"),
                "",
            ));
        }
        Ok(Self {
            threshold,
            total_parties,
            signers: BTreeMap::new(),
        })
    }

    /// The required number of signatures.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The total party count.
    pub fn total_parties(&self) -> usize {
        self.total_parties
    }

    /// Register a signer's public key under its party id.
    pub fn add_signer(&mut self, party_id: impl Into<String>, public_key: VerifyingKey) {
        self.signers.insert(party_id.into(), public_key);
    }

    /// Produce a combined signature from at least `threshold` signers.
    ///
    /// Signatures are computed over the same canonical form and
    /// concatenated in ascending signer-id order; exactly `threshold`
    /// signatures are included even when more signers participate.
    pub fn sign_with_threshold(
        &self,
        canonical: &CanonicalBytes,
        signers: &[(&str, &SigningKey)],
    ) -> Result<Vec<u8>, EnforcementError> {
        if signers.len() < self.threshold {
            return Err(EnforcementError::boundary_verification(
                format!(
                    "not enough signers for threshold: have {}, need {}",
                    signers.len(),
                    self.threshold
                ),
                "",
            ));
        }

        let mut ordered: Vec<&(&str, &SigningKey)> = signers.iter().collect();
        ordered.sort_by_key(|entry| entry.0);

        let mut combined = Vec::with_capacity(self.threshold * SIGNATURE_LEN);
        for (_, key) in ordered.into_iter().take(self.threshold) {
            combined.extend_from_slice(&key.sign(canonical.as_bytes()).to_bytes());
        }
        Ok(combined)
    }

    /// Verify a combined signature against the registered signer keys.
    ///
    /// Splits into 64-byte chunks and counts chunks that verify under a
    /// registered key, each key counted at most once. Returns `true` iff
    /// at least `threshold` distinct signers verified.
    pub fn verify_threshold(&self, canonical: &CanonicalBytes, combined: &[u8]) -> bool {
        if combined.is_empty() || combined.len() % SIGNATURE_LEN != 0 {
            return false;
        }

        let mut used: BTreeSet<String> = BTreeSet::new();
        for chunk in combined.chunks(SIGNATURE_LEN) {
            let sig_bytes: [u8; SIGNATURE_LEN] = match chunk.try_into() {
                Ok(b) => b,
                Err(_) => return false,
            };
            let signature = Signature::from_bytes(&sig_bytes);
            for (party_id, key) in &self.signers {
                if used.contains(party_id) {
                    continue;
                }
                if key.verify(canonical.as_bytes(), &signature).is_ok() {
                    used.insert(party_id.clone());
                    break;
                }
            }
        }
        used.len() >= self.threshold
    }
}
