//! # jib-crypto — Cryptographic Primitives for the JIB Stack
//!
//! This crate provides the cryptographic building blocks the enforcement
//! pipeline composes:
//!
//! - **Ed25519** key generation, canonical-form signing, and binding
//!   verification.
//! - **Audit Merkle tree** — a binary hash tree over ordered hex leaves,
//!   rebuilt on every append, with sibling-path inclusion proofs.
//! - **Revocation set** — `binding_id → revoke_ts`, queried against the
//!   decision timestamp so replayed audits stay stable.
//! - **Threshold signing** — k-of-n co-signing over one canonical form,
//!   combined by concatenation in signer-id ascending order.
//!
//! ## Security Invariant
//!
//! Signing operations take [`CanonicalBytes`](jib_core::CanonicalBytes),
//! never raw byte slices, so a non-canonical signature base cannot exist.
//! Private keys are never serialized; [`keys::KeyManager`] does not
//! implement `Serialize` and redacts its `Debug` output.

pub mod keys;
pub mod merkle;
pub mod revocation;
pub mod threshold;

// Re-export primary types.
pub use keys::{sign_canonical, verify_binding, KeyManager};
pub use merkle::AuditMerkleTree;
pub use revocation::RevocationSet;
pub use threshold::ThresholdSigner;
