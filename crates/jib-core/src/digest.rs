//! # Digest — SHA-256 Hex Identifiers
//!
//! All record identifiers and Merkle hashes in the stack are lowercase
//! hex renderings of SHA-256 over a fixed byte concatenation. This module
//! is the single digest primitive; callers format the concatenation and
//! pass it here.

use sha2::{Digest, Sha256};

/// SHA-256 over raw bytes, rendered as 64 lowercase hex characters.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
