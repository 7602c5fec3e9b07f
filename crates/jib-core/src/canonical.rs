//! # Canonical Serialization — Deterministic Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for
//! bytes that get signed or digested across the stack.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which rejects floats
//! and serializes with sorted keys and compact separators. Any function
//! that signs or digests structured data must accept `&CanonicalBytes`,
//! so a non-canonical serialization path cannot exist by construction.
//!
//! Key ordering relies on `serde_json`'s default `BTreeMap`-backed object
//! representation (the `preserve_order` feature must stay off), which
//! yields ASCII-ascending keys — the ordering the signing format requires.

use serde::Serialize;
use serde_json::Value;

use crate::error::EnforcementError;

/// Bytes produced exclusively by deterministic canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - All numeric values are integers; floats are rejected.
/// - Serialization uses sorted keys with compact separators, UTF-8,
///   no whitespace.
///
/// These invariants are enforced by the constructor and cannot be violated
/// by downstream code because the inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// This is the ONLY way to construct `CanonicalBytes`. All signing and
    /// digest computation over structured data must flow through here.
    pub fn new(obj: &impl Serialize) -> Result<Self, EnforcementError> {
        let value = serde_json::to_value(obj).map_err(|e| {
            EnforcementError::boundary_verification(
                format!("canonical serialization failed: {e}"),
                "",
            )
        })?;
        reject_floats(&value)?;
        let s = serde_json::to_string(&value).map_err(|e| {
            EnforcementError::boundary_verification(
                format!("canonical serialization failed: {e}"),
                "",
            )
        })?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for signing or digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively reject float values.
///
/// Amounts and timestamps in canonical payloads must be integers or
/// strings; a float would serialize differently across platforms and
/// split the signature base.
fn reject_floats(value: &Value) -> Result<(), EnforcementError> {
    match value {
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                return Err(EnforcementError::boundary_verification(
                    format!("float values are not permitted in canonical payloads: {n}"),
                    "",
                ));
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn keys_are_sorted_and_compact() {
        let value = serde_json::json!({"b": 2, "a": 1});
        let cb = CanonicalBytes::new(&value).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"a":1,"b":2}"#);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let mut m1 = BTreeMap::new();
        m1.insert("x", 1);
        m1.insert("a", 2);
        let v2 = serde_json::json!({"a": 2, "x": 1});
        assert_eq!(
            CanonicalBytes::new(&m1).unwrap(),
            CanonicalBytes::new(&v2).unwrap()
        );
    }

    #[test]
    fn floats_rejected() {
        let value = serde_json::json!({"amount": 1.5});
        assert!(CanonicalBytes::new(&value).is_err());
    }

    #[test]
    fn nested_floats_rejected() {
        let value = serde_json::json!({"outer": {"inner": [1, 2.5]}});
        assert!(CanonicalBytes::new(&value).is_err());
    }

    #[test]
    fn integers_pass() {
        let value = serde_json::json!({"timestamp": 1_700_000_000_i64});
        assert!(CanonicalBytes::new(&value).is_ok());
    }
}
