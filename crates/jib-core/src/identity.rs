//! # Identity Newtypes — Validated Identifier Primitives
//!
//! Newtype wrappers for the caller-supplied identifiers in the JIB stack.
//! These prevent accidental identifier confusion — you cannot pass an
//! `ArtifactId` where a `DomainId` is expected.
//!
//! Digest-derived identifiers (binding ids, proof ids, proposal ids) are
//! plain lowercase-hex strings produced by [`crate::digest::sha256_hex`];
//! they are never constructed from user input and need no validation
//! beyond their derivation.
//!
//! ## Security Invariant
//!
//! Type-level distinction between identifier namespaces prevents
//! cross-namespace confusion where one kind of identifier is substituted
//! for another in a registry lookup.

use serde::{Deserialize, Serialize};

use crate::error::EnforcementError;

macro_rules! nonempty_id_impl {
    ($type:ident, $label:literal) => {
        impl $type {
            /// Create a new identifier, rejecting the empty string.
            pub fn new(id: impl Into<String>) -> Result<Self, EnforcementError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(EnforcementError::invalid_binding(
                        concat!($label, " must not be empty"),
                        &[],
                    ));
                }
                Ok(Self(id))
            }

            /// Access the inner string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

/// Unique identifier for an intelligence artifact (model, agent, dataset).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactId(String);

/// Unique identifier for an execution domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DomainId(String);

/// Unique identifier for a consensus peer node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

nonempty_id_impl!(ArtifactId, "ArtifactId");
nonempty_id_impl!(DomainId, "DomainId");
nonempty_id_impl!(NodeId, "NodeId");

/// Unique identifier for a jurisdiction.
///
/// Format follows ISO 3166 country codes extended with region suffixes,
/// e.g. "US" or "us-ca" for a Californian legal scope.
///
/// # Validation
///
/// - Must be non-empty.
/// - Must contain only ASCII alphanumeric characters and hyphens.
/// - Must not start or end with a hyphen.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JurisdictionId(String);

impl JurisdictionId {
    /// Create a new jurisdiction identifier with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty, contains invalid
    /// characters, or starts/ends with a hyphen.
    pub fn new(id: impl Into<String>) -> Result<Self, EnforcementError> {
        let id = id.into();
        if id.is_empty() {
            return Err(EnforcementError::invalid_binding(
                "JurisdictionId must not be empty",
                &[],
            ));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(EnforcementError::invalid_binding(
                format!("JurisdictionId contains invalid characters: {id:?}"),
                &[("jurisdiction_id", id.as_str())],
            ));
        }
        if id.starts_with('-') || id.ends_with('-') {
            return Err(EnforcementError::invalid_binding(
                format!("JurisdictionId must not start or end with a hyphen: {id:?}"),
                &[("jurisdiction_id", id.as_str())],
            ));
        }
        Ok(Self(id))
    }

    /// Access the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JurisdictionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- JurisdictionId ----

    #[test]
    fn jurisdiction_id_valid() {
        let id = JurisdictionId::new("us-ca").unwrap();
        assert_eq!(id.as_str(), "us-ca");
        assert_eq!(format!("{id}"), "us-ca");
    }

    #[test]
    fn jurisdiction_id_empty_rejected() {
        assert!(JurisdictionId::new("").is_err());
    }

    #[test]
    fn jurisdiction_id_special_chars_rejected() {
        assert!(JurisdictionId::new("us/ca").is_err());
        assert!(JurisdictionId::new("us ca").is_err());
        assert!(JurisdictionId::new("us.ca").is_err());
    }

    #[test]
    fn jurisdiction_id_hyphen_edges_rejected() {
        assert!(JurisdictionId::new("-us").is_err());
        assert!(JurisdictionId::new("us-").is_err());
    }

    // ---- Non-empty newtypes ----

    #[test]
    fn artifact_id_valid() {
        let id = ArtifactId::new("model-x").unwrap();
        assert_eq!(id.as_str(), "model-x");
    }

    #[test]
    fn artifact_id_empty_rejected() {
        assert!(ArtifactId::new("").is_err());
    }

    #[test]
    fn domain_and_node_ids() {
        assert!(DomainId::new("prod-west").is_ok());
        assert!(DomainId::new("").is_err());
        assert!(NodeId::new("node-1").is_ok());
        assert!(NodeId::new("").is_err());
    }

    // ---- Serde round-trips ----

    #[test]
    fn serde_round_trips() {
        let a = ArtifactId::new("model-x").unwrap();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#""model-x""#);
        let back: ArtifactId = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);

        let j = JurisdictionId::new("us-ca").unwrap();
        let json = serde_json::to_string(&j).unwrap();
        let back: JurisdictionId = serde_json::from_str(&json).unwrap();
        assert_eq!(j, back);
    }
}
