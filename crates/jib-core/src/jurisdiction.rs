//! # Jurisdictions and Execution Domains
//!
//! A jurisdiction is a sovereign, legal, or regulatory scope that
//! artifacts are bound to. An execution domain is a concrete runtime
//! environment residing in exactly one jurisdiction, fixed at
//! registration.
//!
//! Both are immutable once registered — replacement happens by
//! re-registration, never in-place mutation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::{DomainId, JurisdictionId};

/// The kind of authority a jurisdiction represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JurisdictionType {
    /// A sovereign state or supranational body.
    Sovereign,
    /// A legal scope within a sovereign (e.g. a state or province).
    Legal,
    /// A regulatory regime (e.g. a data-protection authority).
    Regulatory,
}

impl std::fmt::Display for JurisdictionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JurisdictionType::Sovereign => f.write_str("sovereign"),
            JurisdictionType::Legal => f.write_str("legal"),
            JurisdictionType::Regulatory => f.write_str("regulatory"),
        }
    }
}

/// A territorial or legal scope to which artifacts are bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jurisdiction {
    /// Registry identifier.
    pub id: JurisdictionId,
    /// Human-readable name.
    pub name: String,
    /// The kind of authority.
    #[serde(rename = "type")]
    pub kind: JurisdictionType,
    /// Optional enclosing jurisdiction (e.g. a state within a federation).
    pub parent_id: Option<JurisdictionId>,
    /// Free-form attributes (treaty references, regulator contacts).
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Jurisdiction {
    /// Construct a jurisdiction with empty attributes.
    pub fn new(id: JurisdictionId, name: impl Into<String>, kind: JurisdictionType) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            parent_id: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Set the parent jurisdiction.
    pub fn with_parent(mut self, parent_id: JurisdictionId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// A concrete runtime environment whose jurisdiction is fixed at
/// registration.
///
/// The `jurisdiction_id` is checked against the jurisdiction registry at
/// boundary-check time, not at registration, so domains and jurisdictions
/// can be registered in either order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionDomain {
    /// Registry identifier.
    pub id: DomainId,
    /// Human-readable name.
    pub name: String,
    /// The jurisdiction this domain resides in.
    pub jurisdiction_id: JurisdictionId,
    /// Free-form metadata (region, provider, hardware class).
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ExecutionDomain {
    /// Construct a domain with empty metadata.
    pub fn new(id: DomainId, name: impl Into<String>, jurisdiction_id: JurisdictionId) -> Self {
        Self {
            id,
            name: name.into(),
            jurisdiction_id,
            metadata: BTreeMap::new(),
        }
    }
}
