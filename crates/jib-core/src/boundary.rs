//! # Boundary Rules
//!
//! A boundary is a hard rule permitting or forbidding flow between two
//! jurisdictions, keyed by the ordered pair `(source, target)`. Absence
//! of a rule means deny — the registry never defaults to allow.

use serde::{Deserialize, Serialize};

use crate::identity::JurisdictionId;

/// The canonical registry key for a jurisdiction pair.
///
/// Renders as `"{source}:{target}"`; this exact string keys the boundary
/// registry, the temporal-boundary lookup, and the CRDT replication maps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoundaryKey {
    /// Source jurisdiction.
    pub source: JurisdictionId,
    /// Target jurisdiction.
    pub target: JurisdictionId,
}

impl BoundaryKey {
    /// Build a key from an ordered jurisdiction pair.
    pub fn new(source: JurisdictionId, target: JurisdictionId) -> Self {
        Self { source, target }
    }

    /// Whether the pair stays inside one jurisdiction.
    pub fn is_intra(&self) -> bool {
        self.source == self.target
    }
}

impl std::fmt::Display for BoundaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source, self.target)
    }
}

/// A rule permitting or forbidding flow between two jurisdictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Registry identifier.
    pub id: String,
    /// Source jurisdiction.
    pub source_jurisdiction_id: JurisdictionId,
    /// Target jurisdiction.
    pub target_jurisdiction_id: JurisdictionId,
    /// Whether flow along this pair is permitted.
    pub allowed: bool,
    /// Human-readable rationale recorded in every proof this rule decides.
    pub reason: String,
}

impl Boundary {
    /// Construct a boundary rule.
    pub fn new(
        id: impl Into<String>,
        source_jurisdiction_id: JurisdictionId,
        target_jurisdiction_id: JurisdictionId,
        allowed: bool,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_jurisdiction_id,
            target_jurisdiction_id,
            allowed,
            reason: reason.into(),
        }
    }

    /// The registry key for this rule.
    pub fn key(&self) -> BoundaryKey {
        BoundaryKey::new(
            self.source_jurisdiction_id.clone(),
            self.target_jurisdiction_id.clone(),
        )
    }
}
