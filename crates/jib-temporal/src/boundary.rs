//! # Temporal Boundaries
//!
//! A temporal boundary is a boundary rule with an optional validity
//! window. The window is closed on both ends: a boundary with
//! `valid_until = u` is still valid at exactly `u` and invalid at
//! `u + 1`.

use serde::{Deserialize, Serialize};

use jib_core::{BoundaryKey, JurisdictionId};

/// Renewal policy value that triggers automatic window renewal on expiry.
pub const RENEWAL_AUTO: &str = "auto";

/// Window length applied on renewal when either bound is unset (seconds).
pub const DEFAULT_RENEWAL_DURATION: i64 = 3600;

/// A boundary rule with an optional validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalBoundary {
    /// Registry identifier.
    pub id: String,
    /// Source jurisdiction.
    pub source_jurisdiction_id: JurisdictionId,
    /// Target jurisdiction.
    pub target_jurisdiction_id: JurisdictionId,
    /// Whether flow along this pair is permitted while the window holds.
    pub allowed: bool,
    /// Human-readable rationale.
    pub reason: String,
    /// Window start (Unix seconds); unset means no lower bound.
    pub valid_from: Option<i64>,
    /// Window end (Unix seconds, inclusive); unset means no upper bound.
    pub valid_until: Option<i64>,
    /// `"auto"` renews the window on expiry; anything else does not.
    pub renewal_policy: Option<String>,
}

impl TemporalBoundary {
    /// The registry key for the jurisdiction pair this rule governs.
    pub fn key(&self) -> BoundaryKey {
        BoundaryKey::new(
            self.source_jurisdiction_id.clone(),
            self.target_jurisdiction_id.clone(),
        )
    }

    /// Whether the rule is valid at `timestamp`.
    ///
    /// `(valid_from = ∅ ∨ t ≥ valid_from) ∧ (valid_until = ∅ ∨ t ≤ valid_until)`
    pub fn is_valid_at(&self, timestamp: i64) -> bool {
        if let Some(from) = self.valid_from {
            if timestamp < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if timestamp > until {
                return false;
            }
        }
        true
    }

    /// Whether the rule has expired as of `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        match self.valid_until {
            Some(until) => now > until,
            None => false,
        }
    }

    /// Seconds until expiry at `now`: `max(0, valid_until - now)`, or
    /// `-1` when the rule never expires.
    pub fn remaining_validity(&self, now: i64) -> i64 {
        match self.valid_until {
            Some(until) => (until - now).max(0),
            None => -1,
        }
    }
}
