//! # Error Taxonomy — Structured Enforcement Failures
//!
//! Every failure mode of the enforcement pipeline maps to a distinct
//! [`EnforcementError`] variant. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Errors are surfaced, never swallowed; the pipeline performs no local
//!   retry. A consensus timeout becomes [`EnforcementError::ConsensusFailure`],
//!   never an allow decision.
//! - Each variant carries [`ErrorDetails`]: a context map, a Unix-seconds
//!   timestamp stamped at construction, and an optional recovery hint.
//! - Constructor helpers mirror the shape of the checks that raise them,
//!   so call sites stay one line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::unix_now;

/// Shared payload attached to every enforcement error: the machine-readable
/// context, the moment the error was raised, and an operator-facing
/// recovery hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Key/value context for audit and debugging.
    pub context: BTreeMap<String, String>,
    /// Unix seconds at which the error was constructed.
    pub timestamp: i64,
    /// Suggested operator action, when one exists.
    pub recovery_hint: Option<String>,
}

impl ErrorDetails {
    fn new(context: &[(&str, &str)], recovery_hint: Option<&str>) -> Self {
        Self {
            context: context
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            timestamp: unix_now(),
            recovery_hint: recovery_hint.map(str::to_string),
        }
    }
}

/// Runtime invariants asserted by the enforcement pipeline.
///
/// The short labels (I1..I5) appear verbatim in audit records and error
/// context, matching the decision-log vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Invariant {
    /// I1 — every artifact participating in a check has at least one binding.
    NoUnboundExecution,
    /// I2 — cross-jurisdiction flow requires an explicit boundary rule.
    ExplicitBoundaries,
    /// I3 — every binding considered in a decision verifies and is unrevoked.
    BindingIntegrity,
    /// I4 — an ambiguous reason can never accompany an allow decision.
    FailClosedAmbiguity,
    /// I5 — every emitted proof is complete enough to audit.
    Auditability,
}

impl Invariant {
    /// The short audit label for this invariant.
    pub fn label(&self) -> &'static str {
        match self {
            Invariant::NoUnboundExecution => "I1",
            Invariant::ExplicitBoundaries => "I2",
            Invariant::BindingIntegrity => "I3",
            Invariant::FailClosedAmbiguity => "I4",
            Invariant::Auditability => "I5",
        }
    }
}

impl std::fmt::Display for Invariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The exhaustive error taxonomy of the enforcement pipeline.
#[derive(Debug, Clone, Error)]
pub enum EnforcementError {
    /// An artifact/jurisdiction binding could not be created or located
    /// (unknown jurisdiction, unbound artifact, malformed identifier).
    #[error("invalid jurisdiction binding: {message}")]
    InvalidJurisdictionBinding {
        /// Human-readable description.
        message: String,
        /// Context, timestamp, recovery hint.
        details: ErrorDetails,
    },

    /// A jurisdictional boundary was violated (unknown domain, artifact
    /// not bound to the source jurisdiction, explicit deny, missing rule).
    #[error("jurisdictional violation: {message}")]
    JurisdictionalViolation {
        /// Human-readable description.
        message: String,
        /// Context, timestamp, recovery hint.
        details: ErrorDetails,
    },

    /// A binding failed signature verification or was revoked as of the
    /// decision timestamp.
    #[error("binding integrity violated for {binding_id}")]
    BindingIntegrityViolation {
        /// The offending binding.
        binding_id: String,
        /// The artifact the binding belongs to.
        artifact_id: String,
        /// Context, timestamp, recovery hint.
        details: ErrorDetails,
    },

    /// Temporal boundaries exist for the jurisdiction pair but none is
    /// valid at the decision timestamp.
    #[error("no valid temporal boundary for {boundary_key} at timestamp {at}")]
    TemporalConstraintViolation {
        /// The `src:tgt` registry key that was checked.
        boundary_key: String,
        /// The decision timestamp.
        at: i64,
        /// Context, timestamp, recovery hint.
        details: ErrorDetails,
    },

    /// Distributed consensus did not approve the decision (quorum failure
    /// or veto).
    #[error("consensus failure: {message}")]
    ConsensusFailure {
        /// Human-readable description.
        message: String,
        /// Context, timestamp, recovery hint.
        details: ErrorDetails,
    },

    /// A runtime invariant assertion failed.
    #[error("invariant violated: {invariant}: {message}")]
    InvariantViolation {
        /// Which invariant failed.
        invariant: Invariant,
        /// Human-readable description.
        message: String,
        /// Context, timestamp, recovery hint.
        details: ErrorDetails,
    },

    /// Jurisdiction resolution produced more than one candidate with no
    /// deterministic winner.
    #[error("ambiguous jurisdiction: {message}")]
    AmbiguousJurisdiction {
        /// Human-readable description.
        message: String,
        /// Context, timestamp, recovery hint.
        details: ErrorDetails,
    },

    /// Auxiliary verification failure reported by an external verifier.
    #[error("boundary verification error: {message}")]
    BoundaryVerificationError {
        /// Human-readable description.
        message: String,
        /// The binding under verification, when known.
        binding_id: String,
        /// Context, timestamp, recovery hint.
        details: ErrorDetails,
    },
}

impl EnforcementError {
    /// Build an [`EnforcementError::InvalidJurisdictionBinding`].
    pub fn invalid_binding(message: impl Into<String>, context: &[(&str, &str)]) -> Self {
        Self::InvalidJurisdictionBinding {
            message: message.into(),
            details: ErrorDetails::new(context, Some("check jurisdiction registration and re-bind")),
        }
    }

    /// Build an [`EnforcementError::JurisdictionalViolation`].
    pub fn jurisdictional_violation(message: impl Into<String>, context: &[(&str, &str)]) -> Self {
        Self::JurisdictionalViolation {
            message: message.into(),
            details: ErrorDetails::new(context, Some("check jurisdiction bindings and boundary rules")),
        }
    }

    /// Build an [`EnforcementError::BindingIntegrityViolation`].
    pub fn binding_integrity(binding_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        let binding_id = binding_id.into();
        let artifact_id = artifact_id.into();
        let details = ErrorDetails::new(
            &[("binding_id", &binding_id), ("artifact_id", &artifact_id)],
            Some("verify binding signature and re-bind if necessary"),
        );
        Self::BindingIntegrityViolation {
            binding_id,
            artifact_id,
            details,
        }
    }

    /// Build an [`EnforcementError::TemporalConstraintViolation`].
    pub fn temporal_constraint(boundary_key: impl Into<String>, at: i64) -> Self {
        let boundary_key = boundary_key.into();
        let at_str = at.to_string();
        let details = ErrorDetails::new(
            &[("boundary_key", &boundary_key), ("timestamp", &at_str)],
            Some("check temporal boundary validity window"),
        );
        Self::TemporalConstraintViolation {
            boundary_key,
            at,
            details,
        }
    }

    /// Build an [`EnforcementError::ConsensusFailure`].
    pub fn consensus_failure(message: impl Into<String>, context: &[(&str, &str)]) -> Self {
        Self::ConsensusFailure {
            message: message.into(),
            details: ErrorDetails::new(context, Some("retry with increased timeout or check cluster health")),
        }
    }

    /// Build an [`EnforcementError::InvariantViolation`].
    pub fn invariant_violation(
        invariant: Invariant,
        message: impl Into<String>,
        context: &[(&str, &str)],
    ) -> Self {
        Self::InvariantViolation {
            invariant,
            message: message.into(),
            details: ErrorDetails::new(context, Some("review system state and correct violations")),
        }
    }

    /// Build an [`EnforcementError::AmbiguousJurisdiction`].
    pub fn ambiguous_jurisdiction(message: impl Into<String>, context: &[(&str, &str)]) -> Self {
        Self::AmbiguousJurisdiction {
            message: message.into(),
            details: ErrorDetails::new(context, Some("supply a disambiguating binding or boundary rule")),
        }
    }

    /// Build an [`EnforcementError::BoundaryVerificationError`].
    pub fn boundary_verification(
        message: impl Into<String>,
        binding_id: impl Into<String>,
    ) -> Self {
        let binding_id = binding_id.into();
        let details = ErrorDetails::new(&[("binding_id", &binding_id)], None);
        Self::BoundaryVerificationError {
            message: message.into(),
            binding_id,
            details,
        }
    }

    /// The shared details payload of any variant.
    pub fn details(&self) -> &ErrorDetails {
        match self {
            EnforcementError::InvalidJurisdictionBinding { details, .. }
            | EnforcementError::JurisdictionalViolation { details, .. }
            | EnforcementError::BindingIntegrityViolation { details, .. }
            | EnforcementError::TemporalConstraintViolation { details, .. }
            | EnforcementError::ConsensusFailure { details, .. }
            | EnforcementError::InvariantViolation { details, .. }
            | EnforcementError::AmbiguousJurisdiction { details, .. }
            | EnforcementError::BoundaryVerificationError { details, .. } => details,
        }
    }

    /// The operator-facing recovery hint, when one exists.
    pub fn recovery_hint(&self) -> Option<&str> {
        self.details().recovery_hint.as_deref()
    }
}
