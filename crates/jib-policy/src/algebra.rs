//! # Boundary Composition Algebra
//!
//! Formal composition over concrete [`Boundary`] rules: sequential
//! composition (a path through two rules is allowed only when both
//! allow), the identity rule, and inversion. Used by verifiers reasoning
//! about multi-hop paths rather than by the decision pipeline itself.

use jib_core::{Boundary, EnforcementError, JurisdictionId};

/// Composition operators over boundary rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryAlgebra;

impl BoundaryAlgebra {
    /// Compose two rules into the rule for the concatenated path: source
    /// of the first, target of the second, allowed only when both allow.
    pub fn compose(&self, first: &Boundary, second: &Boundary) -> Boundary {
        Boundary::new(
            format!("{}:{}", first.id, second.id),
            first.source_jurisdiction_id.clone(),
            second.target_jurisdiction_id.clone(),
            first.allowed && second.allowed,
            format!("Composed: {} + {}", first.reason, second.reason),
        )
    }

    /// The identity rule: allows everything, composes neutrally on the
    /// decision bit.
    pub fn identity(&self) -> Result<Boundary, EnforcementError> {
        Ok(Boundary::new(
            "identity",
            JurisdictionId::new("any")?,
            JurisdictionId::new("any")?,
            true,
            "Identity boundary - allows all",
        ))
    }

    /// The rule that denies what the original allows (and vice versa).
    pub fn inverse(&self, boundary: &Boundary) -> Boundary {
        Boundary::new(
            format!("inv:{}", boundary.id),
            boundary.source_jurisdiction_id.clone(),
            boundary.target_jurisdiction_id.clone(),
            !boundary.allowed,
            format!("Inverse of: {}", boundary.reason),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jid(s: &str) -> JurisdictionId {
        JurisdictionId::new(s).unwrap()
    }

    fn rule(id: &str, src: &str, tgt: &str, allowed: bool) -> Boundary {
        Boundary::new(id, jid(src), jid(tgt), allowed, "test rule")
    }

    #[test]
    fn compose_ands_decisions_and_chains_endpoints() {
        let algebra = BoundaryAlgebra;
        let ab = rule("ab", "a", "b", true);
        let bc = rule("bc", "b", "c", true);
        let composed = algebra.compose(&ab, &bc);
        assert_eq!(composed.source_jurisdiction_id, jid("a"));
        assert_eq!(composed.target_jurisdiction_id, jid("c"));
        assert!(composed.allowed);

        let bc_deny = rule("bc", "b", "c", false);
        assert!(!algebra.compose(&ab, &bc_deny).allowed);
    }

    #[test]
    fn identity_is_neutral_on_decision() {
        let algebra = BoundaryAlgebra;
        let identity = algebra.identity().unwrap();
        let ab = rule("ab", "a", "b", true);
        assert_eq!(algebra.compose(&identity, &ab).allowed, ab.allowed);

        let ab_deny = rule("ab", "a", "b", false);
        assert_eq!(algebra.compose(&identity, &ab_deny).allowed, ab_deny.allowed);
    }

    #[test]
    fn inverse_flips_decision_and_keeps_endpoints() {
        let algebra = BoundaryAlgebra;
        let ab = rule("ab", "a", "b", true);
        let inv = algebra.inverse(&ab);
        assert!(!inv.allowed);
        assert_eq!(inv.source_jurisdiction_id, ab.source_jurisdiction_id);
        assert_eq!(inv.target_jurisdiction_id, ab.target_jurisdiction_id);
        assert!(algebra.inverse(&inv).allowed);
    }
}
