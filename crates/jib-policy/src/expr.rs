//! # Boundary Expressions
//!
//! A Boolean expression tree over atomic boundary rules. Leaves carry a
//! boundary id and its stored decision bit; internal nodes are `And`,
//! `Or`, and `Not`. Evaluation is standard Boolean recursion under a
//! context map.
//!
//! An atomic leaf currently evaluates to its stored bit; the context
//! parameter threads through the whole recursion so context-sensitive
//! leaf semantics can be added without touching the combinators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Evaluation context passed through the expression recursion.
pub type EvalContext = BTreeMap<String, serde_json::Value>;

/// A composable boundary expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BoundaryExpr {
    /// A primitive boundary rule with its stored decision.
    Atomic {
        /// The boundary rule this leaf stands for.
        boundary_id: String,
        /// The rule's stored decision bit.
        allowed: bool,
    },
    /// Both sides must allow.
    And {
        /// Left operand.
        left: Box<BoundaryExpr>,
        /// Right operand.
        right: Box<BoundaryExpr>,
    },
    /// Either side may allow.
    Or {
        /// Left operand.
        left: Box<BoundaryExpr>,
        /// Right operand.
        right: Box<BoundaryExpr>,
    },
    /// Inverts its operand.
    Not {
        /// The negated expression.
        expr: Box<BoundaryExpr>,
    },
}

impl BoundaryExpr {
    /// An atomic leaf.
    pub fn atomic(boundary_id: impl Into<String>, allowed: bool) -> Self {
        BoundaryExpr::Atomic {
            boundary_id: boundary_id.into(),
            allowed,
        }
    }

    /// Conjunction with `other`.
    pub fn and(self, other: BoundaryExpr) -> Self {
        BoundaryExpr::And {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Disjunction with `other`.
    pub fn or(self, other: BoundaryExpr) -> Self {
        BoundaryExpr::Or {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Negation.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        BoundaryExpr::Not {
            expr: Box::new(self),
        }
    }

    /// Evaluate the expression under `context`.
    pub fn evaluate(&self, context: &EvalContext) -> bool {
        match self {
            BoundaryExpr::Atomic { allowed, .. } => *allowed,
            BoundaryExpr::And { left, right } => {
                left.evaluate(context) && right.evaluate(context)
            }
            BoundaryExpr::Or { left, right } => {
                left.evaluate(context) || right.evaluate(context)
            }
            BoundaryExpr::Not { expr } => !expr.evaluate(context),
        }
    }

    /// Every atomic leaf in the expression, left-to-right.
    pub fn atomic_leaves(&self) -> Vec<(&str, bool)> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(&'a str, bool)>) {
        match self {
            BoundaryExpr::Atomic {
                boundary_id,
                allowed,
            } => out.push((boundary_id.as_str(), *allowed)),
            BoundaryExpr::And { left, right } | BoundaryExpr::Or { left, right } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
            BoundaryExpr::Not { expr } => expr.collect_leaves(out),
        }
    }
}
