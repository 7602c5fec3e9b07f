//! # Policy Tree
//!
//! Policies arrange boundary expressions hierarchically: a node owns an
//! expression, optional children, and a version tag. An `And`-rooted
//! node additionally requires every child to evaluate true, so a parent
//! policy can impose conjunction over a subtree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::expr::{BoundaryExpr, EvalContext};

/// A node in the policy hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyNode {
    /// Registry identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// The node's own expression.
    pub expression: BoundaryExpr,
    /// Optional parent policy.
    pub parent_id: Option<String>,
    /// Version tag; empty means unversioned.
    pub version: String,
    /// Child policies, evaluated when the root expression is an `And`.
    pub children: Vec<PolicyNode>,
}

impl PolicyNode {
    /// Construct a policy node with no parent, version, or children.
    pub fn new(id: impl Into<String>, name: impl Into<String>, expression: BoundaryExpr) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expression,
            parent_id: None,
            version: String::new(),
            children: Vec::new(),
        }
    }

    /// Set the parent policy id.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the version tag.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Attach a child policy.
    pub fn add_child(&mut self, child: PolicyNode) {
        self.children.push(child);
    }

    /// Evaluate this policy under `context`.
    ///
    /// An `And`-rooted node additionally requires every child to
    /// evaluate true; other roots ignore children.
    pub fn evaluate(&self, context: &EvalContext) -> bool {
        let own = self.expression.evaluate(context);

        if matches!(self.expression, BoundaryExpr::And { .. }) {
            for child in &self.children {
                if !child.evaluate(context) {
                    return false;
                }
            }
        }

        own
    }
}

/// A detected contradiction between two policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConflict {
    /// First policy involved.
    pub policy_a: String,
    /// Second policy involved.
    pub policy_b: String,
    /// The boundary rule both reference with opposing decisions.
    pub boundary_id: String,
}

/// Indexes policies by id and parent/child adjacency.
#[derive(Debug, Default)]
pub struct PolicyManager {
    policies: BTreeMap<String, PolicyNode>,
    /// parent id → child policy ids.
    tree: BTreeMap<String, Vec<String>>,
}

impl PolicyManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a policy, recording its parent adjacency.
    pub fn add_policy(&mut self, policy: PolicyNode) {
        if let Some(parent_id) = &policy.parent_id {
            self.tree
                .entry(parent_id.clone())
                .or_default()
                .push(policy.id.clone());
        }
        self.policies.insert(policy.id.clone(), policy);
    }

    /// Evaluate the policy with `policy_id` under `context`.
    ///
    /// Unknown policies evaluate false — absence never reads as
    /// permission.
    pub fn evaluate_policy(&self, policy_id: &str, context: &EvalContext) -> bool {
        match self.policies.get(policy_id) {
            Some(policy) => policy.evaluate(context),
            None => false,
        }
    }

    /// A policy by id.
    pub fn get(&self, policy_id: &str) -> Option<&PolicyNode> {
        self.policies.get(policy_id)
    }

    /// The parent → children adjacency map.
    pub fn policy_tree(&self) -> &BTreeMap<String, Vec<String>> {
        &self.tree
    }

    /// Scan for contradictions: two policies whose atomic leaves name
    /// the same boundary id with opposing decision bits.
    pub fn find_conflicts(&self) -> Vec<PolicyConflict> {
        let mut conflicts = Vec::new();
        let entries: Vec<(&String, &PolicyNode)> = self.policies.iter().collect();

        for (i, (id_a, policy_a)) in entries.iter().enumerate() {
            let leaves_a = policy_a.expression.atomic_leaves();
            for (id_b, policy_b) in entries.iter().skip(i + 1) {
                for (boundary_a, allowed_a) in &leaves_a {
                    for (boundary_b, allowed_b) in policy_b.expression.atomic_leaves() {
                        if *boundary_a == boundary_b && *allowed_a != allowed_b {
                            conflicts.push(PolicyConflict {
                                policy_a: (*id_a).clone(),
                                policy_b: (*id_b).clone(),
                                boundary_id: boundary_b.to_string(),
                            });
                        }
                    }
                }
            }
        }
        conflicts
    }

    /// Normalization to CNF/DNF is a reserved extension point; the base
    /// implementation returns the expression unchanged. Unknown policies
    /// normalize to a denying atom.
    pub fn normalize_policy(&self, policy_id: &str) -> BoundaryExpr {
        match self.policies.get(policy_id) {
            Some(policy) => policy.expression.clone(),
            None => BoundaryExpr::atomic("unknown", false),
        }
    }
}
