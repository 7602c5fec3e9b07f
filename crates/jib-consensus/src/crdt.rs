//! # Replicated Registry Maps (LWW CRDT)
//!
//! Boundary and jurisdiction registries replicate between nodes as
//! last-writer-wins maps. Every entry carries its update timestamp;
//! merge keeps the newer write per key, with a deterministic value
//! tiebreak on equal timestamps so that merge stays commutative.
//!
//! Convergence holds assuming monotonic timestamps on updates: any two
//! replicas that have seen the same set of writes merge to the same map
//! regardless of order.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A value with its last-write timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LwwEntry {
    /// The replicated value.
    pub value: serde_json::Value,
    /// Unix seconds of the write that produced this value.
    pub updated_at: i64,
}

impl LwwEntry {
    /// Whether `other` wins against `self` under LWW ordering with a
    /// deterministic tiebreak (serialized value, descending).
    fn loses_to(&self, other: &LwwEntry) -> bool {
        if other.updated_at != self.updated_at {
            return other.updated_at > self.updated_at;
        }
        other.value.to_string() > self.value.to_string()
    }
}

/// Last-writer-wins replication state for boundaries and jurisdictions.
#[derive(Debug, Default)]
pub struct CrdtManager {
    boundaries: RwLock<BTreeMap<String, LwwEntry>>,
    jurisdictions: RwLock<BTreeMap<String, LwwEntry>>,
}

impl CrdtManager {
    /// Create an empty replication state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a boundary write at `timestamp`.
    pub fn update_boundary(
        &self,
        boundary_id: impl Into<String>,
        value: serde_json::Value,
        timestamp: i64,
    ) {
        Self::apply(
            &mut self.boundaries.write(),
            boundary_id.into(),
            LwwEntry {
                value,
                updated_at: timestamp,
            },
        );
    }

    /// Record a jurisdiction write at `timestamp`.
    pub fn update_jurisdiction(
        &self,
        jurisdiction_id: impl Into<String>,
        value: serde_json::Value,
        timestamp: i64,
    ) {
        Self::apply(
            &mut self.jurisdictions.write(),
            jurisdiction_id.into(),
            LwwEntry {
                value,
                updated_at: timestamp,
            },
        );
    }

    /// The current boundary value, if any.
    pub fn boundary(&self, boundary_id: &str) -> Option<serde_json::Value> {
        self.boundaries
            .read()
            .get(boundary_id)
            .map(|e| e.value.clone())
    }

    /// The current jurisdiction value, if any.
    pub fn jurisdiction(&self, jurisdiction_id: &str) -> Option<serde_json::Value> {
        self.jurisdictions
            .read()
            .get(jurisdiction_id)
            .map(|e| e.value.clone())
    }

    /// Merge another replica's state into this one, per-key LWW.
    pub fn merge(&self, other: &CrdtManager) {
        {
            let other_boundaries = other.boundaries.read().clone();
            let mut boundaries = self.boundaries.write();
            for (key, entry) in other_boundaries {
                Self::apply(&mut boundaries, key, entry);
            }
        }
        {
            let other_jurisdictions = other.jurisdictions.read().clone();
            let mut jurisdictions = self.jurisdictions.write();
            for (key, entry) in other_jurisdictions {
                Self::apply(&mut jurisdictions, key, entry);
            }
        }
    }

    fn apply(map: &mut BTreeMap<String, LwwEntry>, key: String, incoming: LwwEntry) {
        match map.get(&key) {
            Some(existing) if !existing.loses_to(&incoming) => {}
            _ => {
                map.insert(key, incoming);
            }
        }
    }

    /// Number of replicated boundary entries.
    pub fn boundary_count(&self) -> usize {
        self.boundaries.read().len()
    }

    /// Number of replicated jurisdiction entries.
    pub fn jurisdiction_count(&self) -> usize {
        self.jurisdictions.read().len()
    }
}
