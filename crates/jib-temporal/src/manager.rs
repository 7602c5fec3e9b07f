//! # Temporal Boundary Manager
//!
//! Stores temporal boundaries keyed by id, evaluates validity at a given
//! timestamp, and drives the expiry lifecycle: expiry callbacks fire
//! first, then `"auto"`-renewal shifts the window to start at the renewal
//! time, preserving the original window length.

use std::collections::HashMap;

use parking_lot::RwLock;

use jib_core::BoundaryKey;

use crate::boundary::{TemporalBoundary, DEFAULT_RENEWAL_DURATION, RENEWAL_AUTO};

type ExpiryCallback = Box<dyn Fn(&TemporalBoundary) + Send + Sync>;

/// Registry and lifecycle manager for temporal boundaries.
pub struct TemporalBoundaryManager {
    boundaries: RwLock<HashMap<String, TemporalBoundary>>,
    callbacks: RwLock<HashMap<String, ExpiryCallback>>,
}

impl TemporalBoundaryManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self {
            boundaries: RwLock::new(HashMap::new()),
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or replace) a temporal boundary.
    pub fn register_boundary(&self, boundary: TemporalBoundary) {
        self.boundaries.write().insert(boundary.id.clone(), boundary);
    }

    /// Register a callback invoked when the boundary expires.
    pub fn register_expiry_callback(
        &self,
        boundary_id: impl Into<String>,
        callback: impl Fn(&TemporalBoundary) + Send + Sync + 'static,
    ) {
        self.callbacks
            .write()
            .insert(boundary_id.into(), Box::new(callback));
    }

    /// Whether the boundary with `boundary_id` is valid at `timestamp`.
    ///
    /// Unknown ids are invalid — absence never reads as permission.
    pub fn check_validity(&self, boundary_id: &str, timestamp: i64) -> bool {
        match self.boundaries.read().get(boundary_id) {
            Some(boundary) => boundary.is_valid_at(timestamp),
            None => false,
        }
    }

    /// A snapshot of the boundary with the given id.
    pub fn get(&self, boundary_id: &str) -> Option<TemporalBoundary> {
        self.boundaries.read().get(boundary_id).cloned()
    }

    /// All registered boundaries governing the given jurisdiction pair.
    pub fn boundaries_for_key(&self, key: &BoundaryKey) -> Vec<TemporalBoundary> {
        self.boundaries
            .read()
            .values()
            .filter(|b| b.key() == *key)
            .cloned()
            .collect()
    }

    /// Handle expiry of a boundary at `now`: fire the registered callback
    /// (if any), then auto-renew when the policy asks for it.
    ///
    /// The callback runs without the boundary lock held, so it may query
    /// boundary state; it must not register further callbacks.
    pub fn handle_expiry(&self, boundary_id: &str, now: i64) {
        let Some(boundary) = self.get(boundary_id) else {
            return;
        };

        if let Some(callback) = self.callbacks.read().get(boundary_id) {
            callback(&boundary);
        }

        if boundary.renewal_policy.as_deref() == Some(RENEWAL_AUTO) {
            self.attempt_renewal(boundary_id, now);
        }
    }

    /// Shift the window of `boundary_id` to start at `now`, preserving
    /// the original window length (default when either bound is unset).
    /// A boundary without an upper bound never expires and is left alone.
    fn attempt_renewal(&self, boundary_id: &str, now: i64) {
        let mut boundaries = self.boundaries.write();
        let Some(boundary) = boundaries.get_mut(boundary_id) else {
            return;
        };
        let Some(until) = boundary.valid_until else {
            return;
        };

        let duration = match boundary.valid_from {
            Some(from) => until - from,
            None => DEFAULT_RENEWAL_DURATION,
        };

        tracing::debug!(
            boundary_id,
            duration,
            "renewing temporal boundary window"
        );
        boundary.valid_from = Some(now);
        boundary.valid_until = Some(now + duration);
    }

    /// All boundaries expired as of `now`.
    pub fn expired_boundaries(&self, now: i64) -> Vec<TemporalBoundary> {
        self.boundaries
            .read()
            .values()
            .filter(|b| b.is_expired(now))
            .cloned()
            .collect()
    }

    /// All boundaries valid at `now`.
    pub fn valid_boundaries(&self, now: i64) -> Vec<TemporalBoundary> {
        self.boundaries
            .read()
            .values()
            .filter(|b| b.is_valid_at(now))
            .cloned()
            .collect()
    }

    /// Remove a boundary and its expiry callback.
    pub fn remove_boundary(&self, boundary_id: &str) {
        self.boundaries.write().remove(boundary_id);
        self.callbacks.write().remove(boundary_id);
    }

    /// Number of registered boundaries.
    pub fn len(&self) -> usize {
        self.boundaries.read().len()
    }

    /// Whether no boundary is registered.
    pub fn is_empty(&self) -> bool {
        self.boundaries.read().is_empty()
    }
}

impl Default for TemporalBoundaryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemporalBoundaryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TemporalBoundaryManager({} boundaries, {} callbacks)",
            self.boundaries.read().len(),
            self.callbacks.read().len()
        )
    }
}
