//! # Grace Periods
//!
//! The window immediately before a temporal boundary's expiry in which
//! operators are expected to renew or drain traffic. Grace membership is
//! `valid_until - default_grace ≤ t ≤ valid_until`.

use crate::boundary::TemporalBoundary;

/// Fallback grace length when callers pass a non-positive value (seconds).
pub const DEFAULT_GRACE_PERIOD: i64 = 3600;

/// Grace-period arithmetic around temporal boundary expiry.
#[derive(Debug, Clone, Copy)]
pub struct GracePeriodManager {
    default_grace: i64,
}

impl GracePeriodManager {
    /// Create a manager with the given grace length in seconds;
    /// non-positive values fall back to [`DEFAULT_GRACE_PERIOD`].
    pub fn new(default_grace: i64) -> Self {
        Self {
            default_grace: if default_grace > 0 {
                default_grace
            } else {
                DEFAULT_GRACE_PERIOD
            },
        }
    }

    /// The configured grace length in seconds.
    pub fn default_grace(&self) -> i64 {
        self.default_grace
    }

    /// Whether `timestamp` falls inside the boundary's grace window.
    ///
    /// A boundary without an upper bound never expires and therefore has
    /// no grace window.
    pub fn is_in_grace_period(&self, boundary: &TemporalBoundary, timestamp: i64) -> bool {
        let Some(until) = boundary.valid_until else {
            return false;
        };
        let grace_start = until - self.default_grace;
        grace_start <= timestamp && timestamp <= until
    }

    /// Seconds until expiry at `timestamp`: `max(0, valid_until - t)`,
    /// or `-1` when the boundary never expires.
    pub fn remaining_time(&self, boundary: &TemporalBoundary, timestamp: i64) -> i64 {
        match boundary.valid_until {
            Some(until) => (until - timestamp).max(0),
            None => -1,
        }
    }

    /// Seconds of grace remaining, or `-1` when `timestamp` is outside
    /// the grace window.
    pub fn grace_time_remaining(&self, boundary: &TemporalBoundary, timestamp: i64) -> i64 {
        if !self.is_in_grace_period(boundary, timestamp) {
            return -1;
        }
        self.remaining_time(boundary, timestamp)
    }
}

impl Default for GracePeriodManager {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jib_core::JurisdictionId;

    fn boundary(until: Option<i64>) -> TemporalBoundary {
        TemporalBoundary {
            id: "tb-1".to_string(),
            source_jurisdiction_id: JurisdictionId::new("us-ca").unwrap(),
            target_jurisdiction_id: JurisdictionId::new("us-tx").unwrap(),
            allowed: true,
            reason: "provisional compact".to_string(),
            valid_from: Some(0),
            valid_until: until,
            renewal_policy: None,
        }
    }

    #[test]
    fn grace_window_edges() {
        let gpm = GracePeriodManager::new(100);
        let b = boundary(Some(1_000));
        assert!(!gpm.is_in_grace_period(&b, 899));
        assert!(gpm.is_in_grace_period(&b, 900));
        assert!(gpm.is_in_grace_period(&b, 1_000));
        assert!(!gpm.is_in_grace_period(&b, 1_001));
    }

    #[test]
    fn no_expiry_means_no_grace() {
        let gpm = GracePeriodManager::new(100);
        let b = boundary(None);
        assert!(!gpm.is_in_grace_period(&b, 0));
        assert_eq!(gpm.remaining_time(&b, 0), -1);
        assert_eq!(gpm.grace_time_remaining(&b, 0), -1);
    }

    #[test]
    fn remaining_time_floors_at_zero() {
        let gpm = GracePeriodManager::new(100);
        let b = boundary(Some(1_000));
        assert_eq!(gpm.remaining_time(&b, 950), 50);
        assert_eq!(gpm.remaining_time(&b, 2_000), 0);
    }

    #[test]
    fn grace_remaining_outside_window_is_sentinel() {
        let gpm = GracePeriodManager::new(100);
        let b = boundary(Some(1_000));
        assert_eq!(gpm.grace_time_remaining(&b, 500), -1);
        assert_eq!(gpm.grace_time_remaining(&b, 950), 50);
    }

    #[test]
    fn non_positive_grace_falls_back() {
        assert_eq!(GracePeriodManager::new(0).default_grace(), DEFAULT_GRACE_PERIOD);
        assert_eq!(GracePeriodManager::new(-5).default_grace(), DEFAULT_GRACE_PERIOD);
    }
}
