//! # Clock — Unix-Seconds Time Source
//!
//! The data model, signing format, and audit records all carry signed
//! 64-bit Unix seconds. This module is the single place wall-clock time
//! is read; everything downstream takes timestamps as parameters so that
//! replayed audits remain stable.

use chrono::Utc;

/// Current time as Unix seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Current time as Unix nanoseconds.
///
/// Used only for proposal-id derivation, where sub-second uniqueness
/// matters. Falls back to seconds-scaled time on the (far-future)
/// overflow edge of `chrono`'s nanosecond range.
pub fn unix_now_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp().saturating_mul(1_000_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_positive_and_consistent() {
        let secs = unix_now();
        let nanos = unix_now_nanos();
        assert!(secs > 1_600_000_000); // after 2020
        assert!(nanos / 1_000_000_000 >= secs - 1);
    }
}
