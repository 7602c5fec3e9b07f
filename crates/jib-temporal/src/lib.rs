//! # jib-temporal — Time-Bounded Jurisdictional Constraints
//!
//! Boundary rules can carry validity windows: a treaty that expires, a
//! provisional data-sharing agreement, a regulatory sandbox with an end
//! date. This crate manages those windows, their expiry lifecycle, and
//! the grace-period arithmetic around expiration.
//!
//! Validity is evaluated against caller-supplied timestamps wherever the
//! decision pipeline is involved, so replayed audits produce the answers
//! they produced live.

pub mod boundary;
pub mod grace;
pub mod manager;

pub use boundary::TemporalBoundary;
pub use grace::GracePeriodManager;
pub use manager::TemporalBoundaryManager;
