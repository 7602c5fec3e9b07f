//! # jib-enforcer — The Enforcement Pipeline
//!
//! The policy decision point of the JIB stack. Every attempted movement
//! of an artifact between execution domains either returns a signed,
//! hash-chained, consensus-approved [`BoundaryProof`](jib_core::BoundaryProof)
//! or fails closed with a typed error.
//!
//! Correctness here is a *conjunction*: binding verification, revocation,
//! temporal validity, invariant assertions, distributed consent,
//! provenance, and the audit append are all mandatory, in a fixed order.
//! Skipping or reordering any one of them opens a silent bypass, so the
//! whole pipeline runs behind one exclusive lock in
//! [`integrated::IntegratedEnforcer::enforce_with_all_checks`].
//!
//! Layering:
//!
//! - [`base::BoundaryEnforcer`] — the registries and the plain
//!   `check/enforce` decision.
//! - [`invariants::InvariantChecker`] — the I1..I5 runtime assertions.
//! - [`integrated::IntegratedEnforcer`] — the full pipeline.
//! - [`adapter::IntegrationAdapter`] — the surface external systems
//!   consume.
//! - [`monitor::PerformanceMonitor`] — operation timing series.

pub mod adapter;
pub mod base;
pub mod integrated;
pub mod invariants;
pub mod monitor;

pub use adapter::{BindingSummary, ExecutionContext, IntegrationAdapter};
pub use base::BoundaryEnforcer;
pub use integrated::IntegratedEnforcer;
pub use invariants::InvariantChecker;
pub use monitor::{OperationStats, PerformanceMonitor};
