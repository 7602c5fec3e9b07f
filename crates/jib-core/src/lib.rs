//! # jib-core — Foundational Types for the JIB Stack
//!
//! This crate is the bedrock of the Jurisdictional Intelligence Boundary
//! (JIB) stack. It defines the type-system primitives every other crate in
//! the workspace builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ArtifactId`,
//!    `JurisdictionId`, `DomainId`, `NodeId` — all newtypes with validated
//!    constructors. No bare strings for identifiers that callers supply.
//!
//! 2. **`CanonicalBytes` newtype.** All signing and digest computation over
//!    structured data flows through `CanonicalBytes::new()`. No raw
//!    `serde_json::to_vec()` for signed payloads. Ever.
//!
//! 3. **Digest-derived record ids.** Bindings, proofs, and provenance nodes
//!    are identified by lowercase-hex SHA-256 over a fixed concatenation;
//!    `sha256_hex()` is the single digest primitive.
//!
//! 4. **Unix-seconds timestamps.** The wire and signing formats carry
//!    signed 64-bit Unix seconds; `clock::unix_now()` is the one source.
//!
//! 5. **Fail-closed error taxonomy.** Every enforcement failure maps to a
//!    distinct [`EnforcementError`] variant carrying a context map, a
//!    timestamp, and a recovery hint.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jib-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public data types derive `Debug`, `Clone`, `Serialize`, `Deserialize`.

pub mod binding;
pub mod boundary;
pub mod canonical;
pub mod clock;
pub mod digest;
pub mod error;
pub mod identity;
pub mod jurisdiction;
pub mod proof;

// Re-export primary types for ergonomic imports.
pub use binding::{CryptographicBinding, DEFAULT_BINDING_TYPE, SIGNATURE_ALGORITHM};
pub use boundary::{Boundary, BoundaryKey};
pub use canonical::CanonicalBytes;
pub use clock::{unix_now, unix_now_nanos};
pub use digest::sha256_hex;
pub use error::{EnforcementError, ErrorDetails, Invariant};
pub use identity::{ArtifactId, DomainId, JurisdictionId, NodeId};
pub use jurisdiction::{ExecutionDomain, Jurisdiction, JurisdictionType};
pub use proof::BoundaryProof;
