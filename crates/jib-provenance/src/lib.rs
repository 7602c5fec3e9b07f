//! # jib-provenance — Operation Lineage for Artifacts
//!
//! Every operation on an artifact — a read, a transform, a boundary
//! check — becomes a node in an append-only DAG. Walking a node's
//! ancestry answers the audit questions: where has this artifact been,
//! which jurisdictions did it traverse, and did tainted input reach it.
//!
//! The [`flow::DataFlowTracker`] wraps the DAG with a flat record list
//! for the common cross-boundary queries the enforcement pipeline and
//! compliance audits need.

pub mod flow;
pub mod graph;

pub use flow::{DataFlowTracker, FlowRecord, FlowSummary};
pub use graph::{BoundaryCrossing, Operation, ProvenanceGraph, ProvenanceNode};
