//! # Decision Proposals
//!
//! A proposal carries one boundary decision through the consensus state
//! machine: `Proposed → Prepared → {Committed | Aborted}`.

use serde::{Deserialize, Serialize};

use jib_core::{sha256_hex, unix_now, unix_now_nanos, ArtifactId, DomainId, NodeId};

/// Where a proposal stands in the consensus protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusState {
    /// Broadcast to peers, votes not yet collected.
    Proposed,
    /// Votes collected, quorum test pending.
    Prepared,
    /// Quorum reached and decision committed.
    Committed,
    /// Quorum failed; the proposal is dead.
    Aborted,
}

/// A proposal for one distributed boundary decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionProposal {
    /// `sha256_hex(node_id ":" artifact ":" src ":" tgt ":" now_nanos)`.
    pub proposal_id: String,
    /// The artifact whose movement is being decided.
    pub artifact_id: ArtifactId,
    /// Source execution domain.
    pub source_domain_id: DomainId,
    /// Target execution domain.
    pub target_domain_id: DomainId,
    /// The proposer's initial stance; the committed decision comes from
    /// the vote set, not from this field.
    pub proposed_decision: bool,
    /// The node that created the proposal.
    pub proposer_node_id: NodeId,
    /// Unix seconds at proposal time.
    pub timestamp: i64,
    /// Protocol state.
    pub state: ConsensusState,
}

impl DecisionProposal {
    /// Create a fresh proposal in the `Proposed` state.
    pub fn new(
        proposer_node_id: NodeId,
        artifact_id: ArtifactId,
        source_domain_id: DomainId,
        target_domain_id: DomainId,
    ) -> Self {
        let proposal_id = sha256_hex(
            format!(
                "{proposer_node_id}:{artifact_id}:{source_domain_id}:{target_domain_id}:{}",
                unix_now_nanos()
            )
            .as_bytes(),
        );
        Self {
            proposal_id,
            artifact_id,
            source_domain_id,
            target_domain_id,
            proposed_decision: false,
            proposer_node_id,
            timestamp: unix_now(),
            state: ConsensusState::Proposed,
        }
    }
}
