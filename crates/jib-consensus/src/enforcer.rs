//! # Distributed Enforcer
//!
//! Runs one boundary decision through propose → vote → quorum → commit.
//! Fail-closed at every step: missing participation aborts, a single
//! veto denies, and an empty vote set denies.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use jib_core::{unix_now, ArtifactId, DomainId, EnforcementError, NodeId};

use crate::proposal::{ConsensusState, DecisionProposal};
use crate::transport::{ConsensusMessage, PeerTransport};

/// One committed decision, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// The committed proposal.
    pub proposal_id: String,
    /// The artifact whose movement was decided.
    pub artifact_id: ArtifactId,
    /// Source execution domain.
    pub source_domain_id: DomainId,
    /// Target execution domain.
    pub target_domain_id: DomainId,
    /// The AND-reduced cluster decision.
    pub decision: bool,
    /// Unix seconds at commit time.
    pub timestamp: i64,
}

/// Byzantine fault-tolerant boundary decision engine for one node.
pub struct DistributedEnforcer {
    node_id: NodeId,
    peers: Vec<NodeId>,
    transport: Arc<dyn PeerTransport>,
    proposals: RwLock<HashMap<String, DecisionProposal>>,
    votes: RwLock<HashMap<String, BTreeMap<NodeId, bool>>>,
    decision_log: RwLock<Vec<DecisionRecord>>,
}

impl DistributedEnforcer {
    /// Create an enforcer for `node_id` with the given peer set and
    /// transport.
    pub fn new(node_id: NodeId, peers: Vec<NodeId>, transport: Arc<dyn PeerTransport>) -> Self {
        Self {
            node_id,
            peers,
            transport,
            proposals: RwLock::new(HashMap::new()),
            votes: RwLock::new(HashMap::new()),
            decision_log: RwLock::new(Vec::new()),
        }
    }

    /// This node's identifier.
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// The Byzantine quorum threshold `2f + 1` for the cluster size
    /// `N = peers + 1`, with `f = ⌊(N-1)/3⌋`.
    pub fn quorum_threshold(&self) -> usize {
        let total_nodes = self.peers.len() + 1;
        let f = (total_nodes - 1) / 3;
        2 * f + 1
    }

    /// Whether enough nodes *participated*. Quorum is about responses
    /// arriving, not about how they voted.
    pub fn has_quorum(&self, votes: &BTreeMap<NodeId, bool>) -> bool {
        votes.len() >= self.quorum_threshold()
    }

    /// AND-reduce the collected votes; an empty set denies.
    pub fn compute_decision(&self, votes: &BTreeMap<NodeId, bool>) -> bool {
        !votes.is_empty() && votes.values().all(|v| *v)
    }

    /// Propose a boundary decision to the cluster and drive it to a
    /// commit or abort.
    ///
    /// Returns the committed decision, or `Ok(false)` when the round
    /// aborted for lack of quorum. Errors are reserved for transport
    /// failures surfaced by future transports; the in-tree transports
    /// never fail.
    pub fn propose_decision(
        &self,
        artifact_id: &ArtifactId,
        source_domain_id: &DomainId,
        target_domain_id: &DomainId,
    ) -> Result<bool, EnforcementError> {
        let proposal = DecisionProposal::new(
            self.node_id.clone(),
            artifact_id.clone(),
            source_domain_id.clone(),
            target_domain_id.clone(),
        );
        let proposal_id = proposal.proposal_id.clone();

        self.proposals
            .write()
            .insert(proposal_id.clone(), proposal.clone());
        self.transport.broadcast(&ConsensusMessage::Proposal(proposal));

        let mut votes = self.transport.collect_votes(&proposal_id, &self.peers);
        // The proposer counts itself.
        votes.insert(self.node_id.clone(), true);
        self.set_state(&proposal_id, ConsensusState::Prepared);
        self.votes.write().insert(proposal_id.clone(), votes.clone());

        if !self.has_quorum(&votes) {
            tracing::warn!(
                proposal_id = %proposal_id,
                participants = votes.len(),
                threshold = self.quorum_threshold(),
                "quorum failed; aborting proposal"
            );
            self.transport.broadcast(&ConsensusMessage::Abort {
                proposal_id: proposal_id.clone(),
            });
            self.set_state(&proposal_id, ConsensusState::Aborted);
            return Ok(false);
        }

        let decision = self.compute_decision(&votes);
        self.transport.broadcast(&ConsensusMessage::Commit {
            proposal_id: proposal_id.clone(),
            decision,
        });
        self.set_state(&proposal_id, ConsensusState::Committed);

        tracing::debug!(proposal_id = %proposal_id, decision, "proposal committed");
        self.decision_log.write().push(DecisionRecord {
            proposal_id,
            artifact_id: artifact_id.clone(),
            source_domain_id: source_domain_id.clone(),
            target_domain_id: target_domain_id.clone(),
            decision,
            timestamp: unix_now(),
        });

        Ok(decision)
    }

    fn set_state(&self, proposal_id: &str, state: ConsensusState) {
        if let Some(proposal) = self.proposals.write().get_mut(proposal_id) {
            proposal.state = state;
        }
    }

    /// A snapshot of the decision log.
    pub fn decision_log(&self) -> Vec<DecisionRecord> {
        self.decision_log.read().clone()
    }

    /// A snapshot of a proposal by id.
    pub fn proposal(&self, proposal_id: &str) -> Option<DecisionProposal> {
        self.proposals.read().get(proposal_id).cloned()
    }

    /// The collected votes for a proposal, if the round ran.
    pub fn votes_for(&self, proposal_id: &str) -> Option<BTreeMap<NodeId, bool>> {
        self.votes.read().get(proposal_id).cloned()
    }
}

impl std::fmt::Debug for DistributedEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributedEnforcer")
            .field("node_id", &self.node_id)
            .field("peers", &self.peers.len())
            .field("decisions", &self.decision_log.read().len())
            .finish()
    }
}
