//! # Peer Transport
//!
//! The consensus engine talks to the cluster through a deliberately
//! narrow interface: broadcast a message, collect votes for a proposal.
//! Message delivery is best-effort and fire-and-forget; a vote that
//! never arrives is simply absent from the collected map and counts
//! against participation, never as an implicit `true`.
//!
//! The production network transport is out of scope. Two in-tree
//! implementations cover local operation and tests:
//!
//! - [`LoopbackTransport`] — affirms on behalf of every configured peer
//!   (single-process deployments).
//! - [`ScriptedTransport`] — returns a configured vote map and records
//!   every broadcast (test support for veto and quorum-failure paths).

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use jib_core::NodeId;

use crate::proposal::DecisionProposal;

/// Messages exchanged with peers during a decision round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsensusMessage {
    /// A new proposal entering its vote round.
    Proposal(DecisionProposal),
    /// The round committed with the given decision.
    Commit {
        /// The committed proposal.
        proposal_id: String,
        /// The AND-reduced cluster decision.
        decision: bool,
    },
    /// The round failed its quorum test.
    Abort {
        /// The abandoned proposal.
        proposal_id: String,
    },
}

/// The narrow peer interface the consensus engine depends on.
pub trait PeerTransport: Send + Sync {
    /// Fire-and-forget broadcast to every peer.
    fn broadcast(&self, message: &ConsensusMessage);

    /// Collect votes for a proposal from the given peers.
    ///
    /// Bounded: implementations return when enough responses arrived for
    /// a quorum test or the underlying transport reports completion.
    /// Peers that did not answer are absent from the map.
    fn collect_votes(&self, proposal_id: &str, peers: &[NodeId]) -> BTreeMap<NodeId, bool>;
}

/// A transport for single-process deployments: every configured peer
/// affirms every proposal.
#[derive(Debug, Default)]
pub struct LoopbackTransport;

impl PeerTransport for LoopbackTransport {
    fn broadcast(&self, _message: &ConsensusMessage) {}

    fn collect_votes(&self, _proposal_id: &str, peers: &[NodeId]) -> BTreeMap<NodeId, bool> {
        peers.iter().map(|peer| (peer.clone(), true)).collect()
    }
}

/// A transport with pre-scripted votes, for exercising veto and
/// quorum-failure paths.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    votes: RwLock<BTreeMap<NodeId, bool>>,
    broadcasts: RwLock<Vec<ConsensusMessage>>,
}

impl ScriptedTransport {
    /// A transport that answers every vote collection with `votes`.
    pub fn new(votes: BTreeMap<NodeId, bool>) -> Self {
        Self {
            votes: RwLock::new(votes),
            broadcasts: RwLock::new(Vec::new()),
        }
    }

    /// Replace the scripted vote map.
    pub fn set_votes(&self, votes: BTreeMap<NodeId, bool>) {
        *self.votes.write() = votes;
    }

    /// Every message broadcast so far, in order.
    pub fn broadcasts(&self) -> Vec<ConsensusMessage> {
        self.broadcasts.read().clone()
    }
}

impl PeerTransport for ScriptedTransport {
    fn broadcast(&self, message: &ConsensusMessage) {
        self.broadcasts.write().push(message.clone());
    }

    fn collect_votes(&self, _proposal_id: &str, _peers: &[NodeId]) -> BTreeMap<NodeId, bool> {
        self.votes.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nid(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test]
    fn loopback_affirms_all_peers() {
        let transport = LoopbackTransport;
        let peers = vec![nid("node-2"), nid("node-3")];
        let votes = transport.collect_votes("p-1", &peers);
        assert_eq!(votes.len(), 2);
        assert!(votes.values().all(|v| *v));
    }

    #[test]
    fn scripted_returns_configured_votes_and_records_broadcasts() {
        let mut votes = BTreeMap::new();
        votes.insert(nid("node-2"), true);
        votes.insert(nid("node-3"), false);
        let transport = ScriptedTransport::new(votes);

        let collected = transport.collect_votes("p-1", &[]);
        assert_eq!(collected.get(&nid("node-3")), Some(&false));

        transport.broadcast(&ConsensusMessage::Abort {
            proposal_id: "p-1".to_string(),
        });
        assert_eq!(transport.broadcasts().len(), 1);
    }

    #[test]
    fn message_serde_round_trip() {
        let msg = ConsensusMessage::Commit {
            proposal_id: "p-1".to_string(),
            decision: false,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ConsensusMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }
}
