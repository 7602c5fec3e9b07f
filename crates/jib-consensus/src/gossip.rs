//! # Gossip Dissemination
//!
//! Last-writer-wins state dissemination between nodes. Incoming messages
//! queue on receive; `sync_state` drains the queue and merges each
//! message's state map into the local state. Convergence comes from the
//! CRDT layer; gossip just moves the bytes.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jib_core::{unix_now, NodeId};

/// One gossiped state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GossipMessage {
    /// Unique message id.
    pub message_id: Uuid,
    /// The node the snapshot came from.
    pub origin: NodeId,
    /// The state payload.
    pub state: BTreeMap<String, serde_json::Value>,
    /// Unix seconds at snapshot time.
    pub timestamp: i64,
}

/// Per-node gossip endpoint: local state plus an inbound queue.
#[derive(Debug)]
pub struct GossipProtocol {
    node_id: NodeId,
    peers: Vec<NodeId>,
    state: RwLock<BTreeMap<String, serde_json::Value>>,
    queue: RwLock<Vec<GossipMessage>>,
}

impl GossipProtocol {
    /// Create a gossip endpoint for `node_id`.
    pub fn new(node_id: NodeId, peers: Vec<NodeId>) -> Self {
        Self {
            node_id,
            peers,
            state: RwLock::new(BTreeMap::new()),
            queue: RwLock::new(Vec::new()),
        }
    }

    /// The peers this endpoint gossips to.
    pub fn peers(&self) -> &[NodeId] {
        &self.peers
    }

    /// Set a key in the local state.
    pub fn update_local(&self, key: impl Into<String>, value: serde_json::Value) {
        self.state.write().insert(key.into(), value);
    }

    /// Snapshot the local state as an outbound message.
    pub fn gossip_state(&self) -> GossipMessage {
        GossipMessage {
            message_id: Uuid::new_v4(),
            origin: self.node_id.clone(),
            state: self.state.read().clone(),
            timestamp: unix_now(),
        }
    }

    /// Queue an incoming message for the next sync.
    pub fn receive_gossip(&self, message: GossipMessage) {
        self.queue.write().push(message);
    }

    /// Drain the queue, merging each message's state into local state.
    ///
    /// Returns how many messages were applied.
    pub fn sync_state(&self) -> usize {
        let drained: Vec<GossipMessage> = std::mem::take(&mut *self.queue.write());
        let applied = drained.len();

        let mut state = self.state.write();
        for message in drained {
            for (key, value) in message.state {
                state.insert(key, value);
            }
        }
        applied
    }

    /// Snapshot of the local state.
    pub fn state(&self) -> BTreeMap<String, serde_json::Value> {
        self.state.read().clone()
    }

    /// Number of queued, not-yet-synced messages.
    pub fn pending(&self) -> usize {
        self.queue.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nid(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    fn endpoint(name: &str) -> GossipProtocol {
        GossipProtocol::new(nid(name), vec![nid("node-2"), nid("node-3")])
    }

    #[test]
    fn snapshot_carries_local_state() {
        let gossip = endpoint("node-1");
        gossip.update_local("boundary:us-ca:us-tx", json!({"allowed": true}));

        let message = gossip.gossip_state();
        assert_eq!(message.origin, nid("node-1"));
        assert_eq!(message.state.len(), 1);
        assert!(message.timestamp > 0);
    }

    #[test]
    fn receive_queues_until_sync() {
        let a = endpoint("node-1");
        let b = endpoint("node-2");
        a.update_local("k", json!(1));

        b.receive_gossip(a.gossip_state());
        assert_eq!(b.pending(), 1);
        assert!(b.state().is_empty());

        assert_eq!(b.sync_state(), 1);
        assert_eq!(b.pending(), 0);
        assert_eq!(b.state().get("k"), Some(&json!(1)));
    }

    #[test]
    fn later_messages_overwrite_earlier_keys() {
        let receiver = endpoint("node-1");
        let a = endpoint("node-2");
        let b = endpoint("node-3");
        a.update_local("k", json!("old"));
        b.update_local("k", json!("new"));

        receiver.receive_gossip(a.gossip_state());
        receiver.receive_gossip(b.gossip_state());
        receiver.sync_state();
        assert_eq!(receiver.state().get("k"), Some(&json!("new")));
    }

    #[test]
    fn sync_on_empty_queue_is_noop() {
        let gossip = endpoint("node-1");
        assert_eq!(gossip.sync_state(), 0);
    }
}
