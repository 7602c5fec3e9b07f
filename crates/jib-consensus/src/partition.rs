//! # Partition Detection
//!
//! A peer is considered partitioned when its last heartbeat is older
//! than the timeout — or was never observed at all. Detection runs
//! independently of the vote path; a partitioned peer simply stops
//! contributing participation.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use jib_core::NodeId;

/// Default heartbeat timeout in seconds.
pub const DEFAULT_HEARTBEAT_TIMEOUT: i64 = 30;

/// Tracks peer liveness from heartbeats.
#[derive(Debug)]
pub struct PartitionDetector {
    timeout: i64,
    last_heartbeat: RwLock<HashMap<NodeId, i64>>,
    partitioned: RwLock<HashSet<NodeId>>,
}

impl PartitionDetector {
    /// Create a detector with the given timeout in seconds;
    /// non-positive values fall back to [`DEFAULT_HEARTBEAT_TIMEOUT`].
    pub fn new(timeout: i64) -> Self {
        Self {
            timeout: if timeout > 0 {
                timeout
            } else {
                DEFAULT_HEARTBEAT_TIMEOUT
            },
            last_heartbeat: RwLock::new(HashMap::new()),
            partitioned: RwLock::new(HashSet::new()),
        }
    }

    /// The configured timeout in seconds.
    pub fn timeout(&self) -> i64 {
        self.timeout
    }

    /// Record a heartbeat from `node_id` at `now`, clearing any
    /// partition mark.
    pub fn record_heartbeat(&self, node_id: &NodeId, now: i64) {
        self.last_heartbeat.write().insert(node_id.clone(), now);
        self.partitioned.write().remove(node_id);
    }

    /// Whether `node_id` appears partitioned at `now`. A never-seen node
    /// is partitioned.
    pub fn is_partitioned(&self, node_id: &NodeId, now: i64) -> bool {
        match self.last_heartbeat.read().get(node_id) {
            Some(last_seen) => now - last_seen > self.timeout,
            None => true,
        }
    }

    /// Scan all known nodes, mark the stale ones, and return them.
    pub fn detect_partitions(&self, now: i64) -> Vec<NodeId> {
        let heartbeats = self.last_heartbeat.read();
        let mut partitioned = self.partitioned.write();

        let mut stale = Vec::new();
        for (node_id, last_seen) in heartbeats.iter() {
            if now - last_seen > self.timeout {
                stale.push(node_id.clone());
                partitioned.insert(node_id.clone());
            }
        }
        stale.sort();
        stale
    }

    /// Clear a node's partition mark and treat `now` as a fresh
    /// heartbeat.
    pub fn heal_partition(&self, node_id: &NodeId, now: i64) {
        self.partitioned.write().remove(node_id);
        self.last_heartbeat.write().insert(node_id.clone(), now);
    }
}

impl Default for PartitionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_TIMEOUT)
    }
}
