//! # jib-consensus — Distributed Consent for Boundary Decisions
//!
//! No single node may approve a cross-jurisdiction movement alone. A
//! decision is proposed to the cluster, voted on, and committed only
//! under a Byzantine quorum: with `N = peers + 1` nodes the cluster
//! tolerates `f = ⌊(N-1)/3⌋` faults and requires `2f + 1` participants.
//!
//! Two semantics are kept deliberately separate:
//!
//! - **Quorum** counts *participation* — enough nodes answered.
//! - **Decision** AND-reduces the collected votes — one veto denies, and
//!   an empty vote set denies.
//!
//! The transport is a narrow trait ([`transport::PeerTransport`]);
//! production networking lives behind it and is out of scope here.
//! State dissemination (gossip), replicated registry maps (LWW CRDT),
//! and partition detection run independently of the vote path.

pub mod crdt;
pub mod enforcer;
pub mod gossip;
pub mod partition;
pub mod proposal;
pub mod transport;

pub use crdt::CrdtManager;
pub use enforcer::{DecisionRecord, DistributedEnforcer};
pub use gossip::{GossipMessage, GossipProtocol};
pub use partition::PartitionDetector;
pub use proposal::{ConsensusState, DecisionProposal};
pub use transport::{ConsensusMessage, LoopbackTransport, PeerTransport, ScriptedTransport};
