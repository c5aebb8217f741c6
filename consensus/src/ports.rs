//! Capabilities the engine calls back into the host for.

use patriot_types::{CollateralRef, VoteHash};

/// Opaque peer handle assigned by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(pub u64);

/// Peer-facing side effects of vote processing.
pub trait PeerPorts: Send + Sync {
    /// Announce a vote to all peers by inventory.
    fn relay_vote(&self, hash: &VoteHash);

    /// Charge a reputation penalty to a peer.
    fn penalize(&self, peer: PeerId, score: u32);

    /// Ask a peer for the announcement of a node we do not know yet.
    fn request_voter_backfill(&self, peer: PeerId, voter: &CollateralRef);
}

/// Synchronisation state of the host node.
pub trait SyncStatus: Send + Sync {
    /// Fully synced with the network, node list and votes included.
    fn is_synced(&self) -> bool;

    /// The block chain itself is synced.
    fn is_blockchain_synced(&self) -> bool;

    /// The node list is synced (payment votes may still be in flight).
    fn is_list_synced(&self) -> bool;
}
