//! Nullable peers: record relays, penalties and backfill requests.

use std::sync::Mutex;

use patriot_consensus::{PeerId, PeerPorts};
use patriot_types::{CollateralRef, VoteHash};

#[derive(Default)]
pub struct NullPeers {
    relayed: Mutex<Vec<VoteHash>>,
    penalties: Mutex<Vec<(PeerId, u32)>>,
    backfills: Mutex<Vec<(PeerId, CollateralRef)>>,
}

impl NullPeers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relayed(&self) -> Vec<VoteHash> {
        self.relayed.lock().unwrap().clone()
    }

    pub fn penalties(&self) -> Vec<(PeerId, u32)> {
        self.penalties.lock().unwrap().clone()
    }

    pub fn backfills(&self) -> Vec<(PeerId, CollateralRef)> {
        self.backfills.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.relayed.lock().unwrap().clear();
        self.penalties.lock().unwrap().clear();
        self.backfills.lock().unwrap().clear();
    }
}

impl PeerPorts for NullPeers {
    fn relay_vote(&self, hash: &VoteHash) {
        self.relayed.lock().unwrap().push(*hash);
    }

    fn penalize(&self, peer: PeerId, score: u32) {
        self.penalties.lock().unwrap().push((peer, score));
    }

    fn request_voter_backfill(&self, peer: PeerId, voter: &CollateralRef) {
        self.backfills.lock().unwrap().push((peer, *voter));
    }
}
