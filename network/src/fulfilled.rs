//! Per-peer record of sync requests already answered.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use patriot_consensus::PeerId;

/// Peers whose vote sync request has been served during this process
/// lifetime.
#[derive(Default)]
pub struct FulfilledRequests {
    peers: Mutex<HashSet<PeerId>>,
}

impl FulfilledRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fulfilled(&self, peer: PeerId) -> bool {
        self.peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&peer)
    }

    /// Mark `peer` as served. Returns `false` if it already was.
    pub fn fulfill(&self, peer: PeerId) -> bool {
        self.peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(peer)
    }

    pub fn len(&self) -> usize {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
