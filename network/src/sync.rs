//! Bulk exchange of payment votes with peers.
//!
//! A peer catching up sends `GetPaymentVotes { count }`. We announce by
//! inventory every retained vote from the last `count` blocks up to the
//! future window, then report how many we announced. The peer fetches the
//! votes it lacks through the host's inventory relay, and each one arrives
//! back here as a `PaymentVote` for the engine.

use std::sync::Arc;

use patriot_consensus::{PeerId, PeerPorts, VoteOutcome, VoteRejection, VotingEngine};
use patriot_messages::{InventoryItem, InventoryKind, PaymentMessage, SyncItem};
use patriot_types::{NetworkId, VoteHash};
use tracing::{debug, info, warn};

use crate::error::NetworkError;
use crate::fulfilled::FulfilledRequests;

/// What the transport knows about the sending peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeerInfo {
    pub id: PeerId,
    pub protocol_version: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    BlockchainNotSynced,
    LegacyObsolete,
    OutdatedPeer,
}

/// Result of handling one inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handled {
    Ignored(IgnoreReason),
    /// A request was answered; `replies` go back to the requesting peer.
    Served {
        replies: Vec<PaymentMessage>,
        announced: u32,
    },
    Vote(Result<VoteOutcome, VoteRejection>),
    /// Announced votes we do not have yet and should fetch.
    Wanted(Vec<VoteHash>),
    /// A peer reported how many items it announced to us.
    StatusCount { item: SyncItem, count: u32 },
}

pub struct PaymentSync {
    engine: Arc<VotingEngine>,
    peers: Arc<dyn PeerPorts>,
    network: NetworkId,
    fulfilled: FulfilledRequests,
}

impl PaymentSync {
    pub fn new(engine: Arc<VotingEngine>, peers: Arc<dyn PeerPorts>, network: NetworkId) -> Self {
        Self {
            engine,
            peers,
            network,
            fulfilled: FulfilledRequests::new(),
        }
    }

    /// Decode a frame and handle it.
    pub fn handle_bytes(&self, peer: &PeerInfo, bytes: &[u8]) -> Result<Handled, NetworkError> {
        let message = PaymentMessage::decode(bytes)?;
        self.handle(peer, message)
    }

    pub fn handle(&self, peer: &PeerInfo, message: PaymentMessage) -> Result<Handled, NetworkError> {
        if !self.engine.sync_status().is_blockchain_synced() {
            return Ok(Handled::Ignored(IgnoreReason::BlockchainNotSynced));
        }
        let tip = self.engine.registry().best_height();
        if self.engine.params().is_legacy_obsolete(tip) {
            debug!(command = message.command(), "skip obsolete message");
            return Ok(Handled::Ignored(IgnoreReason::LegacyObsolete));
        }

        match message {
            PaymentMessage::GetPaymentVotes { count } => self.serve_request(peer, count),
            PaymentMessage::PaymentVote(vote) => {
                if peer.protocol_version < self.engine.params().min_peer_protocol_version {
                    return Ok(Handled::Ignored(IgnoreReason::OutdatedPeer));
                }
                Ok(Handled::Vote(self.engine.process_vote(vote, Some(peer.id))))
            }
            PaymentMessage::Inventory(items) => {
                let wanted = items
                    .into_iter()
                    .filter(|item| item.kind == InventoryKind::PaymentVote)
                    .map(|item| item.hash)
                    .filter(|hash| !self.engine.contains(hash))
                    .collect();
                Ok(Handled::Wanted(wanted))
            }
            PaymentMessage::SyncStatusCount { item, count } => {
                debug!(peer = peer.id.0, count, "sync status count");
                Ok(Handled::StatusCount { item, count })
            }
        }
    }

    fn serve_request(&self, peer: &PeerInfo, count: u32) -> Result<Handled, NetworkError> {
        if self.network.is_main() && self.fulfilled.has_fulfilled(peer.id) {
            warn!(peer = peer.id.0, "peer already asked for the payment votes");
            self.peers
                .penalize(peer.id, self.engine.params().misbehavior_score);
            return Err(NetworkError::RepeatedRequest(peer.id));
        }
        self.fulfilled.fulfill(peer.id);

        let items = self.inventory_for(count);
        let announced = items.len() as u32;
        info!(peer = peer.id.0, announced, "sent patriotnode payment votes to peer");
        Ok(Handled::Served {
            replies: vec![
                PaymentMessage::Inventory(items),
                PaymentMessage::SyncStatusCount {
                    item: SyncItem::PaymentVotes,
                    count: announced,
                },
            ],
            announced,
        })
    }

    /// Inventory of retained votes from the last `count` blocks (clamped to
    /// the enabled-node backlog) through the future window.
    pub fn inventory_for(&self, count: u32) -> Vec<InventoryItem> {
        let params = self.engine.params();
        let registry = self.engine.registry();
        let tip = registry.best_height();
        let count = count.min(params.scaled_enabled(registry.enabled_count()));
        let first = tip.saturating_sub(count);
        let last = params.last_acceptable_height(tip);
        self.engine
            .hashes_in_range(first, last)
            .into_iter()
            .map(InventoryItem::payment_vote)
            .collect()
    }

    /// Full vote for an inventory hash, for the host's relay to deliver.
    pub fn vote_message(&self, hash: &VoteHash) -> Option<PaymentMessage> {
        self.engine.vote(hash).map(PaymentMessage::PaymentVote)
    }

    /// Our own catch-up request.
    pub fn request(&self) -> PaymentMessage {
        let enabled = self.engine.registry().enabled_count();
        PaymentMessage::GetPaymentVotes {
            count: self.engine.params().scaled_enabled(enabled),
        }
    }
}
