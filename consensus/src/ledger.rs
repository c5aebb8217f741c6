//! The vote ledger: every recorded vote, the per-height tallies, the
//! anti-replay cursor and the sync "seen" counters.
//!
//! The maps change together on insert and on cleanup, so they live in one
//! struct behind one lock (see [`crate::engine::VotingEngine`]). Nothing
//! outside this module touches them directly.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use patriot_types::{BlockHeight, CollateralRef, Script, VoteHash};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tally::BlockPayees;
use crate::vote::PaymentVote;

/// Persisted part of the ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub votes: BTreeMap<VoteHash, PaymentVote>,
    pub blocks: BTreeMap<BlockHeight, BlockPayees>,
}

#[derive(Debug, Default)]
pub struct VoteLedger {
    votes: BTreeMap<VoteHash, PaymentVote>,
    blocks: BTreeMap<BlockHeight, BlockPayees>,
    /// Heights each voter has a recorded vote for.
    voted: HashMap<CollateralRef, BTreeSet<BlockHeight>>,
    seen: HashMap<VoteHash, u8>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, hash: &VoteHash) -> bool {
        self.votes.contains_key(hash)
    }

    pub fn get(&self, hash: &VoteHash) -> Option<&PaymentVote> {
        self.votes.get(hash)
    }

    /// Whether `voter` may still vote for `height`.
    pub fn can_vote(&self, voter: &CollateralRef, height: BlockHeight) -> bool {
        self.voted
            .get(voter)
            .map_or(true, |heights| !heights.contains(&height))
    }

    /// Record a validated vote into every map at once.
    pub fn record(&mut self, vote: PaymentVote) -> VoteHash {
        let hash = vote.hash();
        self.voted
            .entry(vote.voter)
            .or_default()
            .insert(vote.block_height);
        self.blocks
            .entry(vote.block_height)
            .or_insert_with(|| BlockPayees::new(vote.block_height))
            .add_vote(&vote.payee);
        self.votes.insert(hash, vote);
        hash
    }

    /// Count one more sighting of `hash` for sync progress, capped at
    /// `threshold`.
    pub fn mark_seen(&mut self, hash: VoteHash, threshold: u8) {
        let count = self.seen.entry(hash).or_insert(0);
        if *count < threshold {
            *count += 1;
        }
    }

    pub fn seen_count(&self, hash: &VoteHash) -> u8 {
        self.seen.get(hash).copied().unwrap_or(0)
    }

    /// Drop everything more than `limit` blocks below `current_height`.
    /// Returns the number of votes removed.
    pub fn clean(&mut self, limit: BlockHeight, current_height: BlockHeight) -> usize {
        let expired = |height: BlockHeight| current_height.saturating_sub(height) > limit;

        let stale: Vec<VoteHash> = self
            .votes
            .iter()
            .filter(|(_, vote)| expired(vote.block_height))
            .map(|(hash, _)| *hash)
            .collect();
        for hash in &stale {
            if let Some(vote) = self.votes.remove(hash) {
                debug!(height = vote.block_height, "removing old patriotnode payment vote");
            }
            self.seen.remove(hash);
        }

        self.blocks.retain(|height, _| !expired(*height));
        self.voted.retain(|_, heights| {
            heights.retain(|height| !expired(*height));
            !heights.is_empty()
        });
        stale.len()
    }

    pub fn tally(&self, height: BlockHeight) -> Option<&BlockPayees> {
        self.blocks.get(&height)
    }

    pub fn payee_for(&self, height: BlockHeight) -> Option<Script> {
        self.blocks.get(&height).and_then(|b| b.payee()).cloned()
    }

    /// Whether `payee` is the voted payee of any height in
    /// `[tip, tip + lookahead]` other than `not_height`.
    pub fn is_scheduled(
        &self,
        payee: &Script,
        tip: BlockHeight,
        lookahead: BlockHeight,
        not_height: Option<BlockHeight>,
    ) -> bool {
        self.blocks
            .range(tip..=tip.saturating_add(lookahead))
            .filter(|(height, _)| Some(**height) != not_height)
            .any(|(_, block)| block.payee() == Some(payee))
    }

    /// Hashes of votes whose height lies in `[first, last]`.
    pub fn hashes_in_range(&self, first: BlockHeight, last: BlockHeight) -> Vec<VoteHash> {
        self.votes
            .iter()
            .filter(|(_, vote)| (first..=last).contains(&vote.block_height))
            .map(|(hash, _)| *hash)
            .collect()
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn summary(&self) -> String {
        format!("Votes: {}, Blocks: {}", self.votes.len(), self.blocks.len())
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            votes: self.votes.clone(),
            blocks: self.blocks.clone(),
        }
    }

    /// Replace the ledger with a snapshot. The anti-replay cursor is rebuilt
    /// from the restored votes; seen counters start empty.
    pub fn restore(&mut self, snapshot: LedgerSnapshot) {
        self.clear();
        for vote in snapshot.votes.values() {
            self.voted
                .entry(vote.voter)
                .or_default()
                .insert(vote.block_height);
        }
        self.votes = snapshot.votes;
        self.blocks = snapshot.blocks;
    }

    pub fn clear(&mut self) {
        self.votes.clear();
        self.blocks.clear();
        self.voted.clear();
        self.seen.clear();
    }
}
