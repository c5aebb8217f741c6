//! The voting engine: validates incoming payment votes, records them, relays
//! them, and casts this node's own vote when it sits in the quorum.
//!
//! An incoming vote passes the checkpoints
//! `range -> version -> voter -> quorum -> replay -> signature` in that order.
//! The first failure short-circuits and nothing is recorded. Signature
//! verification runs outside the ledger lock, so the duplicate and replay
//! checks are repeated under the lock right before recording.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use patriot_types::{BlockHeight, CollateralRef, PaymentParams, Script, Transaction, VoteHash};
use tracing::{debug, info, warn};

use crate::error::VoteRejection;
use crate::ledger::{LedgerSnapshot, VoteLedger};
use crate::oracle::{BudgetOracle, RankOracle, VoterKey};
use crate::ports::{PeerId, PeerPorts, SyncStatus};
use crate::reward::RewardAllocator;
use crate::vote::{PaymentVote, VoteSigner};

/// Everything the engine consults but does not own.
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn RankOracle>,
    pub budget: Arc<dyn BudgetOracle>,
    pub peers: Arc<dyn PeerPorts>,
    pub sync: Arc<dyn SyncStatus>,
}

/// The patriotnode this process operates, if any.
pub struct ActiveNode {
    pub collateral: CollateralRef,
    pub signer: VoteSigner,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded(VoteHash),
    /// Already in the ledger. Not an error; nothing is re-validated or relayed.
    AlreadySeen(VoteHash),
}

/// Why this node did not vote for a height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    LegacyObsolete,
    NotPatriotnode,
    NotRegistered,
    NotInQuorum(u32),
    AlreadyProcessed,
    BudgetBlock,
    TooFarAhead,
    NoPayee,
    SigningFailed,
    Rejected(VoteRejection),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelfVote {
    Cast(VoteHash),
    Skipped(SkipReason),
}

pub struct VotingEngine {
    params: PaymentParams,
    ledger: Mutex<VoteLedger>,
    deps: Collaborators,
    active: Option<ActiveNode>,
    /// Highest height this node has cast its own vote for.
    last_block_height: AtomicU32,
}

impl VotingEngine {
    pub fn new(params: PaymentParams, deps: Collaborators) -> Self {
        Self {
            params,
            ledger: Mutex::new(VoteLedger::new()),
            deps,
            active: None,
            last_block_height: AtomicU32::new(0),
        }
    }

    pub fn with_active_node(mut self, active: ActiveNode) -> Self {
        self.active = Some(active);
        self
    }

    pub fn params(&self) -> &PaymentParams {
        &self.params
    }

    pub fn registry(&self) -> &dyn RankOracle {
        self.deps.registry.as_ref()
    }

    pub fn budget(&self) -> &dyn BudgetOracle {
        self.deps.budget.as_ref()
    }

    pub fn sync_status(&self) -> &dyn SyncStatus {
        self.deps.sync.as_ref()
    }

    pub fn active_collateral(&self) -> Option<CollateralRef> {
        self.active.as_ref().map(|a| a.collateral)
    }

    fn ledger(&self) -> MutexGuard<'_, VoteLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Incoming votes ───────────────────────────────────────────────────

    /// Validate and record a vote received from `from` (`None` for votes
    /// that did not arrive over the network).
    pub fn process_vote(
        &self,
        vote: PaymentVote,
        from: Option<PeerId>,
    ) -> Result<VoteOutcome, VoteRejection> {
        self.admit(vote, from, false)
    }

    fn admit(
        &self,
        vote: PaymentVote,
        from: Option<PeerId>,
        always_relay: bool,
    ) -> Result<VoteOutcome, VoteRejection> {
        let hash = vote.hash();
        if let Some(outcome) = self.already_seen(hash) {
            return Ok(outcome);
        }

        let key = self
            .validate(&vote, from)
            .map_err(|rejection| self.reject(rejection, &vote, from))?;

        if !vote.verify(&key) {
            return Err(self.reject(VoteRejection::BadSignature, &vote, from));
        }

        {
            let mut ledger = self.ledger();
            if ledger.contains(&hash) {
                ledger.mark_seen(hash, self.params.sync_seen_threshold);
                return Ok(VoteOutcome::AlreadySeen(hash));
            }
            if !ledger.can_vote(&vote.voter, vote.block_height) {
                drop(ledger);
                let rejection = VoteRejection::AlreadyVoted(vote.block_height);
                return Err(self.reject(rejection, &vote, from));
            }
            debug!(
                height = vote.block_height,
                payee = %vote.payee,
                voter = %vote.voter,
                "adding patriotnode payment vote"
            );
            ledger.record(vote);
            ledger.mark_seen(hash, self.params.sync_seen_threshold);
        }

        if always_relay || self.deps.sync.is_synced() {
            self.deps.peers.relay_vote(&hash);
        }
        Ok(VoteOutcome::Recorded(hash))
    }

    fn already_seen(&self, hash: VoteHash) -> Option<VoteOutcome> {
        let mut ledger = self.ledger();
        if !ledger.contains(&hash) {
            return None;
        }
        ledger.mark_seen(hash, self.params.sync_seen_threshold);
        debug!(%hash, "payment vote already seen");
        Some(VoteOutcome::AlreadySeen(hash))
    }

    /// Every checkpoint before the signature. Returns the key to verify with.
    fn validate(
        &self,
        vote: &PaymentVote,
        from: Option<PeerId>,
    ) -> Result<VoterKey, VoteRejection> {
        let registry = self.registry();
        let tip = registry.best_height();
        let enabled = registry.enabled_count();
        let first = self.params.first_acceptable_height(tip, enabled);
        let last = self.params.last_acceptable_height(tip);
        if vote.block_height < first || vote.block_height > last {
            return Err(VoteRejection::OutOfRange {
                height: vote.block_height,
                first,
                last,
            });
        }

        if vote.version < self.params.mandated_message_version {
            return Err(VoteRejection::StaleVersion(vote.version));
        }

        let Some(key) = registry.resolve(&vote.voter) else {
            // Backfill only after the initial sync.
            if let Some(peer) = from {
                if self.deps.sync.is_synced() {
                    self.deps.peers.request_voter_backfill(peer, &vote.voter);
                }
            }
            return Err(VoteRejection::UnknownVoter(vote.voter));
        };

        let quorum = self.params.quorum_size;
        let rank = registry.rank_at(&vote.voter, self.params.rank_height(vote.block_height));
        if !matches!(rank, Some(r) if (1..=quorum).contains(&r)) {
            return Err(VoteRejection::NotInQuorum { quorum, rank });
        }
        if !vote.payee.is_pay_to_pubkey_hash() {
            return Err(VoteRejection::PayeeNotP2pkh);
        }

        if !self.ledger().can_vote(&vote.voter, vote.block_height) {
            return Err(VoteRejection::AlreadyVoted(vote.block_height));
        }
        Ok(key)
    }

    fn reject(
        &self,
        rejection: VoteRejection,
        vote: &PaymentVote,
        from: Option<PeerId>,
    ) -> VoteRejection {
        debug!(
            height = vote.block_height,
            voter = %vote.voter,
            reason = rejection.reason(),
            "payment vote rejected: {rejection}"
        );
        if rejection.is_penalized() {
            if let Some(peer) = from {
                self.deps.peers.penalize(peer, self.params.misbehavior_score);
            }
        }
        rejection
    }

    // ── Self-voting ──────────────────────────────────────────────────────

    /// React to a new chain tip: once the node list is synced, vote for the
    /// height `self_vote_offset` blocks ahead.
    pub fn update_block_tip(&self, tip: BlockHeight) -> Option<SelfVote> {
        if !self.deps.sync.is_list_synced() {
            return None;
        }
        Some(self.process_block(tip.saturating_add(self.params.self_vote_offset)))
    }

    /// Cast this node's vote for `height` if it is eligible to.
    pub fn process_block(&self, height: BlockHeight) -> SelfVote {
        match self.try_cast(height) {
            Ok(hash) => {
                info!(height, %hash, "relayed own patriotnode payment vote");
                SelfVote::Cast(hash)
            }
            Err(reason) => {
                debug!(height, ?reason, "not voting");
                SelfVote::Skipped(reason)
            }
        }
    }

    fn try_cast(&self, height: BlockHeight) -> Result<VoteHash, SkipReason> {
        let registry = self.registry();
        let tip = registry.best_height();
        if self.params.is_legacy_obsolete(tip) {
            return Err(SkipReason::LegacyObsolete);
        }
        let active = self.active.as_ref().ok_or(SkipReason::NotPatriotnode)?;

        match registry.rank_at(&active.collateral, self.params.rank_height(height)) {
            None => {
                warn!("active patriotnode is not registered yet");
                return Err(SkipReason::NotRegistered);
            }
            Some(rank) if rank > self.params.quorum_size => {
                return Err(SkipReason::NotInQuorum(rank));
            }
            Some(_) => {}
        }

        if height <= self.last_block_height.load(Ordering::SeqCst) {
            return Err(SkipReason::AlreadyProcessed);
        }
        if self.budget().is_budget_payment_block(height) {
            return Err(SkipReason::BudgetBlock);
        }
        if self.params.rank_height(height) > tip.saturating_add(1) {
            return Err(SkipReason::TooFarAhead);
        }

        let node = registry
            .next_queued_for_payment(height)
            .ok_or(SkipReason::NoPayee)?;

        let mut vote = PaymentVote::new(
            active.collateral,
            height,
            node.payee,
            self.params.mandated_message_version,
        );
        if let Err(err) = vote.sign(&active.signer) {
            warn!(height, %err, "failed to sign patriotnode payment vote");
            return Err(SkipReason::SigningFailed);
        }

        let outcome = self
            .admit(vote, None, true)
            .map_err(SkipReason::Rejected)?;
        self.last_block_height.fetch_max(height, Ordering::SeqCst);
        match outcome {
            VoteOutcome::Recorded(hash) => Ok(hash),
            VoteOutcome::AlreadySeen(_) => Err(SkipReason::AlreadyProcessed),
        }
    }

    pub fn last_voted_height(&self) -> BlockHeight {
        self.last_block_height.load(Ordering::SeqCst)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn contains(&self, hash: &VoteHash) -> bool {
        self.ledger().contains(hash)
    }

    pub fn vote(&self, hash: &VoteHash) -> Option<PaymentVote> {
        self.ledger().get(hash).cloned()
    }

    pub fn seen_count(&self, hash: &VoteHash) -> u8 {
        self.ledger().seen_count(hash)
    }

    /// Most-voted payee for `height`.
    pub fn payee_for(&self, height: BlockHeight) -> Option<Script> {
        self.ledger().payee_for(height)
    }

    pub fn has_payee_with_votes(&self, height: BlockHeight, payee: &Script, votes: u32) -> bool {
        self.ledger()
            .tally(height)
            .is_some_and(|t| t.has_payee_with_votes(payee, votes))
    }

    /// Whether `payee` is voted to be paid within the next few blocks, other
    /// than at `not_height`.
    pub fn is_scheduled(&self, payee: &Script, not_height: Option<BlockHeight>) -> bool {
        let tip = self.registry().best_height();
        self.ledger()
            .is_scheduled(payee, tip, self.params.schedule_lookahead, not_height)
    }

    pub fn hashes_in_range(&self, first: BlockHeight, last: BlockHeight) -> Vec<VoteHash> {
        self.ledger().hashes_in_range(first, last)
    }

    /// Whether `tx` makes the payment due at `height`.
    pub fn is_transaction_valid(&self, tx: &Transaction, height: BlockHeight) -> bool {
        if self.params.is_legacy_obsolete(height) {
            let Some(expected) = self.reward_allocator().deterministic_outputs(height) else {
                // No patriotnode scheduled to be paid.
                return true;
            };
            return match expected.iter().find(|out| !tx.contains_output(out)) {
                Some(missing) => {
                    debug!(height, payee = %missing.script, "expected payee missing from block");
                    false
                }
                None => true,
            };
        }

        let required = self.params.patriotnode_payment(height);
        self.ledger().tally(height).map_or(true, |t| {
            t.is_transaction_valid(tx, required, self.params.required_votes)
        })
    }

    pub fn required_payments_string(&self, height: BlockHeight) -> String {
        self.ledger()
            .tally(height)
            .map_or_else(|| "Unknown".to_string(), |t| t.summarize())
    }

    pub fn reward_allocator(&self) -> RewardAllocator<'_> {
        RewardAllocator::new(self)
    }

    pub fn vote_count(&self) -> usize {
        self.ledger().vote_count()
    }

    pub fn block_count(&self) -> usize {
        self.ledger().block_count()
    }

    /// `"Votes: <n>, Blocks: <m>"`.
    pub fn summary(&self) -> String {
        self.ledger().summary()
    }

    // ── Maintenance ──────────────────────────────────────────────────────

    /// Purge votes older than the retention window behind `current_height`.
    pub fn clean(&self, enabled_count: u32, current_height: BlockHeight) -> usize {
        let limit = self.params.retention_window(enabled_count);
        let removed = self.ledger().clean(limit, current_height);
        if removed > 0 {
            debug!(removed, current_height, limit, "cleaned payment votes");
        }
        removed
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger().snapshot()
    }

    pub fn restore(&self, snapshot: LedgerSnapshot) {
        self.ledger().restore(snapshot);
    }

    pub fn clear(&self) {
        self.ledger().clear();
    }
}
