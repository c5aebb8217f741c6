//! Collaborators the payment core consumes but does not implement.
//!
//! Node ranking, the payment queue, registration lookups, governance budgets
//! and spork switches all belong to other subsystems. The engine sees them
//! only through these traits.

use patriot_types::{
    Amount, BlockHash, BlockHeight, CollateralRef, KeyId, OperatorPublicKey, Script, Transaction,
};

/// The key a voter's signatures must verify against, resolved once from the
/// registries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoterKey {
    /// Legacy self-announced node, identified by the hash of its public key.
    Legacy(KeyId),
    /// Deterministically registered node, signing with its operator key.
    Registered(OperatorPublicKey),
}

/// A node chosen by the payment queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRef {
    pub collateral: CollateralRef,
    pub payee: Script,
}

/// Payout data of the deterministically registered node due at a height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredPayee {
    pub payout: Script,
    pub operator_payout: Script,
    /// Operator share of the reward in basis points.
    pub operator_reward_bps: u16,
}

/// Ranking and registration oracle.
pub trait RankOracle: Send + Sync {
    /// Height of the current chain tip.
    fn best_height(&self) -> BlockHeight;

    /// Number of currently enabled nodes.
    fn enabled_count(&self) -> u32;

    /// 1-based rank of `voter` at `height`, `None` if it is not registered.
    fn rank_at(&self, voter: &CollateralRef, height: BlockHeight) -> Option<u32>;

    /// Operator key of `voter` in the deterministic registry.
    fn resolve_deterministic(&self, voter: &CollateralRef) -> Option<OperatorPublicKey>;

    /// Key id of `voter` in the legacy node list.
    fn resolve_legacy(&self, voter: &CollateralRef) -> Option<KeyId>;

    /// Oldest unpaid eligible node, the one a self-vote for `height` names.
    fn next_queued_for_payment(&self, height: BlockHeight) -> Option<NodeRef>;

    /// Payee picked by the registry's own selection when no vote reached
    /// quorum for `height`.
    fn current_best_payee(&self, height: BlockHeight) -> Option<Script>;

    /// Payee for `height` under deterministic registration.
    fn deterministic_payee(&self, height: BlockHeight) -> Option<RegisteredPayee>;

    /// Resolve the voter's signing key. The deterministic registry takes
    /// precedence; the legacy list is consulted only when it has no entry.
    fn resolve(&self, voter: &CollateralRef) -> Option<VoterKey> {
        match self.resolve_deterministic(voter) {
            Some(key) => Some(VoterKey::Registered(key)),
            None => self.resolve_legacy(voter).map(VoterKey::Legacy),
        }
    }
}

/// Outcome of checking a transaction against a finalized budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetStatus {
    Valid,
    Invalid,
    DoublePayment,
    VoteThreshold,
}

/// Governance budget oracle, consulted for superblock heights.
pub trait BudgetOracle: Send + Sync {
    fn is_budget_payment_block(&self, height: BlockHeight) -> bool;

    fn transaction_status(
        &self,
        tx: &Transaction,
        block_hash: &BlockHash,
        height: BlockHeight,
    ) -> BudgetStatus;

    /// Fill the superblock payment. `false` if `height` pays no budget.
    fn fill_block_payee(
        &self,
        coinbase: &mut Transaction,
        coinstake: &mut Transaction,
        height: BlockHeight,
        is_proof_of_stake: bool,
    ) -> bool;

    fn expected_payee_amount(&self, height: BlockHeight) -> Option<Amount>;

    fn total_budget(&self, height: BlockHeight) -> Amount;

    fn required_payments_string(&self, height: BlockHeight) -> String;
}

/// Network-wide feature switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Spork {
    /// Reject blocks that miss the patriotnode payment.
    PaymentEnforcement,
    /// Reject blocks with an invalid budget payment.
    BudgetEnforcement,
    /// Pay governance superblocks.
    Superblocks,
}

pub trait SporkView: Send + Sync {
    fn is_active(&self, spork: Spork) -> bool;
}
