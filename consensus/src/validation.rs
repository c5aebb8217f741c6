//! Block-level payment hooks for the outer consensus engine.
//!
//! These decide between a governance superblock payment and a patriotnode
//! payment, and police coinbase and block values. None of them is fatal: a
//! failing block is rejected with a reason code.

use std::sync::Arc;

use patriot_types::{Amount, Block, BlockHeight, NetworkId, Transaction};
use tracing::debug;

use crate::engine::VotingEngine;
use crate::error::{ConsensusError, Violation};
use crate::oracle::{BudgetStatus, Spork, SporkView};

/// Result of a block value check. `expected` and `budget_amount` include the
/// budget allowance that was added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockValueCheck {
    pub valid: bool,
    pub expected: Amount,
    pub budget_amount: Amount,
}

pub struct BlockValidator {
    engine: Arc<VotingEngine>,
    sporks: Arc<dyn SporkView>,
    network: NetworkId,
}

impl BlockValidator {
    pub fn new(engine: Arc<VotingEngine>, sporks: Arc<dyn SporkView>, network: NetworkId) -> Self {
        Self {
            engine,
            sporks,
            network,
        }
    }

    pub fn engine(&self) -> &VotingEngine {
        &self.engine
    }

    fn superblocks_enabled(&self) -> bool {
        self.sporks.is_active(Spork::Superblocks)
    }

    /// Whether `block`, built on `prev_height`, pays the right recipient.
    pub fn is_block_payee_valid(&self, block: &Block, prev_height: BlockHeight) -> bool {
        let height = prev_height.saturating_add(1);
        if !self.engine.sync_status().is_synced() {
            debug!(height, "not synced, skipping block payee checks");
            return true;
        }

        let params = self.engine.params();
        let tx = if params.pays_coinstake(height) {
            block.coinstake()
        } else {
            block.coinbase()
        };
        let Some(tx) = tx else {
            debug!(height, "block has no reward transaction to check");
            return false;
        };

        let budget = self.engine.budget();
        if self.superblocks_enabled() && budget.is_budget_payment_block(height) {
            match budget.transaction_status(tx, &block.hash, height) {
                BudgetStatus::Valid => return true,
                BudgetStatus::Invalid => {
                    debug!(height, "invalid budget payment detected");
                    if self.sporks.is_active(Spork::BudgetEnforcement) {
                        return false;
                    }
                    debug!(height, "budget enforcement is disabled, accepting block");
                }
                // Double payment or too few votes: the patriotnode is paid.
                BudgetStatus::DoublePayment | BudgetStatus::VoteThreshold => {}
            }
        }

        if self.engine.is_transaction_valid(tx, height) {
            return true;
        }
        debug!(height, "invalid patriotnode payment detected");
        if self.sporks.is_active(Spork::PaymentEnforcement) {
            return false;
        }
        debug!(height, "payment enforcement is disabled, accepting block");
        true
    }

    /// [`Self::is_block_payee_valid`] as a rejectable result.
    pub fn check_block_payee(
        &self,
        block: &Block,
        prev_height: BlockHeight,
    ) -> Result<(), Violation> {
        if self.is_block_payee_valid(block, prev_height) {
            return Ok(());
        }
        Err(Violation::new(
            "bad-cb-payee",
            0,
            format!(
                "couldn't find patriotnode or budget payment at height {}",
                prev_height.saturating_add(1)
            ),
        ))
    }

    /// Check a coinbase's total value for the block at `height`.
    /// `budget_amount` is non-zero on superblocks.
    pub fn is_coinbase_value_valid(
        &self,
        tx: &Transaction,
        height: BlockHeight,
        budget_amount: Amount,
    ) -> Result<(), Violation> {
        if !self.engine.sync_status().is_synced() {
            return Ok(());
        }
        let paid = tx.value_out();

        if budget_amount.is_positive() {
            if paid != budget_amount {
                return Err(Violation::new(
                    "bad-superblock-cb-amt",
                    100,
                    format!("invalid coinbase payment for budget ({paid} vs expected={budget_amount})"),
                ));
            }
            return Ok(());
        }

        let required = self.engine.params().patriotnode_payment(height);
        let message =
            || format!("invalid coinbase payment for patriotnode ({paid} vs expected={required})");
        if self.sporks.is_active(Spork::PaymentEnforcement) {
            if paid != required {
                return Err(Violation::new("bad-cb-amt", 100, message()));
            }
        } else if paid > required {
            return Err(Violation::new("bad-cb-amt-spork8-disabled", 100, message()));
        }
        Ok(())
    }

    /// Whether `minted` fits the block value at `height`, budget allowance
    /// included.
    pub fn is_block_value_valid(
        &self,
        height: BlockHeight,
        expected: Amount,
        minted: Amount,
    ) -> BlockValueCheck {
        let params = self.engine.params();
        let budget = self.engine.budget();
        let mut check = BlockValueCheck {
            valid: false,
            expected,
            budget_amount: Amount::ZERO,
        };

        if !self.engine.sync_status().is_synced() {
            // No budget data yet. Superblocks can only be in the first
            // blocks of a cycle.
            if params.is_budget_window(height) {
                if self.network.is_testnet() {
                    check.valid = true;
                    return check;
                }
                check.expected += budget.total_budget(height);
            }
        } else if self.superblocks_enabled() {
            if let Some(amount) = budget.expected_payee_amount(height) {
                check.budget_amount = amount;
                check.expected += amount;
            }
        }

        if minted.is_negative() && params.is_v5_3_active(height) {
            return check;
        }
        check.valid = minted <= check.expected;
        check
    }

    /// Write the payment for the block after `prev_height` into its reward
    /// transactions. Superblocks pay the budget; everything else pays a
    /// patriotnode.
    pub fn fill_block_payee(
        &self,
        coinbase: &mut Transaction,
        coinstake: &mut Transaction,
        prev_height: BlockHeight,
        is_proof_of_stake: bool,
    ) -> Result<(), ConsensusError> {
        let height = prev_height.saturating_add(1);
        let budget_paid = self.superblocks_enabled()
            && self
                .engine
                .budget()
                .fill_block_payee(coinbase, coinstake, height, is_proof_of_stake);
        if !budget_paid {
            self.engine
                .reward_allocator()
                .fill(coinbase, coinstake, height, is_proof_of_stake)?;
        }
        Ok(())
    }

    pub fn required_payments_string(&self, height: BlockHeight) -> String {
        let budget = self.engine.budget();
        if self.superblocks_enabled() && budget.is_budget_payment_block(height) {
            budget.required_payments_string(height)
        } else {
            self.engine.required_payments_string(height)
        }
    }
}
