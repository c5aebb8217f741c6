//! Nullable budget: no superblocks unless configured.

use std::collections::HashSet;
use std::sync::Mutex;

use patriot_consensus::{BudgetOracle, BudgetStatus};
use patriot_types::{Amount, BlockHash, BlockHeight, Transaction, TxOut};

struct State {
    superblocks: HashSet<BlockHeight>,
    status: BudgetStatus,
    payment: Option<TxOut>,
    total: Amount,
}

impl Default for State {
    fn default() -> Self {
        Self {
            superblocks: HashSet::new(),
            status: BudgetStatus::Invalid,
            payment: None,
            total: Amount::ZERO,
        }
    }
}

#[derive(Default)]
pub struct NullBudget {
    state: Mutex<State>,
}

impl NullBudget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_superblock(&self, height: BlockHeight) {
        self.state.lock().unwrap().superblocks.insert(height);
    }

    pub fn set_status(&self, status: BudgetStatus) {
        self.state.lock().unwrap().status = status;
    }

    /// Output the budget pays on its superblocks.
    pub fn set_payment(&self, payment: Option<TxOut>) {
        self.state.lock().unwrap().payment = payment;
    }

    pub fn set_total_budget(&self, total: Amount) {
        self.state.lock().unwrap().total = total;
    }
}

impl BudgetOracle for NullBudget {
    fn is_budget_payment_block(&self, height: BlockHeight) -> bool {
        self.state.lock().unwrap().superblocks.contains(&height)
    }

    fn transaction_status(
        &self,
        _tx: &Transaction,
        _block_hash: &BlockHash,
        _height: BlockHeight,
    ) -> BudgetStatus {
        self.state.lock().unwrap().status
    }

    fn fill_block_payee(
        &self,
        coinbase: &mut Transaction,
        _coinstake: &mut Transaction,
        height: BlockHeight,
        _is_proof_of_stake: bool,
    ) -> bool {
        let state = self.state.lock().unwrap();
        match (&state.payment, state.superblocks.contains(&height)) {
            (Some(payment), true) => {
                coinbase.outputs.push(payment.clone());
                true
            }
            _ => false,
        }
    }

    fn expected_payee_amount(&self, height: BlockHeight) -> Option<Amount> {
        let state = self.state.lock().unwrap();
        if !state.superblocks.contains(&height) {
            return None;
        }
        state.payment.as_ref().map(|p| p.value)
    }

    fn total_budget(&self, _height: BlockHeight) -> Amount {
        self.state.lock().unwrap().total
    }

    fn required_payments_string(&self, height: BlockHeight) -> String {
        match &self.state.lock().unwrap().payment {
            Some(payment) => format!("{}:budget@{height}", payment.script),
            None => "unknown-budget".to_string(),
        }
    }
}
