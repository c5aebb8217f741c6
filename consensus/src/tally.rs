//! Per-height aggregation of payment votes.

use patriot_types::{Amount, BlockHeight, Script, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One destination and the number of votes it collected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeeVotes {
    pub script: Script,
    pub votes: u32,
}

/// Votes for one block height, in the order each destination first received
/// a vote. That order decides which qualifying destination is checked first,
/// so it must never be re-sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayees {
    pub height: BlockHeight,
    pub payees: Vec<PayeeVotes>,
}

impl BlockPayees {
    pub fn new(height: BlockHeight) -> Self {
        Self {
            height,
            payees: Vec::new(),
        }
    }

    pub fn add_vote(&mut self, script: &Script) {
        match self.payees.iter_mut().find(|p| &p.script == script) {
            Some(entry) => entry.votes += 1,
            None => self.payees.push(PayeeVotes {
                script: script.clone(),
                votes: 1,
            }),
        }
    }

    /// Destination with the most votes; the earliest wins a tie.
    pub fn payee(&self) -> Option<&Script> {
        let mut best: Option<&PayeeVotes> = None;
        for entry in &self.payees {
            if best.map_or(true, |b| entry.votes > b.votes) {
                best = Some(entry);
            }
        }
        best.map(|entry| &entry.script)
    }

    pub fn has_payee_with_votes(&self, script: &Script, votes: u32) -> bool {
        self.payees
            .iter()
            .any(|p| p.votes >= votes && &p.script == script)
    }

    /// Whether `tx` pays a binding destination.
    ///
    /// With no destination at `required_votes` the height is inconclusive and
    /// any transaction passes; the longest chain decides. Otherwise the
    /// transaction must carry an output paying exactly `required_amount` to
    /// one of the destinations that reached the threshold.
    pub fn is_transaction_valid(
        &self,
        tx: &Transaction,
        required_amount: Amount,
        required_votes: u32,
    ) -> bool {
        let binding: Vec<&PayeeVotes> = self
            .payees
            .iter()
            .filter(|p| p.votes >= required_votes)
            .collect();
        if binding.is_empty() {
            return true;
        }

        for entry in &binding {
            let paid = tx
                .outputs
                .iter()
                .any(|out| out.script == entry.script && out.value == required_amount);
            if paid {
                return true;
            }
        }

        debug!(
            height = self.height,
            required = %required_amount,
            candidates = %binding
                .iter()
                .map(|p| p.script.to_string())
                .collect::<Vec<_>>()
                .join(","),
            "missing required patriotnode payment"
        );
        false
    }

    /// `"dest:count"` pairs joined by `", "`, or `"Unknown"`.
    pub fn summarize(&self) -> String {
        if self.payees.is_empty() {
            return "Unknown".to_string();
        }
        self.payees
            .iter()
            .map(|p| format!("{}:{}", p.script, p.votes))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
