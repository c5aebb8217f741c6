//! The payee-relevant subset of the transaction and block model.
//!
//! Full transaction validation lives elsewhere; payment voting only needs
//! outputs, the coinbase/coinstake distinction, and block heights.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::hash::BlockHash;
use crate::script::Script;

/// Block height. Heights are never negative; arithmetic that could go below
/// zero saturates.
pub type BlockHeight = u32;

/// A transaction output.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxOut {
    pub value: Amount,
    pub script: Script,
}

impl TxOut {
    pub fn new(value: Amount, script: Script) -> Self {
        Self { value, script }
    }

    /// An empty marker output, as used for output 0 of a coinstake.
    pub fn empty() -> Self {
        Self {
            value: Amount::ZERO,
            script: Script::default(),
        }
    }
}

/// Role of a transaction inside a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    Coinbase,
    Coinstake,
    Regular,
}

/// A transaction, reduced to what payee checks need.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TxKind,
    pub outputs: Vec<TxOut>,
}

impl Transaction {
    pub fn new(kind: TxKind, outputs: Vec<TxOut>) -> Self {
        Self { kind, outputs }
    }

    pub fn coinbase(outputs: Vec<TxOut>) -> Self {
        Self::new(TxKind::Coinbase, outputs)
    }

    pub fn coinstake(outputs: Vec<TxOut>) -> Self {
        Self::new(TxKind::Coinstake, outputs)
    }

    pub fn is_coinbase(&self) -> bool {
        self.kind == TxKind::Coinbase
    }

    pub fn is_coinstake(&self) -> bool {
        self.kind == TxKind::Coinstake
    }

    /// Sum of all output values.
    pub fn value_out(&self) -> Amount {
        self.outputs.iter().map(|o| o.value).sum()
    }

    /// Whether an output with exactly this script and value exists.
    pub fn contains_output(&self, out: &TxOut) -> bool {
        self.outputs.iter().any(|o| o == out)
    }
}

/// A block: transaction 0 is the coinbase, transaction 1 the coinstake on
/// proof-of-stake blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hash: BlockHash,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(hash: BlockHash, transactions: Vec<Transaction>) -> Self {
        Self { hash, transactions }
    }

    pub fn coinbase(&self) -> Option<&Transaction> {
        self.transactions.first()
    }

    pub fn coinstake(&self) -> Option<&Transaction> {
        self.transactions.get(1).filter(|tx| tx.is_coinstake())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_out_sums_outputs() {
        let tx = Transaction::coinbase(vec![
            TxOut::new(Amount::new(5), Script::default()),
            TxOut::new(Amount::new(7), Script::default()),
        ]);
        assert_eq!(tx.value_out(), Amount::new(12));
    }

    #[test]
    fn contains_output_matches_script_and_value() {
        let script = Script::new(vec![1, 2, 3]);
        let tx = Transaction::coinbase(vec![TxOut::new(Amount::new(10), script.clone())]);
        assert!(tx.contains_output(&TxOut::new(Amount::new(10), script.clone())));
        assert!(!tx.contains_output(&TxOut::new(Amount::new(11), script)));
    }

    #[test]
    fn coinstake_accessor_requires_kind() {
        let block = Block::new(
            BlockHash::ZERO,
            vec![
                Transaction::coinbase(vec![]),
                Transaction::new(TxKind::Regular, vec![]),
            ],
        );
        assert!(block.coinbase().is_some());
        assert!(block.coinstake().is_none());
    }
}
