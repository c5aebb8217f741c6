//! Network messages for payment vote sync.
//!
//! Payloads ride the host's peer transport; this crate only fixes their
//! content and encoding. Votes are announced by inventory and fetched through
//! the host's inventory relay, so only [`PaymentMessage::PaymentVote`]
//! carries a full vote.

use patriot_consensus::PaymentVote;
use patriot_types::VoteHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frames above this size are dropped before decoding.
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message of {0} bytes exceeds the size limit")]
    TooLarge(usize),

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Inventory item kinds this subsystem announces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryKind {
    PaymentVote,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryItem {
    pub kind: InventoryKind,
    pub hash: VoteHash,
}

impl InventoryItem {
    pub fn payment_vote(hash: VoteHash) -> Self {
        Self {
            kind: InventoryKind::PaymentVote,
            hash,
        }
    }
}

/// Sync stages a status count can report on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncItem {
    PaymentVotes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMessage {
    /// Ask a peer for the votes of roughly the last `count` blocks.
    GetPaymentVotes { count: u32 },
    /// A single vote.
    PaymentVote(PaymentVote),
    /// Announce votes by hash.
    Inventory(Vec<InventoryItem>),
    /// Sent after answering a request: how many items were announced.
    SyncStatusCount { item: SyncItem, count: u32 },
}

impl PaymentMessage {
    /// Command name, for logs.
    pub fn command(&self) -> &'static str {
        match self {
            Self::GetPaymentVotes { .. } => "getpnvotes",
            Self::PaymentVote(_) => "pnvote",
            Self::Inventory(_) => "inv",
            Self::SyncStatusCount { .. } => "ssc",
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        if bytes.len() > MAX_MESSAGE_SIZE {
            return Err(MessageError::TooLarge(bytes.len()));
        }
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patriot_types::{CollateralRef, KeyId, MessageVersion, Script, TxHash, VoteSignature};

    #[test]
    fn vote_message_decodes_to_same_vote() {
        let mut vote = PaymentVote::new(
            CollateralRef::new(TxHash::new([3; 32]), 2),
            500,
            Script::pay_to_key_id(&KeyId::new([4; 20])),
            MessageVersion::HashSigned,
        );
        vote.signature = VoteSignature(vec![9; 96]);
        let hash = vote.hash();

        let bytes = PaymentMessage::PaymentVote(vote).encode().unwrap();
        match PaymentMessage::decode(&bytes).unwrap() {
            PaymentMessage::PaymentVote(decoded) => assert_eq!(decoded.hash(), hash),
            other => panic!("unexpected message {}", other.command()),
        }
    }

    #[test]
    fn garbage_is_a_codec_error() {
        assert!(matches!(
            PaymentMessage::decode(&[0xFF; 3]),
            Err(MessageError::Codec(_))
        ));
    }

    #[test]
    fn oversized_frames_are_refused() {
        let bytes = vec![0u8; MAX_MESSAGE_SIZE + 1];
        assert!(matches!(
            PaymentMessage::decode(&bytes),
            Err(MessageError::TooLarge(_))
        ));
    }
}
