use patriot_types::{BlockHeight, CollateralRef, MessageVersion};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("coinstake has {have} outputs, cannot split across {stake_outputs} stake outputs")]
    StakeOutputs { stake_outputs: usize, have: usize },

    #[error("coinbase has no output to reduce")]
    EmptyCoinbase,
}

/// How a rejected vote reflects on the peer that sent it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionKind {
    /// Possibly just unknown to us yet. Not penalised.
    Soft,
    /// Height outside the acceptance window. Not penalised.
    Range,
    /// Message version no longer accepted. Not penalised.
    Stale,
    /// The peer relayed something no honest node would. Penalised.
    ProtocolViolation,
}

/// Why an incoming payment vote was refused.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VoteRejection {
    #[error("block height out of range: {height} not in [{first}, {last}]")]
    OutOfRange {
        height: BlockHeight,
        first: BlockHeight,
        last: BlockHeight,
    },

    #[error("old message version {0:?}")]
    StaleVersion(MessageVersion),

    #[error("non-existent voter {0}")]
    UnknownVoter(CollateralRef),

    #[error("patriotnode not in the top {quorum} (rank {rank:?})")]
    NotInQuorum { quorum: u32, rank: Option<u32> },

    #[error("payee must be pay-to-pubkey-hash")]
    PayeeNotP2pkh,

    #[error("voter already voted for height {0}")]
    AlreadyVoted(BlockHeight),

    #[error("invalid voter signature")]
    BadSignature,
}

impl VoteRejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::OutOfRange { .. } => RejectionKind::Range,
            Self::StaleVersion(_) => RejectionKind::Stale,
            Self::UnknownVoter(_) | Self::AlreadyVoted(_) => RejectionKind::Soft,
            Self::NotInQuorum { .. } | Self::PayeeNotP2pkh | Self::BadSignature => {
                RejectionKind::ProtocolViolation
            }
        }
    }

    /// Short machine-checkable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "out-of-range",
            Self::StaleVersion(_) => "stale-version",
            Self::UnknownVoter(_) => "unknown-voter",
            Self::NotInQuorum { .. } => "not-in-quorum",
            Self::PayeeNotP2pkh => "payee-not-p2pkh",
            Self::AlreadyVoted(_) => "already-voted",
            Self::BadSignature => "bad-signature",
        }
    }

    pub fn is_penalized(&self) -> bool {
        self.kind() == RejectionKind::ProtocolViolation
    }
}

/// A block that breaks a payment rule. Carries the reject code the outer
/// consensus engine reports and the DoS score to charge the block's source.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct Violation {
    pub code: &'static str,
    pub dos: u32,
    pub message: String,
}

impl Violation {
    pub fn new(code: &'static str, dos: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            dos,
            message: message.into(),
        }
    }
}
