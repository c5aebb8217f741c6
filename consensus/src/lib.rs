//! Patriotnode payment-quorum voting.
//!
//! Service nodes in the top of the ranking vote on which node each upcoming
//! block pays. This crate holds the vote record, the per-height tallies, the
//! engine that validates and casts votes, the reward arithmetic, and the block
//! validation hooks built on them.
//!
//! Ranking, registration, budgets, sporks and the peer transport are external
//! and reached through the traits in [`oracle`] and [`ports`].

pub mod engine;
pub mod error;
pub mod ledger;
pub mod oracle;
pub mod ports;
pub mod reward;
pub mod tally;
pub mod validation;
pub mod vote;

pub use engine::{ActiveNode, Collaborators, SelfVote, SkipReason, VoteOutcome, VotingEngine};
pub use error::{ConsensusError, RejectionKind, Violation, VoteRejection};
pub use ledger::{LedgerSnapshot, VoteLedger};
pub use oracle::{
    BudgetOracle, BudgetStatus, NodeRef, RankOracle, RegisteredPayee, Spork, SporkView, VoterKey,
};
pub use ports::{PeerId, PeerPorts, SyncStatus};
pub use reward::{subtract_from_coinstake, RewardAllocator};
pub use tally::{BlockPayees, PayeeVotes};
pub use validation::{BlockValidator, BlockValueCheck};
pub use vote::{PaymentVote, VoteSigner};
