//! Fundamental types for patriotnode payment voting.
//!
//! Every other crate in the workspace builds on these: heights, amounts,
//! hashes, collateral references, output scripts, the payee-relevant slice of
//! transactions and blocks, key material, network identity, and the payment
//! parameters.

pub mod amount;
pub mod collateral;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod params;
pub mod script;
pub mod transaction;
pub mod version;

pub use amount::{Amount, COIN};
pub use collateral::CollateralRef;
pub use error::TypesError;
pub use hash::{BlockHash, Hash256, TxHash, VoteHash};
pub use keys::{
    KeyId, LegacyPublicKey, LegacySecretKey, OperatorPublicKey, OperatorSecretKey, VoteSignature,
};
pub use network::NetworkId;
pub use params::PaymentParams;
pub use script::Script;
pub use transaction::{Block, BlockHeight, Transaction, TxKind, TxOut};
pub use version::MessageVersion;
