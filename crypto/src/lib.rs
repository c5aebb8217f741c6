//! Cryptographic primitives for patriotnode payment voting.
//!
//! - **Blake2b** for vote identities, file checksums, and key ids
//! - **Ed25519** for legacy voter signatures
//! - **BLS12-381** (`blst`, min-pk) for operator signatures of
//!   deterministically registered nodes

pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use error::SignError;
pub use hash::{blake2b_256, blake2b_256_multi, key_id};
pub use keys::{
    generate_legacy_keypair, generate_operator_keypair, legacy_keypair_from_seed,
    operator_keypair_from_seed, operator_public_from_secret, LegacyKeyPair, OperatorKeyPair,
};
pub use sign::{sign_legacy, sign_operator, verify_legacy, verify_operator};
