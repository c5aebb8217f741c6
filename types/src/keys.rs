//! Key and signature types for the two voter signing schemes.
//!
//! - **Legacy** nodes sign with an Ed25519 key and are identified on chain by
//!   the 20-byte [`KeyId`] of that key.
//! - **Deterministically registered** nodes sign with a BLS12-381 operator key
//!   recorded in the registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::TypesError;

/// Length of a legacy signature: embedded Ed25519 public key + signature.
pub const LEGACY_SIGNATURE_LEN: usize = 32 + 64;

/// Length of a compressed BLS12-381 G1 public key.
pub const OPERATOR_PUBLIC_KEY_LEN: usize = 48;

/// Length of a compressed BLS12-381 G2 signature.
pub const OPERATOR_SIGNATURE_LEN: usize = 96;

/// 20-byte hash of a legacy public key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct KeyId([u8; 20]);

impl KeyId {
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", hex::encode(self.0))
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegacyPublicKey(pub [u8; 32]);

impl LegacyPublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// A 32-byte Ed25519 secret seed.
///
/// Not `Debug`, `Clone`, or `Serialize`; zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct LegacySecretKey(pub [u8; 32]);

impl LegacySecretKey {
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        decode_secret(s).map(Self)
    }
}

/// A compressed BLS12-381 operator public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorPublicKey(pub [u8; OPERATOR_PUBLIC_KEY_LEN]);

impl OperatorPublicKey {
    pub fn as_bytes(&self) -> &[u8; OPERATOR_PUBLIC_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for OperatorPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperatorPublicKey({}\u{2026})", hex::encode(&self.0[..6]))
    }
}

/// A BLS12-381 operator secret key (32-byte scalar, big-endian).
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct OperatorSecretKey(pub [u8; 32]);

impl OperatorSecretKey {
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        decode_secret(s).map(Self)
    }
}

/// Raw signature bytes carried by a payment vote. Empty until signed.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteSignature(pub Vec<u8>);

impl VoteSignature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for VoteSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoteSignature({} bytes)", self.0.len())
    }
}

fn decode_secret(s: &str) -> Result<[u8; 32], TypesError> {
    let mut bytes = hex::decode(s.trim()).map_err(|_| TypesError::InvalidKey)?;
    let arr: Result<[u8; 32], _> = bytes.as_slice().try_into();
    bytes.zeroize();
    arr.map_err(|_| TypesError::InvalidKey)
}
