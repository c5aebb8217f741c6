//! Blake2b hashing.

use blake2::digest::consts::{U20, U32};
use blake2::{Blake2b, Digest};
use patriot_types::{KeyId, LegacyPublicKey};

type Blake2b256 = Blake2b<U32>;
type Blake2b160 = Blake2b<U20>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// The 20-byte key id a legacy public key is registered under.
pub fn key_id(public: &LegacyPublicKey) -> KeyId {
    let mut hasher = Blake2b160::new();
    hasher.update(public.as_bytes());
    let mut id = [0u8; 20];
    id.copy_from_slice(&hasher.finalize());
    KeyId::new(id)
}
