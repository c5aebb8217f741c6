//! Voter signatures.
//!
//! Legacy signatures embed the signer's Ed25519 public key ahead of the
//! 64-byte signature, because the registry only records the key's id. A
//! verifier recovers the key, checks it hashes to the expected id, then checks
//! the signature.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use patriot_types::keys::{LEGACY_SIGNATURE_LEN, OPERATOR_SIGNATURE_LEN};
use patriot_types::{
    KeyId, LegacyPublicKey, LegacySecretKey, OperatorPublicKey, OperatorSecretKey, VoteSignature,
};

use crate::error::SignError;
use crate::hash::key_id;

/// Domain separation tag for operator signatures (proof-of-possession suite).
const OPERATOR_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Sign a message with a legacy key.
pub fn sign_legacy(message: &[u8], secret: &LegacySecretKey) -> VoteSignature {
    let signing_key = SigningKey::from_bytes(&secret.0);
    let sig = signing_key.sign(message);
    let mut bytes = Vec::with_capacity(LEGACY_SIGNATURE_LEN);
    bytes.extend_from_slice(signing_key.verifying_key().as_bytes());
    bytes.extend_from_slice(&sig.to_bytes());
    VoteSignature(bytes)
}

/// Verify a legacy signature for the key registered under `expected`.
pub fn verify_legacy(message: &[u8], signature: &VoteSignature, expected: &KeyId) -> bool {
    let bytes = signature.as_bytes();
    if bytes.len() != LEGACY_SIGNATURE_LEN {
        return false;
    }
    let (public, sig) = bytes.split_at(32);
    let Ok(public) = <[u8; 32]>::try_from(public) else {
        return false;
    };
    if key_id(&LegacyPublicKey(public)) != *expected {
        return false;
    }
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public) else {
        return false;
    };
    let Ok(sig) = ed25519_dalek::Signature::from_slice(sig) else {
        return false;
    };
    verifying_key.verify(message, &sig).is_ok()
}

/// Sign a message with an operator key.
pub fn sign_operator(
    message: &[u8],
    secret: &OperatorSecretKey,
) -> Result<VoteSignature, SignError> {
    let sk = blst::min_pk::SecretKey::from_bytes(&secret.0)
        .map_err(|_| SignError::InvalidOperatorKey)?;
    let sig = sk.sign(message, OPERATOR_DST, &[]);
    Ok(VoteSignature(sig.compress().to_vec()))
}

/// Verify an operator signature.
pub fn verify_operator(
    message: &[u8],
    signature: &VoteSignature,
    public: &OperatorPublicKey,
) -> bool {
    use blst::min_pk::{PublicKey, Signature};

    if signature.len() != OPERATOR_SIGNATURE_LEN {
        return false;
    }
    let Ok(pk) = PublicKey::uncompress(public.as_bytes()) else {
        return false;
    };
    let Ok(sig) = Signature::uncompress(signature.as_bytes()) else {
        return false;
    };
    sig.verify(true, message, OPERATOR_DST, &[], &pk, true) == blst::BLST_ERROR::BLST_SUCCESS
}
