//! Key generation for both voter signing schemes.

use ed25519_dalek::SigningKey;
use patriot_types::{LegacyPublicKey, LegacySecretKey, OperatorPublicKey, OperatorSecretKey};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::SignError;

/// An Ed25519 legacy voter key pair.
pub struct LegacyKeyPair {
    pub public: LegacyPublicKey,
    pub secret: LegacySecretKey,
}

/// A BLS12-381 operator key pair.
pub struct OperatorKeyPair {
    pub public: OperatorPublicKey,
    pub secret: OperatorSecretKey,
}

/// Generate a legacy key pair from a secure random source.
pub fn generate_legacy_keypair() -> LegacyKeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    legacy_keypair_from_seed(&signing_key.to_bytes())
}

/// Derive a legacy key pair from a 32-byte seed (deterministic).
pub fn legacy_keypair_from_seed(seed: &[u8; 32]) -> LegacyKeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    LegacyKeyPair {
        public: LegacyPublicKey(signing_key.verifying_key().to_bytes()),
        secret: LegacySecretKey(signing_key.to_bytes()),
    }
}

/// Generate an operator key pair from a secure random source.
pub fn generate_operator_keypair() -> Result<OperatorKeyPair, SignError> {
    let mut ikm = [0u8; 32];
    OsRng.fill_bytes(&mut ikm);
    operator_keypair_from_seed(&ikm)
}

/// Derive an operator key pair from input keying material (at least 32 bytes).
pub fn operator_keypair_from_seed(ikm: &[u8]) -> Result<OperatorKeyPair, SignError> {
    if ikm.len() < 32 {
        return Err(SignError::ShortKeyMaterial(32));
    }
    let sk = blst::min_pk::SecretKey::key_gen(ikm, &[])
        .map_err(|_| SignError::InvalidOperatorKey)?;
    Ok(OperatorKeyPair {
        public: OperatorPublicKey(sk.sk_to_pk().compress()),
        secret: OperatorSecretKey(sk.to_bytes()),
    })
}

/// Derive the operator public key for a secret key.
pub fn operator_public_from_secret(
    secret: &OperatorSecretKey,
) -> Result<OperatorPublicKey, SignError> {
    let sk = blst::min_pk::SecretKey::from_bytes(&secret.0)
        .map_err(|_| SignError::InvalidOperatorKey)?;
    Ok(OperatorPublicKey(sk.sk_to_pk().compress()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_seed_is_deterministic() {
        let a = legacy_keypair_from_seed(&[7; 32]);
        let b = legacy_keypair_from_seed(&[7; 32]);
        assert_eq!(a.public, b.public);
        assert_ne!(a.public.0, [0u8; 32]);
    }

    #[test]
    fn generated_legacy_keys_differ() {
        assert_ne!(generate_legacy_keypair().public, generate_legacy_keypair().public);
    }

    #[test]
    fn operator_public_matches_secret() {
        let pair = operator_keypair_from_seed(&[3u8; 32]).unwrap();
        assert_eq!(operator_public_from_secret(&pair.secret).unwrap(), pair.public);
    }

    #[test]
    fn operator_seed_must_be_long_enough() {
        assert_eq!(
            operator_keypair_from_seed(&[1u8; 16]).err(),
            Some(SignError::ShortKeyMaterial(32))
        );
    }

    #[test]
    fn zero_scalar_is_rejected() {
        assert!(operator_public_from_secret(&OperatorSecretKey([0; 32])).is_err());
    }
}
