//! The payment vote record.
//!
//! A vote is the signed claim "node V votes that block H pays script P".
//! Everything but the signature is fixed before signing; the signature is
//! produced last and never changes afterwards.

use patriot_crypto::{
    blake2b_256_multi, sign_legacy, sign_operator, verify_legacy, verify_operator, SignError,
};
use patriot_types::{
    BlockHeight, CollateralRef, LegacySecretKey, MessageVersion, OperatorSecretKey, Script,
    VoteHash, VoteSignature,
};
use serde::{Deserialize, Serialize};

use crate::oracle::VoterKey;

/// Secret key this node signs its own votes with.
pub enum VoteSigner {
    Legacy(LegacySecretKey),
    Operator(OperatorSecretKey),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentVote {
    pub voter: CollateralRef,
    pub block_height: BlockHeight,
    pub payee: Script,
    pub version: MessageVersion,
    pub signature: VoteSignature,
}

impl PaymentVote {
    /// An unsigned vote.
    pub fn new(
        voter: CollateralRef,
        block_height: BlockHeight,
        payee: Script,
        version: MessageVersion,
    ) -> Self {
        Self {
            voter,
            block_height,
            payee,
            version,
            signature: VoteSignature::default(),
        }
    }

    /// Identity of the vote over `(payee, height, voter)`. The version and
    /// signature are not part of it.
    pub fn hash(&self) -> VoteHash {
        let script = self.payee.as_bytes();
        let script_len = (script.len() as u32).to_le_bytes();
        let height = self.block_height.to_le_bytes();
        let index = self.voter.index.to_le_bytes();
        VoteHash::new(blake2b_256_multi(&[
            &script_len,
            script,
            &height,
            self.voter.txid.as_bytes(),
            &index,
        ]))
    }

    /// Text signed by legacy-version votes: short voter reference, decimal
    /// height and payee script hex, concatenated without separators.
    pub fn signing_message(&self) -> Vec<u8> {
        format!(
            "{}{}{}",
            self.voter.to_short_string(),
            self.block_height,
            self.payee.to_hex()
        )
        .into_bytes()
    }

    fn signed_payload(&self) -> Vec<u8> {
        match self.version {
            MessageVersion::Legacy => self.signing_message(),
            MessageVersion::HashSigned => self.hash().as_bytes().to_vec(),
        }
    }

    pub fn sign(&mut self, signer: &VoteSigner) -> Result<(), SignError> {
        let payload = self.signed_payload();
        self.signature = match signer {
            VoteSigner::Legacy(secret) => sign_legacy(&payload, secret),
            VoteSigner::Operator(secret) => sign_operator(&payload, secret)?,
        };
        Ok(())
    }

    /// Verify the signature against the voter's resolved key. Operator keys
    /// only ever sign vote hashes.
    pub fn verify(&self, key: &VoterKey) -> bool {
        match (key, self.version) {
            (VoterKey::Legacy(id), _) => verify_legacy(&self.signed_payload(), &self.signature, id),
            (VoterKey::Registered(public), MessageVersion::HashSigned) => {
                verify_operator(self.hash().as_bytes(), &self.signature, public)
            }
            (VoterKey::Registered(_), MessageVersion::Legacy) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patriot_crypto::{key_id, legacy_keypair_from_seed, operator_keypair_from_seed};
    use patriot_types::{KeyId, TxHash};

    fn sample(version: MessageVersion) -> PaymentVote {
        PaymentVote::new(
            CollateralRef::new(TxHash::new([0x11; 32]), 1),
            1000,
            Script::pay_to_key_id(&KeyId::new([0x22; 20])),
            version,
        )
    }

    #[test]
    fn hash_ignores_version_and_signature() {
        let a = sample(MessageVersion::Legacy);
        let mut b = sample(MessageVersion::HashSigned);
        b.signature = VoteSignature(vec![1, 2, 3]);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn hash_covers_every_field() {
        let base = sample(MessageVersion::HashSigned);
        let mut other = base.clone();
        other.block_height += 1;
        assert_ne!(base.hash(), other.hash());
        let mut other = base.clone();
        other.voter.index = 2;
        assert_ne!(base.hash(), other.hash());
        let mut other = base.clone();
        other.payee = Script::pay_to_key_id(&KeyId::new([0x33; 20]));
        assert_ne!(base.hash(), other.hash());
    }

    #[test]
    fn signing_message_layout() {
        let vote = sample(MessageVersion::Legacy);
        let expected = format!("{}-11000{}", "11".repeat(32), vote.payee.to_hex());
        assert_eq!(vote.signing_message(), expected.into_bytes());
    }

    #[test]
    fn legacy_key_verifies_both_versions() {
        let kp = legacy_keypair_from_seed(&[4; 32]);
        let key = VoterKey::Legacy(key_id(&kp.public));
        let signer = VoteSigner::Legacy(LegacySecretKey(kp.secret.0));
        for version in [MessageVersion::Legacy, MessageVersion::HashSigned] {
            let mut vote = sample(version);
            vote.sign(&signer).unwrap();
            assert!(vote.verify(&key));
        }
    }

    #[test]
    fn operator_key_verifies_hash_signed_only() {
        let kp = operator_keypair_from_seed(&[8; 32]).unwrap();
        let key = VoterKey::Registered(kp.public);
        let signer = VoteSigner::Operator(kp.secret);

        let mut vote = sample(MessageVersion::HashSigned);
        vote.sign(&signer).unwrap();
        assert!(vote.verify(&key));

        let mut legacy = sample(MessageVersion::Legacy);
        legacy.sign(&signer).unwrap();
        assert!(!legacy.verify(&key));
    }

    #[test]
    fn tampering_breaks_signature() {
        let kp = legacy_keypair_from_seed(&[4; 32]);
        let key = VoterKey::Legacy(key_id(&kp.public));
        let mut vote = sample(MessageVersion::HashSigned);
        vote.sign(&VoteSigner::Legacy(kp.secret)).unwrap();
        vote.block_height += 1;
        assert!(!vote.verify(&key));
    }
}
