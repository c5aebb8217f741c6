//! Deterministic voter identities.

use patriot_consensus::{NodeRef, PaymentVote, VoteSigner};
use patriot_crypto::{key_id, legacy_keypair_from_seed, operator_keypair_from_seed};
use patriot_types::{
    BlockHeight, CollateralRef, KeyId, LegacySecretKey, MessageVersion, OperatorPublicKey, Script,
    TxHash,
};

use crate::registry::NullRegistry;

/// A voter derived from a single seed byte: collateral, keys and payee
/// script are all reproducible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TestVoter {
    pub seed: u8,
    pub collateral: CollateralRef,
}

impl TestVoter {
    pub fn new(seed: u8) -> Self {
        Self {
            seed,
            collateral: CollateralRef::new(TxHash::new([seed; 32]), u32::from(seed)),
        }
    }

    /// `n` voters with seeds `1..=n`.
    pub fn many(n: u8) -> Vec<Self> {
        (1..=n).map(Self::new).collect()
    }

    fn legacy_seed(&self) -> [u8; 32] {
        let mut seed = [0x4c; 32];
        seed[0] = self.seed;
        seed
    }

    fn operator_ikm(&self) -> [u8; 32] {
        let mut ikm = [0x6f; 32];
        ikm[0] = self.seed;
        ikm
    }

    pub fn key_id(&self) -> KeyId {
        key_id(&legacy_keypair_from_seed(&self.legacy_seed()).public)
    }

    pub fn legacy_signer(&self) -> VoteSigner {
        VoteSigner::Legacy(LegacySecretKey(self.legacy_seed()))
    }

    pub fn operator_public(&self) -> OperatorPublicKey {
        match operator_keypair_from_seed(&self.operator_ikm()) {
            Ok(pair) => pair.public,
            Err(err) => panic!("operator key derivation failed: {err}"),
        }
    }

    pub fn operator_signer(&self) -> VoteSigner {
        match operator_keypair_from_seed(&self.operator_ikm()) {
            Ok(pair) => VoteSigner::Operator(pair.secret),
            Err(err) => panic!("operator key derivation failed: {err}"),
        }
    }

    /// Pay-to-key-hash script paying this voter.
    pub fn payee(&self) -> Script {
        Script::pay_to_key_id(&self.key_id())
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef {
            collateral: self.collateral,
            payee: self.payee(),
        }
    }

    /// Register as a legacy node at `rank`.
    pub fn register_legacy(&self, registry: &NullRegistry, rank: u32) {
        registry.add_legacy(self.collateral, self.key_id(), rank);
    }

    /// Register as a deterministic node at `rank`.
    pub fn register_operator(&self, registry: &NullRegistry, rank: u32) {
        registry.add_registered(self.collateral, self.operator_public(), rank);
    }

    /// Hash-signed vote with the legacy key.
    pub fn vote(&self, height: BlockHeight, payee: &Script) -> PaymentVote {
        self.vote_signed_by(height, payee, &self.legacy_signer())
    }

    pub fn vote_signed_by(
        &self,
        height: BlockHeight,
        payee: &Script,
        signer: &VoteSigner,
    ) -> PaymentVote {
        let mut vote = PaymentVote::new(
            self.collateral,
            height,
            payee.clone(),
            MessageVersion::HashSigned,
        );
        if let Err(err) = vote.sign(signer) {
            panic!("test vote signing failed: {err}");
        }
        vote
    }
}
