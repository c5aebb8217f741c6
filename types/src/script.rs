//! Output scripts (reward destinations).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::keys::KeyId;

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;
const PUSH_20: u8 = 0x14;

/// A locking script. Payment votes name their reward destination as a script.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Standard pay-to-key-hash script for a key id.
    pub fn pay_to_key_id(key_id: &KeyId) -> Self {
        let mut bytes = Vec::with_capacity(25);
        bytes.extend_from_slice(&[OP_DUP, OP_HASH160, PUSH_20]);
        bytes.extend_from_slice(key_id.as_bytes());
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_pay_to_pubkey_hash(&self) -> bool {
        self.0.len() == 25
            && self.0[0] == OP_DUP
            && self.0[1] == OP_HASH160
            && self.0[2] == PUSH_20
            && self.0[23] == OP_EQUALVERIFY
            && self.0[24] == OP_CHECKSIG
    }

    /// The key id paid by a pay-to-key-hash script.
    pub fn key_id(&self) -> Option<KeyId> {
        if !self.is_pay_to_pubkey_hash() {
            return None;
        }
        let mut id = [0u8; 20];
        id.copy_from_slice(&self.0[3..23]);
        Some(KeyId::new(id))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

/// Pay-to-key-hash scripts display as their key id; anything else as raw hex.
impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key_id() {
            Some(id) => write!(f, "{id}"),
            None => f.write_str(&self.to_hex()),
        }
    }
}
