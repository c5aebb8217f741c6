//! Network identifier.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TypesError;

/// Identifies which network a node is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The production network.
    Main,
    /// The public test network.
    Test,
    /// Local regression-test network.
    Regtest,
}

impl NetworkId {
    /// Four magic bytes that open every message on this network. Also stamped
    /// into persisted files so a snapshot cannot be loaded on the wrong chain.
    pub fn message_start(&self) -> [u8; 4] {
        match self {
            Self::Main => [0x70, 0x6e, 0x6d, 0x61],
            Self::Test => [0x70, 0x6e, 0x74, 0x73],
            Self::Regtest => [0x70, 0x6e, 0x72, 0x67],
        }
    }

    pub fn is_main(&self) -> bool {
        matches!(self, Self::Main)
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Test)
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
            Self::Regtest => "regtest",
        }
    }
}

impl FromStr for NetworkId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Self::Main),
            "test" => Ok(Self::Test),
            "regtest" => Ok(Self::Regtest),
            other => Err(TypesError::UnknownNetwork(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_start_differs_per_network() {
        assert_ne!(NetworkId::Main.message_start(), NetworkId::Test.message_start());
        assert_ne!(NetworkId::Test.message_start(), NetworkId::Regtest.message_start());
    }

    #[test]
    fn parses_names() {
        for id in [NetworkId::Main, NetworkId::Test, NetworkId::Regtest] {
            assert_eq!(id.as_str().parse::<NetworkId>().unwrap(), id);
        }
        assert!("mainnet".parse::<NetworkId>().is_err());
    }
}
