//! Collateral outpoint identifying a service node.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;
use crate::hash::TxHash;

/// The collateral output a service node locks. Unique per node, so it doubles
/// as the voter identity on payment votes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct CollateralRef {
    pub txid: TxHash,
    pub index: u32,
}

impl CollateralRef {
    pub fn new(txid: TxHash, index: u32) -> Self {
        Self { txid, index }
    }

    /// Short textual form `<txid-hex>-<index>`. Part of the legacy signing
    /// message, so the exact layout is consensus-relevant.
    pub fn to_short_string(&self) -> String {
        format!("{}-{}", self.txid, self.index)
    }
}

impl fmt::Debug for CollateralRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollateralRef({:?}, {})", self.txid, self.index)
    }
}

impl fmt::Display for CollateralRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_short_string())
    }
}

impl FromStr for CollateralRef {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, index) = s
            .rsplit_once('-')
            .ok_or_else(|| TypesError::InvalidCollateral(s.to_string()))?;
        let txid =
            TxHash::from_hex(txid).ok_or_else(|| TypesError::InvalidCollateral(s.to_string()))?;
        let index = index
            .parse::<u32>()
            .map_err(|_| TypesError::InvalidCollateral(s.to_string()))?;
        Ok(Self { txid, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_round_trips_through_from_str() {
        let c = CollateralRef::new(TxHash::new([0xAB; 32]), 7);
        let s = c.to_short_string();
        assert!(s.ends_with("-7"));
        assert_eq!(s.parse::<CollateralRef>().unwrap(), c);
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert!("nodash".parse::<CollateralRef>().is_err());
        assert!("abcd-1".parse::<CollateralRef>().is_err());
        let bad_index = format!("{}-x", TxHash::new([1; 32]));
        assert!(bad_index.parse::<CollateralRef>().is_err());
    }
}
