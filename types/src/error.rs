//! Parsing errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid collateral reference: {0}")]
    InvalidCollateral(String),

    #[error("invalid key material")]
    InvalidKey,

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}
