use thiserror::Error;

/// Failures while producing a signature. Verification never errors; it
/// answers `false`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignError {
    #[error("operator secret key is not a valid BLS12-381 scalar")]
    InvalidOperatorKey,

    #[error("key material too short: need at least {0} bytes")]
    ShortKeyMaterial(usize),
}
