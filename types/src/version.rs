//! Signed-message versions.

use serde::{Deserialize, Serialize};

/// How a payment vote was signed.
///
/// Ordered: a later version is "newer". Votes older than the mandated version
/// are refused before any signature work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MessageVersion {
    /// Signature over the textual signing message.
    Legacy,
    /// Detached signature over the vote hash.
    HashSigned,
}
