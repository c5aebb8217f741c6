use patriot_consensus::PeerId;
use patriot_messages::MessageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("malformed message: {0}")]
    Message(#[from] MessageError),

    #[error("peer {0:?} already asked for the payment votes")]
    RepeatedRequest(PeerId),
}
