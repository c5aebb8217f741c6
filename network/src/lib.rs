//! Peer-facing side of patriotnode payment voting: answering vote sync
//! requests and feeding announced votes into the engine.

pub mod error;
pub mod fulfilled;
pub mod sync;

pub use error::NetworkError;
pub use fulfilled::FulfilledRequests;
pub use sync::{Handled, IgnoreReason, PaymentSync, PeerInfo};
