//! Nullable infrastructure for deterministic testing.
//!
//! Ranking, registration, budgets, sporks, sync state and the peer transport
//! are all external to the payment core. This crate provides in-memory
//! implementations of their traits that:
//! - Return deterministic, programmable values
//! - Record every side effect for assertions
//! - Never touch the filesystem or network
//!
//! Usage: build a [`NullWorld`] (or the individual doubles) and hand its
//! [`Collaborators`](patriot_consensus::Collaborators) to the engine.

pub mod budget;
pub mod peers;
pub mod registry;
pub mod sporks;
pub mod sync;
pub mod voter;

use std::sync::Arc;

use patriot_consensus::Collaborators;

pub use budget::NullBudget;
pub use peers::NullPeers;
pub use registry::NullRegistry;
pub use sporks::NullSporks;
pub use sync::NullSyncStatus;
pub use voter::TestVoter;

/// One of each double, shared by `Arc` so tests keep handles for control
/// and assertions after handing them to the engine.
#[derive(Clone, Default)]
pub struct NullWorld {
    pub registry: Arc<NullRegistry>,
    pub budget: Arc<NullBudget>,
    pub peers: Arc<NullPeers>,
    pub sync: Arc<NullSyncStatus>,
    pub sporks: Arc<NullSporks>,
}

impl NullWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            registry: self.registry.clone(),
            budget: self.budget.clone(),
            peers: self.peers.clone(),
            sync: self.sync.clone(),
        }
    }
}
