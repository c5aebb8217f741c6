//! Nullable registry: programmable ranks and registrations.

use std::collections::HashMap;
use std::sync::Mutex;

use patriot_consensus::{NodeRef, RankOracle, RegisteredPayee};
use patriot_types::{BlockHeight, CollateralRef, KeyId, OperatorPublicKey, Script};

#[derive(Default)]
struct State {
    best_height: BlockHeight,
    enabled: Option<u32>,
    ranks: HashMap<CollateralRef, u32>,
    legacy: HashMap<CollateralRef, KeyId>,
    deterministic: HashMap<CollateralRef, OperatorPublicKey>,
    queued: Option<NodeRef>,
    best_payee: Option<Script>,
    registered_payee: Option<RegisteredPayee>,
}

/// A registry whose answers are set by the test.
///
/// Ranks do not depend on height. The enabled count defaults to the number of
/// registered nodes.
#[derive(Default)]
pub struct NullRegistry {
    state: Mutex<State>,
}

impl NullRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_best_height(&self, height: BlockHeight) {
        self.state.lock().unwrap().best_height = height;
    }

    pub fn set_enabled_count(&self, count: u32) {
        self.state.lock().unwrap().enabled = Some(count);
    }

    /// Register a legacy node at `rank`.
    pub fn add_legacy(&self, collateral: CollateralRef, key_id: KeyId, rank: u32) {
        let mut state = self.state.lock().unwrap();
        state.legacy.insert(collateral, key_id);
        state.ranks.insert(collateral, rank);
    }

    /// Register a deterministic node at `rank`.
    pub fn add_registered(&self, collateral: CollateralRef, key: OperatorPublicKey, rank: u32) {
        let mut state = self.state.lock().unwrap();
        state.deterministic.insert(collateral, key);
        state.ranks.insert(collateral, rank);
    }

    pub fn set_rank(&self, collateral: CollateralRef, rank: Option<u32>) {
        let mut state = self.state.lock().unwrap();
        match rank {
            Some(rank) => state.ranks.insert(collateral, rank),
            None => state.ranks.remove(&collateral),
        };
    }

    pub fn set_next_queued(&self, node: Option<NodeRef>) {
        self.state.lock().unwrap().queued = node;
    }

    pub fn set_current_best_payee(&self, payee: Option<Script>) {
        self.state.lock().unwrap().best_payee = payee;
    }

    pub fn set_registered_payee(&self, payee: Option<RegisteredPayee>) {
        self.state.lock().unwrap().registered_payee = payee;
    }
}

impl RankOracle for NullRegistry {
    fn best_height(&self) -> BlockHeight {
        self.state.lock().unwrap().best_height
    }

    fn enabled_count(&self) -> u32 {
        let state = self.state.lock().unwrap();
        state
            .enabled
            .unwrap_or((state.legacy.len() + state.deterministic.len()) as u32)
    }

    fn rank_at(&self, voter: &CollateralRef, _height: BlockHeight) -> Option<u32> {
        self.state.lock().unwrap().ranks.get(voter).copied()
    }

    fn resolve_deterministic(&self, voter: &CollateralRef) -> Option<OperatorPublicKey> {
        self.state.lock().unwrap().deterministic.get(voter).copied()
    }

    fn resolve_legacy(&self, voter: &CollateralRef) -> Option<KeyId> {
        self.state.lock().unwrap().legacy.get(voter).copied()
    }

    fn next_queued_for_payment(&self, _height: BlockHeight) -> Option<NodeRef> {
        self.state.lock().unwrap().queued.clone()
    }

    fn current_best_payee(&self, _height: BlockHeight) -> Option<Script> {
        self.state.lock().unwrap().best_payee.clone()
    }

    fn deterministic_payee(&self, _height: BlockHeight) -> Option<RegisteredPayee> {
        self.state.lock().unwrap().registered_payee.clone()
    }
}
