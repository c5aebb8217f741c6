//! Nullable sync status: flip the node's sync state from the test.

use std::sync::atomic::{AtomicBool, Ordering};

use patriot_consensus::SyncStatus;

/// Fully synced unless told otherwise.
pub struct NullSyncStatus {
    synced: AtomicBool,
    blockchain: AtomicBool,
    list: AtomicBool,
}

impl NullSyncStatus {
    pub fn synced() -> Self {
        Self {
            synced: AtomicBool::new(true),
            blockchain: AtomicBool::new(true),
            list: AtomicBool::new(true),
        }
    }

    pub fn unsynced() -> Self {
        let status = Self::synced();
        status.set_all(false);
        status
    }

    pub fn set_synced(&self, value: bool) {
        self.synced.store(value, Ordering::SeqCst);
    }

    pub fn set_blockchain_synced(&self, value: bool) {
        self.blockchain.store(value, Ordering::SeqCst);
    }

    pub fn set_list_synced(&self, value: bool) {
        self.list.store(value, Ordering::SeqCst);
    }

    pub fn set_all(&self, value: bool) {
        self.set_synced(value);
        self.set_blockchain_synced(value);
        self.set_list_synced(value);
    }
}

impl Default for NullSyncStatus {
    fn default() -> Self {
        Self::synced()
    }
}

impl SyncStatus for NullSyncStatus {
    fn is_synced(&self) -> bool {
        self.synced.load(Ordering::SeqCst)
    }

    fn is_blockchain_synced(&self) -> bool {
        self.blockchain.load(Ordering::SeqCst)
    }

    fn is_list_synced(&self) -> bool {
        self.list.load(Ordering::SeqCst)
    }
}
