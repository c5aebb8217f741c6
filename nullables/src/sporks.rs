//! Nullable sporks.

use std::collections::HashSet;
use std::sync::Mutex;

use patriot_consensus::{Spork, SporkView};

/// All sporks off until enabled.
#[derive(Default)]
pub struct NullSporks {
    active: Mutex<HashSet<Spork>>,
}

impl NullSporks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, spork: Spork, active: bool) {
        let mut set = self.active.lock().unwrap();
        if active {
            set.insert(spork);
        } else {
            set.remove(&spork);
        }
    }
}

impl SporkView for NullSporks {
    fn is_active(&self, spork: Spork) -> bool {
        self.active.lock().unwrap().contains(&spork)
    }
}
