//! Loading indicator state.
//!
//! Each `start` opens a new epoch. A delayed stop carries the epoch it was
//! scheduled in and is ignored if another navigation has started since.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct LoadingIndicator {
    active: AtomicBool,
    epoch: AtomicU64,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the indicator. Returns the new epoch.
    pub fn start(&self) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.active.store(true, Ordering::SeqCst);
        epoch
    }

    /// Hide the indicator if no navigation started after `epoch`.
    /// Returns whether the indicator was hidden.
    pub fn stop(&self, epoch: u64) -> bool {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return false;
        }
        self.active.swap(false, Ordering::SeqCst)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
