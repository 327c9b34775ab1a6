//! # Sync Guard
//!
//! Per-broker in-progress tracking for catalog fetches.
//!
//! At most one relist per broker name is in flight. A caller that finds the
//! name already in progress does not wait and does not relist; it returns
//! right away and the in-flight call does the work.
//!
//! The lock is held only while the set is read or written, never across a
//! network call. [`SyncPermit`] releases the name when dropped, so a fetch that
//! fails, panics or is cancelled mid-flight still returns the name to idle.
//!
//! There is no expiry: a relist that never completes keeps its name in
//! progress until the process restarts.

use crate::observability::metrics;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct SyncGuard {
    in_progress: Mutex<HashSet<String>>,
}

impl SyncGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` in progress. Returns `false` if it already was.
    pub fn set_in_progress(&self, name: &str) -> bool {
        let acquired = self.lock().insert(name.to_string());
        if acquired {
            metrics::increment_syncs_in_progress();
        }
        acquired
    }

    /// Return `name` to idle. Unknown names are ignored.
    pub fn unset_in_progress(&self, name: &str) {
        if self.lock().remove(name) {
            metrics::decrement_syncs_in_progress();
        }
    }

    #[must_use]
    pub fn is_in_progress(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    /// Claim `name` for the lifetime of the returned permit.
    /// `None` when another fetch for `name` is in flight.
    #[must_use]
    pub fn try_acquire(&self, name: &str) -> Option<SyncPermit<'_>> {
        self.set_in_progress(name).then(|| SyncPermit {
            guard: self,
            name: name.to_string(),
        })
    }

    // A panic while holding the lock cannot leave the set half-updated
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.in_progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive claim on one broker name, released on drop
#[derive(Debug)]
pub struct SyncPermit<'a> {
    guard: &'a SyncGuard,
    name: String,
}

impl SyncPermit<'_> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for SyncPermit<'_> {
    fn drop(&mut self) {
        self.guard.unset_in_progress(&self.name);
    }
}
