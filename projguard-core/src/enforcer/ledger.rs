//! Per-tick bookkeeping: the move debounce ledger and the drag deferral
//! set. Neither holds cross-session state; stale entries die by TTL, not
//! by identity revalidation (the OS may reuse a handle after a window
//! closes).
use crate::models::WindowHandle;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Last-move timestamps, used to leave a window alone for the debounce
/// window after it was moved.
#[derive(Debug, Default)]
pub struct MoveLedger {
    entries: HashMap<WindowHandle, Instant>,
}

impl MoveLedger {
    pub fn record(&mut self, handle: WindowHandle, now: Instant) {
        self.entries.insert(handle, now);
    }

    #[must_use]
    pub fn within(&self, handle: WindowHandle, now: Instant, debounce: Duration) -> bool {
        self.entries
            .get(&handle)
            .is_some_and(|moved_at| now.duration_since(*moved_at) < debounce)
    }

    pub fn prune(&mut self, now: Instant, debounce: Duration) {
        self.entries
            .retain(|_, moved_at| now.duration_since(*moved_at) < debounce);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Windows whose violating state was seen mid-drag, pending re-evaluation
/// on the next tick without a drag in progress.
#[derive(Debug, Default)]
pub struct DeferredSet {
    handles: HashSet<WindowHandle>,
}

impl DeferredSet {
    pub fn insert(&mut self, handle: WindowHandle) {
        self.handles.insert(handle);
    }

    #[must_use]
    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.handles.contains(&handle)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Empty the set, yielding its members.
    pub fn take(&mut self) -> Vec<WindowHandle> {
        self.handles.drain().collect()
    }
}
