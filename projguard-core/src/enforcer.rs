//! Window enforcement engine.
//!
//! Single-threaded and poll-driven: an external scheduler calls [`Enforcer::tick`]
//! periodically, everything inside a tick is synchronous. Configuration
//! mutators replace whole values between ticks; no locks are involved.
mod ledger;
mod policy;

use crate::allowlist::AllowList;
use crate::config::Config;
use crate::models::{
    EnforcementStats, Monitor, ProtectedSet, Rect, TopologySnapshot, WindowHandle, WindowInfo,
};
use crate::platform::Platform;
use crate::topology::TopologyService;
use ledger::{DeferredSet, MoveLedger};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Offset from the primary work-area origin a relocated window lands at.
const MOVE_PADDING: i32 = 20;

/// Emitted to the registered observer after every successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEvent {
    pub handle: WindowHandle,
    pub process_name: String,
    pub title: String,
}

pub struct Enforcer<P: Platform> {
    platform: Arc<P>,
    topology: TopologyService<P>,
    allowlist: AllowList,
    protected: ProtectedSet,
    enabled: bool,
    debounce: Duration,
    dragging: bool,
    ledger: MoveLedger,
    deferred: DeferredSet,
    stats: EnforcementStats,
    events: Option<mpsc::UnboundedSender<MoveEvent>>,
}

impl<P: Platform> Enforcer<P> {
    pub fn new(platform: Arc<P>, config: &impl Config) -> Self {
        let topology = TopologyService::new(platform.clone(), config.topology_ttl());
        let mut allowlist = AllowList::default();
        for entry in config.allowed_processes() {
            allowlist.add(&entry, true);
        }
        Self {
            platform,
            topology,
            allowlist,
            protected: ProtectedSet::new(
                config.protected_device_ids(),
                config.always_allowed_device_id(),
            ),
            enabled: config.enabled(),
            debounce: config.debounce(),
            dragging: false,
            ledger: MoveLedger::default(),
            deferred: DeferredSet::default(),
            stats: EnforcementStats::default(),
            events: None,
        }
    }

    /// Evaluate every visible window once and relocate the violators.
    /// Returns the number of windows moved. Never propagates an error;
    /// every failure degrades to a skip or a fail-safe move.
    pub fn tick(&mut self) -> usize {
        if !self.enabled {
            return 0;
        }
        let snapshot = self.topology.get_monitors();
        if snapshot.secondary_count() == 0 {
            return 0;
        }
        let Some(primary) = snapshot.primary().cloned() else {
            tracing::debug!("degraded topology: no primary monitor, skipping tick");
            return 0;
        };
        let now = Instant::now();
        self.ledger.prune(now, self.debounce);

        self.dragging = self.platform.pointer_button_down();

        let windows = match self.platform.enumerate_windows() {
            Ok(windows) => windows,
            Err(err) => {
                tracing::warn!(%err, "window enumeration failed, skipping tick");
                return 0;
            }
        };

        // Any tick without a drag in progress drains the deferral set;
        // keying on the drag-end transition would strand entries when the
        // transition tick is skipped (failed enumeration).
        let mut moved = 0;
        if !self.dragging && !self.deferred.is_empty() {
            moved += self.flush_deferred(&windows, &snapshot, &primary, now);
        }

        for window in &windows {
            if policy::is_system_surface(window) {
                continue;
            }
            if self.ledger.within(window.handle, now, self.debounce) {
                continue;
            }
            let (should_move, process) = self.classify(window, &snapshot);
            if !should_move {
                continue;
            }
            if self.dragging {
                // Don't fight a manual drag; revisit when the button is
                // released.
                self.deferred.insert(window.handle);
                continue;
            }
            if self.apply_move(window, process.as_deref(), &primary, now) {
                moved += 1;
            }
        }
        moved
    }

    /// Re-evaluate the windows parked while a drag was in progress.
    fn flush_deferred(
        &mut self,
        windows: &[WindowInfo],
        snapshot: &TopologySnapshot,
        primary: &Monitor,
        now: Instant,
    ) -> usize {
        let mut moved = 0;
        for handle in self.deferred.take() {
            if !self.platform.is_window_valid(handle) {
                continue;
            }
            let Some(window) = windows.iter().find(|w| w.handle == handle) else {
                continue;
            };
            if self.ledger.within(handle, now, self.debounce) {
                continue;
            }
            let (should_move, process) = self.classify(window, snapshot);
            if !should_move {
                // The drag ended somewhere legal; nothing to enforce.
                continue;
            }
            if self.apply_move(window, process.as_deref(), primary, now) {
                moved += 1;
            }
        }
        moved
    }

    fn apply_move(
        &mut self,
        window: &WindowInfo,
        process_name: Option<&str>,
        primary: &Monitor,
        now: Instant,
    ) -> bool {
        let target = placement_rect(&window.rect, &primary.work_area);
        match self.platform.move_window(window.handle, target) {
            Ok(()) => {
                let process_name = process_name.unwrap_or("Unknown");
                self.ledger.record(window.handle, now);
                self.stats.record(process_name, &window.title);
                tracing::info!(
                    process = process_name,
                    title = %window.title,
                    "window relocated to primary monitor"
                );
                if let Some(events) = &self.events {
                    // A dropped receiver just means nobody is listening.
                    let _ = events.send(MoveEvent {
                        handle: window.handle,
                        process_name: process_name.to_string(),
                        title: window.title.clone(),
                    });
                }
                true
            }
            Err(err) => {
                tracing::warn!(%err, title = %window.title, "window move rejected");
                false
            }
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Swap in a new protected set; takes effect on the next tick.
    pub fn set_protected(&mut self, protected: ProtectedSet) {
        self.protected = protected;
    }

    #[must_use]
    pub fn protected(&self) -> &ProtectedSet {
        &self.protected
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    /// Register the move-event observer, replacing any previous one.
    pub fn set_event_sink(&mut self, events: mpsc::UnboundedSender<MoveEvent>) {
        self.events = Some(events);
    }

    #[must_use]
    pub fn stats(&self) -> &EnforcementStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    #[must_use]
    pub fn allowlist(&self) -> &AllowList {
        &self.allowlist
    }

    pub fn allowlist_mut(&mut self) -> &mut AllowList {
        &mut self.allowlist
    }

    pub fn topology_mut(&mut self) -> &mut TopologyService<P> {
        &mut self.topology
    }
}

/// Target rectangle on the primary work area: origin plus a fixed padding,
/// size clamped to the work area.
fn placement_rect(window: &Rect, work_area: &Rect) -> Rect {
    let width = window.width().min(work_area.width());
    let height = window.height().min(work_area.height());
    let left = work_area.left + MOVE_PADDING;
    let top = work_area.top + MOVE_PADDING;
    Rect::new(left, top, left + width, top + height)
}

#[cfg(test)]
impl Enforcer<crate::platform::FakePlatform> {
    pub(crate) fn new_test(
        fake: crate::platform::FakePlatform,
        config: &crate::config::TestConfig,
    ) -> Self {
        Self::new(Arc::new(fake), config)
    }
}
