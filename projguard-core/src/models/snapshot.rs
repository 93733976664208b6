//! A cached, timestamped view of the attached monitors.
#![allow(clippy::module_name_repetitions)]
use super::Monitor;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Diagnostic classification of the current display arrangement. Never
/// consulted by the placement policy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyKind {
    Single,
    Extend,
    Clone,
    Unknown,
}

/// An immutable ordered set of monitors taken at one point in time.
///
/// Invariants: device ids are pairwise unique and at most one monitor is
/// primary. A snapshot with no primary is degraded; enforcement treats the
/// primary as unavailable and skips the tick.
#[derive(Debug, Clone)]
pub struct TopologySnapshot {
    monitors: Vec<Monitor>,
    taken_at: Instant,
}

impl TopologySnapshot {
    #[must_use]
    pub fn new(monitors: Vec<Monitor>) -> Self {
        debug_assert!(
            monitors.iter().filter(|m| m.is_primary).count() <= 1,
            "snapshot with more than one primary monitor"
        );
        Self {
            monitors,
            taken_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    #[must_use]
    pub fn primary(&self) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.is_primary)
    }

    /// Number of monitors other than the primary.
    #[must_use]
    pub fn secondary_count(&self) -> usize {
        self.monitors.iter().filter(|m| !m.is_primary).count()
    }

    #[must_use]
    pub fn by_device_id(&self, device_id: &str) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.device_id == device_id)
    }

    /// Handle lookup is best-effort and only valid within the tick the
    /// snapshot was taken in.
    #[must_use]
    pub fn by_handle(&self, handle: u64) -> Option<&Monitor> {
        self.monitors
            .iter()
            .find(|m| m.handle == handle && m.handle != 0)
    }

    #[must_use]
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.taken_at.elapsed() < ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rect;

    fn monitor(id: &str, handle: u64, primary: bool) -> Monitor {
        Monitor {
            device_id: id.into(),
            handle,
            bounds: Rect::new(0, 0, 1920, 1080),
            work_area: Rect::new(0, 0, 1920, 1040),
            is_primary: primary,
            friendly_name: None,
        }
    }

    #[test]
    fn primary_and_secondary_count() {
        let snapshot = TopologySnapshot::new(vec![
            monitor(r"\\.\DISPLAY1", 1, true),
            monitor(r"\\.\DISPLAY2", 2, false),
            monitor(r"\\.\DISPLAY3", 3, false),
        ]);
        assert_eq!(
            snapshot.primary().map(|m| m.device_id.clone()),
            Some(r"\\.\DISPLAY1".to_string())
        );
        assert_eq!(snapshot.secondary_count(), 2);
    }

    #[test]
    fn degraded_snapshot_has_no_primary() {
        let snapshot = TopologySnapshot::new(vec![monitor(r"\\.\DISPLAY2", 2, false)]);
        assert!(snapshot.primary().is_none());
    }

    #[test]
    fn handle_zero_never_matches() {
        // Synthetic clone entries carry a zero handle.
        let snapshot = TopologySnapshot::new(vec![monitor(r"\\.\DISPLAY3", 0, false)]);
        assert!(snapshot.by_handle(0).is_none());
        assert!(snapshot.by_device_id(r"\\.\DISPLAY3").is_some());
    }

    #[test]
    fn freshness_follows_the_ttl() {
        let snapshot = TopologySnapshot::empty();
        assert!(snapshot.is_fresh(Duration::from_secs(5)));
        assert!(!snapshot.is_fresh(Duration::ZERO));
    }
}
