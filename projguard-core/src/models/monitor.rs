//! Monitor information.
#![allow(clippy::module_name_repetitions)]
use super::Rect;
use serde::{Deserialize, Serialize};

/// One physical display surface.
///
/// The `device_id` is the canonical OS device path (e.g. `\\.\DISPLAY1`) and
/// is the only identity safe to persist; the `handle` is only meaningful for
/// the lifetime of the snapshot it was enumerated into.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub device_id: String,
    pub handle: u64,
    pub bounds: Rect,
    pub work_area: Rect,
    pub is_primary: bool,
    pub friendly_name: Option<String>,
}

impl Monitor {
    /// Width and height derived from the full bounds.
    #[must_use]
    pub const fn resolution(&self) -> (i32, i32) {
        (self.bounds.width(), self.bounds.height())
    }

    #[must_use]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.bounds.contains_point(x, y)
    }

    /// Human-facing label: the friendly name when resolved, otherwise the
    /// device path.
    #[must_use]
    pub fn label(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or(&self.device_id)
    }
}

/// A monitor enriched with its clone relationship. Only used for
/// presentation and selection, never for enforcement decisions.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MonitorGroup {
    pub monitor: Monitor,
    pub is_clone: bool,
    /// Best-effort reference to the cloned original; `None` when the shared
    /// source was found but the original could not be disambiguated.
    pub clone_of: Option<String>,
}
