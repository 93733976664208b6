//! The set of protected monitors, keyed by device path.
#![allow(clippy::module_name_repetitions)]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which monitors the engine enforces on. Replaced wholesale when the
/// configuration changes; the engine never edits it in place.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedSet {
    pub device_ids: BTreeSet<String>,
    /// A monitor on which every window is allowed, regardless of the
    /// allow-list. Typically the designated primary.
    pub always_allowed: Option<String>,
}

impl ProtectedSet {
    #[must_use]
    pub fn new(device_ids: BTreeSet<String>, always_allowed: Option<String>) -> Self {
        Self {
            device_ids,
            always_allowed,
        }
    }

    #[must_use]
    pub fn is_protected(&self, device_id: &str) -> bool {
        self.device_ids.contains(device_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.device_ids.is_empty()
    }
}
