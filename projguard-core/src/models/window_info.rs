//! Transient window information, re-derived on every tick.
#![allow(clippy::module_name_repetitions)]
use super::Rect;
use serde::{Deserialize, Serialize};

/// OS window handle. Only valid for as long as the window exists; never use
/// it as a persistent key.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct WindowHandle(pub u64);

/// A visible top-level window as seen during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    pub window_class: String,
    pub rect: Rect,
}

impl WindowInfo {
    /// The center point decides which monitor owns the window, even when it
    /// straddles two displays.
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        self.rect.center()
    }
}
