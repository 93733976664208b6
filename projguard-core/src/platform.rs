//! The narrow platform-capability interface the core depends on.
//!
//! Exactly the OS operations the topology service and the enforcement
//! engine need, nothing more. One concrete implementation wraps the host
//! OS; tests use [`FakePlatform`].
pub mod fake;

use crate::errors::Result;
use crate::models::{Rect, WindowHandle, WindowInfo};

pub use fake::FakePlatform;

/// One display as reported by the per-monitor enumeration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorEndpoint {
    pub handle: u64,
    pub device_id: String,
    pub bounds: Rect,
    pub work_area: Rect,
    pub is_primary: bool,
}

/// One active display-configuration path: which adapter source feeds which
/// output target. Two paths sharing adapter and source while targeting
/// different outputs are clones of one another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPath {
    pub device_id: String,
    pub adapter: u64,
    pub source: u32,
    pub target: u32,
    /// Monitor name as reported by the output, when available.
    pub monitor_name: Option<String>,
}

/// Requested position for one device when rearranging the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePlacement {
    pub device_id: String,
    pub position: (i32, i32),
    pub make_primary: bool,
}

pub trait Platform {
    /// Per-monitor enumeration: geometry, work area, primary flag and
    /// device path for every monitor the OS exposes individually.
    fn enumerate_monitors(&self) -> Result<Vec<MonitorEndpoint>>;

    /// Display-device enumeration: device paths of everything attached to
    /// the desktop, including outputs hidden behind a shared handle
    /// (cloned monitors).
    fn enumerate_devices(&self) -> Result<Vec<String>>;

    /// Active display-configuration paths. Comparatively expensive; callers
    /// cache the derived results independently of the geometry cache.
    fn query_display_paths(&self) -> Result<Vec<DisplayPath>>;

    /// Rearrange the desktop. Privileged; the whole batch either applies or
    /// is rejected.
    fn apply_placements(&self, placements: &[DevicePlacement]) -> Result<()>;

    /// All currently visible top-level windows with title, class and rect.
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>>;

    /// Uppercased executable name of the window's owning process.
    fn window_process(&self, handle: WindowHandle) -> Result<String>;

    fn is_window_valid(&self, handle: WindowHandle) -> bool;

    /// Reposition a window without activating it or stealing focus.
    fn move_window(&self, handle: WindowHandle, rect: Rect) -> Result<()>;

    /// Whether the primary pointer button is currently held; stands in for
    /// "the user is dragging something".
    fn pointer_button_down(&self) -> bool;
}
