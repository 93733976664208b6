use crate::winwrap;
use projguard_core::platform::{DevicePlacement, DisplayPath, MonitorEndpoint, Platform};
use projguard_core::{Rect, Result, WindowHandle, WindowInfo};

/// Stateless [`Platform`] implementation; every call goes straight to the
/// OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Platform;

impl Win32Platform {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Platform for Win32Platform {
    fn enumerate_monitors(&self) -> Result<Vec<MonitorEndpoint>> {
        winwrap::displays::enumerate_monitors()
    }

    fn enumerate_devices(&self) -> Result<Vec<String>> {
        winwrap::displays::enumerate_devices()
    }

    fn query_display_paths(&self) -> Result<Vec<DisplayPath>> {
        winwrap::displays::query_display_paths()
    }

    fn apply_placements(&self, placements: &[DevicePlacement]) -> Result<()> {
        winwrap::displays::apply_placements(placements)
    }

    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>> {
        winwrap::windows::enumerate_windows()
    }

    fn window_process(&self, handle: WindowHandle) -> Result<String> {
        winwrap::windows::window_process(handle)
    }

    fn is_window_valid(&self, handle: WindowHandle) -> bool {
        winwrap::windows::is_window_valid(handle)
    }

    fn move_window(&self, handle: WindowHandle, rect: Rect) -> Result<()> {
        winwrap::windows::move_window(handle, rect)
    }

    fn pointer_button_down(&self) -> bool {
        winwrap::windows::pointer_button_down()
    }
}
