//! Scriptable platform for unit tests.
use super::{DevicePlacement, DisplayPath, MonitorEndpoint, Platform};
use crate::errors::{GuardError, Result};
use crate::models::{Rect, WindowHandle, WindowInfo};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct FakePlatform {
    pub monitors: RefCell<Vec<MonitorEndpoint>>,
    pub devices: RefCell<Vec<String>>,
    pub paths: RefCell<Vec<DisplayPath>>,
    pub windows: RefCell<Vec<WindowInfo>>,
    pub processes: RefCell<HashMap<WindowHandle, String>>,
    pub closed: RefCell<HashSet<WindowHandle>>,
    pub pointer_down: Cell<bool>,
    pub fail_enumeration: Cell<bool>,
    pub fail_window_enumeration: Cell<bool>,
    pub fail_moves: Cell<bool>,
    pub fail_placements: Cell<bool>,
    // call counters
    pub monitor_enumerations: Cell<usize>,
    pub window_enumerations: Cell<usize>,
    pub path_queries: Cell<usize>,
    // applied side effects
    pub moved: RefCell<Vec<(WindowHandle, Rect)>>,
    pub placements: RefCell<Vec<DevicePlacement>>,
}

impl FakePlatform {
    /// Primary `\\.\DISPLAY1` at (0,0)-(1920,1080) with a 40px taskbar, and
    /// `\\.\DISPLAY2` extending to its right.
    pub fn with_dual_monitors() -> Self {
        let fake = Self::default();
        fake.monitors.borrow_mut().extend([
            MonitorEndpoint {
                handle: 1,
                device_id: r"\\.\DISPLAY1".into(),
                bounds: Rect::new(0, 0, 1920, 1080),
                work_area: Rect::new(0, 0, 1920, 1040),
                is_primary: true,
            },
            MonitorEndpoint {
                handle: 2,
                device_id: r"\\.\DISPLAY2".into(),
                bounds: Rect::new(1920, 0, 3840, 1080),
                work_area: Rect::new(1920, 0, 3840, 1080),
                is_primary: false,
            },
        ]);
        *fake.devices.borrow_mut() = vec![r"\\.\DISPLAY1".into(), r"\\.\DISPLAY2".into()];
        fake
    }

    pub fn add_window(&self, handle: u64, title: &str, class: &str, rect: Rect, process: &str) {
        let handle = WindowHandle(handle);
        self.windows.borrow_mut().push(WindowInfo {
            handle,
            title: title.into(),
            window_class: class.into(),
            rect,
        });
        if !process.is_empty() {
            self.processes.borrow_mut().insert(handle, process.into());
        }
    }

    pub fn close_window(&self, handle: u64) {
        let handle = WindowHandle(handle);
        self.windows.borrow_mut().retain(|w| w.handle != handle);
        self.closed.borrow_mut().insert(handle);
    }
}

impl Platform for FakePlatform {
    fn enumerate_monitors(&self) -> Result<Vec<MonitorEndpoint>> {
        self.monitor_enumerations
            .set(self.monitor_enumerations.get() + 1);
        if self.fail_enumeration.get() {
            return Err(GuardError::Enumeration("scripted failure".into()));
        }
        Ok(self.monitors.borrow().clone())
    }

    fn enumerate_devices(&self) -> Result<Vec<String>> {
        if self.fail_enumeration.get() {
            return Err(GuardError::Enumeration("scripted failure".into()));
        }
        Ok(self.devices.borrow().clone())
    }

    fn query_display_paths(&self) -> Result<Vec<DisplayPath>> {
        self.path_queries.set(self.path_queries.get() + 1);
        Ok(self.paths.borrow().clone())
    }

    fn apply_placements(&self, placements: &[DevicePlacement]) -> Result<()> {
        if self.fail_placements.get() {
            return Err(GuardError::Reconfigure("access denied".into()));
        }
        self.placements.borrow_mut().extend_from_slice(placements);
        Ok(())
    }

    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>> {
        self.window_enumerations
            .set(self.window_enumerations.get() + 1);
        if self.fail_window_enumeration.get() {
            return Err(GuardError::WindowQuery("scripted failure".into()));
        }
        Ok(self.windows.borrow().clone())
    }

    fn window_process(&self, handle: WindowHandle) -> Result<String> {
        self.processes
            .borrow()
            .get(&handle)
            .cloned()
            .ok_or_else(|| GuardError::ProcessIdentity(format!("no process for {handle:?}")))
    }

    fn is_window_valid(&self, handle: WindowHandle) -> bool {
        !self.closed.borrow().contains(&handle)
            && self.windows.borrow().iter().any(|w| w.handle == handle)
    }

    fn move_window(&self, handle: WindowHandle, rect: Rect) -> Result<()> {
        if self.fail_moves.get() {
            return Err(GuardError::MoveRejected("access denied".into()));
        }
        if !self.is_window_valid(handle) {
            return Err(GuardError::MoveRejected(format!("stale handle {handle:?}")));
        }
        // The window is deliberately left where it was; tests rely on it
        // still violating on the next tick.
        self.moved.borrow_mut().push((handle, rect));
        Ok(())
    }

    fn pointer_button_down(&self) -> bool {
        self.pointer_down.get()
    }
}
