//! The placement policy: decides whether a window may stay where it is.
use super::Enforcer;
use crate::models::{TopologySnapshot, WindowInfo};
use crate::platform::Platform;

/// The presentation application gets behavioral treatment instead of an
/// allow-list entry: its full-screen slideshow surface is always welcome,
/// its ordinary editor window never is.
pub(crate) const PRESENTATION_PROCESS: &str = "POWERPNT.EXE";
/// Window class of the active full-screen slideshow surface.
pub(crate) const SLIDESHOW_CLASS: &str = "screenClass";

/// Shell and worker surfaces that are never relocation candidates.
const SYSTEM_CLASSES: &[&str] = &[
    "Shell_TrayWnd",
    "Shell_SecondaryTrayWnd",
    "Progman",
    "WorkerW",
];

pub(crate) fn is_system_surface(window: &WindowInfo) -> bool {
    window.title.is_empty() || SYSTEM_CLASSES.contains(&window.window_class.as_str())
}

impl<P: Platform> Enforcer<P> {
    /// Whether the window must be relocated to the primary monitor.
    #[must_use]
    pub fn should_move(&self, window: &WindowInfo, snapshot: &TopologySnapshot) -> bool {
        self.classify(window, snapshot).0
    }

    /// The policy decision plus the resolved process name, evaluated in
    /// strict priority order.
    pub(crate) fn classify(
        &self,
        window: &WindowInfo,
        snapshot: &TopologySnapshot,
    ) -> (bool, Option<String>) {
        if !self.enabled {
            return (false, None);
        }
        let process = match self.platform.window_process(window.handle) {
            Ok(process) => process,
            Err(err) => {
                // Fail-safe: an unidentifiable process is denied residency
                // on protected monitors.
                tracing::debug!(%err, title = %window.title, "process identity unresolved");
                return (self.on_protected(window, snapshot), None);
            }
        };
        if process == PRESENTATION_PROCESS {
            if window.window_class == SLIDESHOW_CLASS {
                return (false, Some(process));
            }
            // The editor window skips the allow-list entirely; even an
            // allow-listed executable doesn't buy it residency.
            return (self.on_protected(window, snapshot), Some(process));
        }
        if self.allowlist.is_allowed(&process) {
            return (false, Some(process));
        }
        if let Some(allowed_id) = &self.protected.always_allowed {
            if let Some(monitor) = snapshot.by_device_id(allowed_id) {
                let (x, y) = window.center();
                if monitor.contains_point(x, y) {
                    return (false, Some(process));
                }
            }
        }
        (self.on_protected(window, snapshot), Some(process))
    }

    /// Center-point membership against the protected monitors.
    fn on_protected(&self, window: &WindowInfo, snapshot: &TopologySnapshot) -> bool {
        let (x, y) = window.center();
        snapshot
            .monitors()
            .iter()
            .any(|m| self.protected.is_protected(&m.device_id) && m.contains_point(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::models::{Rect, WindowHandle};
    use crate::platform::FakePlatform;

    const PROTECTED: &str = r"\\.\DISPLAY2";

    fn window(handle: u64, class: &str, rect: Rect) -> WindowInfo {
        WindowInfo {
            handle: WindowHandle(handle),
            title: "some window".into(),
            window_class: class.into(),
            rect,
        }
    }

    fn on_projector() -> Rect {
        // Center lands at (2880, 540), inside DISPLAY2.
        Rect::new(2400, 200, 3360, 880)
    }

    fn on_primary() -> Rect {
        Rect::new(100, 100, 900, 700)
    }

    fn enforcer_with(
        fake: FakePlatform,
        config: &TestConfig,
    ) -> (Enforcer<FakePlatform>, TopologySnapshot) {
        let mut enforcer = Enforcer::new_test(fake, config);
        let snapshot = enforcer.topology.get_monitors();
        (enforcer, snapshot)
    }

    fn config() -> TestConfig {
        TestConfig {
            protected: vec![PROTECTED.into()],
            ..TestConfig::default()
        }
    }

    #[test]
    fn windows_off_protected_monitors_are_never_moved() {
        let fake = FakePlatform::with_dual_monitors();
        fake.add_window(1, "W", "Notepad", on_primary(), "NOTEPAD.EXE");
        let (enforcer, snapshot) = enforcer_with(fake, &config());
        let w = window(1, "Notepad", on_primary());
        assert!(!enforcer.should_move(&w, &snapshot));
    }

    #[test]
    fn a_stranger_on_a_protected_monitor_is_moved() {
        let fake = FakePlatform::with_dual_monitors();
        fake.add_window(1, "W", "Notepad", on_projector(), "NOTEPAD.EXE");
        let (enforcer, snapshot) = enforcer_with(fake, &config());
        let w = window(1, "Notepad", on_projector());
        assert!(enforcer.should_move(&w, &snapshot));
    }

    #[test]
    fn allow_listed_processes_may_stay() {
        let fake = FakePlatform::with_dual_monitors();
        fake.add_window(1, "W", "Qt5152QWindowIcon", on_projector(), "OBS64.EXE");
        let (enforcer, snapshot) = enforcer_with(fake, &config());
        let w = window(1, "Qt5152QWindowIcon", on_projector());
        assert!(!enforcer.should_move(&w, &snapshot));
    }

    #[test]
    fn the_slideshow_surface_is_always_allowed() {
        let fake = FakePlatform::with_dual_monitors();
        fake.add_window(1, "W", SLIDESHOW_CLASS, on_projector(), PRESENTATION_PROCESS);
        let (enforcer, snapshot) = enforcer_with(fake, &config());
        let w = window(1, SLIDESHOW_CLASS, on_projector());
        assert!(!enforcer.should_move(&w, &snapshot));
    }

    #[test]
    fn the_presentation_editor_is_restricted_despite_the_allow_list() {
        let fake = FakePlatform::with_dual_monitors();
        fake.add_window(1, "W", "PPTFrameClass", on_projector(), PRESENTATION_PROCESS);
        let (enforcer, snapshot) = enforcer_with(fake, &config());
        // POWERPNT.EXE is in the default allow-list, but the editor window
        // is still evicted from the protected monitor.
        assert!(enforcer.allowlist().is_allowed(PRESENTATION_PROCESS));
        let w = window(1, "PPTFrameClass", on_projector());
        assert!(enforcer.should_move(&w, &snapshot));
    }

    #[test]
    fn the_presentation_editor_is_fine_elsewhere() {
        let fake = FakePlatform::with_dual_monitors();
        fake.add_window(1, "W", "PPTFrameClass", on_primary(), PRESENTATION_PROCESS);
        let (enforcer, snapshot) = enforcer_with(fake, &config());
        let w = window(1, "PPTFrameClass", on_primary());
        assert!(!enforcer.should_move(&w, &snapshot));
    }

    #[test]
    fn an_unresolvable_process_is_denied_residency() {
        let fake = FakePlatform::with_dual_monitors();
        // No process entry registered for this window.
        fake.add_window(1, "W", "Mystery", on_projector(), "");
        let (enforcer, snapshot) = enforcer_with(fake, &config());
        let w = window(1, "Mystery", on_projector());
        assert!(enforcer.should_move(&w, &snapshot));
        // But an unidentifiable window off protected ground is left alone.
        let w = window(1, "Mystery", on_primary());
        assert!(!enforcer.should_move(&w, &snapshot));
    }

    #[test]
    fn the_always_allowed_monitor_trumps_protection() {
        let fake = FakePlatform::with_dual_monitors();
        fake.add_window(1, "W", "Notepad", on_projector(), "NOTEPAD.EXE");
        let config = TestConfig {
            protected: vec![PROTECTED.into()],
            always_allowed: Some(PROTECTED.into()),
            ..TestConfig::default()
        };
        let (enforcer, snapshot) = enforcer_with(fake, &config);
        let w = window(1, "Notepad", on_projector());
        assert!(!enforcer.should_move(&w, &snapshot));
    }

    #[test]
    fn a_disabled_engine_moves_nothing() {
        let fake = FakePlatform::with_dual_monitors();
        fake.add_window(1, "W", "Notepad", on_projector(), "NOTEPAD.EXE");
        let config = TestConfig {
            enabled: Some(false),
            protected: vec![PROTECTED.into()],
            ..TestConfig::default()
        };
        let (enforcer, snapshot) = enforcer_with(fake, &config);
        let w = window(1, "Notepad", on_projector());
        assert!(!enforcer.should_move(&w, &snapshot));
    }

    #[test]
    fn a_straddling_window_belongs_to_its_center_monitor() {
        let fake = FakePlatform::with_dual_monitors();
        // Spans the seam at x=1920 but centers on the primary.
        let rect = Rect::new(1000, 100, 2200, 700);
        fake.add_window(1, "W", "Notepad", rect, "NOTEPAD.EXE");
        let (enforcer, snapshot) = enforcer_with(fake, &config());
        let w = window(1, "Notepad", rect);
        assert!(!enforcer.should_move(&w, &snapshot));
        // Shifted right, the center crosses onto the projector.
        let rect = Rect::new(1700, 100, 2900, 700);
        let w = window(1, "Notepad", rect);
        assert!(enforcer.should_move(&w, &snapshot));
    }
}
