//! Objects shared by the topology service and the enforcement engine.
mod monitor;
mod protected_set;
mod rect;
mod snapshot;
mod stats;
mod window_info;

pub use monitor::Monitor;
pub use monitor::MonitorGroup;
pub use protected_set::ProtectedSet;
pub use rect::Rect;
pub use snapshot::TopologyKind;
pub use snapshot::TopologySnapshot;
pub use stats::EnforcementStats;
pub use window_info::WindowHandle;
pub use window_info::WindowInfo;
