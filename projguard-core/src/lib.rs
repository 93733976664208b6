//! Core of ProjGuard: monitor topology tracking and window placement
//! enforcement for protected (projector) displays.
// We deny clippy pedantic lints, primarily to keep code as correct as possible
// Remember, the goal of ProjGuard is to do one thing and to do that one thing
// well: keep unapproved windows off protected monitors.
#![warn(clippy::pedantic)]
// Each of these lints are globally allowed because they otherwise make a lot
// of noise. However, work to ensure that each use of one of these is correct
// would be very much appreciated.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::default_trait_access
)]
pub mod allowlist;
pub mod config;
pub mod enforcer;
pub mod errors;
pub mod models;
pub mod platform;
pub mod topology;

pub use allowlist::AllowList;
pub use config::Config;
pub use enforcer::{Enforcer, MoveEvent};
pub use errors::{GuardError, Result};
pub use models::Monitor;
pub use models::MonitorGroup;
pub use models::ProtectedSet;
pub use models::Rect;
pub use models::TopologySnapshot;
pub use models::WindowHandle;
pub use models::WindowInfo;
pub use platform::Platform;
pub use topology::TopologyService;
