//! The configuration surface the core consumes.
use std::collections::BTreeSet;
use std::time::Duration;

/// Lower bound on the poll interval; anything smaller hammers the OS query
/// APIs for no benefit.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long a moved window is left alone before it may be moved again.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
/// How long a topology snapshot is served from cache.
pub const DEFAULT_TOPOLOGY_TTL: Duration = Duration::from_secs(5);

pub trait Config {
    fn enabled(&self) -> bool;

    /// Device paths of the monitors to protect.
    fn protected_device_ids(&self) -> BTreeSet<String>;

    /// Device path of a monitor every window is allowed on, if any.
    fn always_allowed_device_id(&self) -> Option<String>;

    /// How often the scheduler invokes the engine tick. Implementations
    /// must clamp this to at least [`MIN_POLL_INTERVAL`].
    fn poll_interval(&self) -> Duration;

    fn debounce(&self) -> Duration;

    fn topology_ttl(&self) -> Duration;

    /// Allow-list entries beyond the built-in defaults.
    fn allowed_processes(&self) -> Vec<String>;
}

#[cfg(test)]
#[allow(clippy::module_name_repetitions)]
#[derive(Default)]
pub struct TestConfig {
    pub enabled: Option<bool>,
    pub protected: Vec<String>,
    pub always_allowed: Option<String>,
    pub allowed: Vec<String>,
    pub debounce: Option<Duration>,
    pub topology_ttl: Option<Duration>,
}

#[cfg(test)]
impl Config for TestConfig {
    fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
    fn protected_device_ids(&self) -> BTreeSet<String> {
        self.protected.iter().cloned().collect()
    }
    fn always_allowed_device_id(&self) -> Option<String> {
        self.always_allowed.clone()
    }
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(500)
    }
    fn debounce(&self) -> Duration {
        self.debounce.unwrap_or(DEFAULT_DEBOUNCE)
    }
    fn topology_ttl(&self) -> Duration {
        self.topology_ttl.unwrap_or(DEFAULT_TOPOLOGY_TTL)
    }
    fn allowed_processes(&self) -> Vec<String> {
        self.allowed.clone()
    }
}
