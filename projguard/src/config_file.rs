//! The on-disk configuration, a single JSON file next to the executable.
//!
//! The schema is versioned. Pre-versioned files identified protected
//! monitors by 1-based enumeration index, which is not stable across
//! reboots or cable reconnects; loading migrates them once to device
//! paths against the live topology.
use anyhow::{Context, Result};
use projguard_core::config::{Config, DEFAULT_TOPOLOGY_TTL, MIN_POLL_INTERVAL};
use projguard_core::{AllowList, TopologySnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const CURRENT_VERSION: u32 = 2;

/// Schema version assumed for files written before the field existed.
const fn unversioned() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    #[serde(default = "unversioned")]
    pub version: u32,
    pub enabled: bool,
    pub protected_device_ids: BTreeSet<String>,
    pub always_allowed_device_id: Option<String>,
    pub poll_interval_ms: u64,
    pub debounce_ms: u64,
    pub whitelist: Vec<String>,
    pub custom_whitelist: Vec<String>,
    /// Legacy keys from the pre-versioned schema. Consumed by
    /// [`ConfigFile::migrate`], never written back.
    #[serde(rename = "protected_monitors", skip_serializing)]
    pub legacy_protected_monitors: Option<Vec<usize>>,
    #[serde(rename = "protection_enabled", skip_serializing)]
    pub legacy_protection_enabled: Option<bool>,
    #[serde(rename = "check_interval_ms", skip_serializing)]
    pub legacy_check_interval_ms: Option<u64>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            enabled: true,
            protected_device_ids: BTreeSet::new(),
            always_allowed_device_id: None,
            poll_interval_ms: 500,
            debounce_ms: 500,
            whitelist: AllowList::defaults(),
            custom_whitelist: Vec::new(),
            legacy_protected_monitors: None,
            legacy_protection_enabled: None,
            legacy_check_interval_ms: None,
        }
    }
}

impl ConfigFile {
    /// Load the file, writing out defaults when it doesn't exist yet. An
    /// unreadable file logs a warning and yields defaults rather than
    /// failing startup.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        match serde_json::from_str(&raw) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "unparsable config, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("serializing config")?;
        fs::write(path, raw).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// One-time schema upgrade, run once at load against the live
    /// topology. Returns `true` when the file should be rewritten.
    pub fn migrate(&mut self, snapshot: &TopologySnapshot) -> bool {
        let mut changed = false;
        if let Some(indices) = self.legacy_protected_monitors.take() {
            for index in indices {
                match index.checked_sub(1).and_then(|i| snapshot.monitors().get(i)) {
                    Some(monitor) => {
                        tracing::info!(
                            index,
                            device_id = %monitor.device_id,
                            "migrated legacy monitor index to device path"
                        );
                        self.protected_device_ids.insert(monitor.device_id.clone());
                    }
                    None => {
                        tracing::warn!(index, "legacy monitor index has no attached monitor, dropped");
                    }
                }
            }
            changed = true;
        }
        if let Some(enabled) = self.legacy_protection_enabled.take() {
            self.enabled = enabled;
            changed = true;
        }
        if let Some(interval_ms) = self.legacy_check_interval_ms.take() {
            self.poll_interval_ms = interval_ms;
            changed = true;
        }
        if self.version != CURRENT_VERSION {
            self.version = CURRENT_VERSION;
            changed = true;
        }
        changed
    }
}

impl Config for ConfigFile {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn protected_device_ids(&self) -> BTreeSet<String> {
        self.protected_device_ids.clone()
    }

    fn always_allowed_device_id(&self) -> Option<String> {
        self.always_allowed_device_id.clone()
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(MIN_POLL_INTERVAL)
    }

    fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    fn topology_ttl(&self) -> Duration {
        DEFAULT_TOPOLOGY_TTL
    }

    fn allowed_processes(&self) -> Vec<String> {
        self.whitelist
            .iter()
            .chain(self.custom_whitelist.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projguard_core::{Monitor, Rect};

    fn snapshot() -> TopologySnapshot {
        let monitor = |id: &str, handle: u64, primary: bool, offset: i32| Monitor {
            device_id: id.into(),
            handle,
            bounds: Rect::new(offset, 0, offset + 1920, 1080),
            work_area: Rect::new(offset, 0, offset + 1920, 1040),
            is_primary: primary,
            friendly_name: None,
        };
        TopologySnapshot::new(vec![
            monitor(r"\\.\DISPLAY1", 1, true, 0),
            monitor(r"\\.\DISPLAY2", 2, false, 1920),
        ])
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert!(path.exists());
        assert_eq!(ConfigFile::load(&path).unwrap(), config);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = ConfigFile::default();
        config.protected_device_ids.insert(r"\\.\DISPLAY2".into());
        config.custom_whitelist.push("VLC.EXE".into());
        config.save(&path).unwrap();
        assert_eq!(ConfigFile::load(&path).unwrap(), config);
    }

    #[test]
    fn unparsable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ConfigFile::load(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn legacy_indices_resolve_to_device_paths() {
        let raw = r#"{
            "protection_enabled": true,
            "protected_monitors": [2, 3],
            "whitelist": ["POWERPNT.EXE"]
        }"#;
        let mut config: ConfigFile = serde_json::from_str(raw).unwrap();
        assert_eq!(config.version, 1);
        assert!(config.migrate(&snapshot()));
        assert_eq!(config.version, CURRENT_VERSION);
        assert!(config.legacy_protected_monitors.is_none());
        assert!(config.enabled);
        // Index 2 resolves to the second monitor, index 3 has nothing
        // attached and is dropped.
        assert_eq!(
            config.protected_device_ids,
            BTreeSet::from([r"\\.\DISPLAY2".to_string()])
        );
    }

    #[test]
    fn legacy_enabled_and_interval_survive_migration() {
        let raw = r#"{
            "protection_enabled": false,
            "check_interval_ms": 1000,
            "protected_monitors": [2]
        }"#;
        let mut config: ConfigFile = serde_json::from_str(raw).unwrap();
        assert!(config.migrate(&snapshot()));
        assert!(!config.enabled);
        assert_eq!(config.poll_interval_ms, 1000);
        // The rewritten file carries the values under the new keys only.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        config.save(&path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("protection_enabled"));
        assert!(!raw.contains("check_interval_ms"));
        let reloaded = ConfigFile::load(&path).unwrap();
        assert!(!reloaded.enabled);
        assert_eq!(reloaded.poll_interval_ms, 1000);
    }

    #[test]
    fn current_files_do_not_need_migration() {
        let mut config = ConfigFile::default();
        assert!(!config.migrate(&snapshot()));
    }

    #[test]
    fn the_poll_interval_is_clamped() {
        let config = ConfigFile {
            poll_interval_ms: 10,
            ..ConfigFile::default()
        };
        assert_eq!(config.poll_interval(), MIN_POLL_INTERVAL);
    }

    #[test]
    fn allowed_processes_merge_both_lists() {
        let config = ConfigFile {
            custom_whitelist: vec!["VLC.EXE".into()],
            ..ConfigFile::default()
        };
        let allowed = config.allowed_processes();
        assert!(allowed.contains(&"OBS64.EXE".to_string()));
        assert!(allowed.contains(&"VLC.EXE".to_string()));
    }
}
