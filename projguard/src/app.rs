//! Process wiring: builds the platform, topology service and enforcer,
//! then drives the engine tick from a tokio interval. Configuration
//! mutations arrive over a command channel and are applied strictly
//! between ticks, so the engine never observes a half-updated state.
use crate::config_file::ConfigFile;
use projguard_core::{Enforcer, Platform, ProtectedSet};
use std::collections::BTreeSet;
use std::path::Path;
#[cfg(not(windows))]
use std::path::PathBuf;
#[cfg(not(windows))]
use tokio::sync::mpsc;

/// The surface a tray icon or settings dialog drives; publish through the
/// sender paired with the receiver handed to [`run`].
#[derive(Debug, Clone)]
pub enum AppCommand {
    SetEnabled(bool),
    SetProtected(BTreeSet<String>),
    AllowProcess(String),
    DisallowProcess(String),
    ResetStats,
    Shutdown,
}

/// Apply one UI command between ticks. Returns `true` on shutdown.
#[cfg_attr(not(windows), allow(dead_code))]
fn apply_command<P: Platform>(
    enforcer: &mut Enforcer<P>,
    config: &mut ConfigFile,
    config_path: &Path,
    command: AppCommand,
) -> bool {
    match command {
        AppCommand::SetEnabled(enabled) => {
            enforcer.set_enabled(enabled);
            config.enabled = enabled;
            persist(config, config_path);
        }
        AppCommand::SetProtected(device_ids) => {
            enforcer.set_protected(ProtectedSet::new(
                device_ids.clone(),
                config.always_allowed_device_id.clone(),
            ));
            config.protected_device_ids = device_ids;
            persist(config, config_path);
        }
        AppCommand::AllowProcess(name) => {
            enforcer.allowlist_mut().add(&name, true);
            config.custom_whitelist = enforcer.allowlist().custom();
            persist(config, config_path);
        }
        AppCommand::DisallowProcess(name) => {
            enforcer.allowlist_mut().remove(&name);
            config.custom_whitelist = enforcer.allowlist().custom();
            persist(config, config_path);
        }
        AppCommand::ResetStats => enforcer.reset_stats(),
        AppCommand::Shutdown => return true,
    }
    false
}

#[cfg_attr(not(windows), allow(dead_code))]
fn persist(config: &ConfigFile, path: &Path) {
    if let Err(err) = config.save(path) {
        tracing::warn!(%err, "failed to persist configuration");
    }
}

#[cfg(windows)]
mod imp {
    use super::{apply_command, AppCommand};
    use crate::config_file::ConfigFile;
    use anyhow::Result;
    use projguard_core::config::Config;
    use projguard_core::{Enforcer, TopologyService};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tokio::time::MissedTickBehavior;
    use win32_platform::Win32Platform;

    pub async fn run(
        config_path: PathBuf,
        mut commands: mpsc::UnboundedReceiver<AppCommand>,
    ) -> Result<()> {
        let mut config = ConfigFile::load(&config_path)?;
        let platform = Arc::new(Win32Platform::new());

        // Resolve any legacy monitor indices against the live topology
        // before the engine starts.
        let mut topology = TopologyService::new(platform.clone(), config.topology_ttl());
        if config.migrate(&topology.get_monitors()) {
            config.save(&config_path)?;
        }
        drop(topology);

        let mut enforcer = Enforcer::new(platform, &config);
        let (move_tx, mut move_rx) = mpsc::unbounded_channel();
        enforcer.set_event_sink(move_tx);

        let mut interval = tokio::time::interval(config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            interval_ms = config.poll_interval().as_millis() as u64,
            protected = config.protected_device_ids.len(),
            "enforcement started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let moved = enforcer.tick();
                    if moved > 0 {
                        tracing::debug!(moved, "enforcement pass relocated windows");
                    }
                }
                Some(event) = move_rx.recv() => {
                    tracing::info!(
                        process = %event.process_name,
                        title = %event.title,
                        "window returned to primary monitor"
                    );
                }
                Some(command) = commands.recv() => {
                    if apply_command(&mut enforcer, &mut config, &config_path, command) {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutting down");
                    break;
                }
            }
        }
        Ok(())
    }

    pub fn check(config_path: PathBuf) -> Result<()> {
        let config = ConfigFile::load(&config_path)?;
        let platform = Arc::new(Win32Platform::new());
        let mut topology = TopologyService::new(platform, config.topology_ttl());
        let groups = topology.monitor_groups();
        if groups.is_empty() {
            println!("no monitors detected");
            return Ok(());
        }
        println!("arrangement: {:?}", topology.display_topology());
        for group in &groups {
            let monitor = &group.monitor;
            let mut markers = Vec::new();
            if monitor.is_primary {
                markers.push("primary".to_string());
            }
            if config.protected_device_ids.contains(&monitor.device_id) {
                markers.push("protected".to_string());
            }
            if group.is_clone {
                match &group.clone_of {
                    Some(source) => markers.push(format!("clone of {source}")),
                    None => markers.push("clone".to_string()),
                }
            }
            let (width, height) = monitor.resolution();
            println!(
                "{} \u{2714} {}x{} at ({}, {}) {}",
                monitor.label(),
                width,
                height,
                monitor.bounds.left,
                monitor.bounds.top,
                markers.join(", ")
            );
        }
        for device_id in &config.protected_device_ids {
            if topology.get_by_device_id(device_id).is_none() {
                println!("warning: protected device {device_id} is not attached");
            }
        }
        Ok(())
    }
}

#[cfg(windows)]
pub use imp::{check, run};

#[cfg(not(windows))]
pub async fn run(
    _config_path: PathBuf,
    _commands: mpsc::UnboundedReceiver<AppCommand>,
) -> anyhow::Result<()> {
    anyhow::bail!("ProjGuard requires the Windows display and window APIs")
}

#[cfg(not(windows))]
pub fn check(_config_path: PathBuf) -> anyhow::Result<()> {
    anyhow::bail!("ProjGuard requires the Windows display and window APIs")
}
