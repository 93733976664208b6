//! Monitor topology service.
//!
//! A TTL-cached read path over the OS display queries. Enumeration merges
//! two passes: the per-monitor pass for geometry and the primary flag, and
//! the display-device pass which also reports outputs hidden behind a
//! shared handle (cloned monitors). Devices only the second pass knows
//! about become synthetic monitors copying the primary's geometry, since a
//! clone shows the same visible bounds as its source.
use crate::models::{Monitor, MonitorGroup, TopologyKind, TopologySnapshot};
use crate::platform::{DevicePlacement, DisplayPath, Platform};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub struct TopologyService<P> {
    platform: Arc<P>,
    ttl: Duration,
    cached: Option<TopologySnapshot>,
    /// Friendly names resolve through the display-configuration query,
    /// which is expensive and changes far less often than geometry, so
    /// they are cached independently of the snapshot TTL.
    names: HashMap<String, String>,
}

impl<P: Platform> TopologyService<P> {
    pub fn new(platform: Arc<P>, ttl: Duration) -> Self {
        Self {
            platform,
            ttl,
            cached: None,
            names: HashMap::new(),
        }
    }

    /// The current snapshot, served from cache while younger than the TTL.
    ///
    /// A failed enumeration yields an empty snapshot that is returned but
    /// not cached, so the next call retries immediately.
    pub fn get_monitors(&mut self) -> TopologySnapshot {
        if let Some(cached) = &self.cached {
            if cached.is_fresh(self.ttl) {
                return cached.clone();
            }
        }
        let snapshot = self.refresh();
        if snapshot.is_empty() {
            self.cached = None;
        } else {
            self.cached = Some(snapshot.clone());
        }
        snapshot
    }

    pub fn get_primary(&mut self) -> Option<Monitor> {
        self.get_monitors().primary().cloned()
    }

    pub fn get_by_device_id(&mut self, device_id: &str) -> Option<Monitor> {
        self.get_monitors().by_device_id(device_id).cloned()
    }

    /// Best-effort handle lookup; handles are only stable within one
    /// snapshot.
    pub fn get_by_handle(&mut self, handle: u64) -> Option<Monitor> {
        self.get_monitors().by_handle(handle).cloned()
    }

    /// Drop the cached snapshot. Must be called after any externally
    /// detected topology change.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Human-readable monitor name, resolved lazily and cached until the
    /// service is dropped.
    pub fn get_friendly_name(&mut self, device_id: &str) -> Option<String> {
        if let Some(name) = self.names.get(device_id) {
            return Some(name.clone());
        }
        let paths = match self.platform.query_display_paths() {
            Ok(paths) => paths,
            Err(err) => {
                tracing::debug!(%err, "display path query failed");
                return None;
            }
        };
        let name = paths
            .iter()
            .find(|p| p.device_id == device_id)
            .and_then(|p| p.monitor_name.clone())?;
        self.names.insert(device_id.to_string(), name.clone());
        Some(name)
    }

    /// Whether the device shares its source with another output, and the
    /// best-effort device id of the original. `(true, None)` means the
    /// shared-source relationship exists but the original cannot be
    /// disambiguated.
    pub fn detect_clone(&mut self, device_id: &str) -> (bool, Option<String>) {
        let paths = match self.platform.query_display_paths() {
            Ok(paths) => paths,
            Err(err) => {
                tracing::debug!(%err, "display path query failed");
                return (false, None);
            }
        };
        let Some(own) = paths.iter().find(|p| p.device_id == device_id) else {
            return (false, None);
        };
        let partner = paths
            .iter()
            .find(|p| shares_source(own, p) && p.target != own.target);
        match partner {
            Some(partner) if partner.device_id != own.device_id => {
                (true, Some(partner.device_id.clone()))
            }
            Some(_) => (true, None),
            None => (false, None),
        }
    }

    /// Monitors enriched with clone relationships and friendly names, for
    /// selection UIs.
    pub fn monitor_groups(&mut self) -> Vec<MonitorGroup> {
        let snapshot = self.get_monitors();
        snapshot
            .monitors()
            .iter()
            .map(|m| {
                let (is_clone, clone_of) = self.detect_clone(&m.device_id);
                let mut monitor = m.clone();
                if monitor.friendly_name.is_none() {
                    monitor.friendly_name = self.get_friendly_name(&m.device_id);
                }
                MonitorGroup {
                    monitor,
                    is_clone,
                    clone_of,
                }
            })
            .collect()
    }

    /// Diagnostic classification of the arrangement. Never feeds the
    /// placement policy.
    pub fn display_topology(&mut self) -> TopologyKind {
        let snapshot = self.get_monitors();
        if snapshot.is_empty() {
            return TopologyKind::Unknown;
        }
        if snapshot.len() == 1 {
            return TopologyKind::Single;
        }
        let Ok(paths) = self.platform.query_display_paths() else {
            return TopologyKind::Unknown;
        };
        let cloned = paths.iter().enumerate().any(|(i, a)| {
            paths[i + 1..]
                .iter()
                .any(|b| shares_source(a, b) && a.target != b.target)
        });
        if cloned {
            TopologyKind::Clone
        } else {
            TopologyKind::Extend
        }
    }

    /// Make `device_id` the primary monitor at the origin and line the
    /// remaining monitors up to its right in enumeration order.
    ///
    /// Privileged; returns `false` when the device is unknown or the OS
    /// rejects the rearrangement. Invalidates the cache on success.
    pub fn set_primary(&mut self, device_id: &str) -> bool {
        let snapshot = self.get_monitors();
        let Some(target) = snapshot.by_device_id(device_id) else {
            tracing::warn!(device_id, "set_primary: unknown device");
            return false;
        };
        let mut placements = vec![DevicePlacement {
            device_id: target.device_id.clone(),
            position: (0, 0),
            make_primary: true,
        }];
        let mut x = target.bounds.width();
        for monitor in snapshot.monitors() {
            if monitor.device_id == device_id {
                continue;
            }
            placements.push(DevicePlacement {
                device_id: monitor.device_id.clone(),
                position: (x, 0),
                make_primary: false,
            });
            x += monitor.bounds.width();
        }
        match self.platform.apply_placements(&placements) {
            Ok(()) => {
                tracing::info!(device_id, "primary monitor changed");
                self.invalidate();
                true
            }
            Err(err) => {
                tracing::warn!(device_id, %err, "set_primary rejected");
                false
            }
        }
    }

    fn refresh(&self) -> TopologySnapshot {
        let endpoints = match self.platform.enumerate_monitors() {
            Ok(endpoints) => endpoints,
            Err(err) => {
                tracing::warn!(%err, "monitor enumeration failed; degraded snapshot");
                return TopologySnapshot::empty();
            }
        };
        let mut monitors: Vec<Monitor> = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            if monitors.iter().any(|m| m.device_id == endpoint.device_id) {
                continue;
            }
            let friendly_name = self.names.get(&endpoint.device_id).cloned();
            monitors.push(Monitor {
                device_id: endpoint.device_id,
                handle: endpoint.handle,
                bounds: endpoint.bounds,
                work_area: endpoint.work_area,
                is_primary: endpoint.is_primary,
                friendly_name,
            });
        }
        // The device pass catches outputs the monitor pass folded into a
        // shared handle. Synthesize entries for them.
        let devices = match self.platform.enumerate_devices() {
            Ok(devices) => devices,
            Err(err) => {
                tracing::debug!(%err, "device enumeration failed");
                Vec::new()
            }
        };
        for device_id in devices {
            if monitors.iter().any(|m| m.device_id == device_id) {
                continue;
            }
            let Some(template) = monitors
                .iter()
                .find(|m| m.is_primary)
                .or_else(|| monitors.first())
            else {
                continue;
            };
            tracing::debug!(device_id, "synthesizing monitor for cloned output");
            monitors.push(Monitor {
                device_id: device_id.clone(),
                handle: 0,
                bounds: template.bounds,
                work_area: template.work_area,
                is_primary: false,
                friendly_name: self.names.get(&device_id).cloned(),
            });
        }
        TopologySnapshot::new(monitors)
    }
}

fn shares_source(a: &DisplayPath, b: &DisplayPath) -> bool {
    a.adapter == b.adapter && a.source == b.source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{FakePlatform, MonitorEndpoint};
    use crate::Rect;

    fn service(fake: FakePlatform, ttl: Duration) -> TopologyService<FakePlatform> {
        TopologyService::new(Arc::new(fake), ttl)
    }

    fn path(device: &str, adapter: u64, source: u32, target: u32) -> DisplayPath {
        DisplayPath {
            device_id: device.into(),
            adapter,
            source,
            target,
            monitor_name: None,
        }
    }

    #[test]
    fn snapshot_has_unique_ids_and_one_primary() {
        let mut service = service(FakePlatform::with_dual_monitors(), Duration::from_secs(5));
        let snapshot = service.get_monitors();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.monitors().iter().filter(|m| m.is_primary).count(), 1);
        let mut ids: Vec<_> = snapshot.monitors().iter().map(|m| &m.device_id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn snapshot_is_cached_until_the_ttl_expires() {
        let mut service = service(FakePlatform::with_dual_monitors(), Duration::from_secs(5));
        service.get_monitors();
        service.get_monitors();
        assert_eq!(service.platform.monitor_enumerations.get(), 1);
    }

    #[test]
    fn zero_ttl_disables_the_cache() {
        let mut service = service(FakePlatform::with_dual_monitors(), Duration::ZERO);
        service.get_monitors();
        service.get_monitors();
        assert_eq!(service.platform.monitor_enumerations.get(), 2);
    }

    #[test]
    fn invalidate_forces_a_fresh_enumeration() {
        let mut service = service(FakePlatform::with_dual_monitors(), Duration::from_secs(5));
        service.get_monitors();
        service.invalidate();
        service.get_monitors();
        assert_eq!(service.platform.monitor_enumerations.get(), 2);
    }

    #[test]
    fn degraded_snapshot_is_not_cached() {
        let fake = FakePlatform::with_dual_monitors();
        fake.fail_enumeration.set(true);
        let mut service = service(fake, Duration::from_secs(5));
        assert!(service.get_monitors().is_empty());
        service.platform.fail_enumeration.set(false);
        // Retries immediately instead of serving "no monitors" for a TTL.
        assert_eq!(service.get_monitors().len(), 2);
    }

    #[test]
    fn device_only_outputs_become_synthetic_monitors() {
        let fake = FakePlatform::with_dual_monitors();
        fake.devices.borrow_mut().push(r"\\.\DISPLAY3".into());
        let mut service = service(fake, Duration::from_secs(5));
        let snapshot = service.get_monitors();
        assert_eq!(snapshot.len(), 3);
        let synthetic = snapshot.by_device_id(r"\\.\DISPLAY3").unwrap();
        assert!(!synthetic.is_primary);
        assert_eq!(synthetic.handle, 0);
        // Clones show the same visible bounds as their source.
        assert_eq!(synthetic.bounds, snapshot.primary().unwrap().bounds);
    }

    #[test]
    fn duplicate_endpoints_keep_the_first_entry() {
        let fake = FakePlatform::with_dual_monitors();
        let duplicate = MonitorEndpoint {
            handle: 9,
            device_id: r"\\.\DISPLAY1".into(),
            bounds: Rect::new(0, 0, 800, 600),
            work_area: Rect::new(0, 0, 800, 600),
            is_primary: false,
        };
        fake.monitors.borrow_mut().push(duplicate);
        let mut service = service(fake, Duration::from_secs(5));
        let snapshot = service.get_monitors();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.by_device_id(r"\\.\DISPLAY1").unwrap().handle, 1);
    }

    #[test]
    fn paths_sharing_a_source_are_mutual_clones() {
        let fake = FakePlatform::with_dual_monitors();
        *fake.paths.borrow_mut() = vec![
            path(r"\\.\DISPLAY1", 7, 0, 100),
            path(r"\\.\DISPLAY2", 7, 0, 200),
            path(r"\\.\DISPLAY3", 7, 1, 300),
        ];
        let mut service = service(fake, Duration::from_secs(5));
        assert_eq!(
            service.detect_clone(r"\\.\DISPLAY1"),
            (true, Some(r"\\.\DISPLAY2".to_string()))
        );
        assert_eq!(
            service.detect_clone(r"\\.\DISPLAY2"),
            (true, Some(r"\\.\DISPLAY1".to_string()))
        );
        assert_eq!(service.detect_clone(r"\\.\DISPLAY3"), (false, None));
    }

    #[test]
    fn clone_with_shared_device_id_has_unknown_source() {
        let fake = FakePlatform::with_dual_monitors();
        // Both targets resolve to the same GDI device; the original cannot
        // be named.
        *fake.paths.borrow_mut() = vec![
            path(r"\\.\DISPLAY1", 7, 0, 100),
            path(r"\\.\DISPLAY1", 7, 0, 200),
        ];
        let mut service = service(fake, Duration::from_secs(5));
        assert_eq!(service.detect_clone(r"\\.\DISPLAY1"), (true, None));
    }

    #[test]
    fn friendly_names_are_cached_independently() {
        let fake = FakePlatform::with_dual_monitors();
        *fake.paths.borrow_mut() = vec![DisplayPath {
            monitor_name: Some("Epson Projector".into()),
            ..path(r"\\.\DISPLAY2", 7, 1, 200)
        }];
        let mut service = service(fake, Duration::ZERO);
        assert_eq!(
            service.get_friendly_name(r"\\.\DISPLAY2"),
            Some("Epson Projector".to_string())
        );
        assert_eq!(
            service.get_friendly_name(r"\\.\DISPLAY2"),
            Some("Epson Projector".to_string())
        );
        // Second lookup comes from the name cache, not a fresh query.
        assert_eq!(service.platform.path_queries.get(), 1);
        assert_eq!(service.get_friendly_name(r"\\.\DISPLAY1"), None);
    }

    #[test]
    fn monitor_groups_carry_names_and_clone_flags() {
        let fake = FakePlatform::with_dual_monitors();
        *fake.paths.borrow_mut() = vec![
            path(r"\\.\DISPLAY1", 7, 0, 100),
            DisplayPath {
                monitor_name: Some("Epson Projector".into()),
                ..path(r"\\.\DISPLAY2", 7, 0, 200)
            },
        ];
        let mut service = service(fake, Duration::from_secs(5));
        let groups = service.monitor_groups();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.is_clone));
        let projector = &groups[1];
        assert_eq!(projector.clone_of, Some(r"\\.\DISPLAY1".to_string()));
        assert_eq!(
            projector.monitor.friendly_name,
            Some("Epson Projector".to_string())
        );
    }

    #[test]
    fn set_primary_places_the_target_at_the_origin() {
        let mut service = service(FakePlatform::with_dual_monitors(), Duration::from_secs(5));
        assert!(service.set_primary(r"\\.\DISPLAY2"));
        let placements = service.platform.placements.borrow().clone();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].device_id, r"\\.\DISPLAY2");
        assert_eq!(placements[0].position, (0, 0));
        assert!(placements[0].make_primary);
        // DISPLAY2 is 1920 wide, so DISPLAY1 extends from there.
        assert_eq!(placements[1].device_id, r"\\.\DISPLAY1");
        assert_eq!(placements[1].position, (1920, 0));
        assert!(!placements[1].make_primary);
    }

    #[test]
    fn set_primary_invalidates_the_cache() {
        let mut service = service(FakePlatform::with_dual_monitors(), Duration::from_secs(5));
        service.get_monitors();
        assert!(service.set_primary(r"\\.\DISPLAY2"));
        service.get_monitors();
        assert_eq!(service.platform.monitor_enumerations.get(), 2);
    }

    #[test]
    fn set_primary_reports_failure_without_partial_state() {
        let fake = FakePlatform::with_dual_monitors();
        fake.fail_placements.set(true);
        let mut service = service(fake, Duration::from_secs(5));
        service.get_monitors();
        assert!(!service.set_primary(r"\\.\DISPLAY2"));
        assert!(service.platform.placements.borrow().is_empty());
        // Cache survives a failed rearrangement.
        service.get_monitors();
        assert_eq!(service.platform.monitor_enumerations.get(), 1);
    }

    #[test]
    fn set_primary_rejects_unknown_devices() {
        let mut service = service(FakePlatform::with_dual_monitors(), Duration::from_secs(5));
        assert!(!service.set_primary(r"\\.\DISPLAY9"));
        assert!(service.platform.placements.borrow().is_empty());
    }

    #[test]
    fn display_topology_is_diagnostic_only() {
        let fake = FakePlatform::with_dual_monitors();
        *fake.paths.borrow_mut() = vec![
            path(r"\\.\DISPLAY1", 7, 0, 100),
            path(r"\\.\DISPLAY2", 7, 1, 200),
        ];
        let mut service = service(fake, Duration::from_secs(5));
        assert_eq!(service.display_topology(), TopologyKind::Extend);
        *service.platform.paths.borrow_mut() = vec![
            path(r"\\.\DISPLAY1", 7, 0, 100),
            path(r"\\.\DISPLAY2", 7, 0, 200),
        ];
        assert_eq!(service.display_topology(), TopologyKind::Clone);
    }
}
