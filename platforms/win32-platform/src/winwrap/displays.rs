//! Display enumeration, configuration-path queries and rearrangement.
use super::{from_wide, rect_from, to_wide};
use projguard_core::platform::{DevicePlacement, DisplayPath, MonitorEndpoint};
use projguard_core::{GuardError, Result};
use std::mem::{size_of, zeroed};
use std::ptr::{addr_of_mut, null, null_mut};
use windows_sys::Win32::Devices::Display::{
    DisplayConfigGetDeviceInfo, GetDisplayConfigBufferSizes, QueryDisplayConfig,
    DISPLAYCONFIG_DEVICE_INFO_GET_SOURCE_NAME, DISPLAYCONFIG_DEVICE_INFO_GET_TARGET_NAME,
    DISPLAYCONFIG_MODE_INFO, DISPLAYCONFIG_PATH_INFO, DISPLAYCONFIG_SOURCE_DEVICE_NAME,
    DISPLAYCONFIG_TARGET_DEVICE_NAME, QDC_ONLY_ACTIVE_PATHS,
};
use windows_sys::Win32::Foundation::{ERROR_SUCCESS, LPARAM, LUID, POINTL, RECT, TRUE};
use windows_sys::Win32::Graphics::Gdi::{
    ChangeDisplaySettingsExW, EnumDisplayDevicesW, EnumDisplayMonitors, GetMonitorInfoW,
    CDS_NORESET, CDS_SET_PRIMARY, CDS_UPDATEREGISTRY, DEVMODEW, DISPLAY_DEVICEW,
    DISPLAY_DEVICE_ATTACHED_TO_DESKTOP, DISPLAY_DEVICE_MIRRORING_DRIVER, DISP_CHANGE_SUCCESSFUL,
    DM_POSITION, HDC, HMONITOR, MONITORINFOEXW, MONITORINFOF_PRIMARY,
};

unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> windows_sys::Win32::Foundation::BOOL {
    let handles = &mut *(lparam as *mut Vec<HMONITOR>);
    handles.push(hmonitor);
    TRUE
}

/// Per-monitor pass: geometry, work area, primary flag and device path for
/// every monitor the OS exposes individually.
pub fn enumerate_monitors() -> Result<Vec<MonitorEndpoint>> {
    let mut handles: Vec<HMONITOR> = Vec::new();
    let ok = unsafe {
        EnumDisplayMonitors(
            null_mut(),
            null(),
            Some(monitor_enum_proc),
            addr_of_mut!(handles) as LPARAM,
        )
    };
    if ok == 0 {
        return Err(GuardError::Enumeration("EnumDisplayMonitors failed".into()));
    }
    let mut endpoints = Vec::with_capacity(handles.len());
    for hmonitor in handles {
        let mut info: MONITORINFOEXW = unsafe { zeroed() };
        info.monitorInfo.cbSize = size_of::<MONITORINFOEXW>() as u32;
        let ok = unsafe { GetMonitorInfoW(hmonitor, addr_of_mut!(info).cast()) };
        if ok == 0 {
            tracing::debug!("GetMonitorInfoW failed for an enumerated handle");
            continue;
        }
        endpoints.push(MonitorEndpoint {
            handle: hmonitor as usize as u64,
            device_id: from_wide(&info.szDevice),
            bounds: rect_from(info.monitorInfo.rcMonitor),
            work_area: rect_from(info.monitorInfo.rcWork),
            is_primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
        });
    }
    Ok(endpoints)
}

/// Display-device pass: device paths of everything attached to the
/// desktop, including outputs a shared handle hides from the per-monitor
/// pass. Mirroring pseudo-devices are skipped.
pub fn enumerate_devices() -> Result<Vec<String>> {
    let mut devices = Vec::new();
    let mut index = 0u32;
    loop {
        let mut device: DISPLAY_DEVICEW = unsafe { zeroed() };
        device.cb = size_of::<DISPLAY_DEVICEW>() as u32;
        let ok = unsafe { EnumDisplayDevicesW(null(), index, &mut device, 0) };
        if ok == 0 {
            break;
        }
        index += 1;
        if device.StateFlags & DISPLAY_DEVICE_ATTACHED_TO_DESKTOP == 0 {
            continue;
        }
        if device.StateFlags & DISPLAY_DEVICE_MIRRORING_DRIVER != 0 {
            continue;
        }
        devices.push(from_wide(&device.DeviceName));
    }
    if index == 0 {
        return Err(GuardError::Enumeration(
            "EnumDisplayDevicesW returned no devices".into(),
        ));
    }
    Ok(devices)
}

const fn luid_key(luid: LUID) -> u64 {
    ((luid.HighPart as i64 as u64) << 32) | luid.LowPart as u64
}

fn source_gdi_name(adapter: LUID, id: u32) -> Option<String> {
    let mut request: DISPLAYCONFIG_SOURCE_DEVICE_NAME = unsafe { zeroed() };
    request.header.r#type = DISPLAYCONFIG_DEVICE_INFO_GET_SOURCE_NAME;
    request.header.size = size_of::<DISPLAYCONFIG_SOURCE_DEVICE_NAME>() as u32;
    request.header.adapterId = adapter;
    request.header.id = id;
    let rc = unsafe { DisplayConfigGetDeviceInfo(&mut request.header) };
    (rc == ERROR_SUCCESS as i32).then(|| from_wide(&request.viewGdiDeviceName))
}

fn target_friendly_name(adapter: LUID, id: u32) -> Option<String> {
    let mut request: DISPLAYCONFIG_TARGET_DEVICE_NAME = unsafe { zeroed() };
    request.header.r#type = DISPLAYCONFIG_DEVICE_INFO_GET_TARGET_NAME;
    request.header.size = size_of::<DISPLAYCONFIG_TARGET_DEVICE_NAME>() as u32;
    request.header.adapterId = adapter;
    request.header.id = id;
    let rc = unsafe { DisplayConfigGetDeviceInfo(&mut request.header) };
    (rc == ERROR_SUCCESS as i32)
        .then(|| from_wide(&request.monitorFriendlyDeviceName))
        .filter(|name| !name.is_empty())
}

/// Active configuration paths, each resolved back to its GDI device name.
pub fn query_display_paths() -> Result<Vec<DisplayPath>> {
    let mut path_count = 0u32;
    let mut mode_count = 0u32;
    let rc = unsafe {
        GetDisplayConfigBufferSizes(QDC_ONLY_ACTIVE_PATHS, &mut path_count, &mut mode_count)
    };
    if rc != ERROR_SUCCESS as i32 {
        return Err(GuardError::Enumeration(format!(
            "GetDisplayConfigBufferSizes returned {rc}"
        )));
    }
    let mut paths: Vec<DISPLAYCONFIG_PATH_INFO> = vec![unsafe { zeroed() }; path_count as usize];
    let mut modes: Vec<DISPLAYCONFIG_MODE_INFO> = vec![unsafe { zeroed() }; mode_count as usize];
    let rc = unsafe {
        QueryDisplayConfig(
            QDC_ONLY_ACTIVE_PATHS,
            &mut path_count,
            paths.as_mut_ptr(),
            &mut mode_count,
            modes.as_mut_ptr(),
            null_mut(),
        )
    };
    if rc != ERROR_SUCCESS as i32 {
        return Err(GuardError::Enumeration(format!(
            "QueryDisplayConfig returned {rc}"
        )));
    }
    paths.truncate(path_count as usize);
    let mut out = Vec::with_capacity(paths.len());
    for path in &paths {
        let Some(device_id) = source_gdi_name(path.sourceInfo.adapterId, path.sourceInfo.id)
        else {
            tracing::debug!("source name query failed for a configuration path");
            continue;
        };
        out.push(DisplayPath {
            device_id,
            adapter: luid_key(path.sourceInfo.adapterId),
            source: path.sourceInfo.id,
            target: path.targetInfo.id,
            monitor_name: target_friendly_name(path.targetInfo.adapterId, path.targetInfo.id),
        });
    }
    Ok(out)
}

/// Stage a position (and optionally the primary flag) per device, then
/// commit the whole batch in one pass. Any staged failure aborts before
/// the commit, so nothing is partially applied.
pub fn apply_placements(placements: &[DevicePlacement]) -> Result<()> {
    for placement in placements {
        let device = to_wide(&placement.device_id);
        let mut devmode: DEVMODEW = unsafe { zeroed() };
        devmode.dmSize = size_of::<DEVMODEW>() as u16;
        devmode.dmFields = DM_POSITION;
        unsafe {
            devmode.Anonymous1.Anonymous2.dmPosition = POINTL {
                x: placement.position.0,
                y: placement.position.1,
            };
        }
        let mut flags = CDS_UPDATEREGISTRY | CDS_NORESET;
        if placement.make_primary {
            flags |= CDS_SET_PRIMARY;
        }
        let rc = unsafe {
            ChangeDisplaySettingsExW(device.as_ptr(), &mut devmode, null_mut(), flags, null())
        };
        if rc != DISP_CHANGE_SUCCESSFUL {
            return Err(GuardError::Reconfigure(format!(
                "{}: ChangeDisplaySettingsExW returned {rc}",
                placement.device_id
            )));
        }
    }
    let rc = unsafe { ChangeDisplaySettingsExW(null(), null_mut(), null_mut(), 0, null()) };
    if rc == DISP_CHANGE_SUCCESSFUL {
        Ok(())
    } else {
        Err(GuardError::Reconfigure(format!(
            "commit returned {rc}"
        )))
    }
}
