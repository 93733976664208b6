//! Window enumeration, process identity and repositioning.
use super::rect_from;
use projguard_core::{GuardError, Rect, Result, WindowHandle, WindowInfo};
use std::mem::zeroed;
use std::ptr::addr_of_mut;
use windows_sys::Win32::Foundation::{CloseHandle, BOOL, HWND, LPARAM, RECT, TRUE};
use windows_sys::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_LBUTTON};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetWindowRect, GetWindowTextW, GetWindowThreadProcessId, IsWindow,
    IsWindowVisible, SetWindowPos, HWND_TOP, SWP_NOACTIVATE, SWP_SHOWWINDOW,
};

fn as_hwnd(handle: WindowHandle) -> HWND {
    handle.0 as usize as HWND
}

unsafe extern "system" fn window_enum_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = &mut *(lparam as *mut Vec<WindowInfo>);
    if IsWindowVisible(hwnd) == 0 {
        return TRUE;
    }
    let mut title_buf = [0u16; 512];
    let len = GetWindowTextW(hwnd, title_buf.as_mut_ptr(), title_buf.len() as i32);
    let title = if len > 0 {
        String::from_utf16_lossy(&title_buf[..len as usize])
    } else {
        String::new()
    };
    let mut class_buf = [0u16; 256];
    let len = GetClassNameW(hwnd, class_buf.as_mut_ptr(), class_buf.len() as i32);
    let window_class = if len > 0 {
        String::from_utf16_lossy(&class_buf[..len as usize])
    } else {
        String::new()
    };
    let mut rect: RECT = zeroed();
    if GetWindowRect(hwnd, &mut rect) == 0 {
        // Skip the one malformed window, keep enumerating.
        return TRUE;
    }
    windows.push(WindowInfo {
        handle: WindowHandle(hwnd as usize as u64),
        title,
        window_class,
        rect: rect_from(rect),
    });
    TRUE
}

/// All currently visible top-level windows.
pub fn enumerate_windows() -> Result<Vec<WindowInfo>> {
    let mut windows: Vec<WindowInfo> = Vec::new();
    let ok = unsafe { EnumWindows(Some(window_enum_proc), addr_of_mut!(windows) as LPARAM) };
    if ok == 0 {
        return Err(GuardError::WindowQuery("EnumWindows failed".into()));
    }
    Ok(windows)
}

/// Uppercased executable name of the window's owning process. Fails when
/// the process exited between enumeration and query, or access is denied.
pub fn window_process(handle: WindowHandle) -> Result<String> {
    let mut pid = 0u32;
    unsafe { GetWindowThreadProcessId(as_hwnd(handle), &mut pid) };
    if pid == 0 {
        return Err(GuardError::ProcessIdentity("no owning process".into()));
    }
    let process = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid) };
    if process.is_null() {
        return Err(GuardError::ProcessIdentity(format!(
            "OpenProcess failed for pid {pid}"
        )));
    }
    let mut buf = [0u16; 1024];
    let mut len = buf.len() as u32;
    let ok = unsafe { QueryFullProcessImageNameW(process, 0, buf.as_mut_ptr(), &mut len) };
    unsafe { CloseHandle(process) };
    if ok == 0 {
        return Err(GuardError::ProcessIdentity(format!(
            "image name query failed for pid {pid}"
        )));
    }
    let path = String::from_utf16_lossy(&buf[..len as usize]);
    let name = path.rsplit(['\\', '/']).next().unwrap_or(&path);
    Ok(name.to_uppercase())
}

pub fn is_window_valid(handle: WindowHandle) -> bool {
    unsafe { IsWindow(as_hwnd(handle)) != 0 }
}

/// Reposition without activating: the window goes to the top of the
/// z-order but keyboard focus stays where it was.
pub fn move_window(handle: WindowHandle, rect: Rect) -> Result<()> {
    let ok = unsafe {
        SetWindowPos(
            as_hwnd(handle),
            HWND_TOP,
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
            SWP_NOACTIVATE | SWP_SHOWWINDOW,
        )
    };
    if ok == 0 {
        return Err(GuardError::MoveRejected(format!(
            "SetWindowPos failed for {handle:?}"
        )));
    }
    Ok(())
}

/// Global primary-pointer-button state; high bit set means held down.
pub fn pointer_button_down() -> bool {
    let state = unsafe { GetAsyncKeyState(i32::from(VK_LBUTTON)) };
    (state as u16) & 0x8000 != 0
}
