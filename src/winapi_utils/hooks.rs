//! Windows low-level mouse hook facility.
//!
//! Installs `WH_MOUSE_LL` and routes every message through the
//! [`Dispatcher`] handed over by the registry.
//!
//! # Important
//! - Windows calls the hook procedure on the thread that installed it, from
//!   inside that thread's message loop. Run [`run_message_loop`] on the
//!   installing thread or no events arrive.
//! - If the chain does not return fast enough, Windows silently removes the
//!   hook.
//!
//! [`run_message_loop`]: super::run_message_loop

use crate::error::HookError;
use crate::event::MousePayload;
use crate::hook::{Dispatcher, HookBackend};
use once_cell::sync::Lazy;
use std::ffi::c_void;
use std::sync::{PoisonError, RwLock};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HHOOK, MSLLHOOKSTRUCT,
    WH_MOUSE_LL,
};

/// Dispatcher of the live hook. A hook procedure is a plain function
/// pointer, so the target has to be process-wide.
static DISPATCH_TARGET: Lazy<RwLock<Option<Dispatcher>>> = Lazy::new(|| RwLock::new(None));

/// Hook facility backed by `SetWindowsHookExW(WH_MOUSE_LL)`.
///
/// Only one hook may be live per process; a second install is rejected
/// with [`HookError::AlreadyInstalled`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsHookBackend;

impl HookBackend for WindowsHookBackend {
    fn name(&self) -> &'static str {
        "mouse_ll"
    }

    fn install(&self, dispatcher: Dispatcher) -> Result<isize, HookError> {
        // Rejecting under the read lock keeps the live hook's reads unblocked
        if DISPATCH_TARGET
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
        {
            return Err(HookError::AlreadyInstalled);
        }

        let mut target = DISPATCH_TARGET
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if target.is_some() {
            return Err(HookError::AlreadyInstalled);
        }
        *target = Some(dispatcher);

        match unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) } {
            Ok(hook) => Ok(hook.0 as isize),
            Err(e) => {
                *target = None;
                Err(HookError::Registration(e.to_string()))
            }
        }
    }

    fn uninstall(&self, raw: isize) -> Result<(), HookError> {
        let result = unsafe { UnhookWindowsHookEx(HHOOK(raw as *mut c_void)) };

        // Unusable afterwards regardless of the outcome
        DISPATCH_TARGET
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        result.map_err(|e| HookError::Unhook(e.to_string()))
    }
}

/// Copies the fields of a low-level mouse record into a [`MousePayload`].
fn payload_from(raw: &MSLLHOOKSTRUCT) -> MousePayload {
    MousePayload {
        x: raw.pt.x,
        y: raw.pt.y,
        mouse_data: raw.mouseData,
        flags: raw.flags,
        time: raw.time,
        extra_info: raw.dwExtraInfo,
    }
}

/// For `WH_MOUSE_LL`, `wparam` carries the mouse message identifier.
fn message_code(wparam: WPARAM) -> u32 {
    wparam.0 as u32
}

/// Low-level mouse hook procedure.
///
/// # Safety
/// Called by Windows from the installing thread's message loop. `lparam`
/// points to an `MSLLHOOKSTRUCT` when `code == HC_ACTION`.
unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let forward = || unsafe { CallNextHookEx(None, code, wparam, lparam) };

    if code != HC_ACTION as i32 {
        return forward();
    }

    let payload = payload_from(&*(lparam.0 as *const MSLLHOOKSTRUCT));

    // Never wait here: only install and uninstall take the write lock
    let target = match DISPATCH_TARGET.try_read() {
        Ok(target) => target.clone(),
        Err(_) => None,
    };

    match target {
        Some(dispatcher) => dispatcher.handle(message_code(wparam), &payload, forward),
        // CRITICAL: Always call next hook in chain
        None => forward(),
    }
}

#[cfg(test)]
mod tests {
    // Installing a real hook needs an interactive desktop and a running
    // message loop; the dispatch path is covered with the manual backend.
    use super::*;
    use crate::event::{classify, EventKind, MouseButton};
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::{
        WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE, WM_MOUSEWHEEL, WM_RBUTTONDOWN, WM_RBUTTONUP,
    };

    #[test]
    fn test_payload_from_copies_every_field() {
        let raw = MSLLHOOKSTRUCT {
            pt: POINT { x: -1920, y: 1080 },
            mouseData: 120 << 16,
            flags: 0x01,
            time: 123_456,
            dwExtraInfo: 0xDEAD_BEEF,
        };

        let payload = payload_from(&raw);

        assert_eq!(payload.x, -1920);
        assert_eq!(payload.y, 1080);
        assert_eq!(payload.mouse_data, 120 << 16);
        assert_eq!(payload.flags, 0x01);
        assert_eq!(payload.time, 123_456);
        assert_eq!(payload.extra_info, 0xDEAD_BEEF);
    }

    #[test]
    fn test_message_code_matches_classification_table() {
        let code = |msg: u32| classify(message_code(WPARAM(msg as usize)));

        assert_eq!(code(WM_MOUSEMOVE), EventKind::Move);
        assert_eq!(code(WM_LBUTTONDOWN), EventKind::ButtonDown(MouseButton::Left));
        assert_eq!(code(WM_LBUTTONUP), EventKind::ButtonUp(MouseButton::Left));
        assert_eq!(code(WM_RBUTTONDOWN), EventKind::ButtonDown(MouseButton::Right));
        assert_eq!(code(WM_RBUTTONUP), EventKind::ButtonUp(MouseButton::Right));
        assert_eq!(code(WM_MOUSEWHEEL), EventKind::Unknown(WM_MOUSEWHEEL));
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(WindowsHookBackend.name(), "mouse_ll");
    }
}
