//! Message pump for the hook thread.
//!
//! A `WH_MOUSE_LL` hook only fires while the installing thread is pumping
//! messages.

use std::sync::atomic::{AtomicU32, Ordering};
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PostThreadMessageW, TranslateMessage, MSG, WM_QUIT,
};

/// Thread currently pumping messages, 0 when none.
static LOOP_THREAD_ID: AtomicU32 = AtomicU32::new(0);

/// Pumps messages on the calling thread until `WM_QUIT` arrives.
///
/// Call this on the thread that installed the hook. Returns the exit code
/// carried by the quit message, or -1 if `GetMessageW` failed.
///
/// # Example
/// ```no_run
/// use mousekit::hook::HookRegistry;
/// use mousekit::winapi_utils::run_message_loop;
///
/// let registry = HookRegistry::new();
/// registry.register_mouse_hook(|_, _| {}).unwrap();
/// // Blocks until post_quit_message() is called from another thread
/// run_message_loop();
/// ```
pub fn run_message_loop() -> i32 {
    let thread_id = unsafe { GetCurrentThreadId() };
    LOOP_THREAD_ID.store(thread_id, Ordering::SeqCst);
    tracing::debug!(thread_id, "Message loop starting");

    let mut msg = MSG::default();
    let exit_code = loop {
        // > 0 message, 0 WM_QUIT, -1 error
        match unsafe { GetMessageW(&mut msg, None, 0, 0) }.0 {
            -1 => {
                tracing::error!("GetMessageW failed, leaving message loop");
                break -1;
            }
            0 => break msg.wParam.0 as i32,
            _ => unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            },
        }
    };

    LOOP_THREAD_ID.store(0, Ordering::SeqCst);
    tracing::debug!(exit_code, "Message loop exited");
    exit_code
}

/// Asks the running message loop to exit. Safe to call from any thread.
///
/// Returns `false` if no loop is running or the post failed.
pub fn post_quit_message(exit_code: i32) -> bool {
    let thread_id = LOOP_THREAD_ID.load(Ordering::SeqCst);
    if thread_id == 0 {
        tracing::warn!("No message loop running, cannot post quit message");
        return false;
    }

    let posted = unsafe {
        PostThreadMessageW(thread_id, WM_QUIT, WPARAM(exit_code as usize), LPARAM(0))
    };
    match posted {
        Ok(()) => {
            tracing::debug!(exit_code, thread_id, "Posted quit message");
            true
        }
        Err(e) => {
            tracing::error!(?e, "Failed to post quit message");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_quit_without_loop_fails() {
        assert!(!post_quit_message(0));
    }
}
