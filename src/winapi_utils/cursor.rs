//! Cursor position via `GetCursorPos` / `SetCursorPos`.

use crate::error::CursorError;
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

/// Returns the cursor position in screen coordinates.
pub fn get_cursor_pos() -> Result<(i32, i32), CursorError> {
    let mut point = POINT::default();
    unsafe { GetCursorPos(&mut point) }.map_err(|e| CursorError::Os(e.to_string()))?;
    Ok((point.x, point.y))
}

/// Moves the cursor to screen coordinates `(x, y)`.
pub fn set_cursor_pos(x: i32, y: i32) -> Result<(), CursorError> {
    unsafe { SetCursorPos(x, y) }.map_err(|e| CursorError::Os(e.to_string()))
}
