//! Global cursor position.
//!
//! Windows goes through `GetCursorPos`/`SetCursorPos`, Linux through an X11
//! connection opened by `enigo` per call. Other platforms return
//! [`CursorError::Unsupported`].

use super::vector::Vector2D;
use crate::error::CursorError;

/// Returns the current cursor position in screen coordinates.
///
/// # Example
/// ```no_run
/// use mousekit::util::cursor;
///
/// let pos = cursor::get_position()?;
/// println!("Cursor at {pos}");
/// # Ok::<(), mousekit::CursorError>(())
/// ```
pub fn get_position() -> Result<Vector2D, CursorError> {
    #[cfg(windows)]
    {
        crate::winapi_utils::get_cursor_pos().map(Vector2D::from)
    }
    #[cfg(target_os = "linux")]
    {
        x11::get_cursor_pos().map(Vector2D::from)
    }
    #[cfg(not(any(windows, target_os = "linux")))]
    {
        Err(CursorError::Unsupported)
    }
}

/// Moves the cursor to `pos`, rounding to whole pixels.
pub fn set_position(pos: Vector2D) -> Result<(), CursorError> {
    #[cfg(windows)]
    {
        crate::winapi_utils::set_cursor_pos(pos.int_x(), pos.int_y())
    }
    #[cfg(target_os = "linux")]
    {
        x11::set_cursor_pos(pos.int_x(), pos.int_y())
    }
    #[cfg(not(any(windows, target_os = "linux")))]
    {
        let _ = pos;
        Err(CursorError::Unsupported)
    }
}

#[cfg(target_os = "linux")]
mod x11 {
    use crate::error::CursorError;
    use enigo::{Coordinate, Enigo, Mouse, Settings};

    fn connect() -> Result<Enigo, CursorError> {
        Enigo::new(&Settings::default()).map_err(|e| CursorError::Os(e.to_string()))
    }

    pub(super) fn get_cursor_pos() -> Result<(i32, i32), CursorError> {
        connect()?
            .location()
            .map_err(|e| CursorError::Os(e.to_string()))
    }

    pub(super) fn set_cursor_pos(x: i32, y: i32) -> Result<(), CursorError> {
        connect()?
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| CursorError::Os(e.to_string()))
    }
}
