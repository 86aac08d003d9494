//! Classified mouse events.
//!
//! Raw message codes arriving from the hook facility are mapped onto
//! [`EventKind`] by [`classify`]. Classification never fails: codes outside
//! the fixed table become [`EventKind::Unknown`] and are still dispatched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mouse-move message code.
pub const MSG_MOUSE_MOVE: u32 = 0x0200;
/// Left button pressed.
pub const MSG_LBUTTON_DOWN: u32 = 0x0201;
/// Left button released.
pub const MSG_LBUTTON_UP: u32 = 0x0202;
/// Right button pressed.
pub const MSG_RBUTTON_DOWN: u32 = 0x0204;
/// Right button released.
pub const MSG_RBUTTON_UP: u32 = 0x0205;

/// Mouse button reported by a button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
}

/// Kind of a classified mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    Move,
    /// Any code outside the fixed table, kept for diagnostics.
    Unknown(u32),
}

impl EventKind {
    /// Returns the platform message name for known kinds.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::ButtonDown(MouseButton::Left) => Some("WM_LBUTTONDOWN"),
            Self::ButtonUp(MouseButton::Left) => Some("WM_LBUTTONUP"),
            Self::ButtonDown(MouseButton::Right) => Some("WM_RBUTTONDOWN"),
            Self::ButtonUp(MouseButton::Right) => Some("WM_RBUTTONUP"),
            Self::Move => Some("WM_MOUSEMOVE"),
            Self::Unknown(_) => None,
        }
    }

    /// True for button down/up events.
    pub fn is_button(&self) -> bool {
        matches!(self, Self::ButtonDown(_) | Self::ButtonUp(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "Unknown msg: {code}"),
            known => f.write_str(known.name().unwrap_or_default()),
        }
    }
}

/// Maps a raw message code to its [`EventKind`].
#[inline]
pub fn classify(code: u32) -> EventKind {
    match code {
        MSG_LBUTTON_DOWN => EventKind::ButtonDown(MouseButton::Left),
        MSG_LBUTTON_UP => EventKind::ButtonUp(MouseButton::Left),
        MSG_RBUTTON_DOWN => EventKind::ButtonDown(MouseButton::Right),
        MSG_RBUTTON_UP => EventKind::ButtonUp(MouseButton::Right),
        MSG_MOUSE_MOVE => EventKind::Move,
        other => EventKind::Unknown(other),
    }
}

/// Event details supplied by the hook facility.
///
/// Handed to callbacks by reference only; the borrow ends when the dispatch
/// call returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MousePayload {
    /// Screen X coordinate.
    pub x: i32,
    /// Screen Y coordinate.
    pub y: i32,
    /// Wheel delta or X-button data, platform encoded.
    pub mouse_data: u32,
    /// Injection flags.
    pub flags: u32,
    /// Event timestamp in milliseconds.
    pub time: u32,
    /// Extra information attached by the event's origin.
    pub extra_info: usize,
}

impl MousePayload {
    /// Creates a payload carrying only a position.
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }
}

/// One classified mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent<'a> {
    pub kind: EventKind,
    pub payload: &'a MousePayload,
}

impl<'a> InputEvent<'a> {
    /// Classifies `code` and binds it to `payload`.
    #[inline]
    pub fn new(code: u32, payload: &'a MousePayload) -> Self {
        Self {
            kind: classify(code),
            payload,
        }
    }
}
