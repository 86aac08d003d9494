//! Windows API wrappers: the `WH_MOUSE_LL` hook facility, the message
//! pump it depends on, and the cursor primitive.

pub mod cursor;
pub mod hooks;
pub mod message_loop;

pub use cursor::*;
pub use hooks::*;
pub use message_loop::*;
