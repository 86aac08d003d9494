//! mousekit - global mouse hooks and fixed-rate background tasks.
//!
//! - [`hook`]: system-wide low-level mouse hook with a single callback
//! - [`scheduler`]: worker thread running a task at a fixed frequency
//! - [`util`]: cursor position, 2D vectors and console helpers

pub mod config;
pub mod error;
pub mod event;
pub mod hook;
pub mod scheduler;
pub mod util;

#[cfg(windows)]
pub mod winapi_utils;

pub use config::Config;
pub use error::*;
pub use event::{EventKind, InputEvent, MouseButton, MousePayload};
pub use hook::{HookHandle, HookRegistry};
pub use scheduler::{start_periodic, stop_periodic, PeriodicScheduler, SchedulerHandle};
