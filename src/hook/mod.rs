//! System-wide mouse hook: registry, dispatch and hook facilities.
//!
//! The OS calls into [`Dispatcher`] on its own thread, at any time, and
//! expects a fast return. [`HookRegistry`] owns the install/uninstall
//! lifecycle and the callback the dispatcher invokes.

pub mod backend;
pub mod dispatcher;
pub mod registry;

pub use backend::*;
pub use dispatcher::{DispatchCallback, Dispatcher};
pub use registry::*;
