//! Hook facilities that deliver raw mouse messages to a [`Dispatcher`].

use super::dispatcher::Dispatcher;
use crate::error::HookError;
use crate::event::MousePayload;
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A platform facility able to install a system-wide low-level mouse hook.
///
/// Implementations call [`Dispatcher::handle`] for every message and must
/// forward each one to the next hook in their chain.
pub trait HookBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Installs the hook and routes its messages to `dispatcher`.
    ///
    /// Returns the raw OS handle.
    fn install(&self, dispatcher: Dispatcher) -> Result<isize, HookError>;

    /// Releases a handle returned by [`HookBackend::install`].
    fn uninstall(&self, raw: isize) -> Result<(), HookError>;
}

/// Returns the hook facility of the current platform.
pub fn default_backend() -> Box<dyn HookBackend> {
    #[cfg(windows)]
    {
        Box::new(crate::winapi_utils::WindowsHookBackend)
    }
    #[cfg(not(windows))]
    {
        Box::new(UnsupportedBackend)
    }
}

/// Backend for platforms without a low-level mouse hook.
///
/// Every install is denied.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedBackend;

impl HookBackend for UnsupportedBackend {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn install(&self, _dispatcher: Dispatcher) -> Result<isize, HookError> {
        Err(HookError::Registration(
            "low-level mouse hooks are not available on this platform".to_string(),
        ))
    }

    fn uninstall(&self, _raw: isize) -> Result<(), HookError> {
        Ok(())
    }
}

#[derive(Default)]
struct ManualState {
    target: RwLock<Option<Dispatcher>>,
    next_raw: AtomicIsize,
    forwarded: AtomicU64,
    deny_install: AtomicBool,
    deny_uninstall: AtomicBool,
}

/// In-process hook facility driven by [`ManualBackend::inject`].
///
/// Behaves like a single OS hook slot: one dispatcher at a time, every
/// injected message forwarded once. Clones share the same slot, so one
/// clone can be handed to a registry while another injects events.
#[derive(Clone, Default)]
pub struct ManualBackend {
    state: Arc<ManualState>,
}

impl ManualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers one raw message as the OS would.
    ///
    /// Returns `false` when no hook is installed to observe it.
    pub fn inject(&self, code: u32, payload: &MousePayload) -> bool {
        let target = self
            .state
            .target
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let forward = || {
            self.state.forwarded.fetch_add(1, Ordering::Relaxed);
        };
        match target {
            Some(dispatcher) => {
                dispatcher.handle(code, payload, forward);
                true
            }
            None => {
                forward();
                false
            }
        }
    }

    /// Number of messages passed on to the next hook.
    pub fn forwarded(&self) -> u64 {
        self.state.forwarded.load(Ordering::Relaxed)
    }

    /// Whether a dispatcher is currently installed.
    pub fn is_hooked(&self) -> bool {
        self.state
            .target
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Makes subsequent installs fail like an OS denial.
    pub fn deny_install(&self, deny: bool) {
        self.state.deny_install.store(deny, Ordering::SeqCst);
    }

    /// Makes subsequent uninstalls fail like an OS denial.
    pub fn deny_uninstall(&self, deny: bool) {
        self.state.deny_uninstall.store(deny, Ordering::SeqCst);
    }
}

impl HookBackend for ManualBackend {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn install(&self, dispatcher: Dispatcher) -> Result<isize, HookError> {
        if self.state.deny_install.load(Ordering::SeqCst) {
            return Err(HookError::Registration("install denied".to_string()));
        }

        let mut target = self
            .state
            .target
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if target.is_some() {
            return Err(HookError::AlreadyInstalled);
        }
        *target = Some(dispatcher);

        Ok(self.state.next_raw.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn uninstall(&self, _raw: isize) -> Result<(), HookError> {
        // The slot is released even when the release is reported as failed
        self.state
            .target
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if self.state.deny_uninstall.load(Ordering::SeqCst) {
            return Err(HookError::Unhook("uninstall denied".to_string()));
        }
        Ok(())
    }
}
