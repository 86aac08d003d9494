//! Hook lifecycle: one live hook handle bound to one callback slot.

use super::backend::{default_backend, HookBackend};
use super::dispatcher::{CallbackSlot, Dispatcher};
use crate::error::HookError;
use crate::event::{EventKind, MousePayload};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle of an installed mouse hook.
///
/// Valid from install until the owning registry uninstalls it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle {
    registry: u64,
    raw: isize,
}

impl HookHandle {
    /// Returns the raw OS handle value.
    pub fn raw(&self) -> isize {
        self.raw
    }
}

/// Owner of a system-wide low-level mouse hook and its callback.
///
/// Holds at most one live hook. A second [`install`](Self::install) while
/// one is live is rejected with [`HookError::AlreadyInstalled`] and leaves
/// the existing hook in place.
///
/// Dropping the registry uninstalls the hook; a failure there is logged.
///
/// # Example
/// ```no_run
/// use mousekit::hook::HookRegistry;
///
/// let registry = HookRegistry::new();
/// let handle = registry.register_mouse_hook(|kind, payload| {
///     // Runs on the OS hook thread: keep it short, never block
///     let _ = (kind, payload.x, payload.y);
/// })?;
/// // ... run the message loop ...
/// registry.unregister_mouse_hook(handle)?;
/// # Ok::<(), mousekit::HookError>(())
/// ```
pub struct HookRegistry {
    id: u64,
    backend: Box<dyn HookBackend>,
    slot: Arc<CallbackSlot>,
    live: Mutex<Option<HookHandle>>,
}

impl HookRegistry {
    /// Creates a registry on the platform's hook facility.
    pub fn new() -> Self {
        Self::from_boxed(default_backend())
    }

    /// Creates a registry on a specific hook facility.
    pub fn with_backend(backend: impl HookBackend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    fn from_boxed(backend: Box<dyn HookBackend>) -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            backend,
            slot: Arc::new(CallbackSlot::default()),
            live: Mutex::new(None),
        }
    }

    fn lock_live(&self) -> MutexGuard<'_, Option<HookHandle>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs the low-level mouse hook.
    pub fn install(&self) -> Result<HookHandle, HookError> {
        let mut live = self.lock_live();
        self.install_locked(&mut live)
    }

    fn reject_if_live(&self, live: &Option<HookHandle>) -> Result<(), HookError> {
        if let Some(existing) = live {
            tracing::warn!(
                backend = self.backend.name(),
                raw = existing.raw,
                "Mouse hook already installed, rejecting second install"
            );
            return Err(HookError::AlreadyInstalled);
        }
        Ok(())
    }

    fn install_locked(&self, live: &mut Option<HookHandle>) -> Result<HookHandle, HookError> {
        self.reject_if_live(live)?;

        let raw = self
            .backend
            .install(Dispatcher::new(Arc::clone(&self.slot)))?;
        let handle = HookHandle {
            registry: self.id,
            raw,
        };
        *live = Some(handle);

        tracing::info!(backend = self.backend.name(), raw, "Mouse hook installed");
        Ok(handle)
    }

    /// Publishes `callback` as the receiver of all dispatched events.
    ///
    /// A dispatch already in flight finishes with the previous callback.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(EventKind, &MousePayload) + Send + Sync + 'static,
    {
        self.slot.publish(Some(Box::new(callback)));
    }

    /// Removes the callback. Subsequent events are dropped.
    pub fn clear_callback(&self) {
        self.slot.publish(None);
    }

    /// Releases the hook and clears the callback.
    ///
    /// Calling this without a live hook is a no-op. On failure the handle
    /// is forgotten anyway and must not be reused.
    pub fn uninstall(&self) -> Result<(), HookError> {
        let taken = self.lock_live().take();
        match taken {
            Some(handle) => self.release(handle),
            None => Ok(()),
        }
    }

    fn release(&self, handle: HookHandle) -> Result<(), HookError> {
        let result = self.backend.uninstall(handle.raw);
        self.slot.publish(None);

        if result.is_ok() {
            tracing::info!(
                backend = self.backend.name(),
                raw = handle.raw,
                "Mouse hook uninstalled"
            );
        }
        result
    }

    /// Sets `callback` and installs the hook.
    ///
    /// If the install fails the callback is cleared again; an existing
    /// hook's callback is never replaced by a rejected registration.
    pub fn register_mouse_hook<F>(&self, callback: F) -> Result<HookHandle, HookError>
    where
        F: Fn(EventKind, &MousePayload) + Send + Sync + 'static,
    {
        let mut live = self.lock_live();
        self.reject_if_live(&live)?;

        self.set_callback(callback);
        self.install_locked(&mut live).inspect_err(|_| {
            self.slot.publish(None);
        })
    }

    /// Uninstalls the hook identified by `handle`.
    pub fn unregister_mouse_hook(&self, handle: HookHandle) -> Result<(), HookError> {
        let taken = {
            let mut live = self.lock_live();
            if *live != Some(handle) {
                return Err(HookError::ForeignHandle);
            }
            live.take()
        };

        match taken {
            Some(handle) => self.release(handle),
            None => Ok(()),
        }
    }

    /// Whether a hook is currently live.
    pub fn is_installed(&self) -> bool {
        self.lock_live().is_some()
    }

    /// Returns the live handle, if any.
    pub fn handle(&self) -> Option<HookHandle> {
        *self.lock_live()
    }

    /// Whether a callback is currently published.
    pub fn has_callback(&self) -> bool {
        self.slot.is_set()
    }

    /// Callback invocations that panicked.
    pub fn panicked_callbacks(&self) -> u64 {
        self.slot.panicked()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HookRegistry {
    fn drop(&mut self) {
        if let Err(e) = self.uninstall() {
            tracing::error!(
                backend = self.backend.name(),
                error = %e,
                "Failed to unhook"
            );
        }
    }
}
