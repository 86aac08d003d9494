//! Error types for hooks, the scheduler and the platform helpers.

use thiserror::Error;

/// Failures of the mouse hook lifecycle.
#[derive(Debug, Error)]
pub enum HookError {
    /// The OS refused to install the low-level mouse hook.
    #[error("failed to install mouse hook: {0}")]
    Registration(String),

    /// The OS refused to release the hook. The handle is unusable afterwards.
    #[error("failed to uninstall mouse hook: {0}")]
    Unhook(String),

    /// A hook is already live for this registry (or, for the Windows
    /// backend, for this process).
    #[error("a mouse hook is already installed")]
    AlreadyInstalled,

    /// The handle is not the live handle of this registry.
    #[error("hook handle does not belong to this registry")]
    ForeignHandle,
}

/// Failures of the periodic scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid frequency {0} Hz, must be greater than zero")]
    InvalidFrequency(u32),

    #[error("scheduler is already running")]
    AlreadyRunning,

    #[error("failed to spawn scheduler worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// The task panicked and took the worker thread down with it.
    #[error("scheduler worker panicked")]
    WorkerPanicked,
}

/// Failures of the cursor primitive.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("cursor access is not supported on this platform")]
    Unsupported,

    #[error("cursor call failed: {0}")]
    Os(String),
}

/// Failures while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
