//! mousekit - live mouse activity monitor.
//!
//! Installs the global mouse hook, counts events lock-free from the hook
//! callback and reports them from a periodic status task until Ctrl+C.

use mousekit::config::Config;
use mousekit::event::{EventKind, MouseButton, MousePayload};
use mousekit::hook::HookRegistry;
use mousekit::scheduler::PeriodicScheduler;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::sync::Arc;

/// Counters written by the hook callback and read by the status task.
#[derive(Debug, Default)]
struct InputCounters {
    left_clicks: AtomicU64,
    right_clicks: AtomicU64,
    moves: AtomicU64,
    other: AtomicU64,
    last_x: AtomicI32,
    last_y: AtomicI32,
}

impl InputCounters {
    /// Hook-thread side: atomics only.
    fn record(&self, kind: EventKind, payload: &MousePayload) {
        match kind {
            EventKind::ButtonDown(MouseButton::Left) => {
                self.left_clicks.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::ButtonDown(MouseButton::Right) => {
                self.right_clicks.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::ButtonUp(_) => {}
            EventKind::Move => {
                self.moves.fetch_add(1, Ordering::Relaxed);
                self.last_x.store(payload.x, Ordering::Relaxed);
                self.last_y.store(payload.y, Ordering::Relaxed);
            }
            EventKind::Unknown(_) => {
                self.other.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn snapshot(&self) -> (u64, u64, u64, u64) {
        (
            self.left_clicks.load(Ordering::Relaxed),
            self.right_clicks.load(Ordering::Relaxed),
            self.moves.load(Ordering::Relaxed),
            self.other.load(Ordering::Relaxed),
        )
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Invalid config file, using defaults");
    }

    println!("mousekit - mouse activity monitor");
    println!();

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        println!("\nShutdown signal received...");
        shutdown_ctrlc.store(true, Ordering::SeqCst);
        #[cfg(windows)]
        mousekit::winapi_utils::post_quit_message(0);
    })?;

    let counters = Arc::new(InputCounters::default());

    // Install hook
    let registry = HookRegistry::new();
    let hook_counters = Arc::clone(&counters);
    match registry.register_mouse_hook(move |kind, payload| hook_counters.record(kind, payload)) {
        Ok(handle) => println!("Mouse hook installed (handle {:#x})", handle.raw()),
        Err(e) => {
            println!("Mouse hook unavailable: {e}");
            println!("Continuing with status reporting only...");
        }
    }

    // Start status task
    let mut status = PeriodicScheduler::named("status");
    let status_counters = Arc::clone(&counters);
    let log_moves = config.log_moves;
    status.start(config.status_hz, move || {
        let (left, right, moves, other) = status_counters.snapshot();
        tracing::info!(left, right, moves, other, "Mouse activity");
        if log_moves {
            tracing::info!(
                x = status_counters.last_x.load(Ordering::Relaxed),
                y = status_counters.last_y.load(Ordering::Relaxed),
                "Last move"
            );
        }
    })?;
    println!(
        "Status every {:?}, press Ctrl+C to quit",
        status.interval().unwrap_or_default()
    );

    wait_for_shutdown(&shutdown);

    // Cleanup
    println!("\nShutting down...");
    shutdown.store(true, Ordering::SeqCst);
    status.stop()?;
    if let Err(e) = registry.uninstall() {
        tracing::error!(error = %e, "Failed to uninstall mouse hook");
    }

    let (left, right, moves, other) = counters.snapshot();
    println!();
    println!("Left clicks:   {left}");
    println!("Right clicks:  {right}");
    println!("Moves:         {moves}");
    println!("Other events:  {other}");
    if registry.panicked_callbacks() > 0 {
        println!("Panicked callbacks: {}", registry.panicked_callbacks());
    }
    Ok(())
}

/// Blocks until Ctrl+C. On Windows this pumps messages so the hook fires.
#[cfg(windows)]
fn wait_for_shutdown(shutdown: &AtomicBool) {
    if shutdown.load(Ordering::SeqCst) {
        return;
    }
    tracing::info!("Running message loop...");
    mousekit::winapi_utils::run_message_loop();
}

#[cfg(not(windows))]
fn wait_for_shutdown(shutdown: &AtomicBool) {
    while !shutdown.load(Ordering::Relaxed) {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }
}
