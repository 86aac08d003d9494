//! Fixed-rate task runner on a dedicated worker thread.
//!
//! Scheduling is fixed-delay: the worker waits `1s / frequency_hz`, runs
//! the task, and waits again. The time spent in the task is not
//! compensated, so a run of `T` seconds produces slightly fewer than
//! `T * frequency_hz` ticks and a slow task stretches the real period.
//! Ticks never overlap.
//!
//! Cancellation is cooperative. [`PeriodicScheduler::stop`] clears an
//! atomic flag and wakes the worker out of its wait; a task that is already
//! running is never interrupted, and `stop` joins the worker without a
//! timeout. A task blocked forever therefore blocks `stop` forever.

use crate::error::SchedulerError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Runs a task at a fixed frequency until stopped.
///
/// `Idle -> Running -> Idle`. Dropping a running scheduler stops it.
///
/// # Example
/// ```no_run
/// use mousekit::scheduler::PeriodicScheduler;
///
/// let mut scheduler = PeriodicScheduler::new();
/// scheduler.start(10, || println!("tick"))?;
/// std::thread::sleep(std::time::Duration::from_secs(1));
/// scheduler.stop()?;
/// # Ok::<(), mousekit::SchedulerError>(())
/// ```
#[derive(Debug)]
pub struct PeriodicScheduler {
    name: String,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    frequency_hz: u32,
}

impl PeriodicScheduler {
    /// Creates an idle scheduler.
    pub fn new() -> Self {
        Self::named("periodic-worker")
    }

    /// Creates an idle scheduler whose worker thread carries `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            frequency_hz: 0,
        }
    }

    /// Spawns the worker and starts invoking `task` at `frequency_hz`.
    ///
    /// Fails with [`SchedulerError::InvalidFrequency`] for 0 Hz and with
    /// [`SchedulerError::AlreadyRunning`] if a live worker exists; no thread
    /// is spawned in either case. A worker whose task panicked counts as
    /// idle: it is joined and replaced.
    pub fn start<F>(&mut self, frequency_hz: u32, task: F) -> Result<(), SchedulerError>
    where
        F: FnMut() + Send + 'static,
    {
        if frequency_hz == 0 {
            return Err(SchedulerError::InvalidFrequency(frequency_hz));
        }
        if self.worker.as_ref().is_some_and(JoinHandle::is_finished) {
            self.reap_dead_worker();
        }
        if self.worker.is_some() {
            tracing::warn!(
                name = %self.name,
                frequency_hz = self.frequency_hz,
                "Scheduler already running"
            );
            return Err(SchedulerError::AlreadyRunning);
        }

        let interval = interval_for(frequency_hz);
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let worker = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || run_worker(flag, interval, task))
            .map_err(SchedulerError::Spawn)?;

        self.running = running;
        self.worker = Some(worker);
        self.frequency_hz = frequency_hz;

        tracing::info!(
            name = %self.name,
            frequency_hz,
            interval_ms = interval.as_millis(),
            "Scheduler started"
        );
        Ok(())
    }

    /// Signals the worker to stop and joins it.
    ///
    /// Blocks until the task in progress (if any) returns. Stopping an
    /// idle scheduler does nothing.
    pub fn stop(&mut self) -> Result<(), SchedulerError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        self.running.store(false, Ordering::Release);
        worker.thread().unpark();

        tracing::debug!(name = %self.name, "Waiting for scheduler worker to exit");
        let joined = worker.join();
        tracing::info!(name = %self.name, "Scheduler stopped");

        joined.map_err(|_| SchedulerError::WorkerPanicked)
    }

    /// Joins a worker that exited on its own, which only a panic causes.
    fn reap_dead_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!(
                    name = %self.name,
                    "Previous scheduler task panicked, starting a new worker"
                );
            }
        }
    }

    /// Whether a worker exists and has not exited.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Frequency of the current (or last) run, 0 if never started.
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Delay between ticks of the current (or last) run.
    pub fn interval(&self) -> Option<Duration> {
        (self.frequency_hz > 0).then(|| interval_for(self.frequency_hz))
    }
}

impl Default for PeriodicScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PeriodicScheduler {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::error!(name = %self.name, error = %e, "Scheduler worker failed");
        }
    }
}

/// Handle to a scheduler created by [`start_periodic`].
#[derive(Debug)]
pub struct SchedulerHandle(PeriodicScheduler);

impl SchedulerHandle {
    pub fn is_running(&self) -> bool {
        self.0.is_running()
    }

    pub fn frequency_hz(&self) -> u32 {
        self.0.frequency_hz()
    }
}

/// Starts `task` at `frequency_hz` on a new worker thread.
pub fn start_periodic<F>(frequency_hz: u32, task: F) -> Result<SchedulerHandle, SchedulerError>
where
    F: FnMut() + Send + 'static,
{
    let mut scheduler = PeriodicScheduler::new();
    scheduler.start(frequency_hz, task)?;
    Ok(SchedulerHandle(scheduler))
}

/// Stops the scheduler behind `handle`, blocking until its worker exits.
pub fn stop_periodic(mut handle: SchedulerHandle) -> Result<(), SchedulerError> {
    handle.0.stop()
}

fn interval_for(frequency_hz: u32) -> Duration {
    Duration::from_secs(1) / frequency_hz
}

fn run_worker(running: Arc<AtomicBool>, interval: Duration, mut task: impl FnMut()) {
    tracing::debug!(
        interval_us = interval.as_micros() as u64,
        "Scheduler worker started"
    );

    let mut ticks: u64 = 0;
    while wait_interval(&running, interval) {
        task();
        ticks += 1;
    }

    tracing::debug!(ticks, "Scheduler worker exiting");
}

/// Waits `interval` unless stopped first. Returns whether to run the task.
fn wait_interval(running: &AtomicBool, interval: Duration) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if !running.load(Ordering::Acquire) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        // Spurious wakeups fall through to the next check
        thread::park_timeout(deadline - now);
    }
}
