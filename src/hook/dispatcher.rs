//! Event dispatch on the hook thread.
//!
//! # Performance Critical
//!
//! [`Dispatcher::handle`] runs synchronously inside the OS input pipeline.
//! The OS may silently remove the whole hook if the chain does not return
//! within its own time budget, so this path:
//! - Uses only atomics and a lock-free slot load (no waiting on locks)
//! - Never allocates or performs I/O on the normal path
//! - Always forwards the event to the next hook
//!
//! Registered callbacks inherit the same constraints.

use crate::event::{classify, EventKind, MousePayload};
use arc_swap::ArcSwapOption;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// User callback invoked for every classified mouse event.
pub type DispatchCallback = dyn Fn(EventKind, &MousePayload) + Send + Sync;

/// `ArcSwap` stores thin pointers, so the trait object is boxed once.
type BoxedCallback = Box<DispatchCallback>;

/// Shared slot holding the currently published callback.
#[derive(Default)]
pub(crate) struct CallbackSlot {
    current: ArcSwapOption<BoxedCallback>,
    panicked: AtomicU64,
}

impl CallbackSlot {
    /// Replaces the callback with a single atomic pointer swap.
    ///
    /// A dispatch in flight keeps its own reference to the previous
    /// callback and finishes with it.
    pub(crate) fn publish(&self, callback: Option<BoxedCallback>) {
        self.current.store(callback.map(Arc::new));
    }

    pub(crate) fn is_set(&self) -> bool {
        self.current.load().is_some()
    }

    /// Loads the current callback. Never blocks and never fails: the result
    /// is either the callback before or after a concurrent publish.
    #[inline]
    fn load(&self) -> Option<Arc<BoxedCallback>> {
        self.current.load_full()
    }

    pub(crate) fn panicked(&self) -> u64 {
        self.panicked.load(Ordering::Relaxed)
    }
}

/// Entry point the hook facility calls for every raw mouse message.
///
/// Cheap to clone; every clone reads the same callback slot.
#[derive(Clone)]
pub struct Dispatcher {
    slot: Arc<CallbackSlot>,
}

impl Dispatcher {
    pub(crate) fn new(slot: Arc<CallbackSlot>) -> Self {
        Self { slot }
    }

    /// Classifies and delivers one raw message, then forwards it.
    ///
    /// `forward` passes the event to the next hook in the OS chain. It is
    /// called exactly once whether or not a callback is registered, and its
    /// result is returned to the caller.
    #[inline]
    pub fn handle<R>(&self, code: u32, payload: &MousePayload, forward: impl FnOnce() -> R) -> R {
        self.deliver(code, payload);
        forward()
    }

    /// Classifies `code` and invokes the current callback, if any.
    ///
    /// Returns `true` when a callback ran to completion.
    pub fn deliver(&self, code: u32, payload: &MousePayload) -> bool {
        let kind = classify(code);
        let Some(callback) = self.slot.load() else {
            return false;
        };

        // Unwinding out of an `extern "system"` hook procedure aborts the process
        match panic::catch_unwind(AssertUnwindSafe(|| callback(kind, payload))) {
            Ok(()) => true,
            Err(_) => {
                self.slot.panicked.fetch_add(1, Ordering::Relaxed);
                tracing::error!(%kind, "Mouse hook callback panicked");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{MouseButton, MSG_LBUTTON_DOWN, MSG_MOUSE_MOVE};
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    fn dispatcher() -> (Arc<CallbackSlot>, Dispatcher) {
        let slot = Arc::new(CallbackSlot::default());
        (Arc::clone(&slot), Dispatcher::new(slot))
    }

    #[test]
    fn test_no_callback_drops_silently_but_forwards() {
        let (slot, dispatcher) = dispatcher();
        let mut forwarded = 0;

        let delivered = dispatcher.deliver(MSG_MOUSE_MOVE, &MousePayload::at(1, 2));
        dispatcher.handle(MSG_MOUSE_MOVE, &MousePayload::at(1, 2), || forwarded += 1);

        assert!(!delivered);
        assert_eq!(forwarded, 1);
        assert!(!slot.is_set());
    }

    #[test]
    fn test_records_kind_and_position() {
        let (slot, dispatcher) = dispatcher();
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        slot.publish(Some(Box::new(move |kind: EventKind, payload: &MousePayload| {
            sink.lock().unwrap().push((kind, payload.x, payload.y));
        })));

        let result = dispatcher.handle(MSG_MOUSE_MOVE, &MousePayload::at(100, 200), || 7);

        assert_eq!(result, 7);
        assert_eq!(*records.lock().unwrap(), vec![(EventKind::Move, 100, 200)]);
    }

    #[test]
    fn test_unknown_codes_are_dispatched() {
        let (slot, dispatcher) = dispatcher();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        slot.publish(Some(Box::new(move |kind: EventKind, _: &MousePayload| {
            sink.lock().unwrap().push(kind);
        })));

        dispatcher.deliver(0xFFFF, &MousePayload::default());
        dispatcher.deliver(MSG_LBUTTON_DOWN, &MousePayload::default());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                EventKind::Unknown(0xFFFF),
                EventKind::ButtonDown(MouseButton::Left)
            ]
        );
    }

    #[test]
    fn test_panicking_callback_still_forwards() {
        let (slot, dispatcher) = dispatcher();
        slot.publish(Some(Box::new(|_: EventKind, _: &MousePayload| panic!("callback failure"))));

        let mut forwarded = false;
        dispatcher.handle(MSG_MOUSE_MOVE, &MousePayload::default(), || forwarded = true);

        assert!(forwarded);
        assert_eq!(slot.panicked(), 1);
    }

    #[test]
    fn test_republish_takes_effect_for_next_dispatch() {
        let (slot, dispatcher) = dispatcher();
        let first = Arc::new(AtomicU64::new(0));
        let second = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&first);
        slot.publish(Some(Box::new(move |_: EventKind, _: &MousePayload| {
            counter.fetch_add(1, Ordering::Relaxed);
        })));
        dispatcher.deliver(MSG_MOUSE_MOVE, &MousePayload::default());

        let counter = Arc::clone(&second);
        slot.publish(Some(Box::new(move |_: EventKind, _: &MousePayload| {
            counter.fetch_add(1, Ordering::Relaxed);
        })));
        dispatcher.deliver(MSG_MOUSE_MOVE, &MousePayload::default());

        assert_eq!(first.load(Ordering::Relaxed), 1);
        assert_eq!(second.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_dispatch_completes_quickly() {
        let (slot, dispatcher) = dispatcher();
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        slot.publish(Some(Box::new(move |_: EventKind, _: &MousePayload| {
            counter.fetch_add(1, Ordering::Relaxed);
        })));

        let payload = MousePayload::at(5, 5);
        let start = Instant::now();
        for _ in 0..10_000 {
            dispatcher.handle(MSG_MOUSE_MOVE, &payload, || ());
        }
        let elapsed = start.elapsed();

        assert_eq!(count.load(Ordering::Relaxed), 10_000);
        // Well inside any OS hook budget even on a loaded CI machine
        assert!(elapsed < Duration::from_millis(500), "took {elapsed:?}");
    }

    #[test]
    fn test_concurrent_publish_never_tears() {
        let (slot, dispatcher) = dispatcher();
        let hits = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&hits);
        slot.publish(Some(Box::new(move |_: EventKind, _: &MousePayload| {
            counter.fetch_add(1, Ordering::Relaxed);
        })));

        let publisher = {
            let slot = Arc::clone(&slot);
            let hits = Arc::clone(&hits);
            std::thread::spawn(move || {
                for _ in 0..1_000 {
                    let hits = Arc::clone(&hits);
                    slot.publish(Some(Box::new(move |_: EventKind, _: &MousePayload| {
                        hits.fetch_add(1, Ordering::Relaxed);
                    })));
                }
            })
        };

        let mut delivered = 0u64;
        for _ in 0..1_000 {
            if dispatcher.deliver(MSG_MOUSE_MOVE, &MousePayload::default()) {
                delivered += 1;
            }
        }
        publisher.join().unwrap();

        // Every delivery ran a complete callback exactly once
        assert_eq!(hits.load(Ordering::Relaxed), delivered);
        assert_eq!(delivered, 1_000);
    }

    #[test]
    fn test_continuous_republish_loses_no_events() {
        let (slot, dispatcher) = dispatcher();
        let hits = Arc::new(AtomicU64::new(0));
        let stop = Arc::new(AtomicBool::new(false));

        let make_callback = |hits: &Arc<AtomicU64>| -> BoxedCallback {
            let hits = Arc::clone(hits);
            Box::new(move |_: EventKind, _: &MousePayload| {
                hits.fetch_add(1, Ordering::Relaxed);
            })
        };
        slot.publish(Some(make_callback(&hits)));

        let publisher = {
            let slot = Arc::clone(&slot);
            let hits = Arc::clone(&hits);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    slot.publish(Some(make_callback(&hits)));
                }
            })
        };

        let mut missed = 0u64;
        for _ in 0..200_000 {
            if !dispatcher.deliver(MSG_MOUSE_MOVE, &MousePayload::at(1, 1)) {
                missed += 1;
            }
        }
        stop.store(true, Ordering::Relaxed);
        publisher.join().unwrap();

        assert_eq!(missed, 0);
        assert_eq!(hits.load(Ordering::Relaxed), 200_000);
    }
}
