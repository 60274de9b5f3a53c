//! Periodic tick source
//!
//! The tick thread sleeps toward an absolute next-tick deadline and
//! re-reads the interval every lap, so `set_interval` takes effect on the
//! next tick and sleep jitter does not accumulate into drift. A tick that
//! comes out of a long stall fires once and re-anchors rather than
//! replaying the backlog.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use evq_core::{elog_debug, elog_warn};
use evq_core::{EventKind, EventPayload, EventQueue, EventSource, SourceId};

/// A timer that fires `TIMER_TICK` events at a fixed interval
///
/// Created stopped; call [`start`](Ticker::start) to begin ticking.
/// Dropping the ticker stops the thread and implicitly unregisters the
/// underlying source, purging undelivered ticks.
pub struct Ticker {
    shared: Arc<TickerShared>,
    thread: Option<JoinHandle<()>>,
}

struct TickerShared {
    source: EventSource,
    running: AtomicBool,
    interval_ns: AtomicU64,
    count: AtomicI64,
}

impl Ticker {
    /// Create a stopped ticker with the given interval
    ///
    /// Sub-millisecond intervals are honored as given; whether the OS
    /// scheduler can keep up is another matter.
    pub fn new(interval: Duration) -> Ticker {
        Ticker {
            shared: Arc::new(TickerShared {
                source: EventSource::new(),
                running: AtomicBool::new(false),
                interval_ns: AtomicU64::new(interval_as_ns(interval)),
                count: AtomicI64::new(0),
            }),
            thread: None,
        }
    }

    /// The event source backing this ticker
    ///
    /// Exposed for data attachment and identity checks; registration goes
    /// through [`register`](Ticker::register).
    pub fn source(&self) -> &EventSource {
        &self.shared.source
    }

    /// Id carried by every tick event this ticker produces
    pub fn id(&self) -> SourceId {
        self.shared.source.id()
    }

    /// Register the ticker with a queue (idempotent)
    pub fn register(&self, queue: &EventQueue) {
        self.shared.source.register(queue);
    }

    /// Unregister from a queue, purging undelivered ticks there
    pub fn unregister(&self, queue: &EventQueue) {
        self.shared.source.unregister(queue);
    }

    /// Ticks fired since the last counter reset
    pub fn count(&self) -> i64 {
        self.shared.count.load(Ordering::Acquire)
    }

    /// Reset or preload the tick counter
    pub fn set_count(&self, count: i64) {
        self.shared.count.store(count, Ordering::Release);
    }

    /// Current interval
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.shared.interval_ns.load(Ordering::Acquire))
    }

    /// Change the interval; applies from the next tick onward
    pub fn set_interval(&self, interval: Duration) {
        self.shared
            .interval_ns
            .store(interval_as_ns(interval), Ordering::Release);
    }

    /// True while the tick thread is running
    pub fn is_started(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Start the tick thread; no effect if already started
    pub fn start(&mut self) {
        if self.shared.running.swap(true, Ordering::AcqRel) {
            return;
        }
        elog_debug!("evq-timer: ticker {} starting", self.id());
        let shared = Arc::clone(&self.shared);
        self.thread = Some(
            thread::Builder::new()
                .name("evq-ticker".into())
                .spawn(move || tick_loop(&shared))
                .unwrap_or_else(|e| {
                    // Spawn only fails under resource exhaustion; surface
                    // it instead of ticking never.
                    panic!("failed to spawn ticker thread: {e}");
                }),
        );
    }

    /// Stop the tick thread and join it; no effect if already stopped
    pub fn stop(&mut self) {
        if !self.shared.running.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                elog_warn!("evq-timer: ticker {} thread panicked", self.id());
            }
        }
        elog_debug!("evq-timer: ticker {} stopped", self.id());
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn interval_as_ns(interval: Duration) -> u64 {
    // A zero interval would spin; clamp to 1us.
    (interval.as_nanos() as u64).max(1_000)
}

/// Body of the tick thread
fn tick_loop(shared: &TickerShared) {
    let mut next_tick = Instant::now() + Duration::from_nanos(shared.interval_ns.load(Ordering::Acquire));

    while shared.running.load(Ordering::Acquire) {
        let now = Instant::now();
        if now < next_tick {
            // Sleep in small slices so stop() is honored promptly even
            // with long intervals.
            thread::sleep((next_tick - now).min(Duration::from_millis(10)));
            continue;
        }

        let count = shared.count.fetch_add(1, Ordering::AcqRel) + 1;
        shared
            .source
            .push(EventKind::TIMER_TICK, EventPayload::Timer { count });

        let interval = Duration::from_nanos(shared.interval_ns.load(Ordering::Acquire));
        next_tick += interval;
        // After a stall longer than one interval, fire from now instead
        // of replaying the missed ticks.
        let now = Instant::now();
        if next_tick < now {
            next_tick = now + interval;
        }
    }
}
