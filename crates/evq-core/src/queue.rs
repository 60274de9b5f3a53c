//! Bounded, thread-safe FIFO of events
//!
//! The queue is the unit consumers wait on. Producers (sources) fan events
//! into every queue they are registered with; consumers poll with
//! [`EventQueue::get_next`] or park in [`EventQueue::wait`].
//!
//! One mutex guards both the event sequence and the registered-source set.
//! The condition variable is broadcast on every successful append - wake
//! everyone, let the recheck loop decide who actually gets the event - and
//! on [`EventQueue::close`], so waiters never sleep through teardown.
//!
//! Capacity is fixed at construction. A push into a full queue never blocks
//! and never errors; it is resolved by the queue's [`OverflowPolicy`].

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::{OverflowPolicy, QueueConfig};
use crate::error::{EventError, EventResult};
use crate::event::Event;
use crate::id::SourceId;
use crate::source::EventSource;
use crate::{elog_debug, elog_trace};

/// Handle to a bounded event queue
///
/// Cheap to clone; clones refer to the same queue, so consumers on several
/// threads can share one. The queue itself is destroyed when the last
/// handle drops (sources only hold weak back-references).
#[derive(Clone)]
pub struct EventQueue {
    pub(crate) inner: Arc<QueueInner>,
}

pub(crate) struct QueueInner {
    state: Mutex<QueueState>,
    cond: Condvar,
    capacity: usize,
    overflow: OverflowPolicy,
}

struct QueueState {
    /// Pending events, front is oldest. Insertion order is delivery order.
    events: VecDeque<Arc<Event>>,

    /// Sources currently registered with this queue
    sources: Vec<SourceId>,

    /// While paused, pushes are silently ignored; pending events stay
    paused: bool,

    /// Once closed, pushes are rejected and waiters are woken with an error
    closed: bool,
}

impl EventQueue {
    /// Create an empty queue with the default configuration
    pub fn new() -> EventQueue {
        Self::with_config(QueueConfig::default())
    }

    /// Create an empty queue with the given configuration
    pub fn with_config(config: QueueConfig) -> EventQueue {
        elog_debug!(
            "evq: new queue, capacity={} overflow={:?}",
            config.capacity,
            config.overflow
        );
        EventQueue {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState {
                    events: VecDeque::with_capacity(config.capacity.min(64)),
                    sources: Vec::new(),
                    paused: false,
                    closed: false,
                }),
                cond: Condvar::new(),
                capacity: config.capacity,
                overflow: config.overflow,
            }),
        }
    }

    /// Maximum number of pending events
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// The policy applied when a push finds the queue full
    #[inline]
    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.inner.overflow
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.inner.locked().events.len()
    }

    /// True iff no events are pending
    pub fn is_empty(&self) -> bool {
        self.inner.locked().events.is_empty()
    }

    /// Check whether the given source is registered with this queue
    pub fn is_registered(&self, source: &EventSource) -> bool {
        self.inner.locked().sources.contains(&source.id())
    }

    /// Remove and return the oldest pending event
    ///
    /// Non-blocking; returns [`EventError::Empty`] if nothing is pending.
    pub fn get_next(&self) -> EventResult<Event> {
        let mut st = self.inner.locked();
        st.events.pop_front().map(|ev| *ev).ok_or(EventError::Empty)
    }

    /// Copy the oldest pending event without removing it
    pub fn peek_next(&self) -> EventResult<Event> {
        let st = self.inner.locked();
        st.events.front().map(|ev| **ev).ok_or(EventError::Empty)
    }

    /// Remove the oldest pending event, discarding its contents
    ///
    /// Returns true if an event was dropped.
    pub fn drop_next(&self) -> bool {
        let mut st = self.inner.locked();
        st.events.pop_front().is_some()
    }

    /// Release every pending event, resetting the queue to empty
    pub fn flush(&self) {
        let mut st = self.inner.locked();
        st.events.clear();
    }

    /// Blocking retrieval
    ///
    /// With `timeout == None`, parks the calling thread until an event
    /// arrives or the queue is closed. With `Some(d)`, the relative timeout
    /// is converted to an absolute deadline on entry, so repeated spurious
    /// wakeups cannot stretch the total wait.
    ///
    /// A timed-out wait consumes nothing and returns
    /// [`EventError::Timeout`]; a close while waiting returns
    /// [`EventError::Closed`].
    pub fn wait(&self, timeout: Option<Duration>) -> EventResult<Event> {
        match timeout {
            None => self.inner.wait_forever(),
            // A timeout too large to represent is as good as forever.
            Some(d) => match Instant::now().checked_add(d) {
                Some(deadline) => self.inner.wait_deadline(deadline),
                None => self.inner.wait_forever(),
            },
        }
    }

    /// Blocking retrieval against an absolute deadline
    pub fn wait_until(&self, deadline: Instant) -> EventResult<Event> {
        self.inner.wait_deadline(deadline)
    }

    /// Pause or resume delivery
    ///
    /// A paused queue silently ignores pushes; events already pending stay
    /// retrievable.
    pub fn set_paused(&self, paused: bool) {
        let mut st = self.inner.locked();
        st.paused = paused;
    }

    /// True iff the queue is paused
    pub fn is_paused(&self) -> bool {
        self.inner.locked().paused
    }

    /// Close the queue
    ///
    /// Further pushes are rejected and every blocked waiter is woken to
    /// return [`EventError::Closed`]. Events already pending can still be
    /// drained with the non-blocking operations.
    pub fn close(&self) {
        {
            let mut st = self.inner.locked();
            if st.closed {
                return;
            }
            st.closed = true;
        }
        elog_debug!("evq: queue closed");
        self.inner.cond.notify_all();
    }

    /// True iff [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.inner.locked().closed
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueInner {
    /// Lock the queue state, recovering from poisoning.
    /// The state is a plain container; a panic while holding the lock
    /// cannot leave it logically inconsistent.
    fn locked(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a shared event reference, invoked by a source's push fan-out.
    ///
    /// Retains the event (one `Arc` clone per accepting queue) and wakes
    /// all waiters. Silently skips the event if the queue is closed, paused
    /// or resolves a full buffer by dropping the newcomer.
    pub(crate) fn push_shared(&self, event: &Arc<Event>) {
        let mut st = self.locked();
        if st.closed || st.paused {
            return;
        }
        debug_assert!(
            st.sources.contains(&event.source()),
            "push from a source not registered with this queue"
        );

        if st.events.len() >= self.capacity {
            match self.overflow {
                OverflowPolicy::DropNewest => {
                    elog_trace!(
                        "evq: queue full ({}), dropping incoming {:?}",
                        self.capacity,
                        event.kind()
                    );
                    return;
                }
                OverflowPolicy::DropOldest => {
                    elog_trace!(
                        "evq: queue full ({}), evicting oldest for {:?}",
                        self.capacity,
                        event.kind()
                    );
                    st.events.pop_front();
                }
            }
        }

        st.events.push_back(Arc::clone(event));
        drop(st);
        // Broadcast, not single-wake: several consumers may be parked and
        // only the recheck loop decides who wins the event.
        self.cond.notify_all();
    }

    /// Add a source to the registered set. Caller (the source) guarantees
    /// idempotence under its own registration lock.
    pub(crate) fn attach_source(&self, id: SourceId) {
        let mut st = self.locked();
        debug_assert!(!st.sources.contains(&id), "source attached twice");
        st.sources.push(id);
    }

    /// Remove a source and purge exactly its pending events.
    /// Other sources' events keep their relative order.
    pub(crate) fn detach_source(&self, id: SourceId) {
        let mut st = self.locked();
        if let Some(pos) = st.sources.iter().position(|s| *s == id) {
            st.sources.swap_remove(pos);
            st.events.retain(|ev| ev.source() != id);
        }
    }

    fn wait_forever(&self) -> EventResult<Event> {
        let mut st = self.locked();
        loop {
            // Pop before the closed check so a closed queue can be drained.
            if let Some(ev) = st.events.pop_front() {
                return Ok(*ev);
            }
            if st.closed {
                return Err(EventError::Closed);
            }
            st = self.cond.wait(st).unwrap_or_else(|e| e.into_inner());
        }
    }

    fn wait_deadline(&self, deadline: Instant) -> EventResult<Event> {
        let mut st = self.locked();
        loop {
            if let Some(ev) = st.events.pop_front() {
                return Ok(*ev);
            }
            if st.closed {
                return Err(EventError::Closed);
            }
            // Re-validate against the monotonic clock each time around;
            // the condvar's own timeout result is not trusted on its own.
            let now = Instant::now();
            if now >= deadline {
                return Err(EventError::Timeout);
            }
            let (guard, _timed_out) = self
                .cond
                .wait_timeout(st, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            st = guard;
        }
    }
}
