//! Event producer with queue registration and a recycling pool
//!
//! An [`EventSource`] is owned by whatever drives it: a keyboard or mouse
//! driver, a timer thread, or application code emitting user events. The
//! owner's only obligations are to call [`EventSource::push`] when
//! something happens and to wire the source into queues with
//! [`EventSource::register`].
//!
//! Low-level callbacks (interrupt-style input hooks) must go through
//! `push` as well; it is the single entry point into the synchronized
//! region and is safe to call from any thread.
//!
//! The registration list is guarded by a [`SpinLock`] that is held across
//! the entire fan-out of a push. That gives register/unregister a clean
//! happens-before relationship with pushes from the same source: an
//! unregister either sees the pushed event in the queue and purges it, or
//! the push runs after and is simply not delivered. Lock order is always
//! source lock first, then queue mutex; nothing takes them the other way
//! around.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Weak};

use crossbeam_queue::ArrayQueue;

use crate::constants::SOURCE_POOL_CAPACITY;
use crate::elog_debug;
use crate::event::{Event, EventKind, EventPayload};
use crate::id::SourceId;
use crate::queue::{EventQueue, QueueInner};
use crate::spinlock::SpinLock;

/// A producer of events
///
/// Single-owner by design (not `Clone`): the driving subsystem owns it,
/// queues only keep weak back-references. Dropping the source implicitly
/// unregisters it everywhere and purges its pending events.
pub struct EventSource {
    inner: Arc<SourceInner>,
}

struct SourceInner {
    id: SourceId,

    /// Queues currently registered to receive this source's events
    queues: SpinLock<Vec<Weak<QueueInner>>>,

    /// Recently produced events kept around for reuse. An entry whose
    /// `Arc` is uniquely held (every queue has released it) can be
    /// rewritten in place instead of hitting the allocator.
    pool: ArrayQueue<Arc<Event>>,

    /// Opaque application datum attached to the source
    data: AtomicI64,
}

impl EventSource {
    /// Create a new source with a fresh id and no registrations
    pub fn new() -> EventSource {
        EventSource {
            inner: Arc::new(SourceInner {
                id: SourceId::next(),
                queues: SpinLock::new(Vec::new()),
                pool: ArrayQueue::new(SOURCE_POOL_CAPACITY),
                data: AtomicI64::new(0),
            }),
        }
    }

    /// This source's unique id, as carried by every event it produces
    #[inline]
    pub fn id(&self) -> SourceId {
        self.inner.id
    }

    /// Attach an opaque application value to the source
    pub fn set_data(&self, data: i64) {
        self.inner.data.store(data, Ordering::Relaxed);
    }

    /// Read back the opaque application value
    pub fn data(&self) -> i64 {
        self.inner.data.load(Ordering::Relaxed)
    }

    /// Register this source with a queue
    ///
    /// Idempotent: registering with a queue the source is already wired to
    /// has no effect. Only future pushes are affected.
    pub fn register(&self, queue: &EventQueue) {
        let mut queues = self.inner.queues.lock();
        if queues
            .iter()
            .any(|w| w.as_ptr() == Arc::as_ptr(&queue.inner))
        {
            return;
        }
        queue.inner.attach_source(self.inner.id);
        queues.push(Arc::downgrade(&queue.inner));
        elog_debug!("evq: source {} registered with queue", self.inner.id);
    }

    /// Unregister this source from a queue
    ///
    /// Removes the mutual link and purges every still-pending event this
    /// source produced from that queue. Events already consumed, and other
    /// sources' events, are untouched. No effect if not registered.
    pub fn unregister(&self, queue: &EventQueue) {
        let mut queues = self.inner.queues.lock();
        let Some(pos) = queues
            .iter()
            .position(|w| w.as_ptr() == Arc::as_ptr(&queue.inner))
        else {
            return;
        };
        queues.swap_remove(pos);
        queue.inner.detach_source(self.inner.id);
        elog_debug!("evq: source {} unregistered from queue", self.inner.id);
    }

    /// Count of queues this source is currently registered with
    pub fn registration_count(&self) -> usize {
        self.inner.queues.lock().len()
    }

    /// Produce one event and deliver it to every registered queue
    ///
    /// The event is stamped with the monotonic clock once, here, so every
    /// queue sees the same timestamp. Queues that are full, paused or
    /// closed are silently skipped; producers never block and never see an
    /// error. Queues that have been destroyed are pruned as a side effect.
    pub fn push(&self, kind: EventKind, payload: EventPayload) {
        let event = self.alloc_event(kind, payload);

        let mut queues = self.inner.queues.lock();
        queues.retain(|weak| match weak.upgrade() {
            Some(queue) => {
                queue.push_shared(&event);
                true
            }
            None => false,
        });
        drop(queues);

        // Park one reference in the pool; once all queues release theirs,
        // the next push can rewrite this allocation in place.
        let _ = self.inner.pool.push(event);
    }

    /// Grab a recyclable event if one exists, else allocate
    fn alloc_event(&self, kind: EventKind, payload: EventPayload) -> Arc<Event> {
        while let Some(mut recycled) = self.inner.pool.pop() {
            if let Some(ev) = Arc::get_mut(&mut recycled) {
                ev.reset(kind, self.inner.id, payload);
                return recycled;
            }
            // Still held by some queue; drop our pool reference and let
            // the last queue free it.
        }
        Arc::new(Event::new(kind, self.inner.id, payload))
    }

    #[cfg(test)]
    fn pool_len(&self) -> usize {
        self.inner.pool.len()
    }
}

impl Default for EventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventSource {
    /// Implicit unregistration: purge this source's pending events from
    /// every queue still holding them.
    fn drop(&mut self) {
        let mut queues = self.inner.queues.lock();
        for weak in queues.drain(..) {
            if let Some(queue) = weak.upgrade() {
                queue.detach_source(self.inner.id);
            }
        }
    }
}

impl std::fmt::Debug for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("id", &self.inner.id)
            .field("registrations", &self.registration_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueueConfig;
    use crate::error::EventError;

    fn tick(n: i64) -> EventPayload {
        EventPayload::Timer { count: n }
    }

    fn tick_count(ev: &Event) -> i64 {
        match ev.payload() {
            EventPayload::Timer { count } => count,
            other => panic!("expected timer payload, got {:?}", other),
        }
    }

    #[test]
    fn test_register_is_idempotent() {
        let q = EventQueue::new();
        let src = EventSource::new();

        src.register(&q);
        src.register(&q);
        assert_eq!(src.registration_count(), 1);

        src.push(EventKind::TIMER_TICK, tick(1));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_unregister_unknown_queue_is_noop() {
        let q1 = EventQueue::new();
        let q2 = EventQueue::new();
        let src = EventSource::new();
        src.register(&q1);
        src.unregister(&q2);
        assert_eq!(src.registration_count(), 1);
        assert!(q1.is_registered(&src));
    }

    #[test]
    fn test_push_without_registration_goes_nowhere() {
        let src = EventSource::new();
        src.push(EventKind::TIMER_TICK, tick(1));
        // Nothing to assert beyond "does not panic"; the event lands in
        // the recycle pool only.
        assert_eq!(src.pool_len(), 1);
    }

    #[test]
    fn test_fanout_to_multiple_queues() {
        let q1 = EventQueue::new();
        let q2 = EventQueue::new();
        let src = EventSource::new();
        src.register(&q1);
        src.register(&q2);

        src.push(EventKind::TIMER_TICK, tick(42));

        let a = q1.get_next().unwrap();
        let b = q2.get_next().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.timestamp_ns(), b.timestamp_ns());
    }

    // Refcount law: one push into k queues keeps a single record alive
    // until all k queues (and the pool) release it.
    #[test]
    fn test_shared_event_refcounts() {
        let q1 = EventQueue::new();
        let q2 = EventQueue::new();
        let src = EventSource::new();
        src.register(&q1);
        src.register(&q2);

        src.push(EventKind::TIMER_TICK, tick(1));

        // One reference in each queue plus the pool's.
        let pooled = src.inner.pool.pop().expect("pool should hold the event");
        assert_eq!(Arc::strong_count(&pooled), 3);

        let _ = q1.get_next().unwrap();
        assert_eq!(Arc::strong_count(&pooled), 2);
        let _ = q2.get_next().unwrap();
        assert_eq!(Arc::strong_count(&pooled), 1);
    }

    #[test]
    fn test_pool_recycles_released_events() {
        let q = EventQueue::new();
        let src = EventSource::new();
        src.register(&q);

        src.push(EventKind::TIMER_TICK, tick(1));
        let _ = q.get_next().unwrap();
        assert_eq!(src.pool_len(), 1);

        // The pooled record is now uniquely held, so this push rewrites it
        // rather than growing the pool.
        src.push(EventKind::TIMER_TICK, tick(2));
        assert_eq!(src.pool_len(), 1);
        assert_eq!(tick_count(&q.get_next().unwrap()), 2);
    }

    // Unregistering a source removes exactly its own pending events.
    #[test]
    fn test_unregister_purges_only_own_events() {
        let q = EventQueue::new();
        let a = EventSource::new();
        let b = EventSource::new();
        a.register(&q);
        b.register(&q);

        a.push(EventKind::TIMER_TICK, tick(10));
        b.push(EventKind::TIMER_TICK, tick(20));
        a.push(EventKind::TIMER_TICK, tick(11));
        b.push(EventKind::TIMER_TICK, tick(21));
        assert_eq!(q.len(), 4);

        a.unregister(&q);
        assert!(!q.is_registered(&a));
        assert!(q.is_registered(&b));

        assert_eq!(tick_count(&q.get_next().unwrap()), 20);
        assert_eq!(tick_count(&q.get_next().unwrap()), 21);
        assert_eq!(q.get_next(), Err(EventError::Empty));
    }

    // Unregistration only affects events still pending when it runs;
    // deliveries consumed beforehand stand.
    #[test]
    fn test_unregister_affects_only_pending() {
        let q1 = EventQueue::new();
        let q2 = EventQueue::new();
        let src = EventSource::new();
        src.register(&q1);
        src.register(&q2);

        src.push(EventKind::TIMER_TICK, tick(1));

        let from_q2 = q2.get_next().unwrap();
        assert_eq!(tick_count(&from_q2), 1);

        src.unregister(&q2);
        // q1 was never unregistered; its copy is still there.
        assert_eq!(tick_count(&q1.get_next().unwrap()), 1);
        // q2 consumed before the unregister; nothing further arrives.
        src.push(EventKind::TIMER_TICK, tick(2));
        assert_eq!(q2.get_next(), Err(EventError::Empty));
        assert_eq!(tick_count(&q1.get_next().unwrap()), 2);
    }

    #[test]
    fn test_drop_source_purges_pending() {
        let q = EventQueue::new();
        let keep = EventSource::new();
        keep.register(&q);

        {
            let src = EventSource::new();
            src.register(&q);
            src.push(EventKind::TIMER_TICK, tick(1));
            keep.push(EventKind::TIMER_TICK, tick(2));
            assert_eq!(q.len(), 2);
        }

        assert_eq!(q.len(), 1);
        assert_eq!(tick_count(&q.get_next().unwrap()), 2);
    }

    #[test]
    fn test_dead_queue_is_pruned() {
        let src = EventSource::new();
        {
            let q = EventQueue::new();
            src.register(&q);
            assert_eq!(src.registration_count(), 1);
        }
        // The queue is gone; the next push drops the stale link.
        src.push(EventKind::TIMER_TICK, tick(1));
        assert_eq!(src.registration_count(), 0);
    }

    #[test]
    fn test_source_data() {
        let src = EventSource::new();
        assert_eq!(src.data(), 0);
        src.set_data(-7);
        assert_eq!(src.data(), -7);
    }

    #[test]
    fn test_concurrent_producers_all_delivered() {
        use std::thread;

        let q = EventQueue::with_config(QueueConfig::new().capacity(4096));
        let mut handles = vec![];
        for _ in 0..4 {
            let q = q.clone();
            handles.push(thread::spawn(move || {
                let src = EventSource::new();
                src.register(&q);
                for i in 0..100 {
                    src.push(EventKind::TIMER_TICK, tick(i));
                }
                src.unregister(&q);
                src.id()
            }));
        }
        // Sources unregister before the threads end, purging anything not
        // yet consumed; consume afterwards to count survivors is racy, so
        // instead just join and verify the queue is coherent.
        let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(q.len(), 0);
    }
}
