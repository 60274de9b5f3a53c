//! Queue configuration

use std::str::FromStr;

use crate::constants::DEFAULT_QUEUE_CAPACITY;

/// What to do when a push finds the queue at capacity
///
/// Either way the producer is never blocked and never sees an error; the
/// two policies differ only in which event is sacrificed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Silently discard the incoming event (the historical behavior)
    #[default]
    DropNewest,

    /// Discard the oldest pending event to make room
    DropOldest,
}

/// Configuration for an event queue
///
/// ```
/// use evq_core::{EventQueue, QueueConfig, OverflowPolicy};
///
/// let queue = EventQueue::with_config(
///     QueueConfig::new()
///         .capacity(64)
///         .overflow(OverflowPolicy::DropOldest),
/// );
/// assert_eq!(queue.capacity(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Maximum number of pending events
    pub capacity: usize,

    /// Behavior when a push finds the queue full
    pub overflow: OverflowPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: env_get("EVQ_QUEUE_CAP", DEFAULT_QUEUE_CAPACITY).max(1),
            overflow: OverflowPolicy::default(),
        }
    }
}

impl QueueConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the queue capacity (clamped to at least 1)
    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n.max(1);
        self
    }

    /// Set the overflow policy
    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }
}

/// Get environment variable parsed as type T, or return default
#[inline]
pub(crate) fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get environment variable as boolean
///
/// Accepts "1", "true", "yes", "on" (case-insensitive) as true.
#[inline]
pub(crate) fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
