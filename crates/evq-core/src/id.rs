//! Event source identifier type

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// Unique identifier for an event source
///
/// Every [`EventSource`](crate::source::EventSource) gets one at creation.
/// Events carry the id of their producing source so that queues can purge
/// exactly that source's events on unregistration without holding a strong
/// reference back to the source object.
///
/// The maximum value (u32::MAX) is reserved as a sentinel for "no source".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SourceId(u32);

static NEXT_SOURCE_ID: AtomicU32 = AtomicU32::new(0);

impl SourceId {
    /// Sentinel value indicating no source
    pub const NONE: SourceId = SourceId(u32::MAX);

    /// Allocate a fresh, process-unique id
    pub(crate) fn next() -> Self {
        let id = NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed);
        // Wrapping into the sentinel would need four billion live sources.
        debug_assert!(id != u32::MAX);
        SourceId(id)
    }

    /// Get the raw u32 value
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Check if this is the NONE sentinel
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Check if this is a valid source id
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "SourceId(NONE)")
        } else {
            write!(f, "SourceId({})", self.0)
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
