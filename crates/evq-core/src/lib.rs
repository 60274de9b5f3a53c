//! # evq-core
//!
//! Core types for the evq event system: the event record, event sources
//! and bounded event queues.
//!
//! This crate is platform-agnostic and contains no device-specific code.
//! Input drivers, timers and display backends live elsewhere and interact
//! with this crate only by owning an [`EventSource`] and calling
//! [`EventSource::push`].
//!
//! ## Modules
//!
//! - `id` - Event source identifier type
//! - `event` - Event record, kind codes and payload variants
//! - `source` - Event producer with queue registration and recycling pool
//! - `queue` - Bounded, thread-safe FIFO of events
//! - `config` - Queue configuration (capacity, overflow policy)
//! - `clock` - Monotonic timestamp source
//! - `error` - Error types
//! - `spinlock` - Internal spinlock primitive
//! - `elog` - Leveled debug logging macros
//!
//! ## Data flow
//!
//! ```text
//! driver thread(s)                       consumer thread(s)
//!       │                                       ▲
//!       ▼                                       │
//! ┌─────────────┐   push   ┌────────────┐  get_next / wait
//! │ EventSource ├─────────▶│ EventQueue ├───────┘
//! └─────────────┘          └────────────┘
//!        │                       ▲
//!        └── register/unregister ┘   (many-to-many)
//! ```

pub mod clock;
pub mod config;
pub mod elog;
pub mod error;
pub mod event;
pub mod id;
pub mod queue;
pub mod source;
pub mod spinlock;

// Re-exports for convenience
pub use config::{OverflowPolicy, QueueConfig};
pub use error::{EventError, EventResult};
pub use event::{Event, EventKind, EventPayload};
pub use id::SourceId;
pub use queue::EventQueue;
pub use source::EventSource;
pub use spinlock::SpinLock;

/// Constants shared across the workspace
pub mod constants {
    /// Default queue capacity (events beyond this are resolved by the
    /// overflow policy, never by blocking the producer)
    pub const DEFAULT_QUEUE_CAPACITY: usize = 512;

    /// Per-source recycling pool size
    pub const SOURCE_POOL_CAPACITY: usize = 32;

    /// Smallest kind code reserved for user-defined events
    pub const USER_KIND_BASE: u32 = 512;
}
