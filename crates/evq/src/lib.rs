//! # evq - Event Queues for Game and Multimedia Runtimes
//!
//! Bounded, thread-safe delivery of discrete input occurrences from
//! independently driven producers (keyboard, mouse, joystick, timer,
//! display drivers, application code) to consumer threads.
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Duration;
//! use evq::{EventKind, EventPayload, EventQueue, EventSource};
//!
//! let queue = EventQueue::new();
//! let source = EventSource::new();
//! source.register(&queue);
//!
//! // Producer side (any thread):
//! source.push(EventKind::KEY_DOWN, EventPayload::Keyboard {
//!     keycode: 65,
//!     unichar: 'a' as i32,
//!     modifiers: 0,
//!     repeat: false,
//! });
//!
//! // Consumer side:
//! let event = queue.wait(Some(Duration::from_secs(1))).unwrap();
//! assert_eq!(event.kind(), EventKind::KEY_DOWN);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  ┌─────────────┐  ┌─────────────┐
//! │  keyboard   │  │   Ticker    │  │  user code  │   ... drivers
//! │  driver     │  │ (evq-timer) │  │             │
//! └──────┬──────┘  └──────┬──────┘  └──────┬──────┘
//!        │ push           │ push           │ push
//!        ▼                ▼                ▼
//! ┌─────────────────────────────────────────────────┐
//! │           EventSource fan-out (evq-core)        │
//! │    one Arc'd event, one append per queue        │
//! └──────┬──────────────────────────────────┬───────┘
//!        ▼                                  ▼
//! ┌─────────────┐                    ┌─────────────┐
//! │ EventQueue  │                    │ EventQueue  │   bounded FIFOs
//! └──────┬──────┘                    └──────┬──────┘
//!        │ get_next / wait                  │
//!        ▼                                  ▼
//!   game loop thread                  logger thread    ... consumers
//! ```
//!
//! Producers never block: a full queue resolves the push via its
//! [`OverflowPolicy`]. Consumers either poll ([`EventQueue::get_next`],
//! [`EventQueue::peek_next`]) or park ([`EventQueue::wait`],
//! [`EventQueue::wait_until`]).

// Re-export core types
pub use evq_core::{
    clock,
    constants,
    elog,
    Event,
    EventError,
    EventKind,
    EventPayload,
    EventQueue,
    EventResult,
    EventSource,
    OverflowPolicy,
    QueueConfig,
    SourceId,
};

// Logging macros
pub use evq_core::{elog_debug, elog_error, elog_info, elog_trace, elog_warn};

// Timer source
pub use evq_timer::Ticker;
