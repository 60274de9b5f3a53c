//! # evq-timer
//!
//! A periodic tick source for the evq event system.
//!
//! [`Ticker`] owns an [`evq_core::EventSource`] and a background thread
//! that pushes one `TIMER_TICK` event per interval into every queue the
//! ticker is registered with. It is the reference producer for the core:
//! a complete driver whose only contact with queue internals is
//! `EventSource::push`.

pub mod ticker;

pub use ticker::Ticker;
