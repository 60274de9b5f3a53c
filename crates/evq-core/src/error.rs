//! Error types for event queue operations

use core::fmt;

/// Result type for queue operations
pub type EventResult<T> = Result<T, EventError>;

/// Errors that can occur when retrieving events
///
/// All variants are recoverable and expected during normal operation.
/// Producers never see errors: a push into a full queue is resolved by the
/// queue's overflow policy and is not reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventError {
    /// Non-blocking retrieval found no pending event
    Empty,

    /// A timed wait elapsed with nothing delivered
    Timeout,

    /// The queue was closed while (or before) waiting
    Closed,
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::Empty => write!(f, "event queue empty"),
            EventError::Timeout => write!(f, "wait timed out"),
            EventError::Closed => write!(f, "event queue closed"),
        }
    }
}

impl std::error::Error for EventError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(EventError::Empty.to_string(), "event queue empty");
        assert_eq!(EventError::Timeout.to_string(), "wait timed out");
        assert_eq!(EventError::Closed.to_string(), "event queue closed");
    }

    #[test]
    fn test_is_std_error() {
        fn takes_error<E: std::error::Error>(_e: E) {}
        takes_error(EventError::Timeout);
    }
}
