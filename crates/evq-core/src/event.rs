//! Event record, kind codes and payload variants
//!
//! An [`Event`] is one discrete thing that happened: a key press, an axis
//! move, a timer tick. It is built by its producing source, stamped with a
//! monotonic timestamp, and immutable from the moment it enters a queue.
//! Queues share one event via `Arc`, so an event pushed once may sit in
//! several queues at the same time and is freed (or recycled) only when the
//! last queue lets go of it.

use core::fmt;

use crate::clock;
use crate::constants::USER_KIND_BASE;
use crate::id::SourceId;

/// Numeric tag describing what happened
///
/// Codes are grouped by device family. Codes below
/// [`USER_KIND_BASE`](crate::constants::USER_KIND_BASE) are reserved for
/// built-in families; everything at or above it is free for applications.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EventKind(u32);

impl EventKind {
    pub const JOYSTICK_AXIS: EventKind = EventKind(1);
    pub const JOYSTICK_BUTTON_DOWN: EventKind = EventKind(2);
    pub const JOYSTICK_BUTTON_UP: EventKind = EventKind(3);

    pub const KEY_DOWN: EventKind = EventKind(10);
    pub const KEY_CHAR: EventKind = EventKind(11);
    pub const KEY_UP: EventKind = EventKind(12);

    pub const MOUSE_AXES: EventKind = EventKind(20);
    pub const MOUSE_BUTTON_DOWN: EventKind = EventKind(21);
    pub const MOUSE_BUTTON_UP: EventKind = EventKind(22);
    pub const MOUSE_ENTER: EventKind = EventKind(23);
    pub const MOUSE_LEAVE: EventKind = EventKind(24);

    pub const TIMER_TICK: EventKind = EventKind(30);

    pub const DISPLAY_EXPOSE: EventKind = EventKind(40);
    pub const DISPLAY_RESIZE: EventKind = EventKind(41);
    pub const DISPLAY_CLOSE: EventKind = EventKind(42);
    pub const DISPLAY_SWITCH_IN: EventKind = EventKind(45);
    pub const DISPLAY_SWITCH_OUT: EventKind = EventKind(46);

    /// Create a user-defined kind
    ///
    /// Panics (at compile time for const usage) if the code collides with
    /// the built-in range.
    pub const fn user(code: u32) -> EventKind {
        assert!(code >= USER_KIND_BASE, "user event kinds start at 512");
        EventKind(code)
    }

    /// Create a kind from a raw code, built-in or user
    #[inline]
    pub const fn from_raw(code: u32) -> EventKind {
        EventKind(code)
    }

    /// Get the raw numeric code
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Check if this is a user-defined kind
    #[inline]
    pub const fn is_user(self) -> bool {
        self.0 >= USER_KIND_BASE
    }
}

impl fmt::Debug for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            EventKind::JOYSTICK_AXIS => "JOYSTICK_AXIS",
            EventKind::JOYSTICK_BUTTON_DOWN => "JOYSTICK_BUTTON_DOWN",
            EventKind::JOYSTICK_BUTTON_UP => "JOYSTICK_BUTTON_UP",
            EventKind::KEY_DOWN => "KEY_DOWN",
            EventKind::KEY_CHAR => "KEY_CHAR",
            EventKind::KEY_UP => "KEY_UP",
            EventKind::MOUSE_AXES => "MOUSE_AXES",
            EventKind::MOUSE_BUTTON_DOWN => "MOUSE_BUTTON_DOWN",
            EventKind::MOUSE_BUTTON_UP => "MOUSE_BUTTON_UP",
            EventKind::MOUSE_ENTER => "MOUSE_ENTER",
            EventKind::MOUSE_LEAVE => "MOUSE_LEAVE",
            EventKind::TIMER_TICK => "TIMER_TICK",
            EventKind::DISPLAY_EXPOSE => "DISPLAY_EXPOSE",
            EventKind::DISPLAY_RESIZE => "DISPLAY_RESIZE",
            EventKind::DISPLAY_CLOSE => "DISPLAY_CLOSE",
            EventKind::DISPLAY_SWITCH_IN => "DISPLAY_SWITCH_IN",
            EventKind::DISPLAY_SWITCH_OUT => "DISPLAY_SWITCH_OUT",
            _ => return write!(f, "EventKind({})", self.0),
        };
        write!(f, "EventKind({})", name)
    }
}

/// Kind-specific event data, one variant per device family
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EventPayload {
    /// No payload (enter/leave, expose, close, switch events)
    #[default]
    None,

    /// Joystick stick/axis/button change
    Joystick {
        stick: u32,
        axis: u32,
        pos: f32,
        button: u32,
    },

    /// Keyboard key or character
    Keyboard {
        keycode: u32,
        /// Unicode scalar for KEY_CHAR events, negative if none
        unichar: i32,
        /// Modifier bitfield
        modifiers: u32,
        /// Auto-repeated or not
        repeat: bool,
    },

    /// Mouse position/wheel/button change
    Mouse {
        x: i32,
        y: i32,
        z: i32,
        dx: i32,
        dy: i32,
        dz: i32,
        button: u32,
        pressure: f32,
    },

    /// Timer tick
    Timer {
        /// Ticks fired since the timer started
        count: i64,
    },

    /// Display geometry change
    Display {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Application-defined data
    User { data: [i64; 4] },
}

/// One discrete occurrence, immutable once pushed
///
/// Small and `Copy`: retrieval operations hand the consumer a copy while
/// the queue-internal `Arc` reference is released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    kind: EventKind,
    timestamp_ns: u64,
    source: SourceId,
    payload: EventPayload,
}

impl Event {
    /// Build a new event stamped with the current monotonic time.
    /// Only sources construct events; consumers receive copies.
    pub(crate) fn new(kind: EventKind, source: SourceId, payload: EventPayload) -> Event {
        Event {
            kind,
            timestamp_ns: clock::now_ns(),
            source,
            payload,
        }
    }

    /// Overwrite a recycled event in place (see the source's pool)
    pub(crate) fn reset(&mut self, kind: EventKind, source: SourceId, payload: EventPayload) {
        self.kind = kind;
        self.timestamp_ns = clock::now_ns();
        self.source = source;
        self.payload = payload;
    }

    /// What happened
    #[inline]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// When it happened, in monotonic nanoseconds
    #[inline]
    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    /// Which source produced it
    #[inline]
    pub fn source(&self) -> SourceId {
        self.source
    }

    /// Kind-specific data
    #[inline]
    pub fn payload(&self) -> EventPayload {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ranges() {
        assert!(!EventKind::KEY_DOWN.is_user());
        assert!(!EventKind::TIMER_TICK.is_user());
        assert!(EventKind::user(512).is_user());
        assert!(EventKind::user(4096).is_user());
    }

    #[test]
    fn test_kind_raw_roundtrip() {
        let k = EventKind::from_raw(EventKind::MOUSE_AXES.as_u32());
        assert_eq!(k, EventKind::MOUSE_AXES);
    }

    #[test]
    #[should_panic]
    fn test_user_kind_in_builtin_range_panics() {
        let _ = EventKind::user(30);
    }

    #[test]
    fn test_event_accessors() {
        let id = SourceId::next();
        let ev = Event::new(EventKind::KEY_DOWN, id, EventPayload::Keyboard {
            keycode: 65,
            unichar: 'a' as i32,
            modifiers: 0,
            repeat: false,
        });
        assert_eq!(ev.kind(), EventKind::KEY_DOWN);
        assert_eq!(ev.source(), id);
        match ev.payload() {
            EventPayload::Keyboard { keycode, .. } => assert_eq!(keycode, 65),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_reset_restamps() {
        let id = SourceId::next();
        let mut ev = Event::new(EventKind::TIMER_TICK, id, EventPayload::Timer { count: 1 });
        let first = ev.timestamp_ns();
        std::thread::sleep(std::time::Duration::from_millis(2));
        ev.reset(EventKind::TIMER_TICK, id, EventPayload::Timer { count: 2 });
        assert!(ev.timestamp_ns() > first);
        assert_eq!(ev.payload(), EventPayload::Timer { count: 2 });
    }
}
