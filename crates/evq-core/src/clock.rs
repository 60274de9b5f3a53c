//! Monotonic timestamp source
//!
//! Event timestamps are nanoseconds on a monotonic clock with an
//! unspecified epoch. Values are only meaningful relative to each other
//! within one process; they never go backwards and are unaffected by
//! wall-clock adjustments.

use std::sync::OnceLock;
use std::time::Instant;

const NANOS_PER_SEC: u64 = 1_000_000_000;

static START_INSTANT: OnceLock<Instant> = OnceLock::new();

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// Current monotonic time in nanoseconds
        #[inline]
        pub fn now_ns() -> u64 {
            let mut ts = libc::timespec {
                tv_sec: 0,
                tv_nsec: 0,
            };
            let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
            if rc == 0 {
                (ts.tv_sec as u64) * NANOS_PER_SEC + (ts.tv_nsec as u64)
            } else {
                instant_now_ns()
            }
        }
    } else {
        /// Current monotonic time in nanoseconds
        #[inline]
        pub fn now_ns() -> u64 {
            instant_now_ns()
        }
    }
}

/// Portable fallback: nanoseconds since the first call in this process
fn instant_now_ns() -> u64 {
    let start = START_INSTANT.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}
