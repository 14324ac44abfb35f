//! Nonce generation for signed requests.

use std::fmt::Debug;
use std::sync::Mutex;

use chrono::Utc;

/// NonceSource produces the nonce attached to every signed request.
///
/// Implementations must be safe to call concurrently and must never hand out
/// the same value twice. Values observed by a single caller must be
/// non-decreasing; callers must not assume any particular numeric scale.
pub trait NonceSource: Debug + Send + Sync + 'static {
    /// Return the next nonce.
    fn next(&self) -> i64;
}

/// ClockNonceSource derives nonces from the nanosecond wall clock.
///
/// The clock is read under an exclusive lock and the result is bumped past the
/// last returned value, so sequential calls are strictly increasing even when
/// two readings collide or the clock steps backwards.
#[derive(Debug, Default)]
pub struct ClockNonceSource {
    last: Mutex<i64>,
}

impl ClockNonceSource {
    /// Create a new clock based nonce source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NonceSource for ClockNonceSource {
    fn next(&self) -> i64 {
        let mut last = self.last.lock().expect("lock poisoned");
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);

        let nonce = if now > *last { now } else { last.saturating_add(1) };
        *last = nonce;
        nonce
    }
}

/// CounterNonceSource hands out consecutive integers from a starting value.
///
/// Useful when nonces are persisted between processes, or in tests that need
/// a deterministic sequence.
#[derive(Debug)]
pub struct CounterNonceSource {
    next: Mutex<i64>,
}

impl CounterNonceSource {
    /// Create a counter whose first nonce is `start`.
    pub fn new(start: i64) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }
}

impl NonceSource for CounterNonceSource {
    fn next(&self) -> i64 {
        let mut next = self.next.lock().expect("lock poisoned");
        let nonce = *next;
        *next = next.saturating_add(1);
        nonce
    }
}
