//! Wall-clock abstraction
//!
//! Round timing is evaluated lazily against a clock read at call time - the
//! pipeline schedules nothing. Liveness (closing rounds, claiming grants)
//! belongs to external keepers; the clock seam exists so tests can move time
//! without sleeping.

use parking_lot::Mutex;

/// Source of unix timestamps (seconds)
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Production clock backed by the system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Settable clock for tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<i64>,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: i64) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, secs: i64) {
        *self.now.lock() += secs;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        *self.now.lock()
    }
}
