//! Wall-clock abstraction.
//!
//! Remaining time is always derived from an absolute end timestamp, never
//! from counting ticks, so the countdown stays correct across scheduling
//! delays (a backgrounded process, a slow poll loop). Injecting the clock
//! lets tests drive simulated time exactly instead of sleeping.

use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" for the countdown engine.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// A hand-driven clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    ms: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Rc<Self> {
        Rc::new(Self {
            ms: Cell::new(start_ms),
        })
    }

    pub fn advance_ms(&self, delta: u64) {
        self.ms.set(self.ms.get() + delta);
    }

    pub fn advance_secs(&self, delta: u64) {
        self.advance_ms(delta * 1000);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.ms.get()
    }
}
