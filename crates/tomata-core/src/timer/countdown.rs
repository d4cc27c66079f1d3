//! Countdown engine.
//!
//! A single pausable countdown, wall-clock driven: while running, remaining
//! time is derived from an absolute end timestamp (`end - now`), never from
//! counting ticks, so it stays accurate no matter how irregularly the caller
//! polls. There is no internal thread -- the caller invokes `tick()`
//! periodically and completion is reported both through the `on_complete`
//! hook and the return value.
//!
//! The engine knows nothing about modes; the session layer seeds one fresh
//! countdown per active phase.
//!
//! ## Lifecycle
//!
//! ```text
//! idle --start--> running --stop--> idle (remaining frozen)
//!                 running --tick at 0--> idle (on_complete, exactly once)
//! any  --reset--> idle (remaining = full target, no hooks)
//! ```
//!
//! Changing the target while running is deliberately ignored until the next
//! `reset()`/reseed -- a live countdown never jumps or rescales.

use std::fmt;
use std::rc::Rc;

use crate::clock::{Clock, SystemClock};

/// A lifecycle hook. Hooks fire on the caller's turn, never concurrently.
pub type Hook = Box<dyn FnMut()>;

/// Optional lifecycle callbacks supplied at construction.
///
/// `on_start`/`on_stop` fire on user-visible start/pause; `on_complete`
/// fires at most once per run, when the countdown reaches zero naturally.
/// `reset()` is a silent stop and fires nothing.
#[derive(Default)]
pub struct Hooks {
    pub on_start: Option<Hook>,
    pub on_stop: Option<Hook>,
    pub on_complete: Option<Hook>,
}

impl Hooks {
    pub fn on_start(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_stop(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_stop = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// A single pausable, resumable countdown.
pub struct Countdown {
    /// Full target duration in seconds.
    target_secs: u64,
    /// Frozen remaining time while idle, in milliseconds.
    remaining_ms: u64,
    /// Absolute end timestamp (epoch ms). `Some` iff running; clearing it
    /// is what cancels the pending expiry -- no stale tick can fire after
    /// `stop()`/`reset()`.
    end_epoch_ms: Option<u64>,
    clock: Rc<dyn Clock>,
    hooks: Hooks,
}

impl fmt::Debug for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Countdown")
            .field("target_secs", &self.target_secs)
            .field("remaining_ms", &self.remaining_ms)
            .field("end_epoch_ms", &self.end_epoch_ms)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl Countdown {
    /// Create an idle countdown of `minutes` on the system clock.
    pub fn new(minutes: u64) -> Self {
        Self::with_hooks(minutes, Rc::new(SystemClock), Hooks::default())
    }

    pub fn with_hooks(minutes: u64, clock: Rc<dyn Clock>, hooks: Hooks) -> Self {
        let target_secs = minutes.saturating_mul(60);
        Self {
            target_secs,
            remaining_ms: target_secs.saturating_mul(1000),
            end_epoch_ms: None,
            clock,
            hooks,
        }
    }

    /// Rebuild a countdown from persisted state. A restored end timestamp
    /// in the past completes on the first `tick()`.
    pub(crate) fn restore(
        target_secs: u64,
        remaining_ms: u64,
        end_epoch_ms: Option<u64>,
        clock: Rc<dyn Clock>,
        hooks: Hooks,
    ) -> Self {
        Self {
            target_secs,
            remaining_ms,
            end_epoch_ms,
            clock,
            hooks,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.end_epoch_ms.is_some()
    }

    pub fn target_secs(&self) -> u64 {
        self.target_secs
    }

    /// Live remaining time in milliseconds.
    pub fn remaining_ms(&self) -> u64 {
        match self.end_epoch_ms {
            Some(end) => end.saturating_sub(self.clock.now_ms()),
            None => self.remaining_ms,
        }
    }

    /// Remaining whole seconds, always in `0..=target_secs`. Rounded up so
    /// the display only drops a second once it has fully elapsed.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms().div_ceil(1000).min(self.target_secs)
    }

    /// Elapsed fraction in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total_ms = self.target_secs.saturating_mul(1000);
        if total_ms == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms() as f64 / total_ms as f64)
    }

    pub(crate) fn frozen_remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub(crate) fn end_epoch_ms(&self) -> Option<u64> {
        self.end_epoch_ms
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or resume) counting down. Running already: no-op.
    /// Returns whether the countdown transitioned to running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.end_epoch_ms = Some(self.clock.now_ms() + self.remaining_ms);
        fire(&mut self.hooks.on_start);
        true
    }

    /// Freeze remaining time and cancel the pending expiry. Idle: no-op.
    /// Returns whether the countdown transitioned to idle.
    pub fn stop(&mut self) -> bool {
        let Some(end) = self.end_epoch_ms.take() else {
            return false;
        };
        self.remaining_ms = end.saturating_sub(self.clock.now_ms());
        fire(&mut self.hooks.on_stop);
        true
    }

    /// Silent stop plus restore to the full target. Fires no hooks -- reset
    /// is not a user-visible pause.
    pub fn reset(&mut self) {
        self.end_epoch_ms = None;
        self.remaining_ms = self.target_secs.saturating_mul(1000);
    }

    /// Poll for completion. Returns `true` exactly once per run, on the
    /// tick where remaining time reaches zero; the countdown stops itself
    /// and does not auto-restart.
    pub fn tick(&mut self) -> bool {
        let Some(end) = self.end_epoch_ms else {
            return false;
        };
        if self.clock.now_ms() < end {
            return false;
        }
        self.end_epoch_ms = None;
        self.remaining_ms = 0;
        fire(&mut self.hooks.on_complete);
        true
    }

    /// Change the target duration. Only honored while idle, where it also
    /// reseeds the displayed remaining time to the new full duration; while
    /// running the call is ignored so a live countdown never jumps.
    pub fn set_target_minutes(&mut self, minutes: u64) {
        if self.is_running() {
            return;
        }
        self.target_secs = minutes.saturating_mul(60);
        self.remaining_ms = self.target_secs.saturating_mul(1000);
    }
}

fn fire(hook: &mut Option<Hook>) {
    if let Some(f) = hook.as_mut() {
        f();
    }
}
