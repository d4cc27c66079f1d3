use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Counters, Mode};

/// What caused a mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// The countdown ran out naturally.
    Completed,
    /// Explicit skip/next intent. Uses completion semantics for counters
    /// but never plays the alarm.
    Skipped,
    /// Explicit jump to a mode tab. Pure navigation; counters untouched.
    Jumped,
}

/// Every observable state change in the session produces an Event.
/// Commands return them; pollers and the CLI print them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown for a phase ran to zero. Followed by a `ModeChanged`
    /// with cause `completed` on the same tick.
    TimerCompleted {
        mode: Mode,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
        cause: TransitionCause,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        mode_label: String,
        running: bool,
        remaining_secs: u64,
        duration_secs: u64,
        progress: f64,
        counters: Counters,
        round: u32,
        at: DateTime<Utc>,
    },
}
