use serde::{Deserialize, Serialize};

/// One phase of the Pomodoro cycle. Exactly one mode is active at a time;
/// the cycle has no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    /// All modes, in tab order.
    pub const ALL: [Mode; 3] = [Mode::Work, Mode::ShortBreak, Mode::LongBreak];

    /// Human-readable display label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "Pomodoro",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        matches!(self, Mode::ShortBreak | Mode::LongBreak)
    }
}

/// Completed-phase counters. Mutated only by the session on a confirmed
/// transition away from a completed phase; never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default)]
    pub work: u32,
    #[serde(default)]
    pub short_breaks: u32,
    #[serde(default)]
    pub long_breaks: u32,
}

impl Counters {
    pub fn total(&self) -> u32 {
        self.work + self.short_breaks + self.long_breaks
    }
}
