//! # Tomata Core Library
//!
//! Core logic for the Tomata Pomodoro timer. The CLI binary is a thin
//! layer over this crate; any other front end (tray widget, TUI) drives
//! the same types.
//!
//! ## Architecture
//!
//! - **Countdown engine**: a wall-clock-based pausable countdown that
//!   derives remaining time from an absolute end timestamp. No internal
//!   thread -- the caller invokes `tick()` periodically.
//! - **Session**: the mode state machine (work / short break / long
//!   break) owning the completion counters and exactly one countdown for
//!   the active phase.
//! - **Adapters**: narrow traits for the side effects the core dispatches
//!   but never implements -- audio, title/favicon, confirmation prompt.
//! - **Storage**: TOML settings and a JSON session snapshot under
//!   `~/.config/tomata/`.
//!
//! ## Key Components
//!
//! - [`Countdown`]: the countdown engine
//! - [`Session`]: the Pomodoro cycle driver
//! - [`TimerConfig`]: durations, long-break interval, sound settings
//! - [`Event`]: serde-tagged state-change events returned by commands

pub mod adapters;
pub mod clock;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use adapters::{Adapters, AudioSink, ConfirmGate, Presenter};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::{Event, TransitionCause};
pub use storage::{AlarmSound, StateStore, TickingSound, TimerConfig};
pub use timer::{Countdown, Counters, Hooks, Mode, Session, SessionState};
