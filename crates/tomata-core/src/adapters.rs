//! Side-effect adapter seams.
//!
//! The session never renders, plays audio, or prompts the user itself; it
//! dispatches fire-and-forget calls through these traits. Adapter failures
//! must never block or corrupt countdown progress, so every method is
//! infallible from the core's point of view -- implementations swallow
//! their own errors.
//!
//! Adapters are shared with the countdown's lifecycle hooks, so they are
//! passed around as `Rc` and take `&self`; stateful implementations use
//! interior mutability. The whole core is single-threaded and cooperative.

use std::rc::Rc;

use crate::timer::Mode;

/// One audio channel: a track selector plus play/stop/volume commands.
/// The session owns two of these -- ambient ticking and the alarm.
pub trait AudioSink {
    /// Select the track by asset path. A no-op until `play`.
    fn set_track(&self, asset: &str);
    /// Volume in 0..=100.
    fn set_volume(&self, volume: u32);
    fn play(&self);
    fn stop(&self);
}

/// Window title / favicon analogue. Called after every remaining-time
/// change and on start/stop/mode change.
pub trait Presenter {
    fn update_title(&self, remaining_secs: u64, mode: Mode);
    /// `None` clears the active-mode indicator (timer not running).
    fn update_favicon(&self, mode: Option<Mode>);
}

/// Yes/no prompt shown before discarding a running countdown.
pub trait ConfirmGate {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Format seconds as `MM:SS` for titles and status lines.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

// ── Null implementations ─────────────────────────────────────────────

/// Discards all audio commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn set_track(&self, _asset: &str) {}
    fn set_volume(&self, _volume: u32) {}
    fn play(&self) {}
    fn stop(&self) {}
}

/// Discards all presentation updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn update_title(&self, _remaining_secs: u64, _mode: Mode) {}
    fn update_favicon(&self, _mode: Option<Mode>) {}
}

/// Confirms every interruption without prompting.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl ConfirmGate for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// The full adapter set a session is wired with.
#[derive(Clone)]
pub struct Adapters {
    pub ticking: Rc<dyn AudioSink>,
    pub alarm: Rc<dyn AudioSink>,
    pub presenter: Rc<dyn Presenter>,
    pub gate: Rc<dyn ConfirmGate>,
}

impl Default for Adapters {
    fn default() -> Self {
        Self {
            ticking: Rc::new(NullAudio),
            alarm: Rc::new(NullAudio),
            presenter: Rc::new(NullPresenter),
            gate: Rc::new(AlwaysConfirm),
        }
    }
}
