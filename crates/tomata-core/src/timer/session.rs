//! Mode state machine.
//!
//! Owns the active [`Mode`], the completion [`Counters`], and exactly one
//! [`Countdown`] for the active phase. When the countdown expires the
//! session advances the cycle: breaks always return to work; a completed
//! work interval leads to a short break, or a long break every
//! `long_break_interval`-th completion (checked against the count *before*
//! it is incremented). Explicit jumps are navigation, not completions, and
//! touch no counters.
//!
//! Side effects (ticking sound, alarm, title/favicon) are dispatched
//! through the adapter traits; interrupting a running countdown goes
//! through the confirmation gate first.

use std::rc::Rc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::adapters::Adapters;
use crate::clock::{Clock, SystemClock};
use crate::events::{Event, TransitionCause};
use crate::storage::TimerConfig;
use crate::timer::countdown::{Countdown, Hooks};
use crate::timer::{Counters, Mode};

/// Prompt shown before discarding a running countdown.
pub const CONFIRM_PROMPT: &str =
    "The timer is still running. Abandon the current countdown?";

/// Serializable snapshot of a session, for persistence between runs.
/// The absolute end timestamp makes a countdown survive a process restart
/// without drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub mode: Mode,
    #[serde(default)]
    pub counters: Counters,
    #[serde(default = "default_round")]
    pub round: u32,
    pub target_secs: u64,
    pub remaining_ms: u64,
    #[serde(default)]
    pub end_epoch_ms: Option<u64>,
}

fn default_round() -> u32 {
    1
}

/// The Pomodoro cycle driver.
pub struct Session {
    config: TimerConfig,
    mode: Mode,
    counters: Counters,
    /// Full work/break cycles completed so far, 1-based.
    round: u32,
    countdown: Countdown,
    clock: Rc<dyn Clock>,
    adapters: Adapters,
}

impl Session {
    /// Fresh session: WORK mode, zero counters, idle countdown seeded from
    /// the configured work duration.
    pub fn new(config: TimerConfig, adapters: Adapters) -> Self {
        Self::with_clock(config, adapters, Rc::new(SystemClock))
    }

    pub fn with_clock(config: TimerConfig, adapters: Adapters, clock: Rc<dyn Clock>) -> Self {
        let mode = Mode::Work;
        apply_audio_settings(&config, &adapters);
        let countdown = build_countdown(&config, mode, &adapters, &clock);
        Self {
            config,
            mode,
            counters: Counters::default(),
            round: 1,
            countdown,
            clock,
            adapters,
        }
    }

    /// Rebuild a session from a persisted snapshot.
    pub fn restore(config: TimerConfig, state: SessionState, adapters: Adapters) -> Self {
        Self::restore_with_clock(config, state, adapters, Rc::new(SystemClock))
    }

    pub fn restore_with_clock(
        config: TimerConfig,
        state: SessionState,
        adapters: Adapters,
        clock: Rc<dyn Clock>,
    ) -> Self {
        apply_audio_settings(&config, &adapters);
        let hooks = phase_hooks(state.mode, &adapters);
        let countdown = Countdown::restore(
            state.target_secs,
            state.remaining_ms,
            state.end_epoch_ms,
            clock.clone(),
            hooks,
        );
        Self {
            config,
            mode: state.mode,
            counters: state.counters,
            round: state.round,
            countdown,
            clock,
            adapters,
        }
    }

    /// Snapshot for persistence.
    pub fn state(&self) -> SessionState {
        SessionState {
            mode: self.mode,
            counters: self.counters,
            round: self.round,
            target_secs: self.countdown.target_secs(),
            remaining_ms: self.countdown.frozen_remaining_ms(),
            end_epoch_ms: self.countdown.end_epoch_ms(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    pub fn progress(&self) -> f64 {
        self.countdown.progress()
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            mode_label: self.mode.label().to_string(),
            running: self.countdown.is_running(),
            remaining_secs: self.countdown.remaining_secs(),
            duration_secs: self.countdown.target_secs(),
            progress: self.countdown.progress(),
            counters: self.counters,
            round: self.round,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if !self.countdown.start() {
            return None;
        }
        self.push_title();
        Some(Event::TimerStarted {
            mode: self.mode,
            duration_secs: self.countdown.target_secs(),
            at: Utc::now(),
        })
    }

    pub fn stop(&mut self) -> Option<Event> {
        if !self.countdown.stop() {
            return None;
        }
        self.push_title();
        Some(Event::TimerStopped {
            mode: self.mode,
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.countdown.is_running() {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Reset the current phase's countdown without leaving the phase.
    pub fn reset(&mut self) -> Option<Event> {
        self.countdown.reset();
        self.push_title();
        Some(Event::TimerReset {
            mode: self.mode,
            at: Utc::now(),
        })
    }

    /// Poll the active countdown. On natural expiry the session plays the
    /// alarm, advances the cycle, and auto-starts the next phase; the
    /// returned events are `TimerCompleted` followed by the `ModeChanged`.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.countdown.tick() {
            if self.countdown.is_running() {
                self.push_title();
            }
            return Vec::new();
        }
        for _ in 0..self.config.alarm_repeat {
            self.adapters.alarm.play();
        }
        let completed = Event::TimerCompleted {
            mode: self.mode,
            at: Utc::now(),
        };
        let changed = self.advance(TransitionCause::Completed);
        vec![completed, changed]
    }

    /// Explicit skip/next intent. Uses completion counter semantics but
    /// never plays the alarm. Interrupting a running countdown asks the
    /// confirmation gate first.
    pub fn skip(&mut self) -> Option<Event> {
        if !self.confirm_interrupt() {
            return None;
        }
        Some(self.advance(TransitionCause::Skipped))
    }

    /// Jump to a mode tab. Pure navigation: no counters, no auto-start.
    /// Interrupting a running countdown asks the confirmation gate first.
    pub fn jump_to(&mut self, mode: Mode) -> Option<Event> {
        if !self.confirm_interrupt() {
            return None;
        }
        let from = self.mode;
        self.switch_mode(mode);
        Some(Event::ModeChanged {
            from,
            to: mode,
            cause: TransitionCause::Jumped,
            at: Utc::now(),
        })
    }

    /// Swap in a new configuration. Sounds and volumes apply immediately;
    /// a changed duration for the active mode reseeds the countdown only
    /// while idle -- a running countdown is never rescaled.
    pub fn apply_config(&mut self, config: TimerConfig) -> crate::error::Result<()> {
        config.validate()?;
        self.config = config;
        apply_audio_settings(&self.config, &self.adapters);
        if !self.countdown.is_running() {
            self.countdown
                .set_target_minutes(self.config.duration_min(self.mode));
            self.push_title();
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Completion-semantics transition: count the phase being left, pick
    /// the next mode (pre-increment modulo check for long breaks), switch,
    /// and immediately start the new countdown.
    fn advance(&mut self, cause: TransitionCause) -> Event {
        let from = self.mode;
        let to = match from {
            Mode::ShortBreak => {
                self.counters.short_breaks += 1;
                Mode::Work
            }
            Mode::LongBreak => {
                self.counters.long_breaks += 1;
                self.round += 1;
                Mode::Work
            }
            Mode::Work => {
                let due_long = self.counters.work % self.config.long_break_interval == 0
                    && self.counters.work != 0;
                self.counters.work += 1;
                if due_long {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
        };
        self.switch_mode(to);
        self.countdown.start();
        self.push_title();
        Event::ModeChanged {
            from,
            to,
            cause,
            at: Utc::now(),
        }
    }

    /// Pause-confirm-resume gate around any transition that would discard
    /// a running countdown. Idle: always allowed, no prompt.
    fn confirm_interrupt(&mut self) -> bool {
        if !self.countdown.is_running() {
            return true;
        }
        self.stop();
        if self.adapters.gate.confirm(CONFIRM_PROMPT) {
            true
        } else {
            self.start();
            false
        }
    }

    /// Activate `mode` with a fresh countdown seeded from the config.
    fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.countdown = build_countdown(&self.config, mode, &self.adapters, &self.clock);
        self.adapters.presenter.update_favicon(Some(mode));
        self.push_title();
    }

    fn push_title(&self) {
        self.adapters
            .presenter
            .update_title(self.countdown.remaining_secs(), self.mode);
    }
}

fn build_countdown(
    config: &TimerConfig,
    mode: Mode,
    adapters: &Adapters,
    clock: &Rc<dyn Clock>,
) -> Countdown {
    Countdown::with_hooks(
        config.duration_min(mode),
        clock.clone(),
        phase_hooks(mode, adapters),
    )
}

/// Wire a phase's lifecycle hooks to the adapters, mirroring what the
/// presentation layer cares about: favicon state on start/stop, and the
/// ambient ticking loop that runs only during work intervals.
fn phase_hooks(mode: Mode, adapters: &Adapters) -> Hooks {
    Hooks::default()
        .on_start({
            let ticking = adapters.ticking.clone();
            let presenter = adapters.presenter.clone();
            move || {
                presenter.update_favicon(Some(mode));
                if mode == Mode::Work {
                    ticking.play();
                }
            }
        })
        .on_stop({
            let ticking = adapters.ticking.clone();
            let presenter = adapters.presenter.clone();
            move || {
                presenter.update_favicon(None);
                if mode == Mode::Work {
                    ticking.stop();
                }
            }
        })
        .on_complete({
            let ticking = adapters.ticking.clone();
            move || {
                if mode == Mode::Work {
                    ticking.stop();
                }
            }
        })
}

fn apply_audio_settings(config: &TimerConfig, adapters: &Adapters) {
    adapters.alarm.set_track(config.alarm_sound.asset());
    adapters.alarm.set_volume(config.alarm_volume);
    if let Some(asset) = config.ticking_sound.asset() {
        adapters.ticking.set_track(asset);
    }
    adapters.ticking.set_volume(config.ticking_volume);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AudioSink, ConfirmGate, Presenter};
    use crate::clock::ManualClock;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct RecordingAudio {
        calls: RefCell<Vec<String>>,
    }

    impl AudioSink for RecordingAudio {
        fn set_track(&self, asset: &str) {
            self.calls.borrow_mut().push(format!("track:{asset}"));
        }
        fn set_volume(&self, volume: u32) {
            self.calls.borrow_mut().push(format!("volume:{volume}"));
        }
        fn play(&self) {
            self.calls.borrow_mut().push("play".into());
        }
        fn stop(&self) {
            self.calls.borrow_mut().push("stop".into());
        }
    }

    impl RecordingAudio {
        fn count(&self, call: &str) -> usize {
            self.calls.borrow().iter().filter(|c| *c == call).count()
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        titles: RefCell<Vec<(u64, Mode)>>,
        favicons: RefCell<Vec<Option<Mode>>>,
    }

    impl Presenter for RecordingPresenter {
        fn update_title(&self, remaining_secs: u64, mode: Mode) {
            self.titles.borrow_mut().push((remaining_secs, mode));
        }
        fn update_favicon(&self, mode: Option<Mode>) {
            self.favicons.borrow_mut().push(mode);
        }
    }

    /// Gate that answers a fixed value and counts how often it was asked.
    struct ScriptedGate {
        answer: Cell<bool>,
        asked: Cell<u32>,
    }

    impl ScriptedGate {
        fn new(answer: bool) -> Rc<Self> {
            Rc::new(Self {
                answer: Cell::new(answer),
                asked: Cell::new(0),
            })
        }
    }

    impl ConfirmGate for ScriptedGate {
        fn confirm(&self, _prompt: &str) -> bool {
            self.asked.set(self.asked.get() + 1);
            self.answer.get()
        }
    }

    struct Harness {
        session: Session,
        clock: Rc<ManualClock>,
        ticking: Rc<RecordingAudio>,
        alarm: Rc<RecordingAudio>,
        presenter: Rc<RecordingPresenter>,
        gate: Rc<ScriptedGate>,
    }

    fn harness(config: TimerConfig) -> Harness {
        let clock = ManualClock::new(0);
        let ticking = Rc::new(RecordingAudio::default());
        let alarm = Rc::new(RecordingAudio::default());
        let presenter = Rc::new(RecordingPresenter::default());
        let gate = ScriptedGate::new(true);
        let adapters = Adapters {
            ticking: ticking.clone(),
            alarm: alarm.clone(),
            presenter: presenter.clone(),
            gate: gate.clone(),
        };
        let session = Session::with_clock(config, adapters, clock.clone());
        Harness {
            session,
            clock,
            ticking,
            alarm,
            presenter,
            gate,
        }
    }

    /// Run the active phase to natural completion, returning the mode it
    /// transitioned into.
    fn complete_phase(h: &mut Harness) -> Mode {
        if !h.session.is_running() {
            h.session.start();
        }
        let secs = h.session.remaining_secs();
        h.clock.advance_secs(secs);
        let events = h.session.tick();
        match events.as_slice() {
            [Event::TimerCompleted { .. }, Event::ModeChanged { to, .. }] => *to,
            other => panic!("expected completion then transition, got {other:?}"),
        }
    }

    #[test]
    fn initial_state_is_idle_work() {
        let h = harness(TimerConfig::default());
        assert_eq!(h.session.mode(), Mode::Work);
        assert!(!h.session.is_running());
        assert_eq!(h.session.remaining_secs(), 25 * 60);
        assert_eq!(h.session.counters(), Counters::default());
        assert_eq!(h.session.round(), 1);
    }

    #[test]
    fn first_five_work_completions_break_pattern() {
        // Interval 4: the pre-increment modulo check yields four short
        // breaks before the first long one.
        let mut h = harness(TimerConfig::default());
        let mut breaks = Vec::new();
        for _ in 0..5 {
            assert_eq!(h.session.mode(), Mode::Work);
            breaks.push(complete_phase(&mut h));
            // Complete the break to get back to work.
            assert!(h.session.mode().is_break());
            complete_phase(&mut h);
        }
        assert_eq!(
            breaks,
            vec![
                Mode::ShortBreak,
                Mode::ShortBreak,
                Mode::ShortBreak,
                Mode::ShortBreak,
                Mode::LongBreak,
            ]
        );
        assert_eq!(h.session.counters().work, 5);
        assert_eq!(h.session.counters().short_breaks, 4);
        assert_eq!(h.session.counters().long_breaks, 1);
    }

    #[test]
    fn natural_expiry_emits_completion_before_transition() {
        let mut h = harness(TimerConfig::default());
        h.session.start();
        h.clock.advance_secs(25 * 60);
        let events = h.session.tick();
        assert!(matches!(
            events.as_slice(),
            [
                Event::TimerCompleted {
                    mode: Mode::Work,
                    ..
                },
                Event::ModeChanged {
                    from: Mode::Work,
                    to: Mode::ShortBreak,
                    cause: TransitionCause::Completed,
                    ..
                },
            ]
        ));
    }

    #[test]
    fn completion_auto_starts_next_phase() {
        let mut h = harness(TimerConfig::default());
        let to = complete_phase(&mut h);
        assert_eq!(to, Mode::ShortBreak);
        assert!(h.session.is_running());
        assert_eq!(h.session.remaining_secs(), 5 * 60);
    }

    #[test]
    fn round_increments_when_long_break_completes() {
        let mut cfg = TimerConfig::default();
        cfg.long_break_interval = 1;
        let mut h = harness(cfg);
        assert_eq!(h.session.round(), 1);
        // First work completion -> short break (count was 0).
        assert_eq!(complete_phase(&mut h), Mode::ShortBreak);
        complete_phase(&mut h);
        // Second -> long break (count 1, 1 % 1 == 0).
        assert_eq!(complete_phase(&mut h), Mode::LongBreak);
        assert_eq!(h.session.round(), 1);
        complete_phase(&mut h);
        assert_eq!(h.session.round(), 2);
    }

    #[test]
    fn alarm_fires_only_on_natural_completion() {
        let mut cfg = TimerConfig::default();
        cfg.alarm_repeat = 2;
        let mut h = harness(cfg);
        complete_phase(&mut h);
        assert_eq!(h.alarm.count("play"), 2);

        // Skip and jump must stay silent.
        h.session.skip();
        h.session.jump_to(Mode::Work);
        assert_eq!(h.alarm.count("play"), 2);
    }

    #[test]
    fn ticking_plays_only_during_running_work() {
        let mut h = harness(TimerConfig::default());
        h.session.start();
        assert_eq!(h.ticking.count("play"), 1);
        h.session.stop();
        assert_eq!(h.ticking.count("stop"), 1);

        // Break phases never tick.
        h.session.jump_to(Mode::ShortBreak);
        h.session.start();
        assert_eq!(h.ticking.count("play"), 1);
    }

    #[test]
    fn ticking_stops_when_work_completes() {
        let mut h = harness(TimerConfig::default());
        complete_phase(&mut h);
        // Stopped by on_complete; the break phase did not restart it.
        assert_eq!(h.ticking.count("play"), 1);
        assert!(h.ticking.count("stop") >= 1);
    }

    #[test]
    fn jump_while_idle_skips_gate_and_counters() {
        let mut h = harness(TimerConfig::default());
        let event = h.session.jump_to(Mode::LongBreak);
        assert!(matches!(
            event,
            Some(Event::ModeChanged {
                cause: TransitionCause::Jumped,
                ..
            })
        ));
        assert_eq!(h.gate.asked.get(), 0);
        assert_eq!(h.session.counters(), Counters::default());
        assert_eq!(h.session.mode(), Mode::LongBreak);
        assert!(!h.session.is_running(), "jump must not auto-start");
        assert_eq!(h.session.remaining_secs(), 15 * 60);
    }

    #[test]
    fn jump_while_running_asks_gate_once() {
        let mut h = harness(TimerConfig::default());
        h.session.start();
        h.session.jump_to(Mode::ShortBreak);
        assert_eq!(h.gate.asked.get(), 1);
        assert_eq!(h.session.mode(), Mode::ShortBreak);
        assert_eq!(h.session.counters(), Counters::default());
    }

    #[test]
    fn declined_gate_resumes_countdown_unchanged() {
        let mut h = harness(TimerConfig::default());
        h.gate.answer.set(false);
        h.session.start();
        h.clock.advance_secs(30);
        assert!(h.session.jump_to(Mode::ShortBreak).is_none());
        assert_eq!(h.gate.asked.get(), 1);
        assert_eq!(h.session.mode(), Mode::Work);
        assert!(h.session.is_running());
        assert_eq!(h.session.remaining_secs(), 25 * 60 - 30);
    }

    #[test]
    fn skip_uses_completion_counter_semantics() {
        let mut h = harness(TimerConfig::default());
        let event = h.session.skip();
        assert!(matches!(
            event,
            Some(Event::ModeChanged {
                from: Mode::Work,
                to: Mode::ShortBreak,
                cause: TransitionCause::Skipped,
                ..
            })
        ));
        assert_eq!(h.session.counters().work, 1);
        assert!(h.session.is_running(), "skip starts the next phase");
    }

    #[test]
    fn skip_while_running_declined_changes_nothing() {
        let mut h = harness(TimerConfig::default());
        h.gate.answer.set(false);
        h.session.start();
        assert!(h.session.skip().is_none());
        assert_eq!(h.session.mode(), Mode::Work);
        assert_eq!(h.session.counters().work, 0);
        assert!(h.session.is_running());
    }

    #[test]
    fn reset_restores_full_duration_and_progress() {
        let mut h = harness(TimerConfig::default());
        h.session.start();
        h.clock.advance_secs(120);
        h.session.reset();
        assert!(!h.session.is_running());
        assert_eq!(h.session.remaining_secs(), 25 * 60);
        assert_eq!(h.session.progress(), 0.0);
    }

    #[test]
    fn duration_change_applies_to_idle_countdown() {
        let mut h = harness(TimerConfig::default());
        let mut cfg = h.session.config().clone();
        cfg.work_min = 50;
        h.session.apply_config(cfg).unwrap();
        assert_eq!(h.session.remaining_secs(), 50 * 60);
    }

    #[test]
    fn duration_change_is_deferred_while_running() {
        let mut h = harness(TimerConfig::default());
        h.session.start();
        h.clock.advance_secs(60);
        let mut cfg = h.session.config().clone();
        cfg.work_min = 50;
        h.session.apply_config(cfg).unwrap();
        assert_eq!(h.session.remaining_secs(), 24 * 60);
    }

    #[test]
    fn apply_config_rejects_invalid_values() {
        let mut h = harness(TimerConfig::default());
        let mut cfg = h.session.config().clone();
        cfg.long_break_interval = 0;
        assert!(h.session.apply_config(cfg).is_err());
        assert_eq!(h.session.config().long_break_interval, 4);
    }

    #[test]
    fn title_tracks_remaining_time() {
        let mut h = harness(TimerConfig::default());
        h.session.start();
        h.clock.advance_secs(1);
        h.session.tick();
        let titles = h.presenter.titles.borrow();
        assert_eq!(titles.last(), Some(&(25 * 60 - 1, Mode::Work)));
    }

    #[test]
    fn state_roundtrip_preserves_countdown() {
        let mut h = harness(TimerConfig::default());
        h.session.start();
        h.clock.advance_secs(40);
        h.session.stop();
        h.session.jump_to(Mode::Work); // same-tab jump resets; redo some progress
        h.session.start();
        h.clock.advance_secs(10);
        h.session.stop();
        let state = h.session.state();

        let restored = Session::restore_with_clock(
            h.session.config().clone(),
            state,
            Adapters::default(),
            h.clock.clone(),
        );
        assert_eq!(restored.mode(), Mode::Work);
        assert_eq!(restored.remaining_secs(), 25 * 60 - 10);
        assert!(!restored.is_running());
    }

    #[test]
    fn restored_running_countdown_completes_after_gap() {
        let mut h = harness(TimerConfig::default());
        h.session.start();
        let state = h.session.state();

        // Process restarts an hour later; the end timestamp is long past.
        h.clock.advance_secs(3600);
        let mut restored = Session::restore_with_clock(
            h.session.config().clone(),
            state,
            Adapters::default(),
            h.clock.clone(),
        );
        assert!(restored.is_running());
        let events = restored.tick();
        assert!(matches!(
            events.as_slice(),
            [
                Event::TimerCompleted { .. },
                Event::ModeChanged {
                    from: Mode::Work,
                    to: Mode::ShortBreak,
                    cause: TransitionCause::Completed,
                    ..
                },
            ]
        ));
        assert_eq!(restored.counters().work, 1);
    }
}
