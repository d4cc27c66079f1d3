//! Terminal implementations of the core's side-effect adapters.
//!
//! All of these are fire-and-forget: failures are printed to stderr and
//! swallowed so a missing notification daemon or a dumb terminal can
//! never stall the timer.

use std::io::{BufRead, Write};

use notify_rust::Notification;
use tomata_core::adapters::format_time;
use tomata_core::{AudioSink, ConfirmGate, Mode, Presenter};

/// Mirrors the browser tab title in the terminal title bar
/// (`MM:SS - <label>`), via the xterm OSC 0 sequence.
pub struct TerminalPresenter {
    /// Title updates are only worth emitting in watch mode; one-shot
    /// commands would leave a stale title behind.
    enabled: bool,
}

impl TerminalPresenter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Presenter for TerminalPresenter {
    fn update_title(&self, remaining_secs: u64, mode: Mode) {
        if !self.enabled {
            return;
        }
        let mut out = std::io::stdout();
        let _ = write!(
            out,
            "\x1b]0;{} - {}\x07",
            format_time(remaining_secs),
            mode.label()
        );
        let _ = out.flush();
    }

    fn update_favicon(&self, _mode: Option<Mode>) {
        // No favicon analogue in a terminal; the title carries the mode.
    }
}

/// Alarm channel: rings the terminal bell and raises a desktop
/// notification on `play`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopAlarm;

impl AudioSink for DesktopAlarm {
    fn set_track(&self, _asset: &str) {
        // The terminal bell is the only "track" this sink has.
    }

    fn set_volume(&self, _volume: u32) {
        // Desktop notifications have no volume control.
    }

    fn play(&self) {
        print!("\x07");
        let _ = std::io::stdout().flush();
        let result = Notification::new()
            .summary("Tomata")
            .body("Time is up!")
            .appname("tomata")
            .show();
        if let Err(e) = result {
            eprintln!("notification failed: {e}");
        }
    }

    fn stop(&self) {}
}

/// y/N prompt on stdin. `assume_yes` (the `--yes` flag) bypasses the
/// prompt entirely.
pub struct StdinGate {
    assume_yes: bool,
}

impl StdinGate {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ConfirmGate for StdinGate {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            // Can't ask -- keep the running countdown rather than discard it.
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
