use clap::{Subcommand, ValueEnum};
use tomata_core::adapters::format_time;
use tomata_core::{Event, Mode, Session, StateStore};

use super::{load_session, terminal_adapters};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON (ticks first, so a countdown that
    /// expired while no command ran is advanced)
    Status,
    /// Start or pause, whichever applies
    Toggle,
    /// Start the countdown (no-op if already running)
    Start,
    /// Pause the countdown (no-op if idle)
    Stop,
    /// Reset the current phase to its full duration
    Reset,
    /// Advance to the next phase (counts as a completion, no alarm)
    Skip {
        /// Skip the confirmation prompt when a countdown is running
        #[arg(long)]
        yes: bool,
    },
    /// Jump to a mode tab without touching the counters
    Jump {
        #[arg(value_enum)]
        mode: ModeArg,
        /// Skip the confirmation prompt when a countdown is running
        #[arg(long)]
        yes: bool,
    },
    /// Run in the foreground, ticking and drawing the countdown
    Watch {
        /// Poll interval in milliseconds
        #[arg(long, default_value = "250")]
        interval_ms: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Work,
    ShortBreak,
    LongBreak,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Work => Mode::Work,
            ModeArg::ShortBreak => Mode::ShortBreak,
            ModeArg::LongBreak => Mode::LongBreak,
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let assume_yes = matches!(
        action,
        TimerAction::Skip { yes: true } | TimerAction::Jump { yes: true, .. }
    );
    let watching = matches!(action, TimerAction::Watch { .. });
    let (mut session, store) = load_session(terminal_adapters(assume_yes, watching))?;

    match action {
        TimerAction::Status => {
            for event in session.tick() {
                print_event(&event)?;
            }
            print_event(&session.snapshot())?;
        }
        TimerAction::Toggle => {
            session.tick();
            let event = session.toggle();
            print_outcome(&session, event)?;
        }
        TimerAction::Start => {
            session.tick();
            let event = session.start();
            print_outcome(&session, event)?;
        }
        TimerAction::Stop => {
            session.tick();
            let event = session.stop();
            print_outcome(&session, event)?;
        }
        TimerAction::Reset => {
            let event = session.reset();
            print_outcome(&session, event)?;
        }
        TimerAction::Skip { .. } => {
            session.tick();
            let event = session.skip();
            print_outcome(&session, event)?;
        }
        TimerAction::Jump { mode, .. } => {
            session.tick();
            let event = session.jump_to(mode.into());
            print_outcome(&session, event)?;
        }
        TimerAction::Watch { interval_ms } => {
            watch(&mut session, &store, interval_ms.max(50))?;
        }
    }

    store.save(&session.state())?;
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Print the command's event, or the snapshot when the command was a no-op
/// (or the confirmation gate declined).
fn print_outcome(
    session: &Session,
    event: Option<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => print_event(&event),
        None => print_event(&session.snapshot()),
    }
}

/// Foreground loop: tick on an interval, redraw a single status line, and
/// persist state whenever a phase transition happens. Ctrl-C exits after a
/// final save.
fn watch(
    session: &mut Session,
    store: &StateStore,
    interval_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    use std::io::Write;

    if !session.is_running() {
        session.start();
        store.save(&session.state())?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()?;

    runtime.block_on(async {
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(interval_ms));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let events = session.tick();
                    if !events.is_empty() {
                        println!();
                        for event in &events {
                            print_event(event)?;
                        }
                        store.save(&session.state())?;
                    }
                    draw_status_line(session);
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    break;
                }
            }
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    })?;

    let _ = std::io::stdout().flush();
    Ok(())
}

fn draw_status_line(session: &Session) {
    use std::io::Write;

    let state = if session.is_running() { "running" } else { "paused" };
    print!(
        "\r{} {} [{}]  round {}  \x1b[K",
        format_time(session.remaining_secs()),
        session.mode().label(),
        state,
        session.round(),
    );
    let _ = std::io::stdout().flush();
}
