pub mod config;
pub mod stats;
pub mod timer;

use std::rc::Rc;

use tomata_core::{Adapters, Session, StateStore, TimerConfig};

use crate::adapters::{DesktopAlarm, StdinGate, TerminalPresenter};

/// Wire the terminal adapter set. Ticking has no terminal backend, so it
/// stays on the core's null sink.
pub(crate) fn terminal_adapters(assume_yes: bool, title_updates: bool) -> Adapters {
    Adapters {
        alarm: Rc::new(DesktopAlarm::default()),
        presenter: Rc::new(TerminalPresenter::new(title_updates)),
        gate: Rc::new(StdinGate::new(assume_yes)),
        ..Adapters::default()
    }
}

/// Load settings and the persisted session, if any.
pub(crate) fn load_session(
    adapters: Adapters,
) -> Result<(Session, StateStore), Box<dyn std::error::Error>> {
    let config = TimerConfig::load_or_default();
    let store = StateStore::open()?;
    let session = match store.load() {
        Some(state) => Session::restore(config, state, adapters),
        None => Session::new(config, adapters),
    };
    Ok((session, store))
}
