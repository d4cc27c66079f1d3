mod countdown;
mod mode;
mod session;

pub use countdown::{Countdown, Hook, Hooks};
pub use mode::{Counters, Mode};
pub use session::{Session, SessionState, CONFIRM_PROMPT};
