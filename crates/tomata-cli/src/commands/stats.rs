use clap::Subcommand;
use serde_json::json;
use tomata_core::StateStore;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print completion counters as JSON
    Show,
    /// Zero the counters and the round number (the timer itself is kept)
    Reset,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = StateStore::open()?;

    match action {
        StatsAction::Show => {
            let state = store.load();
            let (counters, round) = match &state {
                Some(s) => (s.counters, s.round),
                None => (Default::default(), 1),
            };
            let out = json!({
                "work": counters.work,
                "short_breaks": counters.short_breaks,
                "long_breaks": counters.long_breaks,
                "total": counters.total(),
                "round": round,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Reset => {
            // Counters reset is the one external mutation the state
            // machine allows; the countdown itself is untouched.
            if let Some(mut state) = store.load() {
                state.counters = Default::default();
                state.round = 1;
                store.save(&state)?;
            }
            println!("{{\"type\": \"counters_reset\"}}");
        }
    }
    Ok(())
}
