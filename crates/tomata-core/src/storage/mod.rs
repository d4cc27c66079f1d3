mod config;
mod state;

pub use config::{AlarmSound, TickingSound, TimerConfig};
pub use state::StateStore;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `TOMATA_DATA_DIR` overrides the location entirely (used by tests);
/// `TOMATA_ENV=dev` switches to `~/.config/tomata-dev/`.
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Ok(custom) = std::env::var("TOMATA_DATA_DIR") {
        PathBuf::from(custom)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("TOMATA_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("tomata-dev")
        } else {
            base_dir.join("tomata")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
