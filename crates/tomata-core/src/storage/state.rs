//! JSON persistence for the live session.
//!
//! The session snapshot (mode, counters, countdown remaining time plus its
//! absolute end timestamp) is written to `state.json` in the data
//! directory after every CLI command and reloaded on the next invocation.
//! Because remaining time derives from the end timestamp, a countdown that
//! was running keeps perfect time across process restarts.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::timer::SessionState;

pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store backed by `state.json` in the data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::at(super::data_dir()?.join("state.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session, if any. A missing or unreadable file
    /// yields `None` (a corrupt state file must not brick the timer).
    pub fn load(&self) -> Option<SessionState> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn save(&self, state: &SessionState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the persisted session.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
