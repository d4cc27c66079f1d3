//! TOML-based timer settings.
//!
//! Stores per-mode durations, the long-break interval, and the sound
//! preferences (alarm + ambient ticking). The session reads these values
//! but never owns their lifecycle; the surrounding application loads,
//! edits, and persists them here.
//!
//! Configuration is stored at `~/.config/tomata/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::timer::Mode;

/// Alarm track played once per natural completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmSound {
    Digital,
    Bell,
    Kitchen,
}

impl AlarmSound {
    pub fn asset(self) -> &'static str {
        match self {
            AlarmSound::Digital => "sounds/alarm-digital.wav",
            AlarmSound::Bell => "sounds/alarm-bell.wav",
            AlarmSound::Kitchen => "sounds/alarm-kitchen.wav",
        }
    }
}

/// Ambient loop played during work intervals while the timer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickingSound {
    Slow,
    Fast,
    None,
}

impl TickingSound {
    pub fn asset(self) -> Option<&'static str> {
        match self {
            TickingSound::Slow => Some("sounds/ticking-slow.wav"),
            TickingSound::Fast => Some("sounds/ticking-fast.wav"),
            TickingSound::None => None,
        }
    }
}

/// Per-session timer settings.
///
/// Serialized to/from TOML at `~/.config/tomata/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Work interval length in minutes.
    #[serde(default = "default_work_min")]
    pub work_min: u64,
    #[serde(default = "default_short_break_min")]
    pub short_break_min: u64,
    #[serde(default = "default_long_break_min")]
    pub long_break_min: u64,
    /// Every Nth completed work interval is followed by a long break.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    #[serde(default = "default_alarm_sound")]
    pub alarm_sound: AlarmSound,
    #[serde(default = "default_volume")]
    pub alarm_volume: u32,
    /// How many times the alarm fires per completion.
    #[serde(default = "default_alarm_repeat")]
    pub alarm_repeat: u32,
    #[serde(default = "default_ticking_sound")]
    pub ticking_sound: TickingSound,
    #[serde(default = "default_volume")]
    pub ticking_volume: u32,
}

// Default functions
fn default_work_min() -> u64 {
    25
}
fn default_short_break_min() -> u64 {
    5
}
fn default_long_break_min() -> u64 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_alarm_sound() -> AlarmSound {
    AlarmSound::Digital
}
fn default_ticking_sound() -> TickingSound {
    TickingSound::Slow
}
fn default_volume() -> u32 {
    80
}
fn default_alarm_repeat() -> u32 {
    1
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_min: default_work_min(),
            short_break_min: default_short_break_min(),
            long_break_min: default_long_break_min(),
            long_break_interval: default_long_break_interval(),
            alarm_sound: default_alarm_sound(),
            alarm_volume: default_volume(),
            alarm_repeat: default_alarm_repeat(),
            ticking_sound: default_ticking_sound(),
            ticking_volume: default_volume(),
        }
    }
}

impl TimerConfig {
    /// Configured duration for a mode, in minutes.
    pub fn duration_min(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Work => self.work_min,
            Mode::ShortBreak => self.short_break_min,
            Mode::LongBreak => self.long_break_min,
        }
    }

    pub fn set_duration_min(&mut self, mode: Mode, minutes: u64) {
        match mode {
            Mode::Work => self.work_min = minutes,
            Mode::ShortBreak => self.short_break_min = minutes,
            Mode::LongBreak => self.long_break_min = minutes,
        }
    }

    /// Reject values the timers must never see: zero/negative durations,
    /// a zero long-break interval (the modulo check would divide by zero),
    /// volumes above 100.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for mode in Mode::ALL {
            if self.duration_min(mode) == 0 {
                return Err(ValidationError::invalid(
                    duration_field(mode),
                    "duration must be at least 1 minute",
                ));
            }
        }
        if self.long_break_interval == 0 {
            return Err(ValidationError::invalid(
                "long_break_interval",
                "interval must be a positive integer",
            ));
        }
        if self.alarm_volume > 100 {
            return Err(ValidationError::invalid(
                "alarm_volume",
                "volume must be in 0..=100",
            ));
        }
        if self.ticking_volume > 100 {
            return Err(ValidationError::invalid(
                "ticking_volume",
                "volume must be in 0..=100",
            ));
        }
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub(crate) fn load_from(path: &std::path::Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: TimerConfig =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk. Validates first so an invalid config never lands
    /// on disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    pub(crate) fn save_to(&self, path: &std::path::Path) -> Result<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, re-parsing the value against the field's
    /// current type. Does not persist; call `save` afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::ParseFailed("config is not a table".into()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Number(_) => {
                let n: u64 = value
                    .parse()
                    .map_err(|_| ConfigError::ParseFailed(format!("'{value}' is not a number")))?;
                serde_json::Value::Number(n.into())
            }
            // Sound selectors serialize as strings.
            _ => serde_json::Value::String(value.to_string()),
        };
        obj.insert(key.to_string(), new_value);

        let updated: TimerConfig = serde_json::from_value(json)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn duration_field(mode: Mode) -> &'static str {
    match mode {
        Mode::Work => "work_min",
        Mode::ShortBreak => "short_break_min",
        Mode::LongBreak => "long_break_min",
    }
}
