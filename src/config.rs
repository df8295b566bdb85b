//! Configuration loading for tlife.
//!
//! The configuration file is located at `~/.tlife/config.toml`:
//!
//! ```toml
//! [timing]
//! tick_ms = 100   # delay between generations while running
//! idle_ms = 10    # polling delay while paused
//!
//! [glyphs]
//! alive = "0"
//! dead = " "
//! ```
//!
//! Every key is optional. A missing or broken file falls back to defaults.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{LifeError, Result};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timing: TimingConfig,
    pub glyphs: Glyphs,
}

/// Tick loop timing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Milliseconds between generations while running
    pub tick_ms: u64,
    /// Milliseconds between flag checks while paused
    pub idle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            idle_ms: 10,
        }
    }
}

impl TimingConfig {
    #[inline]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    #[inline]
    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }
}

/// Characters drawn for live and dead cells
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Glyphs {
    pub alive: char,
    pub dead: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            alive: '0',
            dead: ' ',
        }
    }
}

impl Glyphs {
    #[inline]
    pub fn of(&self, alive: bool) -> char {
        if alive {
            self.alive
        } else {
            self.dead
        }
    }
}

impl Config {
    /// Load configuration from `~/.tlife/config.toml`, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        let parsed = fs::read_to_string(&path)
            .map_err(LifeError::from)
            .and_then(|content| Self::from_toml(&content));

        match parsed {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| LifeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.timing.tick_ms == 0 {
            return Err(LifeError::Config("timing.tick_ms must be at least 1".into()));
        }
        if self.timing.idle_ms == 0 {
            return Err(LifeError::Config("timing.idle_ms must be at least 1".into()));
        }
        Ok(())
    }
}

/// Directory holding the config file and the log.
pub fn app_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".tlife"))
}

fn config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("config.toml"))
}
