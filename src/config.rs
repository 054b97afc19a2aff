use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Tunables for a revolver engine.
///
/// Missing fields in a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds after which an abandoned game is cleared.
    pub timeout_secs: u64,
    /// Lower bound of a loser's ban, in seconds.
    pub min_ban_secs: u64,
    /// Upper bound of a loser's ban, in seconds.
    pub max_ban_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 180,
            min_ban_secs: 60,
            max_ban_secs: 300,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file and validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|e| GameError::Config(format!("malformed config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(GameError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.min_ban_secs > self.max_ban_secs {
            return Err(GameError::Config(format!(
                "min_ban_secs ({}) exceeds max_ban_secs ({})",
                self.min_ban_secs, self.max_ban_secs
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
