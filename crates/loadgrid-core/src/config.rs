//! Simulation tuning parameters.
//!
//! The default values are exposed both as constants and as the
//! defaults of [`SimConfig`], which can be overridden from a TOML file:
//!
//! ```toml
//! lower_threshold = 50
//! upper_threshold = 80
//! scaling_cooldown = 50
//! seed = 42
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Scale down when queue depth drops below this many items per unit.
pub const LOWER_THRESHOLD: usize = 50;
/// Scale up when queue depth exceeds this many items per unit.
pub const UPPER_THRESHOLD: usize = 80;
/// Initial backlog per unit, seeded before the first tick.
pub const INITIAL_QUEUE_MULTIPLIER: usize = 100;
/// Longest processing time (ticks) a generated item may have.
pub const MAX_PROCESS_TIME: u32 = 10;
/// Ticks to wait after a scaling action before the next one.
pub const SCALING_COOLDOWN: u32 = 50;
/// A new request arrives on a tick with probability `1 / ARRIVAL_ONE_IN`.
pub const ARRIVAL_ONE_IN: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub lower_threshold: usize,
    pub upper_threshold: usize,
    pub initial_queue_multiplier: usize,
    pub max_process_time: u32,
    pub scaling_cooldown: u32,
    pub arrival_one_in: u32,
    /// Seed for the random traffic generator. Unset means seed from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            lower_threshold: LOWER_THRESHOLD,
            upper_threshold: UPPER_THRESHOLD,
            initial_queue_multiplier: INITIAL_QUEUE_MULTIPLIER,
            max_process_time: MAX_PROCESS_TIME,
            scaling_cooldown: SCALING_COOLDOWN,
            arrival_one_in: ARRIVAL_ONE_IN,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: SimConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the hysteresis band and generator bounds.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.lower_threshold >= self.upper_threshold {
            return Err(ConfigError::Thresholds {
                lower: self.lower_threshold,
                upper: self.upper_threshold,
            });
        }
        if self.max_process_time == 0 {
            return Err(ConfigError::Invalid {
                field: "max_process_time",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.arrival_one_in == 0 {
            return Err(ConfigError::Invalid {
                field: "arrival_one_in",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
