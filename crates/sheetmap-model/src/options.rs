//! Matching configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default minimum lexical score (0-100) for a fuzzy match to count.
pub const DEFAULT_FUZZY_MIN_THRESHOLD: u8 = 60;

/// Tunables of the matching engine.
///
/// The action thresholds are fixed policy and live in
/// [`ActionThresholds`](crate::ActionThresholds); only the fuzzy floor is
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum fuzzy score (0-100) required to accept a fuzzy match.
    pub fuzzy_min_threshold: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_min_threshold: DEFAULT_FUZZY_MIN_THRESHOLD,
        }
    }
}

impl MatchingConfig {
    /// Create a config, rejecting thresholds outside 0-100.
    pub fn new(fuzzy_min_threshold: u8) -> Result<Self, ConfigError> {
        let config = Self {
            fuzzy_min_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fuzzy_min_threshold > 100 {
            return Err(ConfigError::ThresholdOutOfRange {
                name: "fuzzy_min_threshold",
                value: u32::from(self.fuzzy_min_threshold),
            });
        }
        Ok(())
    }

    pub fn fuzzy_min_score(&self) -> f64 {
        f64::from(self.fuzzy_min_threshold)
    }
}
