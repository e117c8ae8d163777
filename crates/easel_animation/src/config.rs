//! Scheduler configuration presets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors found by [`SchedulerConfig::validate`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Frame rate is zero, negative or not finite
    #[error("invalid frame rate {0} (expected a positive number of frames per second)")]
    InvalidFrameRate(f64),
}

/// Configuration for a [`Scheduler`](crate::Scheduler).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Target ticks per second.
    pub frame_rate: f64,
    /// Use the host's refresh callback when it has one. When `false` the
    /// scheduler always runs on the throttled timer fallback.
    pub prefer_refresh: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl SchedulerConfig {
    /// 60 ticks per second, refresh callback when available.
    pub fn standard() -> Self {
        Self {
            frame_rate: 60.0,
            prefer_refresh: true,
        }
    }

    /// 30 ticks per second for low-power hosts.
    pub fn battery() -> Self {
        Self {
            frame_rate: 30.0,
            prefer_refresh: true,
        }
    }

    /// 120 ticks per second for high refresh displays.
    pub fn high_refresh() -> Self {
        Self {
            frame_rate: 120.0,
            prefer_refresh: true,
        }
    }

    /// Set the target frame rate.
    pub fn with_frame_rate(mut self, hz: f64) -> Self {
        self.frame_rate = hz;
        self
    }

    /// Enable or disable use of the refresh callback.
    pub fn with_prefer_refresh(mut self, prefer: bool) -> Self {
        self.prefer_refresh = prefer;
        self
    }

    /// Spacing between ticks in milliseconds.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.frame_rate
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for config in [
            SchedulerConfig::standard(),
            SchedulerConfig::battery(),
            SchedulerConfig::high_refresh(),
        ] {
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_interval_from_rate() {
        let config = SchedulerConfig::standard().with_frame_rate(50.0);
        assert!((config.frame_interval_ms() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_rate() {
        assert_eq!(
            SchedulerConfig::standard().with_frame_rate(0.0).validate(),
            Err(ConfigError::InvalidFrameRate(0.0))
        );
        assert!(SchedulerConfig::standard()
            .with_frame_rate(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SchedulerConfig = toml::from_str("frame_rate = 24.0").unwrap();
        assert_eq!(config.frame_rate, 24.0);
        assert!(config.prefer_refresh);
    }
}
