//! `easel.toml` handling
//!
//! ```toml
//! [scheduler]
//! frame_rate = 60.0
//! prefer_refresh = true
//!
//! [demo]
//! duration = 1.0
//! easing = "quad-in-out"
//! loops = 1
//! distance = 100.0
//! ```
//!
//! Every field is optional. Command line flags override file values.

use anyhow::{Context, Result};
use easel_animation::{Easing, SchedulerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "easel.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EaselConfig {
    pub scheduler: SchedulerConfig,
    pub demo: DemoConfig,
}

/// Parameters of the `easel run` demo
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Seconds per animation step
    pub duration: f32,
    /// Easing name, see `easel easings`
    pub easing: String,
    /// Times the two-step sequence is played
    pub loops: u32,
    /// How far the sprite travels along x
    pub distance: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            easing: "quad-in-out".to_string(),
            loops: 1,
            distance: 100.0,
        }
    }
}

impl DemoConfig {
    pub fn easing(&self) -> Result<Easing> {
        self.easing
            .parse()
            .with_context(|| format!("Invalid easing in demo config: {}", self.easing))
    }
}

impl EaselConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: EaselConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config
            .scheduler
            .validate()
            .with_context(|| format!("Invalid scheduler settings in {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` if given, else `easel.toml` from `dir` if present, else
    /// the defaults
    pub fn load_or_default(path: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = dir.join(CONFIG_FILE);
        if default_path.exists() {
            tracing::debug!("Using {}", default_path.display());
            return Self::load(&default_path);
        }

        Ok(Self::default())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: EaselConfig = toml::from_str(
            r#"
            [demo]
            easing = "sine-out"
            "#,
        )
        .unwrap();

        assert_eq!(config.scheduler, SchedulerConfig::standard());
        assert_eq!(config.demo.duration, 1.0);
        assert!(matches!(config.demo.easing().unwrap(), Easing::SineOut));
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = EaselConfig::default().to_toml().unwrap();
        let config: EaselConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.demo.loops, 1);
        assert_eq!(config.scheduler.frame_rate, 60.0);
    }

    #[test]
    fn test_bad_easing_is_reported() {
        let demo = DemoConfig {
            easing: "wobble".into(),
            ..DemoConfig::default()
        };
        let err = demo.easing().unwrap_err();
        assert!(format!("{err:#}").contains("unknown easing `wobble`"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = std::env::temp_dir();
        let missing = dir.join("easel-does-not-exist.toml");
        assert!(EaselConfig::load_or_default(Some(&missing), &dir).is_err());
    }
}
