// SPDX-License-Identifier: MIT OR Apache-2.0
//! Showcase configuration, stored as RON.

use crate::animator::{showcase_timeline, SHOWCASE_LOOP_DURATION};
use crate::clock::ClockSettings;
use crate::loading::LoadingSettings;
use crate::orbit::OrbitSettings;
use crate::scene::CanonicalPose;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Config load/save errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for this config
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Config could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// File was written by a newer version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// `value` if it is finite and at least `min`, otherwise `default` with a warning
pub(crate) fn checked(field: &str, value: f32, min: f32, default: f32) -> f32 {
    if value.is_finite() && value >= min {
        value
    } else {
        tracing::warn!("Config: {field} = {value} is out of range, using {default}");
        default
    }
}

/// Like [`checked`], but for values that must be strictly positive
pub(crate) fn checked_positive(field: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!("Config: {field} = {value} must be positive, using {default}");
        default
    }
}

/// Cinematic sequence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CinematicSettings {
    /// Seconds after the intro starts before cinematic mode begins on its own.
    /// `None` never starts it automatically.
    pub auto_start_delay: Option<f32>,
    /// Loop length; `None` uses the end of the last phase
    pub loop_duration: Option<f32>,
    /// Phase schedule
    pub phases: Timeline,
}

impl Default for CinematicSettings {
    fn default() -> Self {
        Self {
            auto_start_delay: Some(3.5),
            loop_duration: Some(SHOWCASE_LOOP_DURATION),
            phases: showcase_timeline(),
        }
    }
}

impl CinematicSettings {
    /// Replace unusable delays and loop lengths
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if let Some(delay) = self.auto_start_delay {
            let fallback = defaults.auto_start_delay.unwrap_or(0.0);
            self.auto_start_delay = Some(checked("cinematic.auto_start_delay", delay, 0.0, fallback));
        }
        if let Some(duration) = self.loop_duration {
            if !(duration.is_finite() && duration > 0.0) {
                tracing::warn!("Config: cinematic.loop_duration = {duration} must be positive, using the timeline end");
                self.loop_duration = None;
            }
        }
        self
    }
}

/// Everything tunable about the showcase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Format version
    pub version: u32,
    /// Frame clock
    pub clock: ClockSettings,
    /// Cinematic sequence
    pub cinematic: CinematicSettings,
    /// Pose restored on entering interactive mode
    pub pose: CanonicalPose,
    /// Orbit camera
    pub orbit: OrbitSettings,
    /// Loading screen
    pub loading: LoadingSettings,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            clock: ClockSettings::default(),
            cinematic: CinematicSettings::default(),
            pose: CanonicalPose::default(),
            orbit: OrbitSettings::default(),
            loading: LoadingSettings::default(),
        }
    }
}

impl ShowcaseConfig {
    /// Parse config from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: ShowcaseConfig = ron::from_str(content)?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }

        Ok(config.sanitized())
    }

    /// Replace out-of-range values with their defaults, logging each one
    pub fn sanitized(self) -> Self {
        Self {
            version: self.version,
            clock: self.clock.sanitized(),
            cinematic: self.cinematic.sanitized(),
            pose: self.pose,
            orbit: self.orbit.sanitized(),
            loading: self.loading.sanitized(),
        }
    }

    /// Serialize config to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::{CLOSEUP, INTRO};

    #[test]
    fn test_default_config() {
        let config = ShowcaseConfig::default();
        assert_eq!(config.version, CONFIG_FORMAT_VERSION);
        assert_eq!(config.cinematic.auto_start_delay, Some(3.5));
        assert_eq!(config.cinematic.phases.len(), 5);
        assert!(config.cinematic.phases.validate().is_empty());
    }

    #[test]
    fn test_serialization() {
        let config = ShowcaseConfig::default();
        let ron_str = config.to_ron().unwrap();
        let loaded = ShowcaseConfig::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let loaded = ShowcaseConfig::from_ron("(cinematic: (auto_start_delay: None))").unwrap();
        assert_eq!(loaded.cinematic.auto_start_delay, None);
        assert_eq!(loaded.cinematic.phases.phase(INTRO).map(|p| p.duration), Some(4.0));
        assert_eq!(loaded.orbit, OrbitSettings::default());
    }

    #[test]
    fn test_custom_phases() {
        let loaded = ShowcaseConfig::from_ron(
            r#"(cinematic: (phases: [
                (name: "intro", start_offset: 0.0, duration: 2.0),
                (name: "closeup", start_offset: 2.0, duration: 1.0),
            ]))"#,
        )
        .unwrap();
        assert_eq!(loaded.cinematic.phases.len(), 2);
        assert_eq!(loaded.cinematic.phases.phase(CLOSEUP).map(|p| p.start_offset), Some(2.0));
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = ShowcaseConfig::from_ron("(version: 99)");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 99, supported: CONFIG_FORMAT_VERSION })
        ));
    }

    #[test]
    fn test_invalid_ron() {
        assert!(matches!(
            ShowcaseConfig::from_ron("(version: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("solitaire-config-{}.ron", std::process::id()));
        let mut config = ShowcaseConfig::default();
        config.loading.enabled = false;

        config.save(&path).unwrap();
        let loaded = ShowcaseConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_bad_clock_values_fall_back() {
        let loaded = ShowcaseConfig::from_ron("(clock: (fixed_step: Some(-0.016), max_step: -1.0))").unwrap();
        assert_eq!(loaded.clock, ClockSettings::default());
    }

    #[test]
    fn test_bad_loading_values_fall_back() {
        let defaults = LoadingSettings::default();
        let loaded = ShowcaseConfig::from_ron(
            "(loading: (interval: 0.0, max_step: -3.0, reveal_delay: -0.5, seed: 7))",
        )
        .unwrap();
        assert_eq!(loaded.loading.interval, defaults.interval);
        assert_eq!(loaded.loading.max_step, defaults.max_step);
        assert_eq!(loaded.loading.reveal_delay, defaults.reveal_delay);
        assert_eq!(loaded.loading.seed, 7);
    }

    #[test]
    fn test_nan_loading_values_fall_back() {
        let mut config = ShowcaseConfig::default();
        config.loading.reveal_delay = f32::NAN;
        config.loading.interval = f32::INFINITY;
        let sanitized = config.sanitized();
        assert_eq!(sanitized.loading, LoadingSettings::default());
    }

    #[test]
    fn test_bad_orbit_values_fall_back() {
        let loaded = ShowcaseConfig::from_ron(
            "(orbit: (rotate_speed: 0.02, zoom_speed: -0.1, min_distance: 0.0, max_distance: 1.0))",
        )
        .unwrap();
        let defaults = OrbitSettings::default();
        assert_eq!(loaded.orbit.rotate_speed, 0.02);
        assert_eq!(loaded.orbit.zoom_speed, defaults.zoom_speed);
        assert_eq!(loaded.orbit.min_distance, defaults.min_distance);
        assert_eq!(loaded.orbit.max_distance, defaults.max_distance);
    }

    #[test]
    fn test_bad_cinematic_values_fall_back() {
        let loaded = ShowcaseConfig::from_ron(
            "(cinematic: (auto_start_delay: Some(-2.0), loop_duration: Some(0.0)))",
        )
        .unwrap();
        assert_eq!(loaded.cinematic.auto_start_delay, Some(3.5));
        assert_eq!(loaded.cinematic.loop_duration, None);
    }

    #[test]
    fn test_missing_file() {
        let result = ShowcaseConfig::load(Path::new("/nonexistent/solitaire.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
