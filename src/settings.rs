//! Startup configuration
//!
//! Read once at boot and never written back. In the browser the JSON lives in
//! the `data-settings` attribute of `<body>`; natively it comes from the
//! `SHELL_GAME_SETTINGS` environment variable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Dice, Level};

/// Accepted range for `animation_scale`
pub const ANIMATION_SCALE_RANGE: std::ops::RangeInclusive<f32> = 0.05..=4.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("animation_scale {0} is outside 0.05..=4.0")]
    AnimationScale(f32),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Multiplier on every animation duration (1.0 = normal speed)
    pub animation_scale: f32,
    /// Level applied at boot
    pub start_level: Level,
    /// Fixed dice seed; `None` uses OS entropy
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animation_scale: 1.0,
            start_level: Level::One,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !ANIMATION_SCALE_RANGE.contains(&self.animation_scale) {
            return Err(SettingsError::AnimationScale(self.animation_scale));
        }
        Ok(())
    }

    /// Dice matching the configured seed
    pub fn dice(&self) -> Dice {
        match self.seed {
            Some(seed) => Dice::seeded(seed),
            None => Dice::system(),
        }
    }

    /// Environment variable read by the native build
    pub const ENV_KEY: &'static str = "SHELL_GAME_SETTINGS";

    /// Body attribute read by the web build
    pub const DATA_ATTRIBUTE: &'static str = "data-settings";

    fn from_source(source: Option<String>) -> Self {
        let Some(json) = source else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings: {:?}", settings);
                settings
            }
            Err(err) => {
                log::warn!("Ignoring settings ({err}), using defaults");
                Self::default()
            }
        }
    }

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let source = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .and_then(|b| b.get_attribute(Self::DATA_ATTRIBUTE));
        Self::from_source(source)
    }

    /// Load settings from the environment (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_source(std::env::var(Self::ENV_KEY).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.animation_scale, 1.0);
        assert_eq!(settings.start_level, Level::One);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"start_level":"Two"}"#).unwrap();
        assert_eq!(settings.start_level, Level::Two);
        assert_eq!(settings.animation_scale, 1.0);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_full_json() {
        let settings =
            Settings::from_json(r#"{"animation_scale":0.5,"start_level":"One","seed":7}"#).unwrap();
        assert_eq!(settings.animation_scale, 0.5);
        assert_eq!(settings.seed, Some(7));
        assert!(!settings.dice().is_strong());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"animation_scale":0.0}"#),
            Err(SettingsError::AnimationScale(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"animation_scale":12.0}"#),
            Err(SettingsError::AnimationScale(_))
        ));
    }

    #[test]
    fn test_bad_source_falls_back() {
        assert_eq!(
            Settings::from_source(Some("[]".to_string())),
            Settings::default()
        );
        assert_eq!(Settings::from_source(None), Settings::default());
    }
}
