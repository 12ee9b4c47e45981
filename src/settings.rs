//! Game settings
//!
//! Read-only overrides come from LocalStorage on the web. The game never
//! writes them back and keeps no save state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How display frames map to simulation ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// One tick per display frame; motion speed follows the refresh rate
    #[default]
    PerFrame,
    /// Ticks at `fixed_step_hz` regardless of the refresh rate
    FixedStep,
}

impl Integrator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Integrator::PerFrame => "per_frame",
            Integrator::FixedStep => "fixed_step",
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; the browser uses the current time when absent
    pub seed: Option<u64>,

    // === Loop ===
    pub integrator: Integrator,
    /// Tick rate for `Integrator::FixedStep`
    pub fixed_step_hz: f64,
    /// Tick cap per display frame for `Integrator::FixedStep`
    pub max_substeps: u32,

    // === Input ===
    /// Force the touch layout on or off instead of detecting it
    pub touch_mode: Option<bool>,
    /// Ship speed while following a finger
    pub touch_follow_speed: f32,
    /// Finger distance under which the ship keeps its velocity
    pub touch_deadzone: f32,

    // === Scene ===
    pub star_count_min: u32,
    pub star_count_max: u32,

    // === Timing ===
    /// Delay between confirming the last message and the final screen
    pub finale_delay_ms: f64,
    /// Opacity fade of a collected target
    pub collect_fade_ms: f64,

    /// `log` level name
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            integrator: Integrator::PerFrame,
            fixed_step_hz: 60.0,
            max_substeps: 8,

            touch_mode: None,
            touch_follow_speed: 3.5,
            touch_deadzone: 5.0,

            star_count_min: 80,
            star_count_max: 150,

            finale_delay_ms: crate::consts::FINALE_DELAY_MS,
            collect_fade_ms: crate::consts::COLLECT_FADE_MS,

            log_level: "info".to_owned(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "galaxia_settings";

    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.fixed_step_hz > 0.0) {
            return Err(SettingsError::Invalid {
                field: "fixed_step_hz",
                reason: format!("must be positive, got {}", self.fixed_step_hz),
            });
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::Invalid {
                field: "max_substeps",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.star_count_min > self.star_count_max {
            return Err(SettingsError::Invalid {
                field: "star_count_min",
                reason: format!(
                    "{} exceeds star_count_max {}",
                    self.star_count_min, self.star_count_max
                ),
            });
        }
        if self.finale_delay_ms < 0.0 {
            return Err(SettingsError::Invalid {
                field: "finale_delay_ms",
                reason: format!("cannot be negative, got {}", self.finale_delay_ms),
            });
        }
        if self.collect_fade_ms < 0.0 {
            return Err(SettingsError::Invalid {
                field: "collect_fade_ms",
                reason: format!("cannot be negative, got {}", self.collect_fade_ms),
            });
        }
        Ok(())
    }

    /// Fixed tick length in milliseconds
    pub fn fixed_step_ms(&self) -> f64 {
        1000.0 / self.fixed_step_hz
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring {}: {e}", Self::STORAGE_KEY),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native: defaults, or the JSON file named by `GALAXIA_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("GALAXIA_SETTINGS") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring {path}: {e}");
                Self::default()
            }),
            Err(e) => {
                log::warn!("Cannot read {path}: {e} ({} not applied)", Self::STORAGE_KEY);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{"seed": 7, "integrator": "fixed_step"}"#).expect("valid");
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.integrator, Integrator::FixedStep);
        assert_eq!(settings.star_count_min, 80);
        assert_eq!(settings.touch_follow_speed, 3.5);
        assert_eq!(settings.finale_delay_ms, 500.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = Settings::from_json("{seed:").expect_err("malformed");
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_validation() {
        let err = Settings::from_json(r#"{"star_count_min": 200, "star_count_max": 100}"#)
            .expect_err("min > max");
        assert!(matches!(err, SettingsError::Invalid { field: "star_count_min", .. }));

        let err = Settings::from_json(r#"{"max_substeps": 0}"#).expect_err("no substeps");
        assert!(err.to_string().contains("max_substeps"));
    }

    #[test]
    fn test_negative_delays_name_their_field() {
        let err = Settings::from_json(r#"{"collect_fade_ms": -1}"#).expect_err("negative fade");
        assert!(matches!(err, SettingsError::Invalid { field: "collect_fade_ms", .. }));

        let err = Settings::from_json(r#"{"finale_delay_ms": -1}"#).expect_err("negative delay");
        assert!(matches!(err, SettingsError::Invalid { field: "finale_delay_ms", .. }));
    }

    #[test]
    fn test_integrator_names_match_json() {
        for integrator in [Integrator::PerFrame, Integrator::FixedStep] {
            let json = serde_json::to_string(&integrator).expect("serializes");
            assert_eq!(json, format!("\"{}\"", integrator.as_str()));
        }
    }

    #[test]
    fn test_log_level_fallback() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_level(), log::Level::Info);
        settings.log_level = "debug".to_owned();
        assert_eq!(settings.log_level(), log::Level::Debug);
        settings.log_level = "loud".to_owned();
        assert_eq!(settings.log_level(), log::Level::Info);
    }
}
