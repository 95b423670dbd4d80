//! Tunable thresholds and weights
//!
//! The defaults are empirical constants carried over from the production
//! collector. They are kept as named values so deployments can override them
//! from a JSON file without touching the engines.

use serde::{Deserialize, Serialize};

/// Window (ms) in which repeated clicks count towards a rage-click
pub const RAGE_CLICK_WINDOW_MS: i64 = 1000;

/// Clicks inside the window needed to report a rage-click
pub const RAGE_CLICK_MIN_CLICKS: usize = 3;

/// Number of typing intervals per averaging window
pub const TYPING_WINDOW: usize = 3;

/// Slowdown factor that counts as a typing-speed drop-off
pub const TYPING_DROPOFF_FACTOR: f64 = 1.7;

/// Divisor applied to mean hesitation (ms) in the friction score
pub const HESITATION_DIVISOR_MS: f64 = 1000.0;

/// Friction score weight per backspace
pub const BACKSPACE_WEIGHT: f64 = 0.5;

/// Friction score weight per rage-click
pub const RAGE_CLICK_WEIGHT: f64 = 2.0;

/// Friction score above which a field is problematic
pub const PROBLEMATIC_SCORE: f64 = 3.0;

/// Mean hesitation (ms) flagged as high
pub const HIGH_HESITATION_MS: f64 = 3000.0;

/// Backspace total flagged as many
pub const MANY_BACKSPACES: f64 = 5.0;

/// Mean hesitation (ms) that triggers a clarity recommendation
pub const CLARITY_HESITATION_MS: f64 = 5000.0;

/// Correction rate that triggers a validation recommendation
pub const VALIDATION_CORRECTION_RATE: f64 = 0.3;

/// Capture-side thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureConfig {
    pub rage_click_window_ms: i64,
    pub rage_click_min_clicks: usize,
    pub typing_window: usize,
    pub typing_dropoff_factor: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            rage_click_window_ms: RAGE_CLICK_WINDOW_MS,
            rage_click_min_clicks: RAGE_CLICK_MIN_CLICKS,
            typing_window: TYPING_WINDOW,
            typing_dropoff_factor: TYPING_DROPOFF_FACTOR,
        }
    }
}

/// Analysis-side weights and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub hesitation_divisor_ms: f64,
    pub backspace_weight: f64,
    pub rage_click_weight: f64,
    pub problematic_score: f64,
    pub high_hesitation_ms: f64,
    pub many_backspaces: f64,
    pub clarity_hesitation_ms: f64,
    pub validation_correction_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hesitation_divisor_ms: HESITATION_DIVISOR_MS,
            backspace_weight: BACKSPACE_WEIGHT,
            rage_click_weight: RAGE_CLICK_WEIGHT,
            problematic_score: PROBLEMATIC_SCORE,
            high_hesitation_ms: HIGH_HESITATION_MS,
            many_backspaces: MANY_BACKSPACES,
            clarity_hesitation_ms: CLARITY_HESITATION_MS,
            validation_correction_rate: VALIDATION_CORRECTION_RATE,
        }
    }
}

/// Combined configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormFixConfig {
    pub capture: CaptureConfig,
    pub analysis: AnalysisConfig,
}

impl FormFixConfig {
    /// Load configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config =
            FormFixConfig::from_json(r#"{ "analysis": { "problematicScore": 4.5 } }"#).unwrap();

        assert_eq!(config.analysis.problematic_score, 4.5);
        assert_eq!(config.analysis.backspace_weight, BACKSPACE_WEIGHT);
        assert_eq!(config.capture, CaptureConfig::default());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = FormFixConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains("rageClickWindowMs"));
        assert_eq!(FormFixConfig::from_json(&json).unwrap(), config);
    }
}
