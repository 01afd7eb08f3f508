use std::time::Duration;

use log::{debug, warn, Level};
use serde::Deserialize;
use web_sys::Document;

use crate::error::{EffectsError, Result};
use crate::reveal::RevealPolicy;

/// Id of the optional `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "effects-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tuning knobs for every page effect. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub reveal_selectors: Vec<String>,
    pub staggered_classes: Vec<String>,
    pub reveal_threshold: f64,
    pub reveal_bottom_margin_px: u32,
    pub stagger_step_ms: u64,

    pub nav_scroll_offset: f64,
    pub section_activation_offset: f64,
    pub nav_solid_after: f64,
    pub nav_background_solid: String,
    pub nav_background_translucent: String,
    pub parallax_factor: f64,

    pub read_more_label: String,
    pub read_less_label: String,
    pub toggle_scroll_delay_ms: u32,

    pub submit_sending_ms: u32,
    pub submit_reset_ms: u32,

    pub particle_count: usize,

    pub typing_start_delay_ms: u32,
    pub typing_char_delay_ms: u32,
    pub typing_cursor_hold_ms: u32,

    pub progress_stagger_ms: u32,
    pub tilt_divisor: f64,

    pub konami_sequence: Vec<String>,
    pub easter_egg_ms: u32,

    pub slow_load_warning_ms: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            reveal_selectors: vec![
                ".chapter-card".to_string(),
                ".resource-card".to_string(),
                ".section-intro".to_string(),
                ".section-contact".to_string(),
            ],
            staggered_classes: vec!["chapter-card".to_string(), "resource-card".to_string()],
            reveal_threshold: 0.1,
            reveal_bottom_margin_px: 50,
            stagger_step_ms: 100,

            nav_scroll_offset: 80.0,
            section_activation_offset: 100.0,
            nav_solid_after: 100.0,
            nav_background_solid: "rgba(255, 255, 255, 0.95)".to_string(),
            nav_background_translucent: "rgba(255, 255, 255, 0.9)".to_string(),
            parallax_factor: 0.5,

            read_more_label: "Ler Mais".to_string(),
            read_less_label: "Ler Menos".to_string(),
            toggle_scroll_delay_ms: 300,

            submit_sending_ms: 2000,
            submit_reset_ms: 3000,

            particle_count: 50,

            typing_start_delay_ms: 1000,
            typing_char_delay_ms: 50,
            typing_cursor_hold_ms: 1000,

            progress_stagger_ms: 200,
            tilt_divisor: 10.0,

            konami_sequence: [
                "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight",
                "ArrowLeft", "ArrowRight", "b", "a",
            ]
            .iter()
            .map(|key| key.to_string())
            .collect(),
            easter_egg_ms: 3000,

            slow_load_warning_ms: 3000.0,
        }
    }
}

impl EffectsConfig {
    pub fn parse(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the browser APIs would throw on.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(EffectsError::InvalidConfig(format!(
                "reveal_threshold {} is outside [0, 1]",
                self.reveal_threshold
            )));
        }
        if self.reveal_selectors.is_empty() {
            return Err(EffectsError::InvalidConfig("reveal_selectors is empty".to_string()));
        }
        if self.reveal_selectors.iter().any(|selector| selector.trim().is_empty()) {
            return Err(EffectsError::InvalidConfig(
                "reveal_selectors contains a blank selector".to_string(),
            ));
        }
        if self.tilt_divisor == 0.0 || !self.tilt_divisor.is_finite() {
            return Err(EffectsError::InvalidConfig(format!(
                "tilt_divisor {} must be finite and non-zero",
                self.tilt_divisor
            )));
        }
        Ok(())
    }

    /// Reads overrides from the page, falling back to defaults when absent, malformed or out of range.
    pub fn load(document: &Document) -> Self {
        let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
            debug!("No #{} element, using default effects config", CONFIG_ELEMENT_ID);
            return Self::default();
        };
        let json = element.text_content().unwrap_or_default();
        match Self::parse(&json) {
            Ok(config) => {
                debug!("Loaded effects config overrides");
                config
            }
            Err(e) => {
                warn!("Ignoring effects config: {}", e);
                Self::default()
            }
        }
    }

    pub fn reveal_selector(&self) -> String {
        self.reveal_selectors.join(", ")
    }

    pub fn reveal_policy(&self) -> RevealPolicy {
        RevealPolicy {
            threshold: self.reveal_threshold,
            bottom_margin_px: self.reveal_bottom_margin_px,
            stagger_step: Duration::from_millis(self.stagger_step_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_tuning() {
        let config = EffectsConfig::default();
        assert_eq!(config.reveal_threshold, 0.1);
        assert_eq!(config.reveal_bottom_margin_px, 50);
        assert_eq!(config.stagger_step_ms, 100);
        assert_eq!(config.konami_sequence.len(), 10);
        assert_eq!(
            config.reveal_selector(),
            ".chapter-card, .resource-card, .section-intro, .section-contact"
        );
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = EffectsConfig::parse(r#"{ "reveal_threshold": 0.25, "particle_count": 10 }"#)
            .unwrap();
        assert_eq!(config.reveal_threshold, 0.25);
        assert_eq!(config.particle_count, 10);
        assert_eq!(config.reveal_bottom_margin_px, 50);
        assert_eq!(config.read_more_label, "Ler Mais");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EffectsConfig::parse("{ not json").is_err());
        assert!(EffectsConfig::parse(r#"{ "particle_count": "many" }"#).is_err());
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(EffectsConfig::default().validate().is_ok());
    }

    #[test]
    fn threshold_outside_unit_range_is_rejected() {
        let err = EffectsConfig::parse(r#"{ "reveal_threshold": 2.0 }"#).unwrap_err();
        assert!(matches!(err, EffectsError::InvalidConfig(_)));
        assert!(EffectsConfig::parse(r#"{ "reveal_threshold": -0.1 }"#).is_err());
        assert!(EffectsConfig::parse(r#"{ "reveal_threshold": 1.0 }"#).is_ok());
        assert!(EffectsConfig::parse(r#"{ "reveal_threshold": 0.0 }"#).is_ok());
    }

    #[test]
    fn empty_or_blank_selectors_are_rejected() {
        assert!(EffectsConfig::parse(r#"{ "reveal_selectors": [] }"#).is_err());
        assert!(EffectsConfig::parse(r#"{ "reveal_selectors": [".card", "  "] }"#).is_err());
        assert!(EffectsConfig::parse(r#"{ "reveal_selectors": [".card"] }"#).is_ok());
    }

    #[test]
    fn zero_tilt_divisor_is_rejected() {
        assert!(EffectsConfig::parse(r#"{ "tilt_divisor": 0.0 }"#).is_err());
        assert!(EffectsConfig::parse(r#"{ "tilt_divisor": -4.0 }"#).is_ok());
    }

    #[test]
    fn several_bad_values_still_fail_as_one() {
        let parsed = EffectsConfig::parse(r#"{ "reveal_threshold": 2.0, "reveal_selectors": [] }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn policy_uses_configured_margin() {
        let mut config = EffectsConfig::default();
        config.reveal_bottom_margin_px = 120;
        config.stagger_step_ms = 250;
        let policy = config.reveal_policy();
        assert_eq!(policy.root_margin(), "0px 0px -120px 0px");
        assert_eq!(policy.stagger_step, Duration::from_millis(250));
    }
}
