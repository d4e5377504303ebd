//! Behavior configuration.
//!
//! Every field has a default matching the registration and user-list
//! templates, so an empty JSON object (or no file at all) is a valid
//! configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PageResult;

/// Element ids and class names the behaviors look for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub registration_form_id: String,
    pub toggle_view_id: String,
    pub form_control_class: String,
    pub users_table_class: String,
    pub users_cards_class: String,
    pub user_row_class: String,
    pub alert_class: String,
    pub button_class: String,
    pub ripple_class: String,
    pub search_container_class: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            registration_form_id: "registrationForm".to_string(),
            toggle_view_id: "toggleView".to_string(),
            form_control_class: "form-control".to_string(),
            users_table_class: "users-table".to_string(),
            users_cards_class: "users-cards".to_string(),
            user_row_class: "user-row".to_string(),
            alert_class: "alert".to_string(),
            button_class: "btn".to_string(),
            ripple_class: "ripple".to_string(),
            search_container_class: "search-container".to_string(),
        }
    }
}

/// Button labels and placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub submitting: String,
    pub switch_to_cards: String,
    pub switch_to_table: String,
    pub search_placeholder: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            submitting: "Registering...".to_string(),
            switch_to_cards: "Switch to Card View".to_string(),
            switch_to_table: "Switch to Table View".to_string(),
            search_placeholder: "Search users...".to_string(),
        }
    }
}

/// Colours and animation parameters. Durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub filled_border_color: String,
    pub empty_border_color: String,
    pub hover_scale: f64,
    pub hover_transition_ms: u64,
    pub dismiss_after_ms: u64,
    pub fade_ms: u64,
    pub ripple_ms: u64,
    pub search_max_width: String,
    pub search_margin_bottom: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            filled_border_color: "#28a745".to_string(),
            empty_border_color: "#ddd".to_string(),
            hover_scale: 1.01,
            hover_transition_ms: 300,
            dismiss_after_ms: 5000,
            fade_ms: 500,
            ripple_ms: 600,
            search_max_width: "400px".to_string(),
            search_margin_bottom: "1rem".to_string(),
        }
    }
}

impl Appearance {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn ripple_lifetime(&self) -> Duration {
        Duration::from_millis(self.ripple_ms)
    }
}

/// Complete configuration for a [`crate::Page`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub selectors: Selectors,
    pub labels: Labels,
    pub appearance: Appearance,
}

impl BehaviorConfig {
    /// Load a JSON configuration file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> PageResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(json: &str) -> PageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Format seconds the way CSS transitions are written (`0.3s`, `1s`).
pub(crate) fn css_seconds(ms: u64) -> String {
    format!("{}s", css_number(ms as f64 / 1000.0))
}

/// Format a length in `px` without a trailing `.0`.
pub(crate) fn css_px(value: f64) -> String {
    format!("{}px", css_number(value))
}

fn css_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_is_default() {
        let config = BehaviorConfig::from_json("{}").unwrap();
        assert_eq!(config, BehaviorConfig::default());
        assert_eq!(config.appearance.dismiss_after(), Duration::from_millis(5000));
        assert_eq!(config.labels.submitting, "Registering...");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = BehaviorConfig::from_json(
            r#"{"appearance": {"ripple_ms": 900}, "selectors": {"toggle_view_id": "swap"}}"#,
        )
        .unwrap();
        assert_eq!(config.appearance.ripple_ms, 900);
        assert_eq!(config.appearance.fade_ms, 500);
        assert_eq!(config.selectors.toggle_view_id, "swap");
        assert_eq!(config.selectors.alert_class, "alert");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"labels": {{"submitting": "Saving..."}}}}"#).unwrap();
        let config = BehaviorConfig::load(file.path()).unwrap();
        assert_eq!(config.labels.submitting, "Saving...");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = BehaviorConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, crate::PageError::Io(_)));
    }

    #[test]
    fn css_formatting() {
        assert_eq!(css_seconds(300), "0.3s");
        assert_eq!(css_seconds(500), "0.5s");
        assert_eq!(css_seconds(2000), "2s");
        assert_eq!(css_px(120.0), "120px");
        assert_eq!(css_px(-12.5), "-12.5px");
    }
}
