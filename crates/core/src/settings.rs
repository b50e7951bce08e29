//! Tunable settings: storage keys, the gate secret, animation timing and
//! export geometry.
//!
//! Every field has a default, so a settings file only needs the values it
//! overrides.

use serde::{Deserialize, Serialize};

/// Storage key holding the serialized presentation.
pub const DEFAULT_CONFIG_KEY: &str = "showcase-gallery-presentation-config";

/// Session storage key holding the authentication flag.
pub const DEFAULT_SESSION_KEY: &str = "showcase-gallery-auth";

/// Shared secret of the presentation gate.
pub const DEFAULT_SECRET: &str = "TachyonMotors";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub config_key: String,
    pub session_key: String,
    pub secret: String,
    pub timing: NavigationTiming,
    pub export: ExportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_key: DEFAULT_CONFIG_KEY.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            secret: DEFAULT_SECRET.to_string(),
            timing: NavigationTiming::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Settings {
    /// Create settings with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Use a different storage key for the presentation.
    pub fn with_config_key(mut self, key: impl Into<String>) -> Self {
        self.config_key = key.into();
        self
    }

    /// Use a different gate secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Replace the animation timing.
    pub fn with_timing(mut self, timing: NavigationTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Replace the export settings.
    pub fn with_export(mut self, export: ExportSettings) -> Self {
        self.export = export;
        self
    }
}

/// Durations driving the viewer's staged reveals, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationTiming {
    /// How long a module page stays in its loading state.
    pub module_loading_ms: u64,
    /// Delay between the intro title completing and the module grid showing.
    pub module_grid_delay_ms: u64,
    /// Interval between typed characters.
    pub typewriter_speed_ms: u64,
    /// Delay before the first character is typed.
    pub typewriter_delay_ms: u64,
}

impl Default for NavigationTiming {
    fn default() -> Self {
        Self {
            module_loading_ms: 600,
            module_grid_delay_ms: 1000,
            typewriter_speed_ms: 80,
            typewriter_delay_ms: 500,
        }
    }
}

/// Geometry of exported pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// Layout canvas width in CSS pixels.
    pub canvas_width: u32,
    /// Layout canvas height in CSS pixels.
    pub canvas_height: u32,
    /// Device pixel ratio used when rasterizing.
    pub scale: u32,
    /// Height of the feature image area on the canvas.
    pub image_area_height: u32,
    /// Page width in millimetres (landscape A4 by default).
    pub page_width_mm: f64,
    /// Page height in millimetres.
    pub page_height_mm: f64,
    /// Margin on every side, in millimetres.
    pub margin_mm: f64,
    /// Whether the statement slide is exported after the intro.
    pub include_statement: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            canvas_width: 1056,
            canvas_height: 816,
            scale: 2,
            image_area_height: 529,
            page_width_mm: 297.0,
            page_height_mm: 210.0,
            margin_mm: 10.0,
            include_statement: false,
        }
    }
}

impl ExportSettings {
    /// Include or skip the statement slide.
    pub fn with_statement(mut self, include: bool) -> Self {
        self.include_statement = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "secret": "s3cret", "timing": { "moduleLoadingMs": 250 } }"#)
                .unwrap();

        assert_eq!(settings.secret, "s3cret");
        assert_eq!(settings.timing.module_loading_ms, 250);
        assert_eq!(settings.timing.typewriter_speed_ms, 80);
        assert_eq!(settings.config_key, DEFAULT_CONFIG_KEY);
        assert_eq!(settings.export.canvas_width, 1056);
    }

    #[test]
    fn test_builders() {
        let settings = Settings::new()
            .with_config_key("other")
            .with_export(ExportSettings::default().with_statement(true));

        assert_eq!(settings.config_key, "other");
        assert!(settings.export.include_statement);
    }
}
