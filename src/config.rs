//! Configuration file support for pagesnip.
//!
//! Settings are loaded from `~/.config/pagesnip/config.toml`. If no config
//! file exists, sensible defaults are used automatically; invalid values
//! are clamped with a warning rather than rejected.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::capture::RenderOptions;
use crate::overlay::OverlayOptions;
use crate::util;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [overlay]
/// hint_text = "Drag to capture"
/// label_offset = 40.0
///
/// [capture]
/// fallback_scale = 2.0
/// jpeg_quality = 92
/// boundary_color = "yellow"
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Selection overlay presentation
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Capture pipeline settings
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Selection overlay presentation settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Instructional hint shown before the gesture starts
    #[serde(default = "default_hint_text")]
    pub hint_text: String,

    /// Offset between cursor and hint in CSS pixels (valid range: 0 - 100)
    #[serde(default = "default_hint_margin")]
    pub hint_margin: f64,

    /// Distance the dimension readout sits above the selection
    /// (valid range: 0 - 100)
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            hint_text: default_hint_text(),
            hint_margin: default_hint_margin(),
            label_offset: default_label_offset(),
        }
    }
}

impl OverlayConfig {
    /// Converts to the overlay's runtime options.
    pub fn options(&self) -> OverlayOptions {
        OverlayOptions {
            hint_text: self.hint_text.clone(),
            hint_margin: self.hint_margin,
            label_offset: self.label_offset,
        }
    }
}

/// Capture pipeline settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Rasterization scale when the host reports no device pixel ratio
    /// (valid range: 1.0 - 4.0)
    #[serde(default = "default_fallback_scale")]
    pub fallback_scale: f64,

    /// JPEG quality for both artifacts (valid range: 1 - 100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Boundary annotation stroke width in raster pixels
    /// (valid range: 1 - 16)
    #[serde(default = "default_boundary_thickness")]
    pub boundary_thickness: u32,

    /// Boundary annotation color - a named color (red, green, blue,
    /// yellow, orange, pink, white, black)
    #[serde(default = "default_boundary_color")]
    pub boundary_color: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            fallback_scale: default_fallback_scale(),
            jpeg_quality: default_jpeg_quality(),
            boundary_thickness: default_boundary_thickness(),
            boundary_color: default_boundary_color(),
        }
    }
}

impl CaptureConfig {
    /// Converts to the pipeline's rendering options.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            jpeg_quality: self.jpeg_quality,
            boundary_thickness: self.boundary_thickness,
            boundary_color: util::name_to_rgba(&self.boundary_color).unwrap_or(util::RED),
        }
    }
}

fn default_hint_text() -> String {
    "Click or drag to select area for screenshot".to_string()
}

fn default_hint_margin() -> f64 {
    15.0
}

fn default_label_offset() -> f64 {
    35.0
}

fn default_fallback_scale() -> f64 {
    2.0
}

fn default_jpeg_quality() -> u8 {
    100
}

fn default_boundary_thickness() -> u32 {
    4
}

fn default_boundary_color() -> String {
    "red".to_string()
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    fn validate_and_clamp(&mut self) {
        if !(0.0..=100.0).contains(&self.overlay.hint_margin) {
            log::warn!(
                "Invalid hint_margin {:.1}, clamping to 0.0-100.0 range",
                self.overlay.hint_margin
            );
            self.overlay.hint_margin = self.overlay.hint_margin.clamp(0.0, 100.0);
        }

        if !(0.0..=100.0).contains(&self.overlay.label_offset) {
            log::warn!(
                "Invalid label_offset {:.1}, clamping to 0.0-100.0 range",
                self.overlay.label_offset
            );
            self.overlay.label_offset = self.overlay.label_offset.clamp(0.0, 100.0);
        }

        if !(1.0..=4.0).contains(&self.capture.fallback_scale) {
            log::warn!(
                "Invalid fallback_scale {:.1}, clamping to 1.0-4.0 range",
                self.capture.fallback_scale
            );
            self.capture.fallback_scale = self.capture.fallback_scale.clamp(1.0, 4.0);
        }

        if !(1..=100).contains(&self.capture.jpeg_quality) {
            log::warn!(
                "Invalid jpeg_quality {}, clamping to 1-100 range",
                self.capture.jpeg_quality
            );
            self.capture.jpeg_quality = self.capture.jpeg_quality.clamp(1, 100);
        }

        if !(1..=16).contains(&self.capture.boundary_thickness) {
            log::warn!(
                "Invalid boundary_thickness {}, clamping to 1-16 range",
                self.capture.boundary_thickness
            );
            self.capture.boundary_thickness = self.capture.boundary_thickness.clamp(1, 16);
        }

        if util::name_to_rgba(&self.capture.boundary_color).is_none() {
            log::warn!(
                "Invalid boundary_color '{}', falling back to 'red'",
                self.capture.boundary_color
            );
            self.capture.boundary_color = default_boundary_color();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    /// (e.g. HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("pagesnip");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = Config::default();
        assert_eq!(
            config.overlay.hint_text,
            "Click or drag to select area for screenshot"
        );
        assert_eq!(config.overlay.hint_margin, 15.0);
        assert_eq!(config.overlay.label_offset, 35.0);
        assert_eq!(config.capture.fallback_scale, 2.0);
        assert_eq!(config.capture.jpeg_quality, 100);
        assert_eq!(config.capture.boundary_thickness, 4);
        assert_eq!(config.capture.boundary_color, "red");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [capture]
            jpeg_quality = 85
            "#,
        )
        .unwrap();
        assert_eq!(config.capture.jpeg_quality, 85);
        assert_eq!(config.capture.fallback_scale, 2.0);
        assert_eq!(config.overlay.label_offset, 35.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config: Config = toml::from_str(
            r#"
            [overlay]
            hint_margin = 500.0

            [capture]
            fallback_scale = 9.0
            jpeg_quality = 0
            boundary_thickness = 64
            boundary_color = "mauve"
            "#,
        )
        .unwrap();
        config.validate_and_clamp();

        assert_eq!(config.overlay.hint_margin, 100.0);
        assert_eq!(config.capture.fallback_scale, 4.0);
        assert_eq!(config.capture.jpeg_quality, 1);
        assert_eq!(config.capture.boundary_thickness, 16);
        assert_eq!(config.capture.boundary_color, "red");
    }

    #[test]
    fn render_options_resolve_the_named_color() {
        let mut config = Config::default();
        config.capture.boundary_color = "yellow".to_string();
        assert_eq!(config.capture.render_options().boundary_color, util::YELLOW);
    }
}
