use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::LatLng;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid map config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("zoom range is empty: min {min} > max {max}")]
    ZoomRange { min: f64, max: f64 },
}

/// Framing used when the viewport is fitted to a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FitOptions {
    /// Pixels kept clear on every side of the framed points.
    pub padding: f64,
    pub max_zoom: f64,
    pub duration_ms: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: 50.0,
            max_zoom: 12.0,
            duration_ms: 800.0,
        }
    }
}

/// Options handed to the platform location query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileSourceConfig {
    /// XYZ template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileSourceConfig {
    fn default() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Dwell time before a hovered marker opens its preview.
    pub hover_delay_ms: u64,
    pub fit: FitOptions,
    pub geolocation: PositionOptions,
    pub locate_zoom: f64,
    pub locate_duration_ms: f64,
    pub tiles: TileSourceConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Egypt
            initial_center: LatLng::new(26.8206, 30.8025),
            initial_zoom: 6.0,
            min_zoom: 2.0,
            max_zoom: 19.0,
            hover_delay_ms: 300,
            fit: FitOptions::default(),
            geolocation: PositionOptions::default(),
            locate_zoom: 14.0,
            locate_duration_ms: 1000.0,
            tiles: TileSourceConfig::default(),
        }
    }
}

impl MapConfig {
    /// Parse a JSON override document. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        if config.min_zoom > config.max_zoom {
            return Err(ConfigError::ZoomRange {
                min: config.min_zoom,
                max: config.max_zoom,
            });
        }
        Ok(config)
    }

    /// `(min_zoom, max_zoom)` in ascending order. An inverted pair is
    /// swapped; a non-finite bound falls back to the default range.
    pub fn zoom_range(&self) -> (f64, f64) {
        let (min, max) = (self.min_zoom, self.max_zoom);
        if !min.is_finite() || !max.is_finite() {
            let fallback = Self::default();
            tracing::warn!(min, max, "non-finite zoom range, using defaults");
            return (fallback.min_zoom, fallback.max_zoom);
        }
        if min > max {
            tracing::warn!(min, max, "inverted zoom range, swapping bounds");
        }
        (min.min(max), max.max(min))
    }
}
