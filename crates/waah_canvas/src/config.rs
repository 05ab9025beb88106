//! Canvas defaults, loadable from TOML

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use waah_paint::{Color, LineCap, LineJoin, StrokeStyle};

use crate::{CanvasError, Result};

/// Initial drawing state for new canvases
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CanvasConfig {
    /// Initial pixel color, `#RRGGBB` or `#RRGGBBAA`
    #[serde(default = "default_background")]
    pub background: String,
    /// Curve flattening tolerance in device pixels
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_round")]
    pub line_cap: String,
    #[serde(default = "default_round")]
    pub line_join: String,
    #[serde(default = "default_miter_limit")]
    pub miter_limit: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Family looked up when text is drawn before any font is chosen
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Extra advance after every glyph, in user units
    #[serde(default)]
    pub letter_spacing: f64,
}

fn default_background() -> String {
    "#00000000".to_string()
}

fn default_tolerance() -> f64 {
    0.1
}

fn default_line_width() -> f64 {
    2.0
}

fn default_round() -> String {
    "round".to_string()
}

fn default_miter_limit() -> f64 {
    10.0
}

fn default_font_size() -> f64 {
    10.0
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            tolerance: default_tolerance(),
            line_width: default_line_width(),
            line_cap: default_round(),
            line_join: default_round(),
            miter_limit: default_miter_limit(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            letter_spacing: 0.0,
        }
    }
}

impl CanvasConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CanvasConfig =
            toml::from_str(content).map_err(|e| CanvasError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CanvasError::Config(format!("failed to read {:?}: {}", path, e)))?;
        tracing::debug!("Loaded canvas config from {:?}", path);
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.background_color()?;
        self.stroke_style()?;
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(CanvasError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.font_size >= 0.0) || !self.font_size.is_finite() {
            return Err(CanvasError::Config(format!(
                "font_size must not be negative, got {}",
                self.font_size
            )));
        }
        Ok(())
    }

    pub fn background_color(&self) -> Result<Color> {
        Color::parse_hex(&self.background).ok_or_else(|| {
            CanvasError::Config(format!("invalid background color '{}'", self.background))
        })
    }

    pub fn stroke_style(&self) -> Result<StrokeStyle> {
        let cap: LineCap = self.line_cap.parse().map_err(CanvasError::Config)?;
        let join: LineJoin = self.line_join.parse().map_err(CanvasError::Config)?;
        if !(self.line_width >= 0.0) {
            return Err(CanvasError::Config(format!(
                "line_width must not be negative, got {}",
                self.line_width
            )));
        }
        Ok(StrokeStyle {
            width: self.line_width,
            cap,
            join,
            miter_limit: self.miter_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.background_color().unwrap(), Color::TRANSPARENT);
        assert_eq!(config.stroke_style().unwrap(), StrokeStyle::default());
        assert_eq!(config.font_size, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CanvasConfig::from_toml_str(
            r##"
            background = "#ffffff"
            line_join = "miter"
            font_size = 24.0
            "##,
        )
        .unwrap();
        assert_eq!(config.background_color().unwrap(), Color::WHITE);
        assert_eq!(config.stroke_style().unwrap().join, LineJoin::Miter);
        assert_eq!(config.stroke_style().unwrap().cap, LineCap::Round);
        assert_eq!(config.font_size, 24.0);
        assert_eq!(config.tolerance, 0.1);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(CanvasConfig::from_toml_str("background = \"red\"").is_err());
        assert!(CanvasConfig::from_toml_str("line_cap = \"pointy\"").is_err());
        assert!(CanvasConfig::from_toml_str("tolerance = 0.0").is_err());
        assert!(CanvasConfig::from_toml_str("font_size = \"big\"").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CanvasConfig::load("/nonexistent/waah.toml").unwrap_err();
        assert!(matches!(err, CanvasError::Config(_)));
    }
}
