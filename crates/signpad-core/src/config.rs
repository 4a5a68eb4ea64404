//! Pad configuration and fixed stroke styling.

use crate::error::{SignatureError, SignatureResult};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default ink color.
pub const DEFAULT_STROKE_COLOR: &str = "#000000";
/// Default ink width in CSS pixels.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
/// Default surface fill.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// What happens to existing ink when the surface is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Reallocate blank; ink is lost and `has_ink` resets.
    #[default]
    Discard,
    /// Keep the point history and redraw it onto the new surface.
    Replay,
}

/// Serializable pad configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// Ink color as `#rrggbb`.
    pub stroke_color: String,
    /// Ink width in CSS pixels.
    pub stroke_width: f64,
    /// Surface fill as `#rrggbb`.
    pub background_color: String,
    pub resize_policy: ResizePolicy,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            resize_policy: ResizePolicy::default(),
        }
    }
}

impl PadConfig {
    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> SignatureResult<Self> {
        serde_json::from_str(json).map_err(|e| SignatureError::Config(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> SignatureResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SignatureError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Resolve the stroke styling constants.
    pub fn style(&self) -> SignatureResult<SurfaceStyle> {
        let stroke_color = parse_color(&self.stroke_color).ok_or_else(|| {
            SignatureError::Config(format!("Invalid stroke color: {}", self.stroke_color))
        })?;
        let background = parse_color(&self.background_color).ok_or_else(|| {
            SignatureError::Config(format!(
                "Invalid background color: {}",
                self.background_color
            ))
        })?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(SignatureError::Config(format!(
                "Stroke width must be positive, got {}",
                self.stroke_width
            )));
        }
        Ok(SurfaceStyle {
            stroke_color,
            stroke_width: self.stroke_width,
            background,
        })
    }
}

/// Fixed drawing constants applied every time the surface is configured.
///
/// Caps and joins are always round; only color, width and fill vary.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceStyle {
    pub stroke_color: Color,
    /// Width in CSS pixels.
    pub stroke_width: f64,
    pub background: Color,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::from_rgba8(0, 0, 0, 255),
            stroke_width: DEFAULT_STROKE_WIDTH,
            background: Color::from_rgba8(255, 255, 255, 255),
        }
    }
}

impl SurfaceStyle {
    /// Ink color as straight RGBA bytes.
    pub fn stroke_rgba8(&self) -> [u8; 4] {
        to_rgba8(self.stroke_color)
    }

    /// Background color as straight RGBA bytes.
    pub fn background_rgba8(&self) -> [u8; 4] {
        to_rgba8(self.background)
    }
}

fn to_rgba8(color: Color) -> [u8; 4] {
    let rgba = color.to_rgba8();
    [rgba.r, rgba.g, rgba.b, rgba.a]
}

/// Parse a CSS color string like "#ff0000".
pub fn parse_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::from_rgba8(r, g, b, 255))
}
