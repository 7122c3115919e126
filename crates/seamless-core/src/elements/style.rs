//! Fill, stroke, shadow and opacity attributes shared by every element kind.

use super::gradient::GradientSpec;
use kurbo::Vec2;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa`, or one of
    /// `black`, `white`, `transparent`.
    ///
    /// Returns `None` for `none` and for anything unparsable.
    pub fn from_css(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "black" => return Some(Self::black()),
            "white" => return Some(Self::white()),
            "transparent" => return Some(Self::transparent()),
            _ => {}
        }

        let hex = value.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut channels = hex.chars().map(|c| {
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v * 16 + v
                });
                let r = channels.next()?;
                let g = channels.next()?;
                let b = channels.next()?;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?, 255)),
            8 => Some(Self::new(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Drop shadow settings. Only drawn while `enabled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub enabled: bool,
    pub color: SerializableColor,
    pub blur: f64,
    pub offset: Vec2,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: false,
            color: SerializableColor::black(),
            blur: 5.0,
            offset: Vec2::new(5.0, 5.0),
        }
    }
}

/// How the interior of an element is painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fill {
    Solid(SerializableColor),
    Gradient(GradientSpec),
}

impl Fill {
    pub fn solid(color: SerializableColor) -> Self {
        Fill::Solid(color)
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, Fill::Gradient(_))
    }
}

/// Style properties for elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Fill (None = no fill).
    pub fill: Option<Fill>,
    /// Stroke color (None = no stroke).
    pub stroke_color: Option<SerializableColor>,
    /// Stroke width.
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub shadow: Shadow,
}

fn default_opacity() -> f64 {
    1.0
}

impl ElementStyle {
    /// White fill with a thin black outline, used for new rectangles and circles.
    pub fn shape_default() -> Self {
        Self {
            fill: Some(Fill::Solid(SerializableColor::white())),
            stroke_color: Some(SerializableColor::black()),
            stroke_width: 1.0,
            ..Self::default()
        }
    }

    /// Black stroke, no fill; used for lines and open paths.
    pub fn stroke_only(width: f64) -> Self {
        Self {
            fill: None,
            stroke_color: Some(SerializableColor::black()),
            stroke_width: width,
            ..Self::default()
        }
    }

    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Option<Color> {
        self.stroke_color.map(|c| self.apply_opacity(c))
    }

    /// Get the solid fill color with opacity applied. Gradient fills return `None`.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        match &self.fill {
            Some(Fill::Solid(c)) => Some(self.apply_opacity(*c)),
            _ => None,
        }
    }

    /// Whether the element is hidden through the layers panel (opacity 0).
    pub fn is_hidden(&self) -> bool {
        self.opacity <= 0.0
    }

    fn apply_opacity(&self, color: SerializableColor) -> Color {
        let alpha = (color.a as f64 * self.opacity.clamp(0.0, 1.0)) as u8;
        Color::from_rgba8(color.r, color.g, color.b, alpha)
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke_color: None,
            stroke_width: 0.0,
            opacity: 1.0,
            shadow: Shadow::default(),
        }
    }
}
