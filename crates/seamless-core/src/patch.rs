//! Partial attribute updates for elements, as produced by the property panel.

use crate::elements::{Element, Fill, ImageFilters, SerializableColor, Shadow, TextAlign};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A set of optional attribute changes. Fields that do not apply to the
/// target element's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    pub position: Option<Point>,
    pub rotation: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub align: Option<TextAlign>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    /// `Some(None)` removes the fill.
    pub fill: Option<Option<Fill>>,
    /// `Some(None)` removes the stroke.
    pub stroke_color: Option<Option<SerializableColor>>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    pub shadow: Option<Shadow>,
    pub locked: Option<bool>,
    pub filters: Option<ImageFilters>,
    pub src: Option<String>,
}

/// Sizes below one unit are raised to one; non-finite sizes are ignored.
fn size_value(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.max(1.0))
}

impl ElementPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch. Returns whether anything changed.
    pub fn apply(&self, element: &mut Element) -> bool {
        let before = element.clone();

        if let Some(position) = self.position {
            element.set_position(position);
        }
        if let Some(rotation) = self.rotation {
            element.set_rotation(rotation);
        }
        if let Some(locked) = self.locked {
            element.set_locked(locked);
        }

        let style = element.style_mut();
        if let Some(fill) = &self.fill {
            style.fill = fill.clone();
        }
        if let Some(stroke) = self.stroke_color {
            style.stroke_color = stroke;
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width;
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(shadow) = &self.shadow {
            style.shadow = shadow.clone();
        }

        match element {
            Element::Rectangle(rect) => {
                if let Some(w) = self.width.and_then(size_value) {
                    rect.width = w;
                }
                if let Some(h) = self.height.and_then(size_value) {
                    rect.height = h;
                }
            }
            Element::Image(image) => {
                if let Some(w) = self.width.and_then(size_value) {
                    image.width = w;
                }
                if let Some(h) = self.height.and_then(size_value) {
                    image.height = h;
                }
                if let Some(filters) = self.filters {
                    image.filters = filters.clamped();
                }
                if let Some(src) = &self.src {
                    image.src = src.clone();
                }
            }
            Element::Circle(circle) => {
                if let Some(r) = self.radius.and_then(size_value) {
                    circle.radius = r;
                }
            }
            Element::Text(text) => {
                if let Some(w) = self.width.and_then(size_value) {
                    text.width = w;
                }
                if let Some(h) = self.height.and_then(size_value) {
                    text.height = Some(h);
                }
                if let Some(content) = &self.text {
                    text.text = content.clone();
                }
                if let Some(size) = self.font_size.and_then(size_value) {
                    text.font_size = size;
                }
                if let Some(family) = &self.font_family {
                    text.font_family = family.clone();
                }
                if let Some(align) = self.align {
                    text.align = align;
                }
                if let Some(bold) = self.bold {
                    text.bold = bold;
                }
                if let Some(italic) = self.italic {
                    text.italic = italic;
                }
                if let Some(underline) = self.underline {
                    text.underline = underline;
                }
            }
            Element::Line(_) | Element::Path(_) => {}
        }

        *element != before
    }
}

/// Parse a numeric field value typed by the user.
///
/// Unparsable input keeps `current`; parsed values are clamped to the
/// optional bounds.
pub fn parse_numeric(input: &str, current: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let Some(mut value) = input.trim().parse::<f64>().ok().filter(|v| v.is_finite()) else {
        return current;
    };
    if let Some(min) = min {
        value = value.max(min);
    }
    if let Some(max) = max {
        value = value.min(max);
    }
    value
}

/// Numeric properties editable through text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    X,
    Y,
    Width,
    Height,
    Radius,
    Rotation,
    FontSize,
    StrokeWidth,
    Opacity,
    ShadowBlur,
    ShadowOffsetX,
    ShadowOffsetY,
}

impl NumericField {
    /// Allowed range for the field.
    pub fn range(&self) -> (Option<f64>, Option<f64>) {
        match self {
            NumericField::X | NumericField::Y => (None, None),
            NumericField::Width | NumericField::Height | NumericField::Radius => (Some(1.0), None),
            NumericField::FontSize => (Some(1.0), None),
            NumericField::Rotation => (Some(-360.0), Some(360.0)),
            NumericField::StrokeWidth => (Some(0.0), Some(50.0)),
            NumericField::Opacity => (Some(0.0), Some(1.0)),
            NumericField::ShadowBlur => (Some(0.0), Some(100.0)),
            NumericField::ShadowOffsetX | NumericField::ShadowOffsetY => {
                (Some(-100.0), Some(100.0))
            }
        }
    }

    /// Current value of the field, or `None` when the kind has no such field.
    pub fn current(&self, element: &Element) -> Option<f64> {
        let style = element.style();
        match self {
            NumericField::X => Some(element.position().x),
            NumericField::Y => Some(element.position().y),
            NumericField::Rotation => Some(element.rotation()),
            NumericField::StrokeWidth => Some(style.stroke_width),
            NumericField::Opacity => Some(style.opacity),
            NumericField::ShadowBlur => Some(style.shadow.blur),
            NumericField::ShadowOffsetX => Some(style.shadow.offset.x),
            NumericField::ShadowOffsetY => Some(style.shadow.offset.y),
            NumericField::Width => match element {
                Element::Rectangle(r) => Some(r.width),
                Element::Image(i) => Some(i.width),
                Element::Text(t) => Some(t.width),
                _ => None,
            },
            NumericField::Height => match element {
                Element::Rectangle(r) => Some(r.height),
                Element::Image(i) => Some(i.height),
                Element::Text(t) => Some(t.effective_height()),
                _ => None,
            },
            NumericField::Radius => match element {
                Element::Circle(c) => Some(c.radius),
                _ => None,
            },
            NumericField::FontSize => element.as_text().map(|t| t.font_size),
        }
    }

    /// Build the patch that sets this field on `element` from raw input.
    /// Returns `None` when the kind has no such field.
    pub fn patch_from_input(&self, element: &Element, input: &str) -> Option<ElementPatch> {
        let current = self.current(element)?;
        let (min, max) = self.range();
        let value = parse_numeric(input, current, min, max);
        let position = element.position();
        let shadow = &element.style().shadow;

        let mut patch = ElementPatch::default();
        match self {
            NumericField::X => patch.position = Some(Point::new(value, position.y)),
            NumericField::Y => patch.position = Some(Point::new(position.x, value)),
            NumericField::Width => patch.width = Some(value),
            NumericField::Height => patch.height = Some(value),
            NumericField::Radius => patch.radius = Some(value),
            NumericField::Rotation => patch.rotation = Some(value),
            NumericField::FontSize => patch.font_size = Some(value),
            NumericField::StrokeWidth => patch.stroke_width = Some(value),
            NumericField::Opacity => patch.opacity = Some(value),
            NumericField::ShadowBlur => {
                patch.shadow = Some(Shadow {
                    blur: value,
                    ..shadow.clone()
                });
            }
            NumericField::ShadowOffsetX => {
                patch.shadow = Some(Shadow {
                    offset: Vec2::new(value, shadow.offset.y),
                    ..shadow.clone()
                });
            }
            NumericField::ShadowOffsetY => {
                patch.shadow = Some(Shadow {
                    offset: Vec2::new(shadow.offset.x, value),
                    ..shadow.clone()
                });
            }
        }
        Some(patch)
    }
}
