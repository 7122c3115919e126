//! Text element.

use super::{ElementId, ElementStyle, ElementTrait, Fill, SerializableColor, box_hit_test};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Horizontal text alignment inside the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A text element. The box width is user-controlled; height follows the
/// content unless explicitly set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    /// Top-left anchor.
    pub position: Point,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    /// Wrapping width.
    pub width: f64,
    /// Fixed height; `None` means autosized from the content.
    #[serde(default)]
    pub height: Option<f64>,
    /// Rotation angle in degrees (around the anchor).
    #[serde(default)]
    pub rotation: f64,
    pub style: ElementStyle,
    #[serde(default)]
    pub locked: bool,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 18.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    pub const DEFAULT_WIDTH: f64 = 200.0;
    pub const PLACEHOLDER: &'static str = "Double click to edit";

    pub fn new(position: Point, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            text,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            align: TextAlign::Left,
            bold: false,
            italic: false,
            underline: false,
            width: Self::DEFAULT_WIDTH,
            height: None,
            rotation: 0.0,
            style: ElementStyle {
                fill: Some(Fill::Solid(SerializableColor::black())),
                ..ElementStyle::default()
            },
            locked: false,
        }
    }

    /// Number of visual lines, counting explicit line breaks only.
    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }

    /// Box height: the fixed height, or one font-size per line.
    pub fn effective_height(&self) -> f64 {
        self.height.unwrap_or(self.font_size * self.line_count() as f64)
    }
}

impl ElementTrait for Text {
    fn id(&self) -> ElementId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.effective_height()))
    }

    fn self_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.effective_height())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        box_hit_test(
            self.position,
            self.rotation,
            self.width,
            self.effective_height(),
            point,
            tolerance,
        )
    }

    fn to_path(&self) -> BezPath {
        // Glyphs are laid out by the renderer; the outline is the text box.
        self.self_rect().to_path(0.1)
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }

    fn locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let text = Text::new(Point::new(5.0, 5.0), Text::PLACEHOLDER.to_string());
        assert!((text.font_size - 18.0).abs() < f64::EPSILON);
        assert_eq!(text.font_family, "Arial");
        assert_eq!(text.align, TextAlign::Left);
        assert!((text.width - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_autosized_height() {
        let mut text = Text::new(Point::ZERO, "one\ntwo\nthree".to_string());
        text.font_size = 10.0;
        assert!((text.effective_height() - 30.0).abs() < f64::EPSILON);
        text.height = Some(12.0);
        assert!((text.bounds().height() - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_text_still_has_a_line() {
        let text = Text::new(Point::ZERO, String::new());
        assert_eq!(text.line_count(), 1);
    }
}
