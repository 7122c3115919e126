//! Tool selection and click-to-place defaults.

use crate::elements::{Circle, Element, Line, Rectangle, Text};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Text,
    Rectangle,
    Circle,
    Line,
    Image,
    Pen,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Select,
        ToolKind::Text,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Line,
        ToolKind::Image,
        ToolKind::Pen,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Text => "Text",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Line => "Line",
            ToolKind::Image => "Image",
            ToolKind::Pen => "Pen",
        }
    }

    /// Whether a click on empty canvas drops a new element with this tool.
    pub fn places_on_click(&self) -> bool {
        matches!(self, ToolKind::Text | ToolKind::Rectangle | ToolKind::Circle)
    }
}

/// Element dropped by a click on empty canvas with `tool`, anchored at the
/// scene point. Tools without click-to-place return `None`.
pub fn create_default(tool: ToolKind, point: Point) -> Option<Element> {
    match tool {
        ToolKind::Rectangle => Some(Element::Rectangle(Rectangle::new(
            point,
            Rectangle::DEFAULT_SIZE,
            Rectangle::DEFAULT_SIZE,
        ))),
        ToolKind::Circle => Some(Element::Circle(Circle::new(point, Circle::DEFAULT_RADIUS))),
        ToolKind::Text => Some(Element::Text(Text::new(point, Text::PLACEHOLDER.to_string()))),
        ToolKind::Select | ToolKind::Line | ToolKind::Image | ToolKind::Pen => None,
    }
}

/// Zero-length line started by a pointer-down with the line tool.
pub fn start_line(point: Point) -> Line {
    Line::new(point, point)
}
