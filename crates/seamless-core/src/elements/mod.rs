//! Element definitions for the design canvas.

mod circle;
mod gradient;
mod image;
mod line;
mod path;
mod rectangle;
mod style;
mod text;

pub use circle::Circle;
pub use gradient::{GradientKind, GradientSpec, GradientStop, ResolvedGradient, MIN_GRADIENT_STOPS};
pub use image::{Image, ImageError, ImageFilters, ImageFormat};
pub use line::Line;
pub use path::{PathElement, PathNode};
pub use rectangle::Rectangle;
pub use style::{ElementStyle, Fill, SerializableColor, Shadow};
pub use text::{Text, TextAlign};

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Smallest width, height or radius an element may have after a transform.
pub const MIN_ELEMENT_SIZE: f64 = 5.0;

/// Common trait for all element kinds.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// Anchor position: top-left for box kinds, center for circles,
    /// node offset for lines and paths.
    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    /// Rotation in degrees around the anchor.
    fn rotation(&self) -> f64;

    fn set_rotation(&mut self, rotation: f64);

    /// Axis-aligned bounding box in scene coordinates (rotation ignored).
    fn bounds(&self) -> Rect;

    /// Bounding box in the element's own frame, for the selection overlay.
    fn self_rect(&self) -> Rect;

    /// Check if a point (in scene coordinates) hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Outline in the element's own frame. Combine with
    /// [`Element::node_transform`] for scene coordinates.
    fn to_path(&self) -> BezPath;

    fn style(&self) -> &ElementStyle;

    fn style_mut(&mut self) -> &mut ElementStyle;

    fn locked(&self) -> bool;

    fn set_locked(&mut self, locked: bool);

    /// Move the anchor by `delta`.
    fn translate(&mut self, delta: Vec2) {
        let position = self.position();
        self.set_position(position + delta);
    }
}

/// The closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Circle,
    Text,
    Image,
    Line,
    Path,
}

impl ElementKind {
    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::Rectangle => "Rectangle",
            ElementKind::Circle => "Circle",
            ElementKind::Text => "Text",
            ElementKind::Image => "Image",
            ElementKind::Line => "Line",
            ElementKind::Path => "Path",
        }
    }
}

/// A scene element. Serialized with a `type` tag, e.g. `{"type": "circle", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Rectangle(Rectangle),
    Circle(Circle),
    Text(Text),
    Image(Image),
    Line(Line),
    Path(PathElement),
}

impl Element {
    fn inner(&self) -> &dyn ElementTrait {
        match self {
            Element::Rectangle(e) => e,
            Element::Circle(e) => e,
            Element::Text(e) => e,
            Element::Image(e) => e,
            Element::Line(e) => e,
            Element::Path(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ElementTrait {
        match self {
            Element::Rectangle(e) => e,
            Element::Circle(e) => e,
            Element::Text(e) => e,
            Element::Image(e) => e,
            Element::Line(e) => e,
            Element::Path(e) => e,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Rectangle(_) => ElementKind::Rectangle,
            Element::Circle(_) => ElementKind::Circle,
            Element::Text(_) => ElementKind::Text,
            Element::Image(_) => ElementKind::Image,
            Element::Line(_) => ElementKind::Line,
            Element::Path(_) => ElementKind::Path,
        }
    }

    pub fn id(&self) -> ElementId {
        self.inner().id()
    }

    pub fn position(&self) -> Point {
        self.inner().position()
    }

    pub fn set_position(&mut self, position: Point) {
        self.inner_mut().set_position(position);
    }

    pub fn rotation(&self) -> f64 {
        self.inner().rotation()
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.inner_mut().set_rotation(rotation);
    }

    pub fn bounds(&self) -> Rect {
        self.inner().bounds()
    }

    pub fn self_rect(&self) -> Rect {
        self.inner().self_rect()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.inner().hit_test(point, tolerance)
    }

    pub fn to_path(&self) -> BezPath {
        self.inner().to_path()
    }

    pub fn style(&self) -> &ElementStyle {
        self.inner().style()
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        self.inner_mut().style_mut()
    }

    pub fn is_locked(&self) -> bool {
        self.inner().locked()
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.inner_mut().set_locked(locked);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.inner_mut().translate(delta);
    }

    /// Transform from the element's own frame into scene coordinates:
    /// translate to the anchor, then rotate around it.
    pub fn node_transform(&self) -> Affine {
        node_transform(self.position(), self.rotation())
    }

    /// Regenerate the element's ID with a new unique identifier.
    /// Used when duplicating, pasting or instantiating templates.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Element::Rectangle(e) => e.id = new_id,
            Element::Circle(e) => e.id = new_id,
            Element::Text(e) => e.id = new_id,
            Element::Image(e) => e.id = new_id,
            Element::Line(e) => e.id = new_id,
            Element::Path(e) => e.id = new_id,
        }
    }

    /// Name shown in the layers list: the first 20 characters of a text
    /// element, otherwise the kind followed by its 1-based stacking index.
    pub fn display_name(&self, index: usize) -> String {
        if let Element::Text(text) = self {
            if !text.text.is_empty() {
                let head: String = text.text.chars().take(20).collect();
                return if text.text.chars().count() > 20 {
                    format!("{head}...")
                } else {
                    head
                };
            }
        }
        format!("{} {}", self.kind().label(), index + 1)
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Element::Image(i) => Some(i),
            _ => None,
        }
    }
}

pub(crate) fn node_transform(position: Point, rotation_degrees: f64) -> Affine {
    Affine::translate(position.to_vec2()) * Affine::rotate(rotation_degrees.to_radians())
}

/// Hit test for box-like kinds (rectangle, text, image) honouring rotation.
pub(crate) fn box_hit_test(
    position: Point,
    rotation: f64,
    width: f64,
    height: f64,
    point: Point,
    tolerance: f64,
) -> bool {
    let local = node_transform(position, rotation).inverse() * point;
    Rect::new(0.0, 0.0, width, height)
        .inflate(tolerance, tolerance)
        .contains(local)
}

/// Min/max box over a set of points, or a zero-size box at `fallback` when
/// there are none.
pub(crate) fn points_bounds(points: impl IntoIterator<Item = Point>, fallback: Point) -> Rect {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Rect::from_origin_size(fallback, (0.0, 0.0));
    };
    iter.fold(Rect::from_points(first, first), |acc, p| acc.union_pt(p))
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    if let [only] = points {
        return (point - *only).hypot();
    }
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_bounds() {
        let rect = Element::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 50.0));
        let b = rect.bounds();
        assert!((b.x0 - 10.0).abs() < f64::EPSILON);
        assert!((b.y0 - 10.0).abs() < f64::EPSILON);
        assert!((b.x1 - 110.0).abs() < f64::EPSILON);
        assert!((b.y1 - 60.0).abs() < f64::EPSILON);
        assert!((b.width() - 100.0).abs() < f64::EPSILON);
        assert!((b.height() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_bounds() {
        let circle = Element::Circle(Circle::new(Point::new(50.0, 50.0), 20.0));
        let b = circle.bounds();
        assert_eq!(b, Rect::new(30.0, 30.0, 70.0, 70.0));
    }

    #[test]
    fn test_points_bounds_degenerate() {
        let b = points_bounds(std::iter::once(Point::new(3.0, 4.0)), Point::ZERO);
        assert_eq!(b, Rect::new(3.0, 4.0, 3.0, 4.0));
        let b = points_bounds(std::iter::empty(), Point::new(7.0, 8.0));
        assert_eq!(b, Rect::new(7.0, 8.0, 7.0, 8.0));
    }

    #[test]
    fn test_serialized_type_tag() {
        let circle = Element::Circle(Circle::new(Point::new(1.0, 2.0), 3.0));
        let json = serde_json::to_value(&circle).unwrap();
        assert_eq!(json["type"], "circle");
        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, circle);
    }

    #[test]
    fn test_regenerate_id() {
        let mut rect = Element::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        let before = rect.id();
        rect.regenerate_id();
        assert_ne!(before, rect.id());
    }

    #[test]
    fn test_display_name() {
        let rect = Element::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        assert_eq!(rect.display_name(2), "Rectangle 3");
        let text = Element::Text(Text::new(Point::ZERO, "A fairly long headline text".to_string()));
        assert_eq!(text.display_name(0), "A fairly long headli...");
    }

    #[test]
    fn test_rotated_box_hit_test() {
        // 100x10 bar rotated 90 degrees around its top-left now extends downwards.
        assert!(box_hit_test(Point::ZERO, 90.0, 100.0, 10.0, Point::new(-5.0, 50.0), 0.0));
        assert!(!box_hit_test(Point::ZERO, 90.0, 100.0, 10.0, Point::new(50.0, 5.0), 0.0));
    }
}
