//! Normalization of drag and resize/rotate gestures into element attributes.
//!
//! The renderer applies live scale and rotation to a node while the user
//! manipulates it. When the gesture ends, the node's final transform is
//! folded back into the element so its stored scale is always 1.

use crate::elements::{Element, MIN_ELEMENT_SIZE};
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

/// Node state reported by the renderer at the end of a transform gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeTransform {
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Degrees.
    pub rotation: f64,
}

impl NodeTransform {
    /// The transform a node has before any manipulation.
    pub fn of(element: &Element) -> Self {
        Self {
            position: element.position(),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: element.rotation(),
        }
    }

    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Node matrix: translate, then rotate, then scale.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }
}

fn floored(value: f64) -> f64 {
    value.max(MIN_ELEMENT_SIZE)
}

/// Fold a finished transform gesture into the element.
///
/// Box kinds take the new position and rotation and scale their size, never
/// below [`MIN_ELEMENT_SIZE`]. Text scales its width, and its height only
/// when the height is fixed. Circles scale their radius by `scale_x` only.
/// Lines and paths bake the whole node matrix into their points and reset
/// position and rotation to zero.
pub fn finalize_transform(element: &Element, transform: &NodeTransform) -> Element {
    let mut result = element.clone();
    match &mut result {
        Element::Rectangle(rect) => {
            rect.width = floored(rect.width * transform.scale_x);
            rect.height = floored(rect.height * transform.scale_y);
            rect.position = transform.position;
            rect.rotation = transform.rotation;
        }
        Element::Image(image) => {
            image.width = floored(image.width * transform.scale_x);
            image.height = floored(image.height * transform.scale_y);
            image.position = transform.position;
            image.rotation = transform.rotation;
        }
        Element::Text(text) => {
            text.width = floored(text.width * transform.scale_x);
            // Autosized text keeps no height; a fixed height scales like a box.
            text.height = text.height.map(|h| floored(h * transform.scale_y));
            text.position = transform.position;
            text.rotation = transform.rotation;
        }
        Element::Circle(circle) => {
            circle.radius = floored(circle.radius * transform.scale_x);
            circle.center = transform.position;
            circle.rotation = transform.rotation;
        }
        Element::Line(line) => {
            let affine = transform.affine();
            line.map_points(|p| affine * p);
            line.position = Point::ZERO;
            line.rotation = 0.0;
        }
        Element::Path(path) => {
            let affine = transform.affine();
            path.map_points(|p| affine * p);
            path.position = Point::ZERO;
            path.rotation = 0.0;
        }
    }
    result
}

/// Fold a finished drag into the element.
///
/// Box kinds and circles take `end_position` as their anchor. Lines and
/// paths shift their points by the drag distance and keep a zero offset.
pub fn finalize_drag(element: &Element, end_position: Point) -> Element {
    let mut result = element.clone();
    match &mut result {
        Element::Line(line) => {
            line.offset_points(end_position - line.position);
            line.position = Point::ZERO;
        }
        Element::Path(path) => {
            path.offset_points(end_position - path.position);
            path.position = Point::ZERO;
        }
        other => other.set_position(end_position),
    }
    result
}

/// Resize guard for the renderer's bounding-box callback: a proposed box
/// narrower or shorter than [`MIN_ELEMENT_SIZE`] is refused and the old box
/// kept.
pub fn bound_box(old: Rect, proposed: Rect) -> Rect {
    if proposed.width() < MIN_ELEMENT_SIZE || proposed.height() < MIN_ELEMENT_SIZE {
        old
    } else {
        proposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Circle, Line, PathElement, PathNode, Rectangle, Text};

    #[test]
    fn test_rectangle_scale_and_floor() {
        let rect = Element::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 50.0));
        let t = NodeTransform::of(&rect).with_scale(2.0, 0.01);
        let Element::Rectangle(r) = finalize_transform(&rect, &t) else { unreachable!() };
        assert!((r.width - 200.0).abs() < f64::EPSILON);
        assert!((r.height - MIN_ELEMENT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_floor_for_every_box_kind() {
        let t = NodeTransform {
            position: Point::ZERO,
            scale_x: 0.001,
            scale_y: 0.001,
            rotation: 0.0,
        };
        let circle = Element::Circle(Circle::new(Point::ZERO, 50.0));
        let text = Element::Text(Text::new(Point::ZERO, "x".to_string()));
        let Element::Circle(c) = finalize_transform(&circle, &t) else { unreachable!() };
        let Element::Text(tx) = finalize_transform(&text, &t) else { unreachable!() };
        assert!((c.radius - 5.0).abs() < f64::EPSILON);
        assert!((tx.width - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_floor_at_zero_and_negative_scale() {
        let rect = Element::Rectangle(Rectangle::new(Point::ZERO, 100.0, 50.0));
        let circle = Element::Circle(Circle::new(Point::ZERO, 50.0));
        for scale in [0.0, -1.0] {
            let t = NodeTransform::of(&rect).with_scale(scale, scale);
            let Element::Rectangle(r) = finalize_transform(&rect, &t) else { unreachable!() };
            assert!((r.width - MIN_ELEMENT_SIZE).abs() < f64::EPSILON);
            assert!((r.height - MIN_ELEMENT_SIZE).abs() < f64::EPSILON);

            let t = NodeTransform::of(&circle).with_scale(scale, 1.0);
            let Element::Circle(c) = finalize_transform(&circle, &t) else { unreachable!() };
            assert!((c.radius - MIN_ELEMENT_SIZE).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_text_fixed_height_is_scaled_and_floored() {
        let mut text = Text::new(Point::ZERO, "x".to_string());
        text.height = Some(40.0);
        let text = Element::Text(text);

        let t = NodeTransform::of(&text).with_scale(1.0, 0.5);
        let Element::Text(tx) = finalize_transform(&text, &t) else { unreachable!() };
        assert_eq!(tx.height, Some(20.0));

        let t = NodeTransform::of(&text).with_scale(1.0, 0.0);
        let Element::Text(tx) = finalize_transform(&text, &t) else { unreachable!() };
        assert_eq!(tx.height, Some(MIN_ELEMENT_SIZE));

        let autosized = Element::Text(Text::new(Point::ZERO, "x".to_string()));
        let t = NodeTransform::of(&autosized).with_scale(1.0, 0.0);
        let Element::Text(tx) = finalize_transform(&autosized, &t) else { unreachable!() };
        assert_eq!(tx.height, None);
    }

    #[test]
    fn test_circle_uses_scale_x_only() {
        let circle = Element::Circle(Circle::new(Point::new(50.0, 50.0), 20.0));
        let t = NodeTransform::of(&circle).with_scale(1.5, 3.0);
        let Element::Circle(c) = finalize_transform(&circle, &t) else { unreachable!() };
        assert!((c.radius - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_line_bakes_transform() {
        let line = Element::Line(Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
        let t = NodeTransform {
            position: Point::new(5.0, 5.0),
            scale_x: 2.0,
            scale_y: 1.0,
            rotation: 90.0,
        };
        let Element::Line(l) = finalize_transform(&line, &t) else { unreachable!() };
        assert_eq!(l.position, Point::ZERO);
        assert!(l.rotation.abs() < f64::EPSILON);
        let pts = l.point_pairs();
        assert!((pts[0] - Point::new(5.0, 5.0)).hypot() < 1e-9);
        assert!((pts[1] - Point::new(5.0, 25.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_path_bakes_controls() {
        let node = PathNode {
            anchor: Point::new(1.0, 1.0),
            control_in: None,
            control_out: Some(Point::new(2.0, 1.0)),
        };
        let path = Element::Path(PathElement::new(vec![node], false).unwrap());
        let t = NodeTransform::of(&path).with_scale(10.0, 10.0);
        let Element::Path(p) = finalize_transform(&path, &t) else { unreachable!() };
        assert_eq!(p.nodes()[0].anchor, Point::new(10.0, 10.0));
        assert_eq!(p.nodes()[0].control_out, Some(Point::new(20.0, 10.0)));
    }

    #[test]
    fn test_drag_line_shifts_points() {
        let line = Element::Line(Line::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
        let Element::Line(l) = finalize_drag(&line, Point::new(3.0, 4.0)) else { unreachable!() };
        assert_eq!(l.position, Point::ZERO);
        assert_eq!(l.points(), &[3.0, 4.0, 13.0, 14.0]);
    }

    #[test]
    fn test_drag_rectangle_moves_anchor() {
        let rect = Element::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        let moved = finalize_drag(&rect, Point::new(50.0, 50.0));
        assert_eq!(moved.position(), Point::new(50.0, 50.0));
        assert_eq!(moved.id(), rect.id());
    }

    #[test]
    fn test_bound_box_rejects_small() {
        let old = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert_eq!(bound_box(old, Rect::new(0.0, 0.0, 4.0, 50.0)), old);
        assert_eq!(bound_box(old, Rect::new(0.0, 0.0, 50.0, 4.9)), old);
        let ok = Rect::new(0.0, 0.0, 5.0, 5.0);
        assert_eq!(bound_box(old, ok), ok);
    }
}
