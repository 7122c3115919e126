//! Rectangle element.

use super::{ElementId, ElementStyle, ElementTrait, box_hit_test};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Fresh id when absent, as in template files.
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    /// Top-left corner position.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation angle in degrees (around the top-left corner).
    #[serde(default)]
    pub rotation: f64,
    pub style: ElementStyle,
    #[serde(default)]
    pub locked: bool,
}

impl Rectangle {
    pub const DEFAULT_SIZE: f64 = 100.0;

    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            style: ElementStyle::shape_default(),
            locked: false,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let rect = Rect::from_points(p1, p2);
        Self::new(rect.origin(), rect.width(), rect.height())
    }

    /// Get as a kurbo Rect in scene coordinates (unrotated).
    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }
}

impl ElementTrait for Rectangle {
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
        self.as_rect()
    }

    fn self_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        box_hit_test(self.position, self.rotation, self.width, self.height, point, tolerance)
    }

    fn to_path(&self) -> BezPath {
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
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!(rect.style.fill.is_some());
    }

    #[test]
    fn test_from_corners() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(0.0, 0.0));
        assert!((rect.position.x - 0.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0));
        assert!(rect.hit_test(Point::new(102.0, 50.0), 5.0));
    }

    #[test]
    fn test_self_rect_is_local() {
        let rect = Rectangle::new(Point::new(40.0, 40.0), 30.0, 20.0);
        assert_eq!(rect.self_rect(), Rect::new(0.0, 0.0, 30.0, 20.0));
    }
}
