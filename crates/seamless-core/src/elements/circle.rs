//! Circle element.

use super::{ElementId, ElementStyle, ElementTrait};
use kurbo::{BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle element, anchored at its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    pub center: Point,
    pub radius: f64,
    /// Rotation angle in degrees (around the center).
    #[serde(default)]
    pub rotation: f64,
    pub style: ElementStyle,
    #[serde(default)]
    pub locked: bool,
}

impl Circle {
    pub const DEFAULT_RADIUS: f64 = 50.0;

    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius,
            rotation: 0.0,
            style: ElementStyle::shape_default(),
            locked: false,
        }
    }
}

impl ElementTrait for Circle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn position(&self) -> Point {
        self.center
    }

    fn set_position(&mut self, position: Point) {
        self.center = position;
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    fn self_rect(&self) -> Rect {
        Rect::new(-self.radius, -self.radius, self.radius, self.radius)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let half_sw = self.style.stroke_width / 2.0;
        let dist = (point - self.center).hypot();
        if dist > self.radius + tolerance + half_sw {
            return false;
        }
        if self.style.fill.is_some() {
            return true;
        }
        // Outline only: reject points well inside the ring.
        dist >= (self.radius - tolerance - half_sw).max(0.0)
    }

    fn to_path(&self) -> BezPath {
        KurboCircle::new(Point::ZERO, self.radius).to_path(0.1)
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
    fn test_hit_test_filled() {
        let circle = Circle::new(Point::new(0.0, 0.0), 10.0);
        assert!(circle.hit_test(Point::new(0.0, 0.0), 0.0));
        assert!(circle.hit_test(Point::new(10.0, 0.0), 0.0));
        assert!(!circle.hit_test(Point::new(15.0, 0.0), 0.0));
    }

    #[test]
    fn test_hit_test_outline_only() {
        let mut circle = Circle::new(Point::new(0.0, 0.0), 20.0);
        circle.style.fill = None;
        assert!(!circle.hit_test(Point::new(0.0, 0.0), 2.0));
        assert!(circle.hit_test(Point::new(20.0, 0.0), 2.0));
    }

    #[test]
    fn test_self_rect_centered() {
        let circle = Circle::new(Point::new(100.0, 100.0), 25.0);
        assert_eq!(circle.self_rect(), Rect::new(-25.0, -25.0, 25.0, 25.0));
    }
}
