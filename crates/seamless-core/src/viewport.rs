//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Multiplicative zoom change per wheel tick.
pub const ZOOM_STEP: f64 = 1.05;
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;

/// Viewport manages the view transform for the canvas.
///
/// `scene = (screen - position) / scale`. Viewport changes are not part of
/// the undo history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pan offset in screen pixels.
    pub position: Vec2,
    /// Current zoom scale.
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: 1.0,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene-to-screen transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position) * Affine::scale(self.scale)
    }

    /// Screen-to-scene transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.position)
    }

    pub fn screen_to_scene(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn scene_to_screen(&self, scene_point: Point) -> Point {
        self.transform() * scene_point
    }

    /// Pan by a screen-space delta (not divided by the scale).
    pub fn pan(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Set the scale, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    /// Wheel zoom around a screen point. A positive `delta_y` (scrolling
    /// down) zooms out by one step, anything else zooms in.
    pub fn zoom_at(&mut self, screen_point: Point, delta_y: f64) {
        let factor = if delta_y > 0.0 {
            1.0 / self.zoom_step
        } else {
            self.zoom_step
        };
        self.zoom_at_factor(screen_point, factor);
    }

    /// Multiply the scale by `factor`, keeping the scene point under
    /// `screen_point` fixed on screen.
    pub fn zoom_at_factor(&mut self, screen_point: Point, factor: f64) {
        self.zoom_to(screen_point, self.scale * factor);
    }

    /// Set the scale (clamped) keeping the scene point under `screen_point`
    /// fixed on screen.
    pub fn zoom_to(&mut self, screen_point: Point, scale: f64) {
        let new_scale = scale.clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }
        let scene_point = self.screen_to_scene(screen_point);
        self.scale = new_scale;
        self.position = screen_point.to_vec2() - scene_point.to_vec2() * new_scale;
    }

    /// Reset to identity pan and unit scale.
    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.scale = 1.0;
    }

    /// Fit the viewport to show the given bounding box.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = padded.width / bounds.width();
        let scale_y = padded.height / bounds.height();
        self.set_scale(scale_x.min(scale_y));

        let bounds_center = bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.position = viewport_center.to_vec2() - bounds_center.to_vec2() * self.scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.position, Vec2::ZERO);
        assert!((viewport.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_scene_with_pan_and_scale() {
        let viewport = Viewport {
            position: Vec2::new(50.0, 100.0),
            scale: 2.0,
            ..Viewport::default()
        };
        let scene = viewport.screen_to_scene(Point::new(150.0, 300.0));
        assert!((scene.x - 50.0).abs() < f64::EPSILON);
        assert!((scene.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let viewport = Viewport {
            position: Vec2::new(30.0, -20.0),
            scale: 1.5,
            ..Viewport::default()
        };
        let original = Point::new(123.0, 456.0);
        let back = viewport.scene_to_screen(viewport.screen_to_scene(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_keeps_pointer_fixed() {
        let mut viewport = Viewport::new();
        let pointer = Point::new(100.0, 100.0);
        viewport.zoom_to(pointer, 2.0);
        assert!((viewport.scale - 2.0).abs() < f64::EPSILON);
        let screen = viewport.scene_to_screen(Point::new(100.0, 100.0));
        assert!((screen.x - 100.0).abs() < 1e-10);
        assert!((screen.y - 100.0).abs() < 1e-10);
        assert!((viewport.position.x + 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_wheel_direction() {
        let mut viewport = Viewport::new();
        viewport.zoom_at(Point::ZERO, -120.0);
        assert!((viewport.scale - 1.05).abs() < 1e-12);
        viewport.zoom_at(Point::ZERO, 120.0);
        viewport.zoom_at(Point::ZERO, 120.0);
        assert!((viewport.scale - 1.0 / 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        viewport.zoom_at_factor(Point::ZERO, 0.001);
        assert!((viewport.scale - MIN_SCALE).abs() < f64::EPSILON);
        viewport.zoom_at_factor(Point::ZERO, 1e6);
        assert!((viewport.scale - MAX_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_is_screen_space() {
        let mut viewport = Viewport {
            scale: 4.0,
            ..Viewport::default()
        };
        viewport.pan(Vec2::new(10.0, 20.0));
        assert!((viewport.position.x - 10.0).abs() < f64::EPSILON);
        assert!((viewport.position.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_bounds_centers() {
        let mut viewport = Viewport::new();
        viewport.fit_to_bounds(Rect::new(0.0, 0.0, 100.0, 50.0), Size::new(400.0, 400.0), 0.0);
        assert!((viewport.scale - 4.0).abs() < f64::EPSILON);
        let center = viewport.scene_to_screen(Point::new(50.0, 25.0));
        assert!((center.x - 200.0).abs() < 1e-10);
        assert!((center.y - 200.0).abs() < 1e-10);
    }
}
