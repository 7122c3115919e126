//! Straight polyline element.

use super::{
    node_transform, point_to_polyline_dist, points_bounds, ElementId, ElementStyle, ElementTrait,
};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line element storing its geometry as a flat `[x0, y0, x1, y1, ...]` list.
///
/// `position` is the node offset the renderer draws the points at; it is
/// (0, 0) except between a drag/transform gesture and its commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    #[serde(default)]
    pub position: Point,
    #[serde(deserialize_with = "deserialize_points")]
    points: Vec<f64>,
    /// Rotation in degrees; folded into `points` at transform-end.
    #[serde(default)]
    pub rotation: f64,
    pub style: ElementStyle,
    #[serde(default)]
    pub locked: bool,
}

impl Line {
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

    /// Create a two-point line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: Point::ZERO,
            points: vec![start.x, start.y, end.x, end.y],
            rotation: 0.0,
            style: ElementStyle::stroke_only(Self::DEFAULT_STROKE_WIDTH),
            locked: false,
        }
    }

    /// Create from a flat coordinate list. Returns `None` unless the list holds
    /// an even number of values and at least two points.
    pub fn from_flat(points: Vec<f64>) -> Option<Self> {
        if points.len() < 4 || points.len() % 2 != 0 {
            return None;
        }
        let mut line = Self::new(Point::ZERO, Point::ZERO);
        line.points = points;
        Some(line)
    }

    /// Flat coordinate list.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Replace the coordinate list. Invalid lists are ignored and `false` returned.
    pub fn set_points(&mut self, points: Vec<f64>) -> bool {
        if points.len() < 4 || points.len() % 2 != 0 {
            log::debug!("Ignoring invalid line point list of length {}", points.len());
            return false;
        }
        self.points = points;
        true
    }

    /// Points as pairs, in the element's own frame.
    pub fn point_pairs(&self) -> Vec<Point> {
        self.points
            .chunks_exact(2)
            .map(|c| Point::new(c[0], c[1]))
            .collect()
    }

    /// Move the last point; used while drag-drawing a new line.
    pub fn set_end(&mut self, end: Point) {
        if let [.., x, y] = self.points.as_mut_slice() {
            *x = end.x;
            *y = end.y;
        }
    }

    /// Apply a function to every point pair.
    pub fn map_points(&mut self, f: impl Fn(Point) -> Point) {
        for pair in self.points.chunks_exact_mut(2) {
            let p = f(Point::new(pair[0], pair[1]));
            pair[0] = p.x;
            pair[1] = p.y;
        }
    }

    /// Add `delta` to every point.
    pub fn offset_points(&mut self, delta: Vec2) {
        self.map_points(|p| p + delta);
    }
}

fn deserialize_points<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let points = Vec::<f64>::deserialize(deserializer)?;
    if points.len() < 4 || points.len() % 2 != 0 {
        return Err(serde::de::Error::custom(format!(
            "line needs an even number of coordinates and at least two points, got {}",
            points.len()
        )));
    }
    Ok(points)
}

impl ElementTrait for Line {
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
        let offset = self.position.to_vec2();
        points_bounds(
            self.point_pairs().into_iter().map(|p| p + offset),
            self.position,
        )
    }

    fn self_rect(&self) -> Rect {
        points_bounds(self.point_pairs(), Point::ZERO)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = node_transform(self.position, self.rotation).inverse() * point;
        let reach = tolerance + self.style.stroke_width / 2.0;
        point_to_polyline_dist(local, &self.point_pairs()) <= reach
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let pts = self.point_pairs();
        if let Some((first, rest)) = pts.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
        }
        path
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
    fn test_line_creation() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert_eq!(line.points(), &[0.0, 0.0, 100.0, 100.0]);
        assert_eq!(line.position, Point::ZERO);
    }

    #[test]
    fn test_from_flat_validates() {
        assert!(Line::from_flat(vec![0.0, 0.0, 1.0]).is_none());
        assert!(Line::from_flat(vec![0.0, 0.0]).is_none());
        assert!(Line::from_flat(vec![0.0, 0.0, 1.0, 1.0, 2.0, 0.0]).is_some());
    }

    #[test]
    fn test_set_points_rejects_odd_length() {
        let mut line = Line::new(Point::ZERO, Point::new(1.0, 1.0));
        assert!(!line.set_points(vec![1.0, 2.0, 3.0]));
        assert_eq!(line.points().len(), 4);
    }

    #[test]
    fn test_bounds_over_all_points() {
        let line = Line::from_flat(vec![10.0, 50.0, 30.0, 5.0, 20.0, 40.0]).unwrap();
        assert_eq!(line.bounds(), Rect::new(10.0, 5.0, 30.0, 50.0));
    }

    #[test]
    fn test_bounds_include_node_offset() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        line.position = Point::new(5.0, 5.0);
        assert_eq!(line.bounds(), Rect::new(5.0, 5.0, 15.0, 15.0));
    }

    #[test]
    fn test_hit_test() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 0.0), 1.0));
        assert!(line.hit_test(Point::new(50.0, 2.0), 1.0));
        assert!(!line.hit_test(Point::new(50.0, 10.0), 1.0));
    }

    #[test]
    fn test_set_end() {
        let mut line = Line::new(Point::new(1.0, 1.0), Point::new(1.0, 1.0));
        line.set_end(Point::new(40.0, 30.0));
        assert_eq!(line.point_pairs()[1], Point::new(40.0, 30.0));
    }
}
