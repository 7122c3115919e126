//! Gradient fill specification and its resolution into renderer geometry.

use super::style::SerializableColor;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Minimum number of stops a gradient keeps.
pub const MIN_GRADIENT_STOPS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

/// A color stop. `position` is a percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: SerializableColor,
    pub position: f64,
}

impl GradientStop {
    pub fn new(color: SerializableColor, position: f64) -> Self {
        Self {
            color,
            position: position.clamp(0.0, 100.0),
        }
    }
}

/// Gradient fill as edited by the user.
///
/// Explicit `start`/`end` points and radii are in the element's local frame and
/// override the derived defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub kind: GradientKind,
    /// Angle in degrees, linear gradients only.
    #[serde(default)]
    pub angle: Option<f64>,
    pub stops: Vec<GradientStop>,
    #[serde(default)]
    pub start: Option<Point>,
    #[serde(default)]
    pub end: Option<Point>,
    #[serde(default)]
    pub start_radius: Option<f64>,
    #[serde(default)]
    pub end_radius: Option<f64>,
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            angle: Some(0.0),
            stops: vec![
                GradientStop::new(SerializableColor::black(), 0.0),
                GradientStop::new(SerializableColor::white(), 100.0),
            ],
            start: None,
            end: None,
            start_radius: None,
            end_radius: None,
        }
    }
}

/// Gradient geometry in the element's local frame, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedGradient {
    Linear {
        start: Point,
        end: Point,
        /// `(offset in 0..=1, color)` pairs.
        stops: Vec<(f64, SerializableColor)>,
    },
    Radial {
        start: Point,
        end: Point,
        start_radius: f64,
        end_radius: f64,
        stops: Vec<(f64, SerializableColor)>,
    },
}

impl GradientSpec {
    pub fn linear(angle: f64, stops: Vec<GradientStop>) -> Self {
        let mut spec = Self {
            kind: GradientKind::Linear,
            angle: Some(angle),
            stops,
            ..Self::default()
        };
        spec.sort_stops();
        spec
    }

    pub fn radial(stops: Vec<GradientStop>) -> Self {
        let mut spec = Self {
            kind: GradientKind::Radial,
            angle: None,
            stops,
            ..Self::default()
        };
        spec.sort_stops();
        spec
    }

    fn sort_stops(&mut self) {
        self.stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    }

    /// Add a stop and keep stops ordered by position.
    pub fn add_stop(&mut self, stop: GradientStop) {
        self.stops.push(stop);
        self.sort_stops();
    }

    /// Remove a stop. Refused when it would leave fewer than two stops.
    pub fn remove_stop(&mut self, index: usize) -> bool {
        if self.stops.len() <= MIN_GRADIENT_STOPS || index >= self.stops.len() {
            return false;
        }
        self.stops.remove(index);
        true
    }

    /// Replace a stop's color and/or position, re-sorting afterwards.
    pub fn update_stop(
        &mut self,
        index: usize,
        color: Option<SerializableColor>,
        position: Option<f64>,
    ) -> bool {
        let Some(stop) = self.stops.get_mut(index) else {
            return false;
        };
        if let Some(color) = color {
            stop.color = color;
        }
        if let Some(position) = position {
            stop.position = position.clamp(0.0, 100.0);
        }
        self.sort_stops();
        true
    }

    /// Stops as `(offset, color)` with offsets in `0..=1`.
    pub fn color_stops(&self) -> Vec<(f64, SerializableColor)> {
        self.stops
            .iter()
            .map(|s| (s.position / 100.0, s.color))
            .collect()
    }

    /// Linear start/end points for a box of the given size.
    ///
    /// Only 0, 45, 90, 135 and 180 degrees are mapped; any other angle keeps
    /// the horizontal default (or the explicit points, when set).
    pub fn linear_endpoints(&self, width: f64, height: f64) -> (Point, Point) {
        let mut start = self.start.unwrap_or(Point::ZERO);
        let mut end = self.end.unwrap_or(Point::new(width, 0.0));

        if let Some(angle) = self.angle {
            let is = |a: f64| (angle - a).abs() < f64::EPSILON;
            if is(0.0) {
                start = Point::ZERO;
                end = Point::new(width, 0.0);
            } else if is(45.0) {
                start = Point::ZERO;
                end = Point::new(width, height);
            } else if is(90.0) {
                start = Point::ZERO;
                end = Point::new(0.0, height);
            } else if is(135.0) {
                start = Point::new(width, 0.0);
                end = Point::new(0.0, height);
            } else if is(180.0) {
                start = Point::new(width, 0.0);
                end = Point::ZERO;
            }
        }

        (start, end)
    }

    /// Resolve into renderer geometry for a box of the given size.
    pub fn resolve(&self, width: f64, height: f64) -> ResolvedGradient {
        let stops = self.color_stops();
        match self.kind {
            GradientKind::Linear => {
                let (start, end) = self.linear_endpoints(width, height);
                ResolvedGradient::Linear { start, end, stops }
            }
            GradientKind::Radial => {
                let center = Point::new(width / 2.0, height / 2.0);
                ResolvedGradient::Radial {
                    start: self.start.unwrap_or(center),
                    end: self.end.unwrap_or(center),
                    start_radius: self.start_radius.unwrap_or(0.0),
                    end_radius: self
                        .end_radius
                        .filter(|r| *r > 0.0)
                        .unwrap_or(width.max(height) / 2.0),
                    stops,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<GradientStop> {
        vec![
            GradientStop::new(SerializableColor::white(), 100.0),
            GradientStop::new(SerializableColor::black(), 0.0),
        ]
    }

    #[test]
    fn test_stops_sorted_on_creation() {
        let spec = GradientSpec::linear(0.0, stops());
        assert!((spec.stops[0].position - 0.0).abs() < f64::EPSILON);
        assert!((spec.stops[1].position - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remove_stop_keeps_two() {
        let mut spec = GradientSpec::linear(0.0, stops());
        assert!(!spec.remove_stop(0));
        spec.add_stop(GradientStop::new(SerializableColor::black(), 50.0));
        assert_eq!(spec.stops.len(), 3);
        assert!(spec.remove_stop(1));
        assert_eq!(spec.stops.len(), 2);
    }

    #[test]
    fn test_linear_known_angles() {
        let spec = GradientSpec::linear(45.0, stops());
        assert_eq!(spec.linear_endpoints(100.0, 50.0), (Point::ZERO, Point::new(100.0, 50.0)));

        let spec = GradientSpec::linear(135.0, stops());
        assert_eq!(
            spec.linear_endpoints(100.0, 50.0),
            (Point::new(100.0, 0.0), Point::new(0.0, 50.0))
        );

        let spec = GradientSpec::linear(180.0, stops());
        assert_eq!(spec.linear_endpoints(100.0, 50.0), (Point::new(100.0, 0.0), Point::ZERO));
    }

    #[test]
    fn test_linear_intermediate_angle_falls_back_to_horizontal() {
        let spec = GradientSpec::linear(30.0, stops());
        assert_eq!(spec.linear_endpoints(100.0, 50.0), (Point::ZERO, Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_radial_defaults() {
        let spec = GradientSpec::radial(stops());
        match spec.resolve(100.0, 60.0) {
            ResolvedGradient::Radial { start, end_radius, stops, .. } => {
                assert_eq!(start, Point::new(50.0, 30.0));
                assert!((end_radius - 50.0).abs() < f64::EPSILON);
                assert!((stops[1].0 - 1.0).abs() < f64::EPSILON);
            }
            other => panic!("expected radial, got {:?}", other),
        }
    }
}
