//! Grid snapping and alignment guides against other elements.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Grid cell size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 10.0;

/// Distance under which an edge or center counts as aligned with another.
pub const SNAP_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Snap dragged positions to the grid.
    pub enabled: bool,
    pub grid_size: f64,
    /// Report guides against other elements.
    pub snap_to_elements: bool,
    pub show_grid: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            grid_size: GRID_SIZE,
            snap_to_elements: true,
            show_grid: true,
        }
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    pub snapped_x: bool,
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Round a single coordinate to the nearest grid line.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    SnapResult {
        point: Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size)),
        snapped_x: true,
        snapped_y: true,
    }
}

/// Snap a point according to the settings.
pub fn snap_point(point: Point, settings: &SnapSettings) -> SnapResult {
    if settings.enabled {
        snap_to_grid(point, settings.grid_size)
    } else {
        SnapResult::none(point)
    }
}

/// Guide positions to draw while moving an element: `vertical` holds x
/// coordinates, `horizontal` holds y coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapLines {
    pub vertical: Vec<f64>,
    pub horizontal: Vec<f64>,
}

impl SnapLines {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

fn push_unique(values: &mut Vec<f64>, value: f64) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Collect guides where an edge or the center of `current` lies within
/// `threshold` of an edge or center of another box.
///
/// Edges match edges of either side; centers match centers only.
pub fn snap_lines(
    current: Rect,
    others: impl IntoIterator<Item = Rect>,
    threshold: f64,
) -> SnapLines {
    let mut lines = SnapLines::default();
    let near = |a: f64, b: f64| (a - b).abs() < threshold;
    let cur_center = current.center();

    for other in others {
        let center = other.center();

        for edge in [current.x0, current.x1] {
            for target in [other.x0, other.x1] {
                if near(edge, target) {
                    push_unique(&mut lines.vertical, target);
                }
            }
        }
        if near(cur_center.x, center.x) {
            push_unique(&mut lines.vertical, center.x);
        }

        for edge in [current.y0, current.y1] {
            for target in [other.y0, other.y1] {
                if near(edge, target) {
                    push_unique(&mut lines.horizontal, target);
                }
            }
        }
        if near(cur_center.y, center.y) {
            push_unique(&mut lines.horizontal, center.y);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(14.0, 26.0), GRID_SIZE);
        assert!((result.point.x - 10.0).abs() < f64::EPSILON);
        assert!((result.point.y - 30.0).abs() < f64::EPSILON);
        assert!(result.is_snapped());
    }

    #[test]
    fn test_disabled_settings_do_not_snap() {
        let settings = SnapSettings {
            enabled: false,
            ..SnapSettings::default()
        };
        let result = snap_point(Point::new(14.0, 26.0), &settings);
        assert_eq!(result.point, Point::new(14.0, 26.0));
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snap_lines_edges_and_centers() {
        let current = Rect::new(102.0, 0.0, 152.0, 50.0);
        let other = Rect::new(0.0, 200.0, 100.0, 300.0);
        let lines = snap_lines(current, [other], SNAP_THRESHOLD);
        assert_eq!(lines.vertical, vec![100.0]);
        assert!(lines.horizontal.is_empty());
    }

    #[test]
    fn test_snap_lines_deduplicated() {
        let current = Rect::new(0.0, 0.0, 10.0, 10.0);
        let others = [Rect::new(0.0, 50.0, 10.0, 60.0), Rect::new(0.0, 80.0, 10.0, 90.0)];
        let lines = snap_lines(current, others, SNAP_THRESHOLD);
        assert_eq!(lines.vertical, vec![0.0, 10.0, 5.0]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let current = Rect::new(0.0, 0.0, 10.0, 10.0);
        let other = Rect::new(15.0, 100.0, 40.0, 120.0);
        assert!(snap_lines(current, [other], SNAP_THRESHOLD).is_empty());
    }
}
