//! Freeform bezier path built by the pen tool.

use super::{
    ElementId, ElementStyle, ElementTrait, Fill, SerializableColor, node_transform, points_bounds,
};
use kurbo::{BezPath, ParamCurveNearest, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One anchor of a path with its optional bezier handles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub anchor: Point,
    #[serde(default)]
    pub control_in: Option<Point>,
    #[serde(default)]
    pub control_out: Option<Point>,
}

impl PathNode {
    pub fn corner(anchor: Point) -> Self {
        Self {
            anchor,
            control_in: None,
            control_out: None,
        }
    }

    fn map(self, f: &impl Fn(Point) -> Point) -> Self {
        Self {
            anchor: f(self.anchor),
            control_in: self.control_in.map(f),
            control_out: self.control_out.map(f),
        }
    }
}

/// A path element. Always holds at least one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    #[serde(default)]
    pub position: Point,
    #[serde(deserialize_with = "deserialize_nodes")]
    nodes: Vec<PathNode>,
    #[serde(default)]
    pub closed: bool,
    /// Rotation in degrees; folded into the nodes at transform-end.
    #[serde(default)]
    pub rotation: f64,
    pub style: ElementStyle,
    #[serde(default)]
    pub locked: bool,
}

impl PathElement {
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

    /// Build a path from its nodes. Closed paths get a black fill, open ones
    /// are stroke only. Returns `None` for an empty node list.
    pub fn new(nodes: Vec<PathNode>, closed: bool) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        let mut style = ElementStyle::stroke_only(Self::DEFAULT_STROKE_WIDTH);
        if closed {
            style.fill = Some(Fill::Solid(SerializableColor::black()));
        }
        Some(Self {
            id: Uuid::new_v4(),
            position: Point::ZERO,
            nodes,
            closed,
            rotation: 0.0,
            style,
            locked: false,
        })
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Replace the node list; an empty list is ignored and `false` returned.
    pub fn set_nodes(&mut self, nodes: Vec<PathNode>) -> bool {
        if nodes.is_empty() {
            log::debug!("Ignoring empty node list for path {}", self.id);
            return false;
        }
        self.nodes = nodes;
        true
    }

    /// Apply a function to every anchor and control point.
    pub fn map_points(&mut self, f: impl Fn(Point) -> Point) {
        self.nodes = self.nodes.iter().map(|n| n.map(&f)).collect();
    }

    /// Add `delta` to every anchor and control point.
    pub fn offset_points(&mut self, delta: Vec2) {
        self.map_points(|p| p + delta);
    }

    /// Build the drawable outline in the element's own frame.
    ///
    /// Consecutive nodes are joined by a cubic when the leading node has an
    /// outgoing handle and the trailing node an incoming one, otherwise by a
    /// straight segment. Closed paths add the segment back to the first node.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.nodes.first() else {
            return path;
        };
        path.move_to(first.anchor);
        for pair in self.nodes.windows(2) {
            push_segment(&mut path, &pair[0], &pair[1]);
        }
        if self.closed && self.nodes.len() > 1 {
            if let Some(last) = self.nodes.last() {
                push_segment(&mut path, last, first);
            }
            path.close_path();
        }
        path
    }
}

fn push_segment(path: &mut BezPath, from: &PathNode, to: &PathNode) {
    match (from.control_out, to.control_in) {
        (Some(c1), Some(c2)) => path.curve_to(c1, c2, to.anchor),
        _ => path.line_to(to.anchor),
    }
}

fn deserialize_nodes<'de, D>(deserializer: D) -> Result<Vec<PathNode>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let nodes = Vec::<PathNode>::deserialize(deserializer)?;
    if nodes.is_empty() {
        return Err(serde::de::Error::custom("path needs at least one node"));
    }
    Ok(nodes)
}

impl ElementTrait for PathElement {
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
        points_bounds(self.nodes.iter().map(|n| n.anchor + offset), self.position)
    }

    fn self_rect(&self) -> Rect {
        points_bounds(self.nodes.iter().map(|n| n.anchor), Point::ZERO)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = node_transform(self.position, self.rotation).inverse() * point;
        let reach = tolerance + self.style.stroke_width / 2.0;
        let path = self.to_bez_path();

        if self.closed && self.style.fill.is_some() && path.contains(local) {
            return true;
        }

        if let [only] = self.nodes.as_slice() {
            return (local - only.anchor).hypot() <= reach;
        }

        path.segments()
            .any(|seg| seg.nearest(local, 0.1).distance_sq.sqrt() <= reach)
    }

    fn to_path(&self) -> BezPath {
        self.to_bez_path()
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
