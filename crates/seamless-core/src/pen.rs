//! Pen tool: click-by-click construction of cubic bezier paths.

use crate::elements::{PathElement, PathNode};
use kurbo::{Point, Vec2};

/// Offset of the default handles from a freshly placed anchor.
pub const DEFAULT_CONTROL_OFFSET: f64 = 50.0;

/// Fraction of the way toward the next anchor that the previous node's
/// outgoing handle is moved when a node is added.
pub const AUTO_TANGENT_FACTOR: f64 = 0.3;

/// Radius of the anchor handles drawn by the pen overlay, in scene units.
pub const NODE_HANDLE_RADIUS: f64 = 5.0;

/// Minimum node count before clicking the first node closes the path.
pub const MIN_CLOSE_NODES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    Idle,
    Drawing,
}

/// Which handle of a node is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlHandle {
    In,
    Out,
}

/// Outcome of a pen interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PenEvent {
    /// First node placed.
    Started,
    /// A node was appended at this index.
    NodeAdded(usize),
    /// A node was selected for handle editing.
    NodeSelected(usize),
    /// The path was closed and is ready to be added to the scene.
    Closed(PathElement),
}

/// In-progress path state. Nodes are rebuilt as a new list on each edit.
#[derive(Debug, Clone, Default)]
pub struct PenTool {
    nodes: Vec<PathNode>,
    selected: Option<usize>,
    drawing: bool,
}

impl PenTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PenState {
        if self.drawing {
            PenState::Drawing
        } else {
            PenState::Idle
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn selected_node(&self) -> Option<usize> {
        self.selected
    }

    /// Index of the anchor handle under `point`, if any.
    pub fn node_at(&self, point: Point, tolerance: f64) -> Option<usize> {
        let reach = NODE_HANDLE_RADIUS + tolerance;
        self.nodes
            .iter()
            .position(|n| (n.anchor - point).hypot() <= reach)
    }

    /// Click on empty canvas.
    pub fn click(&mut self, point: Point) -> PenEvent {
        let offset = Vec2::new(DEFAULT_CONTROL_OFFSET, 0.0);

        if !self.drawing {
            self.nodes = vec![PathNode {
                anchor: point,
                control_in: None,
                control_out: Some(point + offset),
            }];
            self.drawing = true;
            self.selected = Some(0);
            return PenEvent::Started;
        }

        let last = self.nodes.len() - 1;
        let added = PathNode {
            anchor: point,
            control_in: Some(point - offset),
            control_out: Some(point + offset),
        };
        self.nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| match node.control_out {
                Some(_) if i == last => PathNode {
                    control_out: Some(node.anchor + (point - node.anchor) * AUTO_TANGENT_FACTOR),
                    ..*node
                },
                _ => *node,
            })
            .chain(std::iter::once(added))
            .collect();
        self.selected = Some(self.nodes.len() - 1);
        PenEvent::NodeAdded(self.nodes.len() - 1)
    }

    /// Click on an existing anchor. Clicking the first anchor while drawing
    /// with enough nodes closes the path; any other click selects the node.
    pub fn click_node(&mut self, index: usize) -> Option<PenEvent> {
        if index >= self.nodes.len() {
            return None;
        }
        if self.drawing && index == 0 && self.nodes.len() >= MIN_CLOSE_NODES {
            let nodes = std::mem::take(&mut self.nodes);
            self.reset();
            return PathElement::new(nodes, true).map(PenEvent::Closed);
        }
        self.selected = Some(index);
        Some(PenEvent::NodeSelected(index))
    }

    /// Move a handle of the selected node. Only handles that already exist
    /// are moved; neighbours are left alone.
    pub fn drag_control(&mut self, handle: ControlHandle, point: Point) -> bool {
        let Some(selected) = self.selected else {
            return false;
        };
        let Some(node) = self.nodes.get(selected) else {
            return false;
        };
        let updated = match handle {
            ControlHandle::In if node.control_in.is_some() => PathNode {
                control_in: Some(point),
                ..*node
            },
            ControlHandle::Out if node.control_out.is_some() => PathNode {
                control_out: Some(point),
                ..*node
            },
            _ => return false,
        };
        self.nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| if i == selected { updated } else { *n })
            .collect();
        true
    }

    /// End the path without closing it. Needs at least two nodes; a shorter
    /// path is discarded.
    pub fn finish(&mut self) -> Option<PathElement> {
        let nodes = std::mem::take(&mut self.nodes);
        self.reset();
        if nodes.len() < 2 {
            return None;
        }
        PathElement::new(nodes, false)
    }

    /// Discard the in-progress path.
    pub fn cancel(&mut self) {
        if self.drawing {
            log::debug!("Discarding pen path with {} nodes", self.nodes.len());
        }
        self.nodes.clear();
        self.reset();
    }

    /// The path as drawn so far, for the overlay.
    pub fn preview(&self) -> Option<PathElement> {
        if self.nodes.is_empty() {
            return None;
        }
        PathElement::new(self.nodes.clone(), false)
    }

    fn reset(&mut self) {
        self.drawing = false;
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn(points: &[(f64, f64)]) -> PenTool {
        let mut pen = PenTool::new();
        for (x, y) in points {
            pen.click(Point::new(*x, *y));
        }
        pen
    }

    #[test]
    fn test_first_click_starts() {
        let mut pen = PenTool::new();
        assert_eq!(pen.click(Point::new(10.0, 10.0)), PenEvent::Started);
        assert_eq!(pen.state(), PenState::Drawing);
        let node = pen.nodes()[0];
        assert_eq!(node.control_in, None);
        assert_eq!(node.control_out, Some(Point::new(60.0, 10.0)));
    }

    #[test]
    fn test_second_click_sets_tangent() {
        let pen = drawn(&[(0.0, 0.0), (100.0, 0.0)]);
        let nodes = pen.nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].control_out, Some(Point::new(30.0, 0.0)));
        assert_eq!(nodes[1].control_in, Some(Point::new(50.0, 0.0)));
        assert_eq!(nodes[1].control_out, Some(Point::new(150.0, 0.0)));
        assert_eq!(pen.selected_node(), Some(1));
    }

    #[test]
    fn test_close_on_first_node() {
        let mut pen = drawn(&[(0.0, 0.0), (100.0, 0.0), (50.0, 80.0)]);
        let Some(PenEvent::Closed(path)) = pen.click_node(0) else {
            panic!("expected closed path");
        };
        assert!(path.closed);
        assert_eq!(path.nodes().len(), 3);
        assert_eq!(pen.state(), PenState::Idle);
        assert!(pen.nodes().is_empty());
    }

    #[test]
    fn test_first_node_with_two_nodes_only_selects() {
        let mut pen = drawn(&[(0.0, 0.0), (100.0, 0.0)]);
        assert_eq!(pen.click_node(0), Some(PenEvent::NodeSelected(0)));
        assert_eq!(pen.state(), PenState::Drawing);
    }

    #[test]
    fn test_drag_control_only_existing_handle() {
        let mut pen = drawn(&[(0.0, 0.0), (100.0, 0.0)]);
        pen.click_node(0);
        assert!(!pen.drag_control(ControlHandle::In, Point::new(-5.0, -5.0)));
        assert!(pen.drag_control(ControlHandle::Out, Point::new(20.0, 20.0)));
        assert_eq!(pen.nodes()[0].control_out, Some(Point::new(20.0, 20.0)));
        assert_eq!(pen.nodes()[1].control_in, Some(Point::new(50.0, 0.0)));
    }

    #[test]
    fn test_finish_and_cancel() {
        let mut pen = drawn(&[(0.0, 0.0)]);
        assert!(pen.finish().is_none());

        let mut pen = drawn(&[(0.0, 0.0), (10.0, 10.0)]);
        let path = pen.finish().unwrap();
        assert!(!path.closed);
        assert!(path.style.fill.is_none());

        let mut pen = drawn(&[(0.0, 0.0), (10.0, 10.0)]);
        pen.cancel();
        assert_eq!(pen.state(), PenState::Idle);
        assert!(pen.preview().is_none());
    }

    #[test]
    fn test_node_at() {
        let pen = drawn(&[(0.0, 0.0), (100.0, 0.0)]);
        assert_eq!(pen.node_at(Point::new(3.0, 3.0), 0.0), Some(0));
        assert_eq!(pen.node_at(Point::new(50.0, 0.0), 0.0), None);
    }
}
