//! Align and distribute operations over a multi-selection.
//!
//! Both compute a translation per element and leave applying them to the
//! caller, so a whole operation lands in history as one step.

use crate::elements::{Element, ElementId};
use crate::geometry::union_bounds;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Minimum selection size for alignment.
pub const MIN_ALIGN_SELECTION: usize = 2;
/// Minimum selection size for distribution.
pub const MIN_DISTRIBUTE_SELECTION: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignOp {
    Left,
    /// Horizontal center.
    Center,
    Right,
    Top,
    /// Vertical center.
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributeAxis {
    Horizontal,
    Vertical,
}

/// Per-element translation that aligns the selection's bounds to the
/// union box edge or center named by `op`.
///
/// Returns nothing for fewer than two elements.
pub fn align(elements: &[&Element], op: AlignOp) -> Vec<(ElementId, Vec2)> {
    if elements.len() < MIN_ALIGN_SELECTION {
        log::debug!("align needs {MIN_ALIGN_SELECTION} elements, got {}", elements.len());
        return Vec::new();
    }
    let Some(union) = union_bounds(elements.iter().copied()) else {
        return Vec::new();
    };
    let center = union.center();

    elements
        .iter()
        .map(|element| {
            let b = element.bounds();
            let delta = match op {
                AlignOp::Left => Vec2::new(union.x0 - b.x0, 0.0),
                AlignOp::Center => Vec2::new(center.x - b.center().x, 0.0),
                AlignOp::Right => Vec2::new(union.x1 - b.x1, 0.0),
                AlignOp::Top => Vec2::new(0.0, union.y0 - b.y0),
                AlignOp::Middle => Vec2::new(0.0, center.y - b.center().y),
                AlignOp::Bottom => Vec2::new(0.0, union.y1 - b.y1),
            };
            (element.id(), delta)
        })
        .collect()
}

/// Per-element translation that spaces bounds centers evenly along `axis`
/// between the two outermost centers, which stay put.
///
/// Returns nothing for fewer than three elements.
pub fn distribute(elements: &[&Element], axis: DistributeAxis) -> Vec<(ElementId, Vec2)> {
    if elements.len() < MIN_DISTRIBUTE_SELECTION {
        log::debug!(
            "distribute needs {MIN_DISTRIBUTE_SELECTION} elements, got {}",
            elements.len()
        );
        return Vec::new();
    }

    let along = |e: &Element| {
        let c = e.bounds().center();
        match axis {
            DistributeAxis::Horizontal => c.x,
            DistributeAxis::Vertical => c.y,
        }
    };

    let mut sorted: Vec<(ElementId, f64)> = elements.iter().map(|e| (e.id(), along(*e))).collect();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

    let first = sorted[0].1;
    let last = sorted[sorted.len() - 1].1;
    let spacing = (last - first) / (sorted.len() - 1) as f64;

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, (id, current))| {
            let shift = first + spacing * i as f64 - current;
            let delta = match axis {
                DistributeAxis::Horizontal => Vec2::new(shift, 0.0),
                DistributeAxis::Vertical => Vec2::new(0.0, shift),
            };
            (id, delta)
        })
        .collect()
}
