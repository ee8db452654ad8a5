//! Hit testing functions for picking annotations under the pointer.

use bevy::math::IVec2;

use super::geometry::{distance_squared, distance_to_segment_squared};
use super::model::{Annotation, Shape, ShapeBounds};
use super::tools::{DragMode, Tool};

/// A picked shape and the drag that grabbing it would start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub mode: DragMode,
}

/// Find the topmost shape under `point`.
///
/// Shapes are tested from last (topmost) to first. Shapes the tool does not
/// allow and non-editable shapes are skipped. Within a shape, handles and
/// endpoints win over the body.
pub fn hit_test(
    shapes: &[Annotation],
    tool: Tool,
    point: IVec2,
    tolerance: i32,
    bounds: &ShapeBounds<'_>,
) -> Option<Hit> {
    shapes
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, ann)| ann.is_editable() && tool.allows(ann.kind()))
        .find_map(|(index, ann)| {
            hit_shape(ann, point, tolerance, bounds).map(|mode| Hit { index, mode })
        })
}

fn hit_shape(
    ann: &Annotation,
    point: IVec2,
    tolerance: i32,
    bounds: &ShapeBounds<'_>,
) -> Option<DragMode> {
    let tol_sq = f64::from(tolerance) * f64::from(tolerance);
    match &ann.shape {
        Shape::Rect { .. } => {
            let r = bounds.of(ann);
            const HANDLE_MODES: [DragMode; 4] = [
                DragMode::ResizeRectTL,
                DragMode::ResizeRectTR,
                DragMode::ResizeRectBL,
                DragMode::ResizeRectBR,
            ];
            r.corners()
                .into_iter()
                .zip(HANDLE_MODES)
                .find(|(corner, _)| distance_squared(point, *corner) <= tol_sq)
                .map(|(_, mode)| mode)
                .or_else(|| r.contains(point).then_some(DragMode::MoveRect))
        }
        Shape::Line { p1, p2 } | Shape::Arrow { p1, p2 } => {
            if distance_squared(point, *p1) <= tol_sq {
                return Some(DragMode::MoveLineStart);
            }
            if distance_squared(point, *p2) <= tol_sq {
                return Some(DragMode::MoveLineEnd);
            }
            let line_tol = f64::from(tolerance.max(ann.style.thickness + 2));
            (distance_to_segment_squared(point, *p1, *p2) <= line_tol * line_tol)
                .then_some(DragMode::MoveLine)
        }
        Shape::Text { .. } => bounds.of(ann).contains(point).then_some(DragMode::MoveText),
        Shape::Pencil { .. } => None,
    }
}
