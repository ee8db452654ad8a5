//! Pointer drags and text editing.
//!
//! A session is in one of three states: idle, dragging (`drag` is set) or
//! text editing (`text_edit` is set). Move and resize drags never update the
//! live shape incrementally; each pointer sample applies the total offset
//! from the drag start to the seed captured when the drag began.

use bevy::log::debug;
use bevy::math::IVec2;

use super::geometry::{PixelRect, distance_squared, normalize_rect, rect_from_points, snap_45};
use super::model::{Annotation, Shape};
use super::session::{Command, Session};
use super::tools::{DragMode, Tool};
use crate::constants::MIN_SHAPE_SIZE;

/// An in-progress pointer drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub mode: DragMode,
    /// Canvas point where the button went down.
    pub start: IVec2,
    /// Latest (possibly snapped) pointer sample.
    pub current: IVec2,
    /// Shape being manipulated; `None` for create drags.
    pub index: Option<usize>,
    /// The shape as it was before the drag, or the shape being created.
    pub seed: Annotation,
}

impl DragState {
    /// Anchor for 45-degree snapping in this drag, if it snaps at all.
    fn snap_anchor(&self) -> Option<IVec2> {
        if !self.mode.snaps() {
            return None;
        }
        match (self.mode, self.seed.shape.endpoints()) {
            (DragMode::MoveLineStart, Some((_, p2))) => Some(p2),
            (DragMode::MoveLineEnd, Some((p1, _))) => Some(p1),
            _ => Some(self.start),
        }
    }

    fn constrain(&self, point: IVec2, snap: bool) -> IVec2 {
        match self.snap_anchor() {
            Some(anchor) if snap => snap_45(anchor, point),
            _ => point,
        }
    }
}

/// Rect corners reordered so `p1` is top-left and `p2` bottom-right, keeping
/// corner handles and their resize modes in agreement.
fn canonical_rect(shape: &Shape) -> Option<Shape> {
    match *shape {
        Shape::Rect { p1, p2 } => Some(Shape::Rect {
            p1: p1.min(p2),
            p2: p1.max(p2),
        }),
        _ => None,
    }
}

/// Minimum-size rule for created rects, measured on the diagonal.
fn rect_long_enough(r: &PixelRect) -> bool {
    let min = f64::from(MIN_SHAPE_SIZE);
    distance_squared(IVec2::ZERO, IVec2::new(r.w, r.h)) >= min * min
}

/// `seed` moved or resized by `delta`. A zero offset gives the seed back
/// untouched, so a click without movement never rewrites a shape.
fn offset_shape(seed: &Shape, mode: DragMode, delta: IVec2) -> Shape {
    if delta == IVec2::ZERO {
        return seed.clone();
    }
    // Handle modes were picked against the rect's visual corners
    let mut shape = canonical_rect(seed).unwrap_or_else(|| seed.clone());
    if let Shape::Text { anchor, .. } = &mut shape {
        if mode == DragMode::MoveText {
            *anchor += delta;
        }
        return shape;
    }
    let Some((p1, p2)) = shape.endpoints_mut() else {
        return shape;
    };
    match mode {
        DragMode::MoveRect | DragMode::MoveLine => {
            *p1 += delta;
            *p2 += delta;
        }
        DragMode::ResizeRectTL | DragMode::MoveLineStart => *p1 += delta,
        DragMode::ResizeRectBR | DragMode::MoveLineEnd => *p2 += delta,
        DragMode::ResizeRectTR => {
            p2.x += delta.x;
            p1.y += delta.y;
        }
        DragMode::ResizeRectBL => {
            p1.x += delta.x;
            p2.y += delta.y;
        }
        _ => {}
    }
    shape
}

impl Session {
    /// Pointer button went down at `point`.
    pub fn begin_drag(&mut self, point: IVec2) {
        self.drag = None;
        if self.tool != Tool::Text {
            self.text_edit = None;
        }
        self.touch();

        if self.tool == Tool::Text {
            self.begin_text_click(point);
            return;
        }

        if let Some(hit) = self.hit_test(point) {
            self.selected = Some(hit.index);
            self.drag = Some(DragState {
                mode: hit.mode,
                start: point,
                current: point,
                index: Some(hit.index),
                seed: self.shapes[hit.index].clone(),
            });
            debug!("Grabbed shape {} with {:?}", hit.index, hit.mode);
            return;
        }

        self.selected = None;
        let create = match self.tool {
            Tool::Rect => Some((DragMode::CreateRect, Shape::Rect { p1: point, p2: point })),
            Tool::Line => Some((DragMode::CreateLine, Shape::Line { p1: point, p2: point })),
            Tool::Arrow => Some((DragMode::CreateArrow, Shape::Arrow { p1: point, p2: point })),
            Tool::Pencil => Some((
                DragMode::CreatePencil,
                Shape::Pencil {
                    points: vec![point],
                },
            )),
            // Select on empty canvas only clears the selection.
            Tool::Select | Tool::Text => None,
        };
        self.drag = create.map(|(mode, shape)| DragState {
            mode,
            start: point,
            current: point,
            index: None,
            seed: Annotation::new(shape, self.stroke),
        });
    }

    /// Text tool click: grab an existing text shape, or place a new empty
    /// one and start editing it.
    fn begin_text_click(&mut self, point: IVec2) {
        if let Some(hit) = self.hit_test(point) {
            self.selected = Some(hit.index);
            self.text_edit = None;
            self.drag = Some(DragState {
                mode: DragMode::MoveText,
                start: point,
                current: point,
                index: Some(hit.index),
                seed: self.shapes[hit.index].clone(),
            });
            return;
        }

        self.shapes.push(Annotation::new(
            Shape::Text {
                anchor: point,
                size: self.settings.text_size,
                content: String::new(),
            },
            self.stroke,
        ));
        let index = self.shapes.len() - 1;
        self.selected = Some(index);
        self.text_edit = Some(index);
        self.push_history();
        debug!("Placed text at {:?}", point);
    }

    /// Pointer moved while the button is held. `snap` is the 45-degree
    /// modifier state.
    pub fn update_drag(&mut self, point: IVec2, snap: bool) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let point = drag.constrain(point, snap);
        drag.current = point;

        if drag.mode == DragMode::CreatePencil {
            if let Shape::Pencil { points } = &mut drag.seed.shape
                && points.last() != Some(&point)
            {
                points.push(point);
            }
        } else if let Some(target) = drag.index.and_then(|i| self.shapes.get_mut(i)) {
            target.shape = offset_shape(&drag.seed.shape, drag.mode, point - drag.start);
        }
        self.touch();
    }

    /// Pointer button released at `point`. Commits created shapes that pass
    /// the minimum-size rule and records history when anything changed.
    pub fn end_drag(&mut self, point: IVec2, snap: bool) {
        if self.drag.is_none() {
            return;
        }
        self.update_drag(point, snap);
        let Some(drag) = self.drag.take() else {
            return;
        };
        let min_sq = f64::from(MIN_SHAPE_SIZE * MIN_SHAPE_SIZE);

        let changed = match drag.mode {
            DragMode::None => false,
            DragMode::CreateRect => {
                let size = self.canvas_size();
                let r = normalize_rect(rect_from_points(drag.start, drag.current), size.x, size.y);
                let long_enough = rect_long_enough(&r);
                if long_enough {
                    let mut shape = drag.seed;
                    shape.shape = Shape::Rect {
                        p1: r.top_left(),
                        p2: r.bottom_right(),
                    };
                    self.commit(shape);
                }
                long_enough
            }
            DragMode::CreateLine | DragMode::CreateArrow => {
                let long_enough = distance_squared(drag.start, drag.current) >= min_sq;
                if long_enough {
                    let mut shape = drag.seed;
                    if let Some((p1, p2)) = shape.shape.endpoints_mut() {
                        *p1 = drag.start;
                        *p2 = drag.current;
                    }
                    self.commit(shape);
                }
                long_enough
            }
            DragMode::CreatePencil => {
                let long_enough =
                    matches!(&drag.seed.shape, Shape::Pencil { points } if points.len() >= 2);
                if long_enough {
                    self.commit(drag.seed);
                }
                long_enough
            }
            _ => match drag.index.and_then(|i| self.shapes.get_mut(i)) {
                Some(target) => {
                    // Stored rects always keep p1 top-left
                    if let Some(rect) = canonical_rect(&target.shape) {
                        target.shape = rect;
                    }
                    *target != drag.seed
                }
                None => false,
            },
        };

        if changed {
            self.push_history();
        }
        self.touch();
    }

    /// End a drag whose button-up never arrived (capture or focus lost) at
    /// the last sample the engine saw.
    pub fn end_drag_at_last_point(&mut self, snap: bool) {
        if let Some(point) = self.drag.as_ref().map(|d| d.current) {
            debug!("Implicitly ending drag at {:?}", point);
            self.end_drag(point, snap);
        }
    }

    /// Drop the in-progress drag without committing it. A moved or resized
    /// shape returns to its seed.
    pub fn cancel_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if let Some(target) = drag.index.and_then(|i| self.shapes.get_mut(i)) {
            *target = drag.seed;
        }
        self.touch();
    }

    fn commit(&mut self, shape: Annotation) {
        self.shapes.push(shape);
        self.selected = Some(self.shapes.len() - 1);
    }

    fn editing_text_mut(&mut self) -> Option<&mut String> {
        let index = self.text_edit?;
        match &mut self.shapes.get_mut(index)?.shape {
            Shape::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Append a printable character to the text being edited.
    pub fn insert_char(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        let Some(content) = self.editing_text_mut() else {
            return false;
        };
        content.push(c);
        self.push_history();
        self.touch();
        true
    }

    /// Remove the last character of the text being edited.
    pub fn backspace(&mut self) -> bool {
        let Some(content) = self.editing_text_mut() else {
            return false;
        };
        if content.pop().is_none() {
            return false;
        }
        self.push_history();
        self.touch();
        true
    }

    /// Enter: leave text editing, keeping the shape selected. Every keystroke
    /// already recorded a snapshot, so history only grows here when the
    /// shapes drifted from the current snapshot.
    pub fn finish_text_edit(&mut self) -> bool {
        if self.text_edit.take().is_none() {
            return false;
        }
        if self.shapes.as_slice() != self.history.current() {
            self.push_history();
        }
        self.touch();
        true
    }

    /// Escape: leave text editing, else clear the selection, else ask the
    /// host to close the session.
    pub fn escape(&mut self) -> Option<Command> {
        if self.text_edit.is_some() || self.selected.is_some() {
            self.clear_selection();
            return None;
        }
        Some(Command::Close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape_at(x: i32) -> Shape {
        Shape::Rect {
            p1: IVec2::new(x, x),
            p2: IVec2::new(x + 10, x + 20),
        }
    }

    #[test]
    fn test_offset_resize_corners() {
        let seed = shape_at(10);
        let d = IVec2::new(3, -4);

        assert_eq!(
            offset_shape(&seed, DragMode::ResizeRectTR, d),
            Shape::Rect {
                p1: IVec2::new(10, 6),
                p2: IVec2::new(23, 30)
            }
        );
        assert_eq!(
            offset_shape(&seed, DragMode::ResizeRectBL, d),
            Shape::Rect {
                p1: IVec2::new(13, 10),
                p2: IVec2::new(20, 26)
            }
        );
    }

    #[test]
    fn test_offset_resizes_flipped_rect_by_visual_corner() {
        let flipped = Shape::Rect {
            p1: IVec2::new(50, 30),
            p2: IVec2::new(10, 10),
        };
        assert_eq!(
            offset_shape(&flipped, DragMode::ResizeRectTL, IVec2::new(2, 2)),
            Shape::Rect {
                p1: IVec2::new(12, 12),
                p2: IVec2::new(50, 30)
            }
        );
    }

    #[test]
    fn test_zero_offset_returns_seed_unchanged() {
        let flipped = Shape::Rect {
            p1: IVec2::new(50, 30),
            p2: IVec2::new(10, 10),
        };
        assert_eq!(offset_shape(&flipped, DragMode::MoveRect, IVec2::ZERO), flipped);
    }

    #[test]
    fn test_offset_moves_text_anchor() {
        let seed = Shape::Text {
            anchor: IVec2::new(5, 5),
            size: 22,
            content: "a".into(),
        };
        let moved = offset_shape(&seed, DragMode::MoveText, IVec2::new(-5, 10));
        assert!(matches!(moved, Shape::Text { anchor, .. } if anchor == IVec2::new(0, 15)));
    }

    #[test]
    fn test_rect_size_rule() {
        let rect = |w, h| PixelRect { x: 0, y: 0, w, h };
        assert!(!rect_long_enough(&rect(0, 0)));
        assert!(rect_long_enough(&rect(0, 1)));
        // Squares past 46341 px overflow i32
        assert!(rect_long_enough(&rect(50_000, 50_000)));
        assert!(rect_long_enough(&rect(i32::MAX, i32::MAX)));
    }

    #[test]
    fn test_canonical_rect_orders_corners() {
        let flipped = Shape::Rect {
            p1: IVec2::new(50, 10),
            p2: IVec2::new(10, 30),
        };
        assert_eq!(
            canonical_rect(&flipped),
            Some(Shape::Rect {
                p1: IVec2::new(10, 10),
                p2: IVec2::new(50, 30)
            })
        );
    }
}
