//! Display lists describing what to draw for a session.
//!
//! The engine never draws directly; it produces [`DrawCommand`]s that any
//! [`ShapeRenderer`] can replay.

use bevy::math::IVec2;

use super::compositor::ShapeRenderer;
use super::geometry::{PixelRect, arrow_head, normalize_rect, rect_from_points};
use super::model::{Annotation, Rgba, Shape, ShapeBounds, StrokeStyle};
use super::session::Session;
use super::tools::DragMode;
use crate::constants::{CARET_GAP, TEXT_PLACEHOLDER};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    RectOutline {
        rect: PixelRect,
        style: StrokeStyle,
    },
    Line {
        from: IVec2,
        to: IVec2,
        style: StrokeStyle,
    },
    FilledTriangle {
        points: [IVec2; 3],
        color: Rgba,
    },
    Polyline {
        points: Vec<IVec2>,
        style: StrokeStyle,
    },
    Text {
        anchor: IVec2,
        size: i32,
        content: String,
        color: Rgba,
    },
    /// Selection handle: white square with a black border.
    Handle { rect: PixelRect },
}

/// Replay `commands` in order.
pub fn render<R: ShapeRenderer + ?Sized>(commands: &[DrawCommand], renderer: &mut R) {
    for command in commands {
        match command {
            DrawCommand::RectOutline { rect, style } => renderer.draw_rect_outline(*rect, *style),
            DrawCommand::Line { from, to, style } => renderer.draw_line(*from, *to, *style),
            DrawCommand::FilledTriangle { points, color } => {
                renderer.draw_filled_triangle(*points, *color)
            }
            DrawCommand::Polyline { points, style } => renderer.draw_polyline(points, *style),
            DrawCommand::Text {
                anchor,
                size,
                content,
                color,
            } => renderer.draw_text(*anchor, *size, content, *color),
            DrawCommand::Handle { rect } => renderer.draw_handle(*rect),
        }
    }
}

/// Committed shapes only, as they appear in the exported image.
pub fn final_scene(session: &Session) -> Vec<DrawCommand> {
    let bounds = session.bounds();
    let mut out = Vec::new();
    for ann in session.shapes() {
        push_annotation(&mut out, ann, &bounds, false);
    }
    out
}

/// What the editor shows: committed shapes, the shape being created,
/// selection handles and the text caret.
pub fn preview_scene(session: &Session) -> Vec<DrawCommand> {
    let bounds = session.bounds();
    let mut out = Vec::new();
    for ann in session.shapes() {
        push_annotation(&mut out, ann, &bounds, true);
    }

    if let Some(drag) = session.drag() {
        match drag.mode {
            DragMode::CreateRect | DragMode::CreateLine | DragMode::CreateArrow => {
                let mut preview = drag.seed.clone();
                if let Some((p1, p2)) = preview.shape.endpoints_mut() {
                    *p1 = drag.start;
                    *p2 = drag.current;
                }
                push_annotation(&mut out, &preview, &bounds, true);
            }
            DragMode::CreatePencil => push_annotation(&mut out, &drag.seed, &bounds, true),
            _ => {}
        }
    }

    if let Some(ann) = session.selected().and_then(|i| session.shapes().get(i)) {
        push_handles(&mut out, ann, &bounds, session.settings().handle_size);
        if session.is_text_editing() {
            let r = bounds.of(ann);
            let x = r.right() + CARET_GAP;
            out.push(DrawCommand::Line {
                from: IVec2::new(x, r.y),
                to: IVec2::new(x, r.bottom()),
                style: StrokeStyle {
                    color: Rgba::WHITE,
                    thickness: 1,
                },
            });
        }
    }
    out
}

fn push_annotation(
    out: &mut Vec<DrawCommand>,
    ann: &Annotation,
    bounds: &ShapeBounds<'_>,
    show_placeholder: bool,
) {
    let style = StrokeStyle {
        color: ann.style.color,
        thickness: ann.style.thickness.max(1),
    };
    match &ann.shape {
        Shape::Rect { p1, p2 } => out.push(DrawCommand::RectOutline {
            rect: normalize_rect(rect_from_points(*p1, *p2), bounds.canvas_w, bounds.canvas_h),
            style,
        }),
        Shape::Line { p1, p2 } => out.push(DrawCommand::Line {
            from: *p1,
            to: *p2,
            style,
        }),
        Shape::Arrow { p1, p2 } => {
            out.push(DrawCommand::Line {
                from: *p1,
                to: *p2,
                style,
            });
            if let Some(points) = arrow_head(*p1, *p2, style.thickness) {
                out.push(DrawCommand::FilledTriangle {
                    points,
                    color: style.color,
                });
            }
        }
        Shape::Pencil { points } => {
            if points.len() > 1 {
                out.push(DrawCommand::Polyline {
                    points: points.clone(),
                    style,
                });
            }
        }
        Shape::Text {
            anchor,
            size,
            content,
        } => {
            let content = if content.is_empty() {
                if !show_placeholder {
                    return;
                }
                TEXT_PLACEHOLDER.to_string()
            } else {
                content.clone()
            };
            out.push(DrawCommand::Text {
                anchor: *anchor,
                size: *size,
                content,
                color: style.color,
            });
        }
    }
}

fn push_handles(
    out: &mut Vec<DrawCommand>,
    ann: &Annotation,
    bounds: &ShapeBounds<'_>,
    handle_size: i32,
) {
    if !ann.is_editable() {
        return;
    }
    let r = bounds.of(ann);
    if r.is_empty() {
        return;
    }
    let half = handle_size / 2;
    for corner in r.corners() {
        out.push(DrawCommand::Handle {
            rect: PixelRect::new(corner.x - half, corner.y - half, handle_size, handle_size),
        });
    }
}
