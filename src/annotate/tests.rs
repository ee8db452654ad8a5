//! End-to-end tests driving a session the way the host does.

use bevy::math::{IRect, IVec2};

use super::compositor::compose;
use super::raster::RasterRenderer;
use super::scene::{DrawCommand, final_scene, preview_scene};
use super::session::{Command, EngineSettings, FrozenFrame, PixelFormat, Session};
use super::model::Shape;
use super::tools::{DragMode, Tool};

/// BGRA frame with `padding` spare bytes at the end of every row.
fn frame(width: u32, height: u32, padding: usize) -> FrozenFrame {
    let stride = width as usize * 4 + padding;
    let mut pixels = vec![0xEEu8; stride * height as usize];
    for y in 0..height as usize {
        for x in 0..width as usize {
            let i = y * stride + x * 4;
            pixels[i..i + 4].copy_from_slice(&[x as u8, y as u8, 0x40, 0xFF]);
        }
    }
    FrozenFrame::from_raw(pixels, width, height, stride, PixelFormat::Bgra8)
}

fn session(width: u32, height: u32) -> Session {
    Session::begin(
        IRect::new(0, 0, width as i32, height as i32),
        frame(width, height, 0),
        EngineSettings::default(),
    )
    .unwrap()
}

fn p(x: i32, y: i32) -> IVec2 {
    IVec2::new(x, y)
}

fn drag(session: &mut Session, from: IVec2, to: IVec2) {
    session.begin_drag(from);
    session.update_drag(to, false);
    session.end_drag(to, false);
}

fn rect_shape(session: &Session, index: usize) -> (IVec2, IVec2) {
    match session.shapes()[index].shape {
        Shape::Rect { p1, p2 } => (p1, p2),
        ref other => panic!("expected rect, got {:?}", other),
    }
}

#[test]
fn test_rect_drag_commits_one_shape() {
    let mut s = session(100, 50);
    assert_eq!(s.tool(), Tool::Rect);

    drag(&mut s, p(10, 10), p(50, 30));

    assert_eq!(s.shapes().len(), 1);
    assert_eq!(rect_shape(&s, 0), (p(10, 10), p(50, 30)));
    assert_eq!(s.history().len(), 2);
    assert_eq!(s.selected(), Some(0));
    assert!(!s.is_dragging());
}

#[test]
fn test_zero_size_rect_is_discarded() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(10, 10));
    assert!(s.shapes().is_empty());
    assert_eq!(s.history().len(), 1);

    drag(&mut s, p(10, 10), p(10, 11));
    assert_eq!(s.shapes().len(), 1);
    assert_eq!(rect_shape(&s, 0), (p(10, 10), p(10, 11)));
}

#[test]
fn test_reversed_rect_drag_is_normalized_and_clamped() {
    let mut s = session(100, 50);
    drag(&mut s, p(80, 45), p(20, 70));
    assert_eq!(rect_shape(&s, 0), (p(20, 45), p(80, 50)));
}

#[test]
fn test_pencil_coalesces_duplicate_samples() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Pencil);
    s.begin_drag(p(0, 0));
    s.update_drag(p(0, 0), false);
    s.update_drag(p(1, 1), false);
    s.end_drag(p(1, 1), false);

    match &s.shapes()[0].shape {
        Shape::Pencil { points } => assert_eq!(points, &vec![p(0, 0), p(1, 1)]),
        other => panic!("expected pencil, got {:?}", other),
    }
    assert_eq!(s.history().len(), 2);
}

#[test]
fn test_single_point_pencil_is_discarded() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Pencil);
    drag(&mut s, p(5, 5), p(5, 5));
    assert!(s.shapes().is_empty());
    assert_eq!(s.history().len(), 1);
}

#[test]
fn test_short_line_is_discarded() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Line);
    drag(&mut s, p(5, 5), p(5, 5));
    assert!(s.shapes().is_empty());
    drag(&mut s, p(5, 5), p(6, 5));
    assert_eq!(s.shapes().len(), 1);
}

#[test]
fn test_text_click_type_and_enter() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Text);
    s.begin_drag(p(5, 5));
    s.end_drag(p(5, 5), false);

    assert_eq!(s.shapes().len(), 1);
    assert_eq!(
        s.shapes()[0].shape,
        Shape::Text {
            anchor: p(5, 5),
            size: 22,
            content: String::new()
        }
    );
    assert!(s.is_text_editing());
    assert_eq!(s.text_edit, s.selected());
    // Placing the text is itself a commit.
    assert_eq!(s.history().len(), 2);

    assert!(s.insert_char('H'));
    assert!(s.insert_char('i'));
    assert!(s.finish_text_edit());

    assert!(matches!(&s.shapes()[0].shape, Shape::Text { content, .. } if content == "Hi"));
    assert!(!s.is_text_editing());
    // One snapshot per keystroke; Enter on an already-saved edit adds none.
    assert_eq!(s.history().len(), 4);
}

#[test]
fn test_each_keystroke_is_undoable() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Text);
    s.begin_drag(p(5, 5));
    s.insert_char('a');
    s.insert_char('b');
    assert!(s.undo());
    assert!(matches!(&s.shapes()[0].shape, Shape::Text { content, .. } if content == "a"));
    assert!(!s.is_text_editing());
    assert!(s.selected().is_none());
}

#[test]
fn test_backspace_and_control_chars() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Text);
    s.begin_drag(p(5, 5));
    assert!(!s.backspace());
    assert!(!s.insert_char('\u{7}'));
    assert_eq!(s.history().len(), 2);

    s.insert_char('x');
    assert!(s.backspace());
    assert!(matches!(&s.shapes()[0].shape, Shape::Text { content, .. } if content.is_empty()));
    assert_eq!(s.history().len(), 4);
}

#[test]
fn test_chars_ignored_when_not_editing() {
    let mut s = session(100, 50);
    assert!(!s.insert_char('x'));
    assert!(!s.finish_text_edit());
}

#[test]
fn test_text_tool_click_on_text_moves_it() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Text);
    s.begin_drag(p(5, 5));
    s.insert_char('H');
    s.finish_text_edit();

    s.begin_drag(p(10, 10));
    assert_eq!(s.drag().map(|d| d.mode), Some(DragMode::MoveText));
    assert!(!s.is_text_editing());
    s.update_drag(p(20, 15), false);
    s.end_drag(p(20, 15), false);
    assert!(matches!(&s.shapes()[0].shape, Shape::Text { anchor, .. } if *anchor == p(15, 10)));
    assert_eq!(s.shapes().len(), 1);
}

#[test]
fn test_resize_bottom_right_handle() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(50, 30));
    s.set_tool(Tool::Select);

    s.begin_drag(p(50, 30));
    assert_eq!(s.drag().map(|d| d.mode), Some(DragMode::ResizeRectBR));
    s.update_drag(p(53, 32), false);
    s.update_drag(p(55, 35), false);
    s.end_drag(p(55, 35), false);

    assert_eq!(rect_shape(&s, 0), (p(10, 10), p(55, 35)));
    assert_eq!(s.history().len(), 3);
}

#[test]
fn test_move_without_net_change_skips_history() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(50, 30));
    s.set_tool(Tool::Select);

    s.begin_drag(p(30, 20));
    s.update_drag(p(40, 25), false);
    assert_eq!(rect_shape(&s, 0), (p(20, 15), p(60, 35)));
    s.update_drag(p(30, 20), false);
    s.end_drag(p(30, 20), false);

    assert_eq!(rect_shape(&s, 0), (p(10, 10), p(50, 30)));
    assert_eq!(s.history().len(), 2);
}

#[test]
fn test_undo_redo_restores_exact_shapes() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(50, 30));
    let committed = s.shapes().to_vec();

    assert!(s.undo());
    assert!(s.shapes().is_empty());
    assert!(s.redo());
    assert_eq!(s.shapes(), committed.as_slice());
    assert!(s.selected().is_none());
}

#[test]
fn test_new_commit_after_undo_drops_redo() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(50, 30));
    s.undo();
    drag(&mut s, p(60, 10), p(90, 40));
    assert!(!s.redo());
    assert_eq!(s.shapes().len(), 1);
    assert_eq!(rect_shape(&s, 0), (p(60, 10), p(90, 40)));
}

#[test]
fn test_select_on_empty_canvas_clears_selection() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(50, 30));
    s.set_tool(Tool::Select);
    s.begin_drag(p(80, 45));
    assert!(s.selected().is_none());
    assert!(!s.is_dragging());
    s.end_drag(p(80, 45), false);
    assert_eq!(s.history().len(), 2);
}

#[test]
fn test_shift_snaps_new_line() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Line);
    s.begin_drag(p(10, 10));
    s.end_drag(p(30, 14), true);
    assert_eq!(
        s.shapes()[0].shape,
        Shape::Line {
            p1: p(10, 10),
            p2: p(30, 10)
        }
    );
}

#[test]
fn test_endpoint_snap_anchors_on_other_end() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Arrow);
    drag(&mut s, p(10, 10), p(50, 10));
    s.set_tool(Tool::Select);

    s.begin_drag(p(50, 10));
    assert_eq!(s.drag().map(|d| d.mode), Some(DragMode::MoveLineEnd));
    s.end_drag(p(70, 32), true);
    assert_eq!(
        s.shapes()[0].shape,
        Shape::Arrow {
            p1: p(10, 10),
            p2: p(70, 10)
        }
    );
}

#[test]
fn test_cancel_drag_restores_seed() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(50, 30));
    s.set_tool(Tool::Select);
    s.begin_drag(p(30, 20));
    s.update_drag(p(60, 40), false);
    s.cancel_drag();

    assert_eq!(rect_shape(&s, 0), (p(10, 10), p(50, 30)));
    assert_eq!(s.history().len(), 2);
    assert!(!s.is_dragging());
}

#[test]
fn test_lost_button_up_ends_at_last_point() {
    let mut s = session(100, 50);
    s.begin_drag(p(10, 10));
    s.update_drag(p(40, 40), false);
    s.end_drag_at_last_point(false);

    assert!(!s.is_dragging());
    assert_eq!(rect_shape(&s, 0), (p(10, 10), p(40, 40)));
}

#[test]
fn test_end_session_discards_pending_drag() {
    let mut s = session(100, 50);
    s.begin_drag(p(10, 10));
    s.update_drag(p(40, 40), false);
    assert!(s.is_dragging());
    assert!(s.end().is_empty());
}

#[test]
fn test_end_session_keeps_committed_shapes_only() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(50, 30));
    s.set_tool(Tool::Select);
    s.begin_drag(p(30, 20));
    s.update_drag(p(60, 40), false);

    let shapes = s.end();
    assert_eq!(shapes.len(), 1);
    assert_eq!(
        shapes[0].shape,
        Shape::Rect {
            p1: p(10, 10),
            p2: p(50, 30)
        }
    );
}

#[test]
fn test_click_on_flipped_rect_keeps_history_in_sync() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(50, 30));
    s.set_tool(Tool::Select);

    // Drag the top-left corner past the bottom-right one
    s.begin_drag(p(10, 10));
    assert_eq!(s.drag().map(|d| d.mode), Some(DragMode::ResizeRectTL));
    s.end_drag(p(60, 40), false);
    assert_eq!(rect_shape(&s, 0), (p(50, 30), p(60, 40)));
    assert_eq!(s.history().len(), 3);

    // A click without movement changes nothing
    s.begin_drag(p(55, 35));
    assert!(s.is_dragging());
    s.end_drag(p(55, 35), false);
    assert_eq!(s.shapes(), s.history().current());
    assert_eq!(s.history().len(), 3);

    let before_undo = s.shapes().to_vec();
    assert!(s.undo());
    assert!(s.redo());
    assert_eq!(s.shapes(), before_undo.as_slice());
}

#[test]
fn test_escape_sequence() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Text);
    s.begin_drag(p(5, 5));
    assert!(s.is_text_editing());

    assert_eq!(s.escape(), None);
    assert!(!s.is_text_editing());
    assert!(s.selected().is_none());
    // The empty text stays.
    assert_eq!(s.shapes().len(), 1);

    s.set_tool(Tool::Rect);
    drag(&mut s, p(30, 10), p(60, 40));
    assert!(s.selected().is_some());
    assert_eq!(s.escape(), None);
    assert!(s.selected().is_none());

    assert_eq!(s.escape(), Some(Command::Close));
}

#[test]
fn test_delete_selection() {
    let mut s = session(100, 50);
    drag(&mut s, p(10, 10), p(50, 30));
    assert!(s.delete_selection());
    assert!(s.shapes().is_empty());
    assert!(s.selected().is_none());
    assert_eq!(s.history().len(), 3);
    assert!(!s.delete_selection());
}

#[test]
fn test_pencil_cannot_be_deleted_or_grabbed() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Pencil);
    drag(&mut s, p(10, 10), p(40, 40));
    assert!(!s.delete_selection());
    assert_eq!(s.shapes().len(), 1);

    s.set_tool(Tool::Select);
    assert!(s.hit_test(p(10, 10)).is_none());
}

#[test]
fn test_tool_switch_ends_editing_but_keeps_selection() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Text);
    s.begin_drag(p(5, 5));
    s.set_tool(Tool::Select);
    assert!(!s.is_text_editing());
    assert_eq!(s.selected(), Some(0));
}

#[test]
fn test_other_tool_click_ends_text_editing() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Text);
    s.begin_drag(p(5, 5));
    s.tool = Tool::Rect;
    s.begin_drag(p(60, 20));
    assert!(!s.is_text_editing());
}

#[test]
fn test_revision_tracks_changes() {
    let mut s = session(100, 50);
    let before = s.revision();
    drag(&mut s, p(10, 10), p(50, 30));
    assert!(s.revision() > before);
}

#[test]
fn test_final_scene_has_no_handles_or_placeholder() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Text);
    s.begin_drag(p(5, 5));
    s.set_tool(Tool::Rect);
    drag(&mut s, p(30, 10), p(60, 40));

    let final_cmds = final_scene(&s);
    assert_eq!(final_cmds.len(), 1);
    assert!(matches!(final_cmds[0], DrawCommand::RectOutline { .. }));

    let preview = preview_scene(&s);
    let handles = preview
        .iter()
        .filter(|c| matches!(c, DrawCommand::Handle { .. }))
        .count();
    assert_eq!(handles, 4);
    assert!(preview.iter().any(
        |c| matches!(c, DrawCommand::Text { content, .. } if content == "Text")
    ));
}

#[test]
fn test_preview_shows_caret_while_editing() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Text);
    s.begin_drag(p(5, 5));
    let preview = preview_scene(&s);
    // Empty text at size 22 is 22px wide, so the caret sits at x = 5 + 22 + 2.
    assert!(preview.iter().any(|c| matches!(
        c,
        DrawCommand::Line { from, to, .. } if *from == p(29, 5) && *to == p(29, 37)
    )));
}

#[test]
fn test_preview_includes_create_drag() {
    let mut s = session(100, 50);
    s.set_tool(Tool::Arrow);
    s.begin_drag(p(10, 10));
    s.update_drag(p(60, 10), false);

    assert!(final_scene(&s).is_empty());
    let preview = preview_scene(&s);
    assert!(preview.iter().any(|c| matches!(c, DrawCommand::Line { .. })));
    assert!(
        preview
            .iter()
            .any(|c| matches!(c, DrawCommand::FilledTriangle { .. }))
    );
}

#[test]
fn test_compose_copies_rows_past_stride_padding() {
    let frame = frame(4, 3, 8);
    let s = Session::begin(IRect::new(0, 0, 4, 3), frame.clone(), EngineSettings::default())
        .unwrap();
    let image = compose(&s, RasterRenderer::new(4, 3, None).unwrap());

    assert_eq!(image.stride, 16);
    assert_eq!(image.pixels.len(), 48);
    for y in 0..3 {
        let row = &image.pixels[y * 16..(y + 1) * 16];
        assert_eq!(row, frame.row(y as u32));
    }
}

#[test]
fn test_compose_is_deterministic_and_draws_shapes() {
    let mut s = session(64, 48);
    drag(&mut s, p(8, 8), p(40, 30));
    s.set_tool(Tool::Arrow);
    drag(&mut s, p(5, 40), p(60, 40));
    s.set_tool(Tool::Pencil);
    s.begin_drag(p(50, 5));
    s.update_drag(p(55, 10), false);
    s.end_drag(p(60, 12), false);

    let first = compose(&s, RasterRenderer::new(64, 48, None).unwrap());
    let second = compose(&s, RasterRenderer::new(64, 48, None).unwrap());
    assert_eq!(first, second);

    let background = compose(
        &session(64, 48),
        RasterRenderer::new(64, 48, None).unwrap(),
    );
    assert_ne!(first.pixels, background.pixels);

    // Rect edge pixel takes the stroke color (BGRA order).
    let i = (8 * 64 + 20) * 4;
    let px = &first.pixels[i..i + 3];
    assert!(px[2] > 240 && px[0].abs_diff(64) < 8, "got {:?}", px);
}

#[test]
fn test_compose_ignores_selection() {
    let mut s = session(64, 48);
    drag(&mut s, p(8, 8), p(40, 30));
    let selected = compose(&s, RasterRenderer::new(64, 48, None).unwrap());
    s.escape();
    let unselected = compose(&s, RasterRenderer::new(64, 48, None).unwrap());
    assert_eq!(selected, unselected);
}
