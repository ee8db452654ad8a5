use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use super::params::{CanvasParams, is_cursor_over_ui};
use super::source::ActiveSession;

/// Cursor follows the drag in progress, else what is under the pointer,
/// else the active tool
pub fn update_cursor_icon(
    active: Res<ActiveSession>,
    canvas: CanvasParams,
    window_query: Query<(Entity, Option<&CursorIcon>), With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok((entity, current)) = window_query.single() else {
        return;
    };

    let icon = match active.session.as_ref() {
        _ if is_cursor_over_ui(&mut contexts) => CursorIcon::System(SystemCursorIcon::Default),
        None => CursorIcon::System(SystemCursorIcon::Default),
        Some(session) => {
            let dragged = session.drag().and_then(|d| d.mode.cursor_icon());
            let hovered = || {
                canvas
                    .cursor_canvas_pos(session.canvas_size())
                    .and_then(|p| session.hit_test(p))
                    .and_then(|hit| hit.mode.cursor_icon())
            };
            dragged
                .or_else(hovered)
                .unwrap_or_else(|| session.tool().cursor_icon())
        }
    };

    if current != Some(&icon) {
        commands.entity(entity).insert(icon);
    }
}
