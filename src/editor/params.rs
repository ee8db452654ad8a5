//! SystemParam bundles shared by the editor's input systems.

use bevy::ecs::system::SystemParam;
use bevy::math::IVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::canvas::{CanvasCamera, world_to_canvas};

/// Bundled camera and window queries for cursor-to-canvas calculations
#[derive(SystemParam)]
pub struct CanvasParams<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<CanvasCamera>>,
}

impl CanvasParams<'_, '_> {
    /// Get the world position of the cursor, if available
    pub fn cursor_world_pos(&self) -> Option<Vec2> {
        let window = self.window.single().ok()?;
        let (camera, transform) = self.camera.single().ok()?;
        let cursor_pos = window.cursor_position()?;
        camera.viewport_to_world_2d(transform, cursor_pos).ok()
    }

    /// Cursor position in canvas pixels for a canvas of `size`. May lie
    /// outside the canvas.
    pub fn cursor_canvas_pos(&self, size: IVec2) -> Option<IVec2> {
        self.cursor_world_pos().map(|world| world_to_canvas(world, size))
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}

/// Check if an egui widget has keyboard focus
pub fn egui_wants_keyboard(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false)
}
