mod canvas;
pub mod commands;
mod conditions;
mod cursor;
mod input;
pub mod params;
mod rendering;
pub mod source;
pub mod status;

pub use commands::{PendingSave, SessionCommand, SessionCommandRequest};
pub use source::{ActiveSession, ImagePicker, OpenImageRequest, PickImageRequest, TextFont};
pub use status::{EditorErrorDialog, StatusMessage};

use bevy::prelude::*;

use crate::config::ConfigLoaded;

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveSession>()
            .init_resource::<TextFont>()
            .init_resource::<ImagePicker>()
            .init_resource::<PendingSave>()
            .init_resource::<canvas::CanvasImages>()
            .init_resource::<StatusMessage>()
            .init_resource::<EditorErrorDialog>()
            .add_message::<OpenImageRequest>()
            .add_message::<PickImageRequest>()
            .add_message::<SessionCommandRequest>()
            .add_message::<SessionCommand>()
            .add_systems(Startup, canvas::spawn_camera)
            .add_systems(
                Startup,
                (source::load_text_font, source::open_initial_image)
                    .chain()
                    .after(ConfigLoaded),
            )
            // Input runs in a fixed order so a frame's press, moves and
            // release reach the session in sequence
            .add_systems(
                Update,
                (
                    input::handle_focus_loss,
                    input::handle_pointer,
                    input::handle_wheel,
                    input::handle_keyboard,
                )
                    .chain()
                    .run_if(conditions::session_is_active)
                    .run_if(conditions::no_dialog_open),
            )
            .add_systems(
                Update,
                (
                    commands::compose_commands.run_if(on_message::<SessionCommandRequest>),
                    commands::handle_session_commands.run_if(on_message::<SessionCommand>),
                    commands::poll_pending_save,
                    source::pick_image_system.run_if(on_message::<PickImageRequest>),
                    source::poll_image_picker,
                    source::open_image_system.run_if(on_message::<OpenImageRequest>),
                    source::remember_stroke_defaults,
                    canvas::sync_canvas_sprites,
                    canvas::fit_camera_to_canvas,
                    rendering::refresh_overlay,
                    cursor::update_cursor_icon,
                )
                    .chain()
                    .after(input::handle_keyboard),
            );
    }
}
