mod dialogs;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::ConfigResetNotification;
use crate::editor::{EditorErrorDialog, ImagePicker, PendingSave};

/// Whether a modal window or native dialog currently owns the user's
/// attention. Canvas input is ignored while it does.
#[derive(Resource, Default)]
pub struct DialogState {
    pub any_modal_open: bool,
}

fn update_dialog_state(
    config_reset: Res<ConfigResetNotification>,
    error_dialog: Res<EditorErrorDialog>,
    picker: Res<ImagePicker>,
    pending_save: Res<PendingSave>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = config_reset.show
        || error_dialog.is_open()
        || picker.is_open()
        || pending_save.dialog.is_some();
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .add_systems(
                EguiPrimaryContextPass,
                // Panels first so the dialogs layer on top
                (toolbar::toolbar_ui, toolbar::status_bar_ui).chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    dialogs::open_image_prompt_ui,
                    dialogs::error_dialog_ui,
                    dialogs::config_reset_notification_ui,
                )
                    .after(toolbar::status_bar_ui),
            )
            // Before any input system sees the frame
            .add_systems(First, update_dialog_state);
    }
}
