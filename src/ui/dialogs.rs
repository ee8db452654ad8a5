use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::ConfigResetNotification;
use crate::editor::{ActiveSession, EditorErrorDialog, ImagePicker, PickImageRequest};
use crate::theme;

/// Renders the error dialog for failed open, copy or save operations
pub fn error_dialog_ui(mut contexts: EguiContexts, mut dialog: ResMut<EditorErrorDialog>) -> Result {
    let Some(message) = dialog.message.clone() else {
        return Ok(());
    };

    let mut dismissed = false;
    egui::Window::new(dialog.title.as_str())
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                ui.colored_label(theme::ui::ERROR_TEXT, message);
            });
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        dialog.dismiss();
    }
    Ok(())
}

/// Renders the notice shown when the config file could not be used
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your settings could not be loaded and were reset to defaults.");
            if let Some(reason) = &notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).weak());
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
            }
        });

    Ok(())
}

/// Prompt shown while there is no screenshot to annotate
pub fn open_image_prompt_ui(
    mut contexts: EguiContexts,
    active: Res<ActiveSession>,
    picker: Res<ImagePicker>,
    mut pick_events: MessageWriter<PickImageRequest>,
) -> Result {
    if active.session.is_some() {
        return Ok(());
    }

    egui::Window::new("SnapMark")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("No screenshot open");
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new("Open an image to start annotating it.")
                        .color(theme::ui::HINT_TEXT),
                );
                ui.add_space(10.0);
                let button = egui::Button::new("Open Image...").min_size(egui::vec2(140.0, 28.0));
                if ui.add_enabled(!picker.is_open(), button).clicked() {
                    pick_events.write(PickImageRequest);
                }
            });
        });

    Ok(())
}
