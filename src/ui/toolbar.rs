use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::annotate::{Command, Tool};
use crate::constants::{MAX_STROKE_THICKNESS, MIN_STROKE_THICKNESS};
use crate::editor::{ActiveSession, SessionCommandRequest, StatusMessage};
use crate::theme::{self, annotation_colors, egui_to_rgba, rgba_to_egui};

fn tool_button(ui: &mut egui::Ui, label: &str, hover: &str, selected: bool) -> bool {
    let button = egui::Button::new(egui::RichText::new(label).size(14.0).strong())
        .min_size(egui::vec2(0.0, 28.0))
        .selected(selected);
    ui.add(button).on_hover_text(hover).clicked()
}

/// Main toolbar: tools, stroke settings, history and output commands
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut active: ResMut<ActiveSession>,
    mut requests: MessageWriter<SessionCommandRequest>,
) -> Result {
    let Some(session) = active.session.as_mut() else {
        return Ok(());
    };

    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                for tool in Tool::all() {
                    if tool_button(ui, tool.label(), tool.display_name(), session.tool() == *tool) {
                        session.set_tool(*tool);
                    }
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                for (color, name) in annotation_colors() {
                    let selected = session.stroke().color == color;
                    let button = egui::Button::new("")
                        .fill(rgba_to_egui(color))
                        .min_size(egui::vec2(18.0, 18.0))
                        .stroke(if selected {
                            egui::Stroke::new(2.0, theme::ui::SELECTED_BORDER)
                        } else {
                            egui::Stroke::new(1.0, theme::ui::UNSELECTED_BORDER)
                        });
                    if ui.add(button).on_hover_text(name).clicked() {
                        session.set_stroke_color(color);
                    }
                }

                let mut custom = rgba_to_egui(session.stroke().color);
                if ui.color_edit_button_srgba(&mut custom).changed() {
                    session.set_stroke_color(egui_to_rgba(custom));
                }

                ui.add_space(8.0);
                ui.label(egui::RichText::new("Width:").color(theme::ui::LABEL_TEXT));
                let mut thickness = session.stroke().thickness;
                let response = ui
                    .add(
                        egui::DragValue::new(&mut thickness)
                            .range(MIN_STROKE_THICKNESS..=MAX_STROKE_THICKNESS)
                            .speed(0.1)
                            .suffix(" px"),
                    )
                    .on_hover_text("[ / ] or mouse wheel");
                if response.changed() {
                    session.set_stroke_thickness(thickness);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                let history = session.history();
                let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                if ui
                    .add_enabled(can_undo, egui::Button::new("Undo"))
                    .on_hover_text("Ctrl+Z")
                    .clicked()
                {
                    session.undo();
                }
                if ui
                    .add_enabled(can_redo, egui::Button::new("Redo"))
                    .on_hover_text("Ctrl+Y")
                    .clicked()
                {
                    session.redo();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let commands = [
                        (Command::Close, "Close", "Esc"),
                        (Command::Save, "Save", "Ctrl+S"),
                        (Command::Copy, "Copy", "Ctrl+C"),
                        (Command::Reselect, "Reselect", "R"),
                    ];
                    for (command, label, shortcut) in commands {
                        if ui
                            .add(egui::Button::new(label).min_size(egui::vec2(0.0, 24.0)))
                            .on_hover_text(shortcut)
                            .clicked()
                        {
                            requests.write(SessionCommandRequest(command));
                        }
                    }
                });
            });
        });
    Ok(())
}

/// Bottom bar with the last status message and session details
pub fn status_bar_ui(
    mut contexts: EguiContexts,
    active: Res<ActiveSession>,
    status: Res<StatusMessage>,
) -> Result {
    egui::TopBottomPanel::bottom("status_bar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 4))
                .fill(theme::ui::PANEL_BACKGROUND),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                if let Some(text) = &status.text {
                    ui.label(egui::RichText::new(text).color(theme::ui::LABEL_TEXT));
                }

                let Some(session) = active.session.as_ref() else {
                    return;
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let size = session.canvas_size();
                    let hint = if session.is_text_editing() {
                        "Typing: Enter to finish, Esc to leave".to_string()
                    } else {
                        format!(
                            "{}x{}  |  {} shape(s)  |  {}",
                            size.x,
                            size.y,
                            session.shapes().len(),
                            session.tool().display_name()
                        )
                    };
                    ui.label(egui::RichText::new(hint).color(theme::ui::HINT_TEXT).size(11.0));
                });
            });
        });
    Ok(())
}
