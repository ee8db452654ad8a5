//! Routing the engine's outward commands: clipboard, PNG save, exit and
//! picking a new screenshot.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, IoTaskPool, Task};
use futures_lite::future;

use crate::annotate::{Command, ComposedImage, RasterRenderer, compose};
use crate::config::{AppConfig, ConfigChange, UpdateConfigRequest};
use crate::export::{self, ExportError};
use crate::paths;

use super::source::{ActiveSession, PickImageRequest, TextFont};
use super::status::{EditorErrorDialog, StatusMessage};

/// Message asking for a command to run against the active session
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCommandRequest(pub Command);

/// A command ready to act on, with the flattened image when it needs one
#[derive(Message, Debug, Clone)]
pub struct SessionCommand {
    pub command: Command,
    pub image: Option<ComposedImage>,
}

/// Save in progress: first the file dialog, then the PNG write
#[derive(Resource, Default)]
pub struct PendingSave {
    pub image: Option<ComposedImage>,
    pub dialog: Option<Task<Option<PathBuf>>>,
    pub write: Option<Task<Result<PathBuf, ExportError>>>,
}

impl PendingSave {
    pub fn is_busy(&self) -> bool {
        self.dialog.is_some() || self.write.is_some()
    }
}

/// Flatten the session for commands that hand out pixels
pub fn compose_commands(
    mut requests: MessageReader<SessionCommandRequest>,
    active: Res<ActiveSession>,
    font: Res<TextFont>,
    mut commands_out: MessageWriter<SessionCommand>,
) {
    for SessionCommandRequest(command) in requests.read().copied() {
        let image = match (command.needs_image(), active.session.as_ref()) {
            (false, _) => None,
            (true, None) => {
                debug!("Ignoring {:?} without an active session", command);
                continue;
            }
            (true, Some(session)) => {
                let size = session.canvas_size();
                let Some(renderer) =
                    RasterRenderer::new(size.x as u32, size.y as u32, font.0.as_deref())
                else {
                    warn!("Cannot compose a {}x{} canvas", size.x, size.y);
                    continue;
                };
                Some(compose(session, renderer))
            }
        };
        commands_out.write(SessionCommand { command, image });
    }
}

/// Act on composed commands
#[allow(clippy::too_many_arguments)]
pub fn handle_session_commands(
    mut events: MessageReader<SessionCommand>,
    mut active: ResMut<ActiveSession>,
    mut pending_save: ResMut<PendingSave>,
    config: Res<AppConfig>,
    mut status: ResMut<StatusMessage>,
    mut error_dialog: ResMut<EditorErrorDialog>,
    mut pick_events: MessageWriter<PickImageRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    for event in events.read() {
        match (event.command, &event.image) {
            (Command::Copy, Some(image)) => match export::copy_to_clipboard(image) {
                Ok(()) => status.set("Copied to clipboard"),
                Err(e) => {
                    error!("{}", e);
                    error_dialog.show("Copy Failed", e.to_string());
                }
            },
            (Command::Save, Some(image)) => {
                if pending_save.is_busy() {
                    warn!("Save already in progress");
                    continue;
                }
                let directory = config
                    .data
                    .save_directory
                    .clone()
                    .unwrap_or_else(paths::default_save_dir);
                let file_name = export::default_file_name(chrono::Local::now());

                pending_save.image = Some(image.clone());
                let task_pool = AsyncComputeTaskPool::get();
                pending_save.dialog = Some(task_pool.spawn(async move {
                    rfd::AsyncFileDialog::new()
                        .set_title("Save Screenshot")
                        .add_filter("PNG Image", &["png"])
                        .set_directory(directory)
                        .set_file_name(file_name)
                        .save_file()
                        .await
                        .map(|h| h.path().to_path_buf())
                }));
            }
            (Command::Close, _) => {
                active.end();
                exit.write(AppExit::Success);
            }
            (Command::Reselect, _) => {
                active.end();
                status.set("Pick a screenshot to annotate");
                pick_events.write(PickImageRequest);
            }
            (command, None) => warn!("{:?} arrived without an image", command),
        }
    }
}

/// Poll the save dialog, then the PNG write it starts
pub fn poll_pending_save(
    mut pending_save: ResMut<PendingSave>,
    mut status: ResMut<StatusMessage>,
    mut error_dialog: ResMut<EditorErrorDialog>,
    mut config_events: MessageWriter<UpdateConfigRequest>,
) {
    if let Some(ref mut task) = pending_save.dialog
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        pending_save.dialog = None;
        match (result, pending_save.image.take()) {
            (Some(path), Some(image)) => {
                let task_pool = IoTaskPool::get();
                pending_save.write =
                    Some(task_pool.spawn(async move { export::save_png(&image, &path) }));
            }
            _ => debug!("Save cancelled"),
        }
    }

    if let Some(ref mut task) = pending_save.write
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        pending_save.write = None;
        match result {
            Ok(path) => {
                status.set(format!("Saved {}", path.display()));
                if let Some(dir) = path.parent() {
                    config_events.write(UpdateConfigRequest(ConfigChange::SaveDirectory(
                        dir.to_path_buf(),
                    )));
                }
            }
            Err(e) => {
                error!("{}", e);
                error_dialog.show("Save Failed", e.to_string());
            }
        }
    }
}
