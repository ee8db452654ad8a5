//! Where sessions come from: loading a screenshot into a frozen frame and
//! starting an annotation session over it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy::math::IRect;
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;
use rusttype::Font;

use crate::annotate::fonts::load_system_font;
use crate::annotate::{FontTextMetrics, FrozenFrame, Session};
use crate::config::{AppConfig, ConfigChange, UpdateConfigRequest};

use super::status::{EditorErrorDialog, StatusMessage};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp", "gif", "tif", "tiff"];

/// The session being edited, if any.
#[derive(Resource, Default)]
pub struct ActiveSession {
    pub session: Option<Session>,
    /// Bumped every time a new session replaces the old one
    pub generation: u64,
}

impl ActiveSession {
    /// Install `session`, ending the previous one.
    pub fn replace(&mut self, session: Session) {
        if let Some(previous) = self.session.replace(session) {
            previous.end();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn end(&mut self) {
        if let Some(previous) = self.session.take() {
            previous.end();
            self.generation = self.generation.wrapping_add(1);
        }
    }
}

/// Font used to draw and measure text annotations.
#[derive(Resource, Default)]
pub struct TextFont(pub Option<Arc<Font<'static>>>);

/// Message to open a screenshot file for annotation
#[derive(Message)]
pub struct OpenImageRequest {
    pub path: PathBuf,
}

/// Message to ask the user for a screenshot file
#[derive(Message)]
pub struct PickImageRequest;

/// Pending native file dialog for picking a screenshot
#[derive(Resource, Default)]
pub struct ImagePicker {
    pub pending: Option<Task<Option<PathBuf>>>,
}

impl ImagePicker {
    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }
}

/// Decode an image file into a tightly packed RGBA frame.
pub fn load_frame(path: &Path) -> Result<FrozenFrame, image::ImageError> {
    let image = image::open(path)?.to_rgba8();
    Ok(FrozenFrame::from_rgba_image(image))
}

/// Startup system to look up the configured text font
pub fn load_text_font(config: Res<AppConfig>, mut font: ResMut<TextFont>) {
    font.0 = load_system_font(&config.data.font_family).map(Arc::new);
    if font.0.is_none() {
        warn!(
            "No usable font for family {:?}; text annotations will not be drawn",
            config.data.font_family
        );
    }
}

/// Startup system to open the image named on the command line
pub fn open_initial_image(mut open_events: MessageWriter<OpenImageRequest>) {
    if let Some(arg) = std::env::args_os().nth(1) {
        open_events.write(OpenImageRequest {
            path: PathBuf::from(arg),
        });
    }
}

/// Spawn a native file dialog when a pick is requested
pub fn pick_image_system(
    mut events: MessageReader<PickImageRequest>,
    mut picker: ResMut<ImagePicker>,
    config: Res<AppConfig>,
) {
    if events.read().count() == 0 || picker.is_open() {
        return;
    }

    let start_dir = config
        .data
        .last_image_path
        .as_ref()
        .and_then(|p| p.parent())
        .map(Path::to_path_buf);

    let task_pool = AsyncComputeTaskPool::get();
    picker.pending = Some(task_pool.spawn(async move {
        let mut dialog = rfd::AsyncFileDialog::new()
            .set_title("Open Screenshot")
            .add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = start_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file().await.map(|h| h.path().to_path_buf())
    }));
}

/// Poll the pending file dialog
pub fn poll_image_picker(
    mut picker: ResMut<ImagePicker>,
    mut open_events: MessageWriter<OpenImageRequest>,
) {
    if let Some(ref mut task) = picker.pending
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        picker.pending = None;
        if let Some(path) = result {
            open_events.write(OpenImageRequest { path });
        }
    }
}

/// Load the requested image and start a session over it
pub fn open_image_system(
    mut events: MessageReader<OpenImageRequest>,
    mut active: ResMut<ActiveSession>,
    config: Res<AppConfig>,
    font: Res<TextFont>,
    mut status: ResMut<StatusMessage>,
    mut error_dialog: ResMut<EditorErrorDialog>,
    mut config_events: MessageWriter<UpdateConfigRequest>,
) {
    // Only the newest request matters
    let Some(event) = events.read().last() else {
        return;
    };
    let path = event.path.clone();

    let frame = match load_frame(&path) {
        Ok(frame) => frame,
        Err(e) => {
            error!("Failed to load {:?}: {}", path, e);
            error_dialog.show("Open Failed", format!("Could not open {}: {}", path.display(), e));
            return;
        }
    };

    let screen_rect = IRect::new(0, 0, frame.width as i32, frame.height as i32);
    let session = match Session::begin(screen_rect, frame, config.data.engine_settings()) {
        Ok(session) => session,
        Err(e) => {
            error!("Could not start a session for {:?}: {}", path, e);
            error_dialog.show("Open Failed", e.to_string());
            return;
        }
    };
    let session = match &font.0 {
        Some(font) => session.with_text_metrics(Arc::new(FontTextMetrics::new(font.clone()))),
        None => session,
    };

    let size = session.canvas_size();
    active.replace(session);
    status.set(format!(
        "Opened {} ({}x{})",
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string()),
        size.x,
        size.y
    ));
    config_events.write(UpdateConfigRequest(ConfigChange::LastImagePath(path)));
}

/// Persist stroke changes from the toolbar, keys or wheel as the defaults
/// for the next session
pub fn remember_stroke_defaults(
    active: Res<ActiveSession>,
    config: Res<AppConfig>,
    mut config_events: MessageWriter<UpdateConfigRequest>,
) {
    let Some(session) = active.session.as_ref() else {
        return;
    };
    let stroke = session.stroke();
    if stroke.color != config.data.stroke_color || stroke.thickness != config.data.stroke_thickness
    {
        config_events.write(UpdateConfigRequest(ConfigChange::StrokeDefaults {
            color: stroke.color,
            thickness: stroke.thickness,
        }));
    }
}
