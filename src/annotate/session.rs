//! Annotation session: one editing session bound to one frozen frame.

use std::sync::Arc;

use bevy::log::{debug, info};
use bevy::math::{IRect, IVec2};
use thiserror::Error;

use super::history::History;
use super::hit_testing::{Hit, hit_test};
use super::interaction::DragState;
use super::model::{Annotation, HeuristicTextMetrics, Rgba, ShapeBounds, StrokeStyle, TextMetrics};
use super::tools::Tool;
use crate::constants::{
    DEFAULT_STROKE_COLOR, DEFAULT_STROKE_THICKNESS, DEFAULT_TEXT_SIZE, HANDLE_SIZE,
    HIT_TOLERANCE, MAX_HISTORY_SIZE, MAX_STROKE_THICKNESS, MIN_STROKE_THICKNESS,
};

/// Byte order of each 4-byte pixel in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// Blue, green, red, alpha; the layout of screen captures.
    #[default]
    Bgra8,
    Rgba8,
}

impl PixelFormat {
    /// Byte offsets of the red, green, blue and alpha channels.
    pub fn channel_offsets(&self) -> [usize; 4] {
        match self {
            PixelFormat::Bgra8 => [2, 1, 0, 3],
            PixelFormat::Rgba8 => [0, 1, 2, 3],
        }
    }
}

/// Immutable background pixels of a session.
#[derive(Debug, Clone)]
pub struct FrozenFrame {
    pub pixels: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
    /// Bytes per row, at least `width * 4`.
    pub row_stride: usize,
    pub format: PixelFormat,
}

impl FrozenFrame {
    /// Wrap captured pixels as they came from the platform. Validated by
    /// [`Session::begin`].
    pub fn from_raw(
        pixels: impl Into<Arc<[u8]>>,
        width: u32,
        height: u32,
        row_stride: usize,
        format: PixelFormat,
    ) -> Self {
        Self {
            pixels: pixels.into(),
            width,
            height,
            row_stride,
            format,
        }
    }

    /// Tightly packed RGBA frame from a decoded image.
    pub fn from_rgba_image(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_raw(
            image.into_raw(),
            width,
            height,
            width as usize * 4,
            PixelFormat::Rgba8,
        )
    }

    /// Row `y` without the stride padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.row_stride;
        &self.pixels[start..start + self.width as usize * 4]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("background buffer is empty")]
    EmptyBuffer,
    #[error("frame size {width}x{height} must be positive")]
    InvalidSize { width: u32, height: u32 },
    #[error("row stride {stride} is smaller than {min} bytes")]
    StrideTooSmall { stride: usize, min: usize },
    #[error("background buffer holds {len} bytes, expected at least {expected}")]
    BufferTooShort { len: usize, expected: usize },
}

/// Outward requests the host routes to clipboard, file, exit or re-capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Copy,
    Save,
    Close,
    Reselect,
}

impl Command {
    /// Whether the host needs the flattened image to carry out the command.
    pub fn needs_image(&self) -> bool {
        matches!(self, Command::Copy | Command::Save)
    }
}

/// Tunables applied when a session begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub hit_tolerance: i32,
    pub handle_size: i32,
    pub text_size: i32,
    pub history_depth: usize,
    pub stroke_color: Rgba,
    pub stroke_thickness: i32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            hit_tolerance: HIT_TOLERANCE,
            handle_size: HANDLE_SIZE,
            text_size: DEFAULT_TEXT_SIZE,
            history_depth: MAX_HISTORY_SIZE,
            stroke_color: DEFAULT_STROKE_COLOR,
            stroke_thickness: DEFAULT_STROKE_THICKNESS,
        }
    }
}

/// All editing state for one screenshot.
///
/// `text_edit`, when set, always equals `selected` and points at a text
/// shape.
pub struct Session {
    pub(super) frame: FrozenFrame,
    pub(super) shapes: Vec<Annotation>,
    pub(super) history: History,
    pub(super) selected: Option<usize>,
    pub(super) text_edit: Option<usize>,
    pub(super) tool: Tool,
    pub(super) stroke: StrokeStyle,
    pub(super) drag: Option<DragState>,
    pub(super) settings: EngineSettings,
    pub(super) metrics: Arc<dyn TextMetrics>,
    pub(super) revision: u64,
}

impl Session {
    /// Start a session over `frame`, which came from `screen_rect` on screen.
    pub fn begin(
        screen_rect: IRect,
        frame: FrozenFrame,
        settings: EngineSettings,
    ) -> Result<Self, SessionError> {
        if frame.pixels.is_empty() {
            return Err(SessionError::EmptyBuffer);
        }
        if frame.width == 0 || frame.height == 0 || i32::try_from(frame.width).is_err()
            || i32::try_from(frame.height).is_err()
        {
            return Err(SessionError::InvalidSize {
                width: frame.width,
                height: frame.height,
            });
        }
        let min_stride = frame.width as usize * 4;
        if frame.row_stride < min_stride {
            return Err(SessionError::StrideTooSmall {
                stride: frame.row_stride,
                min: min_stride,
            });
        }
        let expected = frame.row_stride * frame.height as usize;
        if frame.pixels.len() < expected {
            return Err(SessionError::BufferTooShort {
                len: frame.pixels.len(),
                expected,
            });
        }

        info!(
            "Annotation session started: {}x{} frame at {:?}",
            frame.width, frame.height, screen_rect
        );

        Ok(Self {
            frame,
            shapes: Vec::new(),
            history: History::new(settings.history_depth),
            selected: None,
            text_edit: None,
            tool: Tool::default(),
            stroke: StrokeStyle {
                color: settings.stroke_color,
                thickness: settings
                    .stroke_thickness
                    .clamp(MIN_STROKE_THICKNESS, MAX_STROKE_THICKNESS),
            },
            drag: None,
            settings,
            metrics: Arc::new(HeuristicTextMetrics),
            revision: 0,
        })
    }

    /// Replace the text measurement used for text bounds.
    pub fn with_text_metrics(mut self, metrics: Arc<dyn TextMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Finish the session, dropping any in-progress drag uncommitted.
    /// Returns the shapes that were committed.
    pub fn end(mut self) -> Vec<Annotation> {
        self.cancel_drag();
        info!(
            "Annotation session ended with {} shape(s)",
            self.shapes.len()
        );
        self.shapes
    }

    pub fn frame(&self) -> &FrozenFrame {
        &self.frame
    }

    pub fn shapes(&self) -> &[Annotation] {
        &self.shapes
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_text_editing(&self) -> bool {
        self.text_edit.is_some()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Style applied to newly created shapes.
    pub fn stroke(&self) -> StrokeStyle {
        self.stroke
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Bumped on every change that affects what is drawn.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn canvas_size(&self) -> IVec2 {
        IVec2::new(self.frame.width as i32, self.frame.height as i32)
    }

    pub fn bounds(&self) -> ShapeBounds<'_> {
        ShapeBounds {
            canvas_w: self.frame.width as i32,
            canvas_h: self.frame.height as i32,
            metrics: self.metrics.as_ref(),
        }
    }

    /// Topmost shape under `point` that the active tool may pick.
    pub fn hit_test(&self, point: IVec2) -> Option<Hit> {
        hit_test(
            &self.shapes,
            self.tool,
            point,
            self.settings.hit_tolerance,
            &self.bounds(),
        )
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.text_edit = None;
        self.touch();
        debug!("Tool set to {:?}", tool);
    }

    pub fn set_stroke_color(&mut self, color: Rgba) {
        self.stroke.color = color;
    }

    pub fn set_stroke_thickness(&mut self, thickness: i32) {
        self.stroke.thickness = thickness.clamp(MIN_STROKE_THICKNESS, MAX_STROKE_THICKNESS);
    }

    pub fn thicker(&mut self) {
        self.set_stroke_thickness(self.stroke.thickness + 1);
    }

    pub fn thinner(&mut self) {
        self.set_stroke_thickness(self.stroke.thickness - 1);
    }

    /// Restore the previous snapshot. Selection and text editing are always
    /// cleared.
    pub fn undo(&mut self) -> bool {
        self.cancel_drag();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.shapes = snapshot.to_vec();
        self.clear_selection();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_drag();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.shapes = snapshot.to_vec();
        self.clear_selection();
        true
    }

    /// Remove the selected shape. Non-editable shapes are never removed.
    pub fn delete_selection(&mut self) -> bool {
        self.cancel_drag();
        let Some(index) = self.selected else {
            return false;
        };
        if !self.shapes.get(index).is_some_and(Annotation::is_editable) {
            return false;
        }
        self.shapes.remove(index);
        self.clear_selection();
        self.push_history();
        true
    }

    pub(super) fn clear_selection(&mut self) {
        self.selected = None;
        self.text_edit = None;
        self.touch();
    }

    pub(super) fn push_history(&mut self) {
        self.history.push(&self.shapes);
    }

    pub(super) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
