//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

use crate::annotate::Rgba;

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;

/// Height reserved for the toolbar and status bar panels
pub const TOOLBAR_HEIGHT: f32 = 48.0;

/// Gap kept around the canvas when fitting it into the window
pub const CANVAS_MARGIN: f32 = 16.0;

/// Pick radius for rect corners and line endpoints, in canvas pixels
pub const HIT_TOLERANCE: i32 = 8;

/// Edge length of the square selection handles
pub const HANDLE_SIZE: i32 = 8;

/// Smallest span a created shape must have to be kept
pub const MIN_SHAPE_SIZE: i32 = 1;

pub const DEFAULT_STROKE_COLOR: Rgba = Rgba::rgb(255, 80, 64);

pub const DEFAULT_STROKE_THICKNESS: i32 = 2;
pub const MIN_STROKE_THICKNESS: i32 = 1;
pub const MAX_STROKE_THICKNESS: i32 = 10;

/// Font height for newly placed text
pub const DEFAULT_TEXT_SIZE: i32 = 22;

/// Drawn in place of an empty text annotation so it stays visible
pub const TEXT_PLACEHOLDER: &str = "Text";

/// Horizontal gap between the end of the text and the caret
pub const CARET_GAP: i32 = 2;

/// Maximum number of snapshots to keep in history
pub const MAX_HISTORY_SIZE: usize = 100;

/// Font family looked up for text annotations
pub const DEFAULT_FONT_FAMILY: &str = "Sans";
