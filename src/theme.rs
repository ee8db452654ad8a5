//! Centralized color theme for the application.
//!
//! This module provides all colors used throughout the editor UI.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

use crate::annotate::Rgba;

// ============================================================================
// Canvas
// ============================================================================

/// Window clear color around the canvas
pub const CANVAS_BACKDROP: Color = Color::srgb(0.12, 0.12, 0.13);

// ============================================================================
// Annotation Colors
// ============================================================================

/// Annotation color palette for the toolbar picker
pub fn annotation_colors() -> [(Rgba, &'static str); 8] {
    [
        (Rgba::rgb(255, 80, 64), "Red"),
        (Rgba::rgb(255, 160, 0), "Orange"),
        (Rgba::rgb(255, 220, 0), "Yellow"),
        (Rgba::rgb(0, 200, 80), "Green"),
        (Rgba::rgb(40, 120, 255), "Blue"),
        (Rgba::rgb(160, 80, 220), "Purple"),
        (Rgba::rgb(0, 0, 0), "Black"),
        (Rgba::rgb(255, 255, 255), "White"),
    ]
}

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Dark grey panel background (status bar)
    pub const PANEL_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(45, 45, 48);

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// White for selected button borders
    pub const SELECTED_BORDER: egui::Color32 = egui::Color32::WHITE;

    /// Dark grey for unselected button borders
    pub const UNSELECTED_BORDER: egui::Color32 = egui::Color32::DARK_GRAY;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::RED;
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert an annotation color to egui Color32
pub fn rgba_to_egui(color: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Convert an egui Color32 to an annotation color
pub fn egui_to_rgba(color: egui::Color32) -> Rgba {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Rgba { r, g, b, a }
}
