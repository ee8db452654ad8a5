//! User settings stored in `config.json`.
//!
//! The file is read once at startup. Editor systems report changes with
//! [`UpdateConfigRequest`]; the file is rewritten only when a change
//! actually altered a value.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::annotate::{EngineSettings, Rgba};
use crate::constants::{
    DEFAULT_FONT_FAMILY, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_THICKNESS, DEFAULT_TEXT_SIZE,
    HANDLE_SIZE, HIT_TOLERANCE, MAX_HISTORY_SIZE, MAX_STROKE_THICKNESS, MIN_STROKE_THICKNESS,
};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Settings persisted between runs. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfigData {
    /// Color given to newly drawn shapes
    pub stroke_color: Rgba,
    /// Thickness given to newly drawn shapes
    pub stroke_thickness: i32,
    /// Font height for newly placed text
    pub text_size: i32,
    /// Pick radius for handles and endpoints
    pub hit_tolerance: i32,
    pub handle_size: i32,
    /// Number of undo snapshots to keep
    pub history_depth: usize,
    pub font_family: String,
    /// Directory the save dialog opens in (defaults to the pictures folder)
    pub save_directory: Option<PathBuf>,
    pub last_image_path: Option<PathBuf>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR,
            stroke_thickness: DEFAULT_STROKE_THICKNESS,
            text_size: DEFAULT_TEXT_SIZE,
            hit_tolerance: HIT_TOLERANCE,
            handle_size: HANDLE_SIZE,
            history_depth: MAX_HISTORY_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            save_directory: None,
            last_image_path: None,
        }
    }
}

impl AppConfigData {
    /// Engine tunables, with out-of-range values pulled back to sane limits.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            hit_tolerance: self.hit_tolerance.max(1),
            handle_size: self.handle_size.max(2),
            text_size: self.text_size.clamp(8, 200),
            history_depth: self.history_depth,
            stroke_color: self.stroke_color,
            stroke_thickness: self
                .stroke_thickness
                .clamp(MIN_STROKE_THICKNESS, MAX_STROKE_THICKNESS),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration file: {0}")]
    Read(#[source] std::io::Error),

    #[error("Configuration file was corrupted: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write config: {0}")]
    Write(#[source] std::io::Error),
}

/// Read settings from `path`. A missing file is not an error.
pub fn read_config(path: &Path) -> Result<Option<AppConfigData>, ConfigError> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::Read(e)),
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(ConfigError::Parse)
}

pub fn write_config(data: &AppConfigData, path: &Path) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(data).map_err(ConfigError::Serialize)?;
    std::fs::write(path, json).map_err(ConfigError::Write)
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    pub data: AppConfigData,
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    pub reason: Option<String>,
}

/// A single setting the editor wants remembered
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigChange {
    StrokeDefaults { color: Rgba, thickness: i32 },
    LastImagePath(PathBuf),
    SaveDirectory(PathBuf),
}

impl ConfigChange {
    /// Apply to `data`. Returns false when nothing changed.
    pub fn apply(self, data: &mut AppConfigData) -> bool {
        match self {
            ConfigChange::StrokeDefaults { color, thickness } => {
                let changed = data.stroke_color != color || data.stroke_thickness != thickness;
                data.stroke_color = color;
                data.stroke_thickness = thickness;
                changed
            }
            ConfigChange::LastImagePath(path) => {
                replace_if_changed(&mut data.last_image_path, path)
            }
            ConfigChange::SaveDirectory(path) => {
                replace_if_changed(&mut data.save_directory, path)
            }
        }
    }
}

fn replace_if_changed(slot: &mut Option<PathBuf>, path: PathBuf) -> bool {
    if slot.as_ref() == Some(&path) {
        return false;
    }
    *slot = Some(path);
    true
}

/// Message to update and persist a setting
#[derive(Message)]
pub struct UpdateConfigRequest(pub ConfigChange);

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    match read_config(&config.config_path) {
        Ok(Some(data)) => {
            info!("Loaded config from {:?}", config.config_path);
            config.data = data;
        }
        Ok(None) => info!("No config file found, using defaults"),
        Err(e) => {
            warn!("{}", e);
            config.data = AppConfigData::default();
            reset_notification.show = true;
            reset_notification.reason = Some(e.to_string());
        }
    }
}

/// Apply every pending change, then write the file once if any stuck
fn update_config_system(
    mut events: MessageReader<UpdateConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    let mut dirty = false;
    for UpdateConfigRequest(change) in events.read() {
        debug!("Config change: {:?}", change);
        dirty |= change.clone().apply(&mut config.data);
    }
    if !dirty {
        return;
    }

    match write_config(&config.data, &config.config_path) {
        Ok(()) => info!("Config saved to {:?}", config.config_path),
        Err(e) => error!("{}", e),
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<UpdateConfigRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                update_config_system.run_if(on_message::<UpdateConfigRequest>),
            );
    }
}
