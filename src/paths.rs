//! Where SnapMark keeps its files.
//!
//! Debug builds and `cargo run` keep everything next to the working
//! directory. Installed builds use the platform locations:
//! - Windows: `%APPDATA%\SnapMark\`
//! - macOS: `~/Library/Application Support/SnapMark/`
//! - Linux: `~/.config/snapmark/` for settings, `~/.local/share/snapmark/` for logs

use std::path::PathBuf;

#[cfg(target_os = "linux")]
const APP_DIR_NAME: &str = "snapmark";
#[cfg(not(target_os = "linux"))]
const APP_DIR_NAME: &str = "SnapMark";

const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "snapmark.log";

/// True for `cargo run` and debug builds.
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

fn app_dir(base: Option<PathBuf>) -> Option<PathBuf> {
    if is_dev_mode() {
        Some(PathBuf::from("."))
    } else {
        base.map(|p| p.join(APP_DIR_NAME))
    }
}

/// Directory holding `config.json`. Only Linux separates it from
/// [`data_dir`].
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        app_dir(dirs::config_dir())
    }

    #[cfg(not(target_os = "linux"))]
    {
        data_dir()
    }
}

pub fn data_dir() -> Option<PathBuf> {
    app_dir(dirs::data_dir())
}

pub fn config_file() -> PathBuf {
    config_dir()
        .unwrap_or_default()
        .join(CONFIG_FILE_NAME)
}

pub fn logs_dir() -> PathBuf {
    data_dir().unwrap_or_default().join("logs")
}

/// Name of the log file inside [`logs_dir`]
pub fn log_file_name() -> &'static str {
    LOG_FILE_NAME
}

/// Where the save dialog opens when no directory is configured: the user's
/// pictures folder, then home, then the working directory.
pub fn default_save_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Create the settings and log directories of an installed build.
pub fn ensure_directories() -> std::io::Result<()> {
    if is_dev_mode() {
        return Ok(());
    }

    for dir in [config_dir(), data_dir().map(|d| d.join("logs"))]
        .into_iter()
        .flatten()
    {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
