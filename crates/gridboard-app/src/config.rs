// User settings: stored as JSON in the platform config dir, e.g.
// ~/.config/gridboard/config.json on Linux or
// ~/Library/Application Support/gridboard/config.json on macOS.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Pixel width of the dashboard container, used to convert resize deltas.
    #[serde(default = "default_container_width")]
    pub container_width: f32,
    /// Number of snapshots kept for undo.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Pack the canvas after a move unless the command says otherwise.
    #[serde(default = "default_pack_after_move")]
    pub pack_after_move: bool,
    #[serde(default = "default_canonicalize_on_save")]
    pub canonicalize_on_save: bool,
}

fn default_container_width() -> f32 {
    1200.0
}

fn default_history_limit() -> usize {
    50
}

fn default_pack_after_move() -> bool {
    true
}

fn default_canonicalize_on_save() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            container_width: default_container_width(),
            history_limit: default_history_limit(),
            pack_after_move: default_pack_after_move(),
            canonicalize_on_save: default_canonicalize_on_save(),
        }
    }
}

pub fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("gridboard").join("config.json"))
}

/// Load settings from `path`, or from the default location when `None`.
/// A missing file gives the defaults; an unreadable or invalid one gives the
/// defaults with a warning.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let path = match path.map(Path::to_path_buf).or_else(settings_path) {
        Some(p) => p,
        None => return Settings::default(),
    };

    match std::fs::read_to_string(&path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                Settings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No settings at {}, using defaults", path.display());
            Settings::default()
        }
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            Settings::default()
        }
    }
}
