use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use mandelzoom_core::{ZOOM_FRAME_COUNT, ZOOM_FRAME_INTERVAL};
use mandelzoom_render::DEFAULT_TILE_COUNT;

// ---------------------------------------------------------------------------
// Zoom script
// ---------------------------------------------------------------------------

/// One scripted mouse-wheel gesture: `clicks` notches at panel pixel `(x, y)`.
/// Positive clicks zoom in, negative clicks zoom out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomGesture {
    pub x: i32,
    pub y: i32,
    pub clicks: i32,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Settings persisted in `preferences.json` beside the executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Preset loaded at startup, matched ignoring case.
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default = "default_zoom_script")]
    pub zoom_script: Vec<ZoomGesture>,
    #[serde(default = "default_animation_frames")]
    pub animation_frames: u32,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_tile_count")]
    pub tile_count: u32,
    #[serde(default = "default_true")]
    pub chain_supersample: bool,
}

fn default_window_width() -> u32 {
    800
}
fn default_window_height() -> u32 {
    600
}
fn default_preset() -> String {
    "Default".into()
}
fn default_zoom_script() -> Vec<ZoomGesture> {
    vec![
        ZoomGesture { x: 520, y: 300, clicks: 2 },
        ZoomGesture { x: 400, y: 120, clicks: 1 },
        ZoomGesture { x: 400, y: 300, clicks: -1 },
    ]
}
fn default_animation_frames() -> u32 {
    ZOOM_FRAME_COUNT
}
fn default_frame_interval_ms() -> u64 {
    ZOOM_FRAME_INTERVAL.as_millis() as u64
}
fn default_tile_count() -> u32 {
    DEFAULT_TILE_COUNT
}
fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            preset: default_preset(),
            zoom_script: default_zoom_script(),
            animation_frames: default_animation_frames(),
            frame_interval_ms: default_frame_interval_ms(),
            tile_count: default_tile_count(),
            chain_supersample: true,
        }
    }
}

impl Preferences {
    /// Load preferences from beside the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&preferences_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<Preferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&preferences_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create preferences directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }
}

fn preferences_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}
