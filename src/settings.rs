//! Host settings and preferences
//!
//! Stored as JSON next to the leaderboard. Every field has a default, so a
//! partial or older file still loads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::leaderboard::promo;
use crate::platform::storage;
use crate::tuning::Tuning;

/// Which leaderboard to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardMode {
    /// Persistent if the store opens, promotional otherwise
    #[default]
    Auto,
    Persistent,
    Promo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub leaderboard: LeaderboardMode,
    /// Overrides the default leaderboard location
    pub leaderboard_path: Option<PathBuf>,

    // === Loop ===
    pub target_fps: u32,
    /// Frames without a key repeat before a held direction lets go (0 = never)
    pub hold_window_frames: u32,

    // === HUD ===
    pub show_fps: bool,

    // === Promotional mode ===
    pub promo_title: String,
    pub promo_lines: Vec<String>,

    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            leaderboard: LeaderboardMode::Auto,
            leaderboard_path: None,

            target_fps: crate::consts::TARGET_FPS,
            // Long enough to bridge the OS auto-repeat delay
            hold_window_frames: 30,

            show_fps: false,

            promo_title: promo::DEFAULT_TITLE.to_string(),
            promo_lines: promo::default_lines(),

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// File name inside the data directory
    const FILE_NAME: &'static str = "settings.json";

    pub fn default_path() -> PathBuf {
        storage::data_dir().join(Self::FILE_NAME)
    }

    /// Where the persistent leaderboard lives
    pub fn leaderboard_path(&self) -> PathBuf {
        self.leaderboard_path
            .clone()
            .unwrap_or_else(storage::leaderboard_file)
    }

    /// Load settings; anything missing or unreadable falls back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring bad settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
