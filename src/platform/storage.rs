//! On-disk locations

use std::path::PathBuf;

const APP_DIR: &str = "skyfall";

/// Per-user data directory (`./skyfall` if the OS has none)
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn leaderboard_file() -> PathBuf {
    data_dir().join("leaderboard.json")
}

/// Where the logger writes while the terminal is in raw mode
pub fn log_file() -> PathBuf {
    data_dir().join("skyfall.log")
}
