//! Skyfall - a falling-skydiver arcade survival game
//!
//! Core modules:
//! - `sim`: Round simulation (kinematics, spawning, collisions, scoring)
//! - `session`: Three-life session flow and leaderboard submission
//! - `view`: Top-level screen state machine
//! - `render`: Draw commands handed to whatever paints the frame
//! - `leaderboard`: Persistent and promotional leaderboard backends
//! - `platform`: Terminal host glue (input, painting, storage paths)
//! - `tuning`: Data-driven game balance

pub mod clock;
pub mod identity;
pub mod input;
pub mod leaderboard;
pub mod platform;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod view;

pub use identity::Identity;
pub use leaderboard::{JsonLeaderboard, Leaderboard, LeaderboardError, PromoLeaderboard};
pub use settings::{LeaderboardMode, Settings};
pub use tuning::Tuning;
pub use view::{FrameInput, FrameOutput, ViewMachine};

/// Game configuration constants
pub mod consts {
    /// Logical screen size in pixels
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 1250.0;

    /// Frame pacing cap
    pub const TARGET_FPS: u32 = 60;
    /// Longest frame the simulation will integrate (stall protection)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Attempts per session
    pub const LIVES: u8 = 3;

    /// Skydiver sprite size
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_HEIGHT: f32 = 91.0;
    /// Hitbox inset from the sprite bounds (x, y), applied on every side
    pub const PLAYER_HITBOX_INSET_X: f32 = 20.0;
    pub const PLAYER_HITBOX_INSET_Y: f32 = 15.0;
    /// Tilt cap in degrees and per-tick tilt change
    pub const PLAYER_MAX_TILT: f32 = 15.0;
    pub const PLAYER_TILT_STEP: f32 = 1.0;

    /// Helicopter sprite size
    pub const HELICOPTER_WIDTH: f32 = 100.0;
    pub const HELICOPTER_HEIGHT: f32 = 50.0;

    /// Rows shown in leaderboard tables
    pub const LEADERBOARD_ROWS: usize = 8;
    /// Names longer than this are shortened in tables
    pub const LEADERBOARD_NAME_MAX: usize = 24;

    /// Full blink cycles (seconds), visible for the first half of each
    pub const TITLE_BLINK_PERIOD: f32 = 3.0;
    pub const CURSOR_BLINK_PERIOD: f32 = 1.0;
    pub const SCORE_BLINK_PERIOD: f32 = 1.0;
}

