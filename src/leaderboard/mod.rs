//! Leaderboard storage
//!
//! Two implementations sit behind one trait: a persistent JSON store keyed by
//! email, and a promotional null object that accepts everything and only ever
//! shows a fixed message. The choice is made once at startup.

mod json;
pub mod promo;

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::settings::{LeaderboardMode, Settings};

pub use json::JsonLeaderboard;
pub use promo::PromoLeaderboard;

/// Heading shown above a persistent board
pub const HIGH_SCORES_TITLE: &str = "High Scores";

/// One logged session (immutable once written)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub email: String,
    /// Unix milliseconds
    pub session_start: f64,
    /// Unix milliseconds
    pub session_end: f64,
    pub scores: [u32; 3],
}

/// One displayed leaderboard line
///
/// Promotional lines carry text only.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub name: String,
    pub score: Option<u32>,
    pub session_end: Option<f64>,
}

impl LeaderboardRow {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: None,
            session_end: None,
        }
    }
}

/// Leaderboard failure; always recoverable by the caller
#[derive(Debug)]
pub enum LeaderboardError {
    Io(io::Error),
    Corrupt(serde_json::Error),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderboardError::Io(e) => write!(f, "leaderboard I/O error: {}", e),
            LeaderboardError::Corrupt(e) => write!(f, "leaderboard data is corrupt: {}", e),
        }
    }
}

impl std::error::Error for LeaderboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeaderboardError::Io(e) => Some(e),
            LeaderboardError::Corrupt(e) => Some(e),
        }
    }
}

impl From<io::Error> for LeaderboardError {
    fn from(e: io::Error) -> Self {
        LeaderboardError::Io(e)
    }
}

impl From<serde_json::Error> for LeaderboardError {
    fn from(e: serde_json::Error) -> Self {
        LeaderboardError::Corrupt(e)
    }
}

pub trait Leaderboard {
    /// Add a player keyed by email; an existing name is never overwritten
    fn register_player(&mut self, identity: &Identity) -> Result<(), LeaderboardError>;

    /// Append one finished session
    fn log_session(&mut self, record: &SessionRecord) -> Result<(), LeaderboardError>;

    fn player_display_name(&self, email: &str) -> Option<String>;

    /// True iff `score` equals the best single score ever logged
    fn is_top_score(&self, score: u32) -> bool;

    /// Best `count` rows, highest score first
    fn top_scores(&self, count: usize) -> Vec<LeaderboardRow>;

    /// Whether players and scores are actually kept
    fn is_persistent(&self) -> bool;

    /// Heading drawn above the table
    fn title(&self) -> &str {
        HIGH_SCORES_TITLE
    }
}

/// Pick the leaderboard for this run
///
/// `Auto` tries the JSON store and falls back to promotional mode when it
/// can't be opened.
pub fn select(settings: &Settings) -> Box<dyn Leaderboard> {
    let path = settings.leaderboard_path();
    match settings.leaderboard {
        LeaderboardMode::Promo => {
            log::info!("Leaderboard: promotional mode");
            Box::new(PromoLeaderboard::from_settings(settings))
        }
        LeaderboardMode::Persistent | LeaderboardMode::Auto => match JsonLeaderboard::open(&path)
        {
            Ok(board) => {
                log::info!("Leaderboard: {}", path.display());
                Box::new(board)
            }
            Err(e) => {
                log::warn!(
                    "Could not open leaderboard at {}: {}; using promotional mode",
                    path.display(),
                    e
                );
                Box::new(PromoLeaderboard::from_settings(settings))
            }
        },
    }
}

/// Shorten long names for the table
pub fn display_name(name: &str) -> String {
    const KEEP: usize = crate::consts::LEADERBOARD_NAME_MAX - 1;
    if name.chars().count() <= crate::consts::LEADERBOARD_NAME_MAX {
        name.to_string()
    } else {
        let head: String = name.chars().take(KEEP).collect();
        format!("{}...", head)
    }
}
