//! Persistent leaderboard stored as a single JSON document

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Leaderboard, LeaderboardError, LeaderboardRow, SessionRecord};
use crate::identity::Identity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PlayerEntry {
    email: String,
    name: String,
}

/// On-disk layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BoardData {
    #[serde(default)]
    players: Vec<PlayerEntry>,
    #[serde(default)]
    sessions: Vec<SessionRecord>,
}

/// Players and sessions, rewritten atomically after every change
#[derive(Debug)]
pub struct JsonLeaderboard {
    /// None for an in-memory board
    path: Option<PathBuf>,
    data: BoardData,
}

impl JsonLeaderboard {
    /// Open (or start) the board at `path`
    ///
    /// A missing file gives an empty board. An unreadable document is moved
    /// aside with a `.corrupt` suffix and replaced by an empty board.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LeaderboardError> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<BoardData>(&json) {
                Ok(data) => {
                    log::info!(
                        "Loaded leaderboard: {} players, {} sessions",
                        data.players.len(),
                        data.sessions.len()
                    );
                    data
                }
                Err(e) => {
                    let aside = sibling(&path, "corrupt");
                    log::warn!(
                        "Leaderboard {} is corrupt ({}); moving it to {}",
                        path.display(),
                        e,
                        aside.display()
                    );
                    fs::rename(&path, &aside)?;
                    BoardData::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No leaderboard at {}, starting fresh", path.display());
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                BoardData::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// Board that is never written anywhere
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: BoardData::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn session_count(&self) -> usize {
        self.data.sessions.len()
    }

    fn save(&self) -> Result<(), LeaderboardError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp = sibling(path, "tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        log::debug!("Leaderboard saved ({} sessions)", self.data.sessions.len());
        Ok(())
    }

    fn name_for(&self, email: &str) -> Option<&str> {
        self.data
            .players
            .iter()
            .find(|p| p.email == email)
            .map(|p| p.name.as_str())
    }
}

/// `board.json` -> `board.json.<suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

impl Leaderboard for JsonLeaderboard {
    fn register_player(&mut self, identity: &Identity) -> Result<(), LeaderboardError> {
        if self.name_for(&identity.email).is_some() {
            return Ok(());
        }
        self.data.players.push(PlayerEntry {
            email: identity.email.clone(),
            name: identity.name.clone(),
        });
        log::info!("Registered player {}", identity.name);
        self.save()
    }

    fn log_session(&mut self, record: &SessionRecord) -> Result<(), LeaderboardError> {
        self.data.sessions.push(record.clone());
        log::info!("Logged session for {}: {:?}", record.email, record.scores);
        self.save()
    }

    fn player_display_name(&self, email: &str) -> Option<String> {
        self.name_for(email).map(str::to_string)
    }

    fn is_top_score(&self, score: u32) -> bool {
        self.data
            .sessions
            .iter()
            .flat_map(|s| s.scores)
            .max()
            .is_some_and(|best| best == score)
    }

    fn top_scores(&self, count: usize) -> Vec<LeaderboardRow> {
        let mut rows: Vec<LeaderboardRow> = self
            .data
            .sessions
            .iter()
            .filter_map(|s| self.name_for(&s.email).map(|name| (name, s)))
            .flat_map(|(name, s)| {
                s.scores.into_iter().map(move |score| LeaderboardRow {
                    name: name.to_string(),
                    score: Some(score),
                    session_end: Some(s.session_end),
                })
            })
            .collect();

        // Stable: ties keep session order, then slot order
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows.truncate(count);
        rows
    }

    fn is_persistent(&self) -> bool {
        true
    }
}
