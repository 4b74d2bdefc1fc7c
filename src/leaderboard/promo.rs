//! Promotional (non-persistent) leaderboard

use super::{Leaderboard, LeaderboardError, LeaderboardRow, SessionRecord};
use crate::identity::Identity;
use crate::settings::Settings;

pub const DEFAULT_TITLE: &str = "Play at our booth to win!";

/// Lines shown in place of scores
pub fn default_lines() -> Vec<String> {
    [
        "Visit our booth to compete!",
        "",
        "     Win a prize     ",
        "",
        "",
        "",
        "See you there!",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Accepts every write, stores nothing, always shows the same message
#[derive(Debug, Clone)]
pub struct PromoLeaderboard {
    title: String,
    lines: Vec<String>,
}

impl Default for PromoLeaderboard {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, default_lines())
    }
}

impl PromoLeaderboard {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.promo_title.clone(), settings.promo_lines.clone())
    }
}

impl Leaderboard for PromoLeaderboard {
    fn register_player(&mut self, _identity: &Identity) -> Result<(), LeaderboardError> {
        Ok(())
    }

    fn log_session(&mut self, record: &SessionRecord) -> Result<(), LeaderboardError> {
        log::debug!("Promo mode: session {:?} not kept", record.scores);
        Ok(())
    }

    fn player_display_name(&self, _email: &str) -> Option<String> {
        None
    }

    fn is_top_score(&self, _score: u32) -> bool {
        false
    }

    fn top_scores(&self, count: usize) -> Vec<LeaderboardRow> {
        self.lines
            .iter()
            .take(count)
            .map(|line| LeaderboardRow::text(line.as_str()))
            .collect()
    }

    fn is_persistent(&self) -> bool {
        false
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_everything_and_keeps_nothing() {
        let mut board = PromoLeaderboard::default();
        assert!(board.register_player(&Identity::new("Alice", "a@b.co")).is_ok());
        let record = SessionRecord {
            email: String::new(),
            session_start: 0.0,
            session_end: 1.0,
            scores: [500, 400, 300],
        };
        assert!(board.log_session(&record).is_ok());
        assert!(!board.is_top_score(500));
        assert_eq!(board.player_display_name("a@b.co"), None);
        assert!(!board.is_persistent());
    }

    #[test]
    fn test_rows_are_text_only() {
        let board = PromoLeaderboard::default();
        let rows = board.top_scores(8);
        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|r| r.score.is_none() && r.session_end.is_none()));
        assert_eq!(rows[0].name, "Visit our booth to compete!");
        assert_eq!(board.top_scores(2).len(), 2);
        assert_eq!(board.title(), DEFAULT_TITLE);
    }
}
