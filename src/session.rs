//! Three-life session flow
//!
//! A session registers the player, plays exactly `LIVES` rounds and submits
//! the three scores as one record. Leaderboard failures are logged and
//! swallowed; they never stop the game.

use crate::consts::LIVES;
use crate::identity::Identity;
use crate::leaderboard::{Leaderboard, LeaderboardRow, SessionRecord};
use crate::sim::RoundResult;

/// What the end-of-round screen needs to know about a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub identity: Identity,
    /// In play order
    pub scores: [u32; 3],
    pub session_start: f64,
    pub session_end: f64,
    /// Name the leaderboard knows this player by
    pub display_name: Option<String>,
    /// Best score equals the best ever logged
    pub is_top_score: bool,
}

impl SessionSummary {
    pub fn best(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    /// Scores highest first
    pub fn sorted_scores(&self) -> [u32; 3] {
        let mut sorted = self.scores;
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted
    }

    /// Whether a table row belongs to this session
    pub fn owns_row(&self, row: &LeaderboardRow) -> bool {
        match (&self.display_name, row.score) {
            (Some(name), Some(score)) => *name == row.name && self.scores.contains(&score),
            _ => false,
        }
    }

    /// 1-based position of this session's best score in `rows`
    pub fn rank_in(&self, rows: &[LeaderboardRow]) -> Option<usize> {
        let name = self.display_name.as_deref()?;
        let best = self.best();
        rows.iter()
            .position(|r| r.name == name && r.score == Some(best))
            .map(|i| i + 1)
    }
}

/// A session in progress
#[derive(Debug, Clone)]
pub struct Session {
    identity: Identity,
    session_start: f64,
    results: Vec<RoundResult>,
}

impl Session {
    /// Start a session, registering the player if there is one
    pub fn begin<L>(identity: Identity, leaderboard: &mut L, now_ms: f64) -> Self
    where
        L: Leaderboard + ?Sized,
    {
        if !identity.is_anonymous() {
            if let Err(e) = leaderboard.register_player(&identity) {
                log::warn!("Could not register {}: {}", identity.email, e);
            }
        }
        log::info!("Session started for {:?}", identity.name);
        Self {
            identity,
            session_start: now_ms,
            results: Vec::with_capacity(LIVES as usize),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    /// Lives left, counting the round about to be played
    pub fn lives(&self) -> u8 {
        LIVES.saturating_sub(self.results.len() as u8)
    }

    pub fn is_over(&self) -> bool {
        self.lives() == 0
    }

    /// Record a finished round; extra rounds beyond the last life are dropped
    pub fn record_round(&mut self, result: RoundResult) {
        if self.is_over() {
            log::warn!("Ignoring round result after the last life");
            return;
        }
        self.results.push(result);
    }

    /// Submit the session and summarize it
    pub fn finish<L>(self, leaderboard: &mut L, now_ms: f64) -> SessionSummary
    where
        L: Leaderboard + ?Sized,
    {
        let mut scores = [0u32; 3];
        for (slot, result) in scores.iter_mut().zip(&self.results) {
            *slot = result.score;
        }

        let record = SessionRecord {
            email: self.identity.email.clone(),
            session_start: self.session_start,
            session_end: now_ms,
            scores,
        };
        if self.identity.is_anonymous() && leaderboard.is_persistent() {
            log::debug!("Anonymous session not logged");
        } else if let Err(e) = leaderboard.log_session(&record) {
            log::warn!("Could not log session: {}", e);
        }

        let best = scores.iter().copied().max().unwrap_or(0);
        let summary = SessionSummary {
            display_name: leaderboard.player_display_name(&self.identity.email),
            is_top_score: leaderboard.is_top_score(best),
            identity: self.identity,
            scores,
            session_start: self.session_start,
            session_end: now_ms,
        };
        log::info!(
            "Session finished: scores={:?} top={}",
            summary.scores,
            summary.is_top_score
        );
        summary
    }

    /// Play a whole session synchronously
    ///
    /// `play_round` is called once per life with the lives remaining and must
    /// return that round's result; `on_round` sees each result as it lands.
    pub fn run<L, C, P, S>(
        identity: Identity,
        leaderboard: &mut L,
        mut now_ms: C,
        mut play_round: P,
        mut on_round: S,
    ) -> Vec<u32>
    where
        L: Leaderboard + ?Sized,
        C: FnMut() -> f64,
        P: FnMut(u8) -> RoundResult,
        S: FnMut(&RoundResult),
    {
        let mut session = Session::begin(identity, leaderboard, now_ms());
        while !session.is_over() {
            let result = play_round(session.lives());
            on_round(&result);
            session.record_round(result);
        }
        session.finish(leaderboard, now_ms()).scores.to_vec()
    }
}
