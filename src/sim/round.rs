//! One life: the round controller
//!
//! Each frame advances the clocks, steers the player, spawns, moves and
//! collides obstacles. The round ends when the time limit is reached or the
//! player flies into a live helicopter. Either way it yields exactly one
//! `RoundResult` and ignores any further steps.

use serde::{Deserialize, Serialize};

use super::collision::CollisionEngine;
use super::context::{Screen, SimContext};
use super::obstacles::{Cloud, Helicopter};
use super::player::{Player, Steering};
use super::spawner::Spawner;
use crate::render::DrawCommand;
use crate::tuning::Tuning;

/// Typical live-entity count; collections are sized for this up front
const OBSTACLE_CAPACITY: usize = 32;

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Running,
    /// Survived to the time limit
    TimedOut,
    /// Hit a live helicopter
    Destroyed,
}

/// Final tally for a round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// `round(10 * time_survived + cloud_points)`
    pub score: u32,
    pub time_survived: f32,
    pub cloud_points: u32,
    /// Highest obstacle speed reached (ft/s on the HUD)
    pub max_speed: f32,
}

impl RoundResult {
    pub fn new(tuning: &Tuning, time_survived: f32, cloud_points: u32, max_speed: f32) -> Self {
        let time_survived = time_survived.max(0.0);
        Self {
            score: tuning.score(time_survived, cloud_points),
            time_survived,
            cloud_points,
            max_speed: max_speed.max(0.0),
        }
    }
}

/// Mutable per-round counters
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    /// Seconds survived
    pub elapsed: f32,
    pub cloud_points: u32,
    /// Current obstacle speed
    pub difficulty: f32,
    pub max_difficulty: f32,
    /// Lives left including this one (HUD only)
    pub lives: u8,
}

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundStatus {
    Running,
    Finished(RoundPhase, RoundResult),
}

/// Drives one life to completion
#[derive(Debug)]
pub struct RoundController {
    pub phase: RoundPhase,
    pub state: RoundState,
    pub player: Player,
    pub clouds: Vec<Cloud>,
    pub helicopters: Vec<Helicopter>,
    spawner: Spawner,
    collisions: CollisionEngine,
    result: Option<RoundResult>,
}

impl RoundController {
    pub fn new(screen: Screen, tuning: &Tuning, lives: u8) -> Self {
        Self {
            phase: RoundPhase::Running,
            state: RoundState {
                elapsed: 0.0,
                cloud_points: 0,
                difficulty: tuning.initial_obstacle_speed,
                max_difficulty: tuning.initial_obstacle_speed,
                lives,
            },
            player: Player::new(screen),
            clouds: Vec::with_capacity(OBSTACLE_CAPACITY),
            helicopters: Vec::with_capacity(OBSTACLE_CAPACITY),
            spawner: Spawner::new(),
            collisions: CollisionEngine::new(),
            result: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<RoundResult> {
        self.result
    }

    /// Draw state of every live entity
    pub fn render(&self) -> Vec<DrawCommand> {
        crate::render::round_entities(self)
    }

    /// Advance the round by one frame
    pub fn step(&mut self, steer: Steering, ctx: &mut SimContext<'_>) -> RoundStatus {
        if let Some(result) = self.result {
            return RoundStatus::Finished(self.phase, result);
        }

        let dt = ctx.dt;
        let tuning = ctx.tuning;

        self.state.elapsed += dt;
        self.state.difficulty += tuning.speed_increment * dt;
        self.state.max_difficulty = self.state.max_difficulty.max(self.state.difficulty);

        if self.state.elapsed >= tuning.time_limit {
            self.state.elapsed = tuning.time_limit;
            return self.finish(RoundPhase::TimedOut, tuning);
        }

        self.player.update(steer, dt, ctx.screen, tuning);

        let spawned = self
            .spawner
            .tick(ctx, self.state.elapsed, self.state.difficulty);
        if let Some(cloud) = spawned.cloud {
            self.clouds.push(cloud);
        }
        if let Some(heli) = spawned.helicopter {
            self.helicopters.push(heli);
        }

        for cloud in &mut self.clouds {
            cloud.update(dt);
        }
        for heli in &mut self.helicopters {
            heli.update(dt, ctx.screen, tuning);
        }

        let outcome =
            self.collisions
                .resolve(&self.player.hitbox(), &mut self.clouds, &mut self.helicopters);
        self.state.cloud_points += outcome.cloud_points;

        if let Some(id) = outcome.fatal_helicopter {
            log::info!(
                "Hit helicopter #{} after {:.1}s",
                id,
                self.state.elapsed
            );
            return self.finish(RoundPhase::Destroyed, tuning);
        }

        self.clouds.retain(|c| !c.is_gone());
        self.helicopters.retain(|h| !h.is_gone());

        RoundStatus::Running
    }

    fn finish(&mut self, phase: RoundPhase, tuning: &Tuning) -> RoundStatus {
        let result = RoundResult::new(
            tuning,
            self.state.elapsed,
            self.state.cloud_points,
            self.state.max_difficulty,
        );
        self.phase = phase;
        self.result = Some(result);
        self.clouds.clear();
        self.helicopters.clear();

        log::info!(
            "Round over ({:?}): score={} time={:.1}s clouds={} max_speed={:.0}",
            phase,
            result.score,
            result.time_survived,
            result.cloud_points,
            result.max_speed
        );
        RoundStatus::Finished(phase, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::context::session_rng;
    use crate::sim::obstacles::CloudTier;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_tuning() -> Tuning {
        Tuning {
            cloud_spawn_chance: 0.0,
            helicopter_base_chance: 0.0,
            helicopter_chance_growth: 0.0,
            helicopter_max_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn run_to_end(round: &mut RoundController, tuning: &Tuning, seed: u64) -> (RoundPhase, RoundResult) {
        let mut rng = session_rng(Some(seed));
        loop {
            let mut ctx = SimContext::new(Screen::default(), DT, &mut rng, tuning);
            if let RoundStatus::Finished(phase, result) = round.step(Steering::None, &mut ctx) {
                return (phase, result);
            }
        }
    }

    #[test]
    fn test_round_times_out_with_exact_score() {
        let tuning = quiet_tuning();
        let mut round = RoundController::new(Screen::default(), &tuning, 3);
        round.state.cloud_points = 42;

        let mut rng = session_rng(Some(1));
        let mut saw_destroyed = false;
        let (phase, result) = loop {
            let mut ctx = SimContext::new(Screen::default(), DT, &mut rng, &tuning);
            let status = round.step(Steering::None, &mut ctx);
            saw_destroyed |= round.phase == RoundPhase::Destroyed;
            if let RoundStatus::Finished(phase, result) = status {
                break (phase, result);
            }
        };

        assert!(!saw_destroyed);
        assert_eq!(phase, RoundPhase::TimedOut);
        assert_eq!(result.time_survived, 300.0);
        assert_eq!(result.cloud_points, 42);
        assert_eq!(result.score, 3042);
    }

    #[test]
    fn test_difficulty_ramps_and_max_tracks() {
        let tuning = quiet_tuning();
        let mut round = RoundController::new(Screen::default(), &tuning, 3);
        let mut rng = session_rng(Some(2));
        let mut ctx = SimContext::new(Screen::default(), 1.0, &mut rng, &tuning);
        round.step(Steering::None, &mut ctx);
        assert_eq!(round.state.difficulty, 215.0);
        assert_eq!(round.state.max_difficulty, 215.0);
    }

    #[test]
    fn test_helicopter_hit_destroys_round() {
        let tuning = quiet_tuning();
        let mut round = RoundController::new(Screen::default(), &tuning, 3);
        let hb = round.player.hitbox();
        // Stationary helicopter parked on the player
        round
            .helicopters
            .push(Helicopter::new(99, hb.pos, 0.0, 0.0, 1.0));
        round.state.cloud_points = 7;

        let (phase, result) = run_to_end(&mut round, &tuning, 5);
        assert_eq!(phase, RoundPhase::Destroyed);
        assert_eq!(result.cloud_points, 7);
        assert_eq!(result.score, tuning.score(result.time_survived, 7));
        assert!(round.helicopters.is_empty());
    }

    #[test]
    fn test_exploded_helicopter_does_not_end_round() {
        let tuning = Tuning {
            time_limit: 1.0,
            ..quiet_tuning()
        };
        let mut round = RoundController::new(Screen::default(), &tuning, 3);
        let mut wreck = Helicopter::new(1, round.player.pos, 0.0, 0.0, 1.0);
        wreck.explode();
        round.helicopters.push(wreck);

        let (phase, _) = run_to_end(&mut round, &tuning, 9);
        assert_eq!(phase, RoundPhase::TimedOut);
    }

    #[test]
    fn test_cloud_pickup_adds_points() {
        let tuning = Tuning {
            time_limit: 0.5,
            ..quiet_tuning()
        };
        let mut round = RoundController::new(Screen::default(), &tuning, 3);
        let center = round.player.hitbox().center();
        round.clouds.push(Cloud::new(
            1,
            CloudTier::High,
            center - Vec2::new(80.0, 40.0),
            0.0,
        ));

        let (_, result) = run_to_end(&mut round, &tuning, 4);
        assert_eq!(result.cloud_points, 10);
    }

    #[test]
    fn test_no_updates_after_termination() {
        let tuning = Tuning {
            time_limit: 0.1,
            ..quiet_tuning()
        };
        let mut round = RoundController::new(Screen::default(), &tuning, 3);
        let (_, result) = run_to_end(&mut round, &tuning, 8);

        let mut rng = session_rng(Some(8));
        let mut ctx = SimContext::new(Screen::default(), DT, &mut rng, &tuning);
        let player_x = round.player.pos.x;
        let again = round.step(Steering::Left, &mut ctx);
        assert_eq!(again, RoundStatus::Finished(RoundPhase::TimedOut, result));
        assert_eq!(round.player.pos.x, player_x);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_score_invariant_holds_at_termination(seed in any::<u64>()) {
            let tuning = Tuning {
                time_limit: 20.0,
                cloud_spawn_chance: 0.2,
                helicopter_base_chance: 0.05,
                ..Tuning::default()
            };
            let mut round = RoundController::new(Screen::default(), &tuning, 3);
            let (_, result) = run_to_end(&mut round, &tuning, seed);
            let expected = (10.0 * result.time_survived + result.cloud_points as f32).round() as u32;
            prop_assert_eq!(result.score, expected);
            prop_assert!(result.time_survived <= tuning.time_limit);
            prop_assert!(result.max_speed >= tuning.initial_obstacle_speed);
        }
    }
}
