//! Data-driven game balance
//!
//! Every gameplay number that a designer might want to tweak lives here so it
//! can ride along in the settings file. Defaults are the shipped balance.

use serde::{Deserialize, Serialize};

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Round ===
    /// Obstacle fall speed at round start (px/s)
    pub initial_obstacle_speed: f32,
    /// Obstacle speed gained per second survived (px/s²)
    pub speed_increment: f32,
    /// Round ends in a timeout after this many seconds
    pub time_limit: f32,
    /// Points per second survived
    pub points_per_second: f32,

    // === Player ===
    /// Max horizontal speed at round start (px/tick)
    pub player_base_max_speed: f32,
    /// Max speed gained every `player_speed_step_secs`
    pub player_max_speed_bonus_cap: f32,
    pub player_speed_step_secs: f32,
    /// Per-tick acceleration at round start (px/tick²)
    pub player_base_accel: f32,
    /// Acceleration gained per second survived
    pub player_accel_growth: f32,
    pub player_accel_cap: f32,

    // === Spawning ===
    /// Per-frame cloud spawn probability
    pub cloud_spawn_chance: f32,
    /// Helicopter spawn probability at t=0 and its growth per second
    pub helicopter_base_chance: f32,
    pub helicopter_chance_growth: f32,
    pub helicopter_max_chance: f32,
    /// Helicopter sideways drift range (px/s)
    pub helicopter_min_drift: f32,
    pub helicopter_max_drift: f32,
    /// Seconds after an edge bounce before the helicopter may bounce again
    pub helicopter_reverse_cooldown: f32,

    // === Explosions ===
    /// Rise speed of an exploded helicopter (px/s)
    pub explosion_rise_speed: f32,
    /// Opacity lost per second once exploded (out of 255)
    pub explosion_fade_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_obstacle_speed: 200.0,
            speed_increment: 15.0,
            time_limit: 300.0,
            points_per_second: 10.0,

            player_base_max_speed: 5.0,
            player_max_speed_bonus_cap: 10.0,
            player_speed_step_secs: 10.0,
            player_base_accel: 0.5,
            player_accel_growth: 0.025,
            player_accel_cap: 5.0,

            cloud_spawn_chance: 0.02,
            helicopter_base_chance: 0.005,
            helicopter_chance_growth: 0.0001,
            helicopter_max_chance: 0.02,
            helicopter_min_drift: 40.0,
            helicopter_max_drift: 120.0,
            helicopter_reverse_cooldown: 0.25,

            explosion_rise_speed: 200.0,
            explosion_fade_rate: 51.0,
        }
    }
}

impl Tuning {
    /// Player top speed after `elapsed` seconds: +1 per step, capped
    pub fn player_max_speed(&self, elapsed: f32) -> f32 {
        let steps = (elapsed.max(0.0) / self.player_speed_step_secs).floor();
        self.player_base_max_speed + steps.min(self.player_max_speed_bonus_cap)
    }

    /// Player per-tick acceleration after `elapsed` seconds
    pub fn player_accel(&self, elapsed: f32) -> f32 {
        (self.player_base_accel + self.player_accel_growth * elapsed.max(0.0))
            .min(self.player_accel_cap)
    }

    /// Per-frame helicopter spawn probability after `elapsed` seconds
    pub fn helicopter_chance(&self, elapsed: f32) -> f32 {
        (self.helicopter_base_chance + self.helicopter_chance_growth * elapsed.max(0.0))
            .min(self.helicopter_max_chance)
    }

    /// Final score for a round
    pub fn score(&self, time_survived: f32, cloud_points: u32) -> u32 {
        (self.points_per_second * time_survived + cloud_points as f32)
            .round()
            .max(0.0) as u32
    }
}
