//! Probabilistic obstacle population
//!
//! Clouds arrive at a fixed per-frame rate. Helicopters get more frequent the
//! longer the player survives, up to a ceiling. Together with the rising fall
//! speed this is the difficulty ramp.

use glam::Vec2;
use rand::Rng;

use super::context::SimContext;
use super::obstacles::{Cloud, CloudTier, Helicopter};

/// Entities produced by one spawner tick
#[derive(Debug, Default)]
pub struct Spawned {
    pub cloud: Option<Cloud>,
    pub helicopter: Option<Helicopter>,
}

/// Obstacle spawner for one round
#[derive(Debug, Clone)]
pub struct Spawner {
    next_id: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Roll this frame's spawns at the current difficulty (obstacle speed)
    pub fn tick(&mut self, ctx: &mut SimContext<'_>, elapsed: f32, difficulty: f32) -> Spawned {
        let mut spawned = Spawned::default();

        let cloud_chance = ctx.tuning.cloud_spawn_chance;
        if roll(ctx, cloud_chance) {
            spawned.cloud = Some(self.spawn_cloud(ctx, difficulty));
        }

        let heli_chance = ctx.tuning.helicopter_chance(elapsed);
        if roll(ctx, heli_chance) {
            spawned.helicopter = Some(self.spawn_helicopter(ctx, difficulty));
        }

        spawned
    }

    /// A cloud of a uniformly chosen tier at the bottom edge
    pub fn spawn_cloud(&mut self, ctx: &mut SimContext<'_>, speed: f32) -> Cloud {
        let tier = CloudTier::ALL[ctx.rng.random_range(0..CloudTier::ALL.len())];
        let size = tier.size();
        let x = random_x(ctx, size.x);
        let id = self.next_entity_id();
        log::debug!("Spawned {:?} cloud #{} at x={:.0}", tier, id, x);
        Cloud::new(id, tier, Vec2::new(x, ctx.screen.height), speed)
    }

    /// A helicopter with randomized drift at the bottom edge
    pub fn spawn_helicopter(&mut self, ctx: &mut SimContext<'_>, speed: f32) -> Helicopter {
        let x = random_x(ctx, Helicopter::size().x);
        let (min, max) = (ctx.tuning.helicopter_min_drift, ctx.tuning.helicopter_max_drift);
        let drift = if max > min {
            ctx.rng.random_range(min..max)
        } else {
            min
        };
        let direction = if ctx.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let id = self.next_entity_id();
        log::debug!(
            "Spawned helicopter #{} at x={:.0} (drift {:.0}, dir {})",
            id,
            x,
            drift,
            direction
        );
        Helicopter::new(id, Vec2::new(x, ctx.screen.height), speed, drift, direction)
    }
}

/// Bernoulli trial with the probability clamped into [0, 1]
fn roll(ctx: &mut SimContext<'_>, chance: f32) -> bool {
    let p = chance.clamp(0.0, 1.0) as f64;
    ctx.rng.random_bool(p)
}

/// Uniform left edge so the sprite fits on screen
fn random_x(ctx: &mut SimContext<'_>, width: f32) -> f32 {
    let max_x = (ctx.screen.width - width).max(0.0);
    ctx.rng.random_range(0.0..=max_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::context::{Screen, session_rng};
    use crate::tuning::Tuning;

    #[test]
    fn test_spawned_entities_use_current_difficulty() {
        let mut rng = session_rng(Some(7));
        let tuning = Tuning::default();
        let mut ctx = SimContext::new(Screen::default(), 1.0 / 60.0, &mut rng, &tuning);
        let mut spawner = Spawner::new();

        let cloud = spawner.spawn_cloud(&mut ctx, 321.0);
        let heli = spawner.spawn_helicopter(&mut ctx, 456.0);
        assert_eq!(cloud.speed, 321.0);
        assert_eq!(heli.speed, 456.0);
        assert_eq!(cloud.pos.y, ctx.screen.height);
        assert_eq!(heli.pos.y, ctx.screen.height);
        assert_ne!(cloud.id, heli.id);
    }

    #[test]
    fn test_spawn_x_within_screen() {
        let mut rng = session_rng(Some(42));
        let tuning = Tuning::default();
        let mut ctx = SimContext::new(Screen::default(), 1.0 / 60.0, &mut rng, &tuning);
        let mut spawner = Spawner::new();

        for _ in 0..500 {
            let cloud = spawner.spawn_cloud(&mut ctx, 200.0);
            assert!(cloud.pos.x >= 0.0);
            assert!(cloud.bounds().right() <= ctx.screen.width);

            let heli = spawner.spawn_helicopter(&mut ctx, 200.0);
            assert!(heli.pos.x >= 0.0);
            assert!(heli.bounds().right() <= ctx.screen.width);
            assert!(heli.drift_speed >= tuning.helicopter_min_drift);
            assert!(heli.drift_speed < tuning.helicopter_max_drift);
        }
    }

    #[test]
    fn test_all_cloud_tiers_appear() {
        let mut rng = session_rng(Some(3));
        let tuning = Tuning::default();
        let mut ctx = SimContext::new(Screen::default(), 1.0 / 60.0, &mut rng, &tuning);
        let mut spawner = Spawner::new();

        let mut seen = [false; 3];
        for _ in 0..200 {
            let cloud = spawner.spawn_cloud(&mut ctx, 200.0);
            let idx = CloudTier::ALL.iter().position(|t| *t == cloud.tier).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_spawn_rates_follow_tuning() {
        let mut rng = session_rng(Some(11));
        let tuning = Tuning {
            cloud_spawn_chance: 1.0,
            helicopter_base_chance: 0.0,
            helicopter_chance_growth: 0.0,
            ..Tuning::default()
        };
        let mut ctx = SimContext::new(Screen::default(), 1.0 / 60.0, &mut rng, &tuning);
        let mut spawner = Spawner::new();

        for _ in 0..50 {
            let spawned = spawner.tick(&mut ctx, 120.0, 300.0);
            assert!(spawned.cloud.is_some());
            assert!(spawned.helicopter.is_none());
        }
    }
}
