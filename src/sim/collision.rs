//! Collision detection and scoring
//!
//! Runs once per frame after movement. Clouds are resolved first, then the
//! player against live helicopters, then helicopters against each other.
//! Every pass works on a stable view of the frame: a cloud removed while
//! scoring is simply absent afterwards, and helicopter explosions are decided
//! for the whole frame before any are applied.

use super::geometry::Rect;
use super::obstacles::{Cloud, Helicopter};

/// What the collision pass changed this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Points gained from clouds this frame
    pub cloud_points: u32,
    pub clouds_collected: usize,
    /// Helicopter that hit the player, if any
    pub fatal_helicopter: Option<u32>,
    /// Helicopters newly exploded by mid-air collisions
    pub explosions: usize,
}

/// Collision pass with a reusable scratch buffer
#[derive(Debug, Default)]
pub struct CollisionEngine {
    marks: Vec<bool>,
}

impl CollisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve all collisions for one frame
    ///
    /// Stops after a fatal hit: the round is over, nothing else matters.
    pub fn resolve(
        &mut self,
        hitbox: &Rect,
        clouds: &mut Vec<Cloud>,
        helicopters: &mut [Helicopter],
    ) -> CollisionOutcome {
        let mut outcome = CollisionOutcome::default();

        let (points, collected) = collect_clouds(hitbox, clouds);
        outcome.cloud_points = points;
        outcome.clouds_collected = collected;

        outcome.fatal_helicopter = fatal_helicopter(hitbox, helicopters);
        if outcome.fatal_helicopter.is_some() {
            return outcome;
        }

        outcome.explosions = self.explode_overlapping(helicopters);
        outcome
    }

    /// Explode every live helicopter that overlaps another live helicopter
    ///
    /// Both members of an overlapping pair are marked before anything is
    /// applied, so a pair never ends up half exploded.
    pub fn explode_overlapping(&mut self, helicopters: &mut [Helicopter]) -> usize {
        self.marks.clear();
        self.marks.resize(helicopters.len(), false);

        for i in 0..helicopters.len() {
            if helicopters[i].exploded {
                continue;
            }
            let a = helicopters[i].bounds();
            for j in (i + 1)..helicopters.len() {
                if helicopters[j].exploded {
                    continue;
                }
                if a.overlaps(&helicopters[j].bounds()) {
                    self.marks[i] = true;
                    self.marks[j] = true;
                }
            }
        }

        let mut exploded = 0;
        for (heli, &hit) in helicopters.iter_mut().zip(self.marks.iter()) {
            if hit {
                heli.explode();
                exploded += 1;
                log::debug!("Helicopter #{} exploded", heli.id);
            }
        }
        exploded
    }
}

/// Remove every cloud touching the hitbox, returning (points, count)
///
/// Removal and scoring happen in the same pass, so a cloud can only ever be
/// counted once.
pub fn collect_clouds(hitbox: &Rect, clouds: &mut Vec<Cloud>) -> (u32, usize) {
    let mut points = 0;
    let mut collected = 0;
    clouds.retain(|cloud| {
        if hitbox.overlaps(&cloud.bounds()) {
            points += cloud.points();
            collected += 1;
            false
        } else {
            true
        }
    });
    (points, collected)
}

/// First live helicopter overlapping the hitbox; exploded ones are passable
pub fn fatal_helicopter(hitbox: &Rect, helicopters: &[Helicopter]) -> Option<u32> {
    helicopters
        .iter()
        .find(|h| !h.exploded && hitbox.overlaps(&h.bounds()))
        .map(|h| h.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacles::CloudTier;
    use glam::Vec2;
    use proptest::prelude::*;

    fn heli(id: u32, x: f32, y: f32) -> Helicopter {
        Helicopter::new(id, Vec2::new(x, y), 200.0, 60.0, 1.0)
    }

    fn hitbox() -> Rect {
        Rect::new(100.0, 100.0, 60.0, 60.0)
    }

    #[test]
    fn test_cloud_collected_once() {
        let mut clouds = vec![
            Cloud::new(1, CloudTier::High, Vec2::new(90.0, 90.0), 200.0),
            Cloud::new(2, CloudTier::Low, Vec2::new(500.0, 500.0), 200.0),
        ];

        let (points, count) = collect_clouds(&hitbox(), &mut clouds);
        assert_eq!((points, count), (10, 1));
        assert_eq!(clouds.len(), 1);
        assert_eq!(clouds[0].id, 2);

        // Same frame checked again: nothing left to score
        let (points, count) = collect_clouds(&hitbox(), &mut clouds);
        assert_eq!((points, count), (0, 0));
    }

    #[test]
    fn test_live_helicopter_is_fatal() {
        let helis = vec![heli(1, 400.0, 400.0), heli(2, 120.0, 120.0)];
        assert_eq!(fatal_helicopter(&hitbox(), &helis), Some(2));
    }

    #[test]
    fn test_exploded_helicopter_is_passable() {
        let mut h = heli(1, 120.0, 120.0);
        h.explode();
        assert_eq!(fatal_helicopter(&hitbox(), &[h]), None);
    }

    #[test]
    fn test_mutual_explosion_is_symmetric() {
        let mut engine = CollisionEngine::new();
        let mut helis = vec![heli(1, 300.0, 600.0), heli(2, 350.0, 620.0), heli(3, 10.0, 10.0)];
        let n = engine.explode_overlapping(&mut helis);
        assert_eq!(n, 2);
        assert!(helis[0].exploded);
        assert!(helis[1].exploded);
        assert!(!helis[2].exploded);
    }

    #[test]
    fn test_exploded_helicopter_does_not_chain() {
        let mut engine = CollisionEngine::new();
        let mut wreck = heli(1, 300.0, 600.0);
        wreck.explode();
        let mut helis = vec![wreck, heli(2, 320.0, 610.0)];
        assert_eq!(engine.explode_overlapping(&mut helis), 0);
        assert!(!helis[1].exploded);
    }

    #[test]
    fn test_three_way_overlap_explodes_all() {
        let mut engine = CollisionEngine::new();
        let mut helis = vec![heli(1, 300.0, 600.0), heli(2, 340.0, 600.0), heli(3, 380.0, 600.0)];
        assert_eq!(engine.explode_overlapping(&mut helis), 3);
        assert!(helis.iter().all(|h| h.exploded));
    }

    #[test]
    fn test_resolve_stops_on_fatal_hit() {
        let mut engine = CollisionEngine::new();
        let mut clouds = vec![Cloud::new(1, CloudTier::Medium, Vec2::new(90.0, 90.0), 200.0)];
        let mut helis = vec![heli(2, 110.0, 110.0), heli(3, 500.0, 500.0), heli(4, 510.0, 510.0)];

        let outcome = engine.resolve(&hitbox(), &mut clouds, &mut helis);
        assert_eq!(outcome.cloud_points, 5);
        assert_eq!(outcome.fatal_helicopter, Some(2));
        assert_eq!(outcome.explosions, 0);
        assert!(clouds.is_empty());
    }

    fn arb_heli() -> impl Strategy<Value = (f32, f32, bool)> {
        (0.0f32..700.0, 0.0f32..400.0, any::<bool>())
    }

    proptest! {
        #[test]
        fn prop_overlapping_live_pairs_both_explode(
            specs in prop::collection::vec(arb_heli(), 0..12)
        ) {
            let mut helis: Vec<Helicopter> = specs
                .iter()
                .enumerate()
                .map(|(i, &(x, y, dead))| {
                    let mut h = heli(i as u32, x, y);
                    if dead {
                        h.explode();
                    }
                    h
                })
                .collect();
            let before: Vec<bool> = helis.iter().map(|h| h.exploded).collect();

            CollisionEngine::new().explode_overlapping(&mut helis);

            for i in 0..helis.len() {
                for j in (i + 1)..helis.len() {
                    if !before[i] && !before[j] && helis[i].bounds().overlaps(&helis[j].bounds()) {
                        prop_assert!(helis[i].exploded && helis[j].exploded);
                    }
                }
            }
        }

        #[test]
        fn prop_cloud_points_counted_exactly_once(
            specs in prop::collection::vec((0.0f32..700.0, 0.0f32..400.0, 0usize..3), 0..20)
        ) {
            let mut clouds: Vec<Cloud> = specs
                .iter()
                .enumerate()
                .map(|(i, &(x, y, t))| Cloud::new(i as u32, CloudTier::ALL[t], Vec2::new(x, y), 200.0))
                .collect();
            let hb = hitbox();
            let expected: u32 = clouds
                .iter()
                .filter(|c| hb.overlaps(&c.bounds()))
                .map(|c| c.points())
                .sum();

            let (first, _) = collect_clouds(&hb, &mut clouds);
            let (second, _) = collect_clouds(&hb, &mut clouds);
            prop_assert_eq!(first, expected);
            prop_assert_eq!(second, 0);
            prop_assert!(clouds.iter().all(|c| !hb.overlaps(&c.bounds())));
        }
    }
}
