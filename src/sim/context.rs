//! Per-frame simulation context
//!
//! Everything a simulation step needs from the outside world is passed in
//! here: screen size, the frame's delta time, the session RNG and the balance
//! table. Nothing in `sim` reads ambient globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::tuning::Tuning;

/// Logical screen dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

impl Screen {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Borrowed context for one simulation step
pub struct SimContext<'a> {
    pub screen: Screen,
    /// Measured seconds since the previous frame
    pub dt: f32,
    pub rng: &'a mut Pcg32,
    pub tuning: &'a Tuning,
}

impl<'a> SimContext<'a> {
    pub fn new(screen: Screen, dt: f32, rng: &'a mut Pcg32, tuning: &'a Tuning) -> Self {
        Self {
            screen,
            dt: dt.max(0.0),
            rng,
            tuning,
        }
    }
}

/// Session RNG: seeded explicitly, or from OS entropy when no seed is given
pub fn session_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::seed_from_u64(rand::random()),
    }
}
