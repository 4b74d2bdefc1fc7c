//! Round simulation module
//!
//! All gameplay logic lives here. This module has no input or storage
//! dependencies:
//! - Screen size, delta time and RNG arrive through `SimContext`
//! - One step per rendered frame
//! - Stable per-frame iteration for collisions

pub mod autopilot;
pub mod collision;
pub mod context;
pub mod geometry;
pub mod obstacles;
pub mod player;
pub mod round;
pub mod spawner;

pub use collision::{CollisionEngine, CollisionOutcome, collect_clouds, fatal_helicopter};
pub use context::{Screen, SimContext, session_rng};
pub use geometry::Rect;
pub use obstacles::{Cloud, CloudTier, Helicopter};
pub use player::{Player, Steering};
pub use round::{RoundController, RoundPhase, RoundResult, RoundState, RoundStatus};
pub use spawner::{Spawned, Spawner};
