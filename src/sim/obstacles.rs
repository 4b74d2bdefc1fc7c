//! Cloud bonuses and helicopter hazards
//!
//! Both rise from below the screen at the fall speed that was current when
//! they spawned. That speed is frozen per entity.

use glam::Vec2;

use super::context::Screen;
use super::geometry::Rect;
use crate::consts::{HELICOPTER_HEIGHT, HELICOPTER_WIDTH};
use crate::tuning::Tuning;

/// Cloud value tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudTier {
    Low,
    Medium,
    High,
}

impl CloudTier {
    pub const ALL: [CloudTier; 3] = [CloudTier::Low, CloudTier::Medium, CloudTier::High];

    pub fn points(&self) -> u32 {
        match self {
            CloudTier::Low => 1,
            CloudTier::Medium => 5,
            CloudTier::High => 10,
        }
    }

    /// Sprite size for this tier
    pub fn size(&self) -> Vec2 {
        match self {
            CloudTier::Low => Vec2::new(120.0, 60.0),
            CloudTier::Medium => Vec2::new(140.0, 70.0),
            CloudTier::High => Vec2::new(160.0, 80.0),
        }
    }
}

/// A bonus cloud
#[derive(Debug, Clone)]
pub struct Cloud {
    pub id: u32,
    pub tier: CloudTier,
    pub pos: Vec2,
    /// Rise speed (px/s), frozen at spawn
    pub speed: f32,
}

impl Cloud {
    pub fn new(id: u32, tier: CloudTier, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            tier,
            pos,
            speed,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.tier.size())
    }

    pub fn points(&self) -> u32 {
        self.tier.points()
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y -= self.speed * dt;
    }

    /// Fully above the top edge
    pub fn is_gone(&self) -> bool {
        self.bounds().bottom() < 0.0
    }
}

/// A helicopter hazard
#[derive(Debug, Clone)]
pub struct Helicopter {
    pub id: u32,
    pub pos: Vec2,
    /// Rise speed (px/s), frozen at spawn
    pub speed: f32,
    /// Sideways drift speed (px/s)
    pub drift_speed: f32,
    /// -1.0 = moving left, 1.0 = moving right
    pub direction: f32,
    /// Seconds until another edge bounce is allowed
    pub reverse_cooldown: f32,
    pub exploded: bool,
    /// 0-255, only meaningful once exploded
    pub opacity: f32,
}

impl Helicopter {
    pub fn new(id: u32, pos: Vec2, speed: f32, drift_speed: f32, direction: f32) -> Self {
        Self {
            id,
            pos,
            speed,
            drift_speed,
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
            reverse_cooldown: 0.0,
            exploded: false,
            opacity: 255.0,
        }
    }

    pub fn size() -> Vec2 {
        Vec2::new(HELICOPTER_WIDTH, HELICOPTER_HEIGHT)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, Self::size())
    }

    /// Mark as destroyed; it keeps rising while it fades out
    pub fn explode(&mut self) {
        if !self.exploded {
            self.exploded = true;
            self.opacity = 255.0;
        }
    }

    pub fn update(&mut self, dt: f32, screen: Screen, tuning: &Tuning) {
        if self.exploded {
            self.pos.y -= tuning.explosion_rise_speed * dt;
            self.opacity = (self.opacity - tuning.explosion_fade_rate * dt).max(0.0);
            return;
        }

        self.pos.y -= self.speed * dt;
        self.pos.x += self.drift_speed * dt * self.direction;
        self.reverse_cooldown = (self.reverse_cooldown - dt).max(0.0);

        let max_x = (screen.width - Self::size().x).max(0.0);
        let at_left = self.pos.x <= 0.0 && self.direction < 0.0;
        let at_right = self.pos.x >= max_x && self.direction > 0.0;
        if (at_left || at_right) && self.reverse_cooldown <= 0.0 {
            self.direction = -self.direction;
            self.reverse_cooldown = tuning.helicopter_reverse_cooldown;
        }
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    /// Off the top, or faded to nothing
    pub fn is_gone(&self) -> bool {
        self.bounds().bottom() < 0.0 || (self.exploded && self.opacity <= 0.0)
    }
}
