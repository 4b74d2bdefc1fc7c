//! The falling skydiver
//!
//! Horizontal motion works in pixels per tick: steering accelerates, idling
//! decays velocity and tilt back to zero at the same per-tick rate. Top speed
//! and acceleration both grow with time survived.

use glam::Vec2;

use super::context::Screen;
use super::geometry::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Normalized steering signal for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steering {
    Left,
    Right,
    #[default]
    None,
}

/// The player's skydiver
#[derive(Debug, Clone)]
pub struct Player {
    /// Sprite top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity (px/tick, negative = left)
    pub velocity: f32,
    /// Cosmetic tilt in degrees (positive when steering left)
    pub tilt: f32,
    /// Seconds since round start
    pub elapsed: f32,
}

impl Player {
    /// Spawn centred horizontally, a third of the way down the screen
    pub fn new(screen: Screen) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        Self {
            pos: Vec2::new(
                ((screen.width - size.x) / 2.0).max(0.0),
                screen.height / 3.0 - size.y / 2.0,
            ),
            size,
            velocity: 0.0,
            tilt: 0.0,
            elapsed: 0.0,
        }
    }

    /// Sprite bounds
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Collision rectangle, inset from the sprite on every side
    pub fn hitbox(&self) -> Rect {
        self.bounds()
            .inset(PLAYER_HITBOX_INSET_X, PLAYER_HITBOX_INSET_Y)
    }

    /// Rightmost legal x for the sprite's left edge
    pub fn max_x(&self, screen: Screen) -> f32 {
        (screen.width - self.size.x).max(0.0)
    }

    /// Advance one tick
    pub fn update(&mut self, steer: Steering, dt: f32, screen: Screen, tuning: &Tuning) {
        self.elapsed += dt.max(0.0);

        let max_speed = tuning.player_max_speed(self.elapsed);
        let accel = tuning.player_accel(self.elapsed);

        match steer {
            Steering::Left => {
                self.velocity = (self.velocity - accel).max(-max_speed);
                self.tilt = (self.tilt + PLAYER_TILT_STEP).min(PLAYER_MAX_TILT);
            }
            Steering::Right => {
                self.velocity = (self.velocity + accel).min(max_speed);
                self.tilt = (self.tilt - PLAYER_TILT_STEP).max(-PLAYER_MAX_TILT);
            }
            Steering::None => {
                self.velocity = approach_zero(self.velocity, accel);
                self.tilt = approach_zero(self.tilt, PLAYER_TILT_STEP);
            }
        }

        self.pos.x += self.velocity;

        let max_x = self.max_x(screen);
        if self.pos.x <= 0.0 {
            self.pos.x = 0.0;
            if self.velocity < 0.0 {
                self.velocity = 0.0;
            }
        } else if self.pos.x >= max_x {
            self.pos.x = max_x;
            if self.velocity > 0.0 {
                self.velocity = 0.0;
            }
        }
    }
}

/// Move `value` toward zero by `step` without crossing it
fn approach_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else if value < 0.0 {
        (value + step).min(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_spawn_position() {
        let screen = Screen::default();
        let p = Player::new(screen);
        assert_eq!(p.pos.x, (SCREEN_WIDTH - PLAYER_WIDTH) / 2.0);
        assert!((p.bounds().center().y - SCREEN_HEIGHT / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_steer_left_accelerates_and_tilts() {
        let screen = Screen::default();
        let tuning = Tuning::default();
        let mut p = Player::new(screen);
        let start_x = p.pos.x;

        for _ in 0..5 {
            p.update(Steering::Left, DT, screen, &tuning);
        }
        assert!(p.velocity < 0.0);
        assert!(p.pos.x < start_x);
        assert_eq!(p.tilt, 5.0);
    }

    #[test]
    fn test_velocity_capped_by_max_speed() {
        let screen = Screen::default();
        let tuning = Tuning::default();
        let mut p = Player::new(screen);
        for _ in 0..30 {
            p.update(Steering::Right, DT, screen, &tuning);
        }
        assert!(p.velocity <= tuning.player_max_speed(p.elapsed) + 1e-6);
        assert!(p.tilt >= -PLAYER_MAX_TILT);
    }

    #[test]
    fn test_idle_decays_symmetrically_to_zero() {
        let screen = Screen::default();
        let tuning = Tuning::default();
        let mut p = Player::new(screen);
        for _ in 0..4 {
            p.update(Steering::Right, DT, screen, &tuning);
        }
        assert!(p.velocity > 0.0);

        for _ in 0..60 {
            p.update(Steering::None, DT, screen, &tuning);
        }
        assert_eq!(p.velocity, 0.0);
        assert_eq!(p.tilt, 0.0);
    }

    #[test]
    fn test_wall_contact_zeroes_outward_velocity() {
        let screen = Screen::default();
        let tuning = Tuning::default();
        let mut p = Player::new(screen);
        p.pos.x = 1.0;
        p.velocity = -4.0;
        p.update(Steering::Left, DT, screen, &tuning);
        assert_eq!(p.pos.x, 0.0);
        assert_eq!(p.velocity, 0.0);

        // Steering away from the wall works immediately
        p.update(Steering::Right, DT, screen, &tuning);
        assert!(p.velocity > 0.0);
        assert!(p.pos.x > 0.0);
    }

    #[test]
    fn test_tilt_does_not_change_hitbox() {
        let screen = Screen::default();
        let tuning = Tuning::default();
        let mut p = Player::new(screen);
        let before = p.hitbox();
        p.tilt = PLAYER_MAX_TILT;
        assert_eq!(p.hitbox(), before);
        p.update(Steering::None, DT, screen, &tuning);
        assert_eq!(p.hitbox().size, before.size);
    }

    fn steering() -> impl Strategy<Value = Steering> {
        prop_oneof![
            Just(Steering::Left),
            Just(Steering::Right),
            Just(Steering::None)
        ]
    }

    proptest! {
        #[test]
        fn prop_player_stays_on_screen(
            moves in prop::collection::vec((steering(), 0.0f32..0.5), 1..400)
        ) {
            let screen = Screen::default();
            let tuning = Tuning::default();
            let mut p = Player::new(screen);
            for (steer, dt) in moves {
                p.update(steer, dt, screen, &tuning);
                prop_assert!(p.pos.x >= 0.0);
                prop_assert!(p.pos.x <= screen.width - p.size.x);
                prop_assert!(p.tilt.abs() <= PLAYER_MAX_TILT);
            }
        }
    }
}
