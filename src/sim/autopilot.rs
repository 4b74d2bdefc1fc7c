//! Demo steering AI
//!
//! Used for attract mode and headless runs: dodge the nearest live helicopter
//! rising toward the skydiver, otherwise drift toward the nearest cloud.

use super::player::Steering;
use super::round::RoundController;

/// How far below the player (px) threats and bonuses are considered
const LOOK_AHEAD: f32 = 450.0;
/// Extra horizontal clearance wanted around a helicopter
const DODGE_MARGIN: f32 = 40.0;
/// Don't twitch for targets this close to centre
const DEAD_ZONE: f32 = 12.0;

/// Choose steering for the current frame
pub fn steer(round: &RoundController) -> Steering {
    let body = round.player.bounds();
    let center_x = body.center().x;

    let threat = round
        .helicopters
        .iter()
        .filter(|h| !h.exploded)
        .filter(|h| {
            let b = h.bounds();
            b.bottom() > body.top() && b.top() < body.bottom() + LOOK_AHEAD
        })
        .filter(|h| {
            let b = h.bounds();
            b.left() - DODGE_MARGIN < body.right() && body.left() < b.right() + DODGE_MARGIN
        })
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(heli) = threat {
        let heli_x = heli.bounds().center().x;
        let room_left = heli.bounds().left();
        let room_right = crate::consts::SCREEN_WIDTH - heli.bounds().right();
        // Prefer the side we're already on unless it's boxed in
        let go_left = if heli_x >= center_x {
            room_left >= body.size.x
        } else {
            room_right < body.size.x
        };
        return if go_left { Steering::Left } else { Steering::Right };
    }

    let target = round
        .clouds
        .iter()
        .filter(|c| {
            let b = c.bounds();
            b.bottom() > body.top() && b.top() < body.bottom() + LOOK_AHEAD
        })
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    match target {
        Some(cloud) => {
            let dx = cloud.bounds().center().x - center_x;
            if dx > DEAD_ZONE {
                Steering::Right
            } else if dx < -DEAD_ZONE {
                Steering::Left
            } else {
                Steering::None
            }
        }
        None => Steering::None,
    }
}
