use crate::components::{Body, Velocity};
use crate::game_logic::navigation::MovementIntent;
use crate::pathfinding::{AgentKind, OccupancyOracle};
use bevy::prelude::*;

/// Per-frame physics constants, tuned for 60 FPS
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicConfig {
    pub gravity: f32,
    pub jump_speed: f32,
    pub max_fall_speed: f32,
}

impl Default for KinematicConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            jump_speed: 15.0,
            max_fall_speed: 20.0,
        }
    }
}

/// Something solid one pixel under the body
pub fn is_grounded<O: OccupancyOracle + ?Sized>(body: &Body, oracle: &O) -> bool {
    !box_free(body, body.position + Vec2::Y, oracle)
}

fn box_free<O: OccupancyOracle + ?Sized>(body: &Body, position: Vec2, oracle: &O) -> bool {
    oracle.is_position_free(position.x, position.y, body.size.x, body.size.y)
}

/// Move along one axis; when blocked, creep forward a pixel at a time up to
/// contact. Returns whether the move was cut short.
fn move_axis<O: OccupancyOracle + ?Sized>(body: &mut Body, delta: Vec2, oracle: &O) -> bool {
    if delta == Vec2::ZERO {
        return false;
    }

    let target = body.position + delta;
    if box_free(body, target, oracle) {
        body.position = target;
        return false;
    }

    let distance = delta.length();
    let direction = delta / distance;
    let mut moved = 0.0;
    while moved < distance {
        let step = (distance - moved).min(1.0);
        let next = body.position + direction * step;
        if !box_free(body, next, oracle) {
            break;
        }
        body.position = next;
        moved += step;
    }
    true
}

/// Apply one frame of intent, jumping, gravity and collision.
///
/// Returns whether the body ends the frame on the ground.
pub fn integrate<O: OccupancyOracle + ?Sized>(
    body: &mut Body,
    velocity: &mut Velocity,
    intent: &MovementIntent,
    kind: AgentKind,
    oracle: &O,
    config: &KinematicConfig,
    delta_seconds: f32,
) -> bool {
    let frame_scale = delta_seconds * 60.0;

    match kind {
        AgentKind::Flying => {
            velocity.0 = Vec2::new(intent.horizontal_speed, intent.vertical_speed);
        }
        AgentKind::Ground => {
            velocity.0.x = intent.horizontal_speed;
            if intent.jump && is_grounded(body, oracle) {
                velocity.0.y = -config.jump_speed;
            }
            velocity.0.y = (velocity.0.y + config.gravity * frame_scale).min(config.max_fall_speed);
        }
    }

    if move_axis(body, Vec2::new(velocity.0.x * frame_scale, 0.0), oracle) {
        velocity.0.x = 0.0;
    }
    if move_axis(body, Vec2::new(0.0, velocity.0.y * frame_scale), oracle) {
        velocity.0.y = 0.0;
    }

    is_grounded(body, oracle)
}
