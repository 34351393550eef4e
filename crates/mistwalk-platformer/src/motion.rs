use mistwalk_core::geometry::Vec2;
use mistwalk_core::input::InputSnapshot;

use crate::body::PlayerBody;
use crate::config::MovementConfig;
use crate::state::{PlayerState, Side};

/// Below this |x speed| friction snaps the body to a stop.
pub const SLIDE_STOP_SPEED: f32 = 1.0;
/// Per-tick decay applied while walking faster than the walk cap.
pub const OVERSHOOT_DECAY: f32 = 1.0;

/// Horizontal acceleration regime, selected by state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Walk,
    Run,
    Air,
}

/// Nudge x speed toward the held direction(s), respecting the regime's cap.
/// Holding toward a remembered wall registers a wall push instead.
pub fn accelerate(
    body: &mut PlayerBody,
    input: &InputSnapshot,
    regime: Regime,
    config: &MovementConfig,
) {
    body.flags.wall_pushing = false;

    let (acc, cap, crouch_blocks) = match regime {
        Regime::Walk => (config.walk_acc, config.max_walk_speed, true),
        Regime::Run => (config.run_acc, config.max_run_speed, true),
        Regime::Air => {
            let cap = if body.can_run {
                config.max_run_speed
            } else {
                config.max_walk_speed
            };
            (config.air_acc, cap, false)
        },
    };
    let blocked = crouch_blocks && body.flags.crouching;

    if input.move_left && !blocked && body.velocity.x > -cap {
        push_toward(body, Side::Left, acc);
    }
    if input.move_right && !blocked && body.velocity.x < cap {
        push_toward(body, Side::Right, acc);
    }

    if regime == Regime::Walk {
        decay_overshoot(body, cap);
    }
}

fn push_toward(body: &mut PlayerBody, side: Side, acc: f32) {
    if body.wall_side == side {
        body.at_wall = true;
        body.flags.wall_pushing = true;
    } else {
        body.velocity.x += side.step() * acc;
        body.at_wall = false;
        body.flags.accelerating = true;
        body.wall_side = Side::None;
    }
}

/// Above `cap`, shed [`OVERSHOOT_DECAY`] per tick; once that would dip
/// below the cap, clamp to it exactly.
pub fn decay_overshoot(body: &mut PlayerBody, cap: f32) {
    let vx = body.velocity.x;
    if vx.abs() <= cap {
        return;
    }
    let sign = vx.signum();
    let decayed = vx - sign * OVERSHOOT_DECAY;
    body.velocity.x = if decayed.abs() < cap {
        sign * cap
    } else {
        decayed
    };
}

/// Multiplicative slide-down with no horizontal input, or always while
/// crouching. Sets `sliding` until the body comes to rest.
pub fn apply_friction(body: &mut PlayerBody, input: &InputSnapshot, config: &MovementConfig) {
    if !(input.no_horizontal() || body.state == PlayerState::Crouching) {
        return;
    }
    body.velocity.x *= config.friction;
    body.flags.sliding = true;
    if body.velocity.x.abs() <= SLIDE_STOP_SPEED {
        body.velocity.x = 0.0;
        body.flags.sliding = false;
    }
}

/// Uncapped: there is no terminal velocity.
pub fn apply_gravity(body: &mut PlayerBody, config: &MovementConfig) {
    if body.flags.falling {
        body.velocity.y += config.gravity;
    }
}

/// Move by velocity plus this tick's external force. The force is not fed
/// back into velocity.
pub fn advance(body: &mut PlayerBody, external_force: Vec2) {
    body.position += body.velocity + external_force;
}
