use serde::{Deserialize, Serialize};

use mistwalk_core::geometry::{CONTACT_PADDING, Rect, Vec2};

use crate::body::PlayerBody;
use crate::state::Side;

/// How an overlap was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    /// Nothing overlapped.
    Clear,
    /// Stepped back up out of a floor; ground actions are restored.
    Floor,
    /// Stepped back down out of a ceiling.
    Ceiling,
    /// Stepped back sideways off a wall on the given side.
    Wall(Side),
    /// The step budget ran out. Velocity was frozen and the body returned
    /// to where it started the tick.
    Stuck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Walk the body back along this tick's displacement (from `origin`, where
/// it started the tick) one unit at a time until it no longer overlaps,
/// then classify the contact and zero the velocity component on the axis
/// that cleared it.
///
/// The axis to step is the one behind schedule relative to the slope
/// |dy / dx|: the first step takes the dominant axis, later steps compare
/// the running ratio y_steps / x_steps against the slope. A zero x
/// displacement means an infinite slope, so only y is stepped.
pub fn resolve(body: &mut PlayerBody, platforms: &[Rect], origin: Vec2) -> Contact {
    if !body.overlaps(platforms) {
        return Contact::Clear;
    }

    let displacement = body.position - origin;
    let slope = if displacement.x == 0.0 {
        f32::INFINITY
    } else {
        (displacement.y / displacement.x).abs()
    };
    let budget = step_budget(body, displacement);

    let mut x_steps = 0u32;
    let mut y_steps = 0u32;
    while x_steps + y_steps < budget {
        let Some(axis) = next_axis(displacement, slope, x_steps, y_steps) else {
            break;
        };
        match axis {
            Axis::X => {
                body.position.x -= displacement.x.signum();
                x_steps += 1;
            },
            Axis::Y => {
                body.position.y -= displacement.y.signum();
                y_steps += 1;
            },
        }
        if !body.overlaps(platforms) {
            return settle(body, axis, displacement);
        }
    }

    tracing::warn!(
        x = origin.x,
        y = origin.y,
        dx = displacement.x,
        dy = displacement.y,
        "Collision resolver exhausted its step budget; freezing body"
    );
    body.position = origin;
    body.velocity = Vec2::ZERO;
    Contact::Stuck
}

/// Enough unit steps to retrace the whole displacement and then clear the
/// body's own extent plus padding on both sides.
fn step_budget(body: &PlayerBody, displacement: Vec2) -> u32 {
    let retrace = displacement.x.abs().ceil() + displacement.y.abs().ceil();
    let extent = body.width.max(body.height).ceil() + 2.0 * CONTACT_PADDING;
    let budget = retrace + extent + 1.0;
    if budget.is_finite() {
        budget.min(u32::MAX as f32) as u32
    } else {
        0
    }
}

fn next_axis(displacement: Vec2, slope: f32, x_steps: u32, y_steps: u32) -> Option<Axis> {
    let moves_x = displacement.x != 0.0;
    let moves_y = displacement.y != 0.0;
    match (moves_x, moves_y) {
        (false, false) => None,
        (true, false) => Some(Axis::X),
        (false, true) => Some(Axis::Y),
        (true, true) => {
            if x_steps == 0 && y_steps == 0 {
                if displacement.y.abs() > displacement.x.abs() {
                    Some(Axis::Y)
                } else {
                    Some(Axis::X)
                }
            } else if x_steps == 0 || y_steps as f32 / x_steps as f32 >= slope {
                Some(Axis::X)
            } else {
                Some(Axis::Y)
            }
        },
    }
}

fn settle(body: &mut PlayerBody, axis: Axis, displacement: Vec2) -> Contact {
    match axis {
        Axis::Y => {
            body.velocity.y = 0.0;
            if displacement.y > 0.0 {
                body.grounded = true;
                body.can_jump = true;
                body.can_double_jump = true;
                body.last_wall_jump_side = Side::None;
                body.flags.falling = false;
                body.flags.landing = true;
                Contact::Floor
            } else {
                Contact::Ceiling
            }
        },
        Axis::X => {
            let side = if displacement.x > 0.0 {
                Side::Right
            } else {
                Side::Left
            };
            body.at_wall = true;
            body.wall_side = side;
            body.velocity.x = 0.0;
            Contact::Wall(side)
        },
    }
}

/// Ground check: look one unit down. With nothing there the floor has gone,
/// so the body starts falling and loses its ground jump.
pub fn check_if_falling(body: &mut PlayerBody, platforms: &[Rect]) {
    if !body.touches_at(0.0, 1.0, platforms) {
        body.flags.falling = true;
        body.can_jump = false;
        body.grounded = false;
    }
}

/// Wall check: look one unit toward the remembered wall side. If nothing is
/// there the wall has been left.
pub fn check_if_at_wall(body: &mut PlayerBody, platforms: &[Rect]) {
    if !body.touches_at(body.wall_side.step(), 0.0, platforms) {
        body.at_wall = false;
        body.wall_side = Side::None;
    }
}
