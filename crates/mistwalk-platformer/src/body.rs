use serde::{Deserialize, Serialize};

use mistwalk_core::geometry::{Rect, Vec2, overlaps_any};

use crate::config::BodyConfig;
use crate::state::{BehaviorFlags, PlayerState, Side};

/// The single mutable entity the movement core advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Top-left corner of the bounding box.
    pub position: Vec2,
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,

    // Contact
    pub grounded: bool,
    pub at_wall: bool,
    pub wall_side: Side,
    /// Wall last launched from; the same wall cannot be jumped off twice in a row.
    pub last_wall_jump_side: Side,

    // Capabilities
    pub can_jump: bool,
    pub can_double_jump: bool,
    /// Jump has been let go since the last jump; gates double jump.
    pub jump_released: bool,
    /// Run modifier was held at the last run-ability check.
    pub can_run: bool,

    pub flags: BehaviorFlags,
    pub state: PlayerState,
}

impl PlayerBody {
    /// A body standing at `spawn`, idle, with ground actions available.
    pub fn spawn(spawn: Vec2, width: f32, height: f32) -> Self {
        Self {
            position: spawn,
            velocity: Vec2::ZERO,
            width,
            height,
            grounded: true,
            at_wall: false,
            wall_side: Side::None,
            last_wall_jump_side: Side::None,
            can_jump: true,
            can_double_jump: true,
            jump_released: true,
            can_run: false,
            flags: BehaviorFlags::default(),
            state: PlayerState::Idle,
        }
    }

    pub fn from_config(config: &BodyConfig) -> Self {
        Self::spawn(
            Vec2::new(config.spawn_x, config.spawn_y),
            config.width,
            config.height,
        )
    }

    /// Back to `spawn` with zero velocity in IDLE. Dimensions are kept.
    pub fn reset(&mut self, spawn: Vec2) {
        *self = Self::spawn(spawn, self.width, self.height);
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_position(self.position, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Whether the body, shifted by (dx, dy), would touch any platform.
    pub fn touches_at(&self, dx: f32, dy: f32, platforms: &[Rect]) -> bool {
        overlaps_any(&self.bounds().translated(dx, dy), platforms)
    }

    pub fn overlaps(&self, platforms: &[Rect]) -> bool {
        self.touches_at(0.0, 0.0, platforms)
    }

    /// Box a renderer should draw: crouching keeps the feet in place and
    /// halves the height.
    pub fn render_bounds(&self) -> Rect {
        if self.state == PlayerState::Crouching {
            let half = self.height / 2.0;
            Rect::new(self.position.x, self.position.y + half, self.width, half)
        } else {
            self.bounds()
        }
    }
}
