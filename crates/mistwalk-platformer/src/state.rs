use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the player a wall is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    None,
    Left,
    Right,
}

impl Side {
    /// Unit step toward this side along x.
    pub fn step(self) -> f32 {
        match self {
            Side::None => 0.0,
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// The player's discrete movement state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Idle,
    Walking,
    Running,
    Sliding,
    Jumping,
    DoubleJumping,
    Falling,
    WallFalling,
    /// Launched off the wall on `from`.
    WallJumping {
        from: Side,
    },
    Landing,
    Crouching,
    AtWall,
}

impl PlayerState {
    pub const COUNT: usize = 12;

    pub fn name(&self) -> &'static str {
        match self {
            PlayerState::Idle => "IDLE",
            PlayerState::Walking => "WALKING",
            PlayerState::Running => "RUNNING",
            PlayerState::Sliding => "SLIDING",
            PlayerState::Jumping => "JUMPING",
            PlayerState::DoubleJumping => "DOUBLE_JUMPING",
            PlayerState::Falling => "FALLING",
            PlayerState::WallFalling => "WALL_FALLING",
            PlayerState::WallJumping { .. } => "WALL_JUMPING",
            PlayerState::Landing => "LANDING",
            PlayerState::Crouching => "CROUCHING",
            PlayerState::AtWall => "AT_WALL",
        }
    }

    pub fn is_airborne(&self) -> bool {
        matches!(
            self,
            PlayerState::Jumping
                | PlayerState::DoubleJumping
                | PlayerState::Falling
                | PlayerState::WallFalling
                | PlayerState::WallJumping { .. }
        )
    }

    /// The flag bundle that defines what being in this state means. Rebuilt
    /// at the start of every tick; condition checks may then override it.
    pub fn assumptions(&self) -> Assumptions {
        let mut a = Assumptions::default();
        match self {
            PlayerState::Idle => a.grounded = true,
            PlayerState::Walking | PlayerState::Running | PlayerState::Landing => {
                a.grounded = true;
                a.flags.accelerating = true;
            },
            PlayerState::Sliding => {
                a.grounded = true;
                a.flags.sliding = true;
            },
            PlayerState::Jumping => {
                a.flags.jumping = true;
                a.flags.falling = true;
            },
            PlayerState::DoubleJumping => {
                a.flags.double_jumping = true;
                a.flags.falling = true;
            },
            PlayerState::Falling => a.flags.falling = true,
            PlayerState::WallFalling => {
                a.flags.falling = true;
                a.flags.wall_pushing = true;
            },
            PlayerState::WallJumping { .. } => {
                a.flags.accelerating = true;
                a.flags.wall_jumping = true;
                a.flags.falling = true;
            },
            PlayerState::Crouching => {
                a.grounded = true;
                a.flags.sliding = true;
                a.flags.crouching = true;
            },
            PlayerState::AtWall => {
                a.grounded = true;
                a.flags.wall_pushing = true;
            },
        }
        a
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-tick behaviour flags. Consequences of the state plus this tick's
/// checks; none of them carries meaning into the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BehaviorFlags {
    pub accelerating: bool,
    pub sliding: bool,
    pub jumping: bool,
    pub double_jumping: bool,
    pub wall_jumping: bool,
    pub falling: bool,
    pub landing: bool,
    pub crouching: bool,
    pub wall_pushing: bool,
}

/// A state's entry bundle: behaviour flags plus the grounded contact it asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Assumptions {
    pub grounded: bool,
    pub flags: BehaviorFlags,
}
