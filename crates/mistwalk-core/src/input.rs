use serde::{Deserialize, Serialize};

/// Logical controls the movement core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    MoveLeft,
    MoveRight,
    Jump,
    Crouch,
    Run,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::MoveLeft,
        Control::MoveRight,
        Control::Jump,
        Control::Crouch,
        Control::Run,
    ];
}

/// Immutable per-tick view of which controls are held.
///
/// Level-triggered: a control is active for every tick it is held. Edge
/// detection (jump release for double jump) is tracked by the player body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub crouch: bool,
    pub run: bool,
}

impl InputSnapshot {
    pub fn from_controls(controls: &[Control]) -> Self {
        controls
            .iter()
            .fold(Self::default(), |snapshot, &c| snapshot.with(c))
    }

    pub fn with(mut self, control: Control) -> Self {
        *self.slot_mut(control) = true;
        self
    }

    pub fn is_active(&self, control: Control) -> bool {
        match control {
            Control::MoveLeft => self.move_left,
            Control::MoveRight => self.move_right,
            Control::Jump => self.jump,
            Control::Crouch => self.crouch,
            Control::Run => self.run,
        }
    }

    /// Neither horizontal direction is held.
    pub fn no_horizontal(&self) -> bool {
        !self.move_left && !self.move_right
    }

    fn slot_mut(&mut self, control: Control) -> &mut bool {
        match control {
            Control::MoveLeft => &mut self.move_left,
            Control::MoveRight => &mut self.move_right,
            Control::Jump => &mut self.jump,
            Control::Crouch => &mut self.crouch,
            Control::Run => &mut self.run,
        }
    }
}

/// A live input device (keyboard poller, gamepad, replay file) that can be
/// asked whether a control is currently held.
pub trait ControlSource {
    fn is_control_active(&self, control: Control) -> bool;

    /// Freeze the current device state into a snapshot for one tick.
    fn snapshot(&self) -> InputSnapshot {
        Control::ALL
            .iter()
            .filter(|&&c| self.is_control_active(c))
            .fold(InputSnapshot::default(), |s, &c| s.with(c))
    }
}

impl ControlSource for InputSnapshot {
    fn is_control_active(&self, control: Control) -> bool {
        self.is_active(control)
    }
}
