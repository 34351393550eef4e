//! Push/pull on metal items: the per-tick external force source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mistwalk_core::geometry::{Rect, Vec2};
use mistwalk_core::simulation::PlayerId;

use crate::config::PushConfig;

/// Side length of a metal item.
pub const METAL_SIZE: f32 = 5.0;

/// A small metal item that can be pushed off or pulled toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metal {
    /// Top-left corner.
    pub position: Vec2,
}

impl Metal {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_position(self.position, METAL_SIZE, METAL_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PushMode {
    #[default]
    None,
    /// Force away from the targeted metal.
    Push,
    /// Force toward the targeted metal.
    Pull,
}

/// Which metal each player currently has targeted, by index into the level's
/// metal list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTargets {
    targets: BTreeMap<PlayerId, usize>,
}

impl PushTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target the first metal whose centre is strictly within `radius` of
    /// the cursor. No cursor, or nothing in range, clears the target.
    pub fn retarget(
        &mut self,
        player_id: PlayerId,
        cursor: Option<Vec2>,
        metals: &[Metal],
        radius: f32,
    ) -> Option<usize> {
        let found = cursor.and_then(|cursor| {
            metals
                .iter()
                .position(|m| (m.center() - cursor).length() < radius)
        });
        match found {
            Some(index) => {
                self.targets.insert(player_id, index);
            },
            None => {
                self.targets.remove(&player_id);
            },
        }
        found
    }

    pub fn target(&self, player_id: PlayerId) -> Option<usize> {
        self.targets.get(&player_id).copied()
    }

    pub fn forget(&mut self, player_id: PlayerId) {
        self.targets.remove(&player_id);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Inverse-square force on a body centred at `body_center` from a metal
/// centred at `metal_center`.
pub fn push_force(
    body_center: Vec2,
    metal_center: Vec2,
    mode: PushMode,
    config: &PushConfig,
) -> Vec2 {
    let sign = match mode {
        PushMode::None => return Vec2::ZERO,
        PushMode::Push => 1.0,
        PushMode::Pull => -1.0,
    };

    let away = body_center - metal_center;
    let dist_sq = away.x * away.x + away.y * away.y;
    if dist_sq == 0.0 {
        return Vec2::ZERO;
    }

    let magnitude = config.strength / dist_sq;
    let dist = dist_sq.sqrt();
    let force = Vec2::new(
        dead_zone(sign * magnitude * away.x / dist, config.dead_zone),
        dead_zone(sign * magnitude * away.y / dist, config.dead_zone),
    );
    force.finite_or_zero()
}

fn dead_zone(component: f32, threshold: f32) -> f32 {
    if component.abs() < threshold { 0.0 } else { component }
}
