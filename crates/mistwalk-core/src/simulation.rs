use std::collections::HashMap;

use crate::geometry::Vec2;

/// Unique identifier for a simulated player.
pub type PlayerId = u64;

/// A fixed-step world that advances every player by exactly one tick per call.
///
/// Ticks are synchronous and always run to completion. Given the same starting
/// state and the same command stream, a simulation must produce the same
/// resulting state (deterministic replay).
pub trait Simulation {
    /// Per-player input for one tick.
    type Command: Clone + Default;
    /// Notifications produced while ticking.
    type Event;

    /// Advance every player by one tick. Players without a command receive
    /// `Command::default()`.
    fn tick(&mut self, commands: &TickCommands<Self::Command>) -> Vec<Self::Event>;

    /// Number of ticks applied since creation.
    fn tick_count(&self) -> u64;

    /// Serialize the authoritative state (for replay checkpoints or snapshots).
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the state with a previously serialized one. Malformed bytes are ignored.
    fn apply_state(&mut self, state: &[u8]);

    /// Add a player at the level spawn point. Joining twice is a no-op.
    fn player_joined(&mut self, player_id: PlayerId);

    /// Remove a player and any per-player associations.
    fn player_left(&mut self, player_id: PlayerId);

    /// Put a player back at `spawn` with zero velocity in its initial state.
    fn respawn(&mut self, player_id: PlayerId, spawn: Vec2);

    /// Ids of all players currently simulated, in tick order.
    fn player_ids(&self) -> Vec<PlayerId>;
}

/// Collected commands from all players for a single tick.
#[derive(Debug, Clone)]
pub struct TickCommands<C> {
    pub commands: HashMap<PlayerId, C>,
}

impl<C> TickCommands<C> {
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    pub fn single(player_id: PlayerId, command: C) -> Self {
        let mut commands = HashMap::new();
        commands.insert(player_id, command);
        Self { commands }
    }
}

impl<C: Clone + Default> TickCommands<C> {
    pub fn for_player(&self, player_id: PlayerId) -> C {
        self.commands.get(&player_id).cloned().unwrap_or_default()
    }
}

impl<C> Default for TickCommands<C> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Generates `serialize_state`, `apply_state`, and `tick_count` for a
/// simulation whose struct has a `state: $StateType` field, where
/// `$StateType` has a `tick: u64` field.
#[macro_export]
macro_rules! simulation_state_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("simulation state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::warn!("Ignoring malformed simulation state: {e}"),
            }
        }

        fn tick_count(&self) -> u64 {
            self.state.tick
        }
    };
}
