pub mod body;
pub mod collision;
pub mod config;
pub mod level;
pub mod machine;
pub mod motion;
pub mod push;
pub mod state;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mistwalk_core::geometry::Vec2;
use mistwalk_core::input::InputSnapshot;
use mistwalk_core::simulation::{PlayerId, Simulation, TickCommands};
use mistwalk_core::simulation_state_boilerplate;

use body::PlayerBody;
use collision::Contact;
use config::PlatformerConfig;
use level::{Level, generate_level};
use push::{PushMode, PushTargets, push_force};
use state::{PlayerState, Side};

/// Seed used when no level is supplied.
pub const DEFAULT_LEVEL_SEED: u64 = 42;

/// One player's input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerCommand {
    pub controls: InputSnapshot,
    /// World-space cursor used to pick a metal to push or pull.
    pub cursor: Option<Vec2>,
    pub push: PushMode,
}

impl PlayerCommand {
    pub fn controls(controls: InputSnapshot) -> Self {
        Self {
            controls,
            ..Self::default()
        }
    }
}

/// Notifications produced while ticking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementEvent {
    StateChanged {
        player_id: PlayerId,
        from: PlayerState,
        to: PlayerState,
    },
    Landed {
        player_id: PlayerId,
    },
    WallJumped {
        player_id: PlayerId,
        side: Side,
    },
    /// The collision resolver gave up and froze the body in place.
    ResolverStuck {
        player_id: PlayerId,
    },
}

/// What a renderer needs to draw one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub state: &'static str,
}

/// Serializable world state for replay checkpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub players: BTreeMap<PlayerId, PlayerBody>,
    pub targets: PushTargets,
    pub tick: u64,
}

/// Players moving through one static level.
pub struct PlatformerWorld {
    config: PlatformerConfig,
    level: Level,
    state: WorldState,
}

impl PlatformerWorld {
    pub fn new(config: PlatformerConfig, level: Level) -> Self {
        Self {
            config,
            level,
            state: WorldState::default(),
        }
    }

    /// A world on a level generated from `seed`.
    pub fn from_seed(config: PlatformerConfig, seed: u64) -> Self {
        let level = generate_level(seed, &config.body);
        Self::new(config, level)
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn body(&self, player_id: PlayerId) -> Option<&PlayerBody> {
        self.state.players.get(&player_id)
    }

    /// Renderer-facing boxes, in tick order.
    pub fn views(&self) -> Vec<PlayerView> {
        self.state
            .players
            .iter()
            .map(|(&player_id, body)| {
                let r = body.render_bounds();
                PlayerView {
                    player_id,
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height: r.height,
                    state: body.state.name(),
                }
            })
            .collect()
    }
}

impl Default for PlatformerWorld {
    fn default() -> Self {
        Self::from_seed(PlatformerConfig::default(), DEFAULT_LEVEL_SEED)
    }
}

impl Simulation for PlatformerWorld {
    type Command = PlayerCommand;
    type Event = MovementEvent;

    fn tick(&mut self, commands: &TickCommands<PlayerCommand>) -> Vec<MovementEvent> {
        self.state.tick += 1;
        let mut events = Vec::new();

        let WorldState {
            players, targets, ..
        } = &mut self.state;
        for (&player_id, body) in players.iter_mut() {
            let command = commands.for_player(player_id);

            let force = targets
                .retarget(
                    player_id,
                    command.cursor,
                    &self.level.metals,
                    self.config.push.target_radius,
                )
                .and_then(|index| self.level.metals.get(index))
                .map(|metal| push_force(body.center(), metal.center(), command.push, &self.config.push))
                .unwrap_or(Vec2::ZERO);

            let outcome = body.tick(
                &command.controls,
                &self.level.platforms,
                force,
                &self.config.movement,
            );

            if outcome.contact == Contact::Stuck {
                events.push(MovementEvent::ResolverStuck { player_id });
            }
            if outcome.landed() {
                tracing::trace!(player_id, y = body.position.y, "Landed");
                events.push(MovementEvent::Landed { player_id });
            }
            if let Some(side) = outcome.wall_jumped {
                tracing::trace!(player_id, ?side, "Wall jump");
                events.push(MovementEvent::WallJumped { player_id, side });
            }
            if outcome.previous != body.state {
                tracing::debug!(
                    player_id,
                    from = %outcome.previous,
                    to = %body.state,
                    "State changed"
                );
                events.push(MovementEvent::StateChanged {
                    player_id,
                    from: outcome.previous,
                    to: body.state,
                });
            }
        }

        events
    }

    simulation_state_boilerplate!(state_type: WorldState);

    fn player_joined(&mut self, player_id: PlayerId) {
        if self.state.players.contains_key(&player_id) {
            return;
        }
        let body = PlayerBody::spawn(
            self.level.spawn,
            self.config.body.width,
            self.config.body.height,
        );
        self.state.players.insert(player_id, body);
        tracing::debug!(player_id, "Player joined");
    }

    fn player_left(&mut self, player_id: PlayerId) {
        self.state.players.remove(&player_id);
        self.state.targets.forget(player_id);
        tracing::debug!(player_id, "Player left");
    }

    fn respawn(&mut self, player_id: PlayerId, spawn: Vec2) {
        if let Some(body) = self.state.players.get_mut(&player_id) {
            body.reset(spawn);
            self.state.targets.forget(player_id);
            tracing::debug!(player_id, x = spawn.x, y = spawn.y, "Respawned");
        }
    }

    fn player_ids(&self) -> Vec<PlayerId> {
        self.state.players.keys().copied().collect()
    }
}
