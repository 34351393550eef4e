use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "MISTWALK_PLATFORMER_CONFIG";
/// Config file used when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/platformer.toml";

/// Per-tick movement tuning. Units are world units and ticks; y grows
/// downward, so jump speeds are negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Added to y speed every tick while falling.
    pub gravity: f32,
    pub walk_acc: f32,
    pub run_acc: f32,
    pub air_acc: f32,
    pub max_walk_speed: f32,
    pub max_run_speed: f32,
    /// Fraction of x speed kept per tick while sliding.
    pub friction: f32,
    pub full_jump_speed: f32,
    /// Y speed forced when a jump is cut short.
    pub short_jump_speed: f32,
    pub double_jump_speed: f32,
    pub wall_jump_y_speed: f32,
    /// Horizontal speed away from the wall on a wall jump.
    pub wall_jump_x_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            walk_acc: 1.0,
            run_acc: 1.0,
            air_acc: 1.0,
            max_walk_speed: 8.0,
            max_run_speed: 15.0,
            friction: 0.8,
            full_jump_speed: -17.0,
            short_jump_speed: -10.0,
            double_jump_speed: -15.0,
            wall_jump_y_speed: -15.0,
            wall_jump_x_speed: 6.0,
        }
    }
}

/// Player bounding box and spawn point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 100.0,
            spawn_x: 0.0,
            spawn_y: 190.0,
        }
    }
}

/// Metal push/pull tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Force numerator; magnitude falls off with distance squared.
    pub strength: f32,
    /// Cursor must be strictly closer than this to a metal to target it.
    pub target_radius: f32,
    /// Force components smaller than this are dropped.
    pub dead_zone: f32,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            strength: 20_000.0,
            target_radius: 80.0,
            dead_zone: 0.3,
        }
    }
}

/// Top-level platformer configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub movement: MovementConfig,
    pub body: BodyConfig,
    pub push: PushConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid {field} = {value}: {reason}")]
    Invalid {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

impl PlatformerConfig {
    /// Load from `$MISTWALK_PLATFORMER_CONFIG` or `config/platformer.toml`.
    /// A missing file yields validated defaults; a broken or out-of-range
    /// file is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            tracing::info!(path = %path, "No platformer config, using defaults");
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let config = Self::parse(&content, &shown)?;
        tracing::info!(path = %shown, "Loaded platformer config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every constant once, before any tick runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        positive("movement.gravity", m.gravity)?;
        positive("movement.walk_acc", m.walk_acc)?;
        positive("movement.run_acc", m.run_acc)?;
        positive("movement.air_acc", m.air_acc)?;
        positive("movement.max_walk_speed", m.max_walk_speed)?;
        positive("movement.max_run_speed", m.max_run_speed)?;
        if m.max_run_speed < m.max_walk_speed {
            return Err(invalid(
                "movement.max_run_speed",
                m.max_run_speed,
                "must not be below max_walk_speed",
            ));
        }
        finite("movement.friction", m.friction)?;
        if m.friction <= 0.0 || m.friction >= 1.0 {
            return Err(invalid("movement.friction", m.friction, "must be in (0, 1)"));
        }
        upward("movement.full_jump_speed", m.full_jump_speed)?;
        upward("movement.short_jump_speed", m.short_jump_speed)?;
        upward("movement.double_jump_speed", m.double_jump_speed)?;
        upward("movement.wall_jump_y_speed", m.wall_jump_y_speed)?;
        if m.short_jump_speed.abs() > m.full_jump_speed.abs() {
            return Err(invalid(
                "movement.short_jump_speed",
                m.short_jump_speed,
                "must not be stronger than full_jump_speed",
            ));
        }
        positive("movement.wall_jump_x_speed", m.wall_jump_x_speed)?;

        let b = &self.body;
        positive("body.width", b.width)?;
        positive("body.height", b.height)?;
        finite("body.spawn_x", b.spawn_x)?;
        finite("body.spawn_y", b.spawn_y)?;

        let p = &self.push;
        non_negative("push.strength", p.strength)?;
        positive("push.target_radius", p.target_radius)?;
        non_negative("push.dead_zone", p.dead_zone)?;
        Ok(())
    }
}

fn invalid(field: &'static str, value: f32, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        field,
        value,
        reason,
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be greater than zero"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must not be negative"))
    }
}

fn upward(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be negative (upward)"))
    }
}
