//! Runtime configuration, layered from built-in defaults and `MAYHEM_*` environment variables.

use std::time::Duration;

use bevy_ecs::resource::Resource;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::constants::{character, particle, session, spawn};
use crate::error::{GameError, GameResult};

/// Prefix shared by every environment variable the game reads.
pub const ENV_PREFIX: &str = "MAYHEM_";

/// Tunable parameters of a session.
///
/// Every field defaults to the matching value in [`constants`](crate::constants).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Length of a session in seconds
    pub duration_secs: u32,
    /// Milliseconds between spawn attempts
    pub spawn_interval_ms: u64,
    /// Maximum number of live food items
    pub max_food_items: usize,
    /// Distance moved by one directional intent
    pub character_step: f32,
    /// Fraction of the remaining distance kept each frame, in (0, 1)
    pub smoothing_factor: f32,
    /// Remaining distance below which the visual position snaps to the target
    pub movement_threshold: f32,
    /// Lifetime of a movement particle in milliseconds
    pub particle_duration_ms: u64,
    /// Maximum number of live particles
    pub max_particles: usize,
    /// Fixed RNG seed; spawning is deterministic when set
    pub seed: Option<u64>,
    /// Initial mute flag handed to the sound service
    pub muted: bool,
    /// Fallback `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            duration_secs: session::GAME_DURATION,
            spawn_interval_ms: spawn::FOOD_SPAWN_INTERVAL.as_millis() as u64,
            max_food_items: spawn::MAX_FOOD_ITEMS,
            character_step: character::CHARACTER_STEP,
            smoothing_factor: character::SMOOTHING_FACTOR,
            movement_threshold: character::MOVEMENT_THRESHOLD,
            particle_duration_ms: particle::PARTICLE_DURATION.as_millis() as u64,
            max_particles: particle::MAX_PARTICLES_DISPLAYED,
            seed: None,
            muted: false,
            log_filter: format!("warn,{}=info", env!("CARGO_CRATE_NAME")),
        }
    }
}

impl GameConfig {
    /// Loads the configuration from defaults merged with `MAYHEM_*` environment variables, then validates it.
    pub fn load() -> GameResult<Self> {
        Self::figment().extract::<Self>()?.validated()
    }

    /// The layered provider stack, exposed so callers can merge extra sources on top.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Consumes the config, returning it only if every field is within range.
    pub fn validated(self) -> GameResult<Self> {
        self.validate()?;
        Ok(self)
    }

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> GameResult<()> {
        let reject = |message: &str| Err(GameError::Config(message.to_string()));

        if self.duration_secs == 0 {
            return reject("duration_secs must be positive");
        }
        if self.spawn_interval_ms == 0 {
            return reject("spawn_interval_ms must be positive");
        }
        if self.max_food_items == 0 {
            return reject("max_food_items must be positive");
        }
        if !(self.character_step > 0.0) {
            return reject("character_step must be positive");
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor < 1.0) {
            return reject("smoothing_factor must be within (0, 1)");
        }
        if !(self.movement_threshold >= 0.0) {
            return reject("movement_threshold must not be negative");
        }
        if self.particle_duration_ms == 0 {
            return reject("particle_duration_ms must be positive");
        }

        Ok(())
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn particle_duration(&self) -> Duration {
        Duration::from_millis(self.particle_duration_ms)
    }
}
