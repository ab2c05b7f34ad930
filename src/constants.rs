//! This module contains all the constants used in the game.
//!
//! Most of these are only defaults; the values actually used at runtime live in
//! [`GameConfig`](crate::config::GameConfig) so they can be tuned without a rebuild.

use std::time::Duration;

use glam::Vec2;

/// Target duration of a single animation frame (60 FPS).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Session timing.
pub mod session {
    /// Length of a single session, in seconds.
    pub const GAME_DURATION: u32 = 60;
    /// Period of the game clock. The countdown drops by exactly one per period.
    pub const CLOCK_PERIOD: std::time::Duration = std::time::Duration::from_secs(1);
}

/// Food spawning.
pub mod spawn {
    use std::time::Duration;

    /// How often the spawner attempts to place a new food item.
    pub const FOOD_SPAWN_INTERVAL: Duration = Duration::from_millis(2000);
    /// Upper bound on live food items.
    pub const MAX_FOOD_ITEMS: usize = 10;
}

/// The player-controlled character.
pub mod character {
    use glam::Vec2;

    /// The character's bounding box.
    pub const CHARACTER_SIZE: Vec2 = Vec2::new(50.0, 50.0);
    /// Distance the target moves for a single directional intent.
    pub const CHARACTER_STEP: f32 = 20.0;
    /// Fraction of the remaining distance that is kept each frame (`visual += delta * (1 - factor)`).
    pub const SMOOTHING_FACTOR: f32 = 0.7;
    /// Below this remaining distance the visual position snaps onto the target.
    pub const MOVEMENT_THRESHOLD: f32 = 0.5;
    /// A frame's visual displacement must exceed this fraction of a step to emit a particle.
    pub const PARTICLE_EMIT_FRACTION: f32 = 0.1;
}

/// Collectible food.
pub mod food {
    use glam::Vec2;

    /// Every food item shares the same bounding box.
    pub const FOOD_SIZE: Vec2 = Vec2::new(30.0, 30.0);
}

/// Movement trail particles.
pub mod particle {
    use std::time::Duration;

    /// Lifetime of a single particle.
    pub const PARTICLE_DURATION: Duration = Duration::from_millis(450);
    /// Maximum number of live particles; the oldest are discarded beyond this.
    pub const MAX_PARTICLES_DISPLAYED: usize = 24;
}

/// Advisory notification durations.
pub mod notification {
    use std::time::Duration;

    pub const START_DURATION: Duration = Duration::from_secs(3);
    pub const COLLECT_DURATION: Duration = Duration::from_millis(1500);
    pub const GAME_OVER_DURATION: Duration = Duration::from_secs(5);
}

/// The arena used by the headless runner when no size is given.
pub const DEFAULT_ARENA_SIZE: Vec2 = Vec2::new(800.0, 600.0);
