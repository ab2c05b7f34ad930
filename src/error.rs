//! Centralized error types for the game.
//!
//! The simulation itself has no fatal conditions: unmet preconditions degrade to no-ops.
//! These types cover configuration, collaborator failures and inconsistent world state.

use bevy_ecs::event::Event;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs. It doubles as an
/// ECS event so that systems can report problems without interrupting the frame.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Failures reported by the sound and notification collaborators.
///
/// These are logged and dropped by the dispatch systems; they never reach simulation state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Service unavailable")]
    Unavailable,
}

impl From<figment::Error> for GameError {
    fn from(error: figment::Error) -> Self {
        GameError::Config(error.to_string())
    }
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
