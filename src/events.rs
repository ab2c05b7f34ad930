use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::direction::Direction;

/// Commands a host can submit between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Exit,
    MoveCharacter(Direction),
    MuteAudio,
    Restart,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
    Collision(Entity, Entity),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// A new measurement of the play area from the host.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct ArenaResized {
    pub size: Vec2,
}

/// Triggered to enter `Running`, either on first measurement or on restart.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeginSession;

/// Triggered once when the countdown runs out.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionEnded {
    pub final_score: u32,
}
