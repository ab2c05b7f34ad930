//! Read-only view of the simulation for the host's renderer.

use bevy_ecs::entity::Entity;
use glam::Vec2;
use serde::Serialize;

use crate::food::FoodKind;
use crate::systems::GameStage;

/// Score, clock and stage of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameSession {
    pub score: u32,
    pub time_left: u32,
    pub stage: GameStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CharacterView {
    /// Eased top-left corner; what should be drawn.
    pub position: Vec2,
    pub target: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodView {
    /// Stable for the lifetime of the item.
    pub id: u64,
    pub position: Vec2,
    pub size: Vec2,
    pub kind: FoodKind,
    pub name: &'static str,
    pub points: u32,
    pub visual_key: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub id: u64,
    pub position: Vec2,
    /// Milliseconds since emission.
    pub age_ms: u64,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub arena: Vec2,
    pub character: Option<CharacterView>,
    pub food: Vec<FoodView>,
    pub particles: Vec<ParticleView>,
    pub session: GameSession,
}

/// Converts an entity into the identifier exposed to hosts.
pub fn entity_id(entity: Entity) -> u64 {
    entity.to_bits()
}

impl FoodView {
    pub fn new(entity: Entity, position: Vec2, size: Vec2, kind: FoodKind) -> Self {
        Self {
            id: entity_id(entity),
            position,
            size,
            kind,
            name: kind.name(),
            points: kind.points(),
            visual_key: kind.visual_key(),
        }
    }
}
