use std::time::Duration;

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;
use smallvec::SmallVec;

use crate::constants::{character::CHARACTER_SIZE, food::FOOD_SIZE, LOOP_TIME};
use crate::food::FoodKind;
use crate::systems::collision::Aabb;

/// A tag component for entities that are controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// Top-left corner of an entity in arena space.
///
/// For the character this is the *visual* position: the eased one that is drawn and collided.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

/// Where the character is heading; set immediately by input and always inside the arena.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveTarget(pub Vec2);

/// Every intermediate visual position the character passed through during the current step,
/// in order, excluding the final one held by [`Position`]. Empty when the step covered a single frame.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct FramePath(pub SmallVec<[Vec2; 8]>);

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub size: Vec2,
}

impl Collider {
    /// The bounding box of this collider placed at `position`.
    pub fn aabb(&self, position: Vec2) -> Aabb {
        Aabb::new(position, self.size)
    }
}

/// Marker components for collision filtering optimization
#[derive(Component)]
pub struct PlayerCollider;

#[derive(Component)]
pub struct FoodCollider;

#[derive(Bundle)]
pub struct CharacterBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub target: MoveTarget,
    pub path: FramePath,
    pub collider: Collider,
    pub player_collider: PlayerCollider,
}

impl CharacterBundle {
    pub fn at(position: Vec2) -> Self {
        Self {
            player: PlayerControlled,
            position: Position(position),
            target: MoveTarget(position),
            path: FramePath::default(),
            collider: Collider { size: CHARACTER_SIZE },
            player_collider: PlayerCollider,
        }
    }
}

#[derive(Bundle)]
pub struct FoodBundle {
    pub kind: FoodKind,
    pub position: Position,
    pub collider: Collider,
    pub food_collider: FoodCollider,
}

impl FoodBundle {
    pub fn new(kind: FoodKind, position: Vec2) -> Self {
        Self {
            kind,
            position: Position(position),
            collider: Collider { size: FOOD_SIZE },
            food_collider: FoodCollider,
        }
    }
}

#[derive(Resource)]
pub struct GlobalState {
    pub exit: bool,
}

/// Points collected since the session began. Only ever increases within a session.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResource(pub u32);

/// Time covered by the current frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct DeltaTime {
    pub seconds: f32,
    /// Animation frames represented by this step, never zero for a non-empty step
    pub ticks: u32,
    pub elapsed: Duration,
}

impl DeltaTime {
    pub const ZERO: DeltaTime = DeltaTime {
        seconds: 0.0,
        ticks: 0,
        elapsed: Duration::ZERO,
    };

    /// Splits a host delta into whole animation frames, rounding to the nearest and counting at least one.
    pub fn from_duration(elapsed: Duration) -> Self {
        let ticks = if elapsed.is_zero() {
            0
        } else {
            ((elapsed.as_secs_f64() / LOOP_TIME.as_secs_f64()).round() as u32).max(1)
        };

        Self {
            seconds: elapsed.as_secs_f32(),
            ticks,
            elapsed,
        }
    }
}

impl Default for DeltaTime {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Total simulated time since the game was created.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimulationTime(pub Duration);

/// The measured play area. Zero until the host reports a size.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct Arena {
    pub size: Vec2,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    /// Whether both extents are positive and finite.
    pub fn is_measured(&self) -> bool {
        self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0
    }

    /// Largest top-left coordinate that keeps a box of `size` inside the arena.
    pub fn max_corner(&self, size: Vec2) -> Vec2 {
        (self.size - size).max(Vec2::ZERO)
    }

    pub fn clamp(&self, position: Vec2, size: Vec2) -> Vec2 {
        position.clamp(Vec2::ZERO, self.max_corner(size))
    }

    /// Top-left coordinate that centers a box of `size`.
    pub fn centered(&self, size: Vec2) -> Vec2 {
        self.max_corner(size) / 2.0
    }
}
