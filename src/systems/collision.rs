use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::With;
use bevy_ecs::system::Query;
use glam::Vec2;
use smallvec::SmallVec;

use crate::error::GameError;
use crate::events::GameEvent;
use crate::systems::components::{Collider, FoodCollider, FramePath, PlayerCollider, Position};

/// An axis-aligned bounding box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Separating-axis test. Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max().x && self.max().x > other.min.x && self.min.y < other.max().y && self.max().y > other.min.y
    }
}

/// Tests the character against every food item and reports each overlap as a `GameEvent::Collision`.
///
/// The character's box is swept through every position it held during the step, so an item passed over
/// between frames is still collected when one host step spans several animation frames. Every overlapping
/// item is reported once in the same pass, and the item system collects them together.
pub fn collision_system(
    player_query: Query<(Entity, &Position, &FramePath, &Collider), With<PlayerCollider>>,
    food_query: Query<(Entity, &Position, &Collider), With<FoodCollider>>,
    mut events: EventWriter<GameEvent>,
    mut errors: EventWriter<GameError>,
) {
    let (player_entity, player_pos, path, player_collider) = match player_query.single() {
        Ok(player) => player,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player collider: {}",
                e
            )));
            return;
        }
    };

    let swept: SmallVec<[Aabb; 9]> = path
        .0
        .iter()
        .chain(std::iter::once(&player_pos.0))
        .map(|position| player_collider.aabb(*position))
        .collect();

    for (food_entity, food_pos, food_collider) in food_query.iter() {
        let food_box = food_collider.aabb(food_pos.0);
        if swept.iter().any(|player_box| player_box.overlaps(&food_box)) {
            events.write(GameEvent::Collision(player_entity, food_entity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_scenario() {
        let character = Aabb::new(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0));
        let food = Aabb::new(Vec2::new(60.0, 60.0), Vec2::new(30.0, 30.0));
        assert!(character.overlaps(&food));
        assert!(food.overlaps(&character));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let character = Aabb::new(Vec2::ZERO, Vec2::new(50.0, 50.0));
        let right = Aabb::new(Vec2::new(50.0, 0.0), Vec2::new(30.0, 30.0));
        let below = Aabb::new(Vec2::new(0.0, 50.0), Vec2::new(30.0, 30.0));
        assert!(!character.overlaps(&right));
        assert!(!character.overlaps(&below));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(50.0, 50.0));
        let b = Aabb::new(Vec2::new(10.0, 200.0), Vec2::new(30.0, 30.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Aabb::new(Vec2::ZERO, Vec2::new(50.0, 50.0));
        let inner = Aabb::new(Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0));
        assert!(outer.overlaps(&inner));
    }
}
