//! Periodic food placement.

use bevy_ecs::{
    entity::Entity,
    query::With,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::GameConfig;
use crate::constants::food::FOOD_SIZE;
use crate::food::FoodKind;
use crate::systems::scheduler::RepeatingTask;
use crate::systems::{Arena, DeltaTime, FoodBundle, FoodCollider};

/// The spawner's repeating timer.
#[derive(Resource, Debug)]
pub struct SpawnSchedule {
    pub task: RepeatingTask,
}

/// Randomness source for spawn positions and archetypes.
#[derive(Resource, Debug)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    /// Seeded deterministically when `seed` is given, from the OS otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_os_rng()),
        }
    }
}

/// A uniformly random top-left corner that keeps a food item inside the arena.
pub fn random_food_position(rng: &mut impl Rng, arena: &Arena) -> Vec2 {
    let max = arena.max_corner(FOOD_SIZE);
    Vec2::new(rng.random::<f32>() * max.x, rng.random::<f32>() * max.y)
}

/// Queues one food item if the arena is measured and fewer than `max_items` are alive.
///
/// Returns `None` without side effects when either precondition fails.
pub fn try_spawn_food(
    commands: &mut Commands,
    rng: &mut GameRng,
    arena: &Arena,
    live_items: usize,
    max_items: usize,
) -> Option<Entity> {
    if !arena.is_measured() {
        trace!("Skipping spawn, arena not measured");
        return None;
    }
    if live_items >= max_items {
        trace!(live_items, "Skipping spawn, food cap reached");
        return None;
    }

    let kind = FoodKind::random(&mut rng.0);
    let position = random_food_position(&mut rng.0, arena);
    let entity = commands.spawn(FoodBundle::new(kind, position)).id();
    debug!(food_entity = ?entity, ?kind, x = position.x, y = position.y, "Food spawned");
    Some(entity)
}

/// Attempts one spawn per elapsed spawn interval.
pub fn food_spawn_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    config: Res<GameConfig>,
    arena: Res<Arena>,
    mut schedule: ResMut<SpawnSchedule>,
    mut rng: ResMut<GameRng>,
    food: Query<(), With<FoodCollider>>,
) {
    let attempts = schedule.task.advance(dt.elapsed);
    let mut live_items = food.iter().count();
    for _ in 0..attempts {
        if try_spawn_food(&mut commands, &mut rng, &arena, live_items, config.max_food_items).is_some() {
            live_items += 1;
        }
    }
}
