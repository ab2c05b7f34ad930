use std::time::Duration;

use bevy_ecs::{
    component::Component,
    entity::Entity,
    system::{Commands, Query, Res},
};

use crate::systems::DeltaTime;

/// Component for entities that should be automatically deleted after a fixed amount of simulated time
#[derive(Component, Debug, Clone, Copy)]
pub struct TimeToLive {
    pub remaining: Duration,
}

impl TimeToLive {
    pub fn new(duration: Duration) -> Self {
        Self { remaining: duration }
    }
}

/// System that manages entities with TimeToLive components, decrementing their remaining time
/// and despawning them when they expire
///
/// Runs regardless of the game stage, so nothing with a lifetime outlives it.
pub fn time_to_live_system(mut commands: Commands, dt: Res<DeltaTime>, mut query: Query<(Entity, &mut TimeToLive)>) {
    if dt.elapsed.is_zero() {
        return;
    }

    for (entity, mut ttl) in query.iter_mut() {
        if ttl.remaining <= dt.elapsed {
            // Entity has expired, despawn it
            commands.entity(entity).despawn();
        } else {
            ttl.remaining -= dt.elapsed;
        }
    }
}
