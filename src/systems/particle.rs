//! Short-lived trail particles left behind by a moving character.

use std::time::Duration;

use bevy_ecs::{
    bundle::Bundle,
    component::Component,
    entity::Entity,
    query::With,
    system::{Commands, Query, Res},
};
use glam::Vec2;
use smallvec::SmallVec;
use tracing::trace;

use crate::config::GameConfig;
use crate::systems::{lifetime::TimeToLive, Position};

/// Marks a particle and records when it was emitted, in simulation time.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub created_at: Duration,
}

#[derive(Bundle)]
pub struct ParticleBundle {
    pub particle: Particle,
    pub position: Position,
    pub ttl: TimeToLive,
}

/// Queues a particle at `position`, expiring `lifetime` after `now`.
pub fn emit_particle(commands: &mut Commands, position: Vec2, now: Duration, lifetime: Duration) -> Entity {
    trace!(x = position.x, y = position.y, "Emitting particle");
    commands
        .spawn(ParticleBundle {
            particle: Particle { created_at: now },
            position: Position(position),
            ttl: TimeToLive::new(lifetime),
        })
        .id()
}

/// Discards the oldest particles once more than `max_particles` are alive.
pub fn particle_cap_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    particles: Query<(Entity, &Particle), With<TimeToLive>>,
) {
    let live = particles.iter().count();
    if live <= config.max_particles {
        return;
    }

    // Newest first; entity order breaks ties between particles emitted in the same frame
    let mut ordered: SmallVec<[(Duration, Entity); 32]> = particles.iter().map(|(e, p)| (p.created_at, e)).collect();
    ordered.sort_unstable_by(|a, b| b.cmp(a));

    for (_, entity) in ordered.into_iter().skip(config.max_particles) {
        commands.entity(entity).despawn();
    }
    trace!(discarded = live - config.max_particles, "Particle cap reached");
}
