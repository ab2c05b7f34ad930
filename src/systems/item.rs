use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::With,
    system::{Commands, Query, ResMut},
};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::audio::Sound;
use crate::error::GameError;
use crate::events::GameEvent;
use crate::food::FoodKind;
use crate::systems::{AudioEvent, FoodCollider, NotificationEvent, PlayerCollider, ScoreResource};

/// Collects every food item the character touched this frame.
///
/// All pickups are applied as one batch: the score rises by the sum of their points and the items
/// are despawned together at the next command flush. Each item counts once, even when reported twice.
pub fn item_system(
    mut commands: Commands,
    mut collision_events: EventReader<GameEvent>,
    mut score: ResMut<ScoreResource>,
    players: Query<Entity, With<PlayerCollider>>,
    food_query: Query<&FoodKind, With<FoodCollider>>,
    mut audio_events: EventWriter<AudioEvent>,
    mut notifications: EventWriter<NotificationEvent>,
    mut errors: EventWriter<GameError>,
) {
    let player = match players.single() {
        Ok(entity) => entity,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for item system: {}",
                e
            )));
            return;
        }
    };

    let mut collected: SmallVec<[(Entity, FoodKind); 4]> = SmallVec::new();

    for event in collision_events.read() {
        let GameEvent::Collision(entity1, entity2) = *event else {
            continue;
        };

        // Check if one is the character and the other is food
        let food_entity = if player == entity1 {
            entity2
        } else if player == entity2 {
            entity1
        } else {
            continue;
        };

        if collected.iter().any(|(entity, _)| *entity == food_entity) {
            continue;
        }
        if let Ok(kind) = food_query.get(food_entity) {
            collected.push((food_entity, *kind));
        }
    }

    if collected.is_empty() {
        return;
    }

    let gained: u32 = collected.iter().map(|(_, kind)| kind.points()).sum();
    score.0 += gained;
    debug!(items = collected.len(), gained, score = score.0, "Food collected");

    for (entity, kind) in collected {
        trace!(food_entity = ?entity, ?kind, points = kind.points(), "Item collected by player");
        commands.entity(entity).despawn();
        audio_events.write(AudioEvent::Play(Sound::Collect(kind)));
        notifications.write(NotificationEvent::collected(kind));
    }
}
