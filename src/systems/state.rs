//! The session lifecycle: `Idle → Running → GameOver → Running`.

use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    observer::Trigger,
    query::{Or, With},
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::{debug, info};

use crate::audio::Sound;
use crate::config::GameConfig;
use crate::events::{BeginSession, GameCommand, GameEvent, SessionEnded};
use crate::systems::spawner::try_spawn_food;
use crate::systems::{
    Arena, AudioEvent, Collider, Countdown, FoodCollider, GameRng, MoveTarget, NotificationEvent, Particle,
    PlayerControlled, Position, ScoreResource, SpawnSchedule,
};

/// A resource to track the overall stage of the game from a high-level perspective.
#[derive(Resource, Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, AsRefStr)]
pub enum GameStage {
    /// Waiting for the host to report a usable arena size.
    #[default]
    Idle,
    /// The clock is running; spawning, movement and collection are active.
    Running,
    /// The clock ran out. Only a restart leaves this stage.
    GameOver,
}

/// Run condition for systems that only advance while a session is live.
pub fn is_running(stage: Res<GameStage>) -> bool {
    *stage == GameStage::Running
}

/// Starts the first session as soon as the arena has a positive extent.
pub fn startup_system(mut commands: Commands, stage: Res<GameStage>, arena: Res<Arena>) {
    if *stage == GameStage::Idle && arena.is_measured() {
        info!(width = arena.size.x, height = arena.size.y, "Arena ready, starting first session");
        commands.trigger(BeginSession);
    }
}

/// Honors restart requests from `GameOver`; anywhere else they are ignored.
pub fn restart_system(mut commands: Commands, mut events: EventReader<GameEvent>, stage: Res<GameStage>) {
    let mut requested = false;
    for event in events.read() {
        if matches!(event, GameEvent::Command(GameCommand::Restart)) {
            requested = true;
        }
    }

    if !requested {
        return;
    }

    match *stage {
        GameStage::GameOver => {
            info!("Restarting session");
            commands.trigger(BeginSession);
        }
        stage => debug!(stage = stage.as_ref(), "Ignoring restart request"),
    }
}

/// Resets every piece of session state and enters `Running`.
///
/// Shared by the first start and every restart, so both go through the same full reset.
#[allow(clippy::too_many_arguments)]
pub fn begin_session_observer(
    _: Trigger<BeginSession>,
    mut commands: Commands,
    config: Res<GameConfig>,
    arena: Res<Arena>,
    mut stage: ResMut<GameStage>,
    mut score: ResMut<ScoreResource>,
    mut countdown: ResMut<Countdown>,
    mut spawns: ResMut<SpawnSchedule>,
    mut rng: ResMut<GameRng>,
    mut players: Query<(&mut Position, &mut MoveTarget, &Collider), With<PlayerControlled>>,
    leftovers: Query<Entity, Or<(With<FoodCollider>, With<Particle>)>>,
    mut audio_events: EventWriter<AudioEvent>,
    mut notifications: EventWriter<NotificationEvent>,
) {
    let cleared = leftovers.iter().count();
    for entity in leftovers.iter() {
        commands.entity(entity).despawn();
    }

    score.0 = 0;
    countdown.time_left = config.duration_secs;
    countdown.task.start();
    spawns.task.start();

    for (mut position, mut target, collider) in players.iter_mut() {
        let center = arena.centered(collider.size);
        position.0 = center;
        target.0 = center;
    }

    // Seed the arena right away instead of waiting a full interval
    try_spawn_food(&mut commands, &mut rng, &arena, 0, config.max_food_items);

    *stage = GameStage::Running;
    info!(duration = config.duration_secs, cleared, "Session started");

    audio_events.write(AudioEvent::StartLoop);
    notifications.write(NotificationEvent::session_started());
}

/// Reports the end of a session to the sound and notification collaborators.
pub fn game_over_observer(
    trigger: Trigger<SessionEnded>,
    mut audio_events: EventWriter<AudioEvent>,
    mut notifications: EventWriter<NotificationEvent>,
) {
    let final_score = trigger.event().final_score;
    info!(final_score, "Game over");

    audio_events.write(AudioEvent::StopLoop);
    audio_events.write(AudioEvent::Play(Sound::GameOver));
    notifications.write(NotificationEvent::game_over(final_score));
}
