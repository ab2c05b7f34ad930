//! Character movement: instant target updates from input, eased visual motion per frame.

use bevy_ecs::event::{EventReader, EventWriter};
use bevy_ecs::query::With;
use bevy_ecs::system::{Commands, Query, Res, ResMut};
use glam::Vec2;
use tracing::{debug, info, trace};

use crate::audio::Sound;
use crate::config::GameConfig;
use crate::constants::character::PARTICLE_EMIT_FRACTION;
use crate::direction::Direction;
use crate::error::GameError;
use crate::events::{ArenaResized, GameCommand, GameEvent};
use crate::systems::particle::emit_particle;
use crate::systems::{
    Arena, AudioEvent, AudioState, Collider, DeltaTime, FramePath, GameStage, GlobalState, MoveTarget, PlayerControlled,
    Position, SimulationTime,
};

/// Moves `target` one `step` in `direction` and clamps the result so a box of `size` stays inside the arena.
pub fn step_target(arena: &Arena, target: Vec2, size: Vec2, direction: Direction, step: f32) -> Vec2 {
    arena.clamp(target + direction.as_vec2() * step, size)
}

/// One frame of exponential smoothing: `visual += (target - visual) * (1 - factor)`.
///
/// Snaps onto `target` once the remaining distance is under `threshold`.
pub fn ease_toward(visual: Vec2, target: Vec2, factor: f32, threshold: f32) -> Vec2 {
    let next = visual + (target - visual) * (1.0 - factor);
    if next.distance(target) < threshold {
        target
    } else {
        next
    }
}

/// Applies host commands: directional intents, mute toggling and exit requests.
///
/// Movement is ignored unless the session is running and the arena has been measured.
pub fn player_control_system(
    mut events: EventReader<GameEvent>,
    mut state: ResMut<GlobalState>,
    mut audio_state: ResMut<AudioState>,
    stage: Res<GameStage>,
    arena: Res<Arena>,
    config: Res<GameConfig>,
    mut players: Query<(&mut MoveTarget, &Collider), With<PlayerControlled>>,
    mut audio_events: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    for event in events.read() {
        let GameEvent::Command(command) = event else {
            continue;
        };

        match command {
            GameCommand::MoveCharacter(direction) => {
                if *stage != GameStage::Running || !arena.is_measured() {
                    trace!(?direction, stage = ?*stage, "Ignoring move intent");
                    continue;
                }

                let (mut target, collider) = match players.single_mut() {
                    Ok(tuple) => tuple,
                    Err(e) => {
                        errors.write(GameError::InvalidState(format!(
                            "No/multiple entities queried for player system: {}",
                            e
                        )));
                        return;
                    }
                };

                let next = step_target(&arena, target.0, collider.size, *direction, config.character_step);
                if next != target.0 {
                    trace!(?direction, x = next.x, y = next.y, "Target moved");
                    target.0 = next;
                    audio_events.write(AudioEvent::Play(Sound::Move));
                }
            }
            GameCommand::Exit => {
                state.exit = true;
            }
            GameCommand::MuteAudio => {
                audio_state.muted = !audio_state.muted;
                info!("Audio {}", if audio_state.muted { "muted" } else { "unmuted" });
            }
            GameCommand::Restart => {}
        }
    }
}

/// Eases the character's visual position toward its target, once per animation frame in this step.
///
/// Positions reached by all but the last of those frames are kept in [`FramePath`] so collision can
/// test them too.
///
/// Emits a trail particle at the character's center when any of those frames moved it by more than
/// a small fraction of a step.
pub fn smoothing_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    time: Res<SimulationTime>,
    config: Res<GameConfig>,
    mut players: Query<(&mut Position, &mut FramePath, &MoveTarget, &Collider), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let (mut position, mut path, target, collider) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for smoothing system: {}",
                e
            )));
            return;
        }
    };

    let emit_distance = config.character_step * PARTICLE_EMIT_FRACTION;
    let mut visual = position.0;
    let mut moved_visibly = false;
    path.0.clear();
    for frame in 0..dt.ticks {
        if visual == target.0 {
            break;
        }
        if frame > 0 {
            path.0.push(visual);
        }
        let next = ease_toward(visual, target.0, config.smoothing_factor, config.movement_threshold);
        moved_visibly |= next.distance(visual) > emit_distance;
        visual = next;
    }

    if visual != position.0 {
        position.0 = visual;
    }

    if moved_visibly {
        let center = visual + collider.size / 2.0;
        emit_particle(&mut commands, center, time.0, config.particle_duration());
    }
}

/// Applies the most recent arena measurement and keeps the character inside the new bounds.
pub fn resize_system(
    mut events: EventReader<ArenaResized>,
    mut arena: ResMut<Arena>,
    mut players: Query<(&mut Position, &mut MoveTarget, &Collider), With<PlayerControlled>>,
) {
    let Some(resized) = events.read().last() else {
        return;
    };

    arena.size = resized.size;
    if !arena.is_measured() {
        debug!(width = resized.size.x, height = resized.size.y, "Arena has no extent yet");
        return;
    }

    debug!(width = arena.size.x, height = arena.size.y, "Arena measured");
    for (mut position, mut target, collider) in players.iter_mut() {
        target.0 = arena.clamp(target.0, collider.size);
        position.0 = arena.clamp(position.0, collider.size);
    }
}
