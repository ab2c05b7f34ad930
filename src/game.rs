//! This module contains the main game logic and state.

use std::time::{Duration, Instant};

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{Event, EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::world::World;
use glam::Vec2;
use tracing::{debug, info, warn};

use crate::audio::SoundService;
use crate::config::GameConfig;
use crate::constants::session::CLOCK_PERIOD;
use crate::direction::Direction;
use crate::error::{GameError, GameResult};
use crate::events::{ArenaResized, GameCommand, GameEvent};
use crate::food::FoodKind;
use crate::formatter;
use crate::notify::NotificationService;
use crate::snapshot::{entity_id, CharacterView, FoodView, GameSession, ParticleView, RenderSnapshot};
use crate::systems::{
    audio_system, begin_session_observer, collision_system, countdown_system, food_spawn_system, game_over_observer,
    is_running, item_system, notification_system, particle_cap_system, player_control_system, profile, resize_system,
    restart_system, smoothing_system, startup_system, time_to_live_system, Arena, AudioEvent, AudioResource, AudioState,
    CharacterBundle, Collider, Countdown, DeltaTime, FoodCollider, GameRng, GameStage, GlobalState, MoveTarget,
    NotificationEvent, NotifierResource, Particle, PlayerControlled, Position, RepeatingTask, ScoreResource,
    SimulationTime, SpawnSchedule, SystemId, SystemTimings, Timing,
};

/// Ordering of the per-frame work.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum FrameSet {
    /// Lifetimes expire no matter the stage
    Expire,
    /// Movement, collection, spawning and the clock; only while running
    Gameplay,
    /// Caps and dispatch to the host's collaborators
    Respond,
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// Owns the `World` holding the character, food, particles and session resources, plus two
/// schedules: the *input* schedule, run synchronously for every host command or arena
/// measurement, and the *frame* schedule, run once per [`tick`](Game::tick).
pub struct Game {
    pub world: World,
    pub input: Schedule,
    pub frame: Schedule,
}

impl Game {
    /// Builds the world and schedules. The game stays `Idle` until the arena is measured with [`resize`](Game::resize).
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` if `config` does not validate.
    pub fn new(
        config: GameConfig,
        sound: Box<dyn SoundService>,
        notifier: Box<dyn NotificationService>,
    ) -> GameResult<Game> {
        info!("Starting game initialization");
        config.validate()?;

        let mut world = World::default();
        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, config, sound, notifier);
        world.spawn(CharacterBundle::at(Vec2::ZERO));

        debug!("Configuring system execution schedules");
        let mut input = Schedule::default();
        let mut frame = Schedule::default();
        Self::configure_input_schedule(&mut input);
        Self::configure_frame_schedule(&mut frame);

        Ok(Game { world, input, frame })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<ArenaResized>(world);
        EventRegistry::register_event::<AudioEvent>(world);
        EventRegistry::register_event::<NotificationEvent>(world);

        world.add_observer(begin_session_observer);
        world.add_observer(game_over_observer);
    }

    fn insert_resources(
        world: &mut World,
        config: GameConfig,
        sound: Box<dyn SoundService>,
        notifier: Box<dyn NotificationService>,
    ) {
        world.insert_resource(GameStage::Idle);
        world.insert_resource(Arena::default());
        world.insert_resource(GlobalState { exit: false });
        world.insert_resource(ScoreResource(0));
        world.insert_resource(Countdown {
            time_left: config.duration_secs,
            task: RepeatingTask::new(CLOCK_PERIOD),
        });
        world.insert_resource(SpawnSchedule {
            task: RepeatingTask::new(config.spawn_interval()),
        });
        world.insert_resource(GameRng::new(config.seed));
        world.insert_resource(AudioState { muted: config.muted });
        world.insert_resource(DeltaTime::ZERO);
        world.insert_resource(SimulationTime::default());
        world.insert_resource(SystemTimings::default());
        world.insert_resource(Timing::default());
        world.insert_resource(config);

        world.insert_non_send_resource(AudioResource(sound));
        world.insert_non_send_resource(NotifierResource(notifier));
    }

    fn configure_input_schedule(schedule: &mut Schedule) {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                profile(SystemId::Resize, resize_system),
                profile(SystemId::Startup, startup_system),
                profile(SystemId::PlayerControls, player_control_system),
                profile(SystemId::Restart, restart_system),
            )
                .chain(),
        );
    }

    fn configure_frame_schedule(schedule: &mut Schedule) {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);

        let time_to_live_system = profile(SystemId::TimeToLive, time_to_live_system);
        let smoothing_system = profile(SystemId::Smoothing, smoothing_system);
        let collision_system = profile(SystemId::Collision, collision_system);
        let item_system = profile(SystemId::Item, item_system);
        let food_spawn_system = profile(SystemId::Spawner, food_spawn_system);
        let countdown_system = profile(SystemId::Countdown, countdown_system);
        let particle_cap_system = profile(SystemId::ParticleCap, particle_cap_system);
        let audio_system = profile(SystemId::Audio, audio_system);
        let notification_system = profile(SystemId::Notifications, notification_system);

        schedule
            .add_systems((
                time_to_live_system.in_set(FrameSet::Expire),
                (
                    smoothing_system,
                    collision_system,
                    item_system,
                    food_spawn_system,
                    countdown_system,
                )
                    .chain()
                    .in_set(FrameSet::Gameplay),
                (particle_cap_system, audio_system, notification_system)
                    .chain()
                    .in_set(FrameSet::Respond),
            ))
            .configure_sets(
                (
                    FrameSet::Expire,
                    FrameSet::Gameplay.run_if(is_running),
                    FrameSet::Respond,
                )
                    .chain(),
            );
    }

    /// Reports the arena's current extent. A non-positive extent leaves the arena unmeasured.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.world.send_event(ArenaResized {
            size: Vec2::new(width, height),
        });
        self.input.run(&mut self.world);
    }

    /// Applies a host command synchronously. Sounds and notifications it causes are delivered on the next tick.
    pub fn handle(&mut self, command: GameCommand) {
        debug!(?command, "Handling command");
        self.world.send_event(GameEvent::Command(command));
        self.input.run(&mut self.world);
    }

    pub fn move_character(&mut self, direction: Direction) {
        self.handle(GameCommand::MoveCharacter(direction));
    }

    pub fn restart(&mut self) {
        self.handle(GameCommand::Restart);
    }

    /// Executes one frame of game logic by running the frame schedule.
    ///
    /// Advances simulation time by `dt`, then expires lifetimes, eases the character, collects food,
    /// spawns, ticks the clock and dispatches audio and notifications. Frames exceeding 120% of
    /// their budget are logged with the systems most likely responsible.
    ///
    /// # Returns
    ///
    /// `true` if the game should terminate (exit command received), `false` to continue
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.world.insert_resource(DeltaTime::from_duration(dt));
        self.world.resource_mut::<SimulationTime>().0 += dt;
        let frame = self.world.resource::<Timing>().next_frame();
        formatter::increment_tick();

        // Measure total frame time including all systems
        let start = Instant::now();
        self.frame.run(&mut self.world);
        let total_duration = start.elapsed();

        self.update_events();
        self.report_errors();

        let timings = self.world.resource::<SystemTimings>();
        timings.record(SystemId::Total, total_duration, frame);

        // Zero-length steps have no budget to exceed
        let budget = dt.mul_f64(1.2);
        if !dt.is_zero() && total_duration > budget {
            let slowest = timings.slowest_systems();
            let systems_context = if slowest.is_empty() {
                "No specific systems identified".to_string()
            } else {
                slowest
                    .iter()
                    .map(|(id, duration)| format!("{} ({:.2?})", id, duration))
                    .collect::<Vec<String>>()
                    .join(", ")
            };

            warn!(
                total = format!("{:.3?}", total_duration),
                frame,
                systems = systems_context,
                budget = format!("{:.3?}", budget),
                "Frame took longer than expected"
            );
        }

        self.world.resource::<GlobalState>().exit
    }

    /// Swaps every event buffer so events live for exactly one frame after the one they were sent in.
    fn update_events(&mut self) {
        fn update<E: Event>(world: &mut World) {
            if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
                events.update();
            }
        }

        update::<GameEvent>(&mut self.world);
        update::<ArenaResized>(&mut self.world);
        update::<AudioEvent>(&mut self.world);
        update::<NotificationEvent>(&mut self.world);
    }

    /// Logs and clears errors reported by systems during the frame.
    fn report_errors(&mut self) {
        if let Some(mut errors) = self.world.get_resource_mut::<Events<GameError>>() {
            for error in errors.drain() {
                warn!(%error, "System reported an error");
            }
        }
    }

    pub fn stage(&self) -> GameStage {
        *self.world.resource::<GameStage>()
    }

    pub fn score(&self) -> u32 {
        self.world.resource::<ScoreResource>().0
    }

    pub fn time_left(&self) -> u32 {
        self.world.resource::<Countdown>().time_left
    }

    pub fn session(&self) -> GameSession {
        GameSession {
            score: self.score(),
            time_left: self.time_left(),
            stage: self.stage(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.world.resource::<AudioState>().muted
    }

    /// Per-system timing table, most expensive first.
    pub fn timing_report(&self) -> Vec<String> {
        self.world.resource::<SystemTimings>().format_table().into_vec()
    }

    /// Captures everything a renderer needs to draw the current frame.
    pub fn snapshot(&mut self) -> RenderSnapshot {
        let now = self.world.resource::<SimulationTime>().0;
        let arena = self.world.resource::<Arena>().size;

        let character = self
            .world
            .query_filtered::<(&Position, &MoveTarget, &Collider), With<PlayerControlled>>()
            .iter(&self.world)
            .next()
            .map(|(position, target, collider)| CharacterView {
                position: position.0,
                target: target.0,
                size: collider.size,
            });

        let mut food: Vec<FoodView> = self
            .world
            .query_filtered::<(Entity, &Position, &Collider, &FoodKind), With<FoodCollider>>()
            .iter(&self.world)
            .map(|(entity, position, collider, kind)| FoodView::new(entity, position.0, collider.size, *kind))
            .collect();
        food.sort_by_key(|view| view.id);

        let mut particles: Vec<ParticleView> = self
            .world
            .query::<(Entity, &Position, &Particle)>()
            .iter(&self.world)
            .map(|(entity, position, particle)| ParticleView {
                id: entity_id(entity),
                position: position.0,
                age_ms: now.saturating_sub(particle.created_at).as_millis() as u64,
            })
            .collect();
        particles.sort_by_key(|view| view.id);

        RenderSnapshot {
            arena,
            character,
            food,
            particles,
            session: self.session(),
        }
    }
}
