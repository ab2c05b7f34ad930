#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::Events,
    query::With,
    world::World,
};
use glam::Vec2;
use maid_mayhem::{
    audio::{Sound, SoundService},
    config::GameConfig,
    constants::{session::CLOCK_PERIOD, LOOP_TIME},
    error::{GameError, ServiceError},
    events::{ArenaResized, GameEvent},
    food::FoodKind,
    game::Game,
    notify::NotificationService,
    systems::{
        Arena, AudioEvent, AudioState, CharacterBundle, Countdown, DeltaTime, FoodBundle, GameRng, GameStage, GlobalState,
        NotificationEvent, RepeatingTask, ScoreResource, SimulationTime, SpawnSchedule,
    },
};

pub const ARENA_WIDTH: f32 = 800.0;
pub const ARENA_HEIGHT: f32 = 600.0;
pub const TEST_SEED: u64 = 0xF00D;

/// Something a sound service was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCall {
    Play(Sound),
    StartLoop,
    StopLoop,
    SetMute(bool),
}

pub type SoundLog = Rc<RefCell<Vec<SoundCall>>>;
pub type NotificationLog = Rc<RefCell<Vec<(String, Duration)>>>;

/// A sound service that remembers every call, optionally failing all of them.
pub struct RecordingSound {
    pub log: SoundLog,
    pub fail: bool,
}

impl RecordingSound {
    fn record(&mut self, call: SoundCall) -> Result<(), ServiceError> {
        self.log.borrow_mut().push(call);
        if self.fail {
            Err(ServiceError::Playback("device lost".into()))
        } else {
            Ok(())
        }
    }
}

impl SoundService for RecordingSound {
    fn play(&mut self, sound: Sound) -> Result<(), ServiceError> {
        self.record(SoundCall::Play(sound))
    }

    fn start_loop(&mut self) -> Result<(), ServiceError> {
        self.record(SoundCall::StartLoop)
    }

    fn stop_loop(&mut self) -> Result<(), ServiceError> {
        self.record(SoundCall::StopLoop)
    }

    fn set_mute(&mut self, muted: bool) -> Result<(), ServiceError> {
        self.record(SoundCall::SetMute(muted))
    }
}

pub struct RecordingNotifier {
    pub log: NotificationLog,
    pub fail: bool,
}

impl NotificationService for RecordingNotifier {
    fn notify(&mut self, message: &str, duration: Duration) -> Result<(), ServiceError> {
        self.log.borrow_mut().push((message.to_string(), duration));
        if self.fail {
            Err(ServiceError::Unavailable)
        } else {
            Ok(())
        }
    }
}

/// Deterministic configuration used across tests.
pub fn test_config() -> GameConfig {
    GameConfig {
        seed: Some(TEST_SEED),
        ..GameConfig::default()
    }
}

/// A game wired to recording collaborators, not yet measured.
pub fn create_test_game_with(config: GameConfig, fail: bool) -> (Game, SoundLog, NotificationLog) {
    let sounds = SoundLog::default();
    let notes = NotificationLog::default();
    let game = Game::new(
        config,
        Box::new(RecordingSound {
            log: sounds.clone(),
            fail,
        }),
        Box::new(RecordingNotifier {
            log: notes.clone(),
            fail,
        }),
    )
    .expect("Test config should be valid");
    (game, sounds, notes)
}

/// A game already measured at 800x600 and therefore running.
pub fn create_running_game() -> (Game, SoundLog, NotificationLog) {
    let (mut game, sounds, notes) = create_test_game_with(test_config(), false);
    game.resize(ARENA_WIDTH, ARENA_HEIGHT);
    (game, sounds, notes)
}

/// Creates a basic test world with required resources for ECS systems, in the middle of a running session
pub fn create_test_world() -> World {
    let mut world = World::new();
    let config = test_config();

    // Add required resources
    world.insert_resource(Events::<GameEvent>::default());
    world.insert_resource(Events::<GameError>::default());
    world.insert_resource(Events::<AudioEvent>::default());
    world.insert_resource(Events::<NotificationEvent>::default());
    world.insert_resource(Events::<ArenaResized>::default());
    world.insert_resource(GameStage::Running);
    world.insert_resource(Arena::new(ARENA_WIDTH, ARENA_HEIGHT));
    world.insert_resource(ScoreResource(0));
    world.insert_resource(AudioState::default());
    world.insert_resource(GlobalState { exit: false });
    world.insert_resource(DeltaTime::from_duration(LOOP_TIME)); // 60 FPS
    world.insert_resource(SimulationTime::default());
    world.insert_resource(GameRng::new(config.seed));

    let mut clock = RepeatingTask::new(CLOCK_PERIOD);
    clock.start();
    world.insert_resource(Countdown {
        time_left: config.duration_secs,
        task: clock,
    });
    let mut spawns = RepeatingTask::new(config.spawn_interval());
    spawns.start();
    world.insert_resource(SpawnSchedule { task: spawns });
    world.insert_resource(config);

    world
}

/// Spawns the controllable character with its visual and target positions at `position`
pub fn spawn_test_character(world: &mut World, position: Vec2) -> Entity {
    world.spawn(CharacterBundle::at(position)).id()
}

pub fn spawn_test_food(world: &mut World, position: Vec2, kind: FoodKind) -> Entity {
    world.spawn(FoodBundle::new(kind, position)).id()
}

/// Sends a game event to the world
pub fn send_game_event(world: &mut World, event: GameEvent) {
    world.send_event(event);
}

/// Replaces the frame delta and advances simulation time by the same amount
pub fn set_delta(world: &mut World, dt: Duration) {
    world.insert_resource(DeltaTime::from_duration(dt));
    world.resource_mut::<SimulationTime>().0 += dt;
}

pub fn count<C: Component>(world: &mut World) -> usize {
    world.query_filtered::<(), With<C>>().iter(world).count()
}

/// Drains every event of type `E` written so far
pub fn drain_events<E: bevy_ecs::event::Event>(world: &mut World) -> Vec<E> {
    world.resource_mut::<Events<E>>().drain().collect()
}

/// Ticks the game `frames` times with a fixed step
pub fn run_frames(game: &mut Game, frames: u32, dt: Duration) {
    for _ in 0..frames {
        game.tick(dt);
    }
}
