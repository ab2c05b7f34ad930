//! Headless driver: paces frames, steers the character and runs a session to completion.

use std::time::{Duration, Instant};

use glam::Vec2;
use tracing::{debug, info};

use crate::audio::TracingSound;
use crate::config::GameConfig;
use crate::constants::{DEFAULT_ARENA_SIZE, LOOP_TIME};
use crate::direction::Direction;
use crate::error::{GameError, GameResult};
use crate::game::Game;
use crate::notify::TracingNotifier;
use crate::snapshot::RenderSnapshot;
use crate::systems::GameStage;

/// Frames between two autopilot key presses, roughly a held key's repeat rate.
const AUTOPILOT_REPEAT_FRAMES: u32 = 6;

/// Command-line options of the headless runner.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Run frames back to back instead of pacing them at 60 FPS
    pub fast: bool,
    pub seed: Option<u64>,
    pub size: Vec2,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fast: false,
            seed: None,
            size: DEFAULT_ARENA_SIZE,
        }
    }
}

impl Options {
    /// Parses `--fast`, `--seed <n>` and `--size <w>x<h>`.
    pub fn parse(args: impl IntoIterator<Item = String>) -> GameResult<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--fast" => options.fast = true,
                "--seed" => {
                    let value = args.next().ok_or_else(|| GameError::Config("--seed needs a value".into()))?;
                    let seed = value
                        .parse()
                        .map_err(|_| GameError::Config(format!("Invalid seed '{value}'")))?;
                    options.seed = Some(seed);
                }
                "--size" => {
                    let value = args.next().ok_or_else(|| GameError::Config("--size needs a value".into()))?;
                    options.size = parse_size(&value)?;
                }
                other => return Err(GameError::Config(format!("Unknown argument '{other}'"))),
            }
        }

        Ok(options)
    }
}

fn parse_size(value: &str) -> GameResult<Vec2> {
    let invalid = || GameError::Config(format!("Invalid size '{value}', expected <width>x<height>"));
    let (width, height) = value.split_once('x').ok_or_else(invalid)?;
    let width: f32 = width.trim().parse().map_err(|_| invalid())?;
    let height: f32 = height.trim().parse().map_err(|_| invalid())?;
    Ok(Vec2::new(width, height))
}

/// Picks the direction that closes the larger gap between the character and the nearest food item.
pub fn autopilot_direction(snapshot: &RenderSnapshot, step: f32) -> Option<Direction> {
    let character = snapshot.character?;
    let center = character.target + character.size / 2.0;

    let nearest = snapshot
        .food
        .iter()
        .map(|food| food.position + food.size / 2.0)
        .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)))?;

    let delta = nearest - center;
    if delta.x.abs().max(delta.y.abs()) < step / 2.0 {
        return None;
    }

    Some(if delta.x.abs() >= delta.y.abs() {
        if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    })
}

pub struct App {
    pub game: Game,
    options: Options,
    step: f32,
    frames: u32,
    last_tick: Instant,
}

impl App {
    pub fn new(config: GameConfig, options: Options) -> GameResult<App> {
        let step = config.character_step;
        let mut game = Game::new(config, Box::new(TracingSound::default()), Box::new(TracingNotifier))?;

        info!(width = options.size.x, height = options.size.y, fast = options.fast, "Measuring arena");
        game.resize(options.size.x, options.size.y);

        Ok(App {
            game,
            options,
            step,
            frames: 0,
            last_tick: Instant::now(),
        })
    }

    /// Executes a single frame: steer, tick, then sleep off whatever is left of the frame budget.
    ///
    /// # Returns
    ///
    /// `true` if the session should continue, `false` once it is over or exit was requested.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();
        let dt = if self.options.fast {
            LOOP_TIME
        } else {
            self.last_tick.elapsed()
        };
        self.last_tick = start;

        if self.frames % AUTOPILOT_REPEAT_FRAMES == 0 {
            if let Some(direction) = autopilot_direction(&self.game.snapshot(), self.step) {
                self.game.move_character(direction);
            }
        }
        self.frames += 1;

        let exit = self.game.tick(dt);

        if exit || self.game.stage() != GameStage::Running {
            debug!(frames = self.frames, "Stopping main loop");
            return false;
        }

        if !self.options.fast {
            let remaining = LOOP_TIME.saturating_sub(start.elapsed());
            if remaining != Duration::ZERO {
                spin_sleep::sleep(remaining);
            }
        }

        true
    }
}
