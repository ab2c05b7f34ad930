use bevy_ecs::{
    resource::Resource,
    system::{Commands, Res, ResMut},
};
use tracing::{debug, info};

use crate::events::SessionEnded;
use crate::systems::scheduler::RepeatingTask;
use crate::systems::{DeltaTime, GameStage, ScoreResource, SpawnSchedule};

/// The session clock: whole seconds left and the one-second task that decrements them.
#[derive(Resource, Debug)]
pub struct Countdown {
    pub time_left: u32,
    pub task: RepeatingTask,
}

/// Decrements the clock once per elapsed second.
///
/// The tick that would bring the clock to zero also ends the session: `time_left` is clamped to 0,
/// the stage becomes `GameOver`, both periodic tasks are cancelled and `SessionEnded` is triggered.
/// Any further seconds in the same step are discarded.
pub fn countdown_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    score: Res<ScoreResource>,
    mut countdown: ResMut<Countdown>,
    mut spawns: ResMut<SpawnSchedule>,
    mut stage: ResMut<GameStage>,
) {
    let fires = countdown.task.advance(dt.elapsed);
    for _ in 0..fires {
        if countdown.time_left <= 1 {
            countdown.time_left = 0;
            countdown.task.cancel();
            spawns.task.cancel();
            *stage = GameStage::GameOver;

            info!(final_score = score.0, "Time is up");
            commands.trigger(SessionEnded { final_score: score.0 });
            break;
        }

        countdown.time_left -= 1;
        debug!(time_left = countdown.time_left, "Clock tick");
    }
}
