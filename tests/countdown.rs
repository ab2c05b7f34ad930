use std::time::Duration;

use bevy_ecs::{observer::Trigger, system::RunSystemOnce, world::World};
use maid_mayhem::{
    events::SessionEnded,
    systems::{countdown_system, Countdown, GameStage, ScoreResource, SpawnSchedule},
};
use speculoos::prelude::*;

mod common;

#[derive(bevy_ecs::resource::Resource, Default)]
struct EndedCount(u32, u32);

fn world_with_end_counter() -> World {
    let mut world = common::create_test_world();
    world.init_resource::<EndedCount>();
    world.add_observer(
        |trigger: Trigger<SessionEnded>, mut ended: bevy_ecs::system::ResMut<EndedCount>| {
            ended.0 += 1;
            ended.1 = trigger.event().final_score;
        },
    );
    world
}

fn tick(world: &mut World, dt: Duration) {
    common::set_delta(world, dt);
    world
        .run_system_once(countdown_system)
        .expect("System should run successfully");
}

#[test]
fn test_decrements_once_per_second() {
    let mut world = world_with_end_counter();

    tick(&mut world, Duration::from_millis(999));
    assert_that(&world.resource::<Countdown>().time_left).is_equal_to(60);

    tick(&mut world, Duration::from_millis(1));
    assert_that(&world.resource::<Countdown>().time_left).is_equal_to(59);

    tick(&mut world, Duration::from_secs(3));
    assert_that(&world.resource::<Countdown>().time_left).is_equal_to(56);
}

#[test]
fn test_last_second_ends_session_in_same_step() {
    let mut world = world_with_end_counter();
    world.resource_mut::<Countdown>().time_left = 1;
    world.resource_mut::<ScoreResource>().0 = 37;

    tick(&mut world, Duration::from_secs(1));

    assert_that(&world.resource::<Countdown>().time_left).is_equal_to(0);
    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::GameOver);
    assert_that(&world.resource::<Countdown>().task.is_active()).is_false();
    assert_that(&world.resource::<SpawnSchedule>().task.is_active()).is_false();
    assert_that(&world.resource::<EndedCount>().0).is_equal_to(1);
    assert_that(&world.resource::<EndedCount>().1).is_equal_to(37);

    // The clock never fires again
    tick(&mut world, Duration::from_secs(5));
    assert_that(&world.resource::<Countdown>().time_left).is_equal_to(0);
    assert_that(&world.resource::<EndedCount>().0).is_equal_to(1);
}

#[test]
fn test_long_step_never_goes_negative() {
    let mut world = world_with_end_counter();
    world.resource_mut::<Countdown>().time_left = 2;

    tick(&mut world, Duration::from_secs(10));

    assert_that(&world.resource::<Countdown>().time_left).is_equal_to(0);
    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::GameOver);
    assert_that(&world.resource::<EndedCount>().0).is_equal_to(1);
}

#[test]
fn test_full_session_takes_exactly_duration() {
    let mut world = world_with_end_counter();

    for second in 1..60 {
        tick(&mut world, Duration::from_secs(1));
        assert_that(&world.resource::<Countdown>().time_left).is_equal_to(60 - second);
        assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::Running);
    }

    tick(&mut world, Duration::from_secs(1));
    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::GameOver);
}
