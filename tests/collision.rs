use std::time::Duration;

use bevy_ecs::{entity::Entity, query::With, system::RunSystemOnce};
use glam::Vec2;
use maid_mayhem::{
    audio::Sound,
    constants::LOOP_TIME,
    direction::Direction,
    events::GameEvent,
    food::FoodKind,
    game::Game,
    systems::{
        collision_system, item_system, smoothing_system, AudioEvent, FoodBundle, FoodCollider, MoveTarget,
        NotificationEvent, ScoreResource,
    },
};
use speculoos::prelude::*;

mod common;

fn collisions(world: &mut bevy_ecs::world::World) -> Vec<GameEvent> {
    common::drain_events::<GameEvent>(world)
        .into_iter()
        .filter(|event| matches!(event, GameEvent::Collision(_, _)))
        .collect()
}

#[test]
fn test_overlapping_food_reports_collision() {
    let mut world = common::create_test_world();
    let character = common::spawn_test_character(&mut world, Vec2::new(50.0, 50.0));
    let food = common::spawn_test_food(&mut world, Vec2::new(60.0, 60.0), FoodKind::Cake);

    world
        .run_system_once(collision_system)
        .expect("System should run successfully");

    assert_that(&collisions(&mut world)).is_equal_to(vec![GameEvent::Collision(character, food)]);
}

#[test]
fn test_distant_and_touching_food_ignored() {
    let mut world = common::create_test_world();
    common::spawn_test_character(&mut world, Vec2::new(50.0, 50.0));
    common::spawn_test_food(&mut world, Vec2::new(400.0, 400.0), FoodKind::Cake);
    // Shares the character's right edge exactly
    common::spawn_test_food(&mut world, Vec2::new(100.0, 50.0), FoodKind::Apple);

    world
        .run_system_once(collision_system)
        .expect("System should run successfully");

    assert_that(&collisions(&mut world)).is_empty();
}

#[test]
fn test_collection_scores_and_removes_food() {
    let mut world = common::create_test_world();
    common::spawn_test_character(&mut world, Vec2::new(50.0, 50.0));
    common::spawn_test_food(&mut world, Vec2::new(60.0, 60.0), FoodKind::Cake);

    world
        .run_system_once(collision_system)
        .expect("System should run successfully");
    world
        .run_system_once(item_system)
        .expect("System should run successfully");

    assert_that(&world.resource::<ScoreResource>().0).is_equal_to(10);
    assert_that(&common::count::<FoodCollider>(&mut world)).is_equal_to(0);

    let audio = common::drain_events::<AudioEvent>(&mut world);
    assert_that(&audio).is_equal_to(vec![AudioEvent::Play(Sound::Collect(FoodKind::Cake))]);

    let notes = common::drain_events::<NotificationEvent>(&mut world);
    assert_that(&notes).has_length(1);
    assert_that(&notes[0].message.as_str()).is_equal_to("+10 Cake!");
}

#[test]
fn test_simultaneous_pickups_sum_once_each() {
    let mut world = common::create_test_world();
    common::spawn_test_character(&mut world, Vec2::new(100.0, 100.0));
    common::spawn_test_food(&mut world, Vec2::new(90.0, 90.0), FoodKind::Sushi);
    common::spawn_test_food(&mut world, Vec2::new(130.0, 130.0), FoodKind::Donut);
    let far = common::spawn_test_food(&mut world, Vec2::new(500.0, 500.0), FoodKind::Cherry);

    world
        .run_system_once(collision_system)
        .expect("System should run successfully");
    world
        .run_system_once(item_system)
        .expect("System should run successfully");

    assert_that(&world.resource::<ScoreResource>().0).is_equal_to(15 + 5);
    assert_that(&common::count::<FoodCollider>(&mut world)).is_equal_to(1);
    assert_that(&world.get_entity(far).is_ok()).is_true();

    // Order between the two pickups is unspecified
    let mut sounds: Vec<FoodKind> = common::drain_events::<AudioEvent>(&mut world)
        .into_iter()
        .filter_map(|event| match event {
            AudioEvent::Play(Sound::Collect(kind)) => Some(kind),
            _ => None,
        })
        .collect();
    sounds.sort_by_key(|kind| kind.points());
    assert_that(&sounds).is_equal_to(vec![FoodKind::Donut, FoodKind::Sushi]);
}

#[test]
fn test_duplicate_collision_events_count_once() {
    let mut world = common::create_test_world();
    let character = common::spawn_test_character(&mut world, Vec2::new(50.0, 50.0));
    let food = common::spawn_test_food(&mut world, Vec2::new(60.0, 60.0), FoodKind::Cherry);

    common::send_game_event(&mut world, GameEvent::Collision(character, food));
    common::send_game_event(&mut world, GameEvent::Collision(food, character));

    world
        .run_system_once(item_system)
        .expect("System should run successfully");

    assert_that(&world.resource::<ScoreResource>().0).is_equal_to(12);
    assert_that(&common::count::<FoodCollider>(&mut world)).is_equal_to(0);
}

#[test]
fn test_score_accumulates_across_frames() {
    let mut world = common::create_test_world();
    common::spawn_test_character(&mut world, Vec2::new(50.0, 50.0));
    world.resource_mut::<ScoreResource>().0 = 40;
    common::spawn_test_food(&mut world, Vec2::new(60.0, 60.0), FoodKind::Apple);

    world
        .run_system_once(collision_system)
        .expect("System should run successfully");
    world
        .run_system_once(item_system)
        .expect("System should run successfully");

    assert_that(&world.resource::<ScoreResource>().0).is_equal_to(48);
}

#[test]
fn test_food_passed_over_within_one_step_is_collected() {
    let mut world = common::create_test_world();
    let character = common::spawn_test_character(&mut world, Vec2::new(375.0, 275.0));
    world.get_mut::<MoveTarget>(character).unwrap().0 = Vec2::new(475.0, 275.0);
    // Only overlapped by the early frames of the glide, not by where it ends up
    let food = common::spawn_test_food(&mut world, Vec2::new(440.0, 285.0), FoodKind::Sushi);

    common::set_delta(&mut world, Duration::from_secs(1));
    world
        .run_system_once(smoothing_system)
        .expect("System should run successfully");
    world
        .run_system_once(collision_system)
        .expect("System should run successfully");

    assert_that(&collisions(&mut world)).is_equal_to(vec![GameEvent::Collision(character, food)]);
}

/// A running game whose only food item is a Sushi just right of the centered character.
fn game_with_sushi_ahead() -> (Game, Entity) {
    let (mut game, _, _) = common::create_running_game();
    let spawned: Vec<Entity> = game
        .world
        .query_filtered::<Entity, With<FoodCollider>>()
        .iter(&game.world)
        .collect();
    for entity in spawned {
        game.world.despawn(entity);
    }
    let sushi = game
        .world
        .spawn(FoodBundle::new(FoodKind::Sushi, Vec2::new(440.0, 285.0)))
        .id();

    for _ in 0..5 {
        game.move_character(Direction::Right);
    }
    (game, sushi)
}

#[test]
fn test_collection_does_not_depend_on_step_length() {
    let (mut fine, fine_sushi) = game_with_sushi_ahead();
    common::run_frames(&mut fine, 60, LOOP_TIME);

    let (mut coarse, coarse_sushi) = game_with_sushi_ahead();
    coarse.tick(Duration::from_secs(1));

    for (game, sushi) in [(&mut fine, fine_sushi), (&mut coarse, coarse_sushi)] {
        assert_that(&game.world.get_entity(sushi).is_ok()).is_false();
        assert_that(&game.score()).is_equal_to(15);
        let character = game.snapshot().character.expect("Character should be present");
        assert_that(&character.position).is_equal_to(Vec2::new(475.0, 275.0));
    }
}
